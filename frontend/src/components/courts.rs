//! 场地列表页
//!
//! 加载一次全部场地，过滤和分页都在 `BrowserState` 中完成。

use crate::auth::{use_auth, use_config};
use crate::components::icons::{ChevronLeft, ChevronRight, MapPin, Search, Star};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use quickcourt_shared::browse::{BrowserState, CourtListing, format_rating, load_listings};
use quickcourt_shared::guard::RequestGuard;
use quickcourt_shared::{FILTER_SPORTS, VenueType, format_price};

const RATING_STEPS: [u8; 5] = [5, 4, 3, 2, 1];

/// 空字符串视为未设置
fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[component]
pub fn CourtsPage() -> impl IntoView {
    let auth = use_auth();
    let config = use_config();
    let state = RwSignal::new(BrowserState::new(config.page_size));

    // 卸载后到达的响应直接丢弃
    let guard = RequestGuard::new();
    let ticket = guard.issue();
    on_cleanup(move || guard.invalidate());

    spawn_local(async move {
        let result = load_listings(&auth.gateway()).await;
        ticket.commit(|| state.update(|s| s.finish_loading(result)));
    });

    view! {
        <div class="flex flex-col md:flex-row min-h-screen bg-base-200">
            <FilterSidebar state=state />
            <main class="flex-1 p-6">
                {move || {
                    if state.with(|s| s.is_loading()) {
                        return view! {
                            <div class="flex justify-center mt-10 gap-2">
                                <span class="loading loading-spinner"></span>
                                "Loading courts..."
                            </div>
                        }
                        .into_any();
                    }
                    let items = state.with(|s| s.page_items());
                    if items.is_empty() {
                        return view! {
                            <p class="text-center mt-10 text-base-content/60">"No courts found."</p>
                        }
                        .into_any();
                    }
                    view! {
                        <div class="grid grid-cols-1 sm:grid-cols-2 xl:grid-cols-4 gap-6">
                            {items
                                .into_iter()
                                .map(|listing| view! { <CourtCard listing=listing /> })
                                .collect_view()}
                        </div>
                        <Pagination state=state />
                    }
                    .into_any()
                }}
            </main>
        </div>
    }
}

#[component]
fn FilterSidebar(state: RwSignal<BrowserState>) -> impl IntoView {
    let query = move || state.with(|s| s.filter().query.clone());

    view! {
        <aside class="w-full md:w-64 bg-base-100 p-6 space-y-6">
            <div>
                <h2 class="text-lg font-bold mb-2">"Search by venue name"</h2>
                <label class="input input-bordered flex items-center gap-2">
                    <Search attr:class="h-4 w-4 opacity-60" />
                    <input
                        type="text"
                        class="grow"
                        placeholder="Search venues..."
                        prop:value=query
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            state.update(|s| s.update_filter(|f| f.query = value));
                        }
                    />
                </label>
            </div>

            <div>
                <h2 class="text-lg font-bold mb-2">"Filter by Sport Type"</h2>
                <select
                    class="select select-bordered w-full"
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        let sport = (!value.is_empty()).then_some(value);
                        state.update(|s| s.update_filter(|f| f.sport = sport));
                    }
                >
                    <option value="">"All Sports"</option>
                    {FILTER_SPORTS
                        .into_iter()
                        .map(|sport| view! { <option value=sport>{sport}</option> })
                        .collect_view()}
                </select>
            </div>

            <div>
                <h2 class="text-lg font-bold mb-2">"Price Range (per hour)"</h2>
                <div class="flex gap-2">
                    <input
                        type="number"
                        min="0"
                        placeholder="₹ Min"
                        class="input input-bordered w-1/2"
                        on:input=move |ev| {
                            let min = parse_price(&event_target_value(&ev));
                            state.update(|s| s.update_filter(|f| f.min_price = min));
                        }
                    />
                    <input
                        type="number"
                        min="0"
                        placeholder="₹ Max"
                        class="input input-bordered w-1/2"
                        on:input=move |ev| {
                            let max = parse_price(&event_target_value(&ev));
                            state.update(|s| s.update_filter(|f| f.max_price = max));
                        }
                    />
                </div>
            </div>

            <div>
                <h2 class="text-lg font-bold mb-2">"Choose Venue Type"</h2>
                {VenueType::ALL
                    .into_iter()
                    .map(|venue_type| {
                        view! {
                            <label class="label cursor-pointer justify-start gap-2">
                                <input
                                    type="checkbox"
                                    class="checkbox checkbox-sm"
                                    prop:checked=move || {
                                        state.with(|s| s.filter().venue_types.contains(&venue_type))
                                    }
                                    on:change=move |_| {
                                        state.update(|s| s.update_filter(|f| f.toggle_venue_type(venue_type)))
                                    }
                                />
                                <span>{venue_type.label()}</span>
                            </label>
                        }
                    })
                    .collect_view()}
            </div>

            <div>
                <h2 class="text-lg font-bold mb-2">"Choose Ratings"</h2>
                {RATING_STEPS
                    .into_iter()
                    .map(|stars| {
                        let threshold = f64::from(stars);
                        view! {
                            <label class="label cursor-pointer justify-start gap-2">
                                <input
                                    type="checkbox"
                                    class="checkbox checkbox-sm"
                                    prop:checked=move || {
                                        state.with(|s| s.filter().min_rating == Some(threshold))
                                    }
                                    on:change=move |_| {
                                        state.update(|s| {
                                            s.update_filter(|f| {
                                                f.min_rating = if f.min_rating == Some(threshold) {
                                                    None
                                                } else {
                                                    Some(threshold)
                                                };
                                            })
                                        })
                                    }
                                />
                                <span>{format!("{stars} Stars & up")}</span>
                            </label>
                        }
                    })
                    .collect_view()}
            </div>
        </aside>
    }
}

#[component]
fn CourtCard(listing: CourtListing) -> impl IntoView {
    let court = &listing.court;
    let rating = court
        .rating
        .map(format_rating)
        .unwrap_or_else(|| "N/A".to_string());
    let venue = court.venue_type.map(|v| v.label());

    view! {
        <div class="card bg-base-100 shadow-xl">
            <figure class="h-40 bg-base-300">
                {match court.photo_url.clone().filter(|u| !u.is_empty()) {
                    Some(url) => view! { <img src=url alt=court.name.clone() class="h-full w-full object-cover" /> }.into_any(),
                    None => view! { <span class="text-3xl opacity-50">{court.name.clone()}</span> }.into_any(),
                }}
            </figure>
            <div class="card-body p-5">
                <div class="flex justify-between items-center">
                    <h3 class="card-title">{court.name.clone()}</h3>
                    <span class="badge badge-success gap-1">
                        <Star attr:class="h-3 w-3" />
                        {rating}
                    </span>
                </div>
                <p class="flex items-center gap-2 text-sm text-base-content/70">
                    <MapPin attr:class="h-4 w-4" />
                    {listing.location().to_string()}
                </p>
                <div class="flex flex-wrap gap-2">
                    <span class="badge badge-outline">{court.sport_type.clone()}</span>
                    {venue.map(|label| view! { <span class="badge badge-outline">{label}</span> })}
                </div>
                <p class="font-semibold">{format!("{} / hour", format_price(court.price_per_hour))}</p>
                <div class="card-actions">
                    <Link to=AppRoute::CourtDetail(court.id.clone()) class="btn btn-success w-full">
                        "View Details"
                    </Link>
                </div>
            </div>
        </div>
    }
}

#[component]
fn Pagination(state: RwSignal<BrowserState>) -> impl IntoView {
    let page = move || state.with(|s| s.page());
    let pages = move || state.with(|s| s.page_count());

    view! {
        <div class="flex justify-center items-center gap-4 mt-8">
            <button
                class="btn btn-sm"
                disabled=move || page() <= 1
                on:click=move |_| state.update(|s| s.prev_page())
            >
                <ChevronLeft attr:class="h-4 w-4" />
            </button>
            <span>{move || format!("Page {} of {}", page(), pages())}</span>
            <button
                class="btn btn-sm"
                disabled=move || page() >= pages()
                on:click=move |_| state.update(|s| s.next_page())
            >
                <ChevronRight attr:class="h-4 w-4" />
            </button>
        </div>
    }
}
