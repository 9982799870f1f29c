use crate::auth::use_auth;
use crate::components::icons::Star;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use quickcourt_shared::browse::{CourtDetail, format_rating, load_court_detail};
use quickcourt_shared::guard::RequestGuard;
use quickcourt_shared::{Review, format_price};

const DEFAULT_ABOUT: &str =
    "This is a premium sports facility offering great courts and amenities for players.";

#[derive(Debug, Clone, PartialEq)]
enum DetailState {
    Loading,
    Loaded(CourtDetail),
    Failed(String),
}

#[component]
pub fn CourtDetailPage(court_id: String) -> impl IntoView {
    let auth = use_auth();
    let detail = RwSignal::new(DetailState::Loading);

    // 路由参数变化会重建页面；卸载时作废旧请求
    let guard = RequestGuard::new();
    let ticket = guard.issue();
    on_cleanup(move || guard.invalidate());

    spawn_local(async move {
        let result = load_court_detail(&auth.gateway(), &court_id).await;
        ticket.commit(|| {
            detail.set(match result {
                Ok(d) => DetailState::Loaded(d),
                Err(e) => {
                    tracing::error!(error = %e, %court_id, "failed to load court detail");
                    DetailState::Failed(e.user_message())
                }
            })
        });
    });

    move || match detail.get() {
        DetailState::Loading => view! {
            <div class="flex justify-center items-center min-h-screen gap-2">
                <span class="loading loading-spinner"></span>
                "Loading court details..."
            </div>
        }
        .into_any(),
        DetailState::Failed(message) => view! {
            <div class="flex justify-center items-center min-h-screen">
                <div role="alert" class="alert alert-error max-w-md">
                    <span>{message}</span>
                </div>
            </div>
        }
        .into_any(),
        DetailState::Loaded(d) => view! { <DetailView detail=d /> }.into_any(),
    }
}

#[component]
fn DetailView(detail: CourtDetail) -> impl IntoView {
    let average = format_rating(detail.average_rating());
    let review_count = detail.reviews.len();
    let CourtDetail {
        court,
        facility,
        reviews,
    } = detail;

    let title = facility
        .as_ref()
        .map(|f| f.name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| court.name.clone());
    let address = facility.as_ref().and_then(|f| f.address.clone());
    let about = facility
        .as_ref()
        .and_then(|f| f.description.clone())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| DEFAULT_ABOUT.to_string());
    let booking_route = AppRoute::Booking(court.id.clone());

    view! {
        <div class="max-w-6xl mx-auto px-6 py-10">
            <div class="flex justify-between items-start">
                <div>
                    <h1 class="text-3xl font-bold">{title}</h1>
                    <p class="text-base-content/60">
                        {address.clone().unwrap_or_else(|| "No address available".to_string())}
                    </p>
                    <p class="text-sm mt-1 flex items-center gap-1">
                        <Star attr:class="h-4 w-4 text-warning" />
                        <span class="text-warning">{average}</span>
                        {format!("({review_count} Reviews)")}
                    </p>
                </div>
                <Link to=booking_route.clone() class="btn btn-success">"Book This Venue"</Link>
            </div>

            <div class="grid md:grid-cols-2 gap-6 mt-8">
                <div class="bg-base-300 h-[300px] rounded-lg overflow-hidden flex justify-center items-center">
                    {court
                        .photo_url
                        .clone()
                        .filter(|u| !u.is_empty())
                        .map(|url| view! { <img class="w-full h-full object-cover" src=url alt="Court" /> })}
                </div>
                <div class="flex flex-col gap-4">
                    <InfoCard title="Operating Hours" body=court.operating_hours.clone() />
                    <InfoCard title="Address" body=address.unwrap_or_else(|| "N/A".to_string()) />
                    <InfoCard title="Price" body=format!("{} / hour", format_price(court.price_per_hour)) />
                </div>
            </div>

            <section class="mt-10">
                <h2 class="text-2xl font-bold mb-4">"Sports Available"</h2>
                <span class="badge badge-success badge-lg">{court.sport_type.clone()}</span>
            </section>

            <section class="mt-10">
                <h2 class="text-2xl font-bold mb-4">"About Venue"</h2>
                <p class="text-base-content/70">{about}</p>
            </section>

            <section class="mt-10">
                <h2 class="text-2xl font-bold mb-4">"Player Reviews & Ratings"</h2>
                {if reviews.is_empty() {
                    view! { <p class="text-base-content/50">"No reviews yet."</p> }.into_any()
                } else {
                    view! {
                        <div class="flex flex-col gap-4">
                            {reviews.into_iter().map(|r| view! { <ReviewItem review=r /> }).collect_view()}
                        </div>
                    }
                    .into_any()
                }}
            </section>

            <div class="mt-10 flex justify-center">
                <Link to=booking_route class="btn btn-success btn-wide">"Proceed to Booking"</Link>
            </div>
        </div>
    }
}

#[component]
fn InfoCard(title: &'static str, body: String) -> impl IntoView {
    view! {
        <div class="bg-base-100 p-4 rounded-lg shadow">
            <h3 class="text-lg font-semibold">{title}</h3>
            <p>{body}</p>
        </div>
    }
}

#[component]
fn ReviewItem(review: Review) -> impl IntoView {
    let stars = "★".repeat(usize::from(review.rating.min(5)));

    view! {
        <div class="bg-base-100 p-4 rounded-lg shadow">
            <div class="flex justify-between items-center">
                <p class="font-semibold">"User"</p>
                <p class="text-warning">
                    {stars}
                    <span class="text-base-content/50 text-sm">{format!(" ({})", review.rating)}</span>
                </p>
            </div>
            <p class="text-base-content/70 mt-2">{review.comment}</p>
        </div>
    }
}
