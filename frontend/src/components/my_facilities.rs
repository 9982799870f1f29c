use crate::auth::use_auth;
use crate::components::icons::{MapPin, Plus};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use quickcourt_shared::account::load_account;
use quickcourt_shared::guard::RequestGuard;
use quickcourt_shared::{Court, Facility, format_price};

#[derive(Debug, Clone, PartialEq)]
enum VenuesState {
    Loading,
    Loaded(Vec<Facility>),
    Failed,
}

#[component]
pub fn MyFacilitiesPage() -> impl IntoView {
    let auth = use_auth();
    let venues = RwSignal::new(VenuesState::Loading);
    // 默认选中第一个设施
    let selected = RwSignal::new(Option::<String>::None);

    let guard = RequestGuard::new();
    let ticket = guard.issue();
    on_cleanup(move || guard.invalidate());

    match auth.user_untracked() {
        Some(user) => spawn_local(async move {
            let result = load_account(&auth.gateway(), &user.id).await;
            ticket.commit(|| match result {
                Ok(overview) => {
                    selected.set(overview.facilities.first().map(|f| f.id.clone()));
                    venues.set(VenuesState::Loaded(overview.facilities));
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to load owned facilities");
                    venues.set(VenuesState::Failed);
                }
            });
        }),
        None => venues.set(VenuesState::Loaded(Vec::new())),
    }

    let selected_facility = move || {
        let id = selected.get()?;
        venues.with(|v| match v {
            VenuesState::Loaded(list) => list.iter().find(|f| f.id == id).cloned(),
            _ => None,
        })
    };

    move || match venues.get() {
        VenuesState::Loading => view! {
            <div class="flex justify-center items-center min-h-[60vh]">
                <h1 class="text-2xl">"Loading your venues..."</h1>
            </div>
        }
        .into_any(),
        VenuesState::Failed => view! {
            <div class="flex justify-center items-center min-h-[60vh]">
                <h1 class="text-error text-2xl">
                    "Could not load your facilities. Please try again later."
                </h1>
            </div>
        }
        .into_any(),
        VenuesState::Loaded(facilities) => view! {
            <div class="flex flex-col min-h-screen">
                <div class="flex justify-between items-center border-y border-base-300 px-6 py-4">
                    <h1 class="text-4xl">"My Sport Venues"</h1>
                    {move || {
                        selected
                            .get()
                            .map(|id| {
                                view! {
                                    <Link to=AppRoute::CreateCourt(id) class="btn btn-warning gap-2">
                                        <Plus attr:class="h-4 w-4" />
                                        "Create a Court"
                                    </Link>
                                }
                            })
                    }}
                </div>
                <div class="flex flex-grow divide-x divide-base-300">
                    <div class="w-1/5 p-3 space-y-3">
                        {if facilities.is_empty() {
                            view! { <p class="p-4">"You don't own any facilities yet."</p> }.into_any()
                        } else {
                            facilities
                                .into_iter()
                                .map(|facility| {
                                    let id = facility.id.clone();
                                    let is_selected = {
                                        let id = id.clone();
                                        move || selected.with(|s| s.as_deref() == Some(id.as_str()))
                                    };
                                    let name = Some(facility.name)
                                        .filter(|n| !n.is_empty())
                                        .unwrap_or_else(|| "Unnamed Facility".to_string());
                                    view! {
                                        <button
                                            class="btn w-full h-20 text-xl"
                                            class:btn-success=is_selected
                                            on:click=move |_| selected.set(Some(id.clone()))
                                        >
                                            {name}
                                        </button>
                                    }
                                })
                                .collect_view()
                                .into_any()
                        }}
                    </div>
                    <div class="w-4/5 p-10 flex flex-wrap gap-5">
                        {move || {
                            let courts = selected_facility().map(|f| (f.courts, f.address)).unwrap_or_default();
                            let (courts, address) = courts;
                            if courts.is_empty() {
                                view! {
                                    <div class="flex flex-col items-center justify-center w-full">
                                        <p class="text-xl">"No courts found for this facility."</p>
                                        <p class="text-base-content/60 mt-2">
                                            "Add a court to this facility to see it here."
                                        </p>
                                    </div>
                                }
                                .into_any()
                            } else {
                                courts
                                    .into_iter()
                                    .map(|court| view! { <OwnedCourtCard court=court address=address.clone() /> })
                                    .collect_view()
                                    .into_any()
                            }
                        }}
                    </div>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
fn OwnedCourtCard(court: Court, address: Option<String>) -> impl IntoView {
    view! {
        <div class="card w-72 bg-base-100 shadow-xl">
            <figure class="h-40 bg-base-300">
                <span class="text-3xl opacity-50">{court.name.clone()}</span>
            </figure>
            <div class="card-body p-5">
                <h2 class="card-title">{court.name.clone()}</h2>
                <p class="flex items-center gap-2 text-sm">
                    <MapPin attr:class="h-4 w-4" />
                    {address.unwrap_or_else(|| "N/A".to_string())}
                </p>
                <div class="flex gap-2">
                    <span class="badge badge-outline">{court.sport_type.clone()}</span>
                    <span class="badge badge-outline">{court.operating_hours.clone()}</span>
                </div>
                <p class="font-semibold">{format!("{} / hour", format_price(court.price_per_hour))}</p>
                <Link to=AppRoute::CourtDetail(court.id.clone()) class="btn btn-success btn-sm">
                    "View Details"
                </Link>
            </div>
        </div>
    }
}
