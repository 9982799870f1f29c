use crate::components::icons::{ChevronRight, MapPin};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use quickcourt_shared::FILTER_SPORTS;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="w-full min-h-screen bg-base-200">
            <div class="hero min-h-[400px]">
                <div class="hero-content flex-col lg:flex-row-reverse gap-10">
                    <img
                        src="https://placehold.co/600x400/1e293b/4ade80?text=Explore+Sports"
                        alt="Sports illustration"
                        class="hidden md:block max-w-lg rounded-xl shadow-2xl"
                    />
                    <div>
                        <div class="badge badge-outline gap-2 p-3">
                            <MapPin attr:class="h-4 w-4" />
                            "Ahmedabad"
                        </div>
                        <h1 class="text-4xl lg:text-5xl font-extrabold mt-4">"FIND PLAYERS & VENUES"</h1>
                        <h1 class="text-4xl lg:text-5xl font-extrabold text-success">"NEARBY"</h1>
                        <p class="py-4 max-w-md text-base-content/70">
                            "Seamlessly explore sports venues and play with sports enthusiasts just like you!"
                        </p>
                    </div>
                </div>
            </div>

            <div class="px-4 md:px-20 py-8">
                <div class="flex flex-col md:flex-row justify-between md:items-center mb-6">
                    <h2 class="text-3xl font-bold">"Booking Venues"</h2>
                    <Link to=AppRoute::Courts class="btn btn-ghost text-xl gap-2">
                        "See all venues"
                        <ChevronRight attr:class="h-5 w-5" />
                    </Link>
                </div>
                <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                    {FILTER_SPORTS
                        .into_iter()
                        .map(|sport| {
                            view! {
                                <Link to=AppRoute::Courts class="card bg-base-100 shadow hover:shadow-lg">
                                    <div class="card-body items-center">
                                        <span class="text-lg font-semibold">{sport}</span>
                                    </div>
                                </Link>
                            }
                        })
                        .collect_view()}
                </div>
            </div>
        </div>
    }
}
