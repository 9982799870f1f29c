use crate::auth::{logout, use_auth};
use crate::components::icons::{CalendarCheck, LogIn, LogOut};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use quickcourt_shared::UserRole;

#[component]
pub fn NavBar() -> impl IntoView {
    let auth = use_auth();
    let user = Signal::derive(move || auth.user());

    let owner_links = move || {
        user.get().filter(|u| u.is_owner()).map(|_| {
            view! {
                <li><Link to=AppRoute::MyFacilities>"My Venues"</Link></li>
                <li><Link to=AppRoute::CreateFacility>"Add Venue"</Link></li>
            }
        })
    };

    let admin_link = move || {
        user.get().filter(|u| u.role == UserRole::Admin).map(|_| {
            view! { <li><Link to=AppRoute::Admin>"Admin"</Link></li> }
        })
    };

    view! {
        <div class="navbar bg-base-100 shadow-md px-4 md:px-10">
            <div class="flex-1">
                <Link to=AppRoute::Home class="btn btn-ghost text-2xl font-bold">
                    "Quick Court"
                </Link>
            </div>
            <div class="flex-none gap-2">
                <ul class="menu menu-horizontal px-1 hidden md:flex">
                    <li><Link to=AppRoute::Courts>"Venues"</Link></li>
                    {owner_links}
                    {admin_link}
                </ul>
                <Link to=AppRoute::MyBookings class="btn btn-success rounded-full gap-2">
                    <CalendarCheck attr:class="h-5 w-5" />
                    "Booking"
                </Link>
                {move || match user.get() {
                    Some(u) => view! {
                        <div class="flex items-center gap-3">
                            <Link
                                to=AppRoute::Profile
                                class="btn btn-circle btn-primary text-xl font-bold"
                            >
                                {u.initial().to_string()}
                            </Link>
                            <button
                                class="btn btn-error rounded-full gap-2"
                                on:click=move |_| logout(&auth)
                            >
                                <LogOut attr:class="h-4 w-4" />
                                "Logout"
                            </button>
                        </div>
                    }
                    .into_any(),
                    None => view! {
                        <Link to=AppRoute::Login class="btn btn-primary rounded-full gap-2">
                            <LogIn attr:class="h-5 w-5" />
                            "Login / SignUp"
                        </Link>
                    }
                    .into_any(),
                }}
            </div>
        </div>
    }
}
