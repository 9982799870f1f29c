use crate::auth::use_auth;
use crate::components::icons::Star;
use leptos::prelude::*;
use leptos::task::spawn_local;
use quickcourt_shared::account::{AccountOverview, CourtBooking, load_account};
use quickcourt_shared::date::display_created_at;
use quickcourt_shared::guard::RequestGuard;
use quickcourt_shared::{Booking, ClockTime, Review, format_price};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccountTab {
    MyBookings,
    MyReviews,
    CourtBookings,
}

impl AccountTab {
    fn label(&self) -> &'static str {
        match self {
            AccountTab::MyBookings => "My Bookings",
            AccountTab::MyReviews => "My Reviews",
            AccountTab::CourtBookings => "Court Bookings",
        }
    }
}

fn time_or_dash(time: Option<ClockTime>) -> String {
    time.map(|t| t.hhmm()).unwrap_or_else(|| "-".to_string())
}

fn date_or_dash(booking: &Booking) -> String {
    booking
        .date
        .map(|d| d.display())
        .unwrap_or_else(|| "-".to_string())
}

#[component]
pub fn MyBookingsPage() -> impl IntoView {
    let auth = use_auth();
    let is_owner = auth.user_untracked().is_some_and(|u| u.is_owner());

    let tab = RwSignal::new(AccountTab::MyBookings);
    let overview = RwSignal::new(Option::<AccountOverview>::None);
    let error = RwSignal::new(Option::<String>::None);

    let guard = RequestGuard::new();
    let ticket = guard.issue();
    on_cleanup(move || guard.invalidate());

    if let Some(user) = auth.user_untracked() {
        spawn_local(async move {
            let result = load_account(&auth.gateway(), &user.id).await;
            ticket.commit(|| match result {
                Ok(data) => overview.set(Some(data)),
                Err(e) => {
                    tracing::error!(error = %e, user_id = %user.id, "failed to load account");
                    error.set(Some(e.user_message()));
                }
            });
        });
    }

    let tabs: Vec<AccountTab> = if is_owner {
        vec![AccountTab::MyBookings, AccountTab::MyReviews, AccountTab::CourtBookings]
    } else {
        vec![AccountTab::MyBookings, AccountTab::MyReviews]
    };

    view! {
        <div class="max-w-4xl mx-auto p-6">
            <h1 class="text-2xl font-bold text-center mb-6">"My Account"</h1>

            <div role="tablist" class="tabs tabs-boxed justify-center mb-6">
                {tabs
                    .into_iter()
                    .map(|t| {
                        view! {
                            <a
                                role="tab"
                                class="tab"
                                class:tab-active=move || tab.get() == t
                                on:click=move |_| tab.set(t)
                            >
                                {t.label()}
                            </a>
                        }
                    })
                    .collect_view()}
            </div>

            {move || {
                if let Some(msg) = error.get() {
                    return view! {
                        <div role="alert" class="alert alert-error"><span>{msg}</span></div>
                    }
                    .into_any();
                }
                let Some(data) = overview.get() else {
                    return view! {
                        <div class="flex justify-center"><span class="loading loading-spinner"></span></div>
                    }
                    .into_any();
                };
                match tab.get() {
                    AccountTab::MyBookings => booking_list(data.bookings).into_any(),
                    AccountTab::MyReviews => review_list(data.reviews).into_any(),
                    AccountTab::CourtBookings => court_booking_list(data.court_bookings).into_any(),
                }
            }}
        </div>
    }
}

fn empty(message: &'static str) -> AnyView {
    view! { <p class="text-center text-base-content/50">{message}</p> }.into_any()
}

fn booking_list(bookings: Vec<Booking>) -> AnyView {
    if bookings.is_empty() {
        return empty("No bookings found.");
    }
    view! {
        <ul class="space-y-4">
            {bookings
                .into_iter()
                .map(|b| {
                    view! {
                        <li class="card bg-base-100 shadow p-4 text-sm space-y-1">
                            <p><strong>"Date: "</strong>{date_or_dash(&b)}</p>
                            <p>
                                <strong>"Start: "</strong>{time_or_dash(b.start_time)}
                                " | "
                                <strong>"End: "</strong>{time_or_dash(b.end_time)}
                            </p>
                            <p><strong>"Status: "</strong>{b.status}</p>
                            <p><strong>"Payment: "</strong>{b.payment_status}</p>
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
    .into_any()
}

fn review_list(reviews: Vec<Review>) -> AnyView {
    if reviews.is_empty() {
        return empty("No reviews yet.");
    }
    view! {
        <ul class="space-y-4">
            {reviews
                .into_iter()
                .map(|r| {
                    let created = r.created_at.as_deref().map(display_created_at).unwrap_or_default();
                    view! {
                        <li class="card bg-base-100 shadow p-4 text-sm space-y-1">
                            <p class="flex items-center gap-1">
                                <strong>"Rating: "</strong>
                                <Star attr:class="h-4 w-4 text-warning" />
                                {format!("{}/5", r.rating)}
                            </p>
                            <p><strong>"Comment: "</strong>{r.comment}</p>
                            <p class="text-base-content/50">{created}</p>
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
    .into_any()
}

fn court_booking_list(bookings: Vec<CourtBooking>) -> AnyView {
    if bookings.is_empty() {
        return empty("No bookings for your courts yet.");
    }
    view! {
        <ul class="space-y-4">
            {bookings
                .into_iter()
                .map(|cb| {
                    let b = cb.booking;
                    view! {
                        <li class="card bg-base-100 shadow p-4 text-sm space-y-1">
                            <p>
                                <strong>"Court: "</strong>
                                {format!("{} ({})", cb.court_name, cb.sport_type)}
                            </p>
                            <p><strong>"Date: "</strong>{date_or_dash(&b)}</p>
                            <p>
                                <strong>"Time: "</strong>
                                {format!(
                                    "{} - {} ({})",
                                    time_or_dash(b.start_time),
                                    time_or_dash(b.end_time),
                                    b.duration,
                                )}
                            </p>
                            <p><strong>"Status: "</strong>{b.status.clone()}</p>
                            <p><strong>"Payment: "</strong>{b.payment_status.clone()}</p>
                            <p><strong>"Price: "</strong>{format_price(cb.price)}</p>
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
    .into_any()
}
