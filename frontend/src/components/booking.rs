//! 预订页
//!
//! 表单状态全部在 `BookingForm` 中；组件只负责把输入事件转成状态迁移，
//! 以及在 `Submitting` 期间发出唯一一次请求。

use crate::auth::use_auth;
use crate::components::icons::{MapPin, Minus, Plus};
use crate::components::notification::use_notifier;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use quickcourt_shared::booking::{BookingForm, SubmitOutcome, SubmitStart};
use quickcourt_shared::browse::{CourtDetail, format_rating, load_court_detail};
use quickcourt_shared::guard::RequestGuard;
use quickcourt_shared::{SPORTS, format_price};

#[component]
pub fn BookingPage(court_id: String) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let notifier = use_notifier();

    let form = RwSignal::new(BookingForm::new());
    let detail = RwSignal::new(Option::<CourtDetail>::None);
    let court_id = StoredValue::new(court_id);

    let guard = RequestGuard::new();
    let ticket = guard.issue();
    on_cleanup(move || guard.invalidate());

    spawn_local(async move {
        match load_court_detail(&auth.gateway(), &court_id.get_value()).await {
            Ok(d) => {
                ticket.commit(|| detail.set(Some(d)));
            }
            Err(e) => tracing::error!(error = %e, "failed to load court for booking"),
        }
    });

    let price_per_hour = move || detail.with(|d| d.as_ref().map_or(0.0, |d| d.court.price_per_hour));

    let on_book = move |_| {
        let Some(user) = auth.user_untracked() else {
            router.navigate_to(AppRoute::Login);
            return;
        };
        let start = form
            .try_update(|f| f.begin_submit(&user.id, &court_id.get_value()))
            .unwrap_or(SubmitStart::Ignored);
        let SubmitStart::Ready(request) = start else {
            return;
        };

        spawn_local(async move {
            let result = auth.gateway().create_booking(&request).await;
            let outcome = form
                .try_update(|f| f.finish(result))
                .unwrap_or(SubmitOutcome::Ignored);
            match outcome {
                SubmitOutcome::Navigate { court_id } => {
                    tracing::info!(%court_id, "booking confirmed");
                    notifier.success("Booking successful!");
                    router.replace(AppRoute::CourtDetail(court_id));
                }
                SubmitOutcome::Failed => notifier.error("Booking failed. Try again!"),
                SubmitOutcome::Ignored | SubmitOutcome::Invalid => {}
            }
        });
    };

    let submitting = move || form.with(|f| f.is_submitting());

    view! {
        <div class="max-w-2xl mx-auto mt-10 mb-10 card bg-base-100 shadow-xl">
            <div class="card-body">
                <h1 class="text-3xl font-bold mb-4">"Court Booking"</h1>

                {move || {
                    detail.with(|d| {
                        d.as_ref().map(|d| {
                            let name = d
                                .facility
                                .as_ref()
                                .map(|f| f.name.clone())
                                .unwrap_or_else(|| d.court.name.clone());
                            let address = d
                                .facility
                                .as_ref()
                                .and_then(|f| f.address.clone())
                                .unwrap_or_default();
                            let rating = format!(
                                "{} ({} reviews)",
                                format_rating(d.average_rating()),
                                d.reviews.len(),
                            );
                            view! {
                                <div class="mb-4">
                                    <h2 class="text-xl font-semibold">{name}</h2>
                                    <p class="flex items-center gap-2 text-base-content/60">
                                        <MapPin attr:class="h-4 w-4" />
                                        {address}
                                        <span class="text-warning">{rating}</span>
                                    </p>
                                </div>
                            }
                        })
                    })
                }}

                {move || {
                    form.with(|f| f.error().map(str::to_string))
                        .map(|msg| {
                            view! {
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{msg}</span>
                                    <button
                                        class="btn btn-ghost btn-xs"
                                        on:click=move |_| form.update(|f| f.dismiss_error())
                                    >
                                        "✕"
                                    </button>
                                </div>
                            }
                        })
                }}

                <label class="label" for="sport"><span class="label-text">"Sport"</span></label>
                <select
                    id="sport"
                    class="select select-bordered w-full"
                    disabled=submitting
                    on:change=move |ev| form.update(|f| f.set_sport(&event_target_value(&ev)))
                >
                    {SPORTS
                        .into_iter()
                        .map(|sport| {
                            view! {
                                <option value=sport selected=move || form.with(|f| f.sport() == sport)>
                                    {sport}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>

                <label class="label" for="date"><span class="label-text">"Date"</span></label>
                <input
                    id="date"
                    type="date"
                    class="input input-bordered w-full"
                    disabled=submitting
                    on:change=move |ev| form.update(|f| f.set_date_input(&event_target_value(&ev)))
                />

                <label class="label" for="start"><span class="label-text">"Start Time"</span></label>
                <input
                    id="start"
                    type="time"
                    class="input input-bordered w-full"
                    disabled=submitting
                    on:change=move |ev| form.update(|f| f.set_start_input(&event_target_value(&ev)))
                />

                <label class="label"><span class="label-text">"Duration (minutes)"</span></label>
                <div class="flex items-center gap-4">
                    <button
                        class="btn btn-error btn-sm"
                        disabled=submitting
                        on:click=move |_| form.update(|f| f.decrement_duration())
                    >
                        <Minus attr:class="h-4 w-4" />
                    </button>
                    <span class="text-lg">{move || form.with(|f| f.duration().to_string())}</span>
                    <button
                        class="btn btn-success btn-sm"
                        disabled=submitting
                        on:click=move |_| form.update(|f| f.increment_duration())
                    >
                        <Plus attr:class="h-4 w-4" />
                    </button>
                    {move || {
                        form.with(|f| f.end_time_preview())
                            .map(|end| {
                                view! {
                                    <span class="text-sm text-base-content/60">
                                        {format!("Ends at {}", end.hhmm())}
                                    </span>
                                }
                            })
                    }}
                </div>

                <label class="label"><span class="label-text">"Court"</span></label>
                <select class="select select-bordered w-full" disabled>
                    <option>
                        {move || {
                            detail.with(|d| {
                                d.as_ref()
                                    .map(|d| d.court.name.clone())
                                    .unwrap_or_else(|| "Court".to_string())
                            })
                        }}
                    </option>
                </select>

                <button class="btn btn-success w-full mt-6" disabled=submitting on:click=on_book>
                    {move || {
                        if submitting() {
                            "Booking...".to_string()
                        } else {
                            let total = form.with(|f| f.price_preview(price_per_hour()));
                            format!("Continue to Payment - {}", format_price(total))
                        }
                    }}
                </button>
            </div>
        </div>
    }
}
