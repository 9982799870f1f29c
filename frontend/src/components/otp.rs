use crate::auth::{send_otp, use_auth, use_config, verify_otp};
use crate::components::icons::RefreshCw;
use crate::components::notification::use_notifier;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use crate::web::tick_every_second;
use leptos::prelude::*;
use leptos::task::spawn_local;
use quickcourt_shared::otp::ResendCountdown;
use quickcourt_shared::validate::{OTP_LENGTH, otp_complete, sanitize_otp_input};

#[component]
pub fn OtpPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let notifier = use_notifier();
    let config = use_config();

    // 没有待验证的用户就回登录页
    let Some(email) = auth.user_untracked().map(|u| u.email) else {
        Effect::new(move |_| router.replace(AppRoute::Login));
        return ().into_any();
    };
    let email = StoredValue::new(email);

    let otp = RwSignal::new(String::new());
    let error = RwSignal::new(Option::<String>::None);
    let verifying = RwSignal::new(false);
    let resending = RwSignal::new(false);
    let countdown = RwSignal::new(ResendCountdown::new(config.otp_resend_secs));

    tick_every_second(move || countdown.update(|c| c.tick()));

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let code = otp.get_untracked();
        if !otp_complete(&code) {
            error.set(Some(format!("Please enter a valid {OTP_LENGTH}-digit OTP")));
            return;
        }
        error.set(None);
        verifying.set(true);

        spawn_local(async move {
            let result = verify_otp(&auth, &email.get_value(), &code).await;
            verifying.set(false);
            match result {
                Ok(()) => router.replace(AppRoute::Home),
                Err(message) => error.set(Some(message)),
            }
        });
    };

    let on_resend = move |_| {
        if !countdown.get_untracked().can_resend() || resending.get_untracked() {
            return;
        }
        resending.set(true);
        error.set(None);

        spawn_local(async move {
            match send_otp(&auth, &email.get_value()).await {
                Ok(()) => {
                    countdown.update(|c| {
                        c.restart();
                    });
                    otp.set(String::new());
                    notifier.success("OTP sent successfully!");
                }
                Err(message) => error.set(Some(message)),
            }
            resending.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-2xl bg-base-100">
                <div class="card-body">
                    <div class="text-center mb-4">
                        <h2 class="text-2xl font-bold mb-2">"Verify OTP"</h2>
                        <p class="text-base-content/70">
                            {format!("We sent a {OTP_LENGTH}-digit code to ")}
                            <span class="font-medium">{email.get_value()}</span>
                        </p>
                    </div>

                    <form on:submit=on_submit novalidate>
                        <input
                            type="text"
                            inputmode="numeric"
                            autocomplete="one-time-code"
                            maxlength=OTP_LENGTH.to_string()
                            placeholder="000000"
                            class="input input-bordered w-full text-center text-2xl tracking-widest"
                            prop:value=otp
                            on:input=move |ev| {
                                otp.set(sanitize_otp_input(&event_target_value(&ev)));
                                error.set(None);
                            }
                        />
                        <p class="text-xs text-base-content/50 mt-1 text-center">
                            {format!("Enter the {OTP_LENGTH}-digit code")}
                        </p>

                        {move || {
                            error
                                .get()
                                .map(|msg| {
                                    view! {
                                        <div role="alert" class="alert alert-error text-sm py-2 mt-4">
                                            <span>{msg}</span>
                                        </div>
                                    }
                                })
                        }}

                        <button
                            type="submit"
                            class="btn btn-primary w-full mt-4"
                            disabled=move || !otp.with(|o| otp_complete(o)) || verifying.get()
                        >
                            {move || if verifying.get() { "Verifying..." } else { "Verify OTP" }}
                        </button>
                    </form>

                    <div class="mt-6 text-center">
                        <p class="text-sm text-base-content/70 mb-2">"Didn't receive the code?"</p>
                        <button
                            class="btn btn-link gap-2"
                            disabled=move || !countdown.get().can_resend() || resending.get()
                            on:click=on_resend
                        >
                            <RefreshCw attr:class="h-4 w-4" />
                            {move || {
                                let c = countdown.get();
                                if resending.get() {
                                    "Sending...".to_string()
                                } else if c.can_resend() {
                                    "Resend OTP".to_string()
                                } else {
                                    format!("Resend in {}s", c.remaining())
                                }
                            }}
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
    .into_any()
}
