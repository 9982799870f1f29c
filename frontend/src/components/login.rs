use crate::auth::{AuthFailure, LoginOutcome, login, send_otp, use_auth};
use crate::components::icons::ShieldCheck;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use quickcourt_shared::validate::{FieldErrors, LoginForm};

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let field_errors = RwSignal::new(FieldErrors::new());

    let is_loading = Signal::derive(move || auth.is_loading());
    let server_error = Signal::derive(move || auth.error());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if is_loading.get_untracked() {
            return;
        }
        let form = LoginForm {
            email: email.get_untracked(),
            password: password.get_untracked(),
        };

        spawn_local(async move {
            match login(&auth, &form).await {
                Ok(LoginOutcome::Verified) => {
                    field_errors.set(FieldErrors::new());
                    router.replace(AppRoute::Home);
                }
                Ok(LoginOutcome::NeedsOtp { email }) => {
                    field_errors.set(FieldErrors::new());
                    tracing::info!("user not verified, redirecting to otp");
                    router.replace(AppRoute::Otp);
                    if let Err(e) = send_otp(&auth, &email).await {
                        tracing::warn!(error = %e, "initial otp request failed");
                    }
                }
                Err(AuthFailure::Invalid(errors)) => field_errors.set(errors.0),
                Err(AuthFailure::Rejected(_)) => {}
            }
        });
    };

    let field_error = move |name: &'static str| {
        move || {
            field_errors.with(|e| {
                e.get(name)
                    .map(|msg| view! { <span class="text-error text-sm mt-1">{msg.to_string()}</span> })
            })
        }
    };

    let on_input = move |signal: RwSignal<String>, name: &'static str| {
        move |ev: leptos::ev::Event| {
            signal.set(event_target_value(&ev));
            field_errors.update(|e| e.clear(name));
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <ShieldCheck attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Quick Court"</h1>
                        <p class="text-base-content/70">"Sign in to book your next game"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit novalidate>
                        {move || {
                            server_error
                                .get()
                                .map(|msg| {
                                    view! {
                                        <div role="alert" class="alert alert-error text-sm py-2">
                                            <span>{msg}</span>
                                        </div>
                                    }
                                })
                        }}

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=on_input(email, "email")
                                prop:value=email
                                class="input input-bordered"
                            />
                            {field_error("email")}
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=on_input(password, "password")
                                prop:value=password
                                class="input input-bordered"
                            />
                            {field_error("password")}
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_loading.get()>
                                {move || {
                                    if is_loading.get() {
                                        view! {
                                            <span class="loading loading-spinner"></span>
                                            "Signing in..."
                                        }
                                            .into_any()
                                    } else {
                                        "Login".into_any()
                                    }
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Don't have an account? "
                            <Link to=AppRoute::Signup class="link link-primary">"Sign up"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
