use crate::auth::{AuthFailure, signup, use_auth};
use crate::components::notification::use_notifier;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use quickcourt_shared::UserRole;
use quickcourt_shared::validate::{FieldErrors, SignupForm, format_phone, sanitize_phone_input};
use std::time::Duration;

/// 注册成功后跳转登录页前的停留时间
const REDIRECT_DELAY_MS: u64 = 2000;

/// 输入框定义：(字段名, 标签, 类型)
const TEXT_FIELDS: [(&str, &str, &str); 4] = [
    ("firstName", "First Name", "text"),
    ("lastName", "Last Name", "text"),
    ("email", "Email", "email"),
    ("password", "Password", "password"),
];

#[derive(Clone, Copy)]
struct SignupState {
    first_name: RwSignal<String>,
    last_name: RwSignal<String>,
    email: RwSignal<String>,
    password: RwSignal<String>,
    /// 只保存数字，展示时再格式化
    phone: RwSignal<String>,
    role: RwSignal<UserRole>,
}

impl SignupState {
    fn new() -> Self {
        Self {
            first_name: RwSignal::new(String::new()),
            last_name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            role: RwSignal::new(UserRole::User),
        }
    }

    fn text_field(&self, name: &str) -> RwSignal<String> {
        match name {
            "firstName" => self.first_name,
            "lastName" => self.last_name,
            "email" => self.email,
            _ => self.password,
        }
    }

    fn to_form(self) -> SignupForm {
        SignupForm {
            first_name: self.first_name.get_untracked(),
            last_name: self.last_name.get_untracked(),
            email: self.email.get_untracked(),
            password: self.password.get_untracked(),
            phone_number: self.phone.get_untracked(),
            role: self.role.get_untracked(),
        }
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let notifier = use_notifier();

    let state = SignupState::new();
    let field_errors = RwSignal::new(FieldErrors::new());
    let (submitting, set_submitting) = signal(false);
    let (server_error, set_server_error) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let form = state.to_form();
        set_submitting.set(true);
        set_server_error.set(None);

        spawn_local(async move {
            match signup(&auth, &form).await {
                Ok(()) => {
                    notifier.success("Account created successfully! Redirecting to login...");
                    set_timeout(
                        move || router.replace(AppRoute::Login),
                        Duration::from_millis(REDIRECT_DELAY_MS),
                    );
                }
                Err(AuthFailure::Invalid(errors)) => field_errors.set(errors.0),
                Err(AuthFailure::Rejected(message)) => set_server_error.set(Some(message)),
            }
            set_submitting.set(false);
        });
    };

    let error_for = move |name: &'static str| {
        move || {
            field_errors.with(|e| {
                e.get(name)
                    .map(|msg| view! { <p class="text-error text-xs mt-1">{msg.to_string()}</p> })
            })
        }
    };

    let text_inputs = TEXT_FIELDS
        .into_iter()
        .map(|(name, label, kind)| {
            let value = state.text_field(name);
            view! {
                <div class="form-control w-full">
                    <label class="label" for=name>
                        <span class="label-text">{label} <span class="text-error">" *"</span></span>
                    </label>
                    <input
                        id=name
                        type=kind
                        placeholder=format!("Enter your {}", label.to_lowercase())
                        class="input input-bordered w-full"
                        prop:value=value
                        on:input=move |ev| {
                            value.set(event_target_value(&ev));
                            field_errors.update(|e| e.clear(name));
                        }
                    />
                    {error_for(name)}
                </div>
            }
        })
        .collect_view();

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-2xl bg-base-100">
                <form class="card-body" on:submit=on_submit novalidate>
                    <h1 class="text-4xl font-bold uppercase text-center">"Sign Up"</h1>
                    <p class="text-center text-base-content/70 mb-4">"Create your account"</p>

                    {text_inputs}

                    <div class="form-control w-full">
                        <label class="label" for="phoneNumber">
                            <span class="label-text">"Phone Number" <span class="text-error">" *"</span></span>
                        </label>
                        <input
                            id="phoneNumber"
                            type="tel"
                            placeholder="Enter your phone number"
                            class="input input-bordered w-full"
                            prop:value=move || format_phone(&state.phone.get())
                            on:input=move |ev| {
                                state.phone.set(sanitize_phone_input(&event_target_value(&ev)));
                                field_errors.update(|e| e.clear("phoneNumber"));
                            }
                        />
                        {error_for("phoneNumber")}
                    </div>

                    <div class="form-control w-full">
                        <label class="label" for="role">
                            <span class="label-text">"Role" <span class="text-error">" *"</span></span>
                        </label>
                        <select
                            id="role"
                            class="select select-bordered w-full"
                            on:change=move |ev| {
                                let role = match event_target_value(&ev).as_str() {
                                    "OWNER" => UserRole::Owner,
                                    _ => UserRole::User,
                                };
                                state.role.set(role);
                            }
                        >
                            {[UserRole::Owner, UserRole::User]
                                .into_iter()
                                .map(|role| {
                                    view! {
                                        <option
                                            value=role.as_str()
                                            selected=move || state.role.get() == role
                                        >
                                            {role.label()}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                        {error_for("role")}
                    </div>

                    {move || {
                        server_error
                            .get()
                            .map(|msg| {
                                view! {
                                    <div role="alert" class="alert alert-error text-sm py-2 mt-2">
                                        <span>{msg}</span>
                                    </div>
                                }
                            })
                    }}

                    <button class="btn btn-primary mt-4" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Creating Account..." } else { "Sign Up" }}
                    </button>

                    <p class="text-center text-sm mt-4">
                        "Already have an account? "
                        <Link to=AppRoute::Login class="link link-primary">"Login here"</Link>
                    </p>
                </form>
            </div>
        </div>
    }
}
