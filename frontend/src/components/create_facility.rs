use crate::auth::use_auth;
use crate::components::notification::use_notifier;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use quickcourt_shared::Facility;
use quickcourt_shared::validate::{FacilityForm, FieldErrors};

/// 输入框种类
#[derive(Clone, Copy, PartialEq)]
enum InputKind {
    Text,
    TextArea,
    Coordinate,
}

/// (字段名, 标签, 种类)
const FIELDS: [(&str, &str, InputKind); 8] = [
    ("name", "Facility Name", InputKind::Text),
    ("description", "Description", InputKind::TextArea),
    ("address", "Address", InputKind::Text),
    ("city", "City", InputKind::Text),
    ("state", "State", InputKind::Text),
    ("zipCode", "Zip Code", InputKind::Text),
    ("latitude", "Latitude", InputKind::Coordinate),
    ("longitude", "Longitude", InputKind::Coordinate),
];

fn field_ref<'a>(form: &'a FacilityForm, name: &str) -> &'a str {
    match name {
        "name" => &form.name,
        "description" => &form.description,
        "address" => &form.address,
        "city" => &form.city,
        "state" => &form.state,
        "zipCode" => &form.zip_code,
        "latitude" => &form.latitude,
        _ => &form.longitude,
    }
}

fn field_mut<'a>(form: &'a mut FacilityForm, name: &str) -> &'a mut String {
    match name {
        "name" => &mut form.name,
        "description" => &mut form.description,
        "address" => &mut form.address,
        "city" => &mut form.city,
        "state" => &mut form.state,
        "zipCode" => &mut form.zip_code,
        "latitude" => &mut form.latitude,
        _ => &mut form.longitude,
    }
}

#[component]
pub fn CreateFacilityPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let notifier = use_notifier();

    let form = RwSignal::new(FacilityForm::default());
    let field_errors = RwSignal::new(FieldErrors::new());
    let submitting = RwSignal::new(false);
    let server_error = RwSignal::new(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let owner_id = auth.user_untracked().map(|u| u.id);
        let request = match form.with_untracked(|f| f.validate(owner_id.as_deref())) {
            Ok(request) => request,
            Err(errors) => {
                field_errors.set(errors.0);
                return;
            }
        };
        field_errors.set(FieldErrors::new());
        submitting.set(true);
        server_error.set(None);

        spawn_local(async move {
            match auth.gateway().create::<Facility, _>(&request).await {
                Ok(_) => {
                    tracing::info!(name = %request.name, "facility created");
                    notifier.success("Facility created successfully!");
                    router.replace(AppRoute::MyFacilities);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to create facility");
                    server_error.set(Some(e.user_message()));
                }
            }
            submitting.set(false);
        });
    };

    let inputs = FIELDS
        .into_iter()
        .map(|(name, label, kind)| {
            let value = move || form.with(|f| field_ref(f, name).to_string());
            let on_input = move |ev: leptos::ev::Event| {
                let v = event_target_value(&ev);
                form.update(|f| *field_mut(f, name) = v);
                field_errors.update(|e| e.clear(name));
            };
            let placeholder = format!("Enter {}", label.to_lowercase());
            let input = match kind {
                InputKind::TextArea => view! {
                    <textarea
                        id=name
                        class="textarea textarea-bordered w-full"
                        maxlength="500"
                        placeholder=placeholder
                        prop:value=value
                        on:input=on_input
                    ></textarea>
                }
                .into_any(),
                InputKind::Coordinate => view! {
                    <input
                        id=name
                        type="number"
                        step="0.000001"
                        class="input input-bordered w-full"
                        placeholder=placeholder
                        prop:value=value
                        on:input=on_input
                    />
                }
                .into_any(),
                InputKind::Text => view! {
                    <input
                        id=name
                        type="text"
                        class="input input-bordered w-full"
                        placeholder=placeholder
                        prop:value=value
                        on:input=on_input
                    />
                }
                .into_any(),
            };
            let wrapper = if kind == InputKind::TextArea {
                "form-control w-full md:col-span-2"
            } else {
                "form-control w-full"
            };
            view! {
                <div class=wrapper>
                    <label class="label" for=name><span class="label-text">{label}</span></label>
                    {input}
                    {move || {
                        field_errors.with(|e| {
                            e.get(name)
                                .map(|msg| view! { <p class="text-error text-xs mt-1">{msg.to_string()}</p> })
                        })
                    }}
                </div>
            }
        })
        .collect_view();

    view! {
        <div class="max-w-3xl mx-auto my-10 card bg-base-100 shadow-xl">
            <div class="bg-success text-success-content p-6 rounded-t-2xl">
                <h1 class="text-2xl md:text-3xl font-bold">"Create New Facility"</h1>
                <p class="mt-2">"Register your sports facility with QuickCourt"</p>
            </div>
            <form class="card-body" on:submit=on_submit novalidate>
                <div class="grid grid-cols-1 md:grid-cols-2 gap-4">{inputs}</div>
                <p class="text-sm text-base-content/60 mt-2">
                    <span class="font-semibold text-success">"Note: "</span>
                    "Latitude and longitude are optional."
                </p>

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

                <div class="flex justify-end gap-3 mt-4">
                    <button
                        type="button"
                        class="btn btn-ghost"
                        on:click=move |_| router.navigate_to(AppRoute::MyFacilities)
                    >
                        "Cancel"
                    </button>
                    <button type="submit" class="btn btn-success" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Creating..." } else { "Create Facility" }}
                    </button>
                </div>
            </form>
        </div>
    }
}
