use crate::auth::use_auth;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use quickcourt_shared::validate::CourtForm;
use quickcourt_shared::{Court, SPORTS};

/// 表单上方的提示条
#[derive(Debug, Clone, PartialEq)]
enum Banner {
    Error(String),
    Success(&'static str),
}

#[component]
pub fn CreateCourtPage(facility_id: String) -> impl IntoView {
    let auth = use_auth();
    let facility_id = StoredValue::new(facility_id);

    let form = RwSignal::new(CourtForm::default());
    let banner = RwSignal::new(Option::<Banner>::None);
    let submitting = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        banner.set(None);

        let request = match form.with_untracked(|f| f.validate(Some(&facility_id.get_value()))) {
            Ok(request) => request,
            Err(errors) => {
                // 一次只提示一条，按表单顺序
                let fields = errors.fields();
                let message = ["name", "pricePerHour", "facilityId"]
                    .into_iter()
                    .find_map(|name| fields.get(name))
                    .or_else(|| fields.first())
                    .unwrap_or_default()
                    .to_string();
                banner.set(Some(Banner::Error(message)));
                return;
            }
        };
        submitting.set(true);

        spawn_local(async move {
            match auth.gateway().create::<Court, _>(&request).await {
                Ok(_) => {
                    tracing::info!(facility_id = %request.facility_id, name = %request.name, "court created");
                    banner.set(Some(Banner::Success("Court created successfully!")));
                    // 保留运动类型与营业时间，方便连续创建
                    form.update(|f| {
                        f.name.clear();
                        f.price_per_hour.clear();
                        f.photo_url.clear();
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to create court");
                    banner.set(Some(Banner::Error(e.user_message())));
                }
            }
            submitting.set(false);
        });
    };

    view! {
        <div class="min-h-screen flex items-center justify-center p-4 bg-base-200">
            <div class="card w-full max-w-md bg-base-100 shadow-2xl">
                <form class="card-body gap-4" on:submit=on_submit novalidate>
                    <h2 class="text-3xl font-bold text-center">"Create a Court"</h2>

                    {move || {
                        banner
                            .get()
                            .map(|b| match b {
                                Banner::Error(msg) => view! {
                                    <div role="alert" class="alert alert-error text-sm"><span>{msg}</span></div>
                                }
                                .into_any(),
                                Banner::Success(msg) => view! {
                                    <div role="alert" class="alert alert-success text-sm"><span>{msg}</span></div>
                                }
                                .into_any(),
                            })
                    }}

                    <input
                        type="text"
                        placeholder="Court Name"
                        class="input input-bordered w-full"
                        prop:value=move || form.with(|f| f.name.clone())
                        on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                    />
                    <select
                        class="select select-bordered w-full"
                        on:change=move |ev| form.update(|f| f.sport_type = event_target_value(&ev))
                    >
                        {SPORTS
                            .into_iter()
                            .map(|sport| {
                                view! {
                                    <option value=sport selected=move || form.with(|f| f.sport_type == sport)>
                                        {sport}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                    <input
                        type="number"
                        min="0"
                        step="any"
                        placeholder="Price Per Hour"
                        class="input input-bordered w-full"
                        prop:value=move || form.with(|f| f.price_per_hour.clone())
                        on:input=move |ev| form.update(|f| f.price_per_hour = event_target_value(&ev))
                    />
                    <input
                        type="text"
                        placeholder="Operating Hours (e.g., 08:00-20:00)"
                        class="input input-bordered w-full"
                        prop:value=move || form.with(|f| f.operating_hours.clone())
                        on:input=move |ev| form.update(|f| f.operating_hours = event_target_value(&ev))
                    />
                    <input
                        type="url"
                        placeholder="Photo URL (optional)"
                        class="input input-bordered w-full"
                        prop:value=move || form.with(|f| f.photo_url.clone())
                        on:input=move |ev| form.update(|f| f.photo_url = event_target_value(&ev))
                    />

                    <button type="submit" class="btn btn-success w-full" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Creating..." } else { "Create Court" }}
                    </button>
                    <Link to=AppRoute::MyFacilities class="link text-center text-sm">"Back to My Venues"</Link>
                </form>
            </div>
        </div>
    }
}
