//! 后台管理页
//!
//! 面板状态 (`AdminPanel`) 与数据 (`AdminData`) 分别放在两个信号里：
//! 切换标签、搜索、排序只改面板；写操作成功后整体重新加载数据。

use crate::auth::use_auth;
use crate::components::icons::{Pencil, Plus, RefreshCw, Search, Trash2};
use crate::components::notification::use_notifier;
use leptos::prelude::*;
use leptos::task::spawn_local;
use quickcourt_shared::admin::{
    AdminAction, AdminData, AdminModal, AdminPanel, AdminResource, AdminRow, AdminTab, FieldKind, FieldSpec,
    load_admin_data,
};
use quickcourt_shared::guard::RequestGuard;
use quickcourt_shared::stats::{DashboardStats, MONTHS};
use quickcourt_shared::{UserRole, format_price};

const LOAD_FAILED: &str = "Failed to load data. Please try again later.";

#[derive(Debug, Clone, PartialEq)]
enum DataState {
    Loading,
    Loaded(AdminData),
    Failed,
}

impl DataState {
    fn data(&self) -> Option<&AdminData> {
        match self {
            DataState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// 弹窗的形态；字段值变化不会改变它，输入时不重建弹窗
#[derive(Debug, Clone, PartialEq)]
enum ModalKind {
    Closed,
    Create,
    Edit,
    ConfirmDelete(String),
}

impl ModalKind {
    fn of(modal: &AdminModal) -> Self {
        match modal {
            AdminModal::Closed => ModalKind::Closed,
            AdminModal::Create { .. } => ModalKind::Create,
            AdminModal::Edit { .. } => ModalKind::Edit,
            AdminModal::ConfirmDelete { label, .. } => ModalKind::ConfirmDelete(label.clone()),
        }
    }
}

fn modal_value(panel: &AdminPanel, name: &str) -> String {
    match &panel.modal {
        AdminModal::Create { values } | AdminModal::Edit { values, .. } => {
            values.get(name).cloned().unwrap_or_default()
        }
        _ => String::new(),
    }
}

#[component]
pub fn AdminPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();

    let data = RwSignal::new(DataState::Loading);
    let panel = RwSignal::new(AdminPanel::default());

    let guard = StoredValue::new(RequestGuard::new());
    on_cleanup(move || guard.with_value(|g| g.invalidate()));

    let reload = move || {
        let ticket = guard.with_value(|g| g.issue());
        spawn_local(async move {
            let result = load_admin_data(&auth.gateway()).await;
            ticket.commit(|| match result {
                Ok(loaded) => {
                    tracing::debug!(users = loaded.users.len(), courts = loaded.courts.len(), "admin data loaded");
                    data.set(DataState::Loaded(loaded));
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to load admin data");
                    data.set(DataState::Failed);
                }
            });
        });
    };
    reload();

    let tab = Memo::new(move |_| panel.with(|p| p.tab));

    let on_submit = move || {
        let Some(action) = panel.try_update(|p| p.submit()).flatten() else {
            return;
        };
        spawn_local(async move {
            let result = action.execute(&auth.gateway()).await;
            panel.update(|p| p.finish_action(result.is_ok()));
            match result {
                Ok(()) => {
                    tracing::info!(resource = action.resource().label(), "admin action succeeded");
                    let verb = match action {
                        AdminAction::Delete { .. } => "deleted",
                        _ => "saved",
                    };
                    notifier.success(format!("{} {verb} successfully.", action.resource().singular()));
                    reload();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "admin action failed");
                    notifier.error(action.failure_message());
                }
            }
        });
    };

    view! {
        <div class="flex min-h-screen bg-base-200">
            <aside class="w-56 bg-base-100 p-4">
                <h1 class="text-xl font-bold mb-6">"QuickCourt Admin"</h1>
                <ul class="menu">
                    {AdminTab::ALL
                        .into_iter()
                        .map(|tab| {
                            view! {
                                <li>
                                    <a
                                        class:active=move || panel.with(|p| p.tab == tab)
                                        on:click=move |_| panel.update(|p| p.select_tab(tab))
                                    >
                                        {tab.label()}
                                    </a>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </aside>

            <main class="flex-1 p-6 overflow-x-auto">
                {move || match data.get() {
                    DataState::Loading => view! {
                        <div class="flex justify-center items-center h-64 gap-2">
                            <span class="loading loading-spinner"></span>
                            {move || if tab.get() == AdminTab::Dashboard {
                                "Loading dashboard..."
                            } else {
                                "Loading data..."
                            }}
                        </div>
                    }
                    .into_any(),
                    DataState::Failed => view! {
                        <div role="alert" class="alert alert-error flex-col items-start">
                            <h3 class="font-bold">"Error Loading Data"</h3>
                            <p>{LOAD_FAILED}</p>
                            <button class="btn btn-sm gap-2" on:click=move |_| reload()>
                                <RefreshCw attr:class="h-4 w-4" />
                                "Retry"
                            </button>
                        </div>
                    }
                    .into_any(),
                    DataState::Loaded(_) => view! {
                        {move || match tab.get() {
                            AdminTab::Dashboard => {
                                let stats = data.with(|d| d.data().map(DashboardStats::compute).unwrap_or_default());
                                view! { <Dashboard stats=stats /> }.into_any()
                            }
                            AdminTab::Resource(resource) => {
                                view! { <ResourceTable resource=resource data=data panel=panel /> }.into_any()
                            }
                        }}
                    }
                    .into_any(),
                }}
            </main>

            <AdminModalView data=data panel=panel on_submit=on_submit />
        </div>
    }
}

// =========================================================
// 仪表盘 (Dashboard)
// =========================================================

#[component]
fn Dashboard(stats: DashboardStats) -> impl IntoView {
    let cards = [
        ("Total Users", stats.total_users.to_string()),
        ("Total Facilities", stats.total_facilities.to_string()),
        ("Active Courts", stats.active_courts.to_string()),
        ("Total Bookings", stats.total_bookings.to_string()),
        ("Total Matches", stats.total_matches.to_string()),
        ("Total Reviews", stats.total_reviews.to_string()),
        ("Total Revenue", format_price(stats.total_revenue)),
    ];

    let monthly = |series: [u32; 12]| -> Vec<(String, f64)> {
        MONTHS
            .iter()
            .zip(series)
            .map(|(m, v)| (m.to_string(), f64::from(v)))
            .collect()
    };
    let by_month = monthly(stats.bookings_by_month);
    let growth = monthly(stats.user_growth);
    let revenue = stats.revenue_by_facility.clone();
    let sports: Vec<(String, f64)> = stats
        .bookings_by_sport
        .iter()
        .map(|(s, n)| (s.clone(), f64::from(*n)))
        .collect();

    view! {
        <h2 class="text-2xl font-bold mb-6">"Dashboard"</h2>
        <div class="grid grid-cols-2 lg:grid-cols-4 gap-4">
            {cards
                .into_iter()
                .map(|(title, value)| {
                    view! {
                        <div class="stat bg-base-100 rounded-box shadow">
                            <div class="stat-title">{title}</div>
                            <div class="stat-value text-2xl">{value}</div>
                        </div>
                    }
                })
                .collect_view()}
        </div>
        <div class="grid grid-cols-1 xl:grid-cols-2 gap-6 mt-8">
            <BarChart title="Bookings by Month" bars=by_month money=false />
            <BarChart title="User Growth" bars=growth money=false />
            <BarChart title="Revenue by Facility" bars=revenue money=true />
            <BarChart title="Sport Popularity" bars=sports money=false />
        </div>
    }
}

#[component]
fn BarChart(title: &'static str, bars: Vec<(String, f64)>, money: bool) -> impl IntoView {
    let max = bars.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);

    view! {
        <div class="card bg-base-100 shadow p-4">
            <h3 class="font-semibold mb-4">{title}</h3>
            {if bars.is_empty() {
                view! { <p class="text-base-content/50 text-sm">"No data"</p> }.into_any()
            } else {
                view! {
                    <div class="flex items-end gap-2 h-48">
                        {bars
                            .into_iter()
                            .map(|(label, value)| {
                                let pct = if max > 0.0 { value / max * 100.0 } else { 0.0 };
                                let shown = if money { format_price(value) } else { format!("{value}") };
                                view! {
                                    <div class="flex-1 flex flex-col items-center justify-end h-full">
                                        <span class="text-xs">{shown}</span>
                                        <div
                                            class="w-full bg-primary rounded-t"
                                            style=format!("height: {pct:.1}%")
                                        ></div>
                                        <span class="text-xs mt-1 truncate w-full text-center">{label}</span>
                                    </div>
                                }
                            })
                            .collect_view()}
                    </div>
                }
                .into_any()
            }}
        </div>
    }
}

// =========================================================
// 资源表格 (Resource Table)
// =========================================================

#[component]
fn ResourceTable(
    resource: AdminResource,
    data: RwSignal<DataState>,
    panel: RwSignal<AdminPanel>,
) -> impl IntoView {
    let editable = !resource.fields().is_empty();
    let rows = Memo::new(move |_| {
        let visible = data.with(|d| d.data().map(|d| panel.with(|p| p.visible_rows(d))));
        visible.unwrap_or_default()
    });
    let total = move || data.with(|d| d.data().map_or(0, |d| d.len_of(resource)));

    let sort_marker = move |column: usize| {
        move || {
            panel.with(|p| match p.sort {
                Some(s) if s.column == column => if s.ascending { " ▲" } else { " ▼" },
                _ => "",
            })
        }
    };

    view! {
        <div class="flex flex-wrap justify-between items-center gap-4 mb-4">
            <h2 class="text-2xl font-bold">
                {resource.label()}
                <span class="badge badge-neutral ml-2">{total}</span>
            </h2>
            <div class="flex gap-2">
                {resource
                    .searchable()
                    .then(|| {
                        view! {
                            <label class="input input-bordered input-sm flex items-center gap-2">
                                <Search attr:class="h-4 w-4 opacity-60" />
                                <input
                                    type="text"
                                    placeholder="Search..."
                                    prop:value=move || panel.with(|p| p.search.clone())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        panel.update(|p| p.search = value);
                                    }
                                />
                            </label>
                        }
                    })}
                {editable
                    .then(|| {
                        view! {
                            <button
                                class="btn btn-primary btn-sm gap-2"
                                on:click=move |_| {
                                    panel.update(|p| {
                                        p.open_create();
                                    })
                                }
                            >
                                <Plus attr:class="h-4 w-4" />
                                "Add New"
                            </button>
                        }
                    })}
            </div>
        </div>

        <div class="overflow-x-auto bg-base-100 rounded-box shadow">
            <table class="table table-zebra">
                <thead>
                    <tr>
                        {resource
                            .headers()
                            .iter()
                            .enumerate()
                            .map(|(column, header)| {
                                view! {
                                    <th
                                        class="cursor-pointer select-none"
                                        on:click=move |_| panel.update(|p| p.click_header(column))
                                    >
                                        {*header}
                                        {sort_marker(column)}
                                    </th>
                                }
                            })
                            .collect_view()}
                        <th>"Actions"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || rows.get()
                        key=|row| row.id.clone()
                        children=move |row| view! { <TableRow row=row editable=editable panel=panel /> }
                    />
                </tbody>
            </table>
        </div>
    }
}

#[component]
fn TableRow(row: AdminRow, editable: bool, panel: RwSignal<AdminPanel>) -> impl IntoView {
    let row = StoredValue::new(row);

    view! {
        <tr>
            {row
                .with_value(|r| r.cells.clone())
                .into_iter()
                .map(|cell| view! { <td>{cell}</td> })
                .collect_view()}
            <td class="flex gap-2">
                {editable
                    .then(|| {
                        view! {
                            <button
                                class="btn btn-ghost btn-xs"
                                title="Edit"
                                on:click=move |_| {
                                    row.with_value(|r| {
                                        panel.update(|p| {
                                            p.open_edit(r);
                                        })
                                    })
                                }
                            >
                                <Pencil attr:class="h-4 w-4" />
                            </button>
                        }
                    })}
                <button
                    class="btn btn-ghost btn-xs text-error"
                    title="Delete"
                    on:click=move |_| row.with_value(|r| panel.update(|p| p.request_delete(r)))
                >
                    <Trash2 attr:class="h-4 w-4" />
                </button>
            </td>
        </tr>
    }
}

// =========================================================
// 弹窗 (Modals)
// =========================================================

#[component]
fn AdminModalView<F>(data: RwSignal<DataState>, panel: RwSignal<AdminPanel>, on_submit: F) -> impl IntoView
where
    F: Fn() + Copy + Send + Sync + 'static,
{
    let close = move |_: leptos::ev::MouseEvent| panel.update(|p| p.close_modal());
    let shape = Memo::new(move |_| panel.with(|p| (ModalKind::of(&p.modal), p.resource())));

    move || {
        let (kind, resource) = shape.get();
        let resource = resource?;
        let body = match kind {
            ModalKind::Closed => return None,
            ModalKind::ConfirmDelete(label) => view! {
                <h3 class="font-bold text-lg">"Confirm Deletion"</h3>
                <p class="py-4">
                    {format!("Are you sure you want to delete this {}: {label}?", resource.singular().to_lowercase())}
                </p>
                <div class="modal-action">
                    <button class="btn" on:click=close>"Cancel"</button>
                    <button
                        class="btn btn-error"
                        disabled=move || panel.with(|p| p.in_flight)
                        on:click=move |_| on_submit()
                    >
                        "Delete"
                    </button>
                </div>
            }
            .into_any(),
            ModalKind::Create | ModalKind::Edit => {
                let title = if kind == ModalKind::Create {
                    format!("Add New {}", resource.singular())
                } else {
                    format!("Edit {}", resource.singular())
                };
                view! {
                    <h3 class="font-bold text-lg mb-4">{title}</h3>
                    <form
                        class="space-y-3"
                        on:submit=move |ev: leptos::ev::SubmitEvent| {
                            ev.prevent_default();
                            on_submit();
                        }
                    >
                        {resource
                            .fields()
                            .iter()
                            .map(|spec| view! { <FormField spec=*spec data=data panel=panel /> })
                            .collect_view()}
                        {move || {
                            panel
                                .with(|p| p.error.clone())
                                .map(|msg| view! { <p class="text-error text-sm">{msg}</p> })
                        }}
                        <div class="modal-action">
                            <button type="button" class="btn" on:click=close>"Cancel"</button>
                            <button
                                type="submit"
                                class="btn btn-primary"
                                disabled=move || panel.with(|p| p.in_flight)
                            >
                                "Save"
                            </button>
                        </div>
                    </form>
                }
                .into_any()
            }
        };
        Some(view! {
            <div class="modal modal-open">
                <div class="modal-box">{body}</div>
            </div>
        })
    }
}

#[component]
fn FormField(spec: FieldSpec, data: RwSignal<DataState>, panel: RwSignal<AdminPanel>) -> impl IntoView {
    let name = spec.name;
    let value = move || panel.with(|p| modal_value(p, name));
    let on_input = move |ev: leptos::ev::Event| {
        let v = event_target_value(&ev);
        panel.update(|p| p.set_field(name, v));
    };
    let label = if spec.required {
        format!("{} *", spec.label)
    } else {
        spec.label.to_string()
    };

    let control = match spec.kind {
        FieldKind::Role => view! {
            <select class="select select-bordered w-full" on:change=on_input>
                {[UserRole::User, UserRole::Owner, UserRole::Admin]
                    .into_iter()
                    .map(|role| {
                        view! {
                            <option
                                value=role.as_str()
                                selected=move || value().eq_ignore_ascii_case(role.as_str())
                            >
                                {role.as_str()}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        }
        .into_any(),
        FieldKind::Facility => {
            let options = data.with_untracked(|d| d.data().map(AdminData::facility_options).unwrap_or_default());
            view! {
                <select class="select select-bordered w-full" on:change=on_input>
                    <option value="">"Select a facility"</option>
                    {options
                        .into_iter()
                        .map(|(id, facility_name)| {
                            let option_id = id.clone();
                            view! {
                                <option value=id selected=move || value() == option_id>
                                    {facility_name}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            }
            .into_any()
        }
        FieldKind::Number => view! {
            <input type="number" step="any" class="input input-bordered w-full" prop:value=value on:input=on_input />
        }
        .into_any(),
        FieldKind::Email => view! {
            <input type="email" class="input input-bordered w-full" prop:value=value on:input=on_input />
        }
        .into_any(),
        FieldKind::Text => view! {
            <input type="text" class="input input-bordered w-full" prop:value=value on:input=on_input />
        }
        .into_any(),
    };

    view! {
        <div class="form-control w-full">
            <label class="label"><span class="label-text">{label}</span></label>
            {control}
        </div>
    }
}
