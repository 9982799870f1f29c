use crate::auth::use_auth;
use leptos::prelude::*;
use quickcourt_shared::validate::format_phone;
use quickcourt_shared::{User, UserRole};

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();

    view! {
        <div class="container mx-auto px-4 py-8">
            <div class="max-w-4xl mx-auto">
                <h1 class="text-3xl font-bold mb-8">"My Profile"</h1>
                <div class="grid grid-cols-1 lg:grid-cols-2 gap-8">
                    {move || match auth.user() {
                        Some(user) => view! { <UserProfileCard user=user /> }.into_any(),
                        None => view! {
                            <div class="card bg-base-100 p-6">
                                <p class="text-base-content/60">"No user data available"</p>
                            </div>
                        }
                        .into_any(),
                    }}
                </div>
            </div>
        </div>
    }
}

#[component]
fn UserProfileCard(user: User) -> impl IntoView {
    let badge = match user.role {
        UserRole::Owner => "badge badge-success mt-3",
        _ => "badge badge-info mt-3",
    };
    let account_type = match user.role {
        UserRole::User => "Regular User",
        role => role.label(),
    };
    // 所有者统计设施数，普通用户统计预订数
    let (stat_value, stat_label) = if user.is_owner() {
        (user.owned_facilities.len(), "Facilities")
    } else {
        (user.bookings.len(), "Bookings")
    };
    let full_name = user.full_name();

    view! {
        <div class="card bg-base-100 shadow-xl p-6">
            <div class="text-center mb-6">
                <div class="avatar placeholder">
                    <div class="bg-primary text-primary-content w-24 rounded-full">
                        <span class="text-3xl font-bold">{user.initial().to_string()}</span>
                    </div>
                </div>
                <h2 class="text-2xl font-bold mt-4">{full_name.clone()}</h2>
                <p class="text-base-content/60 mt-1">{user.email.clone()}</p>
                <span class=badge>{user.role.label()}</span>
            </div>

            <div class="space-y-4">
                <Detail label="Full Name" value=full_name />
                <Detail label="Email" value=user.email.clone() />
                {user
                    .phone_number
                    .as_deref()
                    .filter(|p| !p.is_empty())
                    .map(|p| view! { <Detail label="Phone Number" value=format_phone(p) /> })}
                <Detail label="Account Type" value=account_type.to_string() />
                <Detail label="User ID" value=user.id.clone() />
            </div>

            <div class="stats mt-6 border-t border-base-300 pt-6">
                <div class="stat place-items-center">
                    <div class="stat-value text-success">{stat_value}</div>
                    <div class="stat-desc">{stat_label}</div>
                </div>
                <div class="stat place-items-center">
                    <div class="stat-value text-info">{user.reviews.len()}</div>
                    <div class="stat-desc">"Reviews"</div>
                </div>
            </div>
        </div>
    }
}

#[component]
fn Detail(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div>
            <p class="text-sm text-base-content/60">{label}</p>
            <p class="font-medium break-all">{value}</p>
        </div>
    }
}
