//! QuickCourt 前端 (Leptos CSR)
//!
//! 页面在 `components`，会话上下文在 `auth`，浏览器适配在 `web`。
//! 业务逻辑全部在 `quickcourt-shared` 中，这里只做渲染与浏览器适配。

mod auth;
mod components {
    pub mod admin;
    pub mod booking;
    pub mod court_detail;
    pub mod courts;
    pub mod create_court;
    pub mod create_facility;
    pub mod home;
    mod icons;
    pub mod login;
    pub mod my_bookings;
    pub mod my_facilities;
    pub mod nav_bar;
    pub mod notification;
    pub mod otp;
    pub mod profile;
    pub mod signup;
}

use crate::auth::AuthContext;
use crate::components::admin::AdminPage;
use crate::components::booking::BookingPage;
use crate::components::court_detail::CourtDetailPage;
use crate::components::courts::CourtsPage;
use crate::components::create_court::CreateCourtPage;
use crate::components::create_facility::CreateFacilityPage;
use crate::components::home::HomePage;
use crate::components::login::LoginPage;
use crate::components::my_bookings::MyBookingsPage;
use crate::components::my_facilities::MyFacilitiesPage;
use crate::components::nav_bar::NavBar;
use crate::components::notification::{NotificationToast, Notifier};
use crate::components::otp::OtpPage;
use crate::components::profile::ProfilePage;
use crate::components::signup::SignupPage;

use leptos::prelude::*;
use quickcourt_shared::config::{API_BASE_VAR, ClientConfig, LOG_LEVEL_VAR, PAGE_SIZE_VAR};

// 直接基于 web_sys 的浏览器适配：fetch、LocalStorage、定时器、控制台日志与路由
pub mod web {
    mod console;
    mod http;
    pub mod route;
    pub mod router;
    mod storage;
    mod timer;

    pub use console::init_logging;
    pub use http::WebTransport;
    pub use storage::BrowserStorage;
    pub use timer::tick_every_second;
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 读取编译期环境变量，缺省项使用默认值
pub fn load_config() -> ClientConfig {
    ClientConfig::from_lookup(|key| {
        match key {
            API_BASE_VAR => option_env!("QUICKCOURT_API_BASE"),
            LOG_LEVEL_VAR => option_env!("QUICKCOURT_LOG"),
            PAGE_SIZE_VAR => option_env!("QUICKCOURT_PAGE_SIZE"),
            _ => None,
        }
        .map(str::to_string)
    })
}

/// 带参数的页面按参数重建，参数变化时旧页面的 `on_cleanup` 会作废未完成的请求
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Signup => view! { <SignupPage /> }.into_any(),
        AppRoute::Otp => view! { <OtpPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::Courts => view! { <CourtsPage /> }.into_any(),
        AppRoute::CourtDetail(id) => view! { <CourtDetailPage court_id=id /> }.into_any(),
        AppRoute::Booking(id) => view! { <BookingPage court_id=id /> }.into_any(),
        AppRoute::MyBookings => view! { <MyBookingsPage /> }.into_any(),
        AppRoute::MyFacilities => view! { <MyFacilitiesPage /> }.into_any(),
        AppRoute::CreateFacility => view! { <CreateFacilityPage /> }.into_any(),
        AppRoute::CreateCourt(facility_id) => {
            view! { <CreateCourtPage facility_id=facility_id /> }.into_any()
        }
        AppRoute::Admin => view! { <AdminPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App(config: ClientConfig) -> impl IntoView {
    // 1. 创建认证上下文（从 LocalStorage 恢复会话）
    let auth_ctx = AuthContext::new(&config);
    provide_context(auth_ctx);

    // 2. 全局通知
    let notifier = Notifier::new(config.notification_ms);
    provide_context(notifier);
    provide_context(config);

    // 3. 获取认证状态信号，用于注入路由服务
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        <NotificationToast />
        <Router is_authenticated=is_authenticated>
            <NavBar />
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
