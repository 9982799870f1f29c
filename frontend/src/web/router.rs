//! History API 路由
//!
//! 当前页面由一个 `AppRoute` 信号决定。每次跳转（链接点击、浏览器后退、
//! 登录状态变化）都先经过 `guard`，再写入地址栏和信号。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

/// 写入地址栏的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    Push,
    Replace,
}

fn location_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn write_history(route: &AppRoute, mode: HistoryMode) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let path = route.to_path();
    let result = match mode {
        HistoryMode::Push => history.push_state_with_url(&JsValue::NULL, "", Some(&path)),
        HistoryMode::Replace => history.replace_state_with_url(&JsValue::NULL, "", Some(&path)),
    };
    if result.is_err() {
        tracing::warn!(%path, "history update rejected");
    }
}

/// 守卫：返回实际应当进入的路由
fn guard(target: AppRoute, is_auth: bool) -> AppRoute {
    if target.requires_auth() && !is_auth {
        tracing::info!(route = %target, "access denied, redirecting to login");
        return AppRoute::auth_failure_redirect();
    }
    if target.should_redirect_when_authenticated() && is_auth {
        tracing::debug!(route = %target, "already authenticated, redirecting home");
        return AppRoute::auth_success_redirect();
    }
    target
}

/// 地址栏里的路由经守卫修正后，必要时用 replace 改写地址栏
fn resolve_location(is_auth: bool) -> AppRoute {
    let requested = AppRoute::from_path(&location_path());
    let route = guard(requested.clone(), is_auth);
    if route != requested {
        write_history(&route, HistoryMode::Replace);
    }
    route
}

/// 页面间跳转的唯一入口，`Copy`，可直接放进事件闭包
#[derive(Clone, Copy)]
pub struct RouterService {
    route: RwSignal<AppRoute>,
    is_authenticated: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>) -> Self {
        // 刷新受保护页面时直接落到登录页
        let initial = resolve_location(is_authenticated.get_untracked());
        Self {
            route: RwSignal::new(initial),
            is_authenticated,
        }
    }

    /// 新增一条历史记录
    pub fn navigate_to(&self, target: AppRoute) {
        self.go(target, HistoryMode::Push);
    }

    /// 替换当前历史记录，表单提交成功后使用，后退不会回到表单
    pub fn replace(&self, target: AppRoute) {
        self.go(target, HistoryMode::Replace);
    }

    fn go(&self, target: AppRoute, mode: HistoryMode) {
        let route = guard(target, self.is_authenticated.get_untracked());
        write_history(&route, mode);
        self.route.set(route);
    }

    fn listen_popstate(&self) {
        let route = self.route;
        let is_authenticated = self.is_authenticated;

        let on_popstate = Closure::<dyn Fn()>::new(move || {
            route.set(resolve_location(is_authenticated.get_untracked()));
        });

        if let Some(window) = web_sys::window()
            && window
                .add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref())
                .is_err()
        {
            tracing::warn!("failed to register popstate listener");
        }

        // 监听器与页面同寿命
        on_popstate.forget();
    }

    /// 登录或登出后重新检查当前页面
    fn follow_auth_changes(&self) {
        let route = self.route;
        let is_authenticated = self.is_authenticated;

        Effect::new(move |_| {
            let is_auth = is_authenticated.get();
            let current = route.get_untracked();
            let redirect = guard(current.clone(), is_auth);
            if redirect != current {
                tracing::info!(from = %current, to = %redirect, "auth state changed, redirecting");
                write_history(&redirect, HistoryMode::Push);
                route.set(redirect);
            }
        });
    }
}

pub fn use_router() -> RouterService {
    use_context::<RouterService>().expect("RouterService should be provided by <Router>")
}

// ============================================================================
// 组件
// ============================================================================

/// 在子树中提供 `RouterService`，放在 App 根部
#[component]
pub fn Router(is_authenticated: Signal<bool>, children: Children) -> impl IntoView {
    let router = RouterService::new(is_authenticated);
    router.listen_popstate();
    router.follow_auth_changes();
    provide_context(router);

    children()
}

/// 按当前路由渲染页面
#[component]
pub fn RouterOutlet(matcher: fn(AppRoute) -> AnyView) -> impl IntoView {
    let route = use_router().route;
    move || matcher(route.get())
}

/// 站内链接：拦截点击，走路由服务而不是整页刷新
#[component]
pub fn Link(
    to: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let href = to.to_path();

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate_to(to.clone());
    };

    view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    }
}
