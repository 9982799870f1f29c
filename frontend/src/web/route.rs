//! QuickCourt 的页面地址
//!
//! 只做路径与 `AppRoute` 之间的互转和访问规则，不碰 DOM，可在原生目标下测试。

use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页 (默认路由)
    #[default]
    Home,
    Login,
    Signup,
    /// 登录后的邮箱验证
    Otp,
    Profile,
    Courts,
    CourtDetail(String),
    /// 为指定场地预订
    Booking(String),
    MyBookings,
    MyFacilities,
    CreateFacility,
    /// 在指定设施下新建场地
    CreateCourt(String),
    Admin,
    /// 无法识别的路径，渲染 404
    NotFound,
}

/// 非空的单段参数
fn param(segment: &str) -> Option<String> {
    (!segment.is_empty()).then(|| segment.to_string())
}

impl AppRoute {
    /// 末尾斜杠忽略；带参数的路由要求参数非空
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();
        match segments.as_slice() {
            [] | [""] => Self::Home,
            ["login"] => Self::Login,
            ["signup"] => Self::Signup,
            ["otp"] => Self::Otp,
            ["profile"] => Self::Profile,
            ["courts"] => Self::Courts,
            ["courts", "new", facility_id] => param(facility_id)
                .map(Self::CreateCourt)
                .unwrap_or(Self::NotFound),
            ["courts", id] => param(id).map(Self::CourtDetail).unwrap_or(Self::NotFound),
            ["booking", id] => param(id).map(Self::Booking).unwrap_or(Self::NotFound),
            ["bookings"] => Self::MyBookings,
            ["facilities", "mine"] => Self::MyFacilities,
            ["facilities", "new"] => Self::CreateFacility,
            ["admin"] => Self::Admin,
            _ => Self::NotFound,
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::Otp => "/otp".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::Courts => "/courts".to_string(),
            Self::CourtDetail(id) => format!("/courts/{id}"),
            Self::Booking(id) => format!("/booking/{id}"),
            Self::MyBookings => "/bookings".to_string(),
            Self::MyFacilities => "/facilities/mine".to_string(),
            Self::CreateFacility => "/facilities/new".to_string(),
            Self::CreateCourt(facility_id) => format!("/courts/new/{facility_id}"),
            Self::Admin => "/admin".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// 首页、登录注册、OTP 与场地浏览之外的页面都需要会话
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Self::Home
                | Self::Login
                | Self::Signup
                | Self::Otp
                | Self::Courts
                | Self::CourtDetail(_)
                | Self::NotFound
        )
    }

    /// 已登录用户访问这些页面时回到首页
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Signup)
    }

    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    pub fn auth_success_redirect() -> Self {
        Self::Home
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_static_routes() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Home);
        assert_eq!(AppRoute::from_path(""), AppRoute::Home);
        assert_eq!(AppRoute::from_path("/login/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/facilities/mine"), AppRoute::MyFacilities);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn test_parse_param_routes() {
        assert_eq!(
            AppRoute::from_path("/courts/abc"),
            AppRoute::CourtDetail("abc".into())
        );
        assert_eq!(
            AppRoute::from_path("/courts/new/f9"),
            AppRoute::CreateCourt("f9".into())
        );
        assert_eq!(AppRoute::from_path("/booking/c1"), AppRoute::Booking("c1".into()));
        assert_eq!(AppRoute::from_path("/booking/"), AppRoute::NotFound);
    }

    #[test]
    fn test_path_round_trip_for_params() {
        let route = AppRoute::CreateCourt("f1".into());
        assert_eq!(AppRoute::from_path(&route.to_path()), route);
    }

    #[test]
    fn test_guard_rules() {
        assert!(!AppRoute::Courts.requires_auth());
        assert!(!AppRoute::CourtDetail("x".into()).requires_auth());
        assert!(AppRoute::Booking("x".into()).requires_auth());
        assert!(AppRoute::Admin.requires_auth());
        assert!(AppRoute::Signup.should_redirect_when_authenticated());
        assert!(!AppRoute::Otp.should_redirect_when_authenticated());
    }
}
