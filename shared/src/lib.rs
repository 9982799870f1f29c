//! QuickCourt 客户端共享逻辑
//!
//! 不依赖 DOM 的全部客户端逻辑都在这里，前端 crate 只负责渲染与浏览器适配：
//! - `request` / `gateway`: HTTP 抽象与 REST 网关
//! - `session`: 会话状态与持久化
//! - `booking`: 预订表单状态机
//! - `browse`: 场地浏览（过滤、分页、去重加载）
//! - `account`: 我的预订与我的场地
//! - `admin` / `stats`: 后台管理表格与仪表盘统计

use serde::{Deserialize, Deserializer, Serialize};

pub mod account;
pub mod admin;
pub mod booking;
pub mod browse;
pub mod config;
pub mod date;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod otp;
pub mod protocol;
pub mod request;
pub mod session;
pub mod stats;
pub mod validate;

pub use date::{BookingDate, ClockTime, DurationMins};
pub use error::{ClientError, ClientResult};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const STORAGE_USER_KEY: &str = "user";
pub const STORAGE_TOKEN_KEY: &str = "token";

pub const BOOKING_STATUS_CONFIRMED: &str = "CONFIRMED";
pub const PAYMENT_STATUS_PAID: &str = "PAID";

/// 预订表单中可选的运动项目
pub const SPORTS: [&str; 3] = ["Badminton", "Tennis", "Cricket"];

/// 场地列表过滤器中可选的运动项目
pub const FILTER_SPORTS: [&str; 4] = ["Cricket", "Football", "Tennis", "Badminton"];

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 服务端未设置的字段以 `null` 下发，按缺省值处理
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    User,
    Owner,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Owner => "OWNER",
            UserRole::Admin => "ADMIN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserRole::User => "User",
            UserRole::Owner => "Venue Owner",
            UserRole::Admin => "Administrator",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub owned_facilities: Vec<Facility>,
    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub bookings: Vec<Booking>,
    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub reviews: Vec<Review>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// 头像占位字符：名字首字母，其次邮箱首字母，最后 'U'
    pub fn initial(&self) -> char {
        self.first_name
            .chars()
            .next()
            .or_else(|| self.email.chars().next())
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('U')
    }

    pub fn is_owner(&self) -> bool {
        self.role == UserRole::Owner
    }

    /// 浅合并：只覆盖补丁中出现的字段
    pub fn merge(&mut self, patch: &UserPatch) {
        if let Some(v) = &patch.first_name {
            self.first_name = v.clone();
        }
        if let Some(v) = &patch.last_name {
            self.last_name = v.clone();
        }
        if let Some(v) = &patch.email {
            self.email = v.clone();
        }
        if let Some(v) = &patch.phone_number {
            self.phone_number = Some(v.clone());
        }
        if let Some(v) = &patch.profile_picture_url {
            self.profile_picture_url = Some(v.clone());
        }
        if let Some(v) = patch.is_verified {
            self.is_verified = v;
        }
    }
}

/// 用户资料的部分更新
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VenueType {
    Indoor,
    Outdoor,
}

impl VenueType {
    pub const ALL: [VenueType; 2] = [VenueType::Outdoor, VenueType::Indoor];

    pub fn label(&self) -> &'static str {
        match self {
            VenueType::Indoor => "Indoor",
            VenueType::Outdoor => "Outdoor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub sport_type: String,
    #[serde(default, deserialize_with = "null_default")]
    pub price_per_hour: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub operating_hours: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_type: Option<VenueType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub courts: Vec<Court>,
}

/// 服务端返回的预订记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<BookingDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<ClockTime>,
    #[serde(default, deserialize_with = "null_default")]
    pub duration: DurationMins,
    #[serde(default, deserialize_with = "null_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_default")]
    pub payment_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// 提交预订时的请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub user_id: String,
    pub court_id: String,
    pub date: BookingDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub duration: DurationMins,
    pub status: String,
    pub payment_status: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub rating: u8,
    #[serde(default, deserialize_with = "null_default")]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<BookingDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<ClockTime>,
    #[serde(default, deserialize_with = "null_default")]
    pub max_players: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub current_players: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

// =========================================================
// 表单请求体 (Request Payloads)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtpRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtpVerifyRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFacilityRequest {
    pub owner_id: Option<String>,
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourtRequest {
    pub facility_id: String,
    pub name: String,
    pub sport_type: String,
    pub price_per_hour: f64,
    pub operating_hours: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// 按小时价格与分钟数计算费用：`(price / 60) * minutes`
pub fn price_for(price_per_hour: f64, duration: DurationMins) -> f64 {
    (price_per_hour / 60.0) * f64::from(duration.as_minutes())
}

/// 价格展示：整数不带小数，否则保留两位
pub fn format_price(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("₹{}", amount as i64)
    } else {
        format!("₹{:.2}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_for_ninety_minutes() {
        assert_eq!(price_for(600.0, DurationMins::from_minutes(90)), 900.0);
        assert_eq!(price_for(500.0, DurationMins::from_minutes(30)), 500.0 / 60.0 * 30.0);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(900.0), "₹900");
        assert_eq!(format_price(250.5), "₹250.50");
    }

    #[test]
    fn test_user_merge_is_shallow() {
        let mut user = User {
            id: "u1".into(),
            first_name: "Asha".into(),
            last_name: "Patel".into(),
            email: "asha@example.com".into(),
            ..Default::default()
        };
        user.merge(&UserPatch {
            last_name: Some("Shah".into()),
            phone_number: Some("9876543210".into()),
            ..Default::default()
        });
        assert_eq!(user.first_name, "Asha");
        assert_eq!(user.last_name, "Shah");
        assert_eq!(user.phone_number.as_deref(), Some("9876543210"));
        assert_eq!(user.email, "asha@example.com");
    }

    #[test]
    fn test_user_initial_fallbacks() {
        let mut user = User::default();
        assert_eq!(user.initial(), 'U');
        user.email = "zed@example.com".into();
        assert_eq!(user.initial(), 'Z');
        user.first_name = "mira".into();
        assert_eq!(user.initial(), 'M');
    }

    #[test]
    fn test_user_deserializes_with_missing_fields() {
        let user: User = serde_json::from_str(
            r#"{"id":"7","firstName":"Ravi","email":"r@x.io","role":"OWNER","unknown":1}"#,
        )
        .unwrap();
        assert_eq!(user.role, UserRole::Owner);
        assert!(!user.is_verified);
        assert!(user.owned_facilities.is_empty());
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let user: User = serde_json::from_str(
            r#"{"id":"7","firstName":null,"role":null,"isVerified":null,"bookings":null}"#,
        )
        .unwrap();
        assert_eq!(user.first_name, "");
        assert_eq!(user.role, UserRole::default());
        assert!(user.bookings.is_empty());

        let booking: Booking = serde_json::from_str(
            r#"{"id":"b1","duration":null,"status":null,"paymentStatus":null,"date":null}"#,
        )
        .unwrap();
        assert_eq!(booking.duration, DurationMins::default());
        assert!(booking.status.is_empty());
        assert!(booking.date.is_none());

        let review: Review = serde_json::from_str(r#"{"id":"r1","rating":null,"comment":null}"#).unwrap();
        assert_eq!(review.rating, 0);
        assert!(review.comment.is_empty());
    }
}
