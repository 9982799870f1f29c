//! 表单校验
//!
//! 每个表单在提交前校验，失败时返回按字段分组的错误，请求不会发出。

use crate::error::ClientError;
use crate::{CreateCourtRequest, CreateFacilityRequest, LoginRequest, SignupRequest, UserRole};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid")
});

static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5,6}$").expect("zip pattern is valid"));

pub const OTP_LENGTH: usize = 6;
pub const PHONE_DIGITS: usize = 10;
pub const DEFAULT_OPERATING_HOURS: &str = "09:00-18:00";

// =========================================================
// 错误容器 (Field Errors)
// =========================================================

/// 字段名到错误文案的映射，字段名与 JSON 字段一致 (camelCase)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn clear(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.values().next().map(String::as_str)
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError(self))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.first().unwrap_or("invalid input"))]
pub struct ValidationError(pub FieldErrors);

impl ValidationError {
    pub fn fields(&self) -> &FieldErrors {
        &self.0
    }
}

impl From<ValidationError> for ClientError {
    fn from(e: ValidationError) -> Self {
        ClientError::validation(e.to_string())
    }
}

// =========================================================
// 通用规则 (Shared Rules)
// =========================================================

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.is_empty() {
        errors.insert("email", "Email is required");
    } else if !EMAIL_RE.is_match(email) {
        errors.insert("email", "Email format is invalid");
    }
}

fn check_name(errors: &mut FieldErrors, field: &'static str, label: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field, format!("{label} is required"));
    } else if value.chars().count() < 2 {
        errors.insert(field, format!("{label} must be at least 2 characters"));
    }
}

fn check_required(errors: &mut FieldErrors, field: &'static str, label: &str, value: &str) {
    if value.trim().is_empty() {
        errors.insert(field, format!("{label} is required"));
    }
}

fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// 可选坐标：空串为 None，否则必须在范围内
fn parse_coordinate(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    limit: f64,
) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && (-limit..=limit).contains(&n) => Some(n),
        Ok(_) => {
            errors.insert(field, format!("Must be between -{limit} and {limit}"));
            None
        }
        Err(_) => {
            errors.insert(field, "Must be a valid number");
            None
        }
    }
}

// =========================================================
// 输入清洗 (Input Sanitizers)
// =========================================================

/// OTP 输入框：只保留数字，最多 6 位
pub fn sanitize_otp_input(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(OTP_LENGTH)
        .collect()
}

pub fn otp_complete(otp: &str) -> bool {
    otp.len() == OTP_LENGTH && otp.chars().all(|c| c.is_ascii_digit())
}

/// 手机号输入框：只保留数字，最多 10 位
pub fn sanitize_phone_input(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_DIGITS)
        .collect()
}

/// 手机号展示格式 `XXX-XXX-XXXX`，位数不足时按已有位数分段
pub fn format_phone(raw: &str) -> String {
    let digits = digits_only(raw);
    let digits: Vec<char> = digits.chars().take(PHONE_DIGITS).collect();
    let part = |range: std::ops::Range<usize>| -> String { digits[range].iter().collect() };
    match digits.len() {
        0..=3 => part(0..digits.len()),
        4..=6 => format!("{}-{}", part(0..3), part(3..digits.len())),
        n => format!("{}-{}-{}", part(0..3), part(3..6), part(6..n)),
    }
}

// =========================================================
// 表单定义 (Forms)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        let mut errors = FieldErrors::new();
        check_email(&mut errors, &self.email);
        if self.password.is_empty() {
            errors.insert("password", "Password is required");
        } else if self.password.chars().count() < 6 {
            errors.insert("password", "Password must be at least 6 characters");
        }
        errors.into_result(LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub role: UserRole,
}

impl SignupForm {
    pub fn validate(&self) -> Result<SignupRequest, ValidationError> {
        let mut errors = FieldErrors::new();
        check_name(&mut errors, "firstName", "First name", &self.first_name);
        check_name(&mut errors, "lastName", "Last name", &self.last_name);
        check_email(&mut errors, &self.email);

        let password = &self.password;
        if password.is_empty() {
            errors.insert("password", "Password is required");
        } else if password.chars().count() < 6 {
            errors.insert("password", "Password must be at least 6 characters");
        } else if !(password.chars().any(|c| c.is_ascii_lowercase())
            && password.chars().any(|c| c.is_ascii_uppercase())
            && password.chars().any(|c| c.is_ascii_digit()))
        {
            errors.insert(
                "password",
                "Password must contain at least one uppercase letter, one lowercase letter, and one number",
            );
        }

        let phone = digits_only(&self.phone_number);
        if self.phone_number.is_empty() {
            errors.insert("phoneNumber", "Phone number is required");
        } else if phone.len() != PHONE_DIGITS {
            errors.insert("phoneNumber", "Phone number must be 10 digits");
        }

        if self.role == UserRole::Admin {
            errors.insert("role", "Please choose User or Venue Owner");
        }

        errors.into_result(SignupRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            phone_number: phone,
            role: self.role,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacilityForm {
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub latitude: String,
    pub longitude: String,
}

impl FacilityForm {
    pub fn validate(&self, owner_id: Option<&str>) -> Result<CreateFacilityRequest, ValidationError> {
        let mut errors = FieldErrors::new();

        check_required(&mut errors, "name", "Facility name", &self.name);
        if self.name.chars().count() > 50 {
            errors.insert("name", "Name must be less than 50 characters");
        }
        check_required(&mut errors, "description", "Description", &self.description);
        if self.description.chars().count() > 500 {
            errors.insert("description", "Description must be less than 500 characters");
        }
        check_required(&mut errors, "address", "Address", &self.address);
        check_required(&mut errors, "city", "City", &self.city);
        check_required(&mut errors, "state", "State", &self.state);
        if !ZIP_RE.is_match(self.zip_code.trim()) {
            errors.insert("zipCode", "Invalid zip code (5-6 digits)");
        }
        let latitude = parse_coordinate(&mut errors, "latitude", &self.latitude, 90.0);
        let longitude = parse_coordinate(&mut errors, "longitude", &self.longitude, 180.0);

        errors.into_result(CreateFacilityRequest {
            owner_id: owner_id.map(str::to_string),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
            latitude,
            longitude,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourtForm {
    pub name: String,
    pub sport_type: String,
    pub price_per_hour: String,
    pub operating_hours: String,
    pub photo_url: String,
}

impl Default for CourtForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            sport_type: crate::SPORTS[0].to_string(),
            price_per_hour: String::new(),
            operating_hours: DEFAULT_OPERATING_HOURS.to_string(),
            photo_url: String::new(),
        }
    }
}

impl CourtForm {
    pub fn validate(&self, facility_id: Option<&str>) -> Result<CreateCourtRequest, ValidationError> {
        let mut errors = FieldErrors::new();

        if self.name.trim().is_empty() {
            errors.insert("name", "Court name is required.");
        }
        let price = self
            .price_per_hour
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p > 0.0);
        if price.is_none() {
            errors.insert("pricePerHour", "Price per hour must be greater than 0.");
        }
        let facility_id = facility_id.filter(|id| !id.is_empty());
        if facility_id.is_none() {
            errors.insert(
                "facilityId",
                "No facility selected. Please go back and select a facility.",
            );
        }

        let photo_url = self.photo_url.trim();
        let operating_hours = match self.operating_hours.trim() {
            "" => DEFAULT_OPERATING_HOURS,
            hours => hours,
        };
        errors.into_result(CreateCourtRequest {
            facility_id: facility_id.unwrap_or_default().to_string(),
            name: self.name.trim().to_string(),
            sport_type: self.sport_type.clone(),
            price_per_hour: price.unwrap_or_default(),
            operating_hours: operating_hours.to_string(),
            photo_url: (!photo_url.is_empty()).then(|| photo_url.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> SignupForm {
        SignupForm {
            first_name: "Asha".into(),
            last_name: "Patel".into(),
            email: "asha@example.com".into(),
            password: "Secret1".into(),
            phone_number: "987-654-3210".into(),
            role: UserRole::User,
        }
    }

    #[test]
    fn test_login_rules() {
        let form = LoginForm::default();
        let err = form.validate().unwrap_err();
        assert_eq!(err.fields().get("email"), Some("Email is required"));
        assert_eq!(err.fields().get("password"), Some("Password is required"));

        let form = LoginForm {
            email: "not-an-email".into(),
            password: "12345".into(),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.fields().get("email"), Some("Email format is invalid"));
        assert_eq!(
            err.fields().get("password"),
            Some("Password must be at least 6 characters")
        );

        let ok = LoginForm {
            email: "a@b.co".into(),
            password: "123456".into(),
        };
        assert_eq!(ok.validate().unwrap().email, "a@b.co");
    }

    #[test]
    fn test_signup_accepts_valid_form_and_strips_phone() {
        let request = signup().validate().unwrap();
        assert_eq!(request.phone_number, "9876543210");
        assert_eq!(request.role, UserRole::User);
    }

    #[test]
    fn test_signup_password_classes() {
        let mut form = signup();
        form.password = "secret1".into();
        let err = form.validate().unwrap_err();
        assert!(err.fields().get("password").unwrap().contains("uppercase"));
        assert_eq!(err.fields().len(), 1);
    }

    #[test]
    fn test_signup_names_and_phone() {
        let mut form = signup();
        form.first_name = " A ".into();
        form.last_name = "   ".into();
        form.phone_number = "12345".into();
        let err = form.validate().unwrap_err();
        assert_eq!(
            err.fields().get("firstName"),
            Some("First name must be at least 2 characters")
        );
        assert_eq!(err.fields().get("lastName"), Some("Last name is required"));
        assert_eq!(
            err.fields().get("phoneNumber"),
            Some("Phone number must be 10 digits")
        );
    }

    #[test]
    fn test_validation_error_converts_to_client_error() {
        let err: ClientError = LoginForm::default().validate().unwrap_err().into();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn test_otp_sanitizer() {
        assert_eq!(sanitize_otp_input("12a3-45 678"), "123456");
        assert!(otp_complete("123456"));
        assert!(!otp_complete("12345"));
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("98"), "98");
        assert_eq!(format_phone("98765"), "987-65");
        assert_eq!(format_phone("9876543210"), "987-654-3210");
        assert_eq!(format_phone("(987) 654-32101"), "987-654-3210");
        assert_eq!(sanitize_phone_input("987-654-32109"), "9876543210");
    }

    #[test]
    fn test_facility_rules() {
        let form = FacilityForm {
            name: "Smash Arena".into(),
            description: "Six wooden courts".into(),
            address: "12 MG Road".into(),
            city: "Pune".into(),
            state: "MH".into(),
            zip_code: "411001".into(),
            latitude: "".into(),
            longitude: "73.85".into(),
        };
        let request = form.validate(Some("u1")).unwrap();
        assert_eq!(request.owner_id.as_deref(), Some("u1"));
        assert_eq!(request.latitude, None);
        assert_eq!(request.longitude, Some(73.85));

        let bad = FacilityForm {
            zip_code: "4110".into(),
            latitude: "91".into(),
            longitude: "east".into(),
            name: "x".repeat(51),
            ..form
        };
        let err = bad.validate(None).unwrap_err();
        assert_eq!(err.fields().get("zipCode"), Some("Invalid zip code (5-6 digits)"));
        assert_eq!(err.fields().get("latitude"), Some("Must be between -90 and 90"));
        assert_eq!(err.fields().get("longitude"), Some("Must be a valid number"));
        assert_eq!(err.fields().get("name"), Some("Name must be less than 50 characters"));
    }

    #[test]
    fn test_court_rules() {
        let form = CourtForm {
            name: "Court 1".into(),
            price_per_hour: "450".into(),
            ..Default::default()
        };
        let request = form.validate(Some("f1")).unwrap();
        assert_eq!(request.operating_hours, DEFAULT_OPERATING_HOURS);
        assert_eq!(request.price_per_hour, 450.0);
        assert_eq!(request.photo_url, None);

        let err = CourtForm {
            price_per_hour: "0".into(),
            ..form
        }
        .validate(None)
        .unwrap_err();
        assert_eq!(
            err.fields().get("pricePerHour"),
            Some("Price per hour must be greater than 0.")
        );
        assert!(err.fields().get("facilityId").is_some());
    }
}
