use crate::error::{ClientError, ClientResult};
use crate::request::HttpMethod;
use crate::{
    Booking, Court, Facility, LoginRequest, Match, OtpRequest, OtpVerifyRequest, Review,
    SignupRequest, User,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// 描述一个认证端点的请求与响应关系
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// 相对于 API base 的路径
    const PATH: &'static str;
    const METHOD: HttpMethod;
}

// =========================================================
// 认证端点 (Auth Endpoints)
// =========================================================

pub const VALIDATE_PATH: &str = "/auth/validate";

impl ApiRequest for SignupRequest {
    type Response = Value;
    const PATH: &'static str = "/auth/signup";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// 登录响应的形状在不同版本的服务端之间不一致，先取原始 JSON 再提取用户
impl ApiRequest for LoginRequest {
    type Response = Value;
    const PATH: &'static str = "/auth/login";
    const METHOD: HttpMethod = HttpMethod::Post;
}

impl ApiRequest for OtpRequest {
    type Response = Value;
    const PATH: &'static str = "/auth/otp/send";
    const METHOD: HttpMethod = HttpMethod::Post;
}

impl ApiRequest for OtpVerifyRequest {
    type Response = Value;
    const PATH: &'static str = "/auth/otp/verify";
    const METHOD: HttpMethod = HttpMethod::Post;
}

// =========================================================
// 资源集合 (REST Resources)
// =========================================================

/// 服务端的 REST 资源集合：`/{COLLECTION}` 与 `/{COLLECTION}/{id}`
pub trait Resource: DeserializeOwned {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    fn collection_path() -> String {
        format!("/{}", Self::COLLECTION)
    }

    fn member_path(id: &str) -> String {
        format!("/{}/{}", Self::COLLECTION, id)
    }
}

macro_rules! impl_resource {
    ($ty:ty, $collection:literal) => {
        impl Resource for $ty {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}

impl_resource!(User, "users");
impl_resource!(Facility, "facilities");
impl_resource!(Court, "courts");
impl_resource!(Booking, "bookings");
impl_resource!(Match, "matches");
impl_resource!(Review, "reviews");

pub fn reviews_for_facility_path(facility_id: &str) -> String {
    format!("/reviews/facility/{facility_id}")
}

// =========================================================
// 响应信封 (Response Envelope)
// =========================================================

/// 认证接口的统一包装 `{success, message, data}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

/// 部分接口返回信封，部分直接返回数据，两种都接受
pub fn unwrap_envelope<T: DeserializeOwned>(body: Value) -> ClientResult<T> {
    let is_envelope = body
        .as_object()
        .is_some_and(|o| o.contains_key("success") && o.contains_key("data"));
    if is_envelope {
        let envelope: ApiEnvelope<T> = serde_json::from_value(body)?;
        envelope.data.ok_or_else(|| {
            ClientError::decode(
                envelope
                    .message
                    .unwrap_or_else(|| "empty response envelope".to_string()),
            )
        })
    } else {
        Ok(serde_json::from_value(body)?)
    }
}

pub const NO_USER_DATA: &str = "No valid user data available";

/// 从登录 / OTP 响应中提取用户
///
/// 查找顺序：`data` → `user` → 顶层 → 调用方提供的 fallback。
/// 候选对象必须带非空的 `id` 才算有效。
pub fn extract_user(body: &Value, fallback: Option<&User>) -> ClientResult<User> {
    let candidates = [body.get("data"), body.get("user"), Some(body)];

    for candidate in candidates.into_iter().flatten() {
        if !has_id(candidate) {
            continue;
        }
        match serde_json::from_value::<User>(candidate.clone()) {
            Ok(user) => return Ok(user),
            Err(e) => tracing::debug!(error = %e, "user candidate rejected"),
        }
    }

    fallback
        .cloned()
        .ok_or_else(|| ClientError::decode(NO_USER_DATA))
}

fn has_id(value: &Value) -> bool {
    match value.get("id") {
        Some(Value::String(s)) => !s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_user_prefers_data() {
        let body = json!({
            "success": true,
            "data": {"id": "d1", "email": "d@x.io"},
            "user": {"id": "u1", "email": "u@x.io"},
            "id": "top"
        });
        assert_eq!(extract_user(&body, None).unwrap().id, "d1");
    }

    #[test]
    fn test_extract_user_falls_through_in_order() {
        let body = json!({"data": {"token": "abc"}, "user": {"id": "u1"}});
        assert_eq!(extract_user(&body, None).unwrap().id, "u1");

        let body = json!({"data": null, "id": "top", "email": "t@x.io"});
        assert_eq!(extract_user(&body, None).unwrap().id, "top");

        let fallback = User {
            id: "fb".into(),
            ..Default::default()
        };
        let body = json!({"success": true, "message": "verified"});
        assert_eq!(extract_user(&body, Some(&fallback)).unwrap().id, "fb");
    }

    #[test]
    fn test_extract_user_without_candidates_fails() {
        let err = extract_user(&json!({"success": false}), None).unwrap_err();
        assert_eq!(err.user_message(), "No valid user data available");
        assert_eq!(err, ClientError::decode(NO_USER_DATA));
    }

    #[test]
    fn test_unwrap_envelope_accepts_both_shapes() {
        let wrapped: Vec<String> =
            unwrap_envelope(json!({"success": true, "message": "ok", "data": ["a"]})).unwrap();
        assert_eq!(wrapped, vec!["a".to_string()]);
        let bare: Vec<String> = unwrap_envelope(json!(["b"])).unwrap();
        assert_eq!(bare, vec!["b".to_string()]);
    }

    #[test]
    fn test_resource_paths() {
        assert_eq!(Court::collection_path(), "/courts");
        assert_eq!(Match::member_path("m9"), "/matches/m9");
        assert_eq!(reviews_for_facility_path("f1"), "/reviews/facility/f1");
    }
}
