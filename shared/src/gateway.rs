//! REST 网关
//!
//! 在传输层之上附加 base URL 与可选的 bearer token，负责 JSON 编解码和失败分类。
//! 不做重试、缓存或限流。

use crate::error::{ClientError, ClientResult};
use crate::protocol::{self, ApiRequest, Resource};
use crate::request::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::{BookingRequest, LoginRequest, OtpRequest, OtpVerifyRequest, Review, SignupRequest, User};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;


pub struct ApiGateway<T> {
    base_url: String,
    token: Option<String>,
    transport: T,
}

impl<T: HttpTransport> ApiGateway<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            transport,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn build(&self, method: HttpMethod, path: &str) -> HttpRequest {
        let req = HttpRequest::new(&self.url(path), method).with_header("Accept", "application/json");
        match &self.token {
            Some(token) => req.with_header("Authorization", &format!("Bearer {token}")),
            None => req,
        }
    }

    /// 发送请求并把非 2xx 转成 `ClientError::Api`
    async fn dispatch(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let method = req.method;
        let url = req.url.clone();
        tracing::debug!(method = method.as_str(), %url, "api request");

        let resp = self.transport.send(req).await.inspect_err(|e| {
            tracing::warn!(method = method.as_str(), %url, error = %e, "api request failed");
        })?;

        if resp.is_success() {
            Ok(resp)
        } else {
            let err = ClientError::from_response(resp.status, &resp.body);
            tracing::warn!(method = method.as_str(), %url, status = resp.status, "api returned error");
            Err(err)
        }
    }

    async fn execute<R: DeserializeOwned>(&self, req: HttpRequest) -> ClientResult<R> {
        self.dispatch(req).await?.json()
    }

    fn with_body<B: Serialize + ?Sized>(&self, req: HttpRequest, body: &B) -> ClientResult<HttpRequest> {
        Ok(req.with_json_body(serde_json::to_string(body)?))
    }

    // =========================================================
    // 动词接口 (Verb Operations)
    // =========================================================

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> ClientResult<R> {
        self.execute(self.build(HttpMethod::Get, path)).await
    }

    pub async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<R> {
        let req = self.with_body(self.build(HttpMethod::Post, path), body)?;
        self.execute(req).await
    }

    pub async fn put<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<R> {
        let req = self.with_body(self.build(HttpMethod::Put, path), body)?;
        self.execute(req).await
    }

    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> ClientResult<R> {
        self.execute(self.build(HttpMethod::Delete, path)).await
    }

    /// 按 `ApiRequest` 描述发送
    pub async fn call<Q: ApiRequest>(&self, request: &Q) -> ClientResult<Q::Response> {
        let req = self.build(Q::METHOD, Q::PATH);
        let req = match Q::METHOD {
            HttpMethod::Get | HttpMethod::Delete => req,
            HttpMethod::Post | HttpMethod::Put => self.with_body(req, request)?,
        };
        self.execute(req).await
    }

    // =========================================================
    // 认证 (Auth)
    // =========================================================

    pub async fn signup(&self, request: &SignupRequest) -> ClientResult<Value> {
        self.call(request).await
    }

    /// 登录并提取用户，响应中找不到用户时失败
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<User> {
        let body = self
            .call(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        protocol::extract_user(&body, None)
    }

    pub async fn send_otp(&self, email: &str) -> ClientResult<Value> {
        self.call(&OtpRequest {
            email: email.to_string(),
        })
        .await
    }

    /// 校验 OTP；响应里没有用户时使用 `fallback`（通常是当前会话用户）
    pub async fn verify_otp(&self, email: &str, otp: &str, fallback: Option<&User>) -> ClientResult<User> {
        let body = self
            .call(&OtpVerifyRequest {
                email: email.to_string(),
                otp: otp.to_string(),
            })
            .await?;
        protocol::extract_user(&body, fallback)
    }

    /// 用服务端 cookie 校验当前会话
    pub async fn validate_session(&self) -> ClientResult<User> {
        let body: Value = self.get(protocol::VALIDATE_PATH).await?;
        protocol::extract_user(&body, None)
    }

    // =========================================================
    // 资源 CRUD (Resource CRUD)
    // =========================================================

    pub async fn list<R: Resource>(&self) -> ClientResult<Vec<R>> {
        let body: Value = self.get(&R::collection_path()).await?;
        protocol::unwrap_envelope(body)
    }

    pub async fn fetch<R: Resource>(&self, id: &str) -> ClientResult<R> {
        let body: Value = self.get(&R::member_path(id)).await?;
        protocol::unwrap_envelope(body)
    }

    pub async fn create<R: Resource, B: Serialize + ?Sized>(&self, body: &B) -> ClientResult<Value> {
        self.post(&R::collection_path(), body).await
    }

    pub async fn update<R: Resource, B: Serialize + ?Sized>(&self, id: &str, body: &B) -> ClientResult<Value> {
        self.put(&R::member_path(id), body).await
    }

    /// 删除资源，忽略响应体（服务端可能返回纯文本）
    pub async fn remove<R: Resource>(&self, id: &str) -> ClientResult<()> {
        self.dispatch(self.build(HttpMethod::Delete, &R::member_path(id)))
            .await
            .map(|_| ())
    }

    pub async fn reviews_for_facility(&self, facility_id: &str) -> ClientResult<Vec<Review>> {
        let body: Value = self.get(&protocol::reviews_for_facility_path(facility_id)).await?;
        protocol::unwrap_envelope(body)
    }

    pub async fn create_booking(&self, request: &BookingRequest) -> ClientResult<Value> {
        self.create::<crate::Booking, _>(request).await
    }
}
