//! 认证模块
//!
//! 会话状态放在一个 `RwSignal<SessionStore>` 中，通过 Context 在组件间共享。
//! 所有修改都经过 `SessionAction`；路由服务只读取注入的认证信号。

use crate::web::{BrowserStorage, WebTransport};
use leptos::prelude::*;
use quickcourt_shared::config::ClientConfig;
use quickcourt_shared::gateway::ApiGateway;
use quickcourt_shared::session::{SessionAction, SessionStore};
use quickcourt_shared::validate::{LoginForm, SignupForm, ValidationError};
use quickcourt_shared::{ClientError, User};

/// 认证上下文
#[derive(Clone, Copy)]
pub struct AuthContext {
    session: RwSignal<SessionStore<BrowserStorage>>,
    api_base: StoredValue<String>,
}

impl AuthContext {
    /// 从 LocalStorage 恢复会话
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            session: RwSignal::new(SessionStore::restore(BrowserStorage)),
            api_base: StoredValue::new(config.api_base.clone()),
        }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let session = self.session;
        Signal::derive(move || session.with(|s| s.is_authenticated()))
    }

    /// 当前用户（追踪依赖）
    pub fn user(&self) -> Option<User> {
        self.session.with(|s| s.user().cloned())
    }

    pub fn user_untracked(&self) -> Option<User> {
        self.session.with_untracked(|s| s.user().cloned())
    }

    pub fn is_loading(&self) -> bool {
        self.session.with(|s| s.state().loading)
    }

    pub fn error(&self) -> Option<String> {
        self.session.with(|s| s.state().error.clone())
    }

    fn dispatch(&self, action: SessionAction) {
        self.session.update(|s| s.dispatch(action));
    }

    /// 使用当前令牌构造网关
    pub fn gateway(&self) -> ApiGateway<WebTransport> {
        let token = self.session.with_untracked(|s| s.token().map(str::to_string));
        self.api_base
            .with_value(|base| ApiGateway::new(base, WebTransport))
            .with_token(token)
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 从 Context 获取客户端配置
pub fn use_config() -> ClientConfig {
    use_context::<ClientConfig>().unwrap_or_default()
}

/// 登录结果：已验证用户直接进入，未验证用户需要 OTP
pub enum LoginOutcome {
    Verified,
    NeedsOtp { email: String },
}

/// 登录失败的两类原因
pub enum AuthFailure {
    /// 表单校验失败，不会发请求
    Invalid(ValidationError),
    /// 请求失败，错误信息已写入会话
    Rejected(String),
}

/// 校验、登录并写入会话；未验证的用户会被要求输入 OTP
pub async fn login(ctx: &AuthContext, form: &LoginForm) -> Result<LoginOutcome, AuthFailure> {
    let request = form.validate().map_err(AuthFailure::Invalid)?;

    ctx.dispatch(SessionAction::StartLoading);
    match ctx.gateway().login(&request.email, &request.password).await {
        Ok(user) => {
            let verified = user.is_verified;
            tracing::info!(user_id = %user.id, verified, "login succeeded");
            ctx.dispatch(SessionAction::AuthSuccess(user));
            if verified {
                Ok(LoginOutcome::Verified)
            } else {
                Ok(LoginOutcome::NeedsOtp {
                    email: request.email,
                })
            }
        }
        Err(e) => Err(fail(ctx, e, "login failed")),
    }
}

/// 注册成功后回到登录页，由用户手动登录；注册不建立会话
pub async fn signup(ctx: &AuthContext, form: &SignupForm) -> Result<(), AuthFailure> {
    let request = form.validate().map_err(AuthFailure::Invalid)?;

    match ctx.gateway().signup(&request).await {
        Ok(_) => {
            tracing::info!(email = %request.email, "signup succeeded");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = %e, code = e.error_code(), "signup failed");
            Err(AuthFailure::Rejected(e.user_message()))
        }
    }
}

pub async fn send_otp(ctx: &AuthContext, email: &str) -> Result<(), String> {
    ctx.gateway()
        .send_otp(email)
        .await
        .map(|_| ())
        .map_err(|e| {
            tracing::warn!(error = %e, "failed to send otp");
            e.user_message()
        })
}

/// 校验 OTP，响应中没有用户时沿用当前会话用户并标记为已验证
///
/// 失败时保留已登录的用户，错误由页面自行展示。
pub async fn verify_otp(ctx: &AuthContext, email: &str, otp: &str) -> Result<(), String> {
    let fallback = ctx.user_untracked().map(|mut u| {
        u.is_verified = true;
        u
    });

    match ctx.gateway().verify_otp(email, otp, fallback.as_ref()).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "otp verified");
            ctx.dispatch(SessionAction::AuthSuccess(user));
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = %e, "otp verification failed");
            Err(e.user_message())
        }
    }
}

/// 注销并清除状态
///
/// 导航将由路由服务的认证状态监听自动处理。
pub fn logout(ctx: &AuthContext) {
    ctx.dispatch(SessionAction::Logout);
}

fn fail(ctx: &AuthContext, e: ClientError, context: &'static str) -> AuthFailure {
    tracing::warn!(error = %e, code = e.error_code(), "{context}");
    let message = e.user_message();
    ctx.dispatch(SessionAction::AuthFailure(message.clone()));
    AuthFailure::Rejected(message)
}
