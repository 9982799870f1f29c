//! 会话状态
//!
//! 会话只能通过 `SessionAction` 修改；每次修改后同步写入持久化存储。
//! 持久化失败只记录日志，不影响内存中的状态。

use crate::{STORAGE_TOKEN_KEY, STORAGE_USER_KEY, User, UserPatch};
use thiserror::Error;


// =========================================================
// 持久化存储抽象 (Key-Value Storage)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("storage error: {0}")]
pub struct StorageError(pub String);

/// 同步的字符串键值存储（浏览器 LocalStorage 或内存实现）
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =========================================================
// 会话状态与动作 (State & Actions)
// =========================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub user: Option<User>,
    pub token: Option<String>,
    /// 与 `user.is_some()` 保持一致
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    StartLoading,
    AuthSuccess(User),
    AuthFailure(String),
    Logout,
    UpdateUser(UserPatch),
    ClearError,
    SetToken(Option<String>),
}

pub struct SessionStore<S> {
    state: SessionState,
    storage: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// 从持久化存储恢复；损坏的用户记录会被删除并视为未登录
    pub fn restore(storage: S) -> Self {
        let user = storage
            .get(STORAGE_USER_KEY)
            .and_then(|raw| match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding corrupt persisted user");
                    if let Err(e) = storage.remove(STORAGE_USER_KEY) {
                        tracing::warn!(error = %e, "failed to remove corrupt user entry");
                    }
                    None
                }
            });
        let token = storage.get(STORAGE_TOKEN_KEY).filter(|t| !t.is_empty());

        let state = SessionState {
            is_authenticated: user.is_some(),
            user,
            token,
            loading: false,
            error: None,
        };
        tracing::debug!(authenticated = state.is_authenticated, "session restored");
        Self { state, storage }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.state.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn dispatch(&mut self, action: SessionAction) {
        match action {
            SessionAction::StartLoading => {
                self.state.loading = true;
                self.state.error = None;
            }
            SessionAction::AuthSuccess(user) => {
                self.persist_user(&user);
                self.state.user = Some(user);
                self.state.is_authenticated = true;
                self.state.loading = false;
                self.state.error = None;
            }
            SessionAction::AuthFailure(message) => {
                self.state.user = None;
                self.state.is_authenticated = false;
                self.state.loading = false;
                self.state.error = Some(message);
            }
            SessionAction::Logout => {
                self.state = SessionState::default();
                self.remove_entry(STORAGE_USER_KEY);
                self.remove_entry(STORAGE_TOKEN_KEY);
            }
            SessionAction::UpdateUser(patch) => {
                let Some(user) = self.state.user.as_mut() else {
                    tracing::debug!("update_user ignored: no session");
                    return;
                };
                user.merge(&patch);
                let snapshot = user.clone();
                self.persist_user(&snapshot);
            }
            SessionAction::ClearError => {
                self.state.error = None;
            }
            SessionAction::SetToken(token) => {
                let token = token.filter(|t| !t.is_empty());
                match &token {
                    Some(t) => {
                        if let Err(e) = self.storage.set(STORAGE_TOKEN_KEY, t) {
                            tracing::warn!(error = %e, "failed to persist token");
                        }
                    }
                    None => self.remove_entry(STORAGE_TOKEN_KEY),
                }
                self.state.token = token;
            }
        }
    }

    // --- Convenience wrappers ---

    pub fn start_loading(&mut self) {
        self.dispatch(SessionAction::StartLoading);
    }

    pub fn auth_success(&mut self, user: User) {
        self.dispatch(SessionAction::AuthSuccess(user));
    }

    pub fn auth_failure(&mut self, message: impl Into<String>) {
        self.dispatch(SessionAction::AuthFailure(message.into()));
    }

    pub fn logout(&mut self) {
        self.dispatch(SessionAction::Logout);
    }

    fn persist_user(&self, user: &User) {
        let result = serde_json::to_string(user)
            .map_err(|e| StorageError(e.to_string()))
            .and_then(|raw| self.storage.set(STORAGE_USER_KEY, &raw));
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to persist user");
        }
    }

    fn remove_entry(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            tracing::warn!(key, error = %e, "failed to remove persisted entry");
        }
    }
}

// =========================================================
// 测试工具: MemoryStore
// =========================================================

#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: std::sync::Arc<std::sync::Mutex<std::collections::HashMap<String, String>>>,
    fail_writes: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// 模拟存储已满：之后的写入与删除全部失败
    pub fn fail_writes(&self) {
        self.fail_writes
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }

    fn writes_fail(&self) -> bool {
        self.fail_writes.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.writes_fail() {
            return Err(StorageError("quota exceeded".into()));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.writes_fail() {
            return Err(StorageError("storage unavailable".into()));
        }
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
