//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 实现会话持久化所需的 `KeyValueStore`。

use quickcourt_shared::session::{KeyValueStore, StorageError};

/// 浏览器 LocalStorage
///
/// 无状态，每次操作时重新获取 `window.localStorage`。
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError("无法获取 window 对象".to_string()))?
            .local_storage()
            .map_err(|e| StorageError(format!("{e:?}")))?
            .ok_or_else(|| StorageError("LocalStorage 不可用".to_string()))
    }
}

impl KeyValueStore for BrowserStorage {
    /// 键不存在或存储不可用时返回 `None`
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().ok()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StorageError(format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| StorageError(format!("{e:?}")))
    }
}
