// =========================================================
// 配置常量 (Configuration Defaults)
// =========================================================

const DEFAULT_API_BASE: &str = "/api/v1";
const DEFAULT_PAGE_SIZE: usize = 8;
const DEFAULT_OTP_RESEND_SECS: u32 = 60;
const DEFAULT_NOTIFICATION_MS: u32 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

pub const API_BASE_VAR: &str = "QUICKCOURT_API_BASE";
pub const LOG_LEVEL_VAR: &str = "QUICKCOURT_LOG";
pub const PAGE_SIZE_VAR: &str = "QUICKCOURT_PAGE_SIZE";

/// 客户端配置
///
/// 前端在编译期通过 `option_env!` 提供变量，读不到的项使用默认值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base: String,
    pub page_size: usize,
    pub otp_resend_secs: u32,
    pub notification_ms: u32,
    pub log_level: String,
}

impl ClientConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            // 尝试读取 QUICKCOURT_API_BASE，读不到就用同源的 "/api/v1"
            api_base: lookup(API_BASE_VAR)
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),

            page_size: lookup(PAGE_SIZE_VAR)
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),

            otp_resend_secs: DEFAULT_OTP_RESEND_SECS,
            notification_ms: DEFAULT_NOTIFICATION_MS,

            log_level: lookup(LOG_LEVEL_VAR)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base, "/api/v1");
        assert_eq!(config.page_size, 8);
        assert_eq!(config.otp_resend_secs, 60);
        assert_eq!(config.notification_ms, 3000);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides_from_lookup() {
        let config = ClientConfig::from_lookup(|key| match key {
            API_BASE_VAR => Some("https://api.quickcourt.test/api/v1/".into()),
            LOG_LEVEL_VAR => Some("debug".into()),
            PAGE_SIZE_VAR => Some("0".into()),
            _ => None,
        });
        assert_eq!(config.api_base, "https://api.quickcourt.test/api/v1");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.page_size, 8);
    }
}
