//! アプリケーション設定の実装

use std::env;

/// アプリケーション設定
///
/// ビューへ共有する環境情報と、ディスパッチ時の挙動フラグを保持する
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// アプリケーション名（ビューのタイトル既定値に使用）
    pub app_name: String,
    /// デバッグモードフラグ
    pub debug: bool,
    /// ロケール識別子
    pub locale: String,
    /// ディスパッチ時にhttpsを強制するかどうか
    pub force_https: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "ctrlbridge".to_string(),
            debug: false,
            locale: "en".to_string(),
            force_https: false,
        }
    }
}

impl AppConfig {
    /// 環境変数から設定を構築する
    ///
    /// 優先順位: 環境変数 `CTRLBRIDGE_*` -> デフォルト値
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            app_name: env::var("CTRLBRIDGE_APP_NAME").unwrap_or(defaults.app_name),
            debug: env_flag("CTRLBRIDGE_DEBUG", defaults.debug),
            locale: env::var("CTRLBRIDGE_LOCALE").unwrap_or(defaults.locale),
            force_https: env_flag("CTRLBRIDGE_FORCE_HTTPS", defaults.force_https),
        }
    }

    /// アプリケーション名を設定
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    /// デバッグモードを設定
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// ロケールを設定
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// https強制フラグを設定
    pub fn with_force_https(mut self, force_https: bool) -> Self {
        self.force_https = force_https;
        self
    }
}

/// 環境変数を真偽値として読むヘルパー関数
fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_lowercase().as_str(), "1" | "true" | "on" | "yes"),
        Err(_) => default,
    }
}
