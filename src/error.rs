//! エラー型の定義

use thiserror::Error;

/// アプリケーションのエラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 未対応の時間単位
    #[error("Invalid time unit: {0} (expected 'ms', 's' or 'm')")]
    InvalidTimeUnit(String),

    /// リダイレクトに使用できないステータスコード
    #[error("Invalid redirect status: {0} (expected a 3xx code)")]
    InvalidRedirect(u16),

    /// ルートパラメータの不足
    #[error("Missing parameter for route '{0}'")]
    MissingRouteParameter(String),

    /// 無効なヘッダー名または値
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// 名前付きルートが未登録
    #[error("Route not found: {0}")]
    RouteNotFound(String),

    /// ビューテンプレートが未登録
    #[error("View not found: {0}")]
    ViewNotFound(String),

    /// ビューのレンダリングエラー
    #[error("Failed to render view: {0}")]
    RenderError(String),

    /// セッションストアのエラー
    #[error("Session error: {0}")]
    SessionError(String),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl Error {
    /// エラーからHTTPステータスコードを取得
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidTimeUnit(_) => 400,
            Error::InvalidRedirect(_) => 400,
            Error::MissingRouteParameter(_) => 500,
            Error::InvalidHeader(_) => 400,
            Error::RouteNotFound(_) => 404,
            Error::ViewNotFound(_) => 500,
            Error::RenderError(_) => 500,
            Error::SessionError(_) => 500,
            Error::ConfigurationError(_) => 500,
        }
    }
}
