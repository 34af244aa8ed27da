use std::collections::HashMap;

use log::debug;

use crate::error::Error;
use super::core::Helpers;

/// エラークラス識別子からメッセージへのカタログ
///
/// catchブロックの連鎖による重複を避けるため、発生しうるエラーと
/// 表示メッセージの対応をデータとして渡す
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    messages: HashMap<String, String>,
}

impl MessageCatalog {
    /// 新しいMessageCatalogを作成
    pub fn new() -> Self {
        Self {
            messages: HashMap::new(),
        }
    }

    /// エラークラスに対応するメッセージを登録
    pub fn with_message(mut self, class: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(class.into(), message.into());
        self
    }

    /// エラークラスに対応するメッセージを取得
    pub fn get(&self, class: &str) -> Option<&str> {
        self.messages.get(class).map(|s| s.as_str())
    }
}

/// エラーのクラス階層を公開する特性
///
/// カタログ照合は具象クラスから根へ向かって歩き、最初に
/// 一致した階層のメッセージを採用する
pub trait ErrorHierarchy {
    /// 具象エラークラス識別子
    fn error_class(&self) -> &'static str;

    /// クラスの親クラス識別子（根はNone）
    fn parent_of(class: &'static str) -> Option<&'static str>;

    /// 具象クラスを先頭に、根までのクラス階層を取得
    fn hierarchy(&self) -> Vec<&'static str> {
        let mut classes = vec![self.error_class()];
        let mut current = self.error_class();
        while let Some(parent) = Self::parent_of(current) {
            classes.push(parent);
            current = parent;
        }
        classes
    }
}

impl ErrorHierarchy for Error {
    fn error_class(&self) -> &'static str {
        match self {
            Error::InvalidTimeUnit(_) => "InvalidTimeUnit",
            Error::InvalidRedirect(_) => "InvalidRedirect",
            Error::MissingRouteParameter(_) => "MissingRouteParameter",
            Error::InvalidHeader(_) => "InvalidHeader",
            Error::RouteNotFound(_) => "RouteNotFound",
            Error::ViewNotFound(_) => "ViewNotFound",
            Error::RenderError(_) => "RenderError",
            Error::SessionError(_) => "SessionError",
            Error::ConfigurationError(_) => "ConfigurationError",
        }
    }

    fn parent_of(class: &'static str) -> Option<&'static str> {
        match class {
            "InvalidTimeUnit" | "InvalidRedirect" | "MissingRouteParameter" | "InvalidHeader" => {
                Some("InvalidArgument")
            }
            "RouteNotFound" => Some("Routing"),
            "ViewNotFound" | "RenderError" => Some("View"),
            "InvalidArgument" | "Routing" | "View" | "SessionError" | "ConfigurationError" => {
                Some("Error")
            }
            _ => None,
        }
    }
}

/// 捕捉したエラーをカタログのメッセージへ解決する
///
/// クラス階層を具象から根へ歩き、最初に一致したメッセージを返す。
/// どの階層にも一致が無い場合は元のエラーをそのまま返して再送出させる
pub fn resolve_exception_message<E: ErrorHierarchy>(
    exception: E,
    error_messages: &MessageCatalog,
) -> Result<String, E> {
    for class in exception.hierarchy() {
        if let Some(message) = error_messages.get(class) {
            debug!("Resolved exception message via class '{}'", class);
            return Ok(message.to_string());
        }
    }
    Err(exception)
}

impl Helpers {
    /// 複数例外のメッセージ解決
    ///
    /// 一致が無い場合は元のエラーがErrで返る（握り潰さない）
    pub fn handle_multiple_exceptions<E: ErrorHierarchy>(
        &self,
        exception: E,
        error_messages: &MessageCatalog,
    ) -> Result<String, E> {
        resolve_exception_message(exception, error_messages)
    }
}
