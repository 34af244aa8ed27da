//! HTTP関連の基本型とユーティリティ

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::Error;
use super::utils::{is_header_value_valid, parse_query_string, validate_header};

/// リクエストスキーム
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// セキュアなスキームかどうか判定
    pub fn is_secure(&self) -> bool {
        matches!(self, Scheme::Https)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => write!(f, "http"),
            Scheme::Https => write!(f, "https"),
        }
    }
}

/// HTTPステータスコード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    // 2xx Success
    Ok = 200,
    Created = 201,
    NoContent = 204,

    // 3xx Redirection
    MovedPermanently = 301,
    Found = 302,
    SeeOther = 303,
    TemporaryRedirect = 307,
    PermanentRedirect = 308,

    // 4xx Client Error
    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    MethodNotAllowed = 405,

    // 5xx Server Error
    InternalServerError = 500,
    NotImplemented = 501,
    BadGateway = 502,
    ServiceUnavailable = 503,
}

impl StatusCode {
    /// u16の値を取得
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// 理由句を取得
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NoContent => "No Content",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::Found => "Found",
            StatusCode::SeeOther => "See Other",
            StatusCode::TemporaryRedirect => "Temporary Redirect",
            StatusCode::PermanentRedirect => "Permanent Redirect",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Unauthorized => "Unauthorized",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
            StatusCode::BadGateway => "Bad Gateway",
            StatusCode::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// 成功ステータスかどうか判定
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.as_u16())
    }

    /// リダイレクトステータスかどうか判定
    pub fn is_redirection(&self) -> bool {
        (300..400).contains(&self.as_u16())
    }

    /// クライアントエラーかどうか判定
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.as_u16())
    }

    /// サーバーエラーかどうか判定
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.as_u16())
    }
}

impl From<StatusCode> for u16 {
    fn from(status: StatusCode) -> u16 {
        status.as_u16()
    }
}

/// HTTPメソッド
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::GET => write!(f, "GET"),
            Method::POST => write!(f, "POST"),
            Method::PUT => write!(f, "PUT"),
            Method::DELETE => write!(f, "DELETE"),
            Method::PATCH => write!(f, "PATCH"),
            Method::HEAD => write!(f, "HEAD"),
            Method::OPTIONS => write!(f, "OPTIONS"),
        }
    }
}

impl Method {
    /// 文字列からMethodに変換
    pub fn from_str(method: &str) -> Option<Self> {
        match method.to_uppercase().as_str() {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "PATCH" => Some(Method::PATCH),
            "HEAD" => Some(Method::HEAD),
            "OPTIONS" => Some(Method::OPTIONS),
            _ => None,
        }
    }
}

/// HTTPリクエスト
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTPメソッド
    pub method: Method,
    /// リクエストスキーム
    pub scheme: Scheme,
    /// ホスト名（ポート込み）
    pub host: String,
    /// リクエストパス
    pub path: String,
    /// 生のクエリ文字列（URL再構築用に保持）
    pub query_string: Option<String>,
    /// デコード済みクエリパラメータ
    pub query_params: HashMap<String, String>,
    /// HTTPヘッダー（キーは小文字化して保持）
    pub headers: HashMap<String, String>,
    /// リクエストボディ
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// 新しいリクエストを作成
    pub fn new(method: Method, path: String) -> Self {
        Self {
            method,
            scheme: Scheme::Http,
            host: "localhost".to_string(),
            path,
            query_string: None,
            query_params: HashMap::new(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// スキームを設定
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// ホスト名を設定
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// 生のクエリ文字列を設定（パラメータも同時にパース）
    pub fn with_query_string(mut self, query_string: impl Into<String>) -> Self {
        let qs = query_string.into();
        self.query_params = parse_query_string(&qs);
        self.query_string = Some(qs);
        self
    }

    /// ヘッダーを追加（キーは小文字化、無効な値は拒否してログに残す）
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into().to_lowercase();
        let value = value.into();
        if is_header_value_valid(&value) {
            self.headers.insert(key, value);
        } else {
            log::warn!("Request::with_header rejected invalid value for '{}'", key);
        }
        self
    }

    /// ボディを追加
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// セキュアな接続かどうか判定
    pub fn is_secure(&self) -> bool {
        self.scheme.is_secure()
    }

    /// Refererヘッダーから遷移元URLを取得
    pub fn referrer(&self) -> Option<&str> {
        self.headers.get("referer").map(|s| s.as_str())
    }

    /// 完全なリクエストURLを構築
    pub fn full_url(&self) -> String {
        match &self.query_string {
            Some(qs) if !qs.is_empty() => {
                format!("{}://{}{}?{}", self.scheme, self.host, self.path, qs)
            }
            _ => format!("{}://{}{}", self.scheme, self.host, self.path),
        }
    }

    /// 同一URLをhttpsスキームで構築
    pub fn secure_url(&self) -> String {
        match &self.query_string {
            Some(qs) if !qs.is_empty() => {
                format!("https://{}{}?{}", self.host, self.path, qs)
            }
            _ => format!("https://{}{}", self.host, self.path),
        }
    }
}

/// HTTPレスポンス
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTPステータスコード
    pub status: u16,
    /// HTTPヘッダー
    pub headers: HashMap<String, String>,
    /// レスポンスボディ
    pub body: Option<Vec<u8>>,
}

impl Response {
    /// 新しいレスポンスを作成
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// StatusCodeから新しいレスポンスを作成
    pub fn with_status(status: StatusCode) -> Self {
        Self::new(status.as_u16())
    }

    /// ヘッダーを追加（無効な値は拒否してログに残す）
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        if is_header_value_valid(&value) {
            self.headers.insert(key, value);
        } else {
            log::warn!("Response::with_header rejected invalid value for '{}'", key);
        }
        self
    }

    /// ボディを追加
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// JSONをボディとして設定
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, Error> {
        let json = serde_json::to_vec(value)
            .map_err(|e| Error::RenderError(e.to_string()))?;

        self.headers.insert("Content-Type".to_string(), "application/json".to_string());
        self.body = Some(json);
        Ok(self)
    }

    /// 200 OKレスポンスを作成
    pub fn ok() -> Self {
        Self::new(200)
    }

    /// 404 Not Foundレスポンスを作成
    pub fn not_found() -> Self {
        Self::new(404)
    }

    /// 指定URLへのリダイレクトレスポンスを作成
    ///
    /// ステータスが3xx以外、またはLocation値が不正な場合はエラー
    pub fn redirect(location: impl Into<String>, status: u16) -> Result<Self, Error> {
        let location = location.into();
        if !(300..400).contains(&status) {
            return Err(Error::InvalidRedirect(status));
        }
        if !is_header_value_valid(&location) {
            return Err(Error::InvalidHeader(
                "redirect location contains control/CRLF or invalid chars".into(),
            ));
        }
        Ok(Self::new(status).with_header("Location", location))
    }

    /// リダイレクトレスポンスかどうか判定
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status) && self.headers.contains_key("Location")
    }

    /// Locationヘッダーの値を取得
    pub fn location(&self) -> Option<&str> {
        self.headers.get("Location").map(|s| s.as_str())
    }
}

/// レスポンス構築のためのビルダー
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    status: u16,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
}

impl ResponseBuilder {
    /// 新しいResponseBuilderを作成（u16ステータスコード）
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// 新しいResponseBuilderを作成（StatusCode）
    pub fn with_status(status: StatusCode) -> Self {
        Self::new(status.as_u16())
    }

    /// 既存のResponseからResponseBuilderを作成
    pub fn from(response: Response) -> Self {
        Self {
            status: response.status,
            headers: response.headers,
            body: response.body,
        }
    }

    /// ヘッダーを追加
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// 複数のヘッダーを検証付きで一括追加
    ///
    /// 無効な名前/値のヘッダーはスキップしてログに残す
    pub fn headers_checked(mut self, headers: HashMap<String, String>) -> Self {
        for (key, value) in headers {
            match validate_header(&key, &value) {
                Ok(()) => {
                    self.headers.insert(key, value);
                }
                Err(e) => {
                    log::warn!("ResponseBuilder skipped invalid header '{}': {}", key, e);
                }
            }
        }
        self
    }

    /// ボディを設定
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// テキストボディを設定
    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.headers.insert("Content-Type".to_string(), "text/plain; charset=utf-8".to_string());
        self.body = Some(text.into_bytes());
        self
    }

    /// HTMLボディを設定
    pub fn html(mut self, html: impl Into<String>) -> Self {
        let html = html.into();
        self.headers.insert("Content-Type".to_string(), "text/html; charset=utf-8".to_string());
        self.body = Some(html.into_bytes());
        self
    }

    /// Responseを構築
    pub fn build(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}
