//! 名前付きルートの実装

use std::collections::HashMap;
use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::common::utils::percent_encode;
use crate::error::Error;

/// パステンプレート内のプレースホルダ（例: `{id}`）
static PLACEHOLDER_REGEX: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn placeholder_regex() -> Result<&'static Regex, Error> {
    PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new(r"\{[A-Za-z_][A-Za-z0-9_]*\}"))
        .as_ref()
        .map_err(|e| Error::ConfigurationError(format!("invalid placeholder pattern: {}", e)))
}

/// 名前付きルートのマップ
///
/// ルート名をパステンプレートへ解決し、順序付きパラメータを
/// プレースホルダへ位置順に埋め込む
#[derive(Debug, Clone, Default)]
pub struct RouteMap {
    routes: HashMap<String, String>,
}

impl RouteMap {
    /// 新しいRouteMapを作成
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// 名前付きルートを登録
    pub fn register(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        let name = name.into();
        let template = template.into();
        debug!("Registering route '{}' -> {}", name, template);
        self.routes.insert(name, template);
        self
    }

    /// ルート名が登録済みかどうか判定
    pub fn has(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    /// ルート名と順序付きパラメータからURLを構築
    ///
    /// プレースホルダより少ないパラメータはエラー。余剰パラメータは
    /// 位置をキーとしたクエリ文字列として付加される
    pub fn url_for(&self, name: &str, params: &[&str]) -> Result<String, Error> {
        let template = self
            .routes
            .get(name)
            .ok_or_else(|| Error::RouteNotFound(name.to_string()))?;

        let regex = placeholder_regex()?;
        let mut url = String::with_capacity(template.len());
        let mut cursor = 0;
        let mut used = 0;

        for placeholder in regex.find_iter(template) {
            url.push_str(&template[cursor..placeholder.start()]);
            let value = params
                .get(used)
                .ok_or_else(|| Error::MissingRouteParameter(name.to_string()))?;
            url.push_str(&percent_encode(value));
            used += 1;
            cursor = placeholder.end();
        }
        url.push_str(&template[cursor..]);

        // 余剰パラメータは位置キーのクエリ文字列へ
        if used < params.len() {
            let query: Vec<String> = params[used..]
                .iter()
                .enumerate()
                .map(|(i, value)| format!("{}={}", i, percent_encode(value)))
                .collect();
            url.push('?');
            url.push_str(&query.join("&"));
        }

        Ok(url)
    }
}
