//! ビューレンダリングの実装

use std::collections::HashMap;
use std::sync::OnceLock;

use log::debug;
use regex::{Captures, Regex};

use crate::common::ViewContext;
use crate::error::Error;

/// テンプレート内の変数プレースホルダ（例: `{{ title }}`）
static VARIABLE_REGEX: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn variable_regex() -> Result<&'static Regex, Error> {
    VARIABLE_REGEX
        .get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_.]*)\s*\}\}"))
        .as_ref()
        .map_err(|e| Error::ConfigurationError(format!("invalid variable pattern: {}", e)))
}

/// ビューレンダラーの特性
pub trait ViewRenderer: Send + Sync {
    /// テンプレート名が登録済みかどうか判定
    fn exists(&self, name: &str) -> bool;

    /// テンプレートをビューコンテキストでレンダリング
    fn render(&self, name: &str, context: &ViewContext) -> Result<String, Error>;
}

/// 登録済みテンプレートに対する単純なレンダラー
///
/// `{{ key }}` 形式のプレースホルダをビューコンテキストの値で置換する。
/// テンプレートエンジンそのものは対象外
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, String>,
}

/// 組み込みの404テンプレート名
pub const NOT_FOUND_VIEW: &str = "errors/404";

/// 組み込みの404テンプレート本体
const NOT_FOUND_TEMPLATE: &str = "<!DOCTYPE html>\n<html>\n<head><title>{{ title }}</title></head>\n<body><h1>404 Not Found</h1><p>The page you requested could not be found.</p></body>\n</html>";

impl TemplateRegistry {
    /// 組み込みテンプレートだけを持つTemplateRegistryを作成
    pub fn new() -> Self {
        Self::default().register(NOT_FOUND_VIEW, NOT_FOUND_TEMPLATE)
    }

    /// テンプレートを登録
    pub fn register(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(name.into(), template.into());
        self
    }
}

impl ViewRenderer for TemplateRegistry {
    fn exists(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    fn render(&self, name: &str, context: &ViewContext) -> Result<String, Error> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| Error::ViewNotFound(name.to_string()))?;

        let regex = variable_regex()?;
        let data = context.snapshot();
        let rendered = regex.replace_all(template, |caps: &Captures| {
            let key = &caps[1];
            match data.get(key) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => {
                    debug!("View '{}' references unshared variable: {}", name, key);
                    String::new()
                }
            }
        });

        Ok(rendered.into_owned())
    }
}
