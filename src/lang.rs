//! ローカライズ文字列の実装

use std::collections::HashMap;

use crate::error::Error;

/// ローカライズ文字列のカタログ
///
/// 見つからないキーはキーそのものへフォールバックする
#[derive(Debug, Clone)]
pub struct Translator {
    locale: String,
    fallback_locale: String,
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new("en")
    }
}

impl Translator {
    /// 指定ロケールで新しいTranslatorを作成
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            fallback_locale: "en".to_string(),
            catalogs: HashMap::new(),
        }
    }

    /// JSON文字列からカタログを読み込む
    ///
    /// 形式: `{"en": {"app.title": "My App"}, "ja": {...}}`
    pub fn from_json(locale: impl Into<String>, json: &str) -> Result<Self, Error> {
        let catalogs: HashMap<String, HashMap<String, String>> = serde_json::from_str(json)
            .map_err(|e| Error::ConfigurationError(format!("invalid lang catalog: {}", e)))?;
        Ok(Self {
            locale: locale.into(),
            fallback_locale: "en".to_string(),
            catalogs,
        })
    }

    /// 1行分の翻訳を登録
    pub fn add_line(
        mut self,
        locale: impl Into<String>,
        key: impl Into<String>,
        line: impl Into<String>,
    ) -> Self {
        self.catalogs
            .entry(locale.into())
            .or_default()
            .insert(key.into(), line.into());
        self
    }

    /// 現在のロケールを取得
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// 現在のロケールを変更
    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.locale = locale.into();
    }

    /// キーに対応する翻訳があるかどうか判定（フォールバックロケール込み）
    pub fn has(&self, key: &str) -> bool {
        self.catalogs
            .get(&self.locale)
            .map_or(false, |c| c.contains_key(key))
            || self
                .catalogs
                .get(&self.fallback_locale)
                .map_or(false, |c| c.contains_key(key))
    }

    /// キーに対応する翻訳を取得
    ///
    /// 現在ロケール -> フォールバックロケール -> キーそのもの の順で解決する
    pub fn line(&self, key: &str) -> String {
        if let Some(line) = self.catalogs.get(&self.locale).and_then(|c| c.get(key)) {
            return line.clone();
        }
        if let Some(line) = self
            .catalogs
            .get(&self.fallback_locale)
            .and_then(|c| c.get(key))
        {
            return line.clone();
        }
        key.to_string()
    }
}
