//! ビューコンテキストの実装

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

/// ビューコンテキスト（リクエスト中にビューへ共有するデータ）
///
/// ファサードと各コラボレーターが共有参照越しに書き込めるよう、
/// 内部可変性で保持する。リクエスト終了とともに破棄される。
#[derive(Debug, Default)]
pub struct ViewContext {
    shared: Mutex<HashMap<String, Value>>,
}

impl ViewContext {
    /// 新しいViewContextを作成
    pub fn new() -> Self {
        Self {
            shared: Mutex::new(HashMap::new()),
        }
    }

    /// 値を共有（既存キーは上書き）
    pub fn share(&self, key: &str, value: impl Into<Value>) {
        let mut shared = self.shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        shared.insert(key.to_string(), value.into());
    }

    /// 値を取得
    pub fn get(&self, key: &str) -> Option<Value> {
        let shared = self.shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        shared.get(key).cloned()
    }

    /// 値を文字列として取得（文字列以外はJSON表現にする）
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| match value {
            Value::String(s) => s,
            other => other.to_string(),
        })
    }

    /// 指定されたキーが存在するかチェック
    pub fn contains_key(&self, key: &str) -> bool {
        let shared = self.shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        shared.contains_key(key)
    }

    /// 全てのキーを取得
    pub fn keys(&self) -> Vec<String> {
        let shared = self.shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        shared.keys().cloned().collect()
    }

    /// 共有データのスナップショットを取得（レンダリング用）
    pub fn snapshot(&self) -> HashMap<String, Value> {
        let shared = self.shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        shared.clone()
    }

    /// コンテキストをクリア
    pub fn clear(&self) {
        let mut shared = self.shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        shared.clear();
    }

    /// コンテキストが空かどうか
    pub fn is_empty(&self) -> bool {
        let shared = self.shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        shared.is_empty()
    }
}

impl Clone for ViewContext {
    fn clone(&self) -> Self {
        Self {
            shared: Mutex::new(self.snapshot()),
        }
    }
}
