//! セッションストアの実装（フラッシュデータ）

use std::collections::HashMap;
use std::sync::Mutex;

use log::debug;

use crate::error::Error;

/// セッションストアの特性
///
/// フラッシュデータは「1回だけ読める」単一スロットのキー/値として扱う。
/// 読み出し前の上書きは後勝ち、読み出しと同時にクリアされる。
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// フラッシュデータを書き込む（既存キーは上書き）
    fn flash(&self, key: &str, value: &str) -> Result<(), Error>;

    /// フラッシュデータを読み出してクリアする
    fn take_flash(&self, key: &str) -> Result<Option<String>, Error>;
}

/// メモリ上のセッションストア
///
/// ストア特性のリファレンス実装。永続化バックエンドは対象外
#[derive(Debug, Default)]
pub struct MemorySession {
    flash_data: Mutex<HashMap<String, String>>,
}

impl MemorySession {
    /// 新しいMemorySessionを作成
    pub fn new() -> Self {
        Self {
            flash_data: Mutex::new(HashMap::new()),
        }
    }
}

impl SessionStore for MemorySession {
    fn flash(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut flash_data = self
            .flash_data
            .lock()
            .map_err(|_| Error::SessionError("flash store lock poisoned".to_string()))?;
        debug!("Flashing session data: {}", key);
        flash_data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn take_flash(&self, key: &str) -> Result<Option<String>, Error> {
        let mut flash_data = self
            .flash_data
            .lock()
            .map_err(|_| Error::SessionError("flash store lock poisoned".to_string()))?;
        Ok(flash_data.remove(key))
    }
}
