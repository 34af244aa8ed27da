use log::info;

use crate::error::Error;
use super::core::Helpers;

/// 経過時間の単位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
}

impl TimeUnit {
    /// 単位トークン（'ms'/'s'/'m'）からTimeUnitに変換
    pub fn parse(unit: &str) -> Result<Self, Error> {
        match unit {
            "ms" => Ok(TimeUnit::Milliseconds),
            "s" => Ok(TimeUnit::Seconds),
            "m" => Ok(TimeUnit::Minutes),
            other => Err(Error::InvalidTimeUnit(other.to_string())),
        }
    }

    /// 単位トークンを取得
    pub fn token(&self) -> &'static str {
        match self {
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "m",
        }
    }

    /// 秒数を自単位の整数値へ変換（ゼロ方向への切り捨て）
    pub fn convert(&self, seconds: f64) -> i64 {
        match self {
            TimeUnit::Milliseconds => (seconds * 1000.0) as i64,
            TimeUnit::Seconds => seconds as i64,
            TimeUnit::Minutes => (seconds / 60.0) as i64,
        }
    }
}

impl Helpers {
    /// 過去のタイムスタンプから現在までの経過時間を取得
    ///
    /// `time_record` は注入された時計と同じ時間軸で採取した秒タイムスタンプ。
    /// 単位は 'ms'（ミリ秒）、's'（秒）、'm'（分）のいずれか。
    /// それ以外の単位はエラー
    pub fn current_time_difference(&self, time_record: f64, unit: &str) -> Result<i64, Error> {
        let unit = TimeUnit::parse(unit)?;
        let elapsed = self.clock.now() - time_record;
        Ok(unit.convert(elapsed))
    }

    /// パフォーマンス統計をログへ書き込む
    ///
    /// ファサード構築時点からの経過時間とリクエストの素性をinfoで記録する。
    /// ログ書き込み自体の失敗はロガー側の契約に委ねる
    pub fn log_performance(&self) {
        let elapsed_ms = TimeUnit::Milliseconds.convert(self.clock.now() - self.started_at);
        info!(
            "Performance: {} {} handled in {} ms",
            self.request.method, self.request.path, elapsed_ms
        );
    }
}
