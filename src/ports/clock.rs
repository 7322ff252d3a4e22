use chrono::{DateTime, Utc};

/// 時計ポート
///
/// 貸出・返却の日時を外部から注入するための抽象。
/// 延滞料金の計算をテストで再現可能にする。
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
