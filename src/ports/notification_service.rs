use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 通知サービスポート
///
/// 利用者への控え（レシート）の配信メカニズムを抽象化する。
/// 宛先は利用者の連絡先。実装はメール、SMS、ログ出力などが考えられる。
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// 貸出控えを送信する
    ///
    /// 貸出成功後に呼ばれる。
    async fn send_checkout_receipt(
        &self,
        contact: &str,
        book_title: &str,
        due_date: DateTime<Utc>,
    ) -> Result<()>;

    /// 返却控えを送信する
    ///
    /// 返却成功後に呼ばれる。延滞料金がなければ`fine`は0。
    async fn send_return_receipt(
        &self,
        contact: &str,
        book_title: &str,
        fine: Decimal,
    ) -> Result<()>;
}
