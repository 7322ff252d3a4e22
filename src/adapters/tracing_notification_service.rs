use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::ports::notification_service::{NotificationService, Result};

/// 通知をログに出力するだけのNotificationService実装
///
/// 実際の配信手段を持たない単一プロセス構成で使う。
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationService;

impl TracingNotificationService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationService for TracingNotificationService {
    async fn send_checkout_receipt(
        &self,
        contact: &str,
        book_title: &str,
        due_date: DateTime<Utc>,
    ) -> Result<()> {
        tracing::info!(
            contact,
            book_title,
            due_date = %due_date,
            "checkout receipt sent"
        );
        Ok(())
    }

    async fn send_return_receipt(
        &self,
        contact: &str,
        book_title: &str,
        fine: Decimal,
    ) -> Result<()> {
        if fine.is_zero() {
            tracing::info!(contact, book_title, "return receipt sent");
        } else {
            tracing::info!(
                contact,
                book_title,
                fine = %fine.round_dp(2),
                "return receipt sent with fine"
            );
        }
        Ok(())
    }
}
