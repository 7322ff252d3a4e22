use crate::ports::notification_service::{NotificationService as NotificationServiceTrait, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Notification captured by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentNotification {
    Checkout {
        contact: String,
        book_title: String,
        due_date: DateTime<Utc>,
    },
    Return {
        contact: String,
        book_title: String,
        fine: Decimal,
    },
}

/// Mock implementation of NotificationService
///
/// Records every notification instead of delivering it.
/// Can be switched into a failing mode to exercise error paths.
#[derive(Debug, Default)]
pub struct NotificationService {
    sent: Mutex<Vec<SentNotification>>,
    failing: AtomicBool,
}

impl NotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail
    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, notification: SentNotification) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("mock notification failure".into());
        }
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    async fn send_checkout_receipt(
        &self,
        contact: &str,
        book_title: &str,
        due_date: DateTime<Utc>,
    ) -> Result<()> {
        self.record(SentNotification::Checkout {
            contact: contact.to_string(),
            book_title: book_title.to_string(),
            due_date,
        })
    }

    async fn send_return_receipt(
        &self,
        contact: &str,
        book_title: &str,
        fine: Decimal,
    ) -> Result<()> {
        self.record(SentNotification::Return {
            contact: contact.to_string(),
            book_title: book_title.to_string(),
            fine,
        })
    }
}
