pub mod clock;
pub mod notification_service;

pub use clock::Clock;
pub use notification_service::NotificationService;
