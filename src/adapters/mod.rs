pub mod mock;
pub mod system_clock;
pub mod tracing_notification_service;

pub use system_clock::SystemClock;
pub use tracing_notification_service::TracingNotificationService;
