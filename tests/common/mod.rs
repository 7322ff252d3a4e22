#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use rusty_library_lending::adapters::mock::{FixedClock, NotificationService};
use rusty_library_lending::api::handlers::AppState;
use rusty_library_lending::api::router::create_router;
use rusty_library_lending::application::library::{LibraryService, SharedLibrary};
use rusty_library_lending::config::LibraryConfig;
use std::sync::Arc;

/// テスト共通の基準時刻
pub fn checkout_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 1, 10, 0, 0).unwrap()
}

/// テスト用の共有図書館一式
///
/// 時計とNotificationServiceはモック。テスト側から時刻を進めたり
/// 送信された通知を確認したりできる。
pub struct TestLibrary {
    pub library: SharedLibrary,
    pub clock: Arc<FixedClock>,
    pub notifier: Arc<NotificationService>,
}

pub fn create_test_library(config: LibraryConfig) -> TestLibrary {
    let clock = Arc::new(FixedClock::new(checkout_time()));
    let notifier = Arc::new(NotificationService::new());
    let library = SharedLibrary::new(LibraryService::new(config), clock.clone(), notifier.clone());

    TestLibrary {
        library,
        clock,
        notifier,
    }
}

/// 実際のAPIルーターを組み立てる
pub fn create_test_app(library: SharedLibrary) -> axum::Router {
    create_router(Arc::new(AppState { library }))
}
