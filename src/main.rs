use rusty_library_lending::{
    adapters::{SystemClock, TracingNotificationService},
    api::{handlers::AppState, router::create_router},
    application::library::{LibraryService, SharedLibrary},
    config::LibraryConfig,
    console,
};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rusty_library_lending=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = LibraryConfig::from_env().expect("Invalid library configuration");
    tracing::info!(
        loan_period_days = config.loan_period_days,
        per_day_fine_rate = %config.per_day_fine_rate,
        "library configured"
    );

    // Initialize adapters
    let library = SharedLibrary::new(
        LibraryService::new(config),
        Arc::new(SystemClock),
        Arc::new(TracingNotificationService::new()),
    );

    let mode = std::env::args().nth(1).unwrap_or_else(|| "console".into());
    match mode.as_str() {
        "serve" => serve(library).await,
        "console" => {
            let stdin = BufReader::new(tokio::io::stdin());
            if let Err(e) = console::run(library, stdin, tokio::io::stdout()).await {
                tracing::error!("console I/O failed: {}", e);
                std::process::exit(1);
            }
        }
        other => {
            eprintln!("unknown mode {:?}; expected `console` or `serve`", other);
            std::process::exit(2);
        }
    }
}

async fn serve(library: SharedLibrary) {
    let app_state = Arc::new(AppState { library });
    let app = create_router(app_state);

    // Server configuration
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
