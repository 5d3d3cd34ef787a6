use anyhow::Context;
use notisync::config::Config;
use notisync::domain::ports::{EventBus, SessionProvider};
use notisync::infrastructure::events::LocalEventBus;
use notisync::infrastructure::http::HttpNotificationApi;
use notisync::infrastructure::observability::{init_tracing, DEFAULT_LOG_FILTER};
use notisync::infrastructure::runtime::SystemClock;
use notisync::infrastructure::session::StaticSession;
use notisync::{Activation, NotificationStore, NotificationUpdated};
use std::sync::Arc;
use tokio_stream::StreamExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(DEFAULT_LOG_FILTER);

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let session: Arc<dyn SessionProvider> = Arc::new(StaticSession::new(config.auth_token.clone()));
    let api = HttpNotificationApi::new(&config.api_url, session.clone(), config.http_timeout)
        .context("Failed to set up notifications API client")?;
    let event_bus = Arc::new(LocalEventBus::new(config.event_bus_capacity));

    // Log everything other parts of the app would observe
    let mut events = event_bus.subscribe();
    tokio::spawn(async move {
        while let Some(event) = events.next().await {
            match event {
                Ok(event) => tracing::info!(
                    "{}: notification {} updated",
                    NotificationUpdated::NAME,
                    event.notification_id()
                ),
                Err(e) => tracing::warn!("Event stream error: {}", e),
            }
        }
    });

    let store = NotificationStore::new(
        Arc::new(api),
        event_bus,
        session,
        Arc::new(SystemClock::new()),
    );

    match store.activate().await {
        Activation::Loaded(outcome) => tracing::info!("Initial load finished: {:?}", outcome),
        Activation::NoSession => {
            tracing::warn!("NOTIFICATIONS_AUTH_TOKEN not set, nothing to load");
            return Ok(());
        }
        Activation::AlreadyActive => {}
    }

    let snapshot = store.snapshot();
    tracing::info!(
        "{} notifications, {} unread",
        snapshot.notifications.len(),
        snapshot.unread_count
    );
    for notification in &snapshot.recent {
        let marker = if notification.read { " " } else { "*" };
        println!(
            "{} {}  {}  {}",
            marker, notification.created_at, notification.title, notification.message
        );
    }

    Ok(())
}
