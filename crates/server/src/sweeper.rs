//! Idle session sweeper.
//!
//! Conversations abandoned mid-flow would otherwise sit in the store
//! forever. A background task removes records whose last transition is
//! older than the configured TTL; a swept customer simply starts over
//! from the welcome on their next message.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use balcao_persistence::SessionStore;

/// Start a background task that periodically purges idle sessions.
///
/// Returns a shutdown sender that can be used to stop the task. The
/// sweep runs every `every` and removes sessions idle for longer than
/// `max_age`.
pub fn start_sweeper(
    sessions: Arc<dyn SessionStore>,
    max_age: chrono::Duration,
    every: Duration,
) -> watch::Sender<bool> {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        let mut interval_timer = tokio::time::interval(every);
        interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval_timer.tick() => {
                    match sessions.purge_idle(max_age).await {
                        Ok(0) => {},
                        Ok(removed) => {
                            tracing::info!(removed, "Session sweep: removed idle sessions");
                        },
                        Err(e) => {
                            tracing::warn!(error = %e, "Session sweep failed");
                        },
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!("Session sweeper shutting down");
                        break;
                    }
                }
            }
        }
    });

    shutdown_tx
}

#[cfg(test)]
mod tests {
    use super::*;
    use balcao_core::Stage;
    use balcao_persistence::InMemorySessionStore;

    /// Test that the sweeper purges idle sessions and stops on shutdown.
    #[tokio::test]
    async fn test_sweeper_purges_idle_sessions() {
        let store = Arc::new(InMemorySessionStore::new());
        store
            .upsert("5511999990000@c.us", Stage::MainMenu, "Maria")
            .await
            .unwrap();
        assert_eq!(store.len(), 1);

        // Zero max age makes every session idle immediately.
        let shutdown = start_sweeper(
            store.clone(),
            chrono::Duration::zero(),
            Duration::from_millis(10),
        );

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.len(), 0);

        shutdown.send(true).unwrap();
    }
}
