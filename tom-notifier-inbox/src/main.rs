mod application;

use application::{ApplicationEnv, TracingPlatformNotifier};
use std::sync::Arc;
use tom_notifier_inbox::{presentation::unread_badge, session::InboxSession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    #[cfg(debug_assertions)]
    {
        // Ignore error because .env file is not required
        // as long as env variables are set
        let _ = dotenvy::dotenv();
    }

    let env = ApplicationEnv::parse()?;

    application::setup_tracing(&env)?;

    let notifier = Arc::new(TracingPlatformNotifier::new(env.push_permission));
    let session = InboxSession::start(env.session_config(), env.credentials(), notifier).await?;

    if env.enable_push_notifications {
        // Opt-in variable is the user's request for system notifications
        let permission = session.controller().enable_push_notifications().await;
        tracing::info!(%permission, "push notifications");
    }

    let mut state_rx = session.store().subscribe();
    let mut reconciliation_rx = session.store().reconciliation_errors();

    let shutdown = application::shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,

            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }

                let state = state_rx.borrow_and_update().clone();
                tracing::info!(
                    status = ?state.status(),
                    notifications = state.len(),
                    unread = state.unread_count(),
                    badge = ?unread_badge(state.unread_count(), env.badge_limit),
                    "inbox changed"
                );
            }

            err = reconciliation_rx.recv() => {
                match err {
                    Ok(err) => tracing::error!(%err, rolled_back = err.rolled_back, "reconciliation failed"),
                    Err(err) => tracing::warn!(%err, "reconciliation errors lost"),
                }
            }
        }
    }

    session.close().await;

    Ok(())
}
