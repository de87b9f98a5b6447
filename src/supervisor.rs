//! Reconnection supervisor: watches the session state and rebuilds the
//! connection after retryable drops.

use async_trait::async_trait;
use kurumi_channels::whatsapp::{ConnectionState, WhatsAppConnection};
use kurumi_core::{config::ReconnectConfig, error::KurumiError};
use std::path::Path;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// The part of a connection the supervisor drives.
#[async_trait]
pub trait Lifecycle: Send + Sync {
    fn states(&self) -> watch::Receiver<ConnectionState>;
    async fn reconnect(&self) -> Result<(), KurumiError>;
}

#[async_trait]
impl Lifecycle for WhatsAppConnection {
    fn states(&self) -> watch::Receiver<ConnectionState> {
        WhatsAppConnection::states(self)
    }

    async fn reconnect(&self) -> Result<(), KurumiError> {
        WhatsAppConnection::reconnect(self).await
    }
}

/// What to do about the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorAction {
    /// Nothing to do until the state changes.
    Wait,
    Reconnect { delay: Duration },
    Stop { reason: String },
}

/// Decide the next action. `attempts` counts reconnects since the last `Open`.
pub fn decide(
    state: &ConnectionState,
    attempts: u32,
    policy: &ReconnectConfig,
) -> SupervisorAction {
    match state {
        ConnectionState::Connecting | ConnectionState::Open => SupervisorAction::Wait,
        ConnectionState::ClosedRetryable { reason } => {
            if policy.max_attempts > 0 && attempts >= policy.max_attempts {
                SupervisorAction::Stop {
                    reason: format!("giving up after {attempts} reconnect attempts ({reason})"),
                }
            } else {
                SupervisorAction::Reconnect {
                    delay: Duration::from_secs(policy.delay_secs),
                }
            }
        }
        ConnectionState::ClosedTerminal { reason } => SupervisorAction::Stop {
            reason: format!("session closed permanently ({reason})"),
        },
    }
}

/// Supervise `conn` until it closes for good.
///
/// Returns `Ok(())` when the connection side goes away, `Err` when the
/// session is unrecoverable.
pub async fn supervise(
    conn: &dyn Lifecycle,
    policy: &ReconnectConfig,
    session_dir: &Path,
) -> anyhow::Result<()> {
    let mut states = conn.states();
    let mut attempts: u32 = 0;
    // Set when a reconnect attempt itself failed: no bot is running to
    // publish a new state, so the next decision is made as if it dropped.
    let mut failed: Option<String> = None;

    loop {
        let state = match failed.take() {
            Some(reason) => ConnectionState::ClosedRetryable { reason },
            None => states.borrow_and_update().clone(),
        };
        if state == ConnectionState::Open && attempts > 0 {
            info!("connection restored after {attempts} attempt(s)");
            attempts = 0;
        }

        match decide(&state, attempts, policy) {
            SupervisorAction::Wait => {
                if states.changed().await.is_err() {
                    return Ok(());
                }
            }
            SupervisorAction::Reconnect { delay } => {
                attempts += 1;
                warn!(
                    "connection {state}; reconnecting in {}s (attempt {attempts})",
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
                if let Err(e) = conn.reconnect().await {
                    error!("reconnect failed: {e}");
                    failed = Some(format!("reconnect failed: {e}"));
                }
            }
            SupervisorAction::Stop { reason } => {
                if matches!(state, ConnectionState::ClosedTerminal { .. }) {
                    anyhow::bail!(
                        "{reason}. Delete {} and start again to pair a new device.",
                        session_dir.display()
                    );
                }
                anyhow::bail!(reason);
            }
        }
    }
}
