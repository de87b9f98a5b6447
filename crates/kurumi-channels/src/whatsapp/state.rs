//! Connection lifecycle states published to the supervisor.

/// Where the session currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Building the client, handshaking, or waiting for a QR scan.
    Connecting,
    /// Connected and receiving events.
    Open,
    /// Dropped; a reconnect may succeed.
    ClosedRetryable { reason: String },
    /// The session was revoked (logged out from the phone). Needs re-pairing.
    ClosedTerminal { reason: String },
}

impl ConnectionState {
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            Self::ClosedRetryable { .. } | Self::ClosedTerminal { .. }
        )
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connecting => write!(f, "connecting"),
            Self::Open => write!(f, "open"),
            Self::ClosedRetryable { reason } => write!(f, "closed (retryable): {reason}"),
            Self::ClosedTerminal { reason } => write!(f, "closed (terminal): {reason}"),
        }
    }
}
