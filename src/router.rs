//! Message router: prefix detection, command lookup, and isolated dispatch.

use futures_util::FutureExt;
use kurumi_core::{
    command::{InvocationContext, SharedContext},
    message::{InboundEvent, UpsertKind},
    registry::Registry,
    traits::Connection,
};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, info_span, Instrument};

/// A prefix command split into its lookup key and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Lowercased command name or alias.
    pub key: String,
    pub args: Vec<String>,
}

/// Split `text` into a command key and arguments.
///
/// Returns `None` unless `text` starts with `prefix` (case-sensitive) and
/// names something after it.
pub fn parse_command(text: &str, prefix: &str) -> Option<ParsedCommand> {
    let rest = text.strip_prefix(prefix)?;
    let mut parts = rest.split_whitespace();
    let key = parts.next()?.to_lowercase();
    Some(ParsedCommand {
        key,
        args: parts.map(str::to_string).collect(),
    })
}

/// Routes inbound events to command handlers.
#[derive(Clone)]
pub struct Router {
    registry: Arc<Registry>,
    shared: Arc<SharedContext>,
    conn: Arc<dyn Connection>,
}

impl Router {
    pub fn new(
        registry: Arc<Registry>,
        shared: Arc<SharedContext>,
        conn: Arc<dyn Connection>,
    ) -> Self {
        Self {
            registry,
            shared,
            conn,
        }
    }

    /// Consume the event stream until the connection side hangs up.
    ///
    /// Each event runs in its own task so a slow handler never holds up
    /// the next message.
    pub async fn run(self, mut rx: mpsc::Receiver<InboundEvent>) {
        while let Some(event) = rx.recv().await {
            let router = self.clone();
            tokio::spawn(async move { router.handle(event).await });
        }
        info!("inbound event stream closed; router stopping");
    }

    /// Handle one event. Never fails: handler errors and panics are logged.
    pub async fn handle(&self, event: InboundEvent) {
        if event.kind != UpsertKind::Notify {
            return;
        }
        let Some(message) = event.message else {
            return;
        };
        let Some(content) = message.content.as_ref() else {
            return;
        };

        if message.key.from_me && !self.shared.bot.dev_self {
            return;
        }

        let chat = message.key.remote_jid.as_str();
        let text = content.text().trim();
        debug!(
            chat,
            from_me = message.key.from_me,
            text,
            "inbound message"
        );

        if text.is_empty() || !text.starts_with(self.shared.prefix.as_str()) {
            return;
        }
        let Some(parsed) = parse_command(text, &self.shared.prefix) else {
            return;
        };

        let descriptor = self.registry.get(&parsed.key);
        debug!("command match: {} {}", parsed.key, descriptor.is_some());
        let Some(descriptor) = descriptor else {
            return;
        };

        let span = info_span!("command", command = descriptor.name(), chat);
        let ctx = InvocationContext {
            conn: self.conn.as_ref(),
            message: &message,
            args: &parsed.args,
            chat,
            shared: &self.shared,
            span: span.clone(),
        };

        let outcome = AssertUnwindSafe(descriptor.handler.execute(ctx))
            .catch_unwind()
            .instrument(span)
            .await;

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(command = descriptor.name(), "command failed: {e}"),
            Err(_) => error!(command = descriptor.name(), "command panicked"),
        }
    }
}
