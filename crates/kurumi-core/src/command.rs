//! Command contract: what a command unit exports and what a handler receives.

use crate::{
    config::{BotConfig, Config},
    error::KurumiError,
    message::{InboundMessage, OutgoingMessage, Payload},
    traits::{Connection, Fetcher},
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::Span;

/// Category used when a unit does not declare one.
pub const DEFAULT_CATEGORY: &str = "umum";

/// Normalised identity of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandHeader {
    /// Lowercase, non-empty lookup key.
    pub name: String,
    /// Lowercase, deduplicated, never equal to `name`.
    pub aliases: Vec<String>,
    pub description: String,
    pub usage: String,
}

impl CommandHeader {
    /// Build a header, normalising the raw declaration.
    ///
    /// Fails when the name is empty after trimming.
    pub fn new(
        name: &str,
        aliases: &[String],
        description: &str,
        usage: Option<&str>,
        prefix: &str,
    ) -> Result<Self, KurumiError> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Err(KurumiError::Command("command name must not be empty".into()));
        }

        let mut clean: Vec<String> = Vec::with_capacity(aliases.len());
        for alias in aliases {
            let alias = alias.trim().to_lowercase();
            if alias.is_empty() || alias == name || clean.contains(&alias) {
                continue;
            }
            clean.push(alias);
        }

        let usage = usage
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{prefix}{name}"));

        Ok(Self {
            name,
            aliases: clean,
            description: description.trim().to_string(),
            usage,
        })
    }
}

/// A registered command.
pub struct CommandDescriptor {
    pub header: CommandHeader,
    pub category: String,
    pub handler: Arc<dyn CommandHandler>,
}

impl CommandDescriptor {
    pub fn name(&self) -> &str {
        &self.header.name
    }
}

impl std::fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("header", &self.header)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// The declaration a command unit exports before validation.
///
/// A manifest without `name` or `handler` is not registered.
#[derive(Default)]
pub struct CommandManifest {
    pub name: Option<String>,
    pub aliases: Vec<String>,
    pub description: String,
    pub usage: Option<String>,
    pub category: Option<String>,
    pub handler: Option<Arc<dyn CommandHandler>>,
}

impl CommandManifest {
    pub fn new(name: &str, handler: Arc<dyn CommandHandler>) -> Self {
        Self {
            name: Some(name.to_string()),
            handler: Some(handler),
            ..Default::default()
        }
    }

    pub fn aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn usage(mut self, usage: &str) -> Self {
        self.usage = Some(usage.to_string());
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }
}

/// Dependencies handed to every command loader at startup.
#[derive(Clone)]
pub struct CommandDeps {
    pub config: Arc<Config>,
    pub fetcher: Arc<dyn Fetcher>,
}

/// Builds one command's manifest. Errors mark the unit as malformed.
pub type CommandLoader = fn(&CommandDeps) -> Result<CommandManifest, KurumiError>;

/// One entry of the static command manifest.
#[derive(Clone, Copy)]
pub struct CommandUnit {
    /// Identifies the unit in load logs.
    pub unit: &'static str,
    pub load: CommandLoader,
}

/// The side-effecting body of a command.
///
/// Handlers report user-facing outcomes by replying; an `Err` means the
/// handler could not even do that and is only logged by the router.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(&self, ctx: InvocationContext<'_>) -> Result<(), KurumiError>;
}

/// Read-only state shared by every invocation.
pub struct SharedContext {
    pub prefix: String,
    /// Unique descriptors, in load order.
    pub commands: Vec<Arc<CommandDescriptor>>,
    pub bot: BotConfig,
    pub started_at: Instant,
}

impl SharedContext {
    /// Whether a command with this primary name is loaded.
    pub fn has_command(&self, name: &str) -> bool {
        self.commands
            .iter()
            .any(|c| c.name().eq_ignore_ascii_case(name))
    }
}

/// Per-call bundle handed to a handler.
pub struct InvocationContext<'a> {
    pub conn: &'a dyn Connection,
    pub message: &'a InboundMessage,
    pub args: &'a [String],
    /// Destination chat JID.
    pub chat: &'a str,
    pub shared: &'a SharedContext,
    /// Logging span for this invocation (`command`, `chat` fields).
    pub span: Span,
}

impl InvocationContext<'_> {
    /// Arguments re-joined with single spaces and trimmed.
    pub fn joined_args(&self) -> String {
        self.args.join(" ").trim().to_string()
    }

    /// Send `payload` to the chat, quoting the triggering message.
    pub async fn reply(&self, payload: Payload) -> Result<(), KurumiError> {
        self.conn
            .send(
                self.chat,
                OutgoingMessage {
                    payload,
                    quoted: Some(self.message.quote()),
                },
            )
            .await
    }

    pub async fn reply_text(&self, text: impl Into<String>) -> Result<(), KurumiError> {
        self.reply(Payload::text(text)).await
    }
}
