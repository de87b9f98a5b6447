//! Command registry: the read-only name/alias → descriptor table.

use crate::command::{
    CommandDeps, CommandDescriptor, CommandHeader, CommandUnit, DEFAULT_CATEGORY,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};


/// Name/alias lookup table built once at startup.
#[derive(Debug, Default)]
pub struct Registry {
    by_key: HashMap<String, Arc<CommandDescriptor>>,
    ordered: Vec<Arc<CommandDescriptor>>,
}

impl Registry {
    /// Load every unit of the manifest.
    ///
    /// A unit that fails to load, lacks a name or handler, or is disabled is
    /// skipped; the rest still load. The first unit to claim a key owns it.
    pub fn load(units: &[CommandUnit], deps: &CommandDeps, disabled: &[String]) -> Self {
        let prefix = deps.config.bot.prefix.as_str();
        let mut registry = Self::default();

        for unit in units {
            let manifest = match (unit.load)(deps) {
                Ok(m) => m,
                Err(e) => {
                    error!("failed to load command unit {}: {e}", unit.unit);
                    continue;
                }
            };

            let (Some(name), Some(handler)) = (manifest.name.as_deref(), manifest.handler) else {
                warn!("skipping {}: a command needs both a name and a handler", unit.unit);
                continue;
            };

            let header = match CommandHeader::new(
                name,
                &manifest.aliases,
                &manifest.description,
                manifest.usage.as_deref(),
                prefix,
            ) {
                Ok(h) => h,
                Err(e) => {
                    warn!("skipping {}: {e}", unit.unit);
                    continue;
                }
            };

            if disabled.iter().any(|d| d.eq_ignore_ascii_case(&header.name)) {
                info!("command {} disabled by config", header.name);
                continue;
            }

            let category = manifest
                .category
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

            registry.insert(
                unit.unit,
                Arc::new(CommandDescriptor {
                    header,
                    category,
                    handler,
                }),
            );
        }

        info!("total unique commands: {}", registry.unique_count());
        registry
    }

    fn insert(&mut self, unit: &str, descriptor: Arc<CommandDescriptor>) {
        let name = descriptor.name().to_string();
        if let Some(owner) = self.by_key.get(&name) {
            warn!(
                "skipping {unit}: command name '{name}' already owned by '{}'",
                owner.name()
            );
            return;
        }
        self.by_key.insert(name.clone(), descriptor.clone());

        let mut kept = Vec::new();
        for alias in &descriptor.header.aliases {
            match self.by_key.get(alias) {
                Some(owner) => warn!(
                    "alias '{alias}' of '{name}' ignored: already owned by '{}'",
                    owner.name()
                ),
                None => {
                    self.by_key.insert(alias.clone(), descriptor.clone());
                    kept.push(alias.as_str());
                }
            }
        }

        if kept.is_empty() {
            debug!("command loaded: {name}");
        } else {
            debug!("command loaded: {name} (alias: {})", kept.join(", "));
        }
        self.ordered.push(descriptor);
    }

    /// Look up a command by name or alias, case-insensitively.
    pub fn get(&self, key: &str) -> Option<&Arc<CommandDescriptor>> {
        self.by_key.get(&key.to_lowercase())
    }

    /// Unique descriptors in load order.
    pub fn descriptors(&self) -> &[Arc<CommandDescriptor>] {
        &self.ordered
    }

    pub fn unique_count(&self) -> usize {
        self.ordered.len()
    }

    /// Every lookup key (names and aliases), sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.by_key.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
