pub mod catalog;

use std::collections::HashMap;

use tracing::info;

/// What a command handler gets to see about the message that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    pub chat_id: i64,
    /// Everything after the command name, trimmed.
    pub args: String,
    pub sender_username: Option<String>,
}

/// Produces the reply text for one command.
pub type CommandFn = Box<dyn Fn(&CommandContext) -> String + Send + Sync>;

/// Command name (without the slash) to reply producer.
///
/// Built once at startup and only read afterwards, so it can be shared
/// between dispatch tasks behind an `Arc` without locking.
#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, CommandFn>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every command the bot answers.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register_text("start", catalog::START_TEXT);
        registry.register_text("help", catalog::HELP_TEXT);
        registry.register_text("rules", catalog::RULES_TEXT);
        registry.register_text("about", catalog::ABOUT_TEXT);
        registry.register_text("group", catalog::GROUP_TEXT);
        registry.register_text("roadmap", catalog::ROADMAP_TEXT);
        registry.register_text("useful", catalog::USEFUL_TEXT);
        registry.register_text("latest", catalog::LATEST_TEXT);
        registry.register("version", |ctx| catalog::version_text(&ctx.args));
        registry.register("warn", |ctx| {
            catalog::warn_text(ctx.sender_username.as_deref())
        });
        info!("Registered {} bot commands", registry.len());
        registry
    }

    /// Register (or replace) the handler for `name`.
    pub fn register<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(&CommandContext) -> String + Send + Sync + 'static,
    {
        self.handlers.insert(name.to_string(), Box::new(handler));
    }

    fn register_text(&mut self, name: &str, text: &'static str) {
        self.register(name, move |_| text.to_string());
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, name: &str) -> Option<&CommandFn> {
        self.handlers.get(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(args: &str, sender: Option<&str>) -> CommandContext {
        CommandContext {
            chat_id: 1,
            args: args.to_string(),
            sender_username: sender.map(str::to_string),
        }
    }

    #[test]
    fn test_builtin_commands() {
        let registry = CommandRegistry::builtin();
        assert_eq!(
            registry.names(),
            vec!["about", "group", "help", "latest", "roadmap", "rules", "start", "useful", "version", "warn"]
        );
    }

    #[test]
    fn test_static_command_ignores_arguments() {
        let registry = CommandRegistry::builtin();
        let help = registry.lookup("help").unwrap();
        assert_eq!(help(&ctx("", None)), catalog::HELP_TEXT);
        assert_eq!(help(&ctx("please", Some("ali"))), catalog::HELP_TEXT);
    }

    #[test]
    fn test_version_uses_arguments() {
        let registry = CommandRegistry::builtin();
        let version = registry.lookup("version").unwrap();
        assert_eq!(version(&ctx("9.9.9", None)), catalog::version_text("9.9.9"));
        assert!(version(&ctx("1.21.0", None)).starts_with("Go 1.21.0"));
    }

    #[test]
    fn test_warn_uses_sender() {
        let registry = CommandRegistry::builtin();
        let warn = registry.lookup("warn").unwrap();
        assert!(warn(&ctx("", Some("vali"))).contains("@vali"));
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry = CommandRegistry::builtin();
        assert!(registry.lookup("Help").is_none());
        assert!(registry.lookup("/help").is_none());
        assert!(registry.lookup("nope").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = CommandRegistry::new();
        assert!(registry.is_empty());
        registry.register("ping", |_| "pong".to_string());
        registry.register("ping", |ctx| format!("pong {}", ctx.args));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("ping").unwrap()(&ctx("x", None)), "pong x");
    }
}
