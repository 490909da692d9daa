//! Application context: unified state passed to every command handler.
//!
//! `AppContext` is built once in `Cli::run()`: settings are read, the output
//! mode is fixed and the production port implementations are wired here.
//! Adding a new cross-cutting concern requires only one field change here;
//! zero command signatures change.

use anyhow::Result;

use crate::application::ports::UserPrompt;
use crate::application::services::host_lifecycle::HostLifecycle;
use crate::application::services::key_files::KeyFileManager;
use crate::domain::Settings;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::load_settings;
use crate::infra::fs::StdFs;
use crate::infra::prompt::DialoguerPrompt;
use crate::infra::ssh_config::SshConfigLoader;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `SSH_CLI_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Settings read once at process start.
    pub settings: Settings,
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Runs `ssh`, `ssh-keygen` and the editor.
    pub runner: TokioCommandRunner,
    /// Key directory access.
    pub fs: StdFs,
    /// Loads the SSH config file at the start of each operation.
    pub loader: SshConfigLoader,
    /// Terminal prompts.
    pub prompt: DialoguerPrompt,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `SSH_CLI_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be read from the environment.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let settings = load_settings()?;
        Ok(Self::with_settings(flags, settings))
    }

    /// Construct an `AppContext` around already-built settings.
    #[must_use]
    pub fn with_settings(flags: &AppFlags, settings: Settings) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("SSH_CLI_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Self {
            runner: TokioCommandRunner::new(settings.process_timeout),
            settings,
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            fs: StdFs,
            loader: SshConfigLoader,
            prompt: DialoguerPrompt::new(non_interactive),
            non_interactive,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Progress reporter for services; silent in JSON mode.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output).muted(self.is_json())
    }

    /// Create and delete orchestration over the production ports.
    #[must_use]
    pub fn lifecycle(&self) -> HostLifecycle<'_, SshConfigLoader, TokioCommandRunner, StdFs> {
        HostLifecycle::new(&self.loader, &self.runner, &self.fs, &self.settings)
    }

    /// Key file operations over the production ports.
    #[must_use]
    pub fn keys(&self) -> KeyFileManager<'_, TokioCommandRunner, StdFs> {
        KeyFileManager::new(&self.runner, &self.fs, &self.settings)
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `SSH_CLI_YES`
    /// env), returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        self.prompt.confirm(prompt, default)
    }
}
