//! Command-line interface.

pub mod completions;
pub mod init;
pub mod output;
mod project;
pub mod resolve;
pub mod run;
pub mod secrets;
pub mod sync;
pub mod team;
pub mod whoami;

use clap::{Parser, Subcommand, ValueEnum};

use crate::error::Result;

/// keyref - secret references for layered env files.
#[derive(Parser)]
#[command(
    name = "keyref",
    about = "Resolve ref:// secret references in .env files",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize keyref in the current directory
    Init {
        /// Project name (defaults to the directory name)
        #[arg(short, long)]
        project: Option<String>,
        /// Your team member name (defaults to the OS username)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Store a secret
    Set {
        /// Secret path (e.g., secrets/api_key)
        key: String,
        /// Secret value
        value: String,
        #[command(flatten)]
        scope: Scope,
    },

    /// Print a secret
    Get {
        /// Secret path
        key: String,
        #[command(flatten)]
        scope: Scope,
    },

    /// Remove a secret
    Rm {
        /// Secret path
        key: String,
        #[command(flatten)]
        scope: Scope,
    },

    /// List secret paths
    List {
        #[command(flatten)]
        scope: Scope,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the env with every reference resolved
    Resolve {
        /// Profile overlay and secret namespace
        #[arg(short, long, env = "KEYREF_PROFILE")]
        profile: Option<String>,
        /// Fail if any reference cannot be resolved
        #[arg(long)]
        strict: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Env)]
        format: Format,
    },

    /// Run a command with the resolved env
    Run {
        /// Profile overlay and secret namespace
        #[arg(short, long, env = "KEYREF_PROFILE")]
        profile: Option<String>,
        /// Fail if any reference cannot be resolved
        #[arg(long)]
        strict: bool,
        /// Command and arguments to run
        #[arg(trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },

    /// Manage team members
    Team {
        #[command(subcommand)]
        action: TeamAction,
    },

    /// Share secrets as an encrypted envelope
    Sync {
        #[command(subcommand)]
        action: SyncAction,
    },

    /// Print your public key
    Whoami,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Backend and namespace selection shared by secret commands.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct Scope {
    /// Backend name (defaults to the first configured backend)
    #[arg(short, long)]
    pub backend: Option<String>,
    /// Profile namespace
    #[arg(short, long, env = "KEYREF_PROFILE")]
    pub profile: Option<String>,
}

/// Output format for `resolve`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Env,
    Json,
}

/// Supported shells for completions.
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Team subcommands.
#[derive(Subcommand)]
pub enum TeamAction {
    /// Add a team member by their public key
    Add {
        /// Member name
        name: String,
        /// age public key
        key: String,
    },

    /// List team members
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a team member
    Rm {
        /// Member name
        name: String,
    },
}

/// Sync subcommands.
#[derive(Subcommand)]
pub enum SyncAction {
    /// Encrypt the namespace for the team
    Export {
        #[command(flatten)]
        scope: Scope,
        /// Output file, or - for stdout
        #[arg(short, long, default_value = crate::core::constants::SYNC_FILE)]
        output: String,
        /// Extra recipient public key (repeatable)
        #[arg(short, long = "recipient")]
        recipients: Vec<String>,
    },

    /// Decrypt an envelope into a backend
    Import {
        #[command(flatten)]
        scope: Scope,
        /// Envelope file, or - for stdin
        #[arg(short, long, default_value = crate::core::constants::SYNC_FILE)]
        input: String,
        /// Identity file to decrypt with (repeatable; defaults to ~/.keyref/identity)
        #[arg(long = "identity")]
        identities: Vec<std::path::PathBuf>,
        /// Overwrite keys that already exist
        #[arg(short, long)]
        force: bool,
    },
}

/// Execute a command, returning the process exit code.
pub fn execute(command: Command) -> Result<i32> {
    use Command::*;

    match command {
        Init { project, name } => init::execute(project, name),
        Set { key, value, scope } => secrets::set(&key, &value, &scope),
        Get { key, scope } => secrets::get(&key, &scope),
        Rm { key, scope } => secrets::rm(&key, &scope),
        List { scope, json } => secrets::list(&scope, json),
        Resolve {
            profile,
            strict,
            format,
        } => resolve::execute(profile.as_deref(), strict, format),
        Run {
            profile,
            strict,
            command,
        } => return run::execute(profile.as_deref(), strict, &command),
        Team { action } => match action {
            TeamAction::Add { name, key } => team::add(&name, &key),
            TeamAction::List { json } => team::list(json),
            TeamAction::Rm { name } => team::rm(&name),
        },
        Sync { action } => match action {
            SyncAction::Export {
                scope,
                output,
                recipients,
            } => sync::export(&scope, &output, &recipients),
            SyncAction::Import {
                scope,
                input,
                identities,
                force,
            } => sync::import(&scope, &input, &identities, force),
        },
        Whoami => whoami::execute(),
        Completions { shell } => completions::execute(shell),
    }?;

    Ok(0)
}
