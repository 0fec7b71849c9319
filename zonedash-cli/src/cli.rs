//! CLI argument parsing and command dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use zonedash_core::Outcome;

use crate::commands::auth::{AuthCommand, PasswordCommand, SignupCommand};
use crate::commands::check::CheckCommand;
use crate::commands::records::RecordCommand;
use crate::commands::zones::ZoneCommand;
use crate::config::{FileConfig, FlagOverrides, Settings};

/// Command-line interface for the zonedash DNS hosting dashboard.
#[derive(Parser)]
#[command(name = "zonedash")]
#[command(version)]
#[command(about = "Manage hosted DNS zones and records from the terminal")]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

/// Global options available to all commands.
#[derive(Args, Clone)]
pub struct GlobalOptions {
    /// API base URL (overrides the config file and ZONEDASH_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long = "timeout", global = true)]
    pub timeout_secs: Option<u64>,

    /// Where the session token is kept between invocations.
    #[arg(long = "token-file", env = "ZONEDASH_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,

    /// Config file to read instead of the platform default.
    #[arg(long, env = "ZONEDASH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output JSON instead of human-readable format.
    #[arg(long = "json", global = true)]
    pub is_json: bool,

    /// Answer yes to confirmation prompts.
    #[arg(short = 'y', long = "yes", global = true)]
    pub assume_yes: bool,

    /// Enable debug-level logging.
    #[arg(short = 'v', long = "verbose", global = true)]
    pub is_verbose: bool,

    /// Suppress all logging output.
    #[arg(short = 'q', long = "quiet", global = true)]
    pub is_quiet: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with email and password, or print the GitHub sign-in URL.
    Login(crate::commands::auth::LoginArgs),

    /// Forget the stored session.
    Logout,

    /// Show the signed-in account.
    Whoami,

    /// Create an account (two steps: request a code, then verify it).
    #[command(subcommand)]
    Signup(SignupCommand),

    /// Reset or change the account password.
    #[command(subcommand)]
    Password(PasswordCommand),

    /// Finish GitHub sign-in with the callback query string.
    OauthCallback(crate::commands::auth::OAuthCallbackArgs),

    /// Hosted zones.
    #[command(subcommand)]
    Zones(ZoneCommand),

    /// Records of a zone.
    #[command(subcommand)]
    Records(RecordCommand),

    /// Public name server counters.
    Stats,

    /// Public DNS checker.
    #[command(subcommand)]
    Check(CheckCommand),
}

impl Cli {
    /// Resolve configuration and run the selected command.
    pub async fn run(self) -> Result<Outcome> {
        let config_path = self.global.config.clone().or_else(FileConfig::default_path);
        let file = match &config_path {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        let flags = FlagOverrides {
            api_url: self.global.api_url.clone(),
            timeout_secs: self.global.timeout_secs,
            token_path: self.global.token_file.clone(),
        };
        let settings = Settings::resolve(&file, |key| std::env::var(key).ok(), &flags)?;
        tracing::debug!("Using API at {}", settings.api.base_url);

        let global = &self.global;
        match self.command {
            Commands::Login(args) => AuthCommand::Login(args).run(&settings, global).await,
            Commands::Logout => AuthCommand::Logout.run(&settings, global).await,
            Commands::Whoami => AuthCommand::Whoami.run(&settings, global).await,
            Commands::Signup(cmd) => AuthCommand::Signup(cmd).run(&settings, global).await,
            Commands::Password(cmd) => AuthCommand::Password(cmd).run(&settings, global).await,
            Commands::OauthCallback(args) => {
                AuthCommand::OAuthCallback(args).run(&settings, global).await
            }
            Commands::Zones(cmd) => cmd.run(&settings, global).await,
            Commands::Records(cmd) => cmd.run(&settings, global).await,
            Commands::Stats => crate::commands::stats::run(&settings, global).await,
            Commands::Check(cmd) => cmd.run(&settings, global).await,
        }
    }
}
