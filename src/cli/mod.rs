//! CLI Module
//!
//! Command-line interface for Placement Hub using Clap v4. With no subcommand
//! the interactive terminal UI starts.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{ApiClient, Role};
use crate::auth::{LoginForm, RegistrationForm};
use crate::config::Config;
use crate::navigation::Outcome;
use crate::profile::{ProfileForm, load_profile_file};
use crate::session::Session;

/// Placement Hub - campus placement tracking from the terminal
#[derive(Parser, Debug)]
#[command(name = "placement-hub")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug mode (writes log files to the data directory)
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// True when the terminal UI will own the screen.
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Ui))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive terminal UI (default)
    Ui,

    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "PLACEMENT_HUB_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "PLACEMENT_HUB_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(short, long, value_enum, default_value = "student")]
        role: RoleArg,
    },

    /// Submit the student profile from a TOML file
    Profile {
        /// File holding the profile fields
        #[arg(short, long)]
        file: PathBuf,

        /// Résumé to attach (pdf, doc or docx)
        #[arg(short, long)]
        resume: String,
    },

    /// Forget the stored session
    Logout,

    /// Show backend and session status
    Status,

    /// Initialize configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration
    Config {
        /// Print only the config file location
        #[arg(long)]
        show_path: bool,
    },

    /// Log management operations
    Logs {
        #[command(subcommand)]
        operation: LogCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// Show log file location and status
    Status,
    /// Clean up old log files
    Clean {
        /// Maximum age in days (default: 7)
        #[arg(short = 'a', long, default_value = "7")]
        days: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RoleArg {
    Student,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Student => Role::Student,
            RoleArg::Admin => Role::Admin,
        }
    }
}

/// Main CLI entry point
pub async fn run(cli: Cli) -> Result<()> {
    if cli.debug {
        tracing::info!("Debug mode enabled");
    }

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        None | Some(Commands::Ui) => cmd_ui(&config).await,
        Some(Commands::Login { email, password }) => cmd_login(&config, &email, &password).await,
        Some(Commands::Register {
            first_name,
            last_name,
            email,
            password,
            role,
        }) => {
            let mut form = RegistrationForm::new();
            form.values.set("first_name", first_name)?;
            form.values.set("last_name", last_name)?;
            form.values.set("email", email)?;
            form.values.set("password", password)?;
            form.role = role.into();
            cmd_register(&config, form).await
        }
        Some(Commands::Profile { file, resume }) => cmd_profile(&config, &file, &resume).await,
        Some(Commands::Logout) => cmd_logout(&config),
        Some(Commands::Status) => cmd_status(&config),
        Some(Commands::Init { force }) => cmd_init(force),
        Some(Commands::Config { show_path }) => cmd_config(&config, show_path),
        Some(Commands::Logs { operation }) => cmd_logs(&config, operation),
    }
}

/// Load configuration from file or defaults
fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config = if let Some(path) = config_path {
        tracing::info!("Loading configuration from custom path: {}", path);
        Config::load_from_path(path)?
    } else {
        tracing::debug!("Loading default configuration");
        Config::load()?
    };

    config.validate()?;

    Ok(config)
}

fn client(config: &Config) -> Result<ApiClient> {
    ApiClient::from_config(&config.backend).context("Failed to create HTTP client")
}

/// Print the notice of a finished request; failures become the command's error.
fn report(outcome: Outcome) -> Result<()> {
    if outcome.notice.is_error() {
        anyhow::bail!(outcome.notice.text);
    }
    println!("{}", outcome.notice.text);
    Ok(())
}

async fn cmd_ui(config: &Config) -> Result<()> {
    let backend = client(config)?;
    let session = Session::from_config(&config.session);
    let app = crate::tui::App::new(Arc::new(backend), session, config.ui.clone());
    crate::tui::run(app).await
}

async fn cmd_login(config: &Config, email: &str, password: &str) -> Result<()> {
    let backend = client(config)?;
    let mut session = Session::from_config(&config.session);
    let mut form = LoginForm::with_credentials(email, password);

    let outcome = form
        .submit(&backend, &mut session, std::time::Duration::ZERO)
        .await
        .map_err(|rejection| rejected(rejection.notice()))?;

    report(outcome)?;
    if !session.is_authenticated() {
        println!("Warning: the backend did not issue a token");
    }
    Ok(())
}

async fn cmd_register(config: &Config, mut form: RegistrationForm) -> Result<()> {
    let backend = client(config)?;
    let outcome = form
        .submit(&backend, std::time::Duration::ZERO)
        .await
        .map_err(|rejection| rejected(rejection.notice()))?;

    let next = outcome.navigate.map(|(route, _)| route);
    report(outcome)?;
    if let Some(route) = next {
        println!("Next: {}", route.title());
    }
    Ok(())
}

async fn cmd_profile(config: &Config, file: &std::path::Path, resume: &str) -> Result<()> {
    let mut form = ProfileForm::new();
    form.values = load_profile_file(file)?;
    form.select_resume(resume)?;

    let backend = client(config)?;
    let session = Session::from_config(&config.session);
    let outcome = form
        .submit(&backend, &session)
        .await
        .map_err(|rejection| rejected(rejection.notice()))?;

    report(outcome)
}

fn rejected(notice: Option<crate::navigation::Notice>) -> anyhow::Error {
    match notice {
        Some(notice) => anyhow::anyhow!(notice.text),
        None => anyhow::anyhow!("A request is already in progress"),
    }
}

fn cmd_logout(config: &Config) -> Result<()> {
    let mut session = Session::from_config(&config.session);
    session.clear()?;
    println!("Logged out");
    Ok(())
}

fn cmd_status(config: &Config) -> Result<()> {
    let session = Session::from_config(&config.session);

    println!("Placement Hub Status\n");
    println!("Backend: {}", config.backend.base_url);
    println!("Timeout: {}s", config.backend.timeout_secs);
    match session.issued_at() {
        Some(issued) if session.is_authenticated() => {
            println!("Session: logged in (since {})", issued.format("%Y-%m-%d %H:%M UTC"))
        }
        _ if session.is_authenticated() => println!("Session: logged in"),
        _ => println!("Session: not logged in"),
    }
    if session.is_persistent() {
        println!("Session file: {}", config.session.path.display());
    } else {
        println!("Session file: (not persisted)");
    }
    Ok(())
}

/// Initialize configuration file
fn cmd_init(force: bool) -> Result<()> {
    println!("Placement Hub Configuration Initialization\n");

    let config_path =
        Config::system_config_path().context("Could not determine config directory")?;

    if config_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            config_path.display()
        );
    }

    Config::default().save(&config_path)?;

    println!("Configuration initialized at: {}", config_path.display());
    println!("\nNext steps:");
    println!("   1. Set backend.base_url to your placement server");
    println!("   2. Run 'placement-hub' to start");

    Ok(())
}

fn cmd_config(config: &Config, show_path: bool) -> Result<()> {
    let path = Config::system_config_path();
    if show_path {
        match path {
            Some(path) => println!("{}", path.display()),
            None => println!("(no config directory on this platform)"),
        }
        return Ok(());
    }

    let rendered = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", rendered);
    if let Some(path) = path {
        println!("# system config: {}", path.display());
    }
    Ok(())
}

fn cmd_logs(config: &Config, operation: LogCommands) -> Result<()> {
    use crate::logging;

    let log_dir = logging::resolve_log_dir(config.logging.file.as_deref());

    match operation {
        LogCommands::Status => {
            println!("Log directory: {}", log_dir.display());

            if !log_dir.exists() {
                println!("Status: no logs found");
                println!("\nRun with -d to write debug logs");
                return Ok(());
            }

            let mut file_count = 0;
            let mut total_size = 0u64;
            for entry in std::fs::read_dir(&log_dir)? {
                let entry = entry?;
                if entry.file_name().to_string_lossy().contains(".log")
                    && let Ok(metadata) = entry.metadata()
                {
                    file_count += 1;
                    total_size += metadata.len();
                }
            }

            println!("Log files: {}", file_count);
            println!("Total size: {:.2} KB", total_size as f64 / 1024.0);
            Ok(())
        }
        LogCommands::Clean { days } => {
            let removed = logging::cleanup_old_logs(&log_dir, days)?;
            println!("Removed {} log file(s) older than {} days", removed, days);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["placement-hub"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.is_interactive());

        let cli = Cli::try_parse_from(["placement-hub", "-d", "ui"]).unwrap();
        assert!(cli.debug);
        assert!(cli.is_interactive());
    }

    #[test]
    fn test_register_role_defaults_to_student() {
        let cli = Cli::try_parse_from([
            "placement-hub",
            "register",
            "--first-name",
            "Asha",
            "--last-name",
            "Rao",
            "--email",
            "asha@college.edu",
            "--password",
            "s3cret",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Register { role, .. }) => {
                assert_eq!(role, RoleArg::Student);
                assert_eq!(Role::from(role), Role::Student);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(!Cli::try_parse_from(["placement-hub", "status"]).unwrap().is_interactive());
    }

    #[test]
    fn test_profile_requires_resume() {
        let result = Cli::try_parse_from(["placement-hub", "profile", "--file", "me.toml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_report_failure_is_error() {
        let err = report(Outcome::failed("Registration Failed")).unwrap_err();
        assert_eq!(err.to_string(), "Registration Failed");
    }
}
