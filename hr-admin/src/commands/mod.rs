//! Command line surface
//!
//! `hr-admin auth login|logout|whoami`, `hr-admin empleados ...`,
//! `hr-admin exportar ...` and an interactive `hr-admin consola`.

pub mod auth;
pub mod console;
pub mod employees;
pub mod export;

use crate::app::AppContext;
use crate::config::{AppConfig, ConfigArgs};
use crate::core::Screen;
use crate::view;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hr-admin")]
#[command(about = "GV-RH - Gestión de Recursos Humanos (administración de empleados)")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Session management")]
    Auth {
        #[command(subcommand)]
        cmd: auth::AuthCommands,
    },

    #[command(name = "empleados", about = "Employee roster operations")]
    Employees {
        #[command(subcommand)]
        cmd: employees::EmployeeCommands,
    },

    #[command(name = "exportar", about = "Export the current page of the roster")]
    Export(export::ExportArgs),

    #[command(name = "consola", about = "Interactive roster screen on stdin/stdout")]
    Console,
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let ctx = AppContext::new(config)?;
    match cli.command {
        Commands::Auth { cmd } => auth::handle(cmd, &ctx).await,
        Commands::Employees { cmd } => employees::handle(cmd, &ctx).await,
        Commands::Export(args) => export::handle(args, &ctx).await,
        Commands::Console => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            console::run(&ctx, stdin, &mut std::io::stdout()).await
        }
    }
}

/// Route guard for commands behind the employees screen
pub(crate) fn require_employees_screen(ctx: &AppContext) -> anyhow::Result<()> {
    match ctx.enter(Screen::Employees) {
        Screen::Employees => Ok(()),
        Screen::Login => anyhow::bail!("Inicia sesión primero: hr-admin auth login <usuario>"),
        other => anyhow::bail!("Acceso denegado ({})", other.title()),
    }
}

/// Print the pending notification, if any
pub(crate) fn print_notification(ctx: &AppContext) {
    if let Some(notification) = ctx.notifier.current() {
        println!("{}", view::render_notification(&notification));
    }
}

/// Error out with the pending notification text, or `fallback`
pub(crate) fn fail_with_notification(ctx: &AppContext, fallback: &str) -> anyhow::Error {
    let message = ctx
        .notifier
        .current()
        .map(|n| n.message)
        .unwrap_or_else(|| fallback.to_string());
    anyhow::anyhow!(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "hr-admin",
            "--api-url",
            "http://rh.local:9000",
            "--page-size",
            "500",
            "empleados",
            "listar",
        ]);
        assert!(matches!(cli.command, Commands::Employees { .. }));
        let config = AppConfig::from(cli.config);
        assert_eq!(config.api_url, "http://rh.local:9000");
        assert_eq!(config.page_size, 100);
    }

    #[test]
    fn test_blank_api_url_flag_falls_back() {
        let cli = Cli::parse_from(["hr-admin", "consola", "--api-url", " "]);
        let config = AppConfig::from(cli.config);
        assert_eq!(config.api_url, hr_client::config::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
