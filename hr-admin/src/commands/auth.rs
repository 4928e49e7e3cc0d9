use crate::app::AppContext;
use clap::Subcommand;
use std::io::{BufRead, Write};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Log in and persist the session")]
    Login {
        #[arg(help = "Username")]
        username: String,

        #[arg(long, env = "HR_PASSWORD", hide_env_values = true, help = "Password (prompted when omitted)")]
        password: Option<String>,
    },

    #[command(about = "Clear the stored session")]
    Logout,

    #[command(about = "Show the logged-in user and roles")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, ctx: &AppContext) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt_password()?,
            };
            let session = ctx
                .login(&username, &password)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!(
                "Sesión iniciada como {} ({})",
                session.username().unwrap_or(&username),
                roles_text(&session)
            );
        }
        AuthCommands::Logout => {
            ctx.logout()?;
            println!("Sesión cerrada");
        }
        AuthCommands::Whoami => {
            let session = ctx.session.snapshot();
            match session.username() {
                Some(user) if session.is_authenticated() => {
                    println!("{} ({})", user, roles_text(&session));
                }
                _ => println!("Sin sesión"),
            }
        }
    }
    Ok(())
}

fn roles_text(session: &hr_client::Session) -> String {
    if session.roles().is_empty() {
        "sin roles".to_string()
    } else {
        session.roles().iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

fn prompt_password() -> anyhow::Result<String> {
    print!("Contraseña: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
