use clap::Subcommand;
use serde_json::json;

use super::backend_client;
use crate::cli::config::{load_profile, resolve_api_url, save_profile};
use crate::cli::utils::{output_error, output_success, output_value};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Sign in to the backend API")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, env = "ESTATE_PASSWORD", help = "Password (or set ESTATE_PASSWORD)")]
        password: String,
        #[arg(long, help = "Backend API base URL")]
        api_url: Option<String>,
    },

    #[command(about = "Forget the stored token")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password, api_url } => {
            let mut profile = load_profile()?;
            let client = backend_client(api_url.clone(), &profile)?;

            let sign_in = match client.sign_in(&email, &password).await {
                Ok(sign_in) => sign_in,
                Err(e) => {
                    output_error(&output_format, &e.to_string(), Some("LOGIN_FAILED"))?;
                    anyhow::bail!("sign-in failed");
                }
            };

            profile.api_base_url = Some(resolve_api_url(api_url, &profile));
            profile.token = Some(sign_in.token);
            profile.user = Some(sign_in.user.clone());
            profile.signed_in_at = Some(chrono::Utc::now());
            save_profile(&profile)?;

            output_success(
                &output_format,
                &format!("Signed in as {}", sign_in.user.email),
                Some(json!({ "user": sign_in.user })),
            )
        }
        AuthCommands::Logout => {
            let mut profile = load_profile()?;
            let was_signed_in = profile.is_signed_in();
            profile.sign_out();
            save_profile(&profile)?;

            let message = if was_signed_in { "Signed out" } else { "Not signed in" };
            output_success(&output_format, message, None)
        }
        AuthCommands::Status => {
            let profile = load_profile()?;
            let value = json!({
                "signed_in": profile.is_signed_in(),
                "api_base_url": resolve_api_url(None, &profile),
                "user": profile.user,
                "signed_in_at": profile.signed_in_at,
            });

            output_value(&output_format, &value, || match &profile.user {
                Some(user) if profile.is_signed_in() => format!(
                    "Signed in as {} ({}) role {}\n",
                    user.name,
                    user.email,
                    user.role_id.as_deref().unwrap_or("none")
                ),
                _ => "Not signed in\n".to_string(),
            })
        }
    }
}
