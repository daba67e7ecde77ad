use std::sync::Arc;

use clap::Subcommand;
use futures::future::join_all;
use serde_json::{json, Value};

use super::backend_client;
use crate::access::{AccessState, ExclusionList, RouteAccessGate};
use crate::cli::config::{load_profile, require_token};
use crate::cli::utils::output_value;
use crate::cli::OutputFormat;
use crate::config::{config, FailurePolicy};
use crate::notify::Notifications;

#[derive(Subcommand)]
pub enum AccessCommands {
    #[command(about = "Ask the backend whether the signed-in user may open each path")]
    Check {
        #[arg(required = true, help = "Route paths to check")]
        paths: Vec<String>,
        #[arg(long, help = "Deny when the check cannot be performed")]
        fail_closed: bool,
    },

    #[command(about = "List the paths that bypass access checks")]
    Excluded,
}

pub async fn handle(cmd: AccessCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AccessCommands::Check { paths, fail_closed } => {
            let profile = load_profile()?;
            let token = require_token(&profile)?;
            let client = Arc::new(backend_client(None, &profile)?);

            let policy = if fail_closed {
                FailurePolicy::FailClosed
            } else {
                config().access.failure_policy
            };
            let gate = RouteAccessGate::new(
                client,
                ExclusionList::from_config(&config().access),
                policy,
                Arc::new(Notifications::new()),
            );

            let outcomes = join_all(paths.iter().map(|path| gate.navigate(token, path))).await;
            let results: Vec<(&String, AccessState)> = paths.iter().zip(outcomes).collect();

            let value = Value::Array(
                results
                    .iter()
                    .map(|(path, state)| json!({ "path": path, "state": state, "view": state.view() }))
                    .collect(),
            );

            output_value(&output_format, &value, || {
                results
                    .iter()
                    .map(|(path, state)| {
                        let mark = if state.is_granted() { "✓" } else { "✗" };
                        format!("{} {}\n", mark, path)
                    })
                    .collect()
            })
        }
        AccessCommands::Excluded => {
            let exclusions = ExclusionList::from_config(&config().access);
            let value = json!({
                "excluded_paths": exclusions.prefixes(),
                "failure_policy": config().access.failure_policy,
            });

            output_value(&output_format, &value, || {
                exclusions.prefixes().iter().map(|p| format!("{}\n", p)).collect()
            })
        }
    }
}
