use super::{load_config, trello};
use crate::output::{print_json, print_table};
use bigboard_core::webhook::register_board_webhook;
use bigboard_core::BoardError;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum WebhooksSubcommand {
    /// List webhooks registered under the configured token
    List,

    /// Replace the token's webhooks with one on the primary board
    Register {
        /// Callback URL (default: webhook.callback_url from the config)
        #[arg(long)]
        callback_url: Option<String>,
    },
}

pub fn run(config_path: Option<&Path>, subcmd: WebhooksSubcommand, json: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let token = config
        .trello
        .token
        .as_deref()
        .ok_or(BoardError::MissingCredentials)?;
    let service = trello(&config)?;

    match subcmd {
        WebhooksSubcommand::List => {
            let hooks = service.list_webhooks(token)?;
            if json {
                return print_json(&hooks);
            }
            if hooks.is_empty() {
                println!("No webhooks registered.");
                return Ok(());
            }
            let rows = hooks
                .iter()
                .map(|h| {
                    vec![
                        h.id.clone(),
                        h.id_model.clone(),
                        h.callback_url.clone(),
                        if h.active { "yes" } else { "no" }.to_string(),
                    ]
                })
                .collect();
            print_table(&["ID", "MODEL", "CALLBACK", "ACTIVE"], rows);
        }
        WebhooksSubcommand::Register { callback_url } => {
            let Some(callback_url) = callback_url.or_else(|| config.webhook.callback_url.clone())
            else {
                anyhow::bail!("no callback URL: pass --callback-url or set webhook.callback_url");
            };
            let board_id = config.primary_board_id()?;
            let hook = register_board_webhook(
                service.as_ref(),
                token,
                board_id,
                &callback_url,
                &config.webhook.description,
            )?;
            if json {
                return print_json(&hook);
            }
            println!("Registered webhook {} for board {board_id} → {callback_url}", hook.id);
        }
    }
    Ok(())
}
