use super::{load_config, trello};
use crate::output::print_json;
use bigboard_core::proposals::add_proposal_card;
use std::path::Path;

pub fn run(config_path: Option<&Path>, name: &str, desc: &str, json: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let board_id = config.proposals_board_id()?;
    let service = trello(&config)?;

    let card = add_proposal_card(service.as_ref(), board_id, name, desc)?;

    if json {
        return print_json(&card);
    }
    match &card.url {
        Some(url) => println!("Added proposal '{}': {url}", card.name),
        None => println!("Added proposal '{}' ({})", card.name, card.id),
    }
    Ok(())
}
