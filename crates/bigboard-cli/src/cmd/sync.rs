use super::{load_config, trello};
use crate::output::{print_json, print_table};
use bigboard_core::catalog::Catalog;
use bigboard_core::reconcile::{Reconciler, SyncOutcome};
use bigboard_core::sync::{sync_all, sync_one, BatchReport};
use std::path::Path;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// sync <card>
// ---------------------------------------------------------------------------

pub fn run_card(config_path: Option<&Path>, card_id: &str, json: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let reconciler = Reconciler::new(trello(&config)?, Arc::new(Catalog::new()), config.layout.clone());

    let outcome = sync_one(&reconciler, card_id)?;

    if json {
        let mut value = serde_json::to_value(&outcome)?;
        value["card_id"] = serde_json::Value::String(card_id.to_string());
        return print_json(&value);
    }
    match outcome {
        SyncOutcome::InSync => println!("{card_id}: stickers already match"),
        SyncOutcome::Updated { removed, added } => {
            println!("{card_id}: removed {removed} sticker(s), placed {added}")
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// sync-board [name]
// ---------------------------------------------------------------------------

pub fn run_board(config_path: Option<&Path>, name: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let name = name.unwrap_or(&config.primary_board);
    let board_id = config.board_id(name)?;

    let reconciler = Reconciler::new(trello(&config)?, Arc::new(Catalog::new()), config.layout.clone());
    let report = sync_all(&reconciler, board_id)?;

    finish_report(&report, json)
}

/// Print a batch report; any card failure makes the command fail.
pub(crate) fn finish_report(report: &BatchReport, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(report)?;
    } else {
        println!(
            "board {}: {} updated, {} already in sync, {} failed",
            report.board_id,
            report.updated,
            report.in_sync,
            report.failures.len()
        );
        if !report.failures.is_empty() {
            println!();
            let rows = report
                .failures
                .iter()
                .map(|f| vec![f.card_id.clone(), f.card_name.clone(), f.error.clone()])
                .collect();
            print_table(&["CARD", "NAME", "ERROR"], rows);
        }
    }

    if !report.is_clean() {
        anyhow::bail!("{} card(s) failed to sync", report.failures.len());
    }
    Ok(())
}
