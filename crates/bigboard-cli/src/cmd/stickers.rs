use super::{load_config, trello};
use crate::output::{print_json, print_table};
use bigboard_core::catalog::Catalog;
use std::path::Path;

pub fn run(config_path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let service = trello(&config)?;

    let catalog = Catalog::new();
    catalog.ensure_populated(service.as_ref())?;
    let entries = catalog.entries()?;

    if json {
        return print_json(&entries);
    }
    let rows = entries
        .iter()
        .map(|e| {
            vec![
                e.color.letter().to_string(),
                format!("{:?}", e.color),
                e.template_id.clone(),
                e.image_url.clone(),
            ]
        })
        .collect();
    print_table(&["CODE", "COLOR", "TEMPLATE", "IMAGE"], rows);
    Ok(())
}
