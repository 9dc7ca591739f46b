//! Intake of new project proposals onto the proposals board.

use crate::error::{BoardError, Result};
use crate::service::{BoardService, Card};

/// Add a proposal card to the first list of the proposals board.
///
/// The first list is where new projects enter the pipeline.
pub fn add_proposal_card(
    service: &dyn BoardService,
    board_id: &str,
    name: &str,
    desc: &str,
) -> Result<Card> {
    let name = name.trim();
    if name.is_empty() {
        return Err(BoardError::InvalidInput(
            "proposal name must not be empty".to_string(),
        ));
    }

    let lists = service.get_board_lists(board_id)?;
    let first = lists
        .first()
        .ok_or_else(|| BoardError::NoLists(board_id.to_string()))?;

    let card = service.add_card(&first.id, name, desc)?;
    tracing::info!(
        card_id = %card.id,
        list = %first.name,
        url = card.url.as_deref().unwrap_or(""),
        "added proposal card"
    );
    Ok(card)
}

/// Markdown line linking a source document from a card description.
pub fn description_snippet(label: &str, url: &str) -> String {
    format!("[{label}]({url})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBoard;

    #[test]
    fn card_lands_in_first_list() {
        let board = MemoryBoard::new();
        board.insert_list("proposals", "l-proposal", "Proposal");
        board.insert_list("proposals", "l-review", "In review");

        let desc = description_snippet("Project doc", "https://docs.example/d/1");
        let card = add_proposal_card(&board, "proposals", "  New onboarding  ", &desc).unwrap();

        assert_eq!(card.name, "New onboarding");
        assert_eq!(card.desc, "[Project doc](https://docs.example/d/1)");
        assert_eq!(board.cards_on_list("l-proposal"), vec![card]);
        assert!(board.cards_on_list("l-review").is_empty());
    }

    #[test]
    fn empty_name_is_rejected() {
        let board = MemoryBoard::new();
        board.insert_list("proposals", "l1", "Proposal");
        let err = add_proposal_card(&board, "proposals", "   ", "").unwrap_err();
        assert!(matches!(err, BoardError::InvalidInput(_)));
        assert!(board.cards_on_list("l1").is_empty());
    }

    #[test]
    fn board_without_lists_is_an_error() {
        let board = MemoryBoard::new();
        let err = add_proposal_card(&board, "empty", "Project", "").unwrap_err();
        assert!(matches!(err, BoardError::NoLists(id) if id == "empty"));
    }
}
