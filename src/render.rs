//! Plain-text rendering of the view models

use medtrack_core::view::{PersonnelViewModel, TransactionViewModel};
use std::fmt::Write;

/// Transaction cards, one block each
pub fn transactions(model: &TransactionViewModel) -> String {
    let mut out = String::new();
    if model.cards.is_empty() {
        out.push_str("No transactions recorded.\n");
        return out;
    }

    for card in &model.cards {
        let _ = writeln!(out, "{} | {}", card.heading, card.time_label);
        let _ = writeln!(
            out,
            "  {:<24} {:<20} {}",
            card.commodity_column, card.counterpart_column, card.amount_column
        );
        for row in &card.rows {
            let _ = writeln!(out, "  {:<24} {:<20} {}", row.name, row.counterpart, row.delta_label);
        }
        out.push('\n');
    }
    out
}

/// Personnel register as a two-column table
pub fn personnel(model: &PersonnelViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Sorted {}", model.sort_mode.label());
    if !model.search_term.trim().is_empty() {
        let _ = writeln!(out, "Matching \"{}\"", model.search_term);
    }
    let _ = writeln!(out, "{:<28} {}", "Personnel", "Hospital");
    for row in &model.rows {
        let _ = writeln!(out, "{:<28} {}", row.name, row.affiliation);
    }
    if model.rows.is_empty() {
        out.push_str("No personnel found.\n");
    }
    out
}
