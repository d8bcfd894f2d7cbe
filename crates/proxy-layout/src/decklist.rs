use std::path::{Path, PathBuf};

use crate::options::CardEntry;
use crate::types::{LayoutError, Result};

/// Load a card list from CSV.
///
/// Columns: front image path, copies (default 1), backside image path
/// (optional), and a `short` marker for backside-short-edge cards. Rows
/// without a front path are skipped.
pub async fn load_cards_from_csv(path: impl AsRef<Path>) -> Result<Vec<CardEntry>> {
    let contents = tokio::fs::read_to_string(path.as_ref()).await?;

    // CSV parsing is CPU-bound, spawn blocking
    let cards = tokio::task::spawn_blocking(move || {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(contents.as_bytes());
        let mut cards = Vec::new();

        for result in reader.records() {
            let record = result?;
            let front = match record.get(0) {
                Some(front) if !front.is_empty() => front,
                _ => continue,
            };
            let copies = match record.get(1) {
                Some(copies) if !copies.is_empty() => copies.parse().map_err(|_| {
                    LayoutError::Config(format!("invalid copy count {copies:?} for {front}"))
                })?,
                _ => 1,
            };
            let back = record
                .get(2)
                .filter(|back| !back.is_empty())
                .map(PathBuf::from);
            let backside_short_edge = record
                .get(3)
                .is_some_and(|flag| matches!(flag, "short" | "short_edge" | "true" | "1"));

            cards.push(CardEntry {
                front: PathBuf::from(front),
                back,
                copies,
                hidden: false,
                backside_short_edge,
            });
        }
        Ok::<_, LayoutError>(cards)
    })
    .await??;

    Ok(cards)
}
