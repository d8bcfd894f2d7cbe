//! Card pagination
//!
//! Flattens the ordered card list into per-copy references and slices the
//! sequence into page-sized chunks. The ordering is stable for a fixed
//! input, which keeps the "image number" progress reporting reproducible.

use crate::options::CardEntry;

/// One printable page: entry indices into the project card list, one per
/// copy, in fill order. At most `columns * rows` long; the final page of a
/// document may be shorter. Not mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    cards: Vec<usize>,
}

impl Page {
    pub fn cards(&self) -> &[usize] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Flatten the card list into one per-copy index per printed card.
///
/// Entry order is preserved and copies of the same entry are contiguous;
/// hidden entries contribute nothing.
fn flatten(cards: &[CardEntry]) -> Vec<usize> {
    cards
        .iter()
        .enumerate()
        .filter(|(_, entry)| !entry.hidden)
        .flat_map(|(index, entry)| std::iter::repeat_n(index, entry.copies as usize))
        .collect()
}

/// Partition the card list into pages of `columns * rows` slots.
///
/// Zero visible copies produce zero pages.
pub fn paginate(cards: &[CardEntry], columns: usize, rows: usize) -> Vec<Page> {
    let capacity = columns * rows;
    if capacity == 0 {
        return Vec::new();
    }

    flatten(cards)
        .chunks(capacity)
        .map(|chunk| Page {
            cards: chunk.to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, copies: u32) -> CardEntry {
        CardEntry::new(name, copies)
    }

    #[test]
    fn test_page_count_is_ceil_of_copies_over_capacity() {
        for (copies, columns, rows, expected) in [
            (0u32, 3, 3, 0usize),
            (1, 3, 3, 1),
            (9, 3, 3, 1),
            (10, 3, 3, 2),
            (19, 3, 3, 3),
            (5, 2, 2, 2),
            (4, 1, 1, 4),
        ] {
            let pages = paginate(&[entry("a.png", copies)], columns, rows);
            assert_eq!(pages.len(), expected, "copies={copies} {columns}x{rows}");
        }
    }

    #[test]
    fn test_zero_cards_means_zero_pages() {
        assert!(paginate(&[], 3, 3).is_empty());
        assert!(paginate(&[entry("a.png", 0)], 3, 3).is_empty());
    }

    #[test]
    fn test_flattening_preserves_entry_order_and_count() {
        let cards = vec![entry("a.png", 2), entry("b.png", 3), entry("c.png", 1)];
        let pages = paginate(&cards, 2, 2);

        let all: Vec<usize> = pages.iter().flat_map(|p| p.cards().to_vec()).collect();
        assert_eq!(all, vec![0, 0, 1, 1, 1, 2]);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 4);
        assert_eq!(pages[1].len(), 2);
    }

    #[test]
    fn test_hidden_entries_are_skipped() {
        let mut hidden = entry("b.png", 5);
        hidden.hidden = true;
        let cards = vec![entry("a.png", 1), hidden, entry("c.png", 1)];

        let pages = paginate(&cards, 3, 3);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].cards(), &[0, 2]);
    }

    #[test]
    fn test_pagination_is_deterministic() {
        let cards = vec![entry("a.png", 7), entry("b.png", 6)];
        assert_eq!(paginate(&cards, 3, 2), paginate(&cards, 3, 2));
    }
}
