//! Grid placement
//!
//! Maps a page's linear card sequence onto column/row slots in row-major
//! fill order. The grid is sparse: trailing cells of a partial final page
//! stay empty.

use super::{GridPosition, Page};

/// A page's cards resolved to grid cells. Cells hold entry indices into the
/// project card list.
#[derive(Debug, Clone, PartialEq)]
pub struct CardGrid {
    columns: usize,
    rows: usize,
    cells: Vec<Option<usize>>,
}

impl CardGrid {
    /// Fill a `columns x rows` grid from the page's card sequence,
    /// row-major (column index varies fastest).
    pub fn place(page: &Page, columns: usize, rows: usize) -> Self {
        let mut cells = vec![None; columns * rows];
        for (slot, &entry) in page.cards().iter().enumerate() {
            cells[slot] = Some(entry);
        }
        Self {
            columns,
            rows,
            cells,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The entry index at a cell, if the cell is occupied.
    pub fn get(&self, col: usize, row: usize) -> Option<usize> {
        self.cells[row * self.columns + col]
    }

    /// Occupied cells in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (GridPosition, usize)> + '_ {
        self.cells.iter().enumerate().filter_map(|(slot, cell)| {
            cell.map(|entry| {
                (
                    GridPosition::new(slot % self.columns, slot / self.columns),
                    entry,
                )
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::paginate;
    use crate::options::CardEntry;

    #[test]
    fn test_row_major_fill() {
        let pages = paginate(&[CardEntry::new("a.png", 5)], 3, 2);
        let grid = CardGrid::place(&pages[0], 3, 2);

        // first row full, second row has two cells
        assert_eq!(grid.get(0, 0), Some(0));
        assert_eq!(grid.get(2, 0), Some(0));
        assert_eq!(grid.get(1, 1), Some(0));
        assert_eq!(grid.get(2, 1), None);
    }

    #[test]
    fn test_occupied_iterates_row_major() {
        let pages = paginate(
            &[CardEntry::new("a.png", 2), CardEntry::new("b.png", 2)],
            3,
            2,
        );
        let grid = CardGrid::place(&pages[0], 3, 2);

        let cells: Vec<_> = grid.occupied().collect();
        assert_eq!(
            cells,
            vec![
                (GridPosition::new(0, 0), 0),
                (GridPosition::new(1, 0), 0),
                (GridPosition::new(2, 0), 1),
                (GridPosition::new(0, 1), 1),
            ]
        );
    }

    #[test]
    fn test_empty_cells_on_partial_page() {
        let pages = paginate(&[CardEntry::new("a.png", 10)], 3, 3);
        let last = CardGrid::place(&pages[1], 3, 3);

        assert_eq!(last.occupied().count(), 1);
        assert_eq!(last.get(0, 0), Some(0));
        assert_eq!(last.get(1, 0), None);
    }
}
