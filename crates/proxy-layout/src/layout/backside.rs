//! Backside mirroring
//!
//! For duplex printing the back page must mirror the front so that, after
//! the sheet is flipped over the configured edge, every back lands exactly
//! behind its front. Flipping over the left edge mirrors columns; flipping
//! over the top edge mirrors rows. Exactly one axis is mirrored.

use crate::types::{FlipEdge, Rotation};

use super::GridPosition;

/// The back-page cell behind a front cell for the given flip edge.
///
/// A bijection over the grid, and an involution: mirroring twice over the
/// same edge returns the original position.
pub fn mirrored_position(
    pos: GridPosition,
    columns: usize,
    rows: usize,
    flip: FlipEdge,
) -> GridPosition {
    match flip {
        FlipEdge::Left => GridPosition::new(columns - pos.col - 1, pos.row),
        FlipEdge::Top => GridPosition::new(pos.col, rows - pos.row - 1),
    }
}

/// Rotation of a backside image, as a pure function of the front rotation,
/// the card's short-edge flag, and the flip edge.
///
/// Backside art is stored oriented for a long-edge flip; art drawn for a
/// short-edge flip needs an extra half turn to come out upright. The flip
/// edge itself does not change the rotation, only which axis mirrors.
pub fn backside_rotation(front: Rotation, short_edge: bool, _flip: FlipEdge) -> Rotation {
    if short_edge { front.half_turn() } else { front }
}
