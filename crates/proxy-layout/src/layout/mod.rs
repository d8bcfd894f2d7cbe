//! Layout calculation modules
//!
//! Everything between the project configuration and the draw calls:
//! - Page geometry (margins, card-with-bleed size, backside reference frame)
//! - Pagination of the card list into page-sized chunks
//! - Grid placement of a page's cards onto column/row slots
//! - Backside mirroring for duplex printing

mod backside;
mod geometry;
mod grid;
mod paginate;
mod types;

pub use backside::*;
pub use geometry::*;
pub use grid::*;
pub use paginate::*;
pub use types::*;
