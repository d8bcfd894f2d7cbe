pub mod canvas;
mod decklist;
pub mod guides;
pub mod layout;
mod options;
pub mod render;
mod types;

pub use decklist::load_cards_from_csv;
pub use options::*;
pub use render::{ImageProgress, RenderReport, render_alignment_sheet, render_document};
pub use types::*;
