//! Page geometry resolution
//!
//! Turns the project's sizing configuration into concrete page geometry:
//! card-with-bleed size, margins, the max-margins reference frame used for
//! backside mirroring, and the physical rectangle of every grid slot.

use crate::options::RenderOptions;
use crate::types::{LayoutError, Result};

use super::{GridPosition, Rect};

/// Tolerance for the card-grid-fits-on-page check, in mm.
const SIZE_EPSILON_MM: f32 = 1e-3;

/// Resolved page geometry for one render. All lengths in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    /// Card size including the bleed edge on all sides.
    pub card_width_mm: f32,
    pub card_height_mm: f32,
    pub column_spacing_mm: f32,
    pub row_spacing_mm: f32,
    /// Margins actually used for placement (custom, or centering).
    pub margin_x_mm: f32,
    pub margin_y_mm: f32,
    /// Whole free span outside the card grid. Only `max_margin - margin` is
    /// ever used: it is the x-origin of the mirrored backside frame.
    pub max_margin_x_mm: f32,
    pub max_margin_y_mm: f32,
    pub bleed_mm: f32,
    /// Distance from a card's outer (bleed) edge to its guide anchors.
    pub guide_offset_mm: f32,
    pub columns: usize,
    pub rows: usize,
}

/// Resolve the project sizing configuration into page geometry.
///
/// Fails when the card grid (including spacing) does not fit on the page for
/// the configured layout; the error message carries the computed sizes so
/// the configuration can be diagnosed without re-running.
pub fn resolve_geometry(options: &RenderOptions) -> Result<PageGeometry> {
    if options.columns == 0 || options.rows == 0 {
        return Err(LayoutError::Config(
            "card layout needs at least one column and one row".to_string(),
        ));
    }

    let (page_width_mm, page_height_mm) = options.page_size_mm();
    let card_width_mm = options.card_width_mm + 2.0 * options.bleed_mm;
    let card_height_mm = options.card_height_mm + 2.0 * options.bleed_mm;
    let (column_spacing_mm, row_spacing_mm) = options.spacing_mm();

    let cards_width_mm =
        card_width_mm * options.columns as f32 + column_spacing_mm * (options.columns - 1) as f32;
    let cards_height_mm =
        card_height_mm * options.rows as f32 + row_spacing_mm * (options.rows - 1) as f32;

    if cards_width_mm > page_width_mm + SIZE_EPSILON_MM
        || cards_height_mm > page_height_mm + SIZE_EPSILON_MM
    {
        return Err(LayoutError::Config(format!(
            "a {}x{} layout of {:.1}x{:.1} mm cards spans {:.1}x{:.1} mm, \
             which does not fit the {:.1}x{:.1} mm page",
            options.columns,
            options.rows,
            card_width_mm,
            card_height_mm,
            cards_width_mm,
            cards_height_mm,
            page_width_mm,
            page_height_mm,
        )));
    }

    let max_margin_x_mm = page_width_mm - cards_width_mm;
    let max_margin_y_mm = page_height_mm - cards_height_mm;

    let (margin_x_mm, margin_y_mm) = match options.custom_margins {
        Some(margins) => (margins.x_mm, margins.y_mm),
        None => (max_margin_x_mm / 2.0, max_margin_y_mm / 2.0),
    };

    Ok(PageGeometry {
        page_width_mm,
        page_height_mm,
        card_width_mm,
        card_height_mm,
        column_spacing_mm,
        row_spacing_mm,
        margin_x_mm,
        margin_y_mm,
        max_margin_x_mm,
        max_margin_y_mm,
        bleed_mm: options.bleed_mm,
        guide_offset_mm: options.bleed_mm - options.guides.offset_mm,
        columns: options.columns,
        rows: options.rows,
    })
}

impl PageGeometry {
    /// x coordinate of vertical grid line `g`, for `g` in `0..=columns`.
    pub fn column_line_x(&self, g: usize) -> f32 {
        self.margin_x_mm + g as f32 * (self.card_width_mm + self.column_spacing_mm)
    }

    /// y coordinate of horizontal grid line `g`, for `g` in `0..=rows`.
    /// Line 0 is the top of the first card row; y decreases as `g` grows.
    pub fn row_line_y(&self, g: usize) -> f32 {
        self.page_height_mm - self.margin_y_mm
            - g as f32 * (self.card_height_mm + self.row_spacing_mm)
    }

    /// Physical rectangle of a front-page slot.
    pub fn slot_rect(&self, pos: GridPosition) -> Rect {
        Rect::new(
            self.margin_x_mm
                + pos.col as f32 * (self.card_width_mm + self.column_spacing_mm),
            self.page_height_mm
                - self.margin_y_mm
                - (pos.row as f32 + 1.0) * self.card_height_mm
                - pos.row as f32 * self.row_spacing_mm,
            self.card_width_mm,
            self.card_height_mm,
        )
    }

    /// Physical rectangle of a backside slot at an (already mirrored) grid
    /// position.
    ///
    /// The x origin is `max_margin - margin`: backside sheets are fed with
    /// an inverted margin frame, so a custom margin on the front becomes its
    /// complement on the back. `offset_mm` is the user's fine correction for
    /// printers that shift the back pass horizontally.
    pub fn backside_slot_rect(&self, pos: GridPosition, offset_mm: f32) -> Rect {
        let front = self.slot_rect(pos);
        Rect::new(
            self.max_margin_x_mm - self.margin_x_mm
                + pos.col as f32 * (self.card_width_mm + self.column_spacing_mm)
                + offset_mm,
            front.y_mm,
            front.width_mm,
            front.height_mm,
        )
    }
}
