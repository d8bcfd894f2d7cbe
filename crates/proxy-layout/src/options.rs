use std::path::PathBuf;

use crate::canvas::{DashedLineStyle, Rgb8};
use crate::layout::resolve_geometry;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One distinct card image in the project, possibly printed several times.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CardEntry {
    /// Front image, relative to the project image directory.
    pub front: PathBuf,
    /// Backside image; `None` falls back to the project default backside.
    pub back: Option<PathBuf>,
    /// Number of copies to lay out.
    pub copies: u32,
    /// Hidden entries are kept in the project but never rendered.
    pub hidden: bool,
    /// The backside art is oriented for a short-edge flip and needs an extra
    /// half turn on the back page.
    pub backside_short_edge: bool,
}

impl CardEntry {
    pub fn new(front: impl Into<PathBuf>, copies: u32) -> Self {
        Self {
            front: front.into(),
            back: None,
            copies,
            hidden: false,
            backside_short_edge: false,
        }
    }
}

/// Symmetric page margins, one value per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Margins {
    pub x_mm: f32,
    pub y_mm: f32,
}

/// Duplex printing configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BacksideOptions {
    pub enabled: bool,
    /// Backside image used by entries without an explicit one.
    pub default_image: PathBuf,
    /// Horizontal correction for printers that shift the back pass, in mm.
    pub offset_mm: f32,
    pub flip_edge: FlipEdge,
}

impl Default for BacksideOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            default_image: PathBuf::from("__back.png"),
            offset_mm: 0.0,
            flip_edge: FlipEdge::Left,
        }
    }
}

/// Cut/alignment guide configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GuideOptions {
    pub enabled: bool,
    /// Also draw guides on backside pages.
    pub on_backside: bool,
    /// Corner crosses at card trim corners.
    pub corner_guides: bool,
    /// Render every corner cross as a full cross.
    pub cross_guides: bool,
    /// Extend boundary guides out to the page edges.
    pub extended_guides: bool,
    /// Distance from the bleed edge to the guide anchor, in mm.
    pub offset_mm: f32,
    pub thickness_mm: f32,
    /// Arm length of a corner cross, in mm.
    pub length_mm: f32,
    pub color_a: Rgb8,
    pub color_b: Rgb8,
}

impl Default for GuideOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            on_backside: false,
            corner_guides: true,
            cross_guides: false,
            extended_guides: false,
            offset_mm: 0.0,
            thickness_mm: 0.3,
            length_mm: 1.5,
            color_a: Rgb8::BLACK,
            color_b: Rgb8::new(190, 190, 190),
        }
    }
}

impl GuideOptions {
    pub fn line_style(&self) -> DashedLineStyle {
        DashedLineStyle {
            thickness_mm: self.thickness_mm,
            color_a: self.color_a,
            color_b: self.color_b,
        }
    }
}

/// Complete, immutable description of one render.
///
/// Every entry point takes this by reference; the engine reads no ambient
/// state, so concurrent renders of different options are independent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderOptions {
    /// Directory all card image paths are resolved against.
    pub image_dir: PathBuf,
    /// Output document path handed to the canvas.
    pub output_file: PathBuf,

    /// Trimmed card size, without bleed.
    pub card_width_mm: f32,
    pub card_height_mm: f32,
    /// Bleed edge added around each card, trimmed after cutting.
    pub bleed_mm: f32,
    pub column_spacing_mm: f32,
    pub row_spacing_mm: f32,
    /// When linked, the column spacing drives both axes.
    pub spacing_linked: bool,

    pub columns: usize,
    pub rows: usize,
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    /// Explicit margins; `None` centers the card grid on the page.
    pub custom_margins: Option<Margins>,

    pub backside: BacksideOptions,
    pub guides: GuideOptions,

    /// Ordered card list; order is preserved through pagination.
    pub cards: Vec<CardEntry>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("."),
            output_file: PathBuf::from("proxies.pdf"),
            card_width_mm: 63.5,
            card_height_mm: 88.9,
            bleed_mm: 0.0,
            column_spacing_mm: 0.0,
            row_spacing_mm: 0.0,
            spacing_linked: true,
            columns: 3,
            rows: 3,
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            custom_margins: None,
            backside: BacksideOptions::default(),
            guides: GuideOptions::default(),
            cards: Vec::new(),
        }
    }
}

impl RenderOptions {
    /// Page size with orientation applied, in mm.
    pub fn page_size_mm(&self) -> (f32, f32) {
        self.paper_size.dimensions_with_orientation(self.orientation)
    }

    /// Column and row spacing with the linked flag resolved.
    pub fn spacing_mm(&self) -> (f32, f32) {
        if self.spacing_linked {
            (self.column_spacing_mm, self.column_spacing_mm)
        } else {
            (self.column_spacing_mm, self.row_spacing_mm)
        }
    }

    /// Validate the options.
    ///
    /// Catches everything that would make the render abort later, including
    /// a card grid larger than the page.
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 || self.rows == 0 {
            return Err(LayoutError::Config(
                "card layout needs at least one column and one row".to_string(),
            ));
        }
        if self.card_width_mm <= 0.0 || self.card_height_mm <= 0.0 {
            return Err(LayoutError::Config(format!(
                "card size {}x{} mm is not positive",
                self.card_width_mm, self.card_height_mm
            )));
        }
        if self.bleed_mm < 0.0 {
            return Err(LayoutError::Config(format!(
                "bleed edge {} mm is negative",
                self.bleed_mm
            )));
        }
        let (sx, sy) = self.spacing_mm();
        if sx < 0.0 || sy < 0.0 {
            return Err(LayoutError::Config(format!(
                "card spacing {sx}x{sy} mm is negative"
            )));
        }
        resolve_geometry(self).map(|_| ())
    }

    /// Load options from a JSON project file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| LayoutError::Config(format!("failed to parse project file: {e}")))?;
        Ok(options)
    }

    /// Save options to a JSON project file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LayoutError::Config(format!("failed to serialize project: {e}")))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}
