//! Abstract drawing surface consumed by the page assembler.
//!
//! The engine hands fully resolved placements to a [`Canvas`] and never
//! touches backend-native units: every length here is in millimetres and the
//! canvas is responsible for conversion. `proxy-pdf` provides the printpdf
//! implementation; tests use an in-memory recorder.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::layout::Rect;
use crate::types::Rotation;

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("failed to decode image {path}: {reason}")]
    ImageDecode { path: PathBuf, reason: String },
    #[error("failed to write document: {0}")]
    Write(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A point on the page, origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x_mm: f32,
    pub y_mm: f32,
}

impl Point {
    pub fn new(x_mm: f32, y_mm: f32) -> Self {
        Self { x_mm, y_mm }
    }
}

/// 8-bit RGB color, as configured by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8 { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Color components as floats in `0.0..=1.0`.
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub thickness_mm: f32,
    pub color: Rgb8,
}

/// Style for cut guides: color A dashes drawn over a color B base line, so
/// the guide stays visible on both light and dark card art.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashedLineStyle {
    pub thickness_mm: f32,
    pub color_a: Rgb8,
    pub color_b: Rgb8,
}

/// Which arms of a cut cross to draw.
///
/// The corner variants name the card corner the cross sits on; their two
/// arms run along the trim lines into the card. `FullCross` draws all four
/// arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrossKind {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    FullCross,
}

impl CrossKind {
    /// Combine two contributions landing on the same anchor. Distinct corner
    /// kinds only collide where two cards share a physical cut corner, and a
    /// shared cut corner is marked with a full cross.
    pub fn merge(self, other: CrossKind) -> CrossKind {
        if self == other {
            self
        } else {
            CrossKind::FullCross
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossMark {
    pub anchor: Point,
    pub arm_mm: f32,
    pub kind: CrossKind,
}

/// A card image resolved to its physical placement.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlacement {
    pub path: PathBuf,
    pub rect: Rect,
    pub rotation: Rotation,
}

/// Sequential page-drawing surface.
///
/// The assembler drives a strict `next_page` → draws → `finish_page` cycle
/// per page and calls `write` exactly once at the end. Geometry draws are
/// infallible accumulation; failure surfaces when decoding an image or
/// writing the finished document.
pub trait Canvas {
    fn next_page(&mut self);

    fn draw_image(&mut self, placement: &ImagePlacement) -> std::result::Result<(), CanvasError>;

    fn draw_dashed_cross(&mut self, cross: &CrossMark, style: &DashedLineStyle);

    fn draw_dashed_line(&mut self, from: Point, to: Point, style: &DashedLineStyle);

    fn draw_solid_line(&mut self, from: Point, to: Point, style: &LineStyle);

    /// Draw text inside a bounding box; the canvas chooses font and wrapping.
    fn draw_text(&mut self, text: &str, bounds: Rect);

    fn finish_page(&mut self);

    fn write(&mut self, file_name: &Path) -> std::result::Result<PathBuf, CanvasError>;
}
