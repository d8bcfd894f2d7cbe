//! Cut and alignment guide generation
//!
//! Each occupied card cell contributes a cross at its four trim corners and,
//! on the outermost grid lines, straight extension lines out to the page
//! edges. Anchors are computed from the shared grid-line formulas in
//! [`PageGeometry`], so contributions from adjacent cells that land on the
//! same physical intersection are bit-identical and can be deduplicated by
//! exact coordinate, with no floating-point drift between cells.

use std::collections::{HashMap, HashSet};

use crate::canvas::{CrossKind, CrossMark, Point};
use crate::layout::{GridPosition, PageGeometry};
use crate::options::GuideOptions;

/// One drawable guide primitive. All guides on a page share a single dashed
/// line style.
#[derive(Debug, Clone, PartialEq)]
pub enum GuideSegment {
    Cross(CrossMark),
    Line { from: Point, to: Point },
}

/// Accumulates guide geometry for one page.
///
/// Feed every occupied cell through [`add_cell`](Self::add_cell), then take
/// the deduplicated segments. Output order is deterministic: crosses in
/// first-contribution order, then extension lines in first-contribution
/// order.
pub struct GuideSheet<'a> {
    geometry: &'a PageGeometry,
    options: &'a GuideOptions,
    crosses: Vec<CrossMark>,
    cross_index: HashMap<(u32, u32), usize>,
    lines: Vec<(Point, Point)>,
    line_keys: HashSet<[u32; 4]>,
}

impl<'a> GuideSheet<'a> {
    pub fn new(geometry: &'a PageGeometry, options: &'a GuideOptions) -> Self {
        Self {
            geometry,
            options,
            crosses: Vec::new(),
            cross_index: HashMap::new(),
            lines: Vec::new(),
            line_keys: HashSet::new(),
        }
    }

    /// Contribute the four trim-corner guides of one occupied cell.
    ///
    /// The guide offset is applied inward from the cell's own bleed edges:
    /// outward (+) on its left/top grid lines, inward (-) on its right/bottom
    /// ones, where the spacing to the next grid line is subtracted as well.
    pub fn add_cell(&mut self, pos: GridPosition) {
        let off = self.geometry.guide_offset_mm;
        let sx = self.geometry.column_spacing_mm;
        let sy = self.geometry.row_spacing_mm;

        self.add_corner(pos.col, pos.row, CrossKind::TopLeft, off, -off);
        self.add_corner(pos.col + 1, pos.row, CrossKind::TopRight, -off - sx, -off);
        self.add_corner(pos.col, pos.row + 1, CrossKind::BottomLeft, off, off + sy);
        self.add_corner(
            pos.col + 1,
            pos.row + 1,
            CrossKind::BottomRight,
            -off - sx,
            off + sy,
        );
    }

    fn add_corner(&mut self, gx: usize, gy: usize, kind: CrossKind, dx_mm: f32, dy_mm: f32) {
        let anchor = Point::new(
            self.geometry.column_line_x(gx) + dx_mm,
            self.geometry.row_line_y(gy) + dy_mm,
        );

        if self.options.corner_guides {
            let kind = if self.options.cross_guides {
                CrossKind::FullCross
            } else {
                kind
            };
            self.add_cross(anchor, kind);
        }

        if self.options.extended_guides {
            self.add_extensions(gx, gy, anchor);
        }
    }

    fn add_cross(&mut self, anchor: Point, kind: CrossKind) {
        let key = (anchor.x_mm.to_bits(), anchor.y_mm.to_bits());
        match self.cross_index.get(&key) {
            Some(&index) => {
                let cross = &mut self.crosses[index];
                cross.kind = cross.kind.merge(kind);
            }
            None => {
                self.cross_index.insert(key, self.crosses.len());
                self.crosses.push(CrossMark {
                    anchor,
                    arm_mm: self.options.length_mm,
                    kind,
                });
            }
        }
    }

    /// Extension lines for anchors sitting on a boundary grid line, running
    /// from the anchor to the matching page edge.
    fn add_extensions(&mut self, gx: usize, gy: usize, anchor: Point) {
        if gx == 0 {
            self.add_line(anchor, Point::new(0.0, anchor.y_mm));
        }
        if gx == self.geometry.columns {
            self.add_line(anchor, Point::new(self.geometry.page_width_mm, anchor.y_mm));
        }
        if gy == 0 {
            self.add_line(anchor, Point::new(anchor.x_mm, self.geometry.page_height_mm));
        }
        if gy == self.geometry.rows {
            self.add_line(anchor, Point::new(anchor.x_mm, 0.0));
        }
    }

    fn add_line(&mut self, from: Point, to: Point) {
        let key = [
            from.x_mm.to_bits(),
            from.y_mm.to_bits(),
            to.x_mm.to_bits(),
            to.y_mm.to_bits(),
        ];
        if self.line_keys.insert(key) {
            self.lines.push((from, to));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.crosses.is_empty() && self.lines.is_empty()
    }

    /// The deduplicated guide segments, crosses first.
    pub fn segments(self) -> Vec<GuideSegment> {
        self.crosses
            .into_iter()
            .map(GuideSegment::Cross)
            .chain(
                self.lines
                    .into_iter()
                    .map(|(from, to)| GuideSegment::Line { from, to }),
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::resolve_geometry;
    use crate::options::RenderOptions;

    fn sheet_options(mutate: impl FnOnce(&mut RenderOptions)) -> RenderOptions {
        let mut options = RenderOptions::default();
        mutate(&mut options);
        options
    }

    fn crosses(segments: &[GuideSegment]) -> Vec<CrossMark> {
        segments
            .iter()
            .filter_map(|s| match s {
                GuideSegment::Cross(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    fn lines(segments: &[GuideSegment]) -> Vec<(Point, Point)> {
        segments
            .iter()
            .filter_map(|s| match s {
                GuideSegment::Line { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_single_cell_emits_four_corner_crosses() {
        let options = sheet_options(|_| {});
        let geometry = resolve_geometry(&options).unwrap();

        let mut sheet = GuideSheet::new(&geometry, &options.guides);
        sheet.add_cell(GridPosition::new(0, 0));
        let segments = sheet.segments();

        let crosses = crosses(&segments);
        assert_eq!(crosses.len(), 4);
        let kinds: Vec<_> = crosses.iter().map(|c| c.kind).collect();
        assert!(kinds.contains(&CrossKind::TopLeft));
        assert!(kinds.contains(&CrossKind::TopRight));
        assert!(kinds.contains(&CrossKind::BottomLeft));
        assert!(kinds.contains(&CrossKind::BottomRight));
        assert!(lines(&segments).is_empty());
    }

    #[test]
    fn test_shared_corner_anchors_are_bit_identical_and_merged() {
        // zero spacing and zero guide offset: adjacent cells share trim
        // corners exactly
        let options = sheet_options(|o| o.guides.offset_mm = o.bleed_mm);
        let geometry = resolve_geometry(&options).unwrap();
        assert_eq!(geometry.guide_offset_mm, 0.0);

        let mut sheet = GuideSheet::new(&geometry, &options.guides);
        sheet.add_cell(GridPosition::new(0, 0));
        sheet.add_cell(GridPosition::new(1, 0));
        let crosses = crosses(&sheet.segments());

        // 4 + 4 corners with two coinciding pairs on the shared grid line
        assert_eq!(crosses.len(), 6);

        let shared_x = geometry.column_line_x(1);
        let merged: Vec<_> = crosses
            .iter()
            .filter(|c| c.anchor.x_mm.to_bits() == shared_x.to_bits())
            .collect();
        assert_eq!(merged.len(), 2);
        for cross in merged {
            assert_eq!(cross.kind, CrossKind::FullCross);
        }
    }

    #[test]
    fn test_full_grid_dedups_to_one_cross_per_intersection() {
        let options = sheet_options(|o| o.guides.offset_mm = o.bleed_mm);
        let geometry = resolve_geometry(&options).unwrap();

        let mut sheet = GuideSheet::new(&geometry, &options.guides);
        for row in 0..3 {
            for col in 0..3 {
                sheet.add_cell(GridPosition::new(col, row));
            }
        }
        // (columns + 1) * (rows + 1) intersections
        assert_eq!(crosses(&sheet.segments()).len(), 16);
    }

    #[test]
    fn test_nonzero_offset_keeps_per_card_corners_apart() {
        let options = sheet_options(|o| {
            o.bleed_mm = 3.0;
            o.guides.offset_mm = 0.0; // anchors inset by the full bleed
            o.columns = 2;
            o.rows = 2;
        });
        let geometry = resolve_geometry(&options).unwrap();

        let mut sheet = GuideSheet::new(&geometry, &options.guides);
        sheet.add_cell(GridPosition::new(0, 0));
        sheet.add_cell(GridPosition::new(1, 0));

        // trim corners of adjacent cards no longer coincide
        assert_eq!(crosses(&sheet.segments()).len(), 8);
    }

    #[test]
    fn test_cross_guides_render_full_crosses() {
        let options = sheet_options(|o| o.guides.cross_guides = true);
        let geometry = resolve_geometry(&options).unwrap();

        let mut sheet = GuideSheet::new(&geometry, &options.guides);
        sheet.add_cell(GridPosition::new(1, 1));
        for cross in crosses(&sheet.segments()) {
            assert_eq!(cross.kind, CrossKind::FullCross);
        }
    }

    #[test]
    fn test_extended_guides_only_on_boundary_lines() {
        let options = sheet_options(|o| o.guides.extended_guides = true);
        let geometry = resolve_geometry(&options).unwrap();

        // interior cell of a 3x3 grid touches no boundary line
        let mut sheet = GuideSheet::new(&geometry, &options.guides);
        sheet.add_cell(GridPosition::new(1, 1));
        assert!(lines(&sheet.segments()).is_empty());

        // top-left cell touches the left and top boundaries
        let mut sheet = GuideSheet::new(&geometry, &options.guides);
        sheet.add_cell(GridPosition::new(0, 0));
        let lines = lines(&sheet.segments());
        assert_eq!(lines.len(), 4);
        for (from, to) in lines {
            let to_left = to.x_mm == 0.0 && to.y_mm == from.y_mm;
            let to_top = to.y_mm == geometry.page_height_mm && to.x_mm == from.x_mm;
            assert!(to_left || to_top, "unexpected extension {from:?} -> {to:?}");
        }
    }

    #[test]
    fn test_extended_guides_reach_the_exact_page_edges() {
        let options = sheet_options(|o| {
            o.guides.extended_guides = true;
            o.columns = 2;
            o.rows = 2;
        });
        let geometry = resolve_geometry(&options).unwrap();

        let mut sheet = GuideSheet::new(&geometry, &options.guides);
        sheet.add_cell(GridPosition::new(1, 1)); // bottom-right cell
        let lines = lines(&sheet.segments());
        assert_eq!(lines.len(), 4);
        assert!(
            lines
                .iter()
                .any(|(_, to)| to.x_mm == geometry.page_width_mm)
        );
        assert!(lines.iter().any(|(_, to)| to.y_mm == 0.0));
    }

    #[test]
    fn test_corner_and_extended_guides_are_independent() {
        let options = sheet_options(|o| {
            o.guides.corner_guides = false;
            o.guides.extended_guides = true;
        });
        let geometry = resolve_geometry(&options).unwrap();

        let mut sheet = GuideSheet::new(&geometry, &options.guides);
        sheet.add_cell(GridPosition::new(0, 0));
        let segments = sheet.segments();
        assert!(crosses(&segments).is_empty());
        assert!(!lines(&segments).is_empty());
    }

    #[test]
    fn test_shared_boundary_extensions_are_deduplicated() {
        let options = sheet_options(|o| {
            o.guides.corner_guides = false;
            o.guides.extended_guides = true;
            o.guides.offset_mm = o.bleed_mm;
        });
        let geometry = resolve_geometry(&options).unwrap();

        // vertically adjacent cells in the leftmost column share the anchor
        // on their common row line; its extension must appear once
        let mut sheet = GuideSheet::new(&geometry, &options.guides);
        sheet.add_cell(GridPosition::new(0, 0));
        sheet.add_cell(GridPosition::new(0, 1));
        let lines = lines(&sheet.segments());

        // cell (0,0): 2 left + 2 top; cell (0,1): 2 left, one shared
        assert_eq!(lines.len(), 5);
    }
}
