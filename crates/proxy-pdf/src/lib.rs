//! printpdf-backed canvas for the proxy layout engine.
//!
//! [`PdfCanvas`] implements [`proxy_layout::canvas::Canvas`] by accumulating
//! printpdf op lists per page; [`generate_pdf`] and [`generate_alignment_pdf`]
//! are the async entry points that run the CPU-bound render on a blocking
//! task.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use printpdf::*;

use proxy_layout::canvas::{
    Canvas, CanvasError, CrossKind, CrossMark, DashedLineStyle, ImagePlacement, LineStyle,
    Point as PointMm, Rgb8,
};
use proxy_layout::layout::Rect;
use proxy_layout::{ImageProgress, RenderOptions, RenderReport, Result, Rotation};

/// Font size for canvas text, in points.
const TEXT_FONT_SIZE_PT: f32 = 12.0;

/// Approximate character width ratio for Helvetica, used for greedy wrapping.
const HELVETICA_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Dash length of guide lines, in points.
const GUIDE_DASH_PT: i64 = 3;

/// Millimetres per point (1 inch = 72 points = 25.4 mm).
const MM_PER_PT: f32 = 25.4 / 72.0;

/// A PDF document built one page at a time.
///
/// Decoded images are cached by path, so a card repeated across pages embeds
/// its pixels once and every placement references the same XObject.
pub struct PdfCanvas {
    doc: PdfDocument,
    pages: Vec<PdfPage>,
    ops: Vec<Op>,
    page_open: bool,
    page_width_mm: f32,
    page_height_mm: f32,
    images: HashMap<PathBuf, (XObjectId, usize, usize)>,
}

impl PdfCanvas {
    pub fn new(title: &str, page_width_mm: f32, page_height_mm: f32) -> Self {
        Self {
            doc: PdfDocument::new(title),
            pages: Vec::new(),
            ops: Vec::new(),
            page_open: false,
            page_width_mm,
            page_height_mm,
            images: HashMap::new(),
        }
    }

    fn load_image(&mut self, path: &Path) -> std::result::Result<(XObjectId, usize, usize), CanvasError> {
        if let Some((id, width, height)) = self.images.get(path) {
            return Ok((id.clone(), *width, *height));
        }

        let bytes = std::fs::read(path)?;
        let mut warnings = Vec::new();
        let image = RawImage::decode_from_bytes(&bytes, &mut warnings).map_err(|e| {
            CanvasError::ImageDecode {
                path: path.to_owned(),
                reason: e.to_string(),
            }
        })?;
        let (width, height) = (image.width, image.height);
        let id = self.doc.add_image(&image);
        self.images
            .insert(path.to_owned(), (id.clone(), width, height));
        Ok((id, width, height))
    }

    fn set_stroke(&mut self, color: Rgb8, thickness_mm: f32) {
        let [r, g, b] = color.to_f32();
        self.ops.push(Op::SetOutlineColor {
            col: Color::Rgb(Rgb {
                r,
                g,
                b,
                icc_profile: None,
            }),
        });
        self.ops.push(Op::SetOutlineThickness {
            pt: Mm(thickness_mm).into_pt(),
        });
    }

    fn set_dash(&mut self, dash: Option<i64>) {
        self.ops.push(Op::SetLineDashPattern {
            dash: LineDashPattern {
                offset: 0,
                dash_1: dash,
                gap_1: dash,
                dash_2: None,
                gap_2: None,
                dash_3: None,
                gap_3: None,
            },
        });
    }

    fn stroke_segment(&mut self, from: PointMm, to: PointMm) {
        self.ops.push(Op::DrawLine {
            line: Line {
                points: vec![
                    LinePoint {
                        p: Point {
                            x: Mm(from.x_mm).into_pt(),
                            y: Mm(from.y_mm).into_pt(),
                        },
                        bezier: false,
                    },
                    LinePoint {
                        p: Point {
                            x: Mm(to.x_mm).into_pt(),
                            y: Mm(to.y_mm).into_pt(),
                        },
                        bezier: false,
                    },
                ],
                is_closed: false,
            },
        });
    }

    /// The cross arms as (from, to) pairs. Corner kinds draw the two arms
    /// running along the trim lines into the card; a full cross draws all
    /// four.
    fn cross_arms(cross: &CrossMark) -> Vec<(PointMm, PointMm)> {
        let a = cross.anchor;
        let len = cross.arm_mm;
        let left = (a, PointMm::new(a.x_mm - len, a.y_mm));
        let right = (a, PointMm::new(a.x_mm + len, a.y_mm));
        let up = (a, PointMm::new(a.x_mm, a.y_mm + len));
        let down = (a, PointMm::new(a.x_mm, a.y_mm - len));

        match cross.kind {
            CrossKind::TopLeft => vec![right, down],
            CrossKind::TopRight => vec![left, down],
            CrossKind::BottomLeft => vec![right, up],
            CrossKind::BottomRight => vec![left, up],
            CrossKind::FullCross => vec![left, right, up, down],
        }
    }

    /// Greedy word wrap using the Helvetica width approximation.
    fn wrap_text(text: &str, width_mm: f32) -> Vec<String> {
        let char_width_mm = TEXT_FONT_SIZE_PT * HELVETICA_CHAR_WIDTH_RATIO * MM_PER_PT;
        let max_chars = ((width_mm / char_width_mm) as usize).max(1);

        let mut lines = Vec::new();
        let mut line = String::new();
        for word in text.split_whitespace() {
            if !line.is_empty() && line.len() + 1 + word.len() > max_chars {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        if !line.is_empty() {
            lines.push(line);
        }
        lines
    }
}

impl Canvas for PdfCanvas {
    fn next_page(&mut self) {
        debug_assert!(!self.page_open, "previous page was not finished");
        self.ops.clear();
        self.page_open = true;
    }

    fn draw_image(&mut self, placement: &ImagePlacement) -> std::result::Result<(), CanvasError> {
        let (id, width_px, height_px) = self.load_image(&placement.path)?;

        let rect = &placement.rect;
        let target_w_pt = Mm(rect.width_mm).into_pt().0;
        let target_h_pt = Mm(rect.height_mm).into_pt().0;

        // at 72 dpi one pixel is one point, so the scale factors map the
        // pixel grid straight onto the slot rectangle; quarter turns swap
        // the target axes
        let (scale_x, scale_y) = match placement.rotation {
            Rotation::None | Rotation::Clockwise180 => (
                target_w_pt / width_px as f32,
                target_h_pt / height_px as f32,
            ),
            Rotation::Clockwise90 | Rotation::Clockwise270 => (
                target_h_pt / width_px as f32,
                target_w_pt / height_px as f32,
            ),
        };

        // rotation happens about the image centre, so aim the centre of the
        // scaled image at the centre of the slot
        let center_x_pt = Mm(rect.center_x()).into_pt().0;
        let center_y_pt = Mm(rect.center_y()).into_pt().0;
        let translate_x = center_x_pt - width_px as f32 * scale_x / 2.0;
        let translate_y = center_y_pt - height_px as f32 * scale_y / 2.0;

        let degrees = placement.rotation.degrees();
        let rotate = (degrees != 0).then(|| XObjectRotation {
            angle_ccw_degrees: (360 - degrees) as f32,
            rotation_center_x: Px(width_px / 2),
            rotation_center_y: Px(height_px / 2),
        });

        self.ops.push(Op::UseXobject {
            id,
            transform: XObjectTransform {
                translate_x: Some(Pt(translate_x)),
                translate_y: Some(Pt(translate_y)),
                rotate,
                scale_x: Some(scale_x),
                scale_y: Some(scale_y),
                dpi: Some(72.0),
            },
        });
        Ok(())
    }

    fn draw_dashed_cross(&mut self, cross: &CrossMark, style: &DashedLineStyle) {
        for (from, to) in Self::cross_arms(cross) {
            self.draw_dashed_line(from, to, style);
        }
    }

    fn draw_dashed_line(&mut self, from: PointMm, to: PointMm, style: &DashedLineStyle) {
        // a solid base line in color B with color A dashes on top reads as
        // an alternating two-color pattern
        self.set_stroke(style.color_b, style.thickness_mm);
        self.set_dash(None);
        self.stroke_segment(from, to);

        self.set_stroke(style.color_a, style.thickness_mm);
        self.set_dash(Some(GUIDE_DASH_PT));
        self.stroke_segment(from, to);
        self.set_dash(None);
    }

    fn draw_solid_line(&mut self, from: PointMm, to: PointMm, style: &LineStyle) {
        self.set_stroke(style.color, style.thickness_mm);
        self.set_dash(None);
        self.stroke_segment(from, to);
    }

    fn draw_text(&mut self, text: &str, bounds: Rect) {
        let line_height_mm = TEXT_FONT_SIZE_PT * 1.4 * MM_PER_PT;

        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetFontSizeBuiltinFont {
            font: BuiltinFont::Helvetica,
            size: Pt(TEXT_FONT_SIZE_PT),
        });
        for (i, line) in Self::wrap_text(text, bounds.width_mm).iter().enumerate() {
            let y_mm = bounds.top() - (i as f32 + 1.0) * line_height_mm;
            if y_mm < bounds.y_mm {
                break;
            }
            self.ops.push(Op::SetTextCursor {
                pos: Point {
                    x: Mm(bounds.x_mm).into_pt(),
                    y: Mm(y_mm).into_pt(),
                },
            });
            self.ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(line.clone())],
                font: BuiltinFont::Helvetica,
            });
        }
        self.ops.push(Op::EndTextSection);
    }

    fn finish_page(&mut self) {
        debug_assert!(self.page_open, "no page to finish");
        self.pages.push(PdfPage::new(
            Mm(self.page_width_mm),
            Mm(self.page_height_mm),
            std::mem::take(&mut self.ops),
        ));
        self.page_open = false;
    }

    fn write(&mut self, file_name: &Path) -> std::result::Result<PathBuf, CanvasError> {
        self.doc.pages = std::mem::take(&mut self.pages);

        let mut warnings = Vec::new();
        let bytes = self.doc.save(&PdfSaveOptions::default(), &mut warnings);
        for warning in &warnings {
            log::debug!("pdf writer: {warning:?}");
        }

        std::fs::write(file_name, bytes)?;
        Ok(file_name.to_owned())
    }
}

fn document_title(options: &RenderOptions) -> String {
    options
        .output_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "proxies".to_string())
}

/// Render the proxy document to `options.output_file`, reporting per-image
/// progress through `progress`.
pub fn render_to_pdf(
    options: &RenderOptions,
    progress: &mut dyn FnMut(ImageProgress<'_>),
) -> Result<RenderReport> {
    let (page_width_mm, page_height_mm) = options.page_size_mm();
    let mut canvas = PdfCanvas::new(&document_title(options), page_width_mm, page_height_mm);
    proxy_layout::render_document(&mut canvas, options, progress)
}

/// Render the proxy document on a blocking task.
pub async fn generate_pdf(options: &RenderOptions) -> Result<RenderReport> {
    let options = options.clone();
    tokio::task::spawn_blocking(move || render_to_pdf(&options, &mut |_| {})).await?
}

/// Render the printer calibration sheet next to the configured output file.
pub async fn generate_alignment_pdf(
    options: &RenderOptions,
    file_name: impl AsRef<Path>,
) -> Result<PathBuf> {
    let options = options.clone();
    let file_name = file_name.as_ref().to_owned();
    tokio::task::spawn_blocking(move || {
        let (page_width_mm, page_height_mm) = options.page_size_mm();
        let mut canvas =
            PdfCanvas::new("Alignment test", page_width_mm, page_height_mm);
        proxy_layout::render_alignment_sheet(&mut canvas, &options, &file_name)
    })
    .await?
}
