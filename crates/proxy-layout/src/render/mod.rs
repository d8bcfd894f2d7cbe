//! Page assembly
//!
//! Drives one full document render: pagination, per-page grid placement,
//! image and guide draw calls against the [`Canvas`], duplex back pages, and
//! progress reporting. The render is sequential and deterministic; pages and
//! slots are processed in a fixed order so the reported page/image numbers
//! match the produced document.

use std::path::PathBuf;

use crate::canvas::{Canvas, ImagePlacement, LineStyle, Point, Rgb8};
use crate::guides::{GuideSegment, GuideSheet};
use crate::layout::{
    CardGrid, Rect, backside_rotation, mirrored_position, paginate, resolve_geometry,
};
use crate::options::{CardEntry, RenderOptions};
use crate::types::{Result, Rotation};

/// Per-image progress notification, emitted once per drawn slot.
#[derive(Debug, Clone, Copy)]
pub struct ImageProgress<'a> {
    /// Page number, 1-based.
    pub page: usize,
    /// Image number within the page, 1-based.
    pub image: usize,
    /// The card's front image path, also on backside pages.
    pub identifier: &'a str,
    pub backside: bool,
}

/// Outcome of a completed render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    /// Where the canvas wrote the document.
    pub output_path: PathBuf,
    /// Canvas pages produced, back pages included.
    pub pages: usize,
    /// Images actually drawn.
    pub images_drawn: usize,
    /// Resolved image paths that did not exist at render time. Their slots
    /// were skipped; the rest of the document is unaffected.
    pub missing_images: Vec<PathBuf>,
}

/// Render the whole document onto `canvas` and write it out.
///
/// Configuration errors abort before the first canvas page is requested.
/// Missing image files are skipped with a warning and recorded in the
/// report; canvas failures propagate.
pub fn render_document<C: Canvas>(
    canvas: &mut C,
    options: &RenderOptions,
    progress: &mut dyn FnMut(ImageProgress<'_>),
) -> Result<RenderReport> {
    let geometry = resolve_geometry(options)?;
    let style = options.guides.line_style();
    let pages = paginate(&options.cards, geometry.columns, geometry.rows);

    let mut report = RenderReport {
        output_path: PathBuf::new(),
        pages: 0,
        images_drawn: 0,
        missing_images: Vec::new(),
    };

    for (p, page) in pages.iter().enumerate() {
        let grid = CardGrid::place(page, geometry.columns, geometry.rows);

        log::info!("rendering page {}", p + 1);
        canvas.next_page();
        let mut guides = options
            .guides
            .enabled
            .then(|| GuideSheet::new(&geometry, &options.guides));

        for (i, (pos, entry_index)) in grid.occupied().enumerate() {
            let entry = &options.cards[entry_index];
            let identifier = entry.front.display().to_string();
            log::info!("page {}: image {} - {}", p + 1, i + 1, identifier);
            progress(ImageProgress {
                page: p + 1,
                image: i + 1,
                identifier: &identifier,
                backside: false,
            });

            draw_slot(
                canvas,
                &mut report,
                ImagePlacement {
                    path: options.image_dir.join(&entry.front),
                    rect: geometry.slot_rect(pos),
                    rotation: Rotation::None,
                },
            )?;

            if let Some(guides) = &mut guides {
                guides.add_cell(pos);
            }
        }

        if let Some(guides) = guides {
            emit_guides(canvas, guides, &style);
        }
        canvas.finish_page();
        report.pages += 1;

        if options.backside.enabled {
            log::info!("rendering backside for page {}", p + 1);
            canvas.next_page();
            let mut guides = (options.guides.enabled && options.guides.on_backside)
                .then(|| GuideSheet::new(&geometry, &options.guides));

            for (i, (pos, entry_index)) in grid.occupied().enumerate() {
                let entry = &options.cards[entry_index];
                let identifier = entry.front.display().to_string();
                log::info!("backside of page {}: image {} - {}", p + 1, i + 1, identifier);
                progress(ImageProgress {
                    page: p + 1,
                    image: i + 1,
                    identifier: &identifier,
                    backside: true,
                });

                let mirrored = mirrored_position(
                    pos,
                    geometry.columns,
                    geometry.rows,
                    options.backside.flip_edge,
                );
                draw_slot(
                    canvas,
                    &mut report,
                    ImagePlacement {
                        path: options.image_dir.join(backside_image(entry, options)),
                        rect: geometry
                            .backside_slot_rect(mirrored, options.backside.offset_mm),
                        rotation: backside_rotation(
                            Rotation::None,
                            entry.backside_short_edge,
                            options.backside.flip_edge,
                        ),
                    },
                )?;

                // guides stay in the front frame; a mirrored grid shares its
                // cut lines with the front when the sheet is flipped
                if let Some(guides) = &mut guides {
                    guides.add_cell(pos);
                }
            }

            if let Some(guides) = guides {
                emit_guides(canvas, guides, &style);
            }
            canvas.finish_page();
            report.pages += 1;
        }
    }

    report.output_path = canvas.write(&options.output_file)?;
    log::info!("wrote {}", report.output_path.display());
    Ok(report)
}

fn backside_image<'a>(entry: &'a CardEntry, options: &'a RenderOptions) -> &'a std::path::Path {
    entry
        .back
        .as_deref()
        .unwrap_or(&options.backside.default_image)
}

/// Draw one card image, skipping slots whose source file is missing.
///
/// A missing file must not disturb the page: the slot is recorded and the
/// render carries on.
fn draw_slot<C: Canvas>(
    canvas: &mut C,
    report: &mut RenderReport,
    placement: ImagePlacement,
) -> Result<()> {
    if placement.path.exists() {
        canvas.draw_image(&placement)?;
        report.images_drawn += 1;
    } else {
        log::warn!(
            "card image {} not found, leaving its slot empty",
            placement.path.display()
        );
        report.missing_images.push(placement.path);
    }
    Ok(())
}

fn emit_guides<C: Canvas>(
    canvas: &mut C,
    guides: GuideSheet<'_>,
    style: &crate::canvas::DashedLineStyle,
) {
    for segment in guides.segments() {
        match segment {
            GuideSegment::Cross(cross) => canvas.draw_dashed_cross(&cross, style),
            GuideSegment::Line { from, to } => canvas.draw_dashed_line(from, to, style),
        }
    }
}

/// Render the printer calibration sheet.
///
/// One page with two solid vertical lines exactly 20 mm apart and printed
/// instructions; with backsides enabled, a second page carries the mirrored
/// line shifted by the backside offset, so the user can hold the sheet
/// against the light and measure the correction their printer needs.
pub fn render_alignment_sheet<C: Canvas>(
    canvas: &mut C,
    options: &RenderOptions,
    file_name: &std::path::Path,
) -> Result<PathBuf> {
    let (page_width, page_height) = options.page_size_mm();
    let style = LineStyle {
        thickness_mm: 0.2,
        color: Rgb8::BLACK,
    };

    canvas.next_page();

    canvas.draw_text(
        "This is a test page. Print it at 100% scale and follow the instructions \
         to verify your settings before a full render.",
        Rect::new(
            0.0,
            page_height - page_height / 8.0,
            page_width,
            page_height / 16.0,
        ),
    );

    let left_line_x = page_width / 4.0;
    canvas.draw_solid_line(
        Point::new(left_line_x, 0.0),
        Point::new(left_line_x, page_height - page_height / 8.0),
        &style,
    );

    if options.backside.enabled {
        canvas.draw_text(
            "Shine a light through this page; the line on the back should align \
             with the front. If not, measure the difference and paste it into \
             the backside offset option.",
            Rect::new(
                left_line_x,
                page_height / 2.0,
                page_width - left_line_x,
                page_height / 2.0 - page_height / 8.0,
            ),
        );
    }

    let right_line_x = left_line_x + 20.0;
    canvas.draw_solid_line(
        Point::new(right_line_x, 0.0),
        Point::new(right_line_x, page_height / 2.0),
        &style,
    );

    canvas.draw_text(
        "These lines should be exactly 20 mm apart. If not, make sure to print \
         at 100% scaling.",
        Rect::new(
            right_line_x,
            0.0,
            page_width - right_line_x,
            page_height / 4.0,
        ),
    );

    canvas.finish_page();

    if options.backside.enabled {
        canvas.next_page();
        let mirrored_x = page_width - page_width / 4.0 + options.backside.offset_mm;
        canvas.draw_solid_line(
            Point::new(mirrored_x, 0.0),
            Point::new(mirrored_x, page_height),
            &style,
        );
        canvas.finish_page();
    }

    Ok(canvas.write(file_name)?)
}
