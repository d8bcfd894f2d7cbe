use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use proxy_layout::{FlipEdge, Margins, Orientation, PaperSize, RenderOptions};

#[derive(Parser)]
#[command(name = "proxyp", about = "Card proxy PDF layout tool", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the proxy PDF from a project file or a CSV card list
    Render {
        /// Project JSON file (as written by `template`)
        #[arg(short, long, conflicts_with = "cards")]
        project: Option<PathBuf>,

        /// CSV card list (columns: front, copies, back, short)
        #[arg(short, long)]
        cards: Option<PathBuf>,

        /// Output PDF file
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Render the printer calibration sheet
    Alignment {
        /// Output PDF file
        #[arg(short, long, default_value = "alignment.pdf")]
        output: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Write a default project JSON file to fill in
    Template {
        /// Output project file
        #[arg(short, long, default_value = "project.json")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct LayoutArgs {
    /// Directory card image paths are resolved against
    #[arg(long, default_value = ".")]
    image_dir: PathBuf,

    /// Grid columns per page
    #[arg(long, default_value = "3")]
    columns: usize,

    /// Grid rows per page
    #[arg(long, default_value = "3")]
    rows: usize,

    /// Card width in mm, without bleed
    #[arg(long, default_value = "63.5")]
    card_width_mm: f32,

    /// Card height in mm, without bleed
    #[arg(long, default_value = "88.9")]
    card_height_mm: f32,

    /// Bleed edge around each card in mm
    #[arg(long, default_value = "0")]
    bleed_mm: f32,

    /// Spacing between cards in mm (both axes)
    #[arg(long, default_value = "0")]
    spacing_mm: f32,

    /// Page size
    #[arg(long, default_value = "a4", value_enum)]
    paper: PaperArg,

    /// Page orientation
    #[arg(long, default_value = "portrait", value_enum)]
    orientation: OrientationArg,

    /// Explicit horizontal margin in mm (default: center the grid)
    #[arg(long, requires = "margin_y_mm")]
    margin_x_mm: Option<f32>,

    /// Explicit vertical margin in mm
    #[arg(long, requires = "margin_x_mm")]
    margin_y_mm: Option<f32>,

    /// Add mirrored backside pages
    #[arg(long)]
    backside: bool,

    /// Default backside image for cards without one
    #[arg(long, default_value = "__back.png")]
    backside_image: PathBuf,

    /// Horizontal backside correction in mm
    #[arg(long, default_value = "0")]
    backside_offset_mm: f32,

    /// Edge the sheet is flipped over for duplex printing
    #[arg(long, default_value = "left", value_enum)]
    flip_edge: FlipArg,

    /// Disable cut guides
    #[arg(long)]
    no_guides: bool,

    /// Draw full crosses instead of corner segments
    #[arg(long)]
    cross_guides: bool,

    /// Extend boundary guides to the page edges
    #[arg(long)]
    extended_guides: bool,

    /// Also draw guides on backside pages
    #[arg(long)]
    backside_guides: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

#[derive(Clone, Copy, ValueEnum)]
enum FlipArg {
    Left,
    Top,
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
        }
    }
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl From<FlipArg> for FlipEdge {
    fn from(arg: FlipArg) -> Self {
        match arg {
            FlipArg::Left => Self::Left,
            FlipArg::Top => Self::Top,
        }
    }
}

impl LayoutArgs {
    fn apply(self, options: &mut RenderOptions) {
        options.image_dir = self.image_dir;
        options.columns = self.columns;
        options.rows = self.rows;
        options.card_width_mm = self.card_width_mm;
        options.card_height_mm = self.card_height_mm;
        options.bleed_mm = self.bleed_mm;
        options.column_spacing_mm = self.spacing_mm;
        options.spacing_linked = true;
        options.paper_size = self.paper.into();
        options.orientation = self.orientation.into();
        if let (Some(x_mm), Some(y_mm)) = (self.margin_x_mm, self.margin_y_mm) {
            options.custom_margins = Some(Margins { x_mm, y_mm });
        }
        options.backside.enabled = self.backside;
        options.backside.default_image = self.backside_image;
        options.backside.offset_mm = self.backside_offset_mm;
        options.backside.flip_edge = self.flip_edge.into();
        options.guides.enabled = !self.no_guides;
        options.guides.cross_guides = self.cross_guides;
        options.guides.extended_guides = self.extended_guides;
        options.guides.on_backside = self.backside_guides;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            project,
            cards,
            output,
            layout,
        } => {
            let mut options = match &project {
                Some(path) => RenderOptions::load(path).await?,
                None => {
                    let Some(cards_path) = &cards else {
                        bail!("either --project or --cards is required");
                    };
                    let mut options = RenderOptions::default();
                    layout.apply(&mut options);
                    options.cards = proxy_layout::load_cards_from_csv(cards_path).await?;
                    options
                }
            };
            if let Some(output) = output {
                options.output_file = output;
            }
            options.validate()?;

            let report = tokio::task::spawn_blocking(move || {
                proxy_pdf::render_to_pdf(&options, &mut |p| {
                    let side = if p.backside { " (backside)" } else { "" };
                    println!(
                        "Rendering page {}{}, image {} - {}",
                        p.page, side, p.image, p.identifier
                    );
                })
            })
            .await??;

            for path in &report.missing_images {
                eprintln!("warning: missing card image {}", path.display());
            }
            println!(
                "Rendered {} images on {} pages → {}",
                report.images_drawn,
                report.pages,
                report.output_path.display()
            );
        }

        Commands::Alignment { output, layout } => {
            let mut options = RenderOptions::default();
            layout.apply(&mut options);

            let path = proxy_pdf::generate_alignment_pdf(&options, &output).await?;
            println!("Alignment sheet → {}", path.display());
        }

        Commands::Template { output } => {
            let options = RenderOptions::default();
            options.save(&output).await?;
            println!("Project template → {}", output.display());
        }
    }

    Ok(())
}
