//! quadfind CLI — command-line interface for top-K feature extraction
//! and quadrilateral measurement.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use quadfind_core::{Error, ImageReport, PatchParams, TextParams, TextReport};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "quadfind")]
#[command(
    about = "Select the top-K non-overlapping features of an input (lexicographic text windows or bright image patches) and measure the quadrilateral they form"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the lexicographically largest alphanumeric windows in a text file.
    Text(CliTextArgs),

    /// Find the brightest patches in an image.
    Image(CliImageArgs),
}

#[derive(Debug, Clone, Args)]
struct CliTextArgs {
    /// Path to the input text file (UTF-8, line oriented).
    input: PathBuf,

    /// Window length in characters.
    #[arg(long, default_value = "5")]
    window_len: usize,

    /// Number of non-overlapping windows to select.
    #[arg(long, default_value = "4")]
    count: usize,

    /// Lines per parallel partition.
    #[arg(long, default_value = "4096")]
    lines_per_chunk: usize,

    /// Path to write the JSON report (stdout when omitted).
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CliImageArgs {
    /// Path to the input image.
    input: PathBuf,

    /// Side length of the square patch in pixels.
    #[arg(long, default_value = "5")]
    patch_size: u32,

    /// Number of non-overlapping patches to select.
    #[arg(long, default_value = "4")]
    count: usize,

    /// Top-left rows per parallel band.
    #[arg(long, default_value = "256")]
    rows_per_band: u32,

    /// Path to write the annotated PNG (quadrilateral edges in red).
    #[arg(long, default_value = "output_image.png")]
    out: PathBuf,

    /// Skip writing the annotated image.
    #[arg(long)]
    no_annotate: bool,

    /// Path to write the JSON report (stdout when omitted).
    #[arg(long)]
    json: Option<PathBuf>,
}

impl CliTextArgs {
    fn to_params(&self) -> TextParams {
        TextParams {
            window_len: self.window_len,
            count: self.count,
            lines_per_chunk: self.lines_per_chunk,
        }
    }
}

impl CliImageArgs {
    fn to_params(&self) -> PatchParams {
        PatchParams {
            patch_size: self.patch_size,
            count: self.count,
            rows_per_band: self.rows_per_band,
        }
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Text(args) => run_text(&args),
        Commands::Image(args) => run_image(&args),
    }
}

fn write_report(json: &str, out: Option<&PathBuf>) -> CliResult<()> {
    match out {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

// ── text ───────────────────────────────────────────────────────────────

fn run_text(args: &CliTextArgs) -> CliResult<()> {
    tracing::info!("Reading text file: {}", args.input.display());

    let report: TextReport = quadfind_core::detect_text_file(&args.input, &args.to_params())?;

    tracing::info!(
        "Selected {} window(s) from {} line(s)",
        report.windows.len(),
        report.lines_scanned
    );
    for w in &report.windows {
        tracing::info!("  {:?} at line {}, column {}", w.text, w.line, w.start);
    }
    if let Some(ref quad) = report.quad {
        tracing::info!(
            "Quadrilateral: area={:.3}, perimeter={:.3}",
            quad.area,
            quad.perimeter
        );
    }

    let json = serde_json::to_string_pretty(&report)?;
    write_report(&json, args.json.as_ref())
}

// ── image ──────────────────────────────────────────────────────────────

fn run_image(args: &CliImageArgs) -> CliResult<()> {
    tracing::info!("Loading image: {}", args.input.display());

    // Opened here (not via detect_image_file) so the original colors are
    // still around for annotation.
    let img = image::open(&args.input).map_err(|e| Error::unreadable(&args.input, e))?;
    let gray = img.to_luma8();
    let (w, h) = gray.dimensions();
    tracing::info!("Image size: {}x{}", w, h);

    let report: ImageReport =
        quadfind_core::find_patch_quadrilateral(&gray, &args.to_params())?;

    tracing::info!("Selected {} patch(es)", report.patches.len());
    for p in &report.patches {
        tracing::info!(
            "  center ({}, {}), mean brightness {:.2}",
            p.center[0],
            p.center[1],
            p.mean_brightness
        );
    }

    if let Some(ref quad) = report.quad {
        tracing::info!(
            "Quadrilateral: area={:.3} px^2, perimeter={:.3} px",
            quad.area,
            quad.perimeter
        );

        if !args.no_annotate {
            let mut rgb = img.to_rgb8();
            quadfind_core::annotate::draw_quadrilateral(&mut rgb, quad);
            rgb.save(&args.out)?;
            tracing::info!("Annotated image written to {}", args.out.display());
        }
    }

    let json = serde_json::to_string_pretty(&report)?;
    write_report(&json, args.json.as_ref())
}
