//! Boxlabel: draw, label and export bounding-box datasets.
//!
//! A batch of JPEG/PNG images is annotated with rectangles, each rectangle is
//! given a class label, and the whole batch is split into train/valid/test
//! subsets and packaged as a YOLO-style ZIP archive.
//!
//! # Modules
//!
//! - [`ir`]: Core types (boxes, images, annotations, class registry, store)
//! - [`canvas`]: Canvas JSON payloads produced by a drawing surface
//! - [`session`]: Per-user state machine driven by [`session::Command`]s
//! - [`split`]: Seeded or random train/valid/test splitting
//! - [`export`]: In-memory ZIP archive construction
//! - [`inspect`]: Reading exported archives back
//! - [`error`]: Error types for boxlabel operations

pub mod canvas;
pub mod error;
pub mod export;
pub mod inspect;
pub mod ir;
pub mod session;
pub mod split;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

pub use error::BoxlabelError;

use export::{ExportOptions, DEFAULT_ARCHIVE_NAME};
use session::{Command, Session};
use split::{SplitRatios, DEFAULT_TEST_RATIO, DEFAULT_VALIDATION_RATIO};

/// The boxlabel CLI application.
#[derive(Parser)]
#[command(name = "boxlabel")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Annotate images interactively; commands are read from stdin.
    Annotate(AnnotateArgs),
    /// Replay a canvas file over a batch of images and export the dataset.
    Export(ExportArgs),
    /// Summarize an exported dataset archive.
    Inspect(InspectArgs),
}

/// Split settings shared by `annotate` and `export`.
#[derive(clap::Args)]
struct SplitArgs {
    /// Fraction of images placed in the validation subset.
    #[arg(long, env = "BOXLABEL_VAL_RATIO", default_value_t = DEFAULT_VALIDATION_RATIO, value_parser = parse_ratio)]
    val_ratio: f64,

    /// Fraction of images placed in the test subset.
    #[arg(long, env = "BOXLABEL_TEST_RATIO", default_value_t = DEFAULT_TEST_RATIO, value_parser = parse_ratio)]
    test_ratio: f64,

    /// Shuffle seed for a reproducible split.
    #[arg(long, env = "BOXLABEL_SEED")]
    seed: Option<u64>,

    /// Path of the archive to write.
    #[arg(short = 'o', long = "out", default_value = DEFAULT_ARCHIVE_NAME)]
    out: PathBuf,
}

impl SplitArgs {
    fn options(&self) -> ExportOptions {
        ExportOptions {
            ratios: SplitRatios {
                validation: self.val_ratio,
                test: self.test_ratio,
            },
            seed: self.seed,
        }
    }
}

/// Arguments for the annotate subcommand.
#[derive(clap::Args)]
struct AnnotateArgs {
    /// Images to annotate (JPEG or PNG).
    #[arg(required = true)]
    images: Vec<PathBuf>,

    #[command(flatten)]
    split: SplitArgs,
}

/// Arguments for the export subcommand.
#[derive(clap::Args)]
struct ExportArgs {
    /// Images to export (JPEG or PNG).
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Canvas file: a JSON object mapping image file names to their shapes
    /// and labels. Without it, no image gets a label file.
    #[arg(long)]
    canvas: Option<PathBuf>,

    #[command(flatten)]
    split: SplitArgs,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Archive to inspect.
    archive: PathBuf,

    /// Output format for the summary ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the boxlabel CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), BoxlabelError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Annotate(args)) => run_annotate(args),
        Some(Commands::Export(args)) => run_export(args),
        Some(Commands::Inspect(args)) => run_inspect(args),
        None => {
            println!("boxlabel {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Draw, label and export bounding-box datasets.");
            println!();
            println!("Run 'boxlabel --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the annotate subcommand.
fn run_annotate(args: AnnotateArgs) -> Result<(), BoxlabelError> {
    let opts = args.split.options();
    opts.ratios.validate()?;

    let mut session = Session::new();
    session.handle(Command::UploadBatch(read_images(&args.images)?))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = session::run_shell(&mut session, stdin.lock(), &mut out, &opts, &args.split.out)?;

    if report.is_none() {
        writeln!(out, "No archive written.")?;
    }
    Ok(())
}

/// Execute the export subcommand.
fn run_export(args: ExportArgs) -> Result<(), BoxlabelError> {
    check_output_format(&args.output)?;
    let opts = args.split.options();
    opts.ratios.validate()?;

    let mut session = Session::new();
    session.handle(Command::UploadBatch(read_images(&args.images)?))?;

    if let Some(canvas_path) = &args.canvas {
        let entries = canvas::read_canvas_file(canvas_path)?;
        session.replay(&entries)?;
    }

    let artifact =
        export::export_dataset(session.batch(), session.store(), session.registry(), &opts)?;
    fs::write(&args.split.out, &artifact.bytes)?;
    tracing::info!(path = %args.split.out.display(), "wrote archive");

    match args.output.as_str() {
        "json" => println!("{}", to_json(&artifact.report)?),
        _ => {
            print!("{}", artifact.report);
            println!("Wrote {}", args.split.out.display());
        }
    }
    Ok(())
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), BoxlabelError> {
    check_output_format(&args.output)?;
    let summary = inspect::inspect_archive_file(&args.archive)?;

    match args.output.as_str() {
        "json" => println!("{}", to_json(&summary)?),
        _ => print!("{}", summary),
    }
    Ok(())
}

/// Read image files as `(file name, bytes)` pairs for an upload batch.
fn read_images(paths: &[PathBuf]) -> Result<Vec<(String, Vec<u8>)>, BoxlabelError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push((upload_name(path), fs::read(path)?));
    }
    Ok(files)
}

/// The name an image is uploaded under: its final path component.
fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn check_output_format(output: &str) -> Result<(), BoxlabelError> {
    match output {
        "text" | "json" => Ok(()),
        other => Err(BoxlabelError::UnsupportedFormat(format!(
            "'{other}' output (supported: text, json)"
        ))),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, BoxlabelError> {
    serde_json::to_string_pretty(value).map_err(|err| BoxlabelError::Io(err.into()))
}

/// Clap value parser for split ratios.
fn parse_ratio(value: &str) -> Result<f64, String> {
    let ratio: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if ratio.is_finite() && (0.0..=1.0).contains(&ratio) {
        Ok(ratio)
    } else {
        Err(format!("{ratio} is not between 0.0 and 1.0"))
    }
}
