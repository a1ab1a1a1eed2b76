//! sudoku-lens CLI: solve puzzle files, scan frame sequences, train digit models.

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sudoku_lens::{
    Grid, ImageSequenceSource, LabeledSample, PipelineConfig, PipelineEvent,
    PipelineWorker, SudokuPipeline, TrackerEvent,
};
use sudoku_lens::core::GrayImage;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "sudoku-lens")]
#[command(about = "Find, read and solve sudoku puzzles in camera frames")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a puzzle file of 81 whitespace-separated digits (0 = empty).
    Solve {
        /// Path to the puzzle file.
        file: PathBuf,
    },

    /// Run the pipeline over a sequence of image frames.
    Scan(ScanArgs),

    /// Train a digit model from labelled cell images and save it.
    Train(TrainArgs),

    /// Write the default pipeline configuration as JSON.
    InitConfig {
        /// Output path.
        out: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
struct ScanArgs {
    /// Pipeline configuration (JSON). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Trained digit model to load.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Print every per-cell reading, not only fixed digits.
    #[arg(long)]
    show_changes: bool,

    /// Frame images, processed in order.
    #[arg(required = true)]
    frames: Vec<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct TrainArgs {
    /// Pipeline configuration (JSON) selecting the classifier.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to save the trained model.
    #[arg(long)]
    out: PathBuf,

    /// Cell images whose file name starts with their digit, e.g. `7_a.png`.
    #[arg(required = true)]
    samples: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    #[cfg(feature = "tracing")]
    {
        let _ = level;
        sudoku_lens::init_tracing(false);
    }
    #[cfg(not(feature = "tracing"))]
    let _ = sudoku_lens::init_with_level(level);

    let result = match cli.command {
        Commands::Solve { file } => run_solve(&file),
        Commands::Scan(args) => run_scan(&args),
        Commands::Train(args) => run_train(&args),
        Commands::InitConfig { out } => PipelineConfig::default()
            .write_json(&out)
            .map_err(CliError::from),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> CliResult<PipelineConfig> {
    match path {
        Some(p) => Ok(PipelineConfig::load_json(p)?),
        None => Ok(PipelineConfig::default()),
    }
}

fn run_solve(file: &Path) -> CliResult<()> {
    let text = std::fs::read_to_string(file)?;
    let grid: Grid = text.parse()?;
    let solved = sudoku_lens::solver::solve(&grid)?;
    print!("{solved}");
    Ok(())
}

fn run_scan(args: &ScanArgs) -> CliResult<()> {
    let config = load_config(args.config.as_deref())?;
    let pipeline = Arc::new(SudokuPipeline::new(config));
    if let Some(model) = &args.model {
        if !pipeline.load(model) {
            return Err(format!("could not load model {}", model.display()).into());
        }
    }

    let source = ImageSequenceSource::new(args.frames.iter().cloned());
    let worker = PipelineWorker::spawn(Arc::clone(&pipeline), source);

    let mut solved = false;
    for event in worker.events() {
        match event {
            PipelineEvent::Tracker(TrackerEvent::CellDigitChanged { row, col, digit }) => {
                if args.show_changes {
                    println!("changed ({row}, {col}) = {digit}");
                }
            }
            PipelineEvent::Tracker(TrackerEvent::CellDigitFixed { row, col, digit }) => {
                println!("fixed ({row}, {col}) = {digit}");
            }
            PipelineEvent::Tracker(other) => println!("{other:?}"),
            PipelineEvent::Solved {
                solution, success, ..
            } => {
                if success {
                    println!("solution:");
                    print!("{solution}");
                    solved = true;
                } else {
                    println!("no solution for the committed digits");
                }
            }
            PipelineEvent::EndOfStream => break,
        }
    }

    let stats = worker.join()?;
    println!(
        "frames: {}, puzzle found in {}, solved: {}",
        stats.frames, stats.found, solved
    );
    Ok(())
}

fn label_of(path: &Path) -> Option<u8> {
    let first = path.file_name()?.to_str()?.chars().next()?;
    let digit = first.to_digit(10)?;
    (1..=9).contains(&digit).then_some(digit as u8)
}

fn run_train(args: &TrainArgs) -> CliResult<()> {
    let config = load_config(args.config.as_deref())?;

    let mut samples = Vec::with_capacity(args.samples.len());
    for path in &args.samples {
        let label = label_of(path)
            .ok_or_else(|| format!("{}: file name must start with 1-9", path.display()))?;
        let luma = image::open(path)?.to_luma8();
        let (w, h) = (luma.width() as usize, luma.height() as usize);
        let image = GrayImage::from_raw(w, h, luma.into_raw())
            .ok_or_else(|| format!("{}: bad image buffer", path.display()))?;
        samples.push(LabeledSample { label, image });
    }

    let pipeline = SudokuPipeline::new(config);
    if !pipeline.train(&samples) {
        return Err("training failed".into());
    }
    if !pipeline.save(&args.out) {
        return Err(format!("could not save model to {}", args.out.display()).into());
    }
    println!("trained on {} samples -> {}", samples.len(), args.out.display());
    Ok(())
}
