mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "examdeck",
    version,
    about = "Exam score analysis: per-question statistics and a slide deck of cropped questions"
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a score sheet and show its layout, column roles and data-quality findings
    Inspect {
        /// Path to the score sheet (xlsx, xls, ods or csv)
        sheet: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Compute per-question correct/wrong statistics
    Analyze {
        /// Path to the score sheet (xlsx, xls, ods or csv)
        sheet: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the analysis as JSON to a file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Print the number of pages in a PDF
    Pages {
        /// Path to the exam PDF
        pdf: PathBuf,
    },
    /// Edit a question region file
    Regions {
        #[command(subcommand)]
        action: RegionsAction,
    },
    /// Crop the question regions and write the report deck
    Generate {
        /// Path to the score sheet (xlsx, xls, ods or csv)
        sheet: PathBuf,

        /// Exam page: an image (png, jpg, bmp) or a PDF
        page_source: PathBuf,

        /// Region file (default: <page source stem>_config.json)
        #[arg(short, long, value_name = "FILE")]
        regions: Option<PathBuf>,

        /// PDF page to use, 1-based
        #[arg(
            short,
            long,
            default_value_t = 1,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
        )]
        page: usize,

        /// Output file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Session options JSON (display box, PDF render scale, minimum region size)
        #[arg(long, value_name = "FILE")]
        options: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum RegionsAction {
    /// Append rectangles, in display coordinates, as the next question numbers
    Add {
        /// Region file; created if missing
        file: PathBuf,

        /// Rectangle as x,y,width,height (repeatable)
        #[arg(short, long = "rect", value_name = "X,Y,W,H", required = true)]
        rects: Vec<String>,

        /// Rectangles must exceed this size in both dimensions
        #[arg(long, value_name = "PIXELS")]
        min_size: Option<u32>,
    },
    /// Remove the most recently added region
    Undo {
        /// Region file
        file: PathBuf,
    },
    /// Remove all regions
    Clear {
        /// Region file
        file: PathBuf,
    },
    /// List regions in question order
    List {
        /// Region file
        file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Inspect { sheet, output } => commands::inspect::run(&sheet, &output),
        Commands::Analyze { sheet, output, out } => commands::analyze::run(&sheet, &output, out),
        Commands::Pages { pdf } => commands::pages::run(&pdf),
        Commands::Regions { action } => match action {
            RegionsAction::Add {
                file,
                rects,
                min_size,
            } => commands::regions::add(&file, &rects, min_size),
            RegionsAction::Undo { file } => commands::regions::undo(&file),
            RegionsAction::Clear { file } => commands::regions::clear(&file),
            RegionsAction::List { file, output } => commands::regions::list(&file, &output),
        },
        Commands::Generate {
            sheet,
            page_source,
            regions,
            page,
            out,
            options,
        } => commands::generate::run(commands::generate::GenerateArgs {
            sheet,
            page_source,
            regions,
            page,
            out,
            options,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
