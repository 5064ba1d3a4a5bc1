//! image-sorter - heuristic image analysis, renaming and organization
//!
//! Suggests descriptive filenames from color, geometry, EXIF and filename
//! hints, renames whole folders without collisions and groups images into
//! category folders.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use image_sorter::analysis::{self, AnalysisOutcome};
use image_sorter::config::Config;
use image_sorter::library::{self, SUPPORTED_EXTENSIONS};
use image_sorter::naming::{self, NamingStyle};
use image_sorter::organize::rename::{BatchEntry, BatchSummary};
use image_sorter::organize::{self, BatchOptions, OrganizationMethod};
use image_sorter::report;
use image_sorter::scan::metadata;

const APP_BINARY_NAME: &str = "image-sorter";

/// Heuristic image analysis, renaming and folder organization
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Suggest a name for a single image
    Analyze {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Naming style
        #[arg(short, long, value_enum)]
        style: Option<NamingStyle>,

        /// Print the full analysis
        #[arg(short, long)]
        detailed: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Suggest names for (or rename) every image of a directory
    Batch {
        #[arg(value_name = "DIR")]
        directory: PathBuf,

        /// Descend into sub-folders
        #[arg(short, long)]
        recursive: bool,

        /// Rename files instead of only suggesting names
        #[arg(long)]
        rename: bool,

        /// Prepended to every name as `<prefix>_`
        #[arg(short, long, value_name = "PREFIX")]
        prefix: Option<String>,

        /// Naming style
        #[arg(short, long, value_enum)]
        style: Option<NamingStyle>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print everything known about an image as JSON
    Metadata {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Skip the color analysis
        #[arg(long)]
        no_colors: bool,
    },

    /// Group the images of a directory into category folders
    Organize {
        #[arg(value_name = "DIR")]
        directory: PathBuf,

        /// Grouping key
        #[arg(short, long, value_enum)]
        method: Option<OrganizationMethod>,

        /// Create the folders and move the files
        #[arg(long)]
        create_folders: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct AnalyzeOutput<'a> {
    file: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggested_name: Option<String>,
    style: NamingStyle,
    analysis: &'a AnalysisOutcome,
}

#[derive(Serialize)]
struct BatchOutput<'a> {
    directory: &'a Path,
    style: NamingStyle,
    renamed: bool,
    files: &'a [BatchEntry],
    summary: BatchSummary,
}

fn init_logging(config: &Config, verbose: bool) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::new("debug"),
        Err(_) => EnvFilter::new(&config.logging.level),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Report a bad input path and exit
fn exit_with_usage(message: &str) -> ! {
    eprintln!("Error: {}", message);
    eprintln!();
    eprintln!("Supported formats: {}", SUPPORTED_EXTENSIONS.join(", "));
    eprintln!("For more options, run:");
    eprintln!("  {} --help", APP_BINARY_NAME);
    std::process::exit(1);
}

fn require_image(path: &Path) {
    if !path.exists() {
        exit_with_usage(&format!("Image file not found: {}", path.display()));
    }
    if !path.is_file() || !library::is_image_file(path) {
        exit_with_usage(&format!("Unsupported image format: {}", path.display()));
    }
}

fn require_directory(path: &Path) {
    if !path.exists() {
        exit_with_usage(&format!("Directory not found: {}", path.display()));
    }
    if !path.is_dir() {
        exit_with_usage(&format!("Not a directory: {}", path.display()));
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn run_analyze(image: &Path, style: NamingStyle, detailed: bool, json: bool) -> Result<()> {
    require_image(image);

    let outcome = analysis::analyze(image);
    let suggested_name = outcome.record().map(|record| {
        let base = naming::synthesize_name(record, style);
        organize::plan_rename(image, &base)
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    });

    if json {
        print_json(&AnalyzeOutput {
            file: image,
            suggested_name: suggested_name.clone(),
            style,
            analysis: &outcome,
        })?;
    } else {
        match (outcome.record(), &suggested_name) {
            (Some(record), Some(name)) if detailed => {
                println!("{}", report::render_detailed(image, name, style, record))
            }
            (Some(_), Some(name)) => println!("{}", report::render_suggestion(name, style)),
            _ => {}
        }
    }

    match outcome.error() {
        Some(error) => anyhow::bail!("Could not analyze {}: {}", image.display(), error),
        None => Ok(()),
    }
}

fn run_batch(directory: &Path, options: BatchOptions, json: bool) -> Result<()> {
    require_directory(directory);

    let run = organize::rename_directory(directory, &options)
        .with_context(|| format!("Failed to scan {}", directory.display()))?;

    if run.total() == 0 {
        if json {
            print_json(&BatchOutput {
                directory,
                style: options.style,
                renamed: options.rename,
                files: &[],
                summary: BatchSummary::default(),
            })?;
        } else {
            println!("No image files found in {}", directory.display());
        }
        return Ok(());
    }

    let entries: Vec<BatchEntry> = run.collect();

    if json {
        print_json(&BatchOutput {
            directory,
            style: options.style,
            renamed: options.rename,
            files: &entries,
            summary: BatchSummary::from_entries(&entries),
        })
    } else {
        println!("{}", report::render_batch(&entries, &options));
        Ok(())
    }
}

fn run_metadata(image: &Path, no_colors: bool) -> Result<()> {
    require_image(image);

    let info = metadata::collect_metadata(image, !no_colors)
        .with_context(|| format!("Failed to read metadata of {}", image.display()))?;
    print_json(&info)
}

fn run_organize(
    directory: &Path,
    method: OrganizationMethod,
    create_folders: bool,
    json: bool,
) -> Result<()> {
    require_directory(directory);

    let plan = organize::organize(directory, method, create_folders)
        .with_context(|| format!("Failed to organize {}", directory.display()))?;

    if plan.total_files() == 0 && !json {
        println!("No image files found in {}", directory.display());
        return Ok(());
    }

    if json {
        print_json(&plan)
    } else {
        println!("{}", report::render_plan(&plan));
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config, cli.verbose);
    tracing::debug!("Loaded configuration: {:?}", config);

    match cli.command {
        Command::Analyze {
            image,
            style,
            detailed,
            json,
        } => run_analyze(
            &image,
            style.unwrap_or(config.naming.style),
            detailed,
            json,
        ),
        Command::Batch {
            directory,
            recursive,
            rename,
            prefix,
            style,
            json,
        } => {
            let options = BatchOptions {
                recursive: recursive || config.scan.recursive,
                rename,
                prefix: prefix.unwrap_or(config.naming.prefix),
                style: style.unwrap_or(config.naming.style),
            };
            run_batch(&directory, options, json)
        }
        Command::Metadata { image, no_colors } => run_metadata(&image, no_colors),
        Command::Organize {
            directory,
            method,
            create_folders,
            json,
        } => run_organize(
            &directory,
            method.unwrap_or(config.organize.method),
            create_folders,
            json,
        ),
    }
}
