//! dexsheet - species pages to print-ready layout

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use url::Url;

use dexsheet::render::{JsonRenderer, MarkdownRenderer, Renderer};
use dexsheet::{DirImageSource, FsPageSource, PageOutcome, PageRequest, Pipeline};

#[derive(Parser)]
#[command(name = "dexsheet")]
#[command(version, about = "Turn species pages into print-ready layout", long_about = None)]
#[command(after_help = "EXAMPLES:
    dexsheet saved/venusaur.html            Write pages/venusaur.md
    dexsheet --list pages.txt -f json -j 8  Convert a list of pages to JSON
    dexsheet --images img/ saved/*.html     Embed images from a local mirror")]
struct Cli {
    /// Saved species pages (HTML)
    #[arg(value_name = "INPUT", required_unless_present = "list")]
    inputs: Vec<PathBuf>,

    /// File listing one page path per line
    #[arg(long, value_name = "FILE")]
    list: Option<PathBuf>,

    /// Directory for generated files
    #[arg(short, long, value_name = "DIR", default_value = "pages")]
    output_dir: PathBuf,

    /// Site base that page names and image references resolve against
    #[arg(long, default_value = "https://pokemondb.net/pokedex/")]
    base_url: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "markdown")]
    format: OutputFormat,

    /// Number of pages processed in parallel
    #[arg(short, long, default_value = "4")]
    jobs: usize,

    /// Local image mirror; images missing from it are left out
    #[arg(long, value_name = "DIR")]
    images: Option<PathBuf>,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(0) => {
            eprintln!("error: no pages were generated");
            ExitCode::FAILURE
        }
        Ok(count) => {
            if !cli.quiet {
                println!("Generated {count} files in {}", cli.output_dir.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> dexsheet::Result<usize> {
    let base = Url::parse(&cli.base_url)?;
    let requests = collect_requests(cli, &base)?;

    let mut pipeline = Pipeline::species_page()?;
    if let Some(dir) = &cli.images {
        pipeline = pipeline.with_images(DirImageSource::new(dir));
    }

    fs::create_dir_all(&cli.output_dir)?;
    let outcomes = pipeline.process_batch(&FsPageSource::new(), &requests, cli.jobs)?;

    let count = match cli.format {
        OutputFormat::Markdown => write_pages(&MarkdownRenderer::new(), outcomes, cli),
        OutputFormat::Json => write_pages(&JsonRenderer::pretty(), outcomes, cli),
    };
    Ok(count)
}

fn collect_requests(cli: &Cli, base: &Url) -> dexsheet::Result<Vec<PageRequest>> {
    let mut locations: Vec<String> = cli
        .inputs
        .iter()
        .map(|p| p.display().to_string())
        .collect();

    if let Some(list) = &cli.list {
        let listing = fs::read_to_string(list)?;
        locations.extend(
            listing
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    locations
        .into_iter()
        .map(|location| PageRequest::under(location, base))
        .collect()
}

/// Write each successful page; returns how many files were written.
fn write_pages<R: Renderer>(renderer: &R, outcomes: Vec<PageOutcome>, cli: &Cli) -> usize {
    let mut written = 0;
    for outcome in outcomes {
        let blocks = match outcome.result {
            Ok(blocks) => blocks,
            Err(e) => {
                if !cli.quiet {
                    eprintln!("skipped {}: {e}", outcome.location);
                }
                continue;
            }
        };

        let path = cli
            .output_dir
            .join(format!("{}.{}", outcome.name, renderer.extension()));
        match write_page(renderer, &blocks, &path) {
            Ok(()) => {
                log::info!("wrote {} ({} blocks)", path.display(), blocks.len());
                written += 1;
            }
            Err(e) => {
                if !cli.quiet {
                    eprintln!("failed to write {}: {e}", path.display());
                }
            }
        }
    }
    written
}

fn write_page<R: Renderer>(
    renderer: &R,
    blocks: &[dexsheet::LayoutBlock],
    path: &Path,
) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    renderer.render(blocks, &mut writer)?;
    writer.flush()
}
