//! Command-line front end for icon-extract
//!
//! Usage:
//!   icon-extract extract [--source <dir>] [--out <dir>] [--esm] [--group <name>...]
//!   icon-extract stats [--dir <dir>] [--small-threshold <bytes>]
//!   icon-extract png [--dir <dir>] [--out <dir>] [--size <px>] [--jobs <n>]

mod driver;
mod png;
mod stats;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use icon_extract::{Dialect, ExtractOptions, SvgOptions};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use driver::ExtractConfig;

#[derive(Parser)]
#[command(name = "icon-extract", version, about = "Extract react-icons bundles into SVG files")]
struct Cli {
    /// Log every skipped icon and per-group detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert every icon group under the package directory
    Extract {
        /// Installed icon package
        #[arg(long, default_value = "node_modules/react-icons")]
        source: Utf8PathBuf,
        /// Output directory, one sub-directory per group
        #[arg(long, default_value = "extracted-icons")]
        out: Utf8PathBuf,
        /// Bundle file inside each group (defaults to index.js, or index.mjs with --esm)
        #[arg(long)]
        bundle: Option<String>,
        /// Read ES module bundles (`export function Name`)
        #[arg(long)]
        esm: bool,
        /// Only convert these groups
        #[arg(long = "group")]
        groups: Vec<String>,
        /// Worker threads (defaults to one per core)
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Report size statistics over extracted icons
    Stats {
        #[arg(long, default_value = "extracted-icons")]
        dir: Utf8PathBuf,
        /// Flag files smaller than this many bytes
        #[arg(long, default_value_t = stats::DEFAULT_SMALL_THRESHOLD)]
        small_threshold: u64,
    },
    /// Rasterize extracted icons to square PNG images
    Png {
        #[arg(long, default_value = "extracted-icons")]
        dir: Utf8PathBuf,
        /// Output directory, mirroring the layout of --dir
        #[arg(long, default_value = "extracted-icons-png")]
        out: Utf8PathBuf,
        /// Image width and height in pixels
        #[arg(long, default_value_t = png::DEFAULT_SIZE)]
        size: u32,
        /// Worker threads (defaults to one per core)
        #[arg(long)]
        jobs: Option<usize>,
    },
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the report.
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Extract {
            source,
            out,
            bundle,
            esm,
            groups,
            jobs,
        } => {
            let dialect = if esm { Dialect::EsModule } else { Dialect::CommonJs };
            let bundle = bundle.unwrap_or_else(|| {
                match dialect {
                    Dialect::CommonJs => "index.js",
                    Dialect::EsModule => "index.mjs",
                }
                .to_string()
            });
            let config = ExtractConfig {
                source,
                out,
                bundle,
                groups,
                extract: ExtractOptions {
                    dialect,
                    ..Default::default()
                },
                svg: SvgOptions::default(),
            };
            handle_extract(&config, jobs)
        }
        Command::Stats {
            dir,
            small_threshold,
        } => {
            let stats = stats::collect(&dir, small_threshold)?;
            println!("{stats}");
            Ok(())
        }
        Command::Png {
            dir,
            out,
            size,
            jobs,
        } => handle_png(&png::PngConfig { dir, out, size }, jobs),
    }
}

/// `RUST_LOG` when set and valid, otherwise `info` (`debug` with `--verbose`)
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level.to_string()))
}

fn thread_pool(jobs: Option<usize>) -> miette::Result<rayon::ThreadPool> {
    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = jobs {
        pool = pool.num_threads(jobs);
    }
    pool.build().into_diagnostic()
}

fn handle_extract(config: &ExtractConfig, jobs: Option<usize>) -> miette::Result<()> {
    let results = thread_pool(jobs)?.install(|| driver::run(config))?;

    let mut total = 0;
    let mut skipped = 0;
    for (group, result) in results {
        match result {
            Ok(summary) => {
                println!(
                    "{:<8} {:>6} icons  {:>4} skipped",
                    summary.group,
                    summary.written,
                    summary.failures.len()
                );
                total += summary.written;
                skipped += summary.failures.len();
            }
            Err(report) => {
                tracing::error!(group, "group failed");
                eprintln!("{report:?}");
            }
        }
    }

    println!("\nExtraction complete: {total} icons written, {skipped} skipped");
    println!("Icons saved to: {}", config.out);
    Ok(())
}

fn handle_png(config: &png::PngConfig, jobs: Option<usize>) -> miette::Result<()> {
    let summary = thread_pool(jobs)?.install(|| png::run(config))?;
    for failure in &summary.failures {
        tracing::debug!("{:?}", failure.error);
    }

    println!("\nConversion complete: {} converted", summary.written.len());
    if !summary.failures.is_empty() {
        println!("Failed conversions: {}", summary.failures.len());
    }
    println!("PNG files saved to: {}", config.out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn rust_log_replaces_default_level() {
        let filter = log_filter(true, Some("warn"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn verbose_sets_default_level() {
        assert_eq!(log_filter(true, None).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(false, Some("")).max_level_hint(), Some(LevelFilter::INFO));
    }
}
