//! Batch document generator.
//!
//! Writes synthetic invoices and contracts into type-named subdirectories.
//!
//! ```bash
//! # 50 single-page invoices and 50 contracts under ./output
//! cargo run --bin docgen-batch -- generate
//!
//! # Up to 10 of each (2–3 pages), keeping the set under 7 MiB
//! cargo run --bin docgen-batch -- small --each 10 --max-bytes 7340032
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use docgen_api::batch::planner::{human_size, plan};
use docgen_api::batch::{render_document_set, type_dir};
use docgen_api::documents::{ContentSource, DocType, FakeContent};

#[derive(Parser)]
#[command(name = "docgen-batch")]
#[command(about = "Generate synthetic invoice and contract PDFs on disk")]
struct Cli {
    /// Seed for deterministic content
    #[arg(long, env = "CONTENT_SEED", global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fixed number of documents of each type
    Generate {
        #[arg(short, long, default_value = "50")]
        count: u32,

        #[arg(short, long, default_value = "1")]
        pages: u32,

        #[arg(short, long, default_value = "output")]
        out: PathBuf,
    },

    /// As many documents as fit a byte budget, 2–3 pages each
    Small {
        /// Upper bound on documents of each type
        #[arg(short, long, default_value = "10")]
        each: u32,

        #[arg(short, long, default_value_t = 7 * 1024 * 1024)]
        max_bytes: u64,

        #[arg(short, long, default_value = "output/small")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut source = FakeContent::from_seed_option(cli.seed);

    match cli.command {
        Commands::Generate { count, pages, out } => {
            anyhow::ensure!(pages >= 1, "--pages must be at least 1");
            for doc_type in DocType::ALL {
                generate_type(doc_type, count, &out, &mut source, |_| pages)?;
            }
            summarize(&out)?;
        }
        Commands::Small {
            each,
            max_bytes,
            out,
        } => {
            let plan = plan(each, max_bytes, &out, &mut source).context("sampling failed")?;
            println!(
                "Targeting {} invoices and {} contracts (<= {})",
                plan.count_each,
                plan.count_each,
                human_size(max_bytes)
            );
            for doc_type in DocType::ALL {
                generate_type(doc_type, plan.count_each, &out, &mut source, |s| {
                    s.int_in(2, 3)
                })?;
            }
            summarize(&out)?;
        }
    }

    Ok(())
}

fn generate_type(
    doc_type: DocType,
    count: u32,
    root: &Path,
    source: &mut FakeContent,
    pages_for: impl FnMut(&mut FakeContent) -> u32,
) -> Result<()> {
    let dir = type_dir(root, doc_type);
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    println!("Generating {doc_type}...");
    let bar = ProgressBar::new(count as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    render_document_set(doc_type, count, &dir, source, pages_for, |_| bar.inc(1))
        .with_context(|| format!("generating {doc_type}"))?;
    bar.finish_and_clear();
    info!("Wrote {count} {doc_type} to {}", dir.display());
    Ok(())
}

fn summarize(root: &Path) -> Result<()> {
    let mut files = 0usize;
    let mut total = 0u64;
    for doc_type in DocType::ALL {
        let dir = type_dir(root, doc_type);
        for entry in fs::read_dir(&dir).with_context(|| format!("reading {}", dir.display()))? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "pdf") {
                files += 1;
                total += fs::metadata(&path)?.len();
            }
        }
    }

    println!("Created {files} files, total size {}", human_size(total));
    for doc_type in DocType::ALL {
        let dir = type_dir(root, doc_type);
        let shown = dir.canonicalize().unwrap_or(dir);
        println!("{doc_type} in: {}", shown.display());
    }
    Ok(())
}
