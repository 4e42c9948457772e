// src/cli.rs
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cities;
use crate::clean;
use crate::config::file::ConfigFile;
use crate::config::options::{AppOptions, PagePolicy};
use crate::core::net::{HttpFetcher, Session};
use crate::error::Result;
use crate::progress::ConsoleProgress;
use crate::report;
use crate::scrape;
use crate::store;

#[derive(Debug, Parser)]
#[command(name = "che_scrape", version, about = "Crawl, clean and report on che168 used-car listings")]
pub struct Cli {
    /// TOML file overriding built-in defaults
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also write debug logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Crawl listing and detail pages into the raw CSV
    Crawl {
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pages per city
        #[arg(long)]
        pages: Option<u32>,
        #[arg(long, value_enum)]
        policy: Option<PagePolicy>,
        /// Comma-separated city names or slugs
        #[arg(long, value_delimiter = ',')]
        cities: Vec<String>,
    },
    /// Reconcile the raw CSV into the cleaned table
    Clean {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write report tables from the cleaned table
    Report {
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// crawl, clean and report in one go
    Run,
    /// List the configured cities
    Cities,
}

/// Defaults, then the config file, then command-line flags.
pub fn resolve_options(cli: &Cli) -> Result<AppOptions> {
    let mut opts = AppOptions::default();
    if let Some(path) = &cli.config {
        ConfigFile::load(path)?.apply(&mut opts);
    }
    if let Some(p) = &cli.log_file {
        opts.log_file = Some(p.clone());
    }

    match &cli.command {
        Command::Crawl { output, pages, policy, cities: wanted } => {
            if let Some(v) = output {
                opts.crawl.output = v.clone();
            }
            if let Some(v) = pages { opts.crawl.pages = *v; }
            if let Some(v) = policy { opts.crawl.policy = *v; }
            if !wanted.is_empty() {
                let all = std::mem::take(&mut opts.crawl.cities);
                opts.crawl.cities = cities::select(all, wanted);
            }
        }
        Command::Clean { input, output } => {
            if let Some(v) = input { opts.clean.input = v.clone(); }
            if let Some(v) = output { opts.clean.output = v.clone(); }
        }
        Command::Report { input, output } => {
            if let Some(v) = input { opts.report.input = v.clone(); }
            if let Some(v) = output { opts.report.out_dir = v.clone(); }
        }
        Command::Run | Command::Cities => {}
    }
    Ok(opts)
}

fn crawl(opts: &AppOptions, progress: &mut ConsoleProgress) -> Result<()> {
    let c = &opts.crawl;
    if c.cities.is_empty() {
        logw!("No cities selected; nothing to crawl");
    }
    let mut fetcher = HttpFetcher::new(c.timeout_secs, c.retries, c.delays.retry)?;
    let mut session = Session::from_cookie_str(&c.cookie);
    let outcome = scrape::crawl(c, &mut fetcher, &mut session, Some(progress))?;
    store::save_raw(&c.output, &outcome.records)?;
    println!("Saved {} records to {}", outcome.records.len(), c.output.display());
    Ok(())
}

pub fn run_with(cli: Cli) -> Result<()> {
    let opts = resolve_options(&cli)?;
    crate::log::init(opts.log_file.as_deref())?;
    let mut progress = ConsoleProgress::default();

    match cli.command {
        Command::Crawl { .. } => crawl(&opts, &mut progress)?,
        Command::Clean { .. } => {
            clean::clean_file(&opts.clean, Some(&mut progress))?;
        }
        Command::Report { .. } => {
            report::report_file(&opts.report, Some(&mut progress))?;
        }
        Command::Run => {
            crawl(&opts, &mut progress)?;
            clean::clean_file(&opts.clean, Some(&mut progress))?;
            report::report_file(&opts.report, Some(&mut progress))?;
        }
        Command::Cities => {
            for c in &opts.crawl.cities {
                println!("{},{},{:?}", c.name, c.slug, c.scheme);
            }
        }
    }
    Ok(())
}

pub fn run() -> Result<()> {
    run_with(Cli::parse())
}
