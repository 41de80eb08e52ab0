// src/config.rs

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::{path::PathBuf, time::Duration};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.tilastopaja.info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

/// Scrape per-attempt results for every athlete on an event's leaderboards.
#[derive(Parser, Debug)]
#[command(name = "trialscraper")]
#[command(version)]
pub struct Args {
    /// Event code, e.g. 330 for long jump
    #[arg(long)]
    pub event: String,

    /// Sex code: 1 = men, 2 = women
    #[arg(long)]
    pub sex: String,

    #[arg(long, env = "TILASTOPAJA_USERNAME")]
    pub username: String,

    #[arg(long, env = "TILASTOPAJA_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// First leaderboard season to discover athletes from
    #[arg(long)]
    pub leaderboard_start_year: i32,

    /// Last leaderboard season (inclusive)
    #[arg(long)]
    pub leaderboard_end_year: i32,

    /// First season of per-athlete results to collect
    #[arg(long)]
    pub data_start_year: i32,

    /// Last season of per-athlete results (inclusive)
    #[arg(long)]
    pub data_end_year: i32,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory the dataset file is written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Fixed wait after every page load, in milliseconds
    #[arg(long, default_value_t = 3000)]
    pub page_delay_ms: u64,

    /// Query parameter that selects a season on a profile page
    #[arg(long, default_value = "Season")]
    pub season_param: String,
}

/// Everything the HTTP session needs to address the site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub base_url: Url,
    pub event: String,
    pub sex: String,
    pub season_param: String,
    pub page_delay: Duration,
}

/// The two year ranges a run works over, as the site's season strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub leaderboard_years: Vec<String>,
    pub data_years: Vec<String>,
}

impl RunPlan {
    pub fn new(leaderboard: (i32, i32), data: (i32, i32)) -> Result<Self> {
        Ok(Self {
            leaderboard_years: year_range("leaderboard", leaderboard.0, leaderboard.1)?,
            data_years: year_range("data", data.0, data.1)?,
        })
    }
}

fn year_range(label: &str, start: i32, end: i32) -> Result<Vec<String>> {
    if start > end {
        bail!("{} start year {} is after end year {}", label, start, end);
    }
    Ok((start..=end).map(|y| y.to_string()).collect())
}

impl Args {
    pub fn run_plan(&self) -> Result<RunPlan> {
        RunPlan::new(
            (self.leaderboard_start_year, self.leaderboard_end_year),
            (self.data_start_year, self.data_end_year),
        )
    }

    pub fn site_config(&self) -> Result<SiteConfig> {
        let base_url = Url::parse(&self.base_url)
            .with_context(|| format!("parsing base URL {}", self.base_url))?;
        Ok(SiteConfig {
            base_url,
            event: self.event.clone(),
            sex: self.sex.clone(),
            season_param: self.season_param.clone(),
            page_delay: Duration::from_millis(self.page_delay_ms),
        })
    }
}
