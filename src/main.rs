use anyhow::{Context, Result};
use clap::Parser;
use trialscraper::{
    config::Args,
    dataset::{output_path, write_dataset},
    fetch::HttpSession,
    pipeline::run_with_session,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    // ─── 2) configuration ────────────────────────────────────────────
    let args = Args::parse();
    let plan = args.run_plan()?;
    let site = args.site_config()?;
    let base = site.base_url.clone();
    info!(
        event = %args.event,
        sex = %args.sex,
        leaderboard_years = plan.leaderboard_years.len(),
        data_years = plan.data_years.len(),
        "startup"
    );

    // ─── 3) log in and scrape; the session is closed inside the run ──
    let session = HttpSession::login(site, &args.username, &args.password)
        .await
        .context("logging in")?;
    let (dataset, _summary) = run_with_session(session, &base, &args.sex, &plan).await;

    // ─── 4) write output ─────────────────────────────────────────────
    let path = output_path(&args.output_dir, &args.event, &args.sex, args.format);
    match write_dataset(&dataset, &path, args.format)? {
        Some(path) => println!("\nSaved to {}", path.display()),
        None => {
            info!("no data collected");
            println!("No data collected.");
        }
    }

    Ok(())
}
