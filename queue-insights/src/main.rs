use analytics::Orchestrator;
use anyhow::Context;
use args::Args;
use clap::Parser;
use render::{Options, View};

mod args;
mod logger;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init(&args.log);

    let config = args.load_config()?;
    let credentials = args.credentials(&config.zoom)?;
    let window = args.window(&config, args::today())?;

    log::info!("Fetching call queue analytics for {window}");

    let orchestrator = Orchestrator::from_config(&config)?;

    let report = orchestrator
        .query(&credentials, &window)
        .await
        .context("Failed to fetch call queue analytics")?;

    let options = Options {
        search: &args.search,
        top: args.top,
        sample: args.sample,
    };

    let view = View::new(&report, &window, &options);

    if let Some(reason) = view.no_data() {
        log::warn!("{reason}");
    }

    if args.json {
        println!("{}", view.to_json()?);
    } else {
        print!("{view}");
    }

    Ok(())
}
