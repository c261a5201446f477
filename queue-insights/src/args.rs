use std::path::PathBuf;

use analytics::{Credentials, FetchWindow, report::DEFAULT_TOP_N};
use anyhow::{Context, bail};
use clap::Parser;
use config::{Config, ZoomConfig};
use jiff::{ToSpan, Zoned, civil::Date};
use secrecy::{ExposeSecret, SecretString};

/// Average handle time per Zoom Phone call queue.
#[derive(Parser)]
#[command(name = "queue-insights", version, about)]
pub struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "QUEUE_INSIGHTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Zoom account id. Overrides `zoom.account_id` from the configuration.
    #[arg(long, env = "ZOOM_ACCOUNT_ID")]
    pub account_id: Option<String>,

    /// OAuth client id. Overrides `zoom.client_id` from the configuration.
    #[arg(long, env = "ZOOM_CLIENT_ID")]
    pub client_id: Option<String>,

    /// OAuth client secret. Overrides `zoom.client_secret` from the configuration.
    #[arg(long, env = "ZOOM_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// First day of the window, inclusive. Defaults to seven days ago.
    #[arg(long)]
    pub from: Option<Date>,

    /// Last day of the window, inclusive. Defaults to today.
    #[arg(long)]
    pub to: Option<Date>,

    /// Records per page. Defaults to `fetch.page_size`; values above 300 are capped.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Keywords narrowing the queues shown, matched against `name (id)`.
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Number of queues in the chart.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Print the report as JSON instead of tables.
    #[arg(long)]
    pub json: bool,

    /// Also print the first raw record as returned by Zoom.
    #[arg(long)]
    pub sample: bool,

    /// Log filter, e.g. `info` or `warn,analytics=debug`.
    #[arg(long, default_value = "info")]
    pub log: String,
}

impl Args {
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let Some(path) = &self.config else {
            return Ok(Config::default());
        };

        log::debug!("Loading configuration from {}", path.display());

        Config::load(path).with_context(|| format!("Failed to load configuration from {}", path.display()))
    }

    /// Credentials from the command line, falling back to the configuration.
    pub fn credentials(&self, config: &ZoomConfig) -> anyhow::Result<Credentials> {
        let account_id = present(self.account_id.as_deref()).or(present(config.account_id.as_deref()));
        let client_id = present(self.client_id.as_deref()).or(present(config.client_id.as_deref()));
        let client_secret = present(self.client_secret.as_deref())
            .or(present(config.client_secret.as_ref().map(|s| s.expose_secret())));

        match (account_id, client_id, client_secret) {
            (Some(account_id), Some(client_id), Some(client_secret)) => Ok(Credentials::new(
                account_id,
                client_id,
                &SecretString::from(client_secret.to_string()),
            )),
            (account_id, client_id, client_secret) => {
                let missing: Vec<_> = [
                    (account_id.is_none(), "account id (--account-id or ZOOM_ACCOUNT_ID)"),
                    (client_id.is_none(), "client id (--client-id or ZOOM_CLIENT_ID)"),
                    (client_secret.is_none(), "client secret (--client-secret or ZOOM_CLIENT_SECRET)"),
                ]
                .into_iter()
                .filter_map(|(is_missing, name)| is_missing.then_some(name))
                .collect();

                bail!("Missing Zoom credentials: {}", missing.join(", "))
            }
        }
    }

    /// The requested window relative to `today`.
    pub fn window(&self, config: &Config, today: Date) -> anyhow::Result<FetchWindow> {
        let from = match self.from {
            Some(from) => from,
            None => today.checked_sub(7.days())?,
        };
        let to = self.to.unwrap_or(today);

        if from > to {
            bail!("--from {from} is after --to {to}");
        }

        let page_size = self.page_size.unwrap_or(config.fetch.page_size);

        Ok(FetchWindow::new(from, to, page_size))
    }
}

pub fn today() -> Date {
    Zoned::now().date()
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
