//! Logger initialization for the command line

use jiff::{Zoned, tz::TimeZone};
use logforth::{append::Stderr, filter::EnvFilter, layout::Layout};
use std::{fmt::Write, io::IsTerminal, str::FromStr, sync::Once};

static INIT: Once = Once::new();

/// Stderr layout with UTC timestamps and, on a terminal, colored levels.
#[derive(Debug)]
struct UtcLayout {
    no_color: bool,
}

impl UtcLayout {
    fn new() -> Self {
        Self { no_color: false }
    }

    fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }
}

impl Layout for UtcLayout {
    fn format(
        &self,
        record: &log::Record<'_>,
        _diagnostics: &[Box<dyn logforth::diagnostic::Diagnostic>],
    ) -> anyhow::Result<Vec<u8>> {
        let mut output = String::new();

        let now = Zoned::now().with_time_zone(TimeZone::UTC);
        write!(output, "{} ", now.strftime("%Y-%m-%dT%H:%M:%S%.6fZ"))?;

        let level = record.level();

        if self.no_color {
            write!(output, "{level:>5}  ")?;
        } else {
            let color = match level {
                log::Level::Error => 31,
                log::Level::Warn => 33,
                log::Level::Info => 32,
                log::Level::Debug => 34,
                log::Level::Trace => 35,
            };

            write!(output, "\x1b[{color}m{level:>5}\x1b[0m  ")?;
        }

        write!(output, "{}", record.args())?;

        Ok(output.into_bytes())
    }
}

/// Installs the stderr logger once. `log_filter` is a filter such as `info`
/// or `warn,analytics=debug`; an invalid filter falls back to `info`.
pub fn init(log_filter: &str) {
    let log_filter = log_filter.to_owned();
    INIT.call_once(move || apply_logger(&log_filter));
}

fn apply_logger(log_filter: &str) {
    let filter = match EnvFilter::from_str(log_filter) {
        Ok(filter) => filter,
        Err(_) => {
            eprintln!("Invalid log filter `{log_filter}`, using `info`");
            EnvFilter::from_str("info").expect("default filter should be valid")
        }
    };

    let layout = if std::io::stderr().is_terminal() {
        UtcLayout::new()
    } else {
        UtcLayout::new().no_color()
    };

    logforth::builder()
        .dispatch(move |d| d.filter(filter).append(Stderr::default().with_layout(layout)))
        .apply();
}
