use std::{fmt::Write, path::Path};

use indoc::formatdoc;
use serde::Deserialize;
use toml::Value;

use crate::{Config, MAX_PAGE_SIZE, dynamic_string, error::Error};

pub(crate) fn load<P: AsRef<Path>>(path: P) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path.as_ref())?;
    from_str(&content)
}

pub(crate) fn from_str(content: &str) -> crate::Result<Config> {
    let mut raw_config: Value = toml::from_str(content)?;

    expand_dynamic_strings(&mut Vec::new(), &mut raw_config)?;

    let config = Config::deserialize(raw_config)?;

    for warning in validate(&config)? {
        log::warn!("{warning}");
    }

    Ok(config)
}

/// Rejects settings the client cannot work with and returns warnings for the
/// ones it silently adjusts.
pub(crate) fn validate(config: &Config) -> crate::Result<Vec<String>> {
    let mut warnings = Vec::new();

    if config.fetch.page_size == 0 {
        return Err(Error::Invalid("fetch.page_size must be at least 1".to_string()));
    }

    if config.fetch.page_size > MAX_PAGE_SIZE {
        warnings.push(format!(
            "fetch.page_size = {} exceeds the provider maximum, {MAX_PAGE_SIZE} will be requested instead",
            config.fetch.page_size
        ));
    }

    if config.fetch.max_pages == Some(0) {
        return Err(Error::Invalid(formatdoc! {r#"
            fetch.max_pages must be at least 1. Remove the setting to fetch every page:

              [fetch]
              # max_pages = 1000
        "#}));
    }

    if config.cache.max_entries == 0 {
        return Err(Error::Invalid("cache.max_entries must be at least 1".to_string()));
    }

    if config.cache.token_ttl.is_zero() {
        warnings.push("cache.token_ttl is zero, every query will request a new access token".to_string());
    }

    Ok(warnings)
}

fn expand_dynamic_strings<'a>(path: &mut Vec<Result<&'a str, usize>>, value: &'a mut Value) -> crate::Result<()> {
    match value {
        Value::String(s) => match dynamic_string::expand(s) {
            Ok(out) => *s = out,
            Err(reason) => {
                let mut p = String::new();

                for segment in path.iter() {
                    match segment {
                        Ok(s) => {
                            p.push_str(s);
                            p.push('.');
                        }
                        Err(i) => {
                            let _ = write!(p, "[{i}]");
                        }
                    }
                }

                if p.ends_with('.') {
                    p.pop();
                }

                return Err(Error::EnvVarSubstitution { path: p, reason });
            }
        },
        Value::Array(values) => {
            for (i, value) in values.iter_mut().enumerate() {
                path.push(Err(i));
                expand_dynamic_strings(path, value)?;
                path.pop();
            }
        }
        Value::Table(map) => {
            for (key, value) in map {
                path.push(Ok(key.as_str()));
                expand_dynamic_strings(path, value)?;
                path.pop();
            }
        }
        Value::Integer(_) | Value::Float(_) | Value::Boolean(_) | Value::Datetime(_) => (),
    }

    Ok(())
}
