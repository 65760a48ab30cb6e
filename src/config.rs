use crate::domain::order::OrderId;
use crate::error::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    pub order_number: OrderNumberSettings,
    pub log: LogSettings,
}

/// How order numbers are derived from order ids.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OrderNumberSettings {
    pub prefix: String,
    /// Zero-padded width of the numeric part.
    pub width: usize,
}

impl Default for OrderNumberSettings {
    fn default() -> Self {
        Self {
            prefix: "ORD-".to_string(),
            width: 8,
        }
    }
}

impl OrderNumberSettings {
    pub fn format(&self, order_id: OrderId) -> String {
        format!(
            "{}{:0width$}",
            self.prefix,
            order_id.value(),
            width = self.width
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl Settings {
    /// Load settings with precedence:
    /// 1. Default values
    /// 2. `orderflow.toml` in the working directory, if present
    /// 3. Environment variables (`ORDERFLOW__LOG__FILTER=debug`, ...)
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name("orderflow").required(false))
            .add_source(
                Environment::with_prefix("ORDERFLOW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load settings from a single file, on top of the defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
