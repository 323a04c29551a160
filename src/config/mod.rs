use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    calendar::MonthEndPolicy,
    currency::CurrencyCode,
    errors::{RentalError, Result},
    late_fee::LateFeePolicy,
    schedule::ScheduleGenerator,
    utils::paths::{config_file_in, ensure_dir, resolve_base, write_atomic},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default)]
    pub month_end: MonthEndPolicy,
    #[serde(default)]
    pub late_fee: LateFeePolicy,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.currency.as_str().len() != 3
            || !self.currency.as_str().chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(RentalError::Config(format!(
                "currency `{}` is not an ISO 4217 code",
                self.currency.as_str()
            )));
        }
        self.late_fee.validate()
    }

    /// Generator using the configured month-end policy and the currency's minor units.
    pub fn schedule_generator(&self) -> ScheduleGenerator {
        ScheduleGenerator::new(self.month_end).with_precision(self.currency.minor_units())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::from_base(resolve_base(None))
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    /// Loads the saved configuration, or defaults when nothing has been saved yet.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)
            .map_err(|err| RentalError::Config(format!("{}: {}", self.path.display(), err)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
