//! Replays saved Yahoo chart responses from disk.
//!
//! Each symbol is read from `<dir>/<symbol>.json`, a body exactly as the
//! chart endpoint returns it. Lets the export run without network access.

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::yahoo::parse_chart_json;
use super::{PriceHistory, PriceProvider};
use crate::error::{PriceError, Result};
use crate::series::DateRange;

pub struct ReplayProvider {
    dir: PathBuf,
}

impl ReplayProvider {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(PriceError::Config(format!(
                "chart directory does not exist: {}",
                dir.display()
            ))
            .into());
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.json", symbol))
    }
}

impl PriceProvider for ReplayProvider {
    fn name(&self) -> &str {
        "saved charts"
    }

    fn fetch_history(&self, symbol: &str, _range: DateRange) -> Result<PriceHistory> {
        let path = self.path_for(symbol);
        debug!("Reading saved chart {:?}", path);
        let body = fs::read_to_string(&path)
            .map_err(|e| PriceError::Provider(format!("cannot read {}: {}", path.display(), e)))?;
        parse_chart_json(symbol, &body).with_context(|| format!("Invalid chart file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_replay_reads_symbol_file() {
        let dir = TempDir::new().unwrap();
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"^GSPC"},"timestamp":[1577975400],
            "indicators":{"quote":[{"close":[3257.85]}],"adjclose":[{"adjclose":[3257.85]}]}}],"error":null}}"#;
        fs::write(dir.path().join("^GSPC.json"), body).unwrap();

        let provider = ReplayProvider::new(dir.path()).unwrap();
        let history = provider.fetch_history("^GSPC", range()).unwrap();
        assert_eq!(history.dates.len(), 1);
        assert_eq!(history.symbol, "^GSPC");
    }

    #[test]
    fn test_replay_missing_file_is_provider_error() {
        let dir = TempDir::new().unwrap();
        let provider = ReplayProvider::new(dir.path()).unwrap();
        let err = provider.fetch_history("^GSPC", range()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PriceError>(),
            Some(PriceError::Provider(_))
        ));
    }

    #[test]
    fn test_replay_requires_existing_directory() {
        let dir = TempDir::new().unwrap();
        assert!(ReplayProvider::new(dir.path().join("missing")).is_err());
    }
}
