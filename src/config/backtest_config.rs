use crate::engine::BacktestConfig;
use crate::error::BacktestError;
use crate::strategy::Strategy;
use anyhow::Context;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

//complete run configuration as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfiguration {
    //data; rows are filtered by symbol only when one is set
    pub data_path: PathBuf,
    pub symbol: Option<String>,
    //inclusive calendar bounds
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    //account settings
    pub initial_capital: f64,

    //strategy
    pub strategy: String,
    pub params: IndexMap<String, f64>,

    //optional output paths
    pub output_trades_csv: Option<PathBuf>,
    pub output_equity_csv: Option<PathBuf>,
    pub output_metrics_json: Option<PathBuf>,
}

impl Default for BacktestConfiguration {
    fn default() -> Self {
        BacktestConfiguration {
            data_path: PathBuf::from("data.csv"),
            symbol: None,
            start_date: None,
            end_date: None,
            initial_capital: 100000.0,
            strategy: "MA_CROSSOVER".to_string(),
            params: IndexMap::new(),
            output_trades_csv: None,
            output_equity_csv: None,
            output_metrics_json: None,
        }
    }
}

impl BacktestConfiguration {
    //load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;
        let config: BacktestConfiguration = serde_json::from_str(&contents)
            .context(format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).context(format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    //resolves the strategy name and overrides into an engine configuration
    pub fn to_backtest_config(&self) -> Result<BacktestConfig, BacktestError> {
        let config = BacktestConfig::new(
            self.initial_capital,
            Strategy::from_name(&self.strategy, &self.params)?,
        );
        config.validate()?;
        Ok(config)
    }
}
