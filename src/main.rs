use anyhow::{Context, Result};
use barwalk::prelude::*;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "barwalk")]
#[command(about = "A Rust-based rule strategy backtesting engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //run a backtest
    Run {
        //json configuration file; flags below override its values
        #[arg(long)]
        config: Option<PathBuf>,

        //path to csv data file
        #[arg(long)]
        data: Option<PathBuf>,

        //symbol to keep when the csv has a symbol column
        #[arg(long)]
        symbol: Option<String>,

        //first date to include (yyyy-mm-dd)
        #[arg(long)]
        start: Option<NaiveDate>,

        //last date to include (yyyy-mm-dd)
        #[arg(long)]
        end: Option<NaiveDate>,

        //initial capital
        #[arg(long)]
        capital: Option<f64>,

        //strategy (MA_CROSSOVER, RSI_OVERSOLD, MACD_CROSSOVER, BOLLINGER_BANDS)
        #[arg(long)]
        strategy: Option<String>,

        //parameter override, repeatable (eg --param short_ma=10)
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, f64)>,

        //output path for trade ledger csv
        #[arg(long)]
        output_trades_csv: Option<PathBuf>,

        //output path for equity curve csv
        #[arg(long)]
        output_equity_csv: Option<PathBuf>,

        //output path for metrics json
        #[arg(long)]
        output_metrics_json: Option<PathBuf>,

        //output path for indicator columns csv
        #[arg(long)]
        output_indicators_csv: Option<PathBuf>,
    },

    //run every strategy with default parameters and compare them
    Compare {
        //path to csv data file
        #[arg(long)]
        data: PathBuf,

        #[arg(long)]
        symbol: Option<String>,

        #[arg(long)]
        start: Option<NaiveDate>,

        #[arg(long)]
        end: Option<NaiveDate>,

        #[arg(long, default_value = "100000")]
        capital: f64,
    },

    //write a default configuration file
    InitConfig {
        path: PathBuf,
    },
}

fn parse_param(raw: &str) -> Result<(String, f64), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("parameter '{}' needs a numeric value, got '{}'", key, value))?;
    Ok((key.trim().to_string(), value))
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data,
            symbol,
            start,
            end,
            capital,
            strategy,
            params,
            output_trades_csv,
            output_equity_csv,
            output_metrics_json,
            output_indicators_csv,
        } => {
            let mut configuration = match config {
                Some(path) => BacktestConfiguration::from_json_file(&path)?,
                None => BacktestConfiguration::default(),
            };

            if let Some(data) = data {
                configuration.data_path = data;
            }
            if symbol.is_some() {
                configuration.symbol = symbol;
            }
            if start.is_some() {
                configuration.start_date = start;
            }
            if end.is_some() {
                configuration.end_date = end;
            }
            if let Some(capital) = capital {
                configuration.initial_capital = capital;
            }
            if let Some(strategy) = strategy {
                configuration.strategy = strategy;
            }
            configuration.params.extend(params);
            if output_trades_csv.is_some() {
                configuration.output_trades_csv = output_trades_csv;
            }
            if output_equity_csv.is_some() {
                configuration.output_equity_csv = output_equity_csv;
            }
            if output_metrics_json.is_some() {
                configuration.output_metrics_json = output_metrics_json;
            }

            run(&configuration, output_indicators_csv.as_deref())?;
        }
        Commands::Compare {
            data,
            symbol,
            start,
            end,
            capital,
        } => {
            compare(&data, symbol.as_deref(), start, end, capital)?;
        }
        Commands::InitConfig { path } => {
            BacktestConfiguration::default().to_json_file(&path)?;
            println!("Default configuration written to {:?}", path);
        }
    }

    Ok(())
}

fn load_series(
    path: &Path,
    symbol: Option<&str>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<BarSeries> {
    info!("Loading data from {:?}", path);
    let bars = load_csv(path, symbol).context(format!("Failed to load data from {:?}", path))?;
    let bars = filter_by_date_range(&bars, start, end);

    if bars.is_empty() {
        anyhow::bail!(
            "No data found for {} between {} and {}",
            symbol.unwrap_or("the data file"),
            start.map_or("the beginning".to_string(), |d| d.to_string()),
            end.map_or("the end".to_string(), |d| d.to_string())
        );
    }

    Ok(BarSeries::new(bars)?)
}

fn run(configuration: &BacktestConfiguration, indicators_csv: Option<&Path>) -> Result<()> {
    let config = configuration.to_backtest_config()?;
    let series = load_series(
        &configuration.data_path,
        configuration.symbol.as_deref(),
        configuration.start_date,
        configuration.end_date,
    )?;

    println!(
        "Backtest: {} on {}",
        config.strategy.name(),
        configuration
            .symbol
            .as_deref()
            .map_or_else(|| configuration.data_path.display().to_string(), str::to_string)
    );
    println!(
        "Bars: {} ({} to {})",
        series.len(),
        series.first().timestamp.date_naive(),
        series.last().timestamp.date_naive()
    );
    println!("Initial capital: ${:.2}\n", config.initial_capital);

    let engine = BacktestEngine::new(config, series)?;
    let result = engine.run();

    println!("Performance Metrics");
    println!("===================\n");
    result.summary.pretty_print_table();

    println!("\nTrade List");
    println!("==========\n");
    if result.trades.is_empty() {
        println!("No trades");
    } else {
        trades_table(&result.trades).printstd();
    }

    if let Some(path) = &configuration.output_trades_csv {
        save_trades_csv(&result.trades, path)?;
        println!("\nTrades saved to {:?}", path);
    }
    if let Some(path) = &configuration.output_equity_csv {
        save_equity_csv(&result.equity_curve, path)?;
        println!("Equity curve saved to {:?}", path);
    }
    if let Some(path) = &configuration.output_metrics_json {
        save_metrics_json(&result.summary, path)?;
        println!("Metrics saved to {:?}", path);
    }
    if let Some(path) = indicators_csv {
        save_indicators_csv(engine.bars(), &result.indicators, path)?;
        println!("Indicators saved to {:?}", path);
    }

    Ok(())
}

fn compare(
    data: &Path,
    symbol: Option<&str>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    capital: f64,
) -> Result<()> {
    let series = load_series(data, symbol, start, end)?;
    let configs: Vec<BacktestConfig> = StrategyKind::ALL
        .iter()
        .map(|&kind| BacktestConfig::new(capital, Strategy::default_for(kind)))
        .collect();

    let results = run_batch(&series, &configs)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(first) = results.first() {
        println!(
            "Buy & hold return: {:.2}%\n",
            first.summary.buy_hold_return_pct
        );
    }
    comparison_table(&results).printstd();

    Ok(())
}
