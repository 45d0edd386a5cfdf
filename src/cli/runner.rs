use chrono::{Local, NaiveDate};
use std::io;
use std::time::Duration;
use tracing::info;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{run_export, ExportRequest};
use crate::pricing::replay::ReplayProvider;
use crate::pricing::yahoo::YahooProvider;
use crate::pricing::PriceProvider;
use crate::series::DateRange;

/// Merge CLI flags over the config. The end date defaults to `today`,
/// which the range excludes.
pub fn to_export_request(cli: &Cli, config: &Config, today: NaiveDate) -> Result<ExportRequest> {
    let start = cli.start.unwrap_or(config.start);
    let end = cli.end.unwrap_or(today);
    let range = DateRange::new(start, end)?;
    let price_field = cli.price_field.unwrap_or(config.price_field);
    let request = ExportRequest::new(config.series.clone(), range, price_field)?;
    Ok(request.with_rolling_returns(cli.rolling_returns.map(|days| days as usize)))
}

/// Run the export for parsed arguments, writing CSV to stdout.
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let request = to_export_request(&cli, &config, Local::now().date_naive())?;

    let provider: Box<dyn PriceProvider> = match &cli.chart_dir {
        Some(dir) => Box::new(ReplayProvider::new(dir)?),
        None => Box::new(YahooProvider::new(Duration::from_secs(config.timeout_secs))?),
    };

    let stdout = io::stdout();
    let rows = run_export(provider.as_ref(), &request, stdout.lock())?;
    info!("Exported {} rows using {:?}", rows, request.price_field);
    Ok(())
}
