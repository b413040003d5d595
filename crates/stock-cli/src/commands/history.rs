//! 과거 가격 데이터 조회.

use anyhow::{bail, Result};
use tracing::info;

use stock_core::{DateRange, Ticker};
use stock_data::HistoryRequest;

use super::CommandContext;
use crate::cli::HistoryArgs;
use crate::output::render;
use crate::progress::with_spinner;

pub async fn run(args: &HistoryArgs, ctx: &CommandContext) -> Result<String> {
    let ticker = Ticker::parse(&args.symbol)?;
    let range = DateRange::parse(args.start.as_deref(), args.end.as_deref())?;
    let provider = ctx.provider(args.provider.as_deref())?;

    let request = HistoryRequest::new(ticker)
        .with_interval(args.interval)
        .with_range(range);

    let candles = with_spinner(
        format!(
            "Fetching {} {} history from {}...",
            request.ticker,
            request.interval,
            provider.name()
        ),
        provider.history(&request),
    )
    .await?;

    if candles.is_empty() {
        bail!("No data returned");
    }

    info!(
        symbol = %request.ticker,
        interval = %request.interval,
        count = candles.len(),
        "History fetched"
    );
    render(&candles, ctx.format)
}
