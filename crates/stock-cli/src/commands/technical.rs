//! 기술적 분석.
//!
//! 일봉 과거 데이터를 받아 요청된 지표를 계산합니다. 테이블 형식에서는
//! 지표별 요약 행만 출력하고, JSON에는 최근 데이터까지 모두 포함합니다.

use anyhow::{bail, Result};
use chrono::Duration;
use tracing::info;

use stock_analytics::{parse_indicator_list, TechnicalAnalyzer};
use stock_core::{parse_date, DateRange, Interval, Ticker};
use stock_data::HistoryRequest;

use super::CommandContext;
use crate::cli::{OutputFormat, TechnicalArgs};
use crate::output::{format_json, render};
use crate::progress::with_spinner;

pub async fn run(args: &TechnicalArgs, ctx: &CommandContext) -> Result<String> {
    let ticker = Ticker::parse(&args.symbol)?;
    let start = match args.start.as_deref() {
        Some(s) => parse_date(s)?,
        None => ctx.today - Duration::days(ctx.technical.lookback_days),
    };
    let requests = parse_indicator_list(&args.indicators);
    let provider = ctx.provider(args.provider.as_deref())?;

    let request = HistoryRequest::new(ticker)
        .with_interval(Interval::D1)
        .with_range(DateRange::new(Some(start), None)?);

    let candles = with_spinner(
        format!("Fetching {} history from {}...", request.ticker, provider.name()),
        provider.history(&request),
    )
    .await?;

    if candles.is_empty() {
        bail!("No historical data for technical analysis");
    }

    let analyzer =
        TechnicalAnalyzer::new(args.period).with_recent_rows(ctx.technical.recent_rows);
    let report = analyzer.analyze(request.ticker.as_str(), &candles, &requests);

    info!(
        symbol = %request.ticker,
        candles = candles.len(),
        indicators = report.indicators.len(),
        "Technical analysis completed"
    );

    match ctx.format {
        OutputFormat::Json => format_json(&report),
        OutputFormat::Table => render(&report.summary_rows(), OutputFormat::Table),
    }
}
