//! 종목 뉴스 조회.

use anyhow::{bail, ensure, Result};
use tracing::info;

use stock_core::{DateRange, Ticker};
use stock_data::NewsRequest;

use super::CommandContext;
use crate::cli::NewsArgs;
use crate::output::render;
use crate::progress::with_spinner;

pub async fn run(args: &NewsArgs, ctx: &CommandContext) -> Result<String> {
    ensure!(args.limit > 0, "Limit must be greater than 0");

    let ticker = Ticker::parse(&args.symbol)?;
    let range = DateRange::parse(args.start.as_deref(), args.end.as_deref())?;
    let provider = ctx.provider(args.provider.as_deref())?;

    let request = NewsRequest::new(ticker)
        .with_limit(args.limit)
        .with_range(range);

    let articles = with_spinner(
        format!("Fetching news for {} from {}...", request.ticker, provider.name()),
        provider.news(&request),
    )
    .await?;

    if articles.is_empty() {
        bail!("No news found");
    }

    info!(symbol = %request.ticker, count = articles.len(), "News fetched");
    render(&articles, ctx.format)
}
