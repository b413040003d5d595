//! 실시간 시세 조회.

use anyhow::{bail, Result};
use tracing::info;

use stock_core::Ticker;

use super::CommandContext;
use crate::cli::QuoteArgs;
use crate::output::render;
use crate::progress::with_spinner;

/// 종목마다 순서대로 시세를 조회합니다.
pub async fn run(args: &QuoteArgs, ctx: &CommandContext) -> Result<String> {
    let tickers = Ticker::parse_list(&args.symbols)?;
    let provider = ctx.provider(args.provider.as_deref())?;

    let mut quotes = Vec::with_capacity(tickers.len());
    for ticker in &tickers {
        let quote = with_spinner(
            format!("Fetching quote for {} from {}...", ticker, provider.name()),
            provider.quote(ticker),
        )
        .await?;
        quotes.push(quote);
    }

    if quotes.is_empty() {
        bail!("No data returned");
    }

    info!(count = quotes.len(), provider = provider.name(), "Quotes fetched");
    render(&quotes, ctx.format)
}
