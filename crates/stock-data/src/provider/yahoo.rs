//! Yahoo Finance 제공자.
//!
//! 비공식 공개 API를 직접 호출합니다:
//! - 시세/과거 데이터: `/v8/finance/chart/{symbol}`
//! - 뉴스: `/v1/finance/search?q={symbol}`
//!
//! # 지원 간격
//!
//! - **분봉/시간봉**: 1m, 5m, 15m, 30m, 1h (Yahoo 측 조회 기간 제한 있음)
//! - **일봉 이상**: 1d, 1wk, 1mo
//!
//! # 심볼 형식
//!
//! - 한국 주식: "005930.KS" (코스피) 또는 "124560.KQ" (코스닥)
//! - 미국 주식: "AAPL", "GOOGL"
//! - 지수/환율: "^GSPC", "EURUSD=X"

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use stock_core::{
    decimal_from_f64, select_recent_news, Candle, Interval, NewsArticle, Quote, Ticker,
    YahooConfig,
};

use super::{HistoryRequest, MarketDataProvider, NewsRequest, DEFAULT_LOOKBACK_DAYS};
use crate::error::{DataError, Result};
use crate::http::read_json;

/// 기간 필터가 있을 때 search API에 요청할 최소 기사 수.
const FILTERED_NEWS_FETCH: usize = 50;

/// Yahoo Finance 시장 데이터 제공자.
pub struct YahooFinanceProvider {
    client: Client,
    base_url: String,
}

impl YahooFinanceProvider {
    /// 제공자 이름.
    pub const NAME: &'static str = "yfinance";

    /// 설정으로 제공자를 생성합니다.
    pub fn new(client: Client, config: &YahooConfig) -> Self {
        Self::with_base_url(client, &config.base_url)
    }

    /// 기본 URL을 지정하여 제공자를 생성합니다.
    pub fn with_base_url(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 캔들 간격을 Yahoo Finance 간격 문자열로 변환.
    pub fn interval_param(interval: Interval) -> &'static str {
        match interval {
            Interval::M1 => "1m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "60m",
            Interval::D1 => "1d",
            Interval::W1 => "1wk",
            Interval::MN1 => "1mo",
        }
    }

    async fn fetch_chart(&self, ticker: &Ticker, query: &[(&str, String)]) -> Result<ChartResult> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);
        debug!("Fetching from Yahoo Finance: {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        let context = format!("Yahoo chart {}", ticker);
        let chart: ChartResponse = read_json(response, &context).await?;

        if let Some(error) = chart.chart.error {
            return Err(chart_error(&context, error));
        }

        chart
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| DataError::NotFound(format!("{} - empty chart result", context)))
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["yahoo"]
    }

    async fn quote(&self, ticker: &Ticker) -> Result<Quote> {
        info!("Yahoo Finance: quote for {}", ticker);

        let result = self
            .fetch_chart(
                ticker,
                &[("range", "1d".to_string()), ("interval", "1d".to_string())],
            )
            .await?;

        quote_from_chart(ticker, result)
    }

    async fn history(&self, request: &HistoryRequest) -> Result<Vec<Candle>> {
        let (start, end) = request
            .range
            .resolve(Utc::now().date_naive(), DEFAULT_LOOKBACK_DAYS);
        let interval = Self::interval_param(request.interval);

        info!(
            "Yahoo Finance: history for {} (interval: {}, {} ~ {})",
            request.ticker, interval, start, end
        );

        let result = self
            .fetch_chart(
                &request.ticker,
                &[
                    ("period1", day_start_ts(start).to_string()),
                    // 종료일 포함
                    ("period2", day_start_ts(end + Duration::days(1)).to_string()),
                    ("interval", interval.to_string()),
                    ("events", "history".to_string()),
                    ("includeAdjustedClose", "true".to_string()),
                ],
            )
            .await?;

        let candles = candles_from_chart(result, request.interval);
        if candles.is_empty() {
            warn!("Yahoo Finance: {} 데이터 없음", request.ticker);
        } else {
            debug!("Yahoo Finance: {} 캔들 {} 개 수신", request.ticker, candles.len());
        }

        Ok(candles)
    }

    async fn news(&self, request: &NewsRequest) -> Result<Vec<NewsArticle>> {
        // 기간 필터는 클라이언트에서 적용하므로 여유 있게 요청
        let count = if request.range.is_unbounded() {
            request.limit
        } else {
            request.limit.max(FILTERED_NEWS_FETCH)
        };

        info!("Yahoo Finance: news for {} (count: {})", request.ticker, count);

        let url = format!("{}/v1/finance/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", request.ticker.to_string()),
                ("quotesCount", "0".to_string()),
                ("newsCount", count.to_string()),
            ])
            .send()
            .await?;

        let context = format!("Yahoo search {}", request.ticker);
        let search: SearchResponse = read_json(response, &context).await?;

        let articles = search
            .news
            .into_iter()
            .filter_map(SearchNews::into_article)
            .collect();

        Ok(select_recent_news(articles, &request.range, request.limit))
    }
}

/// 해당 날짜 00:00 UTC의 UNIX 타임스탬프.
fn day_start_ts(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::default()).and_utc().timestamp()
}

fn chart_error(context: &str, error: YahooError) -> DataError {
    let message = format!("{} - {}", context, error.description);
    if error.code.eq_ignore_ascii_case("Not Found") {
        DataError::NotFound(message)
    } else {
        DataError::Api {
            status: 200,
            message: format!("{} ({})", message, error.code),
        }
    }
}

fn quote_from_chart(ticker: &Ticker, result: ChartResult) -> Result<Quote> {
    let meta = result.meta;
    let price = meta
        .regular_market_price
        .and_then(decimal_from_f64)
        .ok_or_else(|| {
            DataError::InvalidData(format!("Yahoo chart {} - missing regularMarketPrice", ticker))
        })?;

    // 당일 시가는 meta에 없으므로 첫 캔들에서 가져옴
    let open = result
        .indicators
        .quote
        .first()
        .and_then(|q| q.open.as_ref())
        .and_then(|opens| opens.iter().flatten().next().copied())
        .and_then(decimal_from_f64);

    let mut quote = Quote::new(meta.symbol.unwrap_or_else(|| ticker.to_string()), price);
    quote.name = meta.long_name.or(meta.short_name);
    quote.open = open;
    quote.day_high = meta.regular_market_day_high.and_then(decimal_from_f64);
    quote.day_low = meta.regular_market_day_low.and_then(decimal_from_f64);
    quote.volume = meta.regular_market_volume.and_then(decimal_from_f64);
    quote.year_high = meta.fifty_two_week_high.and_then(decimal_from_f64);
    quote.year_low = meta.fifty_two_week_low.and_then(decimal_from_f64);
    quote.currency = meta.currency;
    quote.exchange = meta.full_exchange_name.or(meta.exchange_name);
    quote.timestamp = meta
        .regular_market_time
        .and_then(|ts| DateTime::from_timestamp(ts, 0));

    let previous_close = meta
        .previous_close
        .or(meta.chart_previous_close)
        .and_then(decimal_from_f64);

    Ok(quote.with_previous_close(previous_close))
}

fn candles_from_chart(result: ChartResult, interval: Interval) -> Vec<Candle> {
    let timestamps = result.timestamp.unwrap_or_default();
    let gmtoffset = result.meta.gmtoffset.unwrap_or(0);

    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Vec::new();
    };

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let adj_closes = result
        .indicators
        .adj_close
        .and_then(|ac| ac.into_iter().next())
        .and_then(|ac| ac.adj_close)
        .unwrap_or_default();

    let value = |series: &[Option<f64>], i: usize| series.get(i).copied().flatten();

    let mut candles = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        // 가격 필드가 모두 있는 경우만 추가 (휴장/미체결 구간은 null)
        let (Some(o), Some(h), Some(l), Some(c)) = (
            value(&opens, i).and_then(decimal_from_f64),
            value(&highs, i).and_then(decimal_from_f64),
            value(&lows, i).and_then(decimal_from_f64),
            value(&closes, i).and_then(decimal_from_f64),
        ) else {
            continue;
        };

        let Some(date) = candle_date(ts, gmtoffset, interval) else {
            continue;
        };
        let volume = value(&volumes, i)
            .and_then(decimal_from_f64)
            .unwrap_or_default();
        let adj_close = value(&adj_closes, i).and_then(decimal_from_f64);

        candles.push(Candle::new(date, o, h, l, c, volume).with_adj_close(adj_close));
    }

    // 시간순 정렬 (오래된 것부터), 장중 마지막 봉이 중복되는 경우 제거
    candles.sort_by_key(|c| c.date);
    candles.dedup_by_key(|c| c.date);
    candles
}

/// 캔들 시각 변환.
///
/// 일봉 이상은 거래소 현지 날짜의 00:00 UTC로 정규화합니다.
fn candle_date(ts: i64, gmtoffset: i64, interval: Interval) -> Option<DateTime<Utc>> {
    if interval.is_intraday() {
        return DateTime::from_timestamp(ts, 0);
    }
    let local = DateTime::from_timestamp(ts + gmtoffset, 0)?;
    Some(local.date_naive().and_time(chrono::NaiveTime::default()).and_utc())
}

// ==================== 응답 구조 ====================

/// Yahoo Finance API v8 응답 구조
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: Option<String>,
    currency: Option<String>,
    exchange_name: Option<String>,
    full_exchange_name: Option<String>,
    long_name: Option<String>,
    short_name: Option<String>,
    regular_market_price: Option<f64>,
    regular_market_day_high: Option<f64>,
    regular_market_day_low: Option<f64>,
    regular_market_volume: Option<f64>,
    regular_market_time: Option<i64>,
    previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
    fifty_two_week_high: Option<f64>,
    fifty_two_week_low: Option<f64>,
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
    #[serde(rename = "adjclose")]
    adj_close: Option<Vec<ChartAdjClose>>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct ChartAdjClose {
    #[serde(rename = "adjclose")]
    adj_close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<SearchNews>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNews {
    uuid: Option<String>,
    title: String,
    publisher: Option<String>,
    link: String,
    provider_publish_time: i64,
    #[serde(default)]
    related_tickers: Vec<String>,
}

impl SearchNews {
    fn into_article(self) -> Option<NewsArticle> {
        Some(NewsArticle {
            date: DateTime::from_timestamp(self.provider_publish_time, 0)?,
            title: self.title,
            url: self.link,
            source: self.publisher,
            symbols: self.related_tickers,
            summary: None,
            id: self.uuid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_interval_param() {
        assert_eq!(YahooFinanceProvider::interval_param(Interval::M1), "1m");
        assert_eq!(YahooFinanceProvider::interval_param(Interval::H1), "60m");
        assert_eq!(YahooFinanceProvider::interval_param(Interval::D1), "1d");
        assert_eq!(YahooFinanceProvider::interval_param(Interval::W1), "1wk");
        assert_eq!(YahooFinanceProvider::interval_param(Interval::MN1), "1mo");
    }

    #[test]
    fn test_daily_candle_uses_exchange_local_date() {
        // 2024-01-02 09:30 KST = 2024-01-02 00:30 UTC
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 0, 30, 0).unwrap().timestamp();
        let date = candle_date(ts, 9 * 3600, Interval::D1).unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());

        // 2024-01-02 19:00 EST = 2024-01-03 00:00 UTC
        let ts = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap().timestamp();
        let date = candle_date(ts, -5 * 3600, Interval::D1).unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_intraday_candle_keeps_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 14, 35, 0).unwrap().timestamp();
        let date = candle_date(ts, -5 * 3600, Interval::M5).unwrap();
        assert_eq!(date.timestamp(), ts);
    }

    #[test]
    fn test_chart_error_mapping() {
        let not_found = YahooError {
            code: "Not Found".to_string(),
            description: "No data found, symbol may be delisted".to_string(),
        };
        assert!(matches!(chart_error("ctx", not_found), DataError::NotFound(_)));

        let bad_request = YahooError {
            code: "Bad Request".to_string(),
            description: "Invalid input".to_string(),
        };
        assert!(matches!(
            chart_error("ctx", bad_request),
            DataError::Api { .. }
        ));
    }

    #[test]
    fn test_day_start_ts() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(day_start_ts(date), 1704153600);
    }
}
