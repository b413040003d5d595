//! 명령 디스패치 통합 테스트.
//!
//! 호출 기록을 남기는 모의 제공자를 레지스트리에 등록하고,
//! 파싱된 명령이 어떤 제공자 함수로 이어지는지 확인합니다.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use clap::Parser;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use stock_cli::{error_json, execute, Cli, CommandContext};
use stock_core::{Candle, Interval, NewsArticle, Quote, Ticker};
use stock_data::{
    DataError, HistoryRequest, MarketDataProvider, NewsRequest, ProviderRegistry, Result,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Quote(String),
    History(HistoryRequest),
    News(NewsRequest),
}

struct MockProvider {
    name: &'static str,
    calls: Arc<Mutex<Vec<Call>>>,
    candles: usize,
    empty: bool,
}

impl MockProvider {
    fn new(name: &'static str, calls: Arc<Mutex<Vec<Call>>>) -> Self {
        Self {
            name,
            calls,
            candles: 60,
            empty: false,
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn quote(&self, ticker: &Ticker) -> Result<Quote> {
        self.record(Call::Quote(ticker.to_string()));
        if ticker.as_str() == "INVALID123" {
            return Err(DataError::NotFound("No data found for symbol INVALID123".to_string()));
        }
        Ok(Quote::new(ticker.as_str(), dec!(185.5)).with_previous_close(Some(dec!(180))))
    }

    async fn history(&self, request: &HistoryRequest) -> Result<Vec<Candle>> {
        self.record(Call::History(request.clone()));
        if self.empty {
            return Ok(Vec::new());
        }
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Ok((0..self.candles)
            .map(|i| {
                let close = Decimal::from(100 + (i % 7) * 2 + i / 3);
                Candle::new(
                    start + Duration::days(i as i64),
                    close - dec!(0.5),
                    close + dec!(1),
                    close - dec!(1),
                    close,
                    dec!(50000),
                )
            })
            .collect())
    }

    async fn news(&self, request: &NewsRequest) -> Result<Vec<NewsArticle>> {
        self.record(Call::News(request.clone()));
        if self.empty {
            return Ok(Vec::new());
        }
        Ok(vec![NewsArticle {
            date: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            title: "Apple announces new product".to_string(),
            url: "https://example.com/news/1".to_string(),
            source: Some("Reuters".to_string()),
            symbols: vec!["AAPL".to_string()],
            summary: None,
            id: Some("n1".to_string()),
        }])
    }
}

struct Harness {
    ctx: CommandContext,
    calls: Arc<Mutex<Vec<Call>>>,
}

fn harness_with(configure: impl FnOnce(&mut MockProvider), args: &[&str]) -> (Harness, Cli) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut primary = MockProvider::new("yfinance", calls.clone());
    configure(&mut primary);

    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(primary));
    registry.register(Arc::new(MockProvider::new("fmp", calls.clone())));

    let mut argv = vec!["stock-tool"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();

    let ctx = CommandContext::new(registry, cli.format)
        .with_today(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    (Harness { ctx, calls }, cli)
}

fn harness(args: &[&str]) -> (Harness, Cli) {
    harness_with(|_| {}, args)
}

fn calls(h: &Harness) -> Vec<Call> {
    h.calls.lock().unwrap().clone()
}

#[tokio::test]
async fn quote_calls_provider_once_per_ticker() {
    let (h, cli) = harness(&["quote", "aapl,MSFT"]);

    let output = execute(&cli.command, &h.ctx).await.unwrap();
    let json: Value = serde_json::from_str(&output).unwrap();

    assert_eq!(
        calls(&h),
        vec![Call::Quote("AAPL".to_string()), Call::Quote("MSFT".to_string())]
    );
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["symbol"], "AAPL");
    assert_eq!(json[0]["price"].as_f64(), Some(185.5));
    assert_eq!(json[0]["change"].as_f64(), Some(5.5));
}

#[tokio::test]
async fn history_passes_interval_and_range() {
    let (h, cli) = harness(&[
        "history", "AAPL", "-s", "2024-01-01", "-e", "2024-03-31", "-i", "1wk",
    ]);

    execute(&cli.command, &h.ctx).await.unwrap();

    let recorded = calls(&h);
    let Call::History(request) = &recorded[0] else {
        panic!("expected history call, got {:?}", recorded);
    };
    assert_eq!(request.ticker.as_str(), "AAPL");
    assert_eq!(request.interval, Interval::W1);
    assert_eq!(request.range.start, NaiveDate::from_ymd_opt(2024, 1, 1));
    assert_eq!(request.range.end, NaiveDate::from_ymd_opt(2024, 3, 31));
}

#[tokio::test]
async fn history_rejects_start_after_end_without_calling_provider() {
    let (h, cli) = harness(&["history", "AAPL", "-s", "2024-05-01", "-e", "2024-01-01"]);

    assert!(execute(&cli.command, &h.ctx).await.is_err());
    assert!(calls(&h).is_empty());
}

#[tokio::test]
async fn news_uses_limit_and_selected_provider() {
    let (h, cli) = harness(&["news", "AAPL", "-l", "5", "-p", "fmp"]);

    let output = execute(&cli.command, &h.ctx).await.unwrap();
    let json: Value = serde_json::from_str(&output).unwrap();

    let recorded = calls(&h);
    let Call::News(request) = &recorded[0] else {
        panic!("expected news call, got {:?}", recorded);
    };
    assert_eq!(request.limit, 5);
    assert!(request.range.is_unbounded());
    assert_eq!(json[0]["title"], "Apple announces new product");
}

#[tokio::test]
async fn technical_fetches_daily_history_from_lookback_start() {
    let (h, cli) = harness(&["technical", "AAPL", "-i", "rsi,macd,sma"]);

    let output = execute(&cli.command, &h.ctx).await.unwrap();
    let json: Value = serde_json::from_str(&output).unwrap();

    let recorded = calls(&h);
    let Call::History(request) = &recorded[0] else {
        panic!("expected history call, got {:?}", recorded);
    };
    assert_eq!(request.interval, Interval::D1);
    // 2024-06-30 - 365일
    assert_eq!(request.range.start, NaiveDate::from_ymd_opt(2023, 7, 1));
    assert_eq!(request.range.end, None);

    assert_eq!(json["symbol"], "AAPL");
    let indicators = json["indicators"].as_object().unwrap();
    let names: Vec<&String> = indicators.keys().collect();
    assert_eq!(names, vec!["rsi", "macd", "sma"]);
    assert_eq!(json["indicators"]["rsi"]["period"], 14);
    assert!(json["indicators"]["macd"]["latest_macd"].is_number());
    assert_eq!(
        json["indicators"]["sma"]["recent_data"].as_array().unwrap().len(),
        10
    );
}

#[tokio::test]
async fn technical_reports_unsupported_and_failing_indicators() {
    let (h, cli) = harness_with(
        |p| p.candles = 20,
        &["technical", "AAPL", "-i", "macd,vwap,sma", "-n", "5"],
    );

    let output = execute(&cli.command, &h.ctx).await.unwrap();
    let json: Value = serde_json::from_str(&output).unwrap();

    assert!(json["indicators"]["macd"]["error"].is_string());
    assert_eq!(
        json["indicators"]["vwap"]["error"],
        "Unsupported indicator: vwap"
    );
    assert!(json["indicators"]["sma"]["latest"].is_number());
    assert_eq!(json["indicators"]["sma"]["period"], 5);
}

#[tokio::test]
async fn technical_table_prints_summary_rows() {
    let (h, cli) = harness(&["-f", "table", "technical", "AAPL", "-i", "rsi,stoch"]);

    let output = execute(&cli.command, &h.ctx).await.unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert!(lines[0].starts_with("indicator | values"));
    assert!(lines[1].contains("-+-"));
    assert!(lines[2].starts_with("rsi "));
    assert!(lines[3].starts_with("stoch "));
    assert!(lines[3].contains("k="));
}

#[tokio::test]
async fn empty_results_are_errors() {
    let (h, cli) = harness_with(|p| p.empty = true, &["history", "AAPL"]);
    let err = execute(&cli.command, &h.ctx).await.unwrap_err();
    assert_eq!(err.to_string(), "No data returned");

    let (h, cli) = harness_with(|p| p.empty = true, &["news", "AAPL"]);
    let err = execute(&cli.command, &h.ctx).await.unwrap_err();
    assert_eq!(err.to_string(), "No news found");

    let (h, cli) = harness_with(|p| p.empty = true, &["technical", "AAPL"]);
    let err = execute(&cli.command, &h.ctx).await.unwrap_err();
    assert_eq!(err.to_string(), "No historical data for technical analysis");
}

#[tokio::test]
async fn provider_errors_pass_through_to_error_json() {
    let (h, cli) = harness(&["quote", "INVALID123"]);

    let err = execute(&cli.command, &h.ctx).await.unwrap_err();
    let json: Value = serde_json::from_str(&error_json(&err, cli.command.symbol())).unwrap();

    assert_eq!(json["error"], "Not found: No data found for symbol INVALID123");
    assert_eq!(json["symbol"], "INVALID123");
}

#[tokio::test]
async fn unknown_provider_lists_supported_names() {
    let (h, cli) = harness(&["quote", "AAPL", "-p", "bloomberg"]);

    let err = execute(&cli.command, &h.ctx).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Unknown provider: bloomberg. Supported: yfinance, fmp"
    );
    assert!(calls(&h).is_empty());
}

#[tokio::test]
async fn default_provider_comes_from_context() {
    let (h, cli) = harness(&["quote", "AAPL"]);
    let ctx = h.ctx.with_default_provider("nope");

    let err = execute(&cli.command, &ctx).await.unwrap_err();
    assert!(err.to_string().starts_with("Unknown provider: nope"));
}

#[tokio::test]
async fn quote_table_output() {
    let (h, cli) = harness(&["quote", "AAPL", "--format", "table"]);

    let output = execute(&cli.command, &h.ctx).await.unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("symbol | price"));
    assert!(lines[2].starts_with("AAPL   | 185.5"));
}
