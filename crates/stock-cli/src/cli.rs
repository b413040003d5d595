//! 명령행 인자 정의.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use stock_analytics::technical::{DEFAULT_INDICATORS, DEFAULT_PERIOD};
use stock_core::{AppConfig, Interval, LogConfig};

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Debug, Parser)]
#[command(name = "stock-tool")]
#[command(about = "주식 시세/과거 데이터/뉴스 조회 및 기술적 분석 도구", long_about = None)]
#[command(version, arg_required_else_help = true)]
#[command(after_help = "\
예시:
  stock-tool quote AAPL
  stock-tool quote AAPL,MSFT -f table
  stock-tool history AAPL --start 2024-01-01 --end 2024-12-31
  stock-tool news AAPL --limit 10
  stock-tool technical AAPL --indicators rsi,macd,sma --period 14")]
pub struct Cli {
    /// 출력 형식
    #[arg(short, long, value_enum, global = true, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// 설정 파일 경로 (기본: ./stock-tool.toml, 없으면 무시)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 로그 상세도 (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// 로그 설정. 설정 파일을 읽지 못했으면 기본값에 `-v`만 반영합니다.
    pub fn log_config(&self, config: Option<&AppConfig>) -> LogConfig {
        config
            .map(|config| LogConfig::from_settings(&config.logging))
            .unwrap_or_default()
            .with_verbosity(self.verbose)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 실시간 시세 조회
    Quote(QuoteArgs),

    /// 과거 가격 데이터 (OHLCV) 조회
    History(HistoryArgs),

    /// 종목 관련 뉴스 조회
    News(NewsArgs),

    /// 기술적 분석 지표 계산
    Technical(TechnicalArgs),
}

impl Command {
    /// 에러 출력에 사용할 종목 인자.
    pub fn symbol(&self) -> &str {
        match self {
            Command::Quote(args) => &args.symbols,
            Command::History(args) => &args.symbol,
            Command::News(args) => &args.symbol,
            Command::Technical(args) => &args.symbol,
        }
    }

    /// 명령 이름.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Quote(_) => "quote",
            Command::History(_) => "history",
            Command::News(_) => "news",
            Command::Technical(_) => "technical",
        }
    }
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// 종목 코드 (쉼표로 여러 개: AAPL,MSFT)
    pub symbols: String,

    /// 데이터 제공자 (yfinance, fmp; 기본: 설정값)
    #[arg(short, long)]
    pub provider: Option<String>,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// 종목 코드
    pub symbol: String,

    /// 시작 날짜 (YYYY-MM-DD)
    #[arg(short, long)]
    pub start: Option<String>,

    /// 종료 날짜 (YYYY-MM-DD)
    #[arg(short, long)]
    pub end: Option<String>,

    /// 캔들 간격 (1m, 5m, 15m, 30m, 1h, 1d, 1wk, 1mo)
    #[arg(short, long, default_value = "1d")]
    pub interval: Interval,

    /// 데이터 제공자
    #[arg(short, long)]
    pub provider: Option<String>,
}

#[derive(Debug, Args)]
pub struct NewsArgs {
    /// 종목 코드
    pub symbol: String,

    /// 최대 뉴스 개수
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,

    /// 시작 날짜 (YYYY-MM-DD)
    #[arg(short, long)]
    pub start: Option<String>,

    /// 종료 날짜 (YYYY-MM-DD)
    #[arg(short, long)]
    pub end: Option<String>,

    /// 데이터 제공자
    #[arg(short, long)]
    pub provider: Option<String>,
}

#[derive(Debug, Args)]
pub struct TechnicalArgs {
    /// 종목 코드
    pub symbol: String,

    /// 지표 목록, 쉼표 구분 (rsi, macd, sma, ema, bbands, adx, stoch)
    #[arg(short, long, default_value = DEFAULT_INDICATORS)]
    pub indicators: String,

    /// 지표 기간
    #[arg(short = 'n', long, default_value_t = DEFAULT_PERIOD)]
    pub period: usize,

    /// 과거 데이터 시작 날짜 (YYYY-MM-DD, 기본: 1년 전)
    #[arg(short, long)]
    pub start: Option<String>,

    /// 데이터 제공자
    #[arg(short, long)]
    pub provider: Option<String>,
}
