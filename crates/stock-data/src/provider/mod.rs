//! 시장 데이터 제공자.
//!
//! 각 제공자는 `MarketDataProvider`를 구현하며, `ProviderRegistry`에
//! 이름으로 등록됩니다.

mod fmp;
mod registry;
mod yahoo;

pub use fmp::FmpProvider;
pub use registry::ProviderRegistry;
pub use yahoo::YahooFinanceProvider;

use async_trait::async_trait;
use stock_core::{Candle, DateRange, Interval, NewsArticle, Quote, Ticker};

use crate::error::Result;

/// 뉴스 기본 조회 개수.
pub const DEFAULT_NEWS_LIMIT: usize = 10;

/// 시작일이 없을 때 종료일 기준으로 조회할 과거 일수.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// 과거 캔들 조회 요청.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    /// 종목
    pub ticker: Ticker,
    /// 캔들 간격
    pub interval: Interval,
    /// 조회 기간
    pub range: DateRange,
}

impl HistoryRequest {
    /// 일봉, 전체 기간 요청을 생성합니다.
    pub fn new(ticker: Ticker) -> Self {
        Self {
            ticker,
            interval: Interval::default(),
            range: DateRange::default(),
        }
    }

    /// 캔들 간격을 설정합니다.
    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    /// 조회 기간을 설정합니다.
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }
}

/// 뉴스 조회 요청.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsRequest {
    /// 종목
    pub ticker: Ticker,
    /// 최대 기사 수
    pub limit: usize,
    /// 게시일 필터
    pub range: DateRange,
}

impl NewsRequest {
    /// 기본 개수(10), 전체 기간 요청을 생성합니다.
    pub fn new(ticker: Ticker) -> Self {
        Self {
            ticker,
            limit: DEFAULT_NEWS_LIMIT,
            range: DateRange::default(),
        }
    }

    /// 최대 기사 수를 설정합니다.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// 게시일 필터를 설정합니다.
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }
}

/// 시장 데이터 제공자 trait.
///
/// 구현체는 상위 API의 에러를 변환만 하고 재시도하지 않습니다.
/// 빈 결과는 에러가 아니라 빈 벡터로 반환합니다.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// `--provider`로 지정하는 제공자 이름.
    fn name(&self) -> &'static str;

    /// 이름 대신 사용할 수 있는 별칭.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// 현재 시세 조회.
    async fn quote(&self, ticker: &Ticker) -> Result<Quote>;

    /// 과거 캔들 조회 (오래된 것부터 정렬).
    async fn history(&self, request: &HistoryRequest) -> Result<Vec<Candle>>;

    /// 종목 뉴스 조회 (최신순 정렬).
    async fn news(&self, request: &NewsRequest) -> Result<Vec<NewsArticle>>;
}
