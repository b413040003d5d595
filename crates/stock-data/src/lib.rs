//! 시장 데이터 조회.
//!
//! 이 crate는 다음을 제공합니다:
//! - 제공자 중립적인 `MarketDataProvider` trait
//! - Yahoo Finance 제공자 (chart / search API)
//! - Financial Modeling Prep 제공자
//! - 이름으로 제공자를 선택하는 `ProviderRegistry`
//!
//! 조회 결과는 저장하지 않으며, 상위 API의 에러는 그대로 전달합니다.

pub mod error;
mod http;
pub mod provider;

pub use error::{DataError, Result};
pub use provider::{
    FmpProvider, HistoryRequest, MarketDataProvider, NewsRequest, ProviderRegistry,
    YahooFinanceProvider,
};
