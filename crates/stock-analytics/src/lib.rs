//! 기술적 분석.
//!
//! 이 crate는 다음을 제공합니다:
//! - Decimal 기반 기술적 지표 엔진 (SMA, EMA, MACD, RSI, 볼린저 밴드, ADX, 스토캐스틱)
//! - 지표 값 해석 규칙
//! - 캔들 목록으로 지표 리포트를 만드는 `TechnicalAnalyzer`

pub mod indicators;
pub mod interpretation;
pub mod technical;

pub use indicators::{IndicatorEngine, IndicatorError, IndicatorResult};
pub use interpretation::Interpretation;
pub use technical::{
    parse_indicator_list, IndicatorKind, IndicatorReport, IndicatorRequest, RecentRow,
    SummaryRow, TechnicalAnalyzer, TechnicalReport,
};
