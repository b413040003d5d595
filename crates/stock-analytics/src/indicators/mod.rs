//! 기술적 지표 모듈.
//!
//! 모든 지표는 `Decimal`로 계산하며, 입력과 같은 길이의 시계열을 반환합니다.
//! 윈도우가 채워지기 전 구간은 `None`입니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표 (Trend Indicators)
//! - **SMA**: 단순 이동평균 (Simple Moving Average)
//! - **EMA**: 지수 이동평균 (Exponential Moving Average)
//! - **MACD**: 이동평균 수렴/확산 (Moving Average Convergence Divergence)
//!
//! ## 모멘텀 지표 (Momentum Indicators)
//! - **RSI**: 상대강도지수 (Relative Strength Index)
//! - **Stochastic**: 스토캐스틱 오실레이터 (slow, %K 평활화 포함)
//!
//! ## 변동성 지표 (Volatility Indicators)
//! - **Bollinger Bands**: 볼린저 밴드
//!
//! ## 방향성 지표 (Directional Indicators)
//! - **ADX**: 평균 방향성 지수 (+DI / -DI 포함)
//!
//! # 사용 예시
//!
//! ```ignore
//! use stock_analytics::indicators::{IndicatorEngine, SmaParams, RsiParams};
//!
//! let engine = IndicatorEngine::new();
//!
//! // SMA 계산
//! let sma = engine.sma(&prices, SmaParams { period: 20 })?;
//!
//! // RSI 계산
//! let rsi = engine.rsi(&prices, RsiParams { period: 14 })?;
//! ```

pub mod directional;
pub mod momentum;
pub mod trend;
pub mod volatility;

use rust_decimal::Decimal;
use thiserror::Error;

pub use directional::{AdxParams, AdxResult, DirectionalIndicators};
pub use momentum::{MomentumCalculator, RsiParams, StochasticParams, StochasticResult};
pub use trend::{EmaParams, MacdParams, MacdResult, SmaParams, TrendIndicators};
pub use volatility::{BollingerBandsParams, BollingerBandsResult, VolatilityIndicators};

/// 지표 계산 오류.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndicatorError {
    /// 데이터 부족 오류
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// 기간 파라미터 검증 (0 불가).
pub(crate) fn ensure_period(period: usize, name: &str) -> IndicatorResult<()> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(format!(
            "{} 기간은 0보다 커야 합니다",
            name
        )));
    }
    Ok(())
}

/// 기간에서 파생한 필요 길이. 계산이 넘치면 파라미터 오류입니다.
pub(crate) fn derived_len(len: Option<usize>, name: &str) -> IndicatorResult<usize> {
    len.ok_or_else(|| IndicatorError::InvalidParameter(format!("{} 기간이 너무 큽니다", name)))
}

/// 최소 데이터 개수 검증.
pub(crate) fn ensure_len(provided: usize, required: usize) -> IndicatorResult<()> {
    if provided < required {
        return Err(IndicatorError::InsufficientData { required, provided });
    }
    Ok(())
}

/// 통합 지표 엔진.
///
/// 기술적 분석 리포트에서 사용하는 모든 지표 계산의 진입점입니다.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumCalculator,
    volatility: VolatilityIndicators,
    directional: DirectionalIndicators,
}

impl IndicatorEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sma(&self, prices: &[Decimal], params: SmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.sma(prices, params)
    }

    pub fn ema(&self, prices: &[Decimal], params: EmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.ema(prices, params)
    }

    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        self.trend.macd(prices, params)
    }

    /// RSI (0-100).
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.momentum.rsi(prices, params)
    }

    /// 스토캐스틱 %K / %D. 세 가격 열 중 가장 짧은 길이를 기준으로 합니다.
    pub fn stochastic(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: StochasticParams,
    ) -> IndicatorResult<Vec<StochasticResult>> {
        self.momentum.stochastic(high, low, close, params)
    }

    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        self.volatility.bollinger_bands(prices, params)
    }

    /// ADX와 +DI / -DI.
    pub fn adx(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AdxParams,
    ) -> IndicatorResult<Vec<AdxResult>> {
        self.directional.adx(high, low, close, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_every_indicator_keeps_input_length() {
        let engine = IndicatorEngine::new();
        let close: Vec<Decimal> = (0..40).map(|i| Decimal::from(50 + (i * 7) % 11)).collect();
        let high: Vec<Decimal> = close.iter().map(|c| c + dec!(2)).collect();
        let low: Vec<Decimal> = close.iter().map(|c| c - dec!(2)).collect();

        assert_eq!(engine.sma(&close, SmaParams::default()).unwrap().len(), 40);
        assert_eq!(engine.ema(&close, EmaParams::default()).unwrap().len(), 40);
        assert_eq!(engine.macd(&close, MacdParams::default()).unwrap().len(), 40);
        assert_eq!(engine.rsi(&close, RsiParams::default()).unwrap().len(), 40);
        assert_eq!(
            engine
                .bollinger_bands(&close, BollingerBandsParams::default())
                .unwrap()
                .len(),
            40
        );
        assert_eq!(
            engine
                .stochastic(&high, &low, &close, StochasticParams::default())
                .unwrap()
                .len(),
            40
        );
        assert_eq!(
            engine
                .adx(&high, &low, &close, AdxParams::default())
                .unwrap()
                .len(),
            40
        );
    }

    #[test]
    fn test_short_series_reports_required_length() {
        let engine = IndicatorEngine::new();
        let err = engine
            .ema(&[dec!(1), dec!(2), dec!(3)], EmaParams { period: 5 })
            .unwrap_err();

        assert_eq!(
            err,
            IndicatorError::InsufficientData {
                required: 5,
                provided: 3
            }
        );
        assert_eq!(err.to_string(), "데이터가 부족합니다: 필요 5개, 제공 3개");
    }

    #[test]
    fn test_zero_period_rejected() {
        let engine = IndicatorEngine::new();
        let close = vec![dec!(10); 30];

        assert!(matches!(
            engine.rsi(&close, RsiParams { period: 0 }),
            Err(IndicatorError::InvalidParameter(_))
        ));
        assert!(matches!(
            engine.adx(&close, &close, &close, AdxParams { period: 0 }),
            Err(IndicatorError::InvalidParameter(_))
        ));
    }
}
