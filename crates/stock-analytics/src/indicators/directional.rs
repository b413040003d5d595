//! 방향성 지표 (Directional Indicators).
//!
//! ADX (Average Directional Index)는 방향과 무관하게 추세의 **강도**를 측정합니다.
//!
//! 계산 단계:
//! 1. 봉마다 +DM, -DM, True Range 계산
//! 2. Wilder 평활화 (period)로 +DM, -DM, TR 누적
//! 3. +DI = 평활 +DM / 평활 TR × 100, -DI = 평활 -DM / 평활 TR × 100
//! 4. DX = |+DI - -DI| / (+DI + -DI) × 100
//! 5. ADX = DX의 Wilder 평균 (첫 값은 period개 DX의 단순 평균)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{derived_len, ensure_len, ensure_period, IndicatorResult};

/// ADX 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdxParams {
    /// 평활화 기간 (기본: 14).
    pub period: usize,
}

impl Default for AdxParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// ADX 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdxResult {
    /// ADX (0-100).
    pub adx: Option<Decimal>,
    /// +DI (상승 방향성).
    pub plus_di: Option<Decimal>,
    /// -DI (하락 방향성).
    pub minus_di: Option<Decimal>,
}

/// 방향성 지표 계산기.
#[derive(Debug, Default)]
pub struct DirectionalIndicators;

impl DirectionalIndicators {
    /// 새로운 방향성 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// ADX 계산.
    ///
    /// +DI/-DI는 인덱스 `period`부터, ADX는 인덱스 `2 × period - 1`부터 값이 있으므로
    /// 최소 `2 × period`개의 데이터가 필요합니다.
    pub fn adx(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AdxParams,
    ) -> IndicatorResult<Vec<AdxResult>> {
        let period = params.period;
        ensure_period(period, "ADX")?;

        let len = high.len().min(low.len()).min(close.len());
        ensure_len(len, derived_len(period.checked_mul(2), "ADX")?)?;

        // 인덱스 i의 값은 봉 i-1 → i 구간 (i >= 1)
        let mut plus_dm = vec![Decimal::ZERO; len];
        let mut minus_dm = vec![Decimal::ZERO; len];
        let mut true_range = vec![Decimal::ZERO; len];

        for i in 1..len {
            let up_move = high[i] - high[i - 1];
            let down_move = low[i - 1] - low[i];

            if up_move > down_move && up_move > Decimal::ZERO {
                plus_dm[i] = up_move;
            }
            if down_move > up_move && down_move > Decimal::ZERO {
                minus_dm[i] = down_move;
            }

            true_range[i] = (high[i] - low[i])
                .max((high[i] - close[i - 1]).abs())
                .max((low[i] - close[i - 1]).abs());
        }

        let period_decimal = Decimal::from(period);
        let mut result = vec![AdxResult::default(); len];

        // Wilder 평활화 초기값: 처음 period개 구간의 합
        let mut smooth_plus: Decimal = plus_dm[1..=period].iter().sum();
        let mut smooth_minus: Decimal = minus_dm[1..=period].iter().sum();
        let mut smooth_tr: Decimal = true_range[1..=period].iter().sum();

        let mut dx_values = Vec::with_capacity(len - period);
        let mut adx: Option<Decimal> = None;

        for i in period..len {
            if i > period {
                smooth_plus = smooth_plus - smooth_plus / period_decimal + plus_dm[i];
                smooth_minus = smooth_minus - smooth_minus / period_decimal + minus_dm[i];
                smooth_tr = smooth_tr - smooth_tr / period_decimal + true_range[i];
            }

            let (plus_di, minus_di) = if smooth_tr == Decimal::ZERO {
                (Decimal::ZERO, Decimal::ZERO)
            } else {
                (
                    smooth_plus / smooth_tr * dec!(100),
                    smooth_minus / smooth_tr * dec!(100),
                )
            };

            let di_sum = plus_di + minus_di;
            let dx = if di_sum == Decimal::ZERO {
                Decimal::ZERO
            } else {
                (plus_di - minus_di).abs() / di_sum * dec!(100)
            };
            dx_values.push(dx);

            adx = match adx {
                Some(prev) => Some((prev * (period_decimal - Decimal::ONE) + dx) / period_decimal),
                None if dx_values.len() == period => {
                    Some(dx_values.iter().sum::<Decimal>() / period_decimal)
                }
                None => None,
            };

            result[i] = AdxResult {
                adx,
                plus_di: Some(plus_di),
                minus_di: Some(minus_di),
            };
        }

        Ok(result)
    }
}
