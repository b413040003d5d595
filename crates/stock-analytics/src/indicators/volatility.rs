//! 변동성 지표 (Volatility Indicators).
//!
//! - Bollinger Bands (볼린저 밴드)

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{ensure_len, ensure_period, IndicatorError, IndicatorResult};

/// 볼린저 밴드 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBandsParams {
    /// 이동평균 기간 (기본: 14).
    pub period: usize,
    /// 표준편차 배수 (기본: 2.0).
    pub std_dev_multiplier: Decimal,
}

impl Default for BollingerBandsParams {
    fn default() -> Self {
        Self {
            period: 14,
            std_dev_multiplier: dec!(2.0),
        }
    }
}

/// 볼린저 밴드 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerBandsResult {
    /// 상단 밴드 (MA + k × σ).
    pub upper: Option<Decimal>,
    /// 중간 밴드 (이동평균).
    pub middle: Option<Decimal>,
    /// 하단 밴드 (MA - k × σ).
    pub lower: Option<Decimal>,
    /// %B 지표 ((현재가 - 하단) / (상단 - 하단)).
    pub percent_b: Option<Decimal>,
    /// 밴드 폭 ((상단 - 하단) / 중간 × 100).
    pub bandwidth: Option<Decimal>,
}

/// 변동성 지표 계산기.
#[derive(Debug, Default)]
pub struct VolatilityIndicators;

impl VolatilityIndicators {
    /// 새로운 변동성 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 볼린저 밴드 계산.
    ///
    /// 상단 밴드 = MA + (k × σ)
    /// 중간 밴드 = MA (이동평균)
    /// 하단 밴드 = MA - (k × σ)
    ///
    /// σ는 모집단 표준편차입니다.
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        let period = params.period;
        ensure_period(period, "Bollinger")?;
        if params.std_dev_multiplier <= Decimal::ZERO {
            return Err(IndicatorError::InvalidParameter(
                "표준편차 배수는 0보다 커야 합니다".to_string(),
            ));
        }
        ensure_len(prices.len(), period)?;

        let period_decimal = Decimal::from(period);
        let mut result = vec![BollingerBandsResult::default(); period - 1];

        for (offset, window) in prices.windows(period).enumerate() {
            let i = offset + period - 1;

            // 이동평균 (중간 밴드)
            let ma = window.iter().sum::<Decimal>() / period_decimal;

            let variance = window
                .iter()
                .map(|&p| {
                    let diff = p - ma;
                    diff * diff
                })
                .sum::<Decimal>()
                / period_decimal;

            let deviation = params.std_dev_multiplier * sqrt_decimal(variance);
            let upper = ma + deviation;
            let lower = ma - deviation;

            let percent_b = if upper != lower {
                Some((prices[i] - lower) / (upper - lower))
            } else {
                Some(dec!(0.5)) // 밴드가 수렴하면 중립값
            };

            let bandwidth = if ma != Decimal::ZERO {
                Some((upper - lower) / ma * dec!(100))
            } else {
                None
            };

            result.push(BollingerBandsResult {
                upper: Some(upper),
                middle: Some(ma),
                lower: Some(lower),
                percent_b,
                bandwidth,
            });
        }

        Ok(result)
    }
}

/// Decimal 제곱근.
///
/// f64 근사값에서 시작해 Newton-Raphson으로 보정합니다.
pub(crate) fn sqrt_decimal(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut x = value
        .to_f64()
        .map(f64::sqrt)
        .and_then(Decimal::from_f64)
        .filter(|x| *x > Decimal::ZERO)
        .unwrap_or(value);
    let two = dec!(2);

    for _ in 0..6 {
        x = (x + value / x) / two;
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sqrt_decimal() {
        assert_eq!(sqrt_decimal(Decimal::ZERO), Decimal::ZERO);
        assert!((sqrt_decimal(dec!(4)) - dec!(2)).abs() < dec!(0.0000001));
        assert!((sqrt_decimal(dec!(2)) - dec!(1.41421356)).abs() < dec!(0.00000001));
        assert!((sqrt_decimal(dec!(1000000)) - dec!(1000)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_bollinger_known_values() {
        let volatility = VolatilityIndicators::new();
        // 평균 5, 모집단 분산 8 → σ = 2.828...
        let prices = vec![dec!(1), dec!(3), dec!(5), dec!(7), dec!(9)];

        let bands = volatility
            .bollinger_bands(
                &prices,
                BollingerBandsParams {
                    period: 5,
                    std_dev_multiplier: dec!(2.0),
                },
            )
            .unwrap();

        assert!(bands[3].middle.is_none());
        let last = bands[4];
        assert_eq!(last.middle, Some(dec!(5)));

        let upper = last.upper.unwrap();
        assert!((upper - dec!(10.656854)).abs() < dec!(0.00001));
        let lower = last.lower.unwrap();
        assert!((lower - dec!(-0.656854)).abs() < dec!(0.00001));

        // %B: (9 - lower) / (upper - lower)
        let percent_b = last.percent_b.unwrap();
        assert!((percent_b - dec!(0.853553)).abs() < dec!(0.00001));
    }

    #[test]
    fn test_bollinger_flat_prices() {
        let volatility = VolatilityIndicators::new();
        let prices = vec![dec!(100); 20];

        let bands = volatility
            .bollinger_bands(&prices, BollingerBandsParams::default())
            .unwrap();

        let last = bands[19];
        assert_eq!(last.upper, last.lower);
        assert_eq!(last.percent_b, Some(dec!(0.5)));
        assert_eq!(last.bandwidth, Some(Decimal::ZERO));
    }

    #[test]
    fn test_bollinger_rejects_negative_multiplier() {
        let volatility = VolatilityIndicators::new();
        let prices = vec![dec!(100); 20];

        let params = BollingerBandsParams {
            period: 14,
            std_dev_multiplier: dec!(-1),
        };
        assert!(volatility.bollinger_bands(&prices, params).is_err());
    }
}
