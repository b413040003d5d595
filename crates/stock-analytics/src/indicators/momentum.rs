//! 모멘텀 지표 (Momentum Indicators).
//!
//! 가격 모멘텀과 과매수/과매도 상태를 측정하는 지표들을 제공합니다.
//! - RSI (Relative Strength Index)
//! - Stochastic Oscillator

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{derived_len, ensure_len, ensure_period, IndicatorResult};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 스토캐스틱 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StochasticParams {
    /// %K 기간 (기본: 14).
    pub k_period: usize,
    /// %K 평활화 기간 (기본: 3).
    pub smooth_k: usize,
    /// %D 기간 (기본: 3).
    pub d_period: usize,
}

impl Default for StochasticParams {
    fn default() -> Self {
        Self {
            k_period: 14,
            smooth_k: 3,
            d_period: 3,
        }
    }
}

impl StochasticParams {
    /// 첫 %D 값에 필요한 최소 데이터 개수.
    pub fn min_len(&self) -> usize {
        self.k_period + self.smooth_k + self.d_period - 2
    }
}

/// 스토캐스틱 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StochasticResult {
    /// %K (평활화된 값).
    pub k: Option<Decimal>,
    /// %D (%K의 이동평균).
    pub d: Option<Decimal>,
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// RSI = 100 - (100 / (1 + RS))
    /// RS = 평균 상승폭 / 평균 하락폭
    ///
    /// 평균은 Wilder 방식 (alpha = 1 / period)의 지수 평균이며,
    /// 첫 평균은 처음 period개 변화량의 단순 평균입니다.
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값들 (처음 period개는 None)
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        ensure_period(period, "RSI")?;
        ensure_len(prices.len(), derived_len(period.checked_add(1), "RSI")?)?;

        // 상승/하락 분리 (인덱스 i는 prices[i+1] - prices[i])
        let (gains, losses): (Vec<Decimal>, Vec<Decimal>) = prices
            .windows(2)
            .map(|w| {
                let delta = w[1] - w[0];
                if delta > Decimal::ZERO {
                    (delta, Decimal::ZERO)
                } else {
                    (Decimal::ZERO, delta.abs())
                }
            })
            .unzip();

        let alpha = Decimal::ONE / Decimal::from(period);
        let one_minus_alpha = Decimal::ONE - alpha;
        let period_decimal = Decimal::from(period);

        let mut avg_gain: Decimal = gains[..period].iter().sum::<Decimal>() / period_decimal;
        let mut avg_loss: Decimal = losses[..period].iter().sum::<Decimal>() / period_decimal;

        let mut result = vec![None; period];
        result.push(Some(Self::rsi_value(avg_gain, avg_loss)));

        for i in period..gains.len() {
            avg_gain = gains[i] * alpha + avg_gain * one_minus_alpha;
            avg_loss = losses[i] * alpha + avg_loss * one_minus_alpha;
            result.push(Some(Self::rsi_value(avg_gain, avg_loss)));
        }

        Ok(result)
    }

    fn rsi_value(avg_gain: Decimal, avg_loss: Decimal) -> Decimal {
        if avg_loss == Decimal::ZERO {
            // 하락이 전혀 없으면 100, 변화가 전혀 없으면 중립
            return if avg_gain == Decimal::ZERO {
                dec!(50)
            } else {
                dec!(100)
            };
        }
        let rs = avg_gain / avg_loss;
        dec!(100) - (dec!(100) / (Decimal::ONE + rs))
    }

    /// 스토캐스틱 오실레이터 계산 (slow stochastic).
    ///
    /// Raw %K = (현재가 - 최저가) / (최고가 - 최저가) × 100
    /// %K = Raw %K의 smooth_k 기간 이동평균
    /// %D = %K의 d_period 기간 이동평균
    ///
    /// # 반환
    /// %K, %D 값들
    pub fn stochastic(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: StochasticParams,
    ) -> IndicatorResult<Vec<StochasticResult>> {
        ensure_period(params.k_period, "Stochastic %K")?;
        ensure_period(params.smooth_k, "Stochastic smoothing")?;
        ensure_period(params.d_period, "Stochastic %D")?;

        let len = high.len().min(low.len()).min(close.len());
        ensure_len(len, params.min_len())?;

        // Raw %K
        let raw_k: Vec<Option<Decimal>> = (0..len)
            .map(|i| {
                if i + 1 < params.k_period {
                    return None;
                }
                let start = i + 1 - params.k_period;
                let highest = high[start..=i].iter().max().copied()?;
                let lowest = low[start..=i].iter().min().copied()?;

                let range = highest - lowest;
                if range == Decimal::ZERO {
                    Some(dec!(50)) // 범위가 0이면 중립값
                } else {
                    Some((close[i] - lowest) / range * dec!(100))
                }
            })
            .collect();

        let k_values = rolling_mean(&raw_k, params.smooth_k);
        let d_values = rolling_mean(&k_values, params.d_period);

        Ok(k_values
            .into_iter()
            .zip(d_values)
            .map(|(k, d)| StochasticResult { k, d })
            .collect())
    }
}

/// 윈도우 안의 값이 모두 있을 때만 평균을 냅니다.
fn rolling_mean(values: &[Option<Decimal>], window: usize) -> Vec<Option<Decimal>> {
    let window_decimal = Decimal::from(window);
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            values[i + 1 - window..=i]
                .iter()
                .try_fold(Decimal::ZERO, |acc, v| v.map(|v| acc + v))
                .map(|sum| sum / window_decimal)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn sample_prices() -> Vec<Decimal> {
        vec![
            dec!(100.0),
            dec!(102.0),
            dec!(101.0),
            dec!(103.0),
            dec!(105.0),
            dec!(104.0),
            dec!(106.0),
            dec!(108.0),
            dec!(107.0),
            dec!(109.0),
            dec!(111.0),
            dec!(110.0),
            dec!(112.0),
            dec!(114.0),
            dec!(113.0),
            dec!(115.0),
        ]
    }

    #[test]
    fn test_rsi_alignment() {
        let momentum = MomentumCalculator::new();
        let prices = sample_prices();

        let rsi = momentum.rsi(&prices, RsiParams { period: 14 }).unwrap();

        assert_eq!(rsi.len(), prices.len());
        assert!(rsi[13].is_none());
        assert!(rsi[14].is_some());
        assert!(rsi[15].is_some());
    }

    #[test]
    fn test_rsi_known_value() {
        let momentum = MomentumCalculator::new();
        // 상승 +2, 하락 -1 반복
        let prices = vec![dec!(10), dec!(12), dec!(11), dec!(13), dec!(12)];

        let rsi = momentum.rsi(&prices, RsiParams { period: 2 }).unwrap();

        // 첫 평균: 상승 1, 하락 0.5 → RS 2 → RSI 66.67
        let first = rsi[2].unwrap();
        assert!((first - dec!(66.6667)).abs() < dec!(0.001));

        // alpha = 1/2: 상승 1.5, 하락 0.25 → RS 6 → RSI 85.71
        assert!((rsi[3].unwrap() - dec!(85.7143)).abs() < dec!(0.001));
        // 상승 0.75, 하락 0.625 → RS 1.2 → RSI 54.55
        assert!((rsi[4].unwrap() - dec!(54.5455)).abs() < dec!(0.001));
    }

    #[test]
    fn test_rsi_huge_period_is_an_error() {
        let prices = sample_prices();

        assert!(MomentumCalculator::new()
            .rsi(&prices, RsiParams { period: usize::MAX })
            .is_err());
    }

    #[test]
    fn test_rsi_extremes() {
        let momentum = MomentumCalculator::new();

        let rising: Vec<Decimal> = (0..20).map(|i| Decimal::from(100 + i)).collect();
        let rsi = momentum.rsi(&rising, RsiParams { period: 14 }).unwrap();
        assert_eq!(rsi[19], Some(dec!(100)));

        let flat = vec![dec!(100); 20];
        let rsi = momentum.rsi(&flat, RsiParams { period: 14 }).unwrap();
        assert_eq!(rsi[19], Some(dec!(50)));
    }

    #[test]
    fn test_rsi_requires_period_plus_one() {
        let momentum = MomentumCalculator::new();
        let prices: Vec<Decimal> = (0..14).map(Decimal::from).collect();

        assert!(momentum.rsi(&prices, RsiParams { period: 14 }).is_err());
    }

    #[test]
    fn test_stochastic_alignment() {
        let momentum = MomentumCalculator::new();

        let high: Vec<Decimal> = (0..20).map(|i| Decimal::from(105 + i)).collect();
        let low: Vec<Decimal> = (0..20).map(|i| Decimal::from(95 + i)).collect();
        let close: Vec<Decimal> = (0..20).map(|i| Decimal::from(100 + i)).collect();

        let stoch = momentum
            .stochastic(&high, &low, &close, StochasticParams::default())
            .unwrap();

        assert_eq!(stoch.len(), 20);
        // raw %K: 13부터, %K: 15부터, %D: 17부터
        assert!(stoch[14].k.is_none());
        assert!(stoch[15].k.is_some());
        assert!(stoch[16].d.is_none());
        assert!(stoch[17].d.is_some());
    }

    #[test]
    fn test_stochastic_close_at_high() {
        let momentum = MomentumCalculator::new();
        let high = vec![dec!(10); 20];
        let low = vec![dec!(0); 20];
        let close = vec![dec!(10); 20];

        let stoch = momentum
            .stochastic(&high, &low, &close, StochasticParams::default())
            .unwrap();

        assert_eq!(stoch[19].k, Some(dec!(100)));
        assert_eq!(stoch[19].d, Some(dec!(100)));
    }

    #[test]
    fn test_stochastic_smoothed_values() {
        let momentum = MomentumCalculator::new();
        let high = [10, 12, 11, 13, 12, 11].map(Decimal::from);
        let low = [8, 9, 9, 10, 7, 8].map(Decimal::from);
        let close = [9, 11, 10, 12, 8, 10].map(Decimal::from);
        let params = StochasticParams {
            k_period: 3,
            smooth_k: 2,
            d_period: 2,
        };

        let stoch = momentum.stochastic(&high, &low, &close, params).unwrap();

        // raw %K: 50, 75, 16.67, 50 (인덱스 2..=5)
        assert_eq!(stoch[3].k, Some(dec!(62.5)));
        assert!(stoch[3].d.is_none());
        let last = stoch[5];
        assert!((last.k.unwrap() - dec!(33.3333)).abs() < dec!(0.001));
        assert!((last.d.unwrap() - dec!(39.5833)).abs() < dec!(0.001));
    }

    #[test]
    fn test_stochastic_insufficient_data() {
        let momentum = MomentumCalculator::new();
        let data: Vec<Decimal> = (0..17).map(Decimal::from).collect();

        assert!(momentum
            .stochastic(&data, &data, &data, StochasticParams::default())
            .is_err());
    }

    proptest! {
        #[test]
        fn prop_rsi_within_bounds(closes in proptest::collection::vec(1u32..10_000, 15..60)) {
            let prices: Vec<Decimal> = closes.into_iter().map(Decimal::from).collect();
            let rsi = MomentumCalculator::new().rsi(&prices, RsiParams { period: 14 }).unwrap();

            for value in rsi.into_iter().flatten() {
                prop_assert!(value >= Decimal::ZERO && value <= dec!(100));
            }
        }
    }
}
