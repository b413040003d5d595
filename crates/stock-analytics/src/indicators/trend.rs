//! 이동평균 계열 지표: SMA, EMA, MACD.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{ensure_len, ensure_period, IndicatorError, IndicatorResult};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// MACD 파라미터 (기본 12/26/9).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdResult {
    /// fast EMA - slow EMA
    pub macd: Option<Decimal>,
    pub signal: Option<Decimal>,
    /// macd - signal
    pub histogram: Option<Decimal>,
}

/// 이동평균 계열 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균. 인덱스 `period - 1`부터 값이 있습니다.
    pub fn sma(
        &self,
        prices: &[Decimal],
        params: SmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let n = params.period;
        ensure_period(n, "SMA")?;
        ensure_len(prices.len(), n)?;

        let divisor = Decimal::from(n);
        let mut window_sum: Decimal = prices[..n].iter().sum();
        let mut out = Vec::with_capacity(prices.len());
        out.resize(n - 1, None);
        out.push(Some(window_sum / divisor));

        // 윈도우를 한 칸씩 밀며 합계 갱신
        for (entering, leaving) in prices[n..].iter().zip(prices) {
            window_sum += entering - leaving;
            out.push(Some(window_sum / divisor));
        }

        Ok(out)
    }

    /// 지수 이동평균, `k = 2 / (period + 1)`.
    ///
    /// 인덱스 `period - 1`의 값은 첫 `period`개의 단순 평균입니다.
    pub fn ema(
        &self,
        prices: &[Decimal],
        params: EmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let n = params.period;
        ensure_period(n, "EMA")?;
        ensure_len(prices.len(), n)?;

        let k = dec!(2) / Decimal::from(n + 1);
        let seed = prices[..n].iter().sum::<Decimal>() / Decimal::from(n);

        let mut out = vec![None; n - 1];
        out.push(Some(seed));
        out.extend(prices[n..].iter().scan(seed, |ema, price| {
            *ema += (*price - *ema) * k;
            Some(Some(*ema))
        }));

        Ok(out)
    }

    /// MACD. 시그널은 MACD 라인이 생긴 구간에만 EMA를 적용하므로
    /// 최소 `slow + signal - 1`개의 가격이 필요합니다.
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        ensure_period(params.fast_period, "MACD fast")?;
        ensure_period(params.slow_period, "MACD slow")?;
        ensure_period(params.signal_period, "MACD signal")?;
        if params.fast_period >= params.slow_period {
            return Err(IndicatorError::InvalidParameter(format!(
                "MACD 단기 기간({})은 장기 기간({})보다 짧아야 합니다",
                params.fast_period, params.slow_period
            )));
        }
        ensure_len(prices.len(), params.slow_period + params.signal_period - 1)?;

        let fast_ema = self.ema(
            prices,
            EmaParams {
                period: params.fast_period,
            },
        )?;
        let slow_ema = self.ema(
            prices,
            EmaParams {
                period: params.slow_period,
            },
        )?;

        let macd_line: Vec<Option<Decimal>> = fast_ema
            .iter()
            .zip(&slow_ema)
            .map(|(fast, slow)| Some((*fast)? - (*slow)?))
            .collect();

        // 시그널 라인 (값이 있는 MACD 구간의 EMA)
        let first_macd = params.slow_period - 1;
        let signal_ema = self.ema(
            &prices_from(&macd_line[first_macd..]),
            EmaParams {
                period: params.signal_period,
            },
        )?;

        let result = macd_line
            .iter()
            .enumerate()
            .map(|(i, macd)| {
                let signal = i
                    .checked_sub(first_macd)
                    .and_then(|j| signal_ema.get(j).copied().flatten());
                let histogram = match (*macd, signal) {
                    (Some(m), Some(s)) => Some(m - s),
                    _ => None,
                };
                MacdResult {
                    macd: *macd,
                    signal,
                    histogram,
                }
            })
            .collect();

        Ok(result)
    }
}

/// 값이 모두 채워진 구간을 평탄화합니다.
fn prices_from(values: &[Option<Decimal>]) -> Vec<Decimal> {
    values.iter().flatten().copied().collect()
}
