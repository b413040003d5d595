//! 지표 값 해석.
//!
//! 최신 지표 값을 사람이 읽을 수 있는 한 줄 설명으로 변환합니다.
//! 값이 하나라도 없으면 `Unavailable`입니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Serialize, Serializer};
use std::fmt;

/// RSI 과매수 기준.
pub const RSI_OVERBOUGHT: Decimal = dec!(70);
/// RSI 과매도 기준.
pub const RSI_OVERSOLD: Decimal = dec!(30);
/// ADX 추세 판단 기준.
pub const ADX_TRENDING: Decimal = dec!(25);
/// 스토캐스틱 과매수 기준.
pub const STOCH_OVERBOUGHT: Decimal = dec!(80);
/// 스토캐스틱 과매도 기준.
pub const STOCH_OVERSOLD: Decimal = dec!(20);

/// 지표 해석 결과.
///
/// JSON에는 설명 문자열로 직렬화됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpretation {
    /// 계산 불가
    Unavailable,
    RsiOverbought,
    RsiOversold,
    RsiBullish,
    RsiBearish,
    MacdGoldenCross,
    MacdDeadCross,
    MacdAboveZero,
    MacdBelowZero,
    AdxTrending,
    AdxRanging,
    StochOverbought,
    StochOversold,
    StochBullish,
    StochBearish,
}

impl Interpretation {
    /// 설명 문자열.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Unavailable => "계산 불가",
            Self::RsiOverbought => "과매수 구간, 조정 압력 가능성",
            Self::RsiOversold => "과매도 구간, 반등 가능성",
            Self::RsiBullish => "강세 우위, 매수세 우세",
            Self::RsiBearish => "약세 우위, 매도세 우세",
            Self::MacdGoldenCross => "골든 크로스, 매수 신호",
            Self::MacdDeadCross => "데드 크로스, 매도 신호",
            Self::MacdAboveZero => "MACD 0선 위, 전반적 강세",
            Self::MacdBelowZero => "MACD 0선 아래, 전반적 약세",
            Self::AdxTrending => "추세 뚜렷, 추세 추종 전략 적합",
            Self::AdxRanging => "추세 약함, 횡보 가능성",
            Self::StochOverbought => "과매수 구간, 조정 위험 주의",
            Self::StochOversold => "과매도 구간, 반등 가능성",
            Self::StochBullish => "%K가 %D 위, 단기 강세",
            Self::StochBearish => "%K가 %D 아래, 단기 약세",
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl Serialize for Interpretation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.description())
    }
}

/// RSI 해석.
pub fn interpret_rsi(value: Option<Decimal>) -> Interpretation {
    match value {
        None => Interpretation::Unavailable,
        Some(v) if v >= RSI_OVERBOUGHT => Interpretation::RsiOverbought,
        Some(v) if v <= RSI_OVERSOLD => Interpretation::RsiOversold,
        Some(v) if v >= dec!(50) => Interpretation::RsiBullish,
        Some(_) => Interpretation::RsiBearish,
    }
}

/// MACD 해석.
///
/// 히스토그램이 없으면 MACD - 시그널로 대신합니다.
pub fn interpret_macd(
    macd: Option<Decimal>,
    signal: Option<Decimal>,
    histogram: Option<Decimal>,
) -> Interpretation {
    let (Some(macd), Some(signal)) = (macd, signal) else {
        return Interpretation::Unavailable;
    };
    let histogram = histogram.unwrap_or(macd - signal);

    if macd > signal && histogram > Decimal::ZERO {
        Interpretation::MacdGoldenCross
    } else if macd < signal && histogram < Decimal::ZERO {
        Interpretation::MacdDeadCross
    } else if macd > Decimal::ZERO {
        Interpretation::MacdAboveZero
    } else {
        Interpretation::MacdBelowZero
    }
}

/// ADX 해석.
pub fn interpret_adx(value: Option<Decimal>) -> Interpretation {
    match value {
        None => Interpretation::Unavailable,
        Some(v) if v >= ADX_TRENDING => Interpretation::AdxTrending,
        Some(_) => Interpretation::AdxRanging,
    }
}

/// 스토캐스틱 해석.
pub fn interpret_stochastic(k: Option<Decimal>, d: Option<Decimal>) -> Interpretation {
    let (Some(k), Some(d)) = (k, d) else {
        return Interpretation::Unavailable;
    };

    if k >= STOCH_OVERBOUGHT && d >= STOCH_OVERBOUGHT {
        Interpretation::StochOverbought
    } else if k <= STOCH_OVERSOLD && d <= STOCH_OVERSOLD {
        Interpretation::StochOversold
    } else if k > d {
        Interpretation::StochBullish
    } else {
        Interpretation::StochBearish
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_thresholds() {
        assert_eq!(interpret_rsi(None), Interpretation::Unavailable);
        assert_eq!(interpret_rsi(Some(dec!(70))), Interpretation::RsiOverbought);
        assert_eq!(interpret_rsi(Some(dec!(30))), Interpretation::RsiOversold);
        assert_eq!(interpret_rsi(Some(dec!(50))), Interpretation::RsiBullish);
        assert_eq!(interpret_rsi(Some(dec!(49.99))), Interpretation::RsiBearish);
    }

    #[test]
    fn test_macd_rules() {
        assert_eq!(
            interpret_macd(Some(dec!(1.5)), Some(dec!(1.0)), Some(dec!(0.5))),
            Interpretation::MacdGoldenCross
        );
        assert_eq!(
            interpret_macd(Some(dec!(-1.5)), Some(dec!(-1.0)), Some(dec!(-0.5))),
            Interpretation::MacdDeadCross
        );
        // 히스토그램 누락 시 MACD - 시그널 사용
        assert_eq!(
            interpret_macd(Some(dec!(2)), Some(dec!(1)), None),
            Interpretation::MacdGoldenCross
        );
        // 히스토그램 부호가 엇갈리면 0선 기준
        assert_eq!(
            interpret_macd(Some(dec!(2)), Some(dec!(1)), Some(dec!(-0.1))),
            Interpretation::MacdAboveZero
        );
        assert_eq!(
            interpret_macd(Some(dec!(1)), Some(dec!(1)), Some(Decimal::ZERO)),
            Interpretation::MacdAboveZero
        );
        assert_eq!(
            interpret_macd(Some(dec!(-1)), Some(dec!(-1)), None),
            Interpretation::MacdBelowZero
        );
        assert_eq!(
            interpret_macd(None, Some(dec!(1)), None),
            Interpretation::Unavailable
        );
    }

    #[test]
    fn test_adx_threshold() {
        assert_eq!(interpret_adx(Some(dec!(25))), Interpretation::AdxTrending);
        assert_eq!(interpret_adx(Some(dec!(24.9))), Interpretation::AdxRanging);
        assert_eq!(interpret_adx(None), Interpretation::Unavailable);
    }

    #[test]
    fn test_stochastic_rules() {
        assert_eq!(
            interpret_stochastic(Some(dec!(85)), Some(dec!(80))),
            Interpretation::StochOverbought
        );
        assert_eq!(
            interpret_stochastic(Some(dec!(10)), Some(dec!(20))),
            Interpretation::StochOversold
        );
        // 한쪽만 과매수면 교차 방향으로 판단
        assert_eq!(
            interpret_stochastic(Some(dec!(85)), Some(dec!(75))),
            Interpretation::StochBullish
        );
        assert_eq!(
            interpret_stochastic(Some(dec!(50)), Some(dec!(50))),
            Interpretation::StochBearish
        );
        assert_eq!(
            interpret_stochastic(Some(dec!(50)), None),
            Interpretation::Unavailable
        );
    }

    #[test]
    fn test_serializes_as_description() {
        let json = serde_json::to_string(&Interpretation::AdxRanging).unwrap();
        assert_eq!(json, "\"추세 약함, 횡보 가능성\"");
    }
}
