//! 가격 계산을 위한 Decimal 유틸리티.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// 가격 타입.
pub type Price = Decimal;

/// 거래량 타입.
pub type Volume = Decimal;

/// 가격 표시 소수점 자릿수.
pub const PRICE_DP: u32 = 4;

/// f64를 Decimal로 변환 후 소수점 4자리로 반올림.
///
/// NaN, 무한대는 `None`을 반환합니다.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value).map(|d| d.round_dp(PRICE_DP).normalize())
}

/// 변화율(%) 계산: (현재 - 이전) / 이전 × 100.
pub fn percent_change(current: Decimal, previous: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    Some(((current - previous) / previous * Decimal::ONE_HUNDRED).round_dp(PRICE_DP))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decimal_from_f64() {
        assert_eq!(decimal_from_f64(185.5), Some(dec!(185.5)));
        assert_eq!(decimal_from_f64(0.1 + 0.2), Some(dec!(0.3)));
        assert_eq!(decimal_from_f64(1.234567), Some(dec!(1.2346)));
        assert_eq!(decimal_from_f64(f64::NAN), None);
        assert_eq!(decimal_from_f64(f64::INFINITY), None);
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(dec!(110), dec!(100)), Some(dec!(10)));
        assert_eq!(percent_change(dec!(90), dec!(100)), Some(dec!(-10)));
        assert_eq!(percent_change(dec!(1), Decimal::ZERO), None);
    }
}
