//! 기술적 분석 리포트.
//!
//! 캔들 목록과 요청된 지표 이름들로 지표별 리포트를 만듭니다.
//! 지표 하나의 계산 실패는 해당 항목의 `error`로만 기록되고
//! 나머지 지표는 계속 계산됩니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

use stock_core::{split_hlc, Candle};

use crate::indicators::{
    AdxParams, BollingerBandsParams, EmaParams, IndicatorEngine, IndicatorResult, MacdParams,
    RsiParams, SmaParams, StochasticParams,
};
use crate::interpretation::{
    interpret_adx, interpret_macd, interpret_rsi, interpret_stochastic, Interpretation,
};

/// 기본 지표 기간.
pub const DEFAULT_PERIOD: usize = 14;

/// 지표별로 출력할 기본 최근 행 수.
pub const DEFAULT_RECENT_ROWS: usize = 10;

/// 기본 지표 목록.
pub const DEFAULT_INDICATORS: &str = "rsi,macd,sma";

/// 지원 지표 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Rsi,
    Macd,
    Sma,
    Ema,
    Bbands,
    Adx,
    Stoch,
}

impl IndicatorKind {
    /// 지원되는 모든 지표.
    pub const ALL: [IndicatorKind; 7] = [
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
        IndicatorKind::Sma,
        IndicatorKind::Ema,
        IndicatorKind::Bbands,
        IndicatorKind::Adx,
        IndicatorKind::Stoch,
    ];

    /// 지표 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKind::Rsi => "rsi",
            IndicatorKind::Macd => "macd",
            IndicatorKind::Sma => "sma",
            IndicatorKind::Ema => "ema",
            IndicatorKind::Bbands => "bbands",
            IndicatorKind::Adx => "adx",
            IndicatorKind::Stoch => "stoch",
        }
    }

    /// 이름에서 파싱합니다 (대소문자 무시).
    pub fn parse(s: &str) -> Option<Self> {
        let name = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 요청된 지표 한 건.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorRequest {
    /// 지원 지표
    Supported(IndicatorKind),
    /// 알 수 없는 이름 (소문자로 정규화됨)
    Unsupported(String),
}

impl IndicatorRequest {
    /// 리포트 키로 사용할 이름.
    pub fn name(&self) -> &str {
        match self {
            IndicatorRequest::Supported(kind) => kind.as_str(),
            IndicatorRequest::Unsupported(name) => name,
        }
    }
}

/// 쉼표로 구분된 지표 목록을 파싱합니다.
///
/// 공백 제거, 소문자 정규화 후 빈 항목은 건너뛰고 중복은 처음 한 번만 남깁니다.
pub fn parse_indicator_list(s: &str) -> Vec<IndicatorRequest> {
    let mut requests: Vec<IndicatorRequest> = Vec::new();
    for part in s.split(',') {
        let name = part.trim().to_lowercase();
        if name.is_empty() {
            continue;
        }
        let request = match IndicatorKind::parse(&name) {
            Some(kind) => IndicatorRequest::Supported(kind),
            None => IndicatorRequest::Unsupported(name),
        };
        if !requests.contains(&request) {
            requests.push(request);
        }
    }
    requests
}

/// 최근 데이터 한 행: 캔들 OHLCV와 지표 열.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentRow {
    pub date: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    /// 지표 열 (예: `RSI_14`, `MACDh_12_26_9`)
    #[serde(flatten)]
    pub values: BTreeMap<String, Option<Decimal>>,
}

/// 지표 하나의 리포트.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndicatorReport {
    Rsi {
        latest: Option<Decimal>,
        period: usize,
        recent_data: Vec<RecentRow>,
        interpretation: Interpretation,
    },
    Macd {
        latest_macd: Option<Decimal>,
        latest_signal: Option<Decimal>,
        latest_histogram: Option<Decimal>,
        recent_data: Vec<RecentRow>,
        interpretation: Interpretation,
    },
    /// SMA, EMA
    MovingAverage {
        latest: Option<Decimal>,
        period: usize,
        recent_data: Vec<RecentRow>,
    },
    Bbands {
        upper: Option<Decimal>,
        middle: Option<Decimal>,
        lower: Option<Decimal>,
        period: usize,
        recent_data: Vec<RecentRow>,
    },
    Adx {
        latest: Option<Decimal>,
        period: usize,
        recent_data: Vec<RecentRow>,
        interpretation: Interpretation,
    },
    Stoch {
        k: Option<Decimal>,
        d: Option<Decimal>,
        recent_data: Vec<RecentRow>,
        interpretation: Interpretation,
    },
    /// 미지원 지표 또는 계산 실패
    Error { error: String },
}

impl IndicatorReport {
    /// 에러 항목을 생성합니다.
    pub fn error(message: impl Into<String>) -> Self {
        IndicatorReport::Error {
            error: message.into(),
        }
    }

    /// 에러 항목인지 확인합니다.
    pub fn is_error(&self) -> bool {
        matches!(self, IndicatorReport::Error { .. })
    }

    /// 최근 데이터 행.
    pub fn recent_data(&self) -> &[RecentRow] {
        match self {
            IndicatorReport::Rsi { recent_data, .. }
            | IndicatorReport::Macd { recent_data, .. }
            | IndicatorReport::MovingAverage { recent_data, .. }
            | IndicatorReport::Bbands { recent_data, .. }
            | IndicatorReport::Adx { recent_data, .. }
            | IndicatorReport::Stoch { recent_data, .. } => recent_data,
            IndicatorReport::Error { .. } => &[],
        }
    }

    /// 테이블 출력용 요약 행.
    fn summary(&self, name: &str) -> SummaryRow {
        let (values, note) = match self {
            IndicatorReport::Rsi {
                latest,
                interpretation,
                ..
            }
            | IndicatorReport::Adx {
                latest,
                interpretation,
                ..
            } => (
                format_values(&[("latest", *latest)]),
                interpretation.to_string(),
            ),
            IndicatorReport::Macd {
                latest_macd,
                latest_signal,
                latest_histogram,
                interpretation,
                ..
            } => (
                format_values(&[
                    ("macd", *latest_macd),
                    ("signal", *latest_signal),
                    ("histogram", *latest_histogram),
                ]),
                interpretation.to_string(),
            ),
            IndicatorReport::MovingAverage { latest, .. } => {
                (format_values(&[("latest", *latest)]), String::new())
            }
            IndicatorReport::Bbands {
                upper,
                middle,
                lower,
                ..
            } => (
                format_values(&[("upper", *upper), ("middle", *middle), ("lower", *lower)]),
                String::new(),
            ),
            IndicatorReport::Stoch {
                k,
                d,
                interpretation,
                ..
            } => (
                format_values(&[("k", *k), ("d", *d)]),
                interpretation.to_string(),
            ),
            IndicatorReport::Error { error } => (String::new(), error.clone()),
        };

        SummaryRow {
            indicator: name.to_string(),
            values,
            interpretation: note,
        }
    }
}

fn format_values(values: &[(&str, Option<Decimal>)]) -> String {
    values
        .iter()
        .map(|(name, value)| match value {
            Some(v) => format!("{}={}", name, v.round_dp(4).normalize()),
            None => format!("{}=-", name),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// 테이블 출력용 지표 요약 행.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub indicator: String,
    pub values: String,
    pub interpretation: String,
}

/// 종목의 기술적 분석 리포트.
///
/// `indicators`는 요청 순서를 유지한 JSON 객체로 직렬화됩니다.
#[derive(Debug, Clone, PartialEq)]
pub struct TechnicalReport {
    pub symbol: String,
    pub indicators: Vec<(String, IndicatorReport)>,
}

impl TechnicalReport {
    /// 이름으로 지표 리포트를 찾습니다.
    pub fn get(&self, name: &str) -> Option<&IndicatorReport> {
        self.indicators
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, report)| report)
    }

    /// 지표별 요약 행 (테이블 출력용).
    pub fn summary_rows(&self) -> Vec<SummaryRow> {
        self.indicators
            .iter()
            .map(|(name, report)| report.summary(name))
            .collect()
    }
}

struct OrderedIndicators<'a>(&'a [(String, IndicatorReport)]);

impl Serialize for OrderedIndicators<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, report) in self.0 {
            map.serialize_entry(name, report)?;
        }
        map.end()
    }
}

impl Serialize for TechnicalReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TechnicalReport", 2)?;
        state.serialize_field("symbol", &self.symbol)?;
        state.serialize_field("indicators", &OrderedIndicators(&self.indicators))?;
        state.end()
    }
}

/// 지표 열 이름과 값 시계열.
type Columns = Vec<(String, Vec<Option<Decimal>>)>;

/// 기술적 분석기.
///
/// MACD(12,26,9)와 스토캐스틱(14,3,3)은 고정 파라미터를 사용하고,
/// 나머지 지표는 `period`를 사용합니다.
#[derive(Debug)]
pub struct TechnicalAnalyzer {
    engine: IndicatorEngine,
    period: usize,
    recent_rows: usize,
}

impl Default for TechnicalAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD)
    }
}

impl TechnicalAnalyzer {
    /// 지표 기간으로 분석기를 생성합니다.
    pub fn new(period: usize) -> Self {
        Self {
            engine: IndicatorEngine::new(),
            period,
            recent_rows: DEFAULT_RECENT_ROWS,
        }
    }

    /// 지표별 최근 행 수를 설정합니다.
    pub fn with_recent_rows(mut self, recent_rows: usize) -> Self {
        self.recent_rows = recent_rows;
        self
    }

    /// 리포트를 생성합니다.
    ///
    /// `candles`는 오래된 것부터 정렬되어 있어야 합니다.
    pub fn analyze(
        &self,
        symbol: &str,
        candles: &[Candle],
        requests: &[IndicatorRequest],
    ) -> TechnicalReport {
        debug!(
            symbol,
            candles = candles.len(),
            period = self.period,
            "Computing technical indicators"
        );

        let indicators = requests
            .iter()
            .map(|request| {
                let report = match request {
                    IndicatorRequest::Supported(kind) => {
                        self.compute(*kind, candles).unwrap_or_else(|e| {
                            warn!(indicator = %kind, error = %e, "Indicator calculation failed");
                            IndicatorReport::error(e.to_string())
                        })
                    }
                    IndicatorRequest::Unsupported(name) => {
                        IndicatorReport::error(format!("Unsupported indicator: {}", name))
                    }
                };
                (request.name().to_string(), report)
            })
            .collect();

        TechnicalReport {
            symbol: symbol.to_string(),
            indicators,
        }
    }

    fn compute(&self, kind: IndicatorKind, candles: &[Candle]) -> IndicatorResult<IndicatorReport> {
        let (high, low, close) = split_hlc(candles);
        let period = self.period;

        let report = match kind {
            IndicatorKind::Rsi => {
                let rsi = self.engine.rsi(&close, RsiParams { period })?;
                let latest = last_value(&rsi);
                IndicatorReport::Rsi {
                    latest,
                    period,
                    recent_data: self.recent(candles, vec![(format!("RSI_{}", period), rsi)]),
                    interpretation: interpret_rsi(latest),
                }
            }
            IndicatorKind::Macd => {
                let params = MacdParams::default();
                let macd = self.engine.macd(&close, params)?;
                let suffix = format!(
                    "{}_{}_{}",
                    params.fast_period, params.slow_period, params.signal_period
                );
                let latest = macd.last().copied().unwrap_or_default();
                let columns = vec![
                    (
                        format!("MACD_{}", suffix),
                        macd.iter().map(|m| m.macd).collect(),
                    ),
                    (
                        format!("MACDh_{}", suffix),
                        macd.iter().map(|m| m.histogram).collect(),
                    ),
                    (
                        format!("MACDs_{}", suffix),
                        macd.iter().map(|m| m.signal).collect(),
                    ),
                ];
                IndicatorReport::Macd {
                    latest_macd: latest.macd,
                    latest_signal: latest.signal,
                    latest_histogram: latest.histogram,
                    recent_data: self.recent(candles, columns),
                    interpretation: interpret_macd(latest.macd, latest.signal, latest.histogram),
                }
            }
            IndicatorKind::Sma => {
                let sma = self.engine.sma(&close, SmaParams { period })?;
                IndicatorReport::MovingAverage {
                    latest: last_value(&sma),
                    period,
                    recent_data: self.recent(candles, vec![(format!("SMA_{}", period), sma)]),
                }
            }
            IndicatorKind::Ema => {
                let ema = self.engine.ema(&close, EmaParams { period })?;
                IndicatorReport::MovingAverage {
                    latest: last_value(&ema),
                    period,
                    recent_data: self.recent(candles, vec![(format!("EMA_{}", period), ema)]),
                }
            }
            IndicatorKind::Bbands => {
                let params = BollingerBandsParams {
                    period,
                    ..Default::default()
                };
                let bands = self.engine.bollinger_bands(&close, params)?;
                let suffix = format!("{}_{:.1}", period, params.std_dev_multiplier);
                let latest = bands.last().copied().unwrap_or_default();
                let columns = vec![
                    (
                        format!("BBL_{}", suffix),
                        bands.iter().map(|b| b.lower).collect(),
                    ),
                    (
                        format!("BBM_{}", suffix),
                        bands.iter().map(|b| b.middle).collect(),
                    ),
                    (
                        format!("BBU_{}", suffix),
                        bands.iter().map(|b| b.upper).collect(),
                    ),
                    (
                        format!("BBB_{}", suffix),
                        bands.iter().map(|b| b.bandwidth).collect(),
                    ),
                    (
                        format!("BBP_{}", suffix),
                        bands.iter().map(|b| b.percent_b).collect(),
                    ),
                ];
                IndicatorReport::Bbands {
                    upper: latest.upper,
                    middle: latest.middle,
                    lower: latest.lower,
                    period,
                    recent_data: self.recent(candles, columns),
                }
            }
            IndicatorKind::Adx => {
                let adx = self.engine.adx(&high, &low, &close, AdxParams { period })?;
                let latest = adx.last().and_then(|a| a.adx);
                let columns = vec![
                    (
                        format!("ADX_{}", period),
                        adx.iter().map(|a| a.adx).collect(),
                    ),
                    (
                        format!("DMP_{}", period),
                        adx.iter().map(|a| a.plus_di).collect(),
                    ),
                    (
                        format!("DMN_{}", period),
                        adx.iter().map(|a| a.minus_di).collect(),
                    ),
                ];
                IndicatorReport::Adx {
                    latest,
                    period,
                    recent_data: self.recent(candles, columns),
                    interpretation: interpret_adx(latest),
                }
            }
            IndicatorKind::Stoch => {
                let params = StochasticParams::default();
                let stoch = self.engine.stochastic(&high, &low, &close, params)?;
                let suffix = format!(
                    "{}_{}_{}",
                    params.k_period, params.d_period, params.smooth_k
                );
                let latest = stoch.last().copied().unwrap_or_default();
                let columns = vec![
                    (
                        format!("STOCHk_{}", suffix),
                        stoch.iter().map(|s| s.k).collect(),
                    ),
                    (
                        format!("STOCHd_{}", suffix),
                        stoch.iter().map(|s| s.d).collect(),
                    ),
                ];
                IndicatorReport::Stoch {
                    k: latest.k,
                    d: latest.d,
                    recent_data: self.recent(candles, columns),
                    interpretation: interpret_stochastic(latest.k, latest.d),
                }
            }
        };

        Ok(report)
    }

    /// 마지막 `recent_rows`개 캔들에 지표 열을 붙입니다.
    fn recent(&self, candles: &[Candle], columns: Columns) -> Vec<RecentRow> {
        let start = candles.len().saturating_sub(self.recent_rows);
        candles[start..]
            .iter()
            .enumerate()
            .map(|(offset, candle)| {
                let i = start + offset;
                let values = columns
                    .iter()
                    .map(|(name, series)| (name.clone(), series.get(i).copied().flatten()))
                    .collect();
                RecentRow {
                    date: candle.date,
                    open: candle.open,
                    high: candle.high,
                    low: candle.low,
                    close: candle.close,
                    volume: candle.volume,
                    values,
                }
            })
            .collect()
    }
}

fn last_value(series: &[Option<Decimal>]) -> Option<Decimal> {
    series.last().copied().flatten()
}
