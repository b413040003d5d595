//! 설정 관리.
//!
//! 기본값 → 설정 파일(TOML) → 환경 변수(`STOCK__...`) 순으로 덮어씁니다.

use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;

use crate::error::CoreResult;

/// 기본 설정 파일 이름 (확장자 제외, 작업 디렉토리 기준).
pub const DEFAULT_CONFIG_NAME: &str = "stock-tool";

/// 환경 변수 접두사.
pub const ENV_PREFIX: &str = "STOCK";

/// 애플리케이션 설정.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 데이터 제공자 설정
    pub providers: ProvidersConfig,
    /// 기술적 분석 설정
    pub technical: TechnicalConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

/// 데이터 제공자 설정.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// `--provider`가 없을 때 사용할 제공자
    pub default: String,
    /// HTTP 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// HTTP User-Agent
    pub user_agent: String,
    /// Yahoo Finance 설정
    pub yahoo: YahooConfig,
    /// Financial Modeling Prep 설정
    pub fmp: FmpConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            default: "yfinance".to_string(),
            timeout_secs: 15,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            yahoo: YahooConfig::default(),
            fmp: FmpConfig::default(),
        }
    }
}

/// Yahoo Finance 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct YahooConfig {
    /// API 기본 URL
    pub base_url: String,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
        }
    }
}

/// Financial Modeling Prep 설정.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FmpConfig {
    /// API 기본 URL
    pub base_url: String,
    /// API 키
    pub api_key: Option<SecretString>,
}

impl Default for FmpConfig {
    fn default() -> Self {
        Self {
            base_url: "https://financialmodelingprep.com".to_string(),
            api_key: None,
        }
    }
}

/// 기술적 분석 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TechnicalConfig {
    /// `--start`가 없을 때 조회할 과거 일수
    pub lookback_days: i64,
    /// 지표별로 출력할 최근 행 수
    pub recent_rows: usize,
}

impl Default for TechnicalConfig {
    fn default() -> Self {
        Self {
            lookback_days: 365,
            recent_rows: 10,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// `path`가 주어지면 해당 파일이 반드시 있어야 하고, 없으면
    /// 작업 디렉토리의 `stock-tool.toml`을 선택적으로 읽습니다.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let builder = config::Config::builder()
            .add_source(file)
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}
