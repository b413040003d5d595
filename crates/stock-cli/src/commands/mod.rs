//! CLI 명령어 구현 모듈.
//!
//! 각 명령은 선택된 제공자를 한 번(시세는 종목당 한 번) 호출하고,
//! 결과를 출력 형식에 맞춘 문자열로 돌려줍니다.

pub mod history;
pub mod news;
pub mod quote;
pub mod technical;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::debug;

use stock_core::{AppConfig, TechnicalConfig};
use stock_data::{MarketDataProvider, ProviderRegistry};

use crate::cli::{Command, OutputFormat};

/// 명령 실행에 필요한 공통 상태.
pub struct CommandContext {
    /// 사용 가능한 제공자
    pub registry: ProviderRegistry,
    /// `--provider`가 없을 때 사용할 제공자 이름
    pub default_provider: String,
    /// 기술적 분석 설정
    pub technical: TechnicalConfig,
    /// 출력 형식
    pub format: OutputFormat,
    /// 기준일 (기본 조회 기간 계산용)
    pub today: NaiveDate,
}

impl CommandContext {
    /// 설정에서 제공자 레지스트리를 구성합니다.
    pub fn from_config(config: &AppConfig, format: OutputFormat) -> Result<Self> {
        let registry = ProviderRegistry::from_config(&config.providers)?;
        Ok(Self::new(registry, format)
            .with_default_provider(&config.providers.default)
            .with_technical(config.technical.clone()))
    }

    /// 기본 설정으로 컨텍스트를 생성합니다.
    pub fn new(registry: ProviderRegistry, format: OutputFormat) -> Self {
        let defaults = AppConfig::default();
        Self {
            registry,
            default_provider: defaults.providers.default,
            technical: defaults.technical,
            format,
            today: Local::now().date_naive(),
        }
    }

    pub fn with_default_provider(mut self, name: &str) -> Self {
        self.default_provider = name.to_string();
        self
    }

    pub fn with_technical(mut self, technical: TechnicalConfig) -> Self {
        self.technical = technical;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// `--provider` 값(없으면 기본 제공자)으로 제공자를 선택합니다.
    pub fn provider(&self, name: Option<&str>) -> Result<Arc<dyn MarketDataProvider>> {
        let name = name.unwrap_or(&self.default_provider);
        let provider = self.registry.get(name)?;
        debug!(provider = provider.name(), "Provider selected");
        Ok(provider)
    }
}

/// 명령을 실행하고 출력 문자열을 반환합니다.
pub async fn execute(command: &Command, ctx: &CommandContext) -> Result<String> {
    match command {
        Command::Quote(args) => quote::run(args, ctx).await,
        Command::History(args) => history::run(args, ctx).await,
        Command::News(args) => news::run(args, ctx).await,
        Command::Technical(args) => technical::run(args, ctx).await,
    }
}

/// 실패 시 stdout에 출력하는 JSON.
pub fn error_json(error: &anyhow::Error, symbol: &str) -> String {
    serde_json::json!({
        "error": format!("{:#}", error),
        "symbol": symbol,
    })
    .to_string()
}
