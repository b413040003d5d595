//! 제공자 레지스트리.
//!
//! `--provider` 인자의 이름을 실제 제공자 구현으로 해석합니다.

use std::sync::Arc;
use tracing::debug;

use stock_core::ProvidersConfig;

use super::{FmpProvider, MarketDataProvider, YahooFinanceProvider};
use crate::error::{DataError, Result};
use crate::http::build_client;

/// 이름으로 조회 가능한 제공자 목록.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn MarketDataProvider>>,
}

impl ProviderRegistry {
    /// 빈 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 설정으로 기본 제공자(yfinance, fmp)를 등록합니다.
    ///
    /// 모든 제공자는 하나의 HTTP 클라이언트를 공유합니다.
    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        let client = build_client(config)?;

        let mut registry = Self::new();
        registry.register(Arc::new(YahooFinanceProvider::new(
            client.clone(),
            &config.yahoo,
        )));
        registry.register(Arc::new(FmpProvider::new(client, &config.fmp)));

        debug!(providers = ?registry.names(), "Provider registry initialized");
        Ok(registry)
    }

    /// 제공자를 등록합니다. 같은 이름이 있으면 교체합니다.
    pub fn register(&mut self, provider: Arc<dyn MarketDataProvider>) {
        self.providers.retain(|p| p.name() != provider.name());
        self.providers.push(provider);
    }

    /// 이름 또는 별칭으로 제공자를 찾습니다 (대소문자 무시).
    pub fn get(&self, name: &str) -> Result<Arc<dyn MarketDataProvider>> {
        let wanted = name.trim().to_lowercase();
        self.providers
            .iter()
            .find(|p| p.name() == wanted || p.aliases().contains(&wanted.as_str()))
            .cloned()
            .ok_or_else(|| DataError::UnknownProvider {
                name: name.to_string(),
                supported: self.names().join(", "),
            })
    }

    /// 등록된 제공자 이름 목록.
    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}
