//! 제공자 공통 HTTP 처리.
//!
//! HTTP 상태 코드를 `DataError`로 매핑하고, 제공자 응답 본문에서
//! 사람이 읽을 수 있는 에러 메시지를 추출합니다.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use stock_core::ProvidersConfig;

use crate::error::{DataError, Result};

/// 에러 메시지로 사용할 본문 최대 길이.
const MAX_ERROR_BODY: usize = 200;

/// 설정의 타임아웃과 User-Agent로 HTTP 클라이언트를 생성합니다.
pub(crate) fn build_client(config: &ProvidersConfig) -> Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| DataError::ConfigError(format!("HTTP client: {}", e)))
}

/// 응답 본문을 읽고, 성공 상태면 JSON으로 파싱합니다.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response, context: &str) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    debug!(status = status.as_u16(), bytes = body.len(), "{} response", context);

    if !status.is_success() {
        return Err(status_error(status.as_u16(), &body, context));
    }

    serde_json::from_str(&body).map_err(|e| DataError::ParseError(format!("{}: {}", context, e)))
}

/// HTTP 상태 코드를 에러 종류로 매핑합니다.
pub(crate) fn status_error(status: u16, body: &str, context: &str) -> DataError {
    let detail = extract_error_message(body).unwrap_or_else(|| truncate(body.trim()));
    let message = if detail.is_empty() {
        context.to_string()
    } else {
        format!("{} - {}", context, detail)
    };

    match status {
        401 | 403 => DataError::Auth(message),
        404 => DataError::NotFound(message),
        429 => DataError::RateLimited(message),
        _ => DataError::Api { status, message },
    }
}

/// 알려진 에러 본문 형식에서 메시지를 꺼냅니다.
///
/// - Yahoo chart: `{"chart":{"error":{"description":...}}}`
/// - Yahoo search: `{"finance":{"error":{"description":...}}}`
/// - FMP: `{"Error Message": ...}`
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    [
        "/chart/error/description",
        "/finance/error/description",
        "/Error Message",
        "/error",
        "/message",
    ]
    .iter()
    .find_map(|pointer| value.pointer(pointer).and_then(|v| v.as_str()))
    .map(str::to_string)
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY).collect()
}
