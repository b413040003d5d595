//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 데이터 조회 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 네트워크 오류 (연결 실패, 타임아웃)
    #[error("Network error: {0}")]
    Network(String),

    /// 요청 한도 초과
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// 종목/데이터를 찾을 수 없음
    #[error("Not found: {0}")]
    NotFound(String),

    /// 인증 오류 (API 키 누락/무효)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// 제공자 API 오류
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// 응답 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 잘못된 데이터 형식
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// 등록되지 않은 제공자
    #[error("Unknown provider: {name}. Supported: {supported}")]
    UnknownProvider { name: String, supported: String },

    /// 제공자가 지원하지 않는 요청
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DataError::ParseError(err.to_string())
        } else if err.is_timeout() {
            DataError::Network(format!("request timed out: {}", err))
        } else {
            DataError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::ParseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_message() {
        let err = DataError::UnknownProvider {
            name: "bloomberg".to_string(),
            supported: "yfinance, fmp".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown provider: bloomberg. Supported: yfinance, fmp"
        );
    }
}
