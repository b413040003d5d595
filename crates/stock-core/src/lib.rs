//! # Stock Core
//!
//! 주식 조회 도구의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 도구 전반에서 사용되는 기본 타입을 제공합니다:
//! - 시세, 캔들(OHLCV), 뉴스 레코드
//! - 티커, 캔들 간격, 날짜 범위 정의
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
