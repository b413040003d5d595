//! 조회 결과를 담는 도메인 모델.

mod market_data;
mod news;

pub use market_data::*;
pub use news::*;
