//! 도구 전반에서 사용되는 공통 타입.

mod date_range;
mod decimal;
mod interval;
mod ticker;

pub use date_range::*;
pub use decimal::*;
pub use interval::*;
pub use ticker::*;
