//! 주식 조회 CLI.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 명령행 인자 정의 (`quote`, `history`, `news`, `technical`)
//! - 선택된 제공자로 명령 실행
//! - JSON / 테이블 출력

pub mod cli;
pub mod commands;
pub mod output;
pub mod progress;

pub use cli::{Cli, Command, OutputFormat};
pub use commands::{error_json, execute, CommandContext};
