//! 주식 조회 도구.
//!
//! # 사용 예시
//!
//! ```bash
//! # 실시간 시세 (여러 종목)
//! stock-tool quote AAPL,MSFT
//!
//! # 과거 데이터 (주봉, 테이블 출력)
//! stock-tool -f table history AAPL --start 2024-01-01 --interval 1wk
//!
//! # 뉴스
//! stock-tool news AAPL --limit 5
//!
//! # 기술적 분석
//! stock-tool technical AAPL --indicators rsi,macd,bbands --period 20
//!
//! # FMP 제공자 (API 키 필요)
//! STOCK__PROVIDERS__FMP__API_KEY=... stock-tool quote AAPL -p fmp
//! ```

use clap::Parser;
use std::process::ExitCode;
use tracing::error;

use stock_cli::{error_json, execute, Cli, CommandContext};
use stock_core::{init_logging, AppConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // .env 파일이 있으면 환경 변수로 로드
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // 설정 로드가 실패해도 오류 로그가 남도록 구독자를 먼저 설치
    let config = AppConfig::load(cli.config.as_deref());
    if let Err(e) = init_logging(cli.log_config(config.as_ref().ok())) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = match config {
        Ok(config) => run(&cli, &config).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(
                command = cli.command.name(),
                symbol = cli.command.symbol(),
                "Command failed: {:#}",
                e
            );
            println!("{}", error_json(&e, cli.command.symbol()));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, config: &AppConfig) -> anyhow::Result<String> {
    let ctx = CommandContext::from_config(config, cli.format)?;
    execute(&cli.command, &ctx).await
}
