//! 제공자 호출 중 진행 표시.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::future::Future;
use std::time::Duration;

/// stderr 스피너를 띄운 채 `future`를 실행합니다.
///
/// stderr가 터미널이 아니면 아무것도 그리지 않습니다.
pub async fn with_spinner<F, T>(message: impl Into<String>, future: F) -> T
where
    F: Future<Output = T>,
{
    let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = future.await;
    pb.finish_and_clear();
    result
}
