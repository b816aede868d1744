use std::io;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let mut out = io::stdout().lock();
    let code = image_annotator::cli::run_with(
        std::env::args_os(),
        |key| std::env::var(key).ok(),
        &mut out,
    )
    .await;
    ExitCode::from(code)
}
