use pr_view::config::{Settings, env_keys};
use pr_view::run::{self, UsageError};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    match run::run(args, Settings::from_env, None).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if err.downcast_ref::<UsageError>().is_some() {
                eprintln!("{err}");
            } else {
                eprintln!("error: {err:#}");
            }
            ExitCode::from(run::exit_code(&err))
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(env_keys::LOG).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
