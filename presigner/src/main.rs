use std::process::ExitCode;

use clap::Parser;
use presigner::{
    cli::{requested_operation, Cli},
    commands, report, telemetry,
    types::PresignError,
};
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let result = match Cli::try_parse() {
        Ok(cli) => commands::execute(cli).await,
        // --help and --version
        Err(err) if !err.use_stderr() => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let args: Vec<String> = std::env::args().skip(1).collect();
            let operation =
                requested_operation(&args).map_or_else(|| "none".to_string(), |op| op.to_string());
            let err = PresignError::from(err);
            error!(operation = %operation, args = ?args, kind = err.kind(), "{err}");
            Err(err)
        }
    };

    ExitCode::from(report::report(&result))
}
