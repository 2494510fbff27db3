//! rdsing - restore the latest RDS snapshot or destroy an instance

use anyhow::Result;
use clap::Parser;
use rdsing::aws::{AwsContext, RdsClient, classify_anyhow_error};
use rdsing::cli::{self, Args};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const SDK_DIRECTIVES: &str = "aws_config=warn,aws_smithy_runtime=warn,aws_sdk_rds=warn";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print error in a user-friendly way
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();

    let _ = writeln!(stderr, "An error occured! {e}");

    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  Caused by: {cause}");
        source = cause.source();
    }

    if let Some(suggestion) = classify_anyhow_error(e).and_then(|aws| aws.suggestion()) {
        let _ = writeln!(stderr, "\nHint: {suggestion}");
    }

    if std::env::var("RUST_BACKTRACE").is_ok() {
        let backtrace = e.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            let _ = writeln!(stderr, "\nBacktrace:\n{backtrace}");
        }
    }
}

/// Logs go to stderr so stdout only carries the command result.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new(format!("rdsing=debug,{SDK_DIRECTIVES}"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("rdsing=info,{SDK_DIRECTIVES}")))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let args = Args::parse();
    let common = args.command.common();

    init_tracing(common.debug);

    let aws_config = common.aws_config();
    if let Some(profile) = &aws_config.profile {
        info!(profile = %profile, "Using AWS profile");
    }
    let ctx = AwsContext::with_profile(&aws_config.region, aws_config.profile.as_deref()).await;
    let rds = RdsClient::from_context(&ctx);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, no further RDS changes will be made");
                cancel.cancel();
            }
        });
    }

    let output = cli::execute(&args.command, &rds, Some(&cancel)).await?;
    println!("{output}");
    Ok(())
}
