//! Launch one pod from an application template and supervise it to completion.
mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use hb_core::{ShutdownListener, SupervisionResult, Supervisor};
use hb_launch::{HumpbackConfig, LaunchPlan};
use hb_observe::{LoggerConfig, init_local_offset, init_logger};

use crate::cli::Args;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // usage errors are startup failures, not clap's status 2
            let _ = e.print();
            return ExitCode::from(cli::parse_failure_code(&e));
        }
    };

    // must run while the process is still single-threaded
    init_local_offset();

    let cfg = LoggerConfig {
        format: args.log_format,
        level: args.log_level.clone(),
        tz: args.log_tz,
        ..Default::default()
    };
    if let Err(e) = init_logger(&cfg) {
        eprintln!("humpback: failed to initialize logger: {e}");
        return ExitCode::FAILURE;
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to start runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args)) {
        Ok(result) => {
            info!(
                trigger = %result.trigger,
                exit_code = result.exit_code(),
                "exiting"
            );
            ExitCode::from(result.exit_code())
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "humpback failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<SupervisionResult> {
    // installed first so a signal during setup is not lost
    let listener = ShutdownListener::register().context("failed to install signal handlers")?;

    let config = HumpbackConfig::load(&args.config_dir)?;
    let app = config.resolve(&args.application, &args.command)?;
    let plan = LaunchPlan::build(&args.config_dir, app).await?;

    let cluster = hb_kube::connect(args.kubeconfig.as_deref())
        .await
        .context("failed to build kubernetes client")?;
    let key = cluster
        .create_workload(&args.namespace, &plan.manifest)
        .await
        .context("failed to create workload")?;
    info!(workload = %key, selector = %plan.selector, "supervising");

    let result = Supervisor::new(Arc::new(cluster), args.namespace.clone(), plan.selector)
        .with_config(config.supervisor)
        .with_known_workload(key)
        .run(listener.recv())
        .await?;
    Ok(result)
}
