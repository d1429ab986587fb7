use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;

use hb_observe::{LoggerFormat, LoggerLevel, LoggerTimeZone};

#[derive(Debug, Parser)]
#[command(name = "humpback", version)]
#[command(
    about = "Deploy a pod and follow it until completion",
    long_about = "Deploy a pod rendered from an application template and follow it until \
                  completion, forwarding its output. The exit code reports the outcome, which \
                  makes humpback easy to call from external job schedulers."
)]
pub struct Args {
    /// Application to run, as named in humpback.yaml
    #[arg(short = 'a', long)]
    pub application: String,

    /// Command passed to the application's container
    #[arg(short = 'c', long)]
    pub command: String,

    /// Namespace to deploy the pod into
    #[arg(short = 'n', long)]
    pub namespace: String,

    /// Kubeconfig to use when running outside the cluster
    #[arg(short = 'k', long)]
    pub kubeconfig: Option<PathBuf>,

    /// Directory containing humpback.yaml
    #[arg(short = 'p', long = "appconfig-path", default_value = ".")]
    pub config_dir: PathBuf,

    /// Log filter, e.g. `info` or `hb_core=debug,kube=warn,info`
    #[arg(long, default_value = "info")]
    pub log_level: LoggerLevel,

    /// Log output format
    #[arg(long, default_value = "text")]
    pub log_format: LoggerFormat,

    /// Timezone of log timestamps (utc or local)
    #[arg(long, default_value = "utc")]
    pub log_tz: LoggerTimeZone,
}

/// Process exit status for a rejected command line.
///
/// Help and version requests succeed; every other parse error is a startup failure (1).
pub fn parse_failure_code(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}
