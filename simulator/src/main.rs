use anyhow::Context;
use clap::Parser;
use generator::profile::build_requests;
use http_bridge::bridge::HttpBridge;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod http_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Replays animal detections through the pin placement core")]
struct Args {
    /// Replay a batch of synthetic detections and print a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 24)]
    detections: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Bound on each repository call, in milliseconds
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,
    /// Append the offline summary to this file
    #[arg(long)]
    report: Option<PathBuf>,
    /// Keep the HTTP bridge alive for incoming detections
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long, default_value = "127.0.0.1:9000")]
    bind: SocketAddr,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.detections, args.seed, args.timeout_ms)
    };

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime")?;
    runtime.block_on(run(args, workflow_config))
}

async fn run(args: Args, workflow_config: WorkflowConfig) -> anyhow::Result<()> {
    let runner = Runner::new(&workflow_config)?;

    if args.offline {
        let requests = build_requests(&workflow_config.generator, &workflow_config.cameras)?;
        let result = runner.execute(&requests).await;

        println!(
            "Offline run -> placed {}, first pins {}, fallbacks {}, degraded {}, failures {}",
            result.metrics.placed,
            result.metrics.first_pins,
            result.metrics.fallbacks,
            result.metrics.degraded,
            result.failures.len()
        );
        for failure in &result.failures {
            println!("  failed {}", failure);
        }

        if let Some(report_path) = &args.report {
            let report = format!(
                "placed={} fallbacks={} degraded={} failures={} tally={:?}\n",
                result.placed.len(),
                result.metrics.fallbacks,
                result.metrics.degraded,
                result.failures.len(),
                result.tally
            );
            if let Some(parent) = report_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(report_path)
                .with_context(|| format!("opening report {}", report_path.display()))?;
            file.write_all(report.as_bytes())?;
        }
    }

    if args.serve {
        println!("[bridge] listening on {} (Ctrl+C to stop)...", args.bind);
        let bridge = HttpBridge::new(runner);
        tokio::select! {
            _ = bridge.serve(args.bind) => {}
            result = signal::ctrl_c() => {
                result.context("awaiting Ctrl+C to exit")?;
            }
        }
    }

    Ok(())
}
