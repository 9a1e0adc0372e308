use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use k4sieve::cli::Args;
use k4sieve::report::DiscoverySink;
use k4sieve::scheduler::{self, SchedulerConfig};
use k4sieve::stats::{StatsRecorder, STATS_FILE};

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Err(err) = args.validate() {
        eprintln!("Invalid arguments: {err}");
        std::process::exit(1);
    }

    let recorder = Arc::new(StatsRecorder::new(STATS_FILE));
    recorder.start();

    let sink = Arc::new(Mutex::new(DiscoverySink::stdout()));
    let cancel = Arc::new(AtomicBool::new(false));

    let config = SchedulerConfig {
        ciphertext: args.resolved_ciphertext(),
        simulate: args.sim,
        workers: args.workers,
    };

    let scheduler_recorder = Arc::clone(&recorder);
    let scheduler_cancel = Arc::clone(&cancel);
    let mut analysis = tokio::task::spawn_blocking(move || {
        scheduler::run(config, scheduler_recorder, sink, scheduler_cancel)
    });

    tokio::select! {
        finished = &mut analysis => {
            finished.context("analysis task failed")??;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, cancelling analysis");
            cancel.store(true, Ordering::Relaxed);
            analysis.await.context("analysis task failed")??;
        }
    }

    recorder.shutdown().await;

    println!("Analysis Completed.");
    println!("Same shapes:\t{}", recorder.same_shape_count());
    println!("K4-like:\t{}", recorder.k4_like_count());

    Ok(())
}
