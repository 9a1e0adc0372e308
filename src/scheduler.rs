//! Job scheduling: a bounded queue fans (ciphertext, separator) jobs out to
//! a fixed pool of worker threads, each running the full
//! permute → partition → analyze pipeline to exhaustion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crossbeam_channel::{bounded, Sender};
use tracing::{info, warn};

use crate::ciphertext::{self, K4};
use crate::error::{AnalysisError, Result};
use crate::frequency;
use crate::partition::Partitioner;
use crate::permute::Permutations;
use crate::report::{self, DiscoverySink};
use crate::stats::StatsRecorder;
use crate::types::Job;

/// Backpressure bound: the producer blocks once this many jobs are queued.
pub const JOB_QUEUE_CAPACITY: usize = 1000;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// The target ciphertext (already upper-cased).
    pub ciphertext: String,

    /// Continuous simulation mode: analyze an endless stream of random
    /// pseudo-K4s instead of the fixed target.
    pub simulate: bool,

    /// Worker pool size.
    pub workers: usize,
}

/// Runs the analysis to completion (single-target mode) or until the
/// cancellation flag is raised (simulation mode, or Ctrl-C in either mode).
///
/// Blocks the calling thread; the pool is joined before returning, so no
/// worker outlives this call.
pub fn run(
    config: SchedulerConfig,
    recorder: Arc<StatsRecorder>,
    sink: Arc<Mutex<DiscoverySink>>,
    cancel: Arc<AtomicBool>,
) -> Result<()> {
    let worker_count = config.workers.max(1);
    let (job_tx, job_rx) = bounded::<Job>(JOB_QUEUE_CAPACITY);

    info!(workers = worker_count, simulate = config.simulate, "starting analysis worker pool");

    // Single shared channel: workers compete for jobs, which balances load
    // when segment counts differ wildly between separators.
    let mut handles = Vec::with_capacity(worker_count);
    for worker_idx in 0..worker_count {
        let rx = job_rx.clone();
        let worker_recorder = Arc::clone(&recorder);
        let worker_sink = Arc::clone(&sink);
        let worker_cancel = Arc::clone(&cancel);

        let handle = thread::Builder::new()
            .name(format!("analysis-worker-{worker_idx}"))
            .spawn(move || {
                for job in rx.iter() {
                    run_analysis(&job, &worker_cancel, &worker_recorder, &worker_sink);
                }
            })
            .map_err(AnalysisError::Io)?;
        handles.push(handle);
    }
    drop(job_rx);

    let produced = produce_jobs(&config, &recorder, &job_tx, &cancel);

    // Close the queue: workers drain what is left, then exit.
    drop(job_tx);
    for handle in handles {
        if handle.join().is_err() {
            return Err(AnalysisError::Pool(
                "analysis worker thread panicked".to_string(),
            ));
        }
    }

    produced
}

/// Enqueues one job per separator per cycle. Single-target mode runs one
/// cycle; simulation mode generates a fresh pseudo-K4 each cycle and loops
/// until cancelled. The bounded queue provides backpressure.
fn produce_jobs(
    config: &SchedulerConfig,
    recorder: &StatsRecorder,
    job_tx: &Sender<Job>,
    cancel: &AtomicBool,
) -> Result<()> {
    let mut simulation_id = 0u64;

    loop {
        let ciphertext: Arc<str> = if config.simulate {
            simulation_id += 1;
            recorder.set_trials(simulation_id);
            Arc::from(ciphertext::random_ciphertext(K4.len())?)
        } else {
            Arc::from(config.ciphertext.as_str())
        };

        for separator in 'A'..='Z' {
            if cancel.load(Ordering::Relaxed) {
                return Ok(());
            }
            let job = Job::new(Arc::clone(&ciphertext), separator, simulation_id);
            if job_tx.send(job).is_err() {
                return Ok(());
            }
        }

        if !config.simulate || cancel.load(Ordering::Relaxed) {
            return Ok(());
        }
    }
}

/// Processes one job to exhaustion: every ordering of the segments, every
/// newly seen equal-length partition, every shape comparison.
///
/// The inner loop is strictly sequential, so the job-scoped dedup set needs
/// no synchronization. The cancellation flag is checked between orderings,
/// never mid-ordering; once it is raised no further collection is reported.
fn run_analysis(
    job: &Job,
    cancel: &AtomicBool,
    recorder: &StatsRecorder,
    sink: &Mutex<DiscoverySink>,
) {
    // a doublet separator (e.g. the "SS" in the target for separator 'S')
    // makes segmentation ambiguous: skip, not an error
    if ciphertext::has_doublet_separator(&job.ciphertext, job.separator) {
        return;
    }

    let segments = ciphertext::split_segments(&job.ciphertext, job.separator);
    let mut partitioner = Partitioner::new();

    for ordering in Permutations::new(segments) {
        if cancel.load(Ordering::Relaxed) {
            return;
        }

        for mut collection in partitioner.suitable_collections(&ordering) {
            if !frequency::have_identical_shapes(&mut collection) {
                continue;
            }

            // one critical section covers the report and the counters, so
            // one worker's full report is never interleaved with another's
            let mut sink = sink.lock().unwrap();
            if let Err(err) = report::write_discovery(sink.writer(), job, &collection) {
                warn!("failed to write discovery report: {err}");
            }
            recorder.record(&job.ciphertext, &collection.groups);
        }
    }
}
