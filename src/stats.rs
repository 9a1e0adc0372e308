//! Process-wide discovery statistics with periodic durable snapshots.
//!
//! The recorder is the only state shared across workers. Counter updates
//! happen under one mutex; all file writes go through a single background
//! flusher task, so timer-triggered and event-triggered snapshots can never
//! tear each other.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time;
use tracing::warn;

use crate::error::Result;
use crate::types::Group;

/// Fixed name of the persisted statistics artifact.
pub const STATS_FILE: &str = "stats.txt";

const FLUSH_INTERVAL: Duration = Duration::from_secs(60);
const FLUSH_QUEUE_CAPACITY: usize = 16;

/// Whether every segment in every group is longer than 2 characters.
///
/// Tiny segments make a grouping uninteresting regardless of its shape.
pub fn segments_are_appropriately_sized(groups: &[Group]) -> bool {
    groups
        .iter()
        .all(|group| group.segments.iter().all(|segment| segment.len() > 2))
}

/// Whether the groups alternate in the original ciphertext
/// (e.g. A|B|A|B|A|B), for an arbitrary group count.
///
/// Each segment is labeled with its group index in declaration order; the
/// ciphertext is then walked left to right, at every position consuming the
/// earliest-declared segment that matches (or one separator byte when none
/// does). The label sequence must open with all k labels pairwise distinct
/// and then cycle with period k. Group assignment is positional within a
/// permuted ordering, but this predicate only ever looks at the original
/// ciphertext order.
pub fn groups_alternate(ciphertext: &str, groups: &[Group]) -> bool {
    let mut labeled: Vec<(&[u8], usize)> = Vec::new();
    for (index, group) in groups.iter().enumerate() {
        for segment in &group.segments {
            labeled.push((segment.as_bytes(), index));
        }
    }

    let mut order = Vec::new();
    let mut rest = ciphertext.as_bytes();
    'scan: while !rest.is_empty() {
        for &(segment, index) in &labeled {
            if rest.starts_with(segment) {
                order.push(index);
                rest = &rest[segment.len()..];
                continue 'scan;
            }
        }
        // no segment starts here: a separator byte
        rest = &rest[1..];
    }

    let group_count = groups.len();
    if order.len() < group_count {
        return false;
    }

    // the first k labels must all differ
    for i in 0..group_count {
        for j in 0..group_count {
            if i != j && order[i] == order[j] {
                return false;
            }
        }
    }

    // from there on the labels must cycle in round-robin order
    order
        .iter()
        .enumerate()
        .all(|(position, &label)| label == order[position % group_count])
}

#[derive(Debug, Default, Clone, Copy)]
struct StatsState {
    /// Number of generated pseudo-K4s.
    trials: u64,

    /// Collections with identical letter-frequency shapes.
    same_shape: u64,

    /// Same shapes AND no tiny segment.
    appropriately_sized: u64,

    /// Same shapes AND alternating groups.
    alternating: u64,

    /// Same shapes, appropriately sized AND alternating.
    k4_like: u64,
}

#[derive(Debug)]
enum FlushRequest {
    Flush,
    Shutdown {
        responder: Option<oneshot::Sender<()>>,
    },
}

/// Thread-safe aggregator of discovery counts with a background flusher.
///
/// Lifecycle: `new` → `start` (spawns the flusher) → `record`/`set_trials`
/// from any worker → `shutdown` (final flush, flusher exits).
#[derive(Debug)]
pub struct StatsRecorder {
    path: PathBuf,
    state: Mutex<StatsState>,
    flush_tx: mpsc::Sender<FlushRequest>,
    flush_rx: Mutex<Option<mpsc::Receiver<FlushRequest>>>,
}

impl StatsRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (flush_tx, flush_rx) = mpsc::channel(FLUSH_QUEUE_CAPACITY);
        Self {
            path: path.into(),
            state: Mutex::new(StatsState::default()),
            flush_tx,
            flush_rx: Mutex::new(Some(flush_rx)),
        }
    }

    /// Spawns the flusher task: snapshots on a fixed timer and on every
    /// flush request, all through this one task.
    pub fn start(self: &std::sync::Arc<Self>) {
        let Some(mut receiver) = self.flush_rx.lock().unwrap().take() else {
            return; // already started
        };
        let recorder = std::sync::Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = time::interval(FLUSH_INTERVAL);
            ticker.tick().await; // consume the immediate first tick

            loop {
                tokio::select! {
                    _ = ticker.tick() => recorder.flush(),
                    request = receiver.recv() => match request {
                        Some(FlushRequest::Flush) => recorder.flush(),
                        Some(FlushRequest::Shutdown { responder }) => {
                            recorder.flush();
                            if let Some(responder) = responder {
                                let _ = responder.send(());
                            }
                            break;
                        }
                        None => break,
                    },
                }
            }
        });
    }

    /// Final flush and flusher termination. Safe to call when `start` was
    /// never invoked.
    pub async fn shutdown(&self) {
        if self.flush_rx.lock().unwrap().is_some() {
            // no flusher to stop
            self.flush();
            return;
        }

        let (tx, rx) = oneshot::channel();
        if self
            .flush_tx
            .send(FlushRequest::Shutdown {
                responder: Some(tx),
            })
            .await
            .is_err()
        {
            return;
        }
        let _ = rx.await;
    }

    /// Sets the total trial count (simulation mode bumps this once per
    /// cycle, before enqueueing the cycle's jobs).
    pub fn set_trials(&self, trials: u64) {
        self.state.lock().unwrap().trials = trials;
    }

    /// Records one same-shape discovery and evaluates the independent
    /// size and alternation predicates against the original ciphertext.
    pub fn record(&self, ciphertext: &str, groups: &[Group]) {
        let sized = segments_are_appropriately_sized(groups);
        let alternating = groups_alternate(ciphertext, groups);

        {
            let mut state = self.state.lock().unwrap();
            state.same_shape += 1;
            if sized {
                state.appropriately_sized += 1;
            }
            if alternating {
                state.alternating += 1;
            }
            if sized && alternating {
                state.k4_like += 1;
            }
        }

        // non-blocking: a flush already in the queue covers this update too
        let _ = self.flush_tx.try_send(FlushRequest::Flush);
    }

    pub fn same_shape_count(&self) -> u64 {
        self.state.lock().unwrap().same_shape
    }

    pub fn k4_like_count(&self) -> u64 {
        self.state.lock().unwrap().k4_like
    }

    /// Snapshot-and-persist, logging and swallowing write failures so a
    /// full disk never aborts the analysis.
    fn flush(&self) {
        if let Err(err) = self.save() {
            warn!(path = %self.path.display(), "failed to persist statistics: {err}");
        }
    }

    /// Durably overwrites the statistics artifact with the current counts.
    /// A save before any trial has run is a no-op.
    pub fn save(&self) -> Result<()> {
        let snapshot = *self.state.lock().unwrap();
        if snapshot.trials == 0 {
            return Ok(());
        }

        let mut contents = String::new();
        contents.push_str(&format_statistics(
            "Same distribution shapes",
            snapshot.same_shape,
            snapshot.trials,
        ));
        contents.push_str(&format_statistics(
            "Groups length > 2",
            snapshot.appropriately_sized,
            snapshot.trials,
        ));
        contents.push_str(&format_statistics(
            "Alternating groups",
            snapshot.alternating,
            snapshot.trials,
        ));
        contents.push_str(&format_statistics(
            "K4-like groups",
            snapshot.k4_like,
            snapshot.trials,
        ));

        write_atomic(&self.path, contents.as_bytes())
    }
}

/// One summary line: label, percentage, count over total.
fn format_statistics(label: &str, count: u64, total: u64) -> String {
    format!(
        "{:<25}\t{:.2}%\t{:>10}/{}\n",
        label,
        (count * 100) as f64 / total as f64,
        count,
        total,
    )
}

/// Full overwrite via temp file + rename, so readers never observe a torn
/// artifact.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&tmp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
    }
    fs::rename(tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir() -> PathBuf {
        let mut dir = std::env::temp_dir();
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        dir.push(format!("k4sieve_stats_{unique}"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn groups(layout: &[&[&str]]) -> Vec<Group> {
        layout.iter()
            .map(|segments| Group::new(segments.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_appropriately_sized() {
        assert!(!segments_are_appropriately_sized(&groups(&[&["A", "BC"]])));
        assert!(segments_are_appropriately_sized(&groups(&[
            &["ABC", "DEF"],
            &["GHI", "JKL"]
        ])));
    }

    #[test]
    fn test_groups_alternate() {
        let two_groups = groups(&[&["AA", "BB"], &["YY", "ZZ"]]);
        assert!(groups_alternate("AAYYBBZZ", &two_groups));
        assert!(!groups_alternate("AABBYYZZ", &two_groups));
    }

    #[test]
    fn test_alternation_consumes_separators() {
        let two_groups = groups(&[&["AA", "BB"], &["YY", "ZZ"]]);
        assert!(groups_alternate("AAXYYXBBXZZ", &two_groups));
    }

    #[test]
    fn test_alternation_three_groups() {
        let three = groups(&[&["AA", "BB"], &["CC", "DD"], &["EE", "FF"]]);
        assert!(groups_alternate("AACCEEBBDDFF", &three));
        // cycle broken at the fifth label
        assert!(!groups_alternate("AACCEEBBFFDD", &three));
    }

    #[test]
    fn test_recorder_counters() {
        let dir = temp_dir();
        let recorder = StatsRecorder::new(dir.join(STATS_FILE));

        // target-like: sized and alternating
        recorder.record("AAAYYYBBBZZZ", &groups(&[&["AAA", "BBB"], &["YYY", "ZZZ"]]));
        // tiny segments, still alternating
        recorder.record("AAYYBBZZ", &groups(&[&["AA", "BB"], &["YY", "ZZ"]]));
        // sized but not alternating
        recorder.record("AAABBBYYYZZZ", &groups(&[&["AAA", "BBB"], &["YYY", "ZZZ"]]));

        assert_eq!(recorder.same_shape_count(), 3);
        assert_eq!(recorder.k4_like_count(), 1);
    }

    #[test]
    fn test_save_is_noop_without_trials() {
        let dir = temp_dir();
        let path = dir.join(STATS_FILE);
        let recorder = StatsRecorder::new(&path);

        recorder.record("AAYYBBZZ", &groups(&[&["AA", "BB"], &["YY", "ZZ"]]));
        recorder.save().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_save_writes_four_lines() {
        let dir = temp_dir();
        let path = dir.join(STATS_FILE);
        let recorder = StatsRecorder::new(&path);

        recorder.set_trials(4);
        recorder.record("AAAYYYBBBZZZ", &groups(&[&["AAA", "BBB"], &["YYY", "ZZZ"]]));
        recorder.save().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Same distribution shapes"));
        assert!(lines[0].contains("25.00%"));
        assert!(lines[0].ends_with("1/4"));
        assert!(lines[3].starts_with("K4-like groups"));
    }

    #[tokio::test]
    async fn test_flusher_lifecycle() {
        let dir = temp_dir();
        let path = dir.join(STATS_FILE);
        let recorder = std::sync::Arc::new(StatsRecorder::new(&path));
        recorder.start();

        recorder.set_trials(2);
        recorder.record("AAAYYYBBBZZZ", &groups(&[&["AAA", "BBB"], &["YYY", "ZZZ"]]));
        recorder.shutdown().await;

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("K4-like groups"));
        assert!(contents.contains("1/2"));
    }
}
