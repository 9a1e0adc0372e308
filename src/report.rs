//! Plain-text rendering of discovered collections for the result sink.

use std::io::{self, Write};

use crate::types::{Collection, Group, Job};

/// Where discovery reports go. Workers share one sink behind a mutex; the
/// indirection lets tests capture output instead of printing.
pub struct DiscoverySink {
    out: Box<dyn Write + Send>,
}

impl DiscoverySink {
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out }
    }

    pub fn writer(&mut self) -> &mut dyn Write {
        &mut *self.out
    }
}

/// Writes the full report for one discovery: a context header followed by
/// one block per group.
///
/// Callers serialize access to the sink so concurrent discoveries never
/// interleave.
pub fn write_discovery(out: &mut dyn Write, job: &Job, collection: &Collection) -> io::Result<()> {
    write_context(out, job)?;
    for (index, group) in collection.groups.iter().enumerate() {
        write_group(out, group, index)?;
    }
    Ok(())
}

/// Writes the ciphertext, its separator and, in simulation mode, the trial
/// number.
fn write_context(out: &mut dyn Write, job: &Job) -> io::Result<()> {
    write!(
        out,
        "\n> {}\n  Separator: {}",
        job.ciphertext, job.separator
    )?;

    if job.simulation_id == 0 {
        write!(out, "\n\n")
    } else {
        write!(out, "\tSimulation: #{}\n\n", job.simulation_id)
    }
}

/// Writes a group's segments and its letter frequency in descending count
/// order.
fn write_group(out: &mut dyn Write, group: &Group, index: usize) -> io::Result<()> {
    write!(out, "  Group {}:\t", index + 1)?;
    for segment in &group.segments {
        write!(out, "{segment} ")?;
    }
    writeln!(out)?;

    write!(out, "  Letter Freq.:\t")?;
    if let Some(frequency) = &group.letter_frequency {
        for (letter, count) in frequency.pairs_by_count_desc() {
            write!(out, "{letter}:{count}  ")?;
        }
    }
    write!(out, "\n\n")
}
