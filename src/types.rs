use std::sync::Arc;

use crate::frequency::LetterFrequency;

/// One unit of work for the pool: a ciphertext analyzed against a single
/// separator letter. Immutable once enqueued.
#[derive(Debug, Clone)]
pub struct Job {
    pub ciphertext: Arc<str>,
    pub separator: char,
    /// 0 in single-target mode; the trial number in simulation mode.
    pub simulation_id: u64,
}

impl Job {
    pub fn new(ciphertext: Arc<str>, separator: char, simulation_id: u64) -> Self {
        Self {
            ciphertext,
            separator,
            simulation_id,
        }
    }
}

/// A contiguous bucket of segments within one partition of an ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub segments: Vec<String>,

    /// Letter counts over the concatenation of the segments, computed once
    /// by the shape analyzer and reused for reporting.
    pub letter_frequency: Option<LetterFrequency>,
}

impl Group {
    pub fn new(segments: Vec<String>) -> Self {
        Self {
            segments,
            letter_frequency: None,
        }
    }

    /// Total character length across all segments.
    pub fn len(&self) -> usize {
        self.segments.iter().map(|s| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// A complete partition of one ordering into equal-length groups.
///
/// Invariant: every group carries the same total character length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub groups: Vec<Group>,
}

impl Collection {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_len_sums_segments() {
        let group = Group::new(vec!["AB".to_string(), "CDE".to_string()]);
        assert_eq!(group.len(), 5);
        assert!(!group.is_empty());
    }

    #[test]
    fn test_job_carries_context() {
        let job = Job::new(Arc::from("ABC"), 'B', 7);
        assert_eq!(&*job.ciphertext, "ABC");
        assert_eq!(job.separator, 'B');
        assert_eq!(job.simulation_id, 7);
    }
}
