//! Equal-length group partitioning of an ordering, with symmetry-aware
//! deduplication.

use ahash::AHashSet;
use sha2::{Digest, Sha256};

use crate::types::{Collection, Group};

/// Enumerates the structurally valid partitions of segment orderings and
/// filters out partitions already seen under group/segment symmetry.
///
/// The dedup set is scoped to a single (ciphertext, separator) job: build
/// one `Partitioner` per job and drop it with the job, so long simulation
/// runs stay at constant memory.
#[derive(Debug, Default)]
pub struct Partitioner {
    seen: AHashSet<[u8; 32]>,
}

impl Partitioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// All newly seen, structurally valid partitions of one ordering.
    ///
    /// For each group count k in 2..=N: the total character length must be
    /// divisible by k; segments are accumulated left to right and a group
    /// closes exactly when the running length hits total/k. Overshooting
    /// the boundary invalidates that k for this ordering.
    pub fn suitable_collections(&mut self, ordering: &[String]) -> Vec<Collection> {
        let total: usize = ordering.iter().map(|s| s.len()).sum();
        let mut collections = Vec::new();

        for group_count in 2..=ordering.len() {
            if total % group_count != 0 {
                continue;
            }
            let target_len = total / group_count;

            let mut groups: Vec<Vec<String>> = Vec::with_capacity(group_count);
            let mut current: Vec<String> = Vec::new();
            let mut running_len = 0;
            let mut valid = true;

            for segment in ordering {
                running_len += segment.len();
                current.push(segment.clone());

                if running_len > target_len {
                    valid = false;
                    break;
                }
                if running_len == target_len {
                    groups.push(std::mem::take(&mut current));
                    running_len = 0;
                }
            }

            if !valid || !current.is_empty() || groups.len() != group_count {
                continue;
            }

            if self.insert_signature(&groups) {
                collections.push(Collection::new(
                    groups.into_iter().map(Group::new).collect(),
                ));
            }
        }

        collections
    }

    /// Records the canonical signature of a partition; returns whether it
    /// was new.
    ///
    /// The signature is invariant to segment order within a group and to
    /// group order within the partition (A|B is the same discovery as B|A):
    /// segments are sorted and joined per group, the per-group strings are
    /// sorted and joined across groups, and the result is digested.
    fn insert_signature(&mut self, groups: &[Vec<String>]) -> bool {
        let mut group_keys: Vec<String> = groups
            .iter()
            .map(|group| {
                let mut segments = group.clone();
                segments.sort_unstable();
                segments.join(".")
            })
            .collect();
        group_keys.sort_unstable();

        let digest: [u8; 32] = Sha256::digest(group_keys.join("/").as_bytes()).into();
        self.seen.insert(digest)
    }
}
