//! Letter-frequency profiles and the shape comparison that decides whether
//! a partition is interesting.

use std::collections::BTreeMap;

use crate::types::Collection;

/// Length of the zero baseline every shape vector starts from: one slot per
/// possible letter. Kept even though only the appended non-zero counts
/// discriminate; the baseline fixes a minimum vector length, so a shape
/// match also requires the same number of distinct letters.
const SHAPE_BASELINE_LEN: usize = 26;

/// Letter occurrence counts over the concatenation of a group's segments.
///
/// Backed by an ordered map so every derived view is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterFrequency {
    counts: BTreeMap<char, u32>,
}

impl LetterFrequency {
    pub fn of_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        let mut counts = BTreeMap::new();
        for segment in segments {
            for letter in segment.as_ref().chars() {
                *counts.entry(letter).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    /// The shape of this profile: a 26-zero baseline with every distinct
    /// letter's count appended, sorted ascending. Two groups have identical
    /// shapes iff these vectors are equal element by element.
    pub fn shape_vector(&self) -> Vec<u32> {
        let mut shape = vec![0u32; SHAPE_BASELINE_LEN];
        shape.extend(self.counts.values());
        shape.sort_unstable();
        shape
    }

    /// (letter, count) pairs sorted by descending count, ties by letter.
    pub fn pairs_by_count_desc(&self) -> Vec<(char, u32)> {
        let mut pairs: Vec<(char, u32)> = self.counts.iter().map(|(&c, &n)| (c, n)).collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        pairs
    }

    pub fn count(&self, letter: char) -> u32 {
        self.counts.get(&letter).copied().unwrap_or(0)
    }
}

/// Decides whether every group in the collection shares the same
/// letter-frequency shape, computing and caching each group's frequency
/// profile along the way.
///
/// Shape equality is transitive, so comparing adjacent pairs suffices.
pub fn have_identical_shapes(collection: &mut Collection) -> bool {
    let mut shapes = Vec::with_capacity(collection.groups.len());
    for group in &mut collection.groups {
        let frequency = group
            .letter_frequency
            .get_or_insert_with(|| LetterFrequency::of_segments(&group.segments));
        shapes.push(frequency.shape_vector());
    }

    shapes.windows(2).all(|pair| pair[0] == pair[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Group;

    fn collection(groups: &[&[&str]]) -> Collection {
        Collection::new(
            groups
                .iter()
                .map(|segments| Group::new(segments.iter().map(|s| s.to_string()).collect()))
                .collect(),
        )
    }

    #[test]
    fn test_frequency_counts() {
        let freq = LetterFrequency::of_segments(&["AAB", "BC"]);
        assert_eq!(freq.count('A'), 2);
        assert_eq!(freq.count('B'), 2);
        assert_eq!(freq.count('C'), 1);
        assert_eq!(freq.count('Z'), 0);
    }

    #[test]
    fn test_shape_vector_has_baseline() {
        let freq = LetterFrequency::of_segments(&["AAB"]);
        let shape = freq.shape_vector();
        assert_eq!(shape.len(), 28); // 26 zeros + two distinct letters
        assert_eq!(&shape[26..], &[1, 2]);
    }

    #[test]
    fn test_identical_shapes_abstract_away_letters() {
        // {5,1} vs {5,1}: same shape despite disjoint letters
        let mut c = collection(&[&["AAAAA", "Z"], &["BBBBB", "Y"]]);
        assert!(have_identical_shapes(&mut c));
    }

    #[test]
    fn test_single_substitution_flips_result() {
        let mut matching = collection(&[&["AAAAA", "Z"], &["BBBBB", "Y"], &["CCCCC", "X"]]);
        assert!(have_identical_shapes(&mut matching));

        // "CCCCC" -> "DCCCC": {5,1} becomes {4,1,1}
        let mut broken = collection(&[&["AAAAA", "Z"], &["BBBBB", "Y"], &["DCCCC", "X"]]);
        assert!(!have_identical_shapes(&mut broken));
    }

    #[test]
    fn test_distinct_letter_count_must_match() {
        // equal lengths, but {3,1} vs {4} differ in vector length
        let mut c = collection(&[&["AAAB"], &["CCCC"]]);
        assert!(!have_identical_shapes(&mut c));
    }

    #[test]
    fn test_frequencies_are_cached_on_groups() {
        let mut c = collection(&[&["AA"], &["BB"]]);
        assert!(have_identical_shapes(&mut c));
        for group in &c.groups {
            assert!(group.letter_frequency.is_some());
        }
    }

    #[test]
    fn test_adjacent_comparison_covers_all_groups() {
        // first and last match, middle differs
        let mut c = collection(&[&["AA"], &["BC"], &["DD"]]);
        assert!(!have_identical_shapes(&mut c));
    }
}
