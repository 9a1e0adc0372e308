//! Lazy, exhaustive permutation generation (Heap's algorithm).

/// Iterator over all `n!` orderings of a sequence.
///
/// Positions are treated as distinct even when values repeat, so exactly
/// `n!` orderings are emitted, none twice. Only O(n) state is held; the
/// consumer may stop pulling at any point by dropping the iterator.
///
/// This is the iterative form of Heap's adjacent-swap scheme: `counters[i]`
/// tracks how many swaps have been performed at level `i`, which is the
/// recursion stack flattened so that `next()` can return mid-traversal.
#[derive(Debug)]
pub struct Permutations<T> {
    items: Vec<T>,
    counters: Vec<usize>,
    level: usize,
    first: bool,
}

impl<T> Permutations<T> {
    pub fn new(items: Vec<T>) -> Self {
        let n = items.len();
        Self {
            items,
            counters: vec![0; n],
            level: 1,
            first: true,
        }
    }
}

impl<T: Clone> Iterator for Permutations<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        if self.first {
            self.first = false;
            return Some(self.items.clone());
        }

        while self.level < self.items.len() {
            if self.counters[self.level] < self.level {
                if self.level % 2 == 0 {
                    self.items.swap(0, self.level);
                } else {
                    self.items.swap(self.counters[self.level], self.level);
                }
                self.counters[self.level] += 1;
                self.level = 1;
                return Some(self.items.clone());
            }

            self.counters[self.level] = 0;
            self.level += 1;
        }

        None
    }
}
