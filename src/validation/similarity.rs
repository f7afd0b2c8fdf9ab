//! Bounded edit distance and typo similarity scoring.

use std::collections::HashMap;
use std::sync::RwLock;

/// Candidates further than this many edits away are never suggested
pub const MAX_EDIT_DISTANCE: usize = 2;

/// Default number of memoized string pairs
pub const DEFAULT_MEMO_CAPACITY: usize = 5_000;

/// Levenshtein distance that gives up once the result must exceed `max`.
///
/// Returns `None` when the strings are more than `max` edits apart.
pub fn bounded_edit_distance(a: &str, b: &str, max: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.len().abs_diff(b.len()) > max {
        return None;
    }
    if a.is_empty() || b.is_empty() {
        return Some(a.len().max(b.len()));
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        current[0] = i;
        let mut row_min = current[0];
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            current[j] = (previous[j] + 1)
                .min(current[j - 1] + 1)
                .min(previous[j - 1] + cost);
            row_min = row_min.min(current[j]);
        }
        // Distances never shrink down the table.
        if row_min > max {
            return None;
        }
        std::mem::swap(&mut previous, &mut current);
    }

    let distance = previous[b.len()];
    (distance <= max).then_some(distance)
}

/// True when `a` and `b` have equal length and differ only by one swapped
/// pair of adjacent characters.
pub fn is_adjacent_transposition(a: &str, b: &str) -> bool {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len() != b.len() {
        return false;
    }

    let diffs: Vec<usize> = (0..a.len()).filter(|&i| a[i] != b[i]).collect();
    match diffs.as_slice() {
        [i, j] if *j == i + 1 => a[*i] == b[*j] && a[*j] == b[*i],
        _ => false,
    }
}

/// Typo score for two strings already known to be `distance` edits apart.
/// Lower is better.
pub fn similarity_score(a: &str, b: &str, distance: usize) -> i64 {
    let mut score = distance as i64 * 10;

    if is_adjacent_transposition(a, b) {
        score -= 15;
    }
    if a.chars().next().is_some() && a.chars().next() == b.chars().next() {
        score -= 3;
    }
    if a.chars().last().is_some() && a.chars().last() == b.chars().last() {
        score -= 2;
    }

    let length_diff = a.chars().count().abs_diff(b.chars().count()) as i64;
    score + 2 * length_diff
}

/// Distance plus score, or `None` when the pair is out of range
pub fn score(a: &str, b: &str) -> Option<i64> {
    bounded_edit_distance(a, b, MAX_EDIT_DISTANCE).map(|d| similarity_score(a, b, d))
}

/// Capacity-bounded memo of edit distances keyed by the unordered pair.
///
/// Once full, new results are computed but not stored.
#[derive(Debug)]
pub struct DistanceMemo {
    capacity: usize,
    entries: RwLock<HashMap<(String, String), Option<usize>>>,
}

impl Default for DistanceMemo {
    fn default() -> Self {
        Self::new(DEFAULT_MEMO_CAPACITY)
    }
}

impl DistanceMemo {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Bounded distance between `a` and `b`, memoized when there is room
    pub fn distance(&self, a: &str, b: &str) -> Option<usize> {
        let key = if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        };

        {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            if let Some(hit) = entries.get(&key) {
                return *hit;
            }
        }

        let distance = bounded_edit_distance(&key.0, &key.1, MAX_EDIT_DISTANCE);

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if entries.len() < self.capacity {
            entries.insert(key, distance);
        }
        distance
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}
