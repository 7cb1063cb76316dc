// src/resolve/matching.rs
// =============================================================================
// Approximate string matching for "did you mean" suggestions.
//
// Similarity is the Ratcliff/Obershelp ratio, not an edit distance:
//
//   ratio = 2 * M / T
//
// where T is the total length of both strings and M is the number of
// characters in matching blocks. Blocks are found by taking the longest
// common block, then recursing on the pieces to its left and right.
//
// The ratio is not symmetric: the second string ("b") is the one that gets
// indexed, and close_matches always puts the query there.
// =============================================================================

use std::cmp::Ordering;
use std::collections::HashMap;

/// Strings at least this long get the popular-character heuristic
const AUTOJUNK_MIN_LEN: usize = 200;

pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    // Positions of each character in `b`, ascending. Popular characters of a
    // long `b` are left out.
    b2j: HashMap<char, Vec<usize>>,
    // Count of every character in `b`, popular or not
    b_counts: HashMap<char, usize>,
}

impl SequenceMatcher {
    pub fn new(a: &str, b: &str) -> Self {
        let b: Vec<char> = b.chars().collect();

        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        let mut b_counts: HashMap<char, usize> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
            *b_counts.entry(c).or_default() += 1;
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self {
            a: a.chars().collect(),
            b,
            b2j,
            b_counts,
        }
    }

    /// Replaces the first sequence, keeping the index built for `b`
    pub fn set_first(&mut self, a: &str) {
        self.a = a.chars().collect();
    }

    pub fn ratio(&self) -> f64 {
        self.score(self.matching_characters())
    }

    /// Upper bound on `ratio()`, counting shared characters in any order
    pub fn quick_ratio(&self) -> f64 {
        let mut available: HashMap<char, isize> = HashMap::new();
        let mut matches = 0;

        for c in &self.a {
            let left = available
                .entry(*c)
                .or_insert_with(|| self.b_counts.get(c).copied().unwrap_or(0) as isize);
            if *left > 0 {
                matches += 1;
            }
            *left -= 1;
        }

        self.score(matches)
    }

    /// Upper bound on `quick_ratio()`, from the lengths alone
    pub fn real_quick_ratio(&self) -> f64 {
        self.score(self.a.len().min(self.b.len()))
    }

    fn score(&self, matches: usize) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            1.0
        } else {
            2.0 * matches as f64 / total as f64
        }
    }

    // Sum of the sizes of all matching blocks
    fn matching_characters(&self) -> usize {
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];
        let mut total = 0;

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, size) = self.find_longest_match(alo, ahi, blo, bhi);
            if size == 0 {
                continue;
            }

            total += size;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + size < ahi && j + size < bhi {
                pending.push((i + size, ahi, j + size, bhi));
            }
        }

        total
    }

    // Longest block a[i..i+size] == b[j..j+size] inside the given ranges.
    // Among equally long blocks, the one starting earliest in `a` wins, then
    // the one starting earliest in `b`.
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // j2len[j] = length of the match ending at a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }

                    let previous = if j > 0 { j2len.get(&(j - 1)).copied().unwrap_or(0) } else { 0 };
                    let size = previous + 1;
                    next.insert(j, size);
                    if size > best_size {
                        best_i = i + 1 - size;
                        best_j = j + 1 - size;
                        best_size = size;
                    }
                }
            }
            j2len = next;
        }

        // Popular characters are not indexed; grow the block across them
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }
}

/// The best `limit` candidates whose similarity to `query` is at least
/// `cutoff`, best first. Equal scores are ordered by candidate, descending.
pub fn close_matches<'c, I>(query: &str, candidates: I, limit: usize, cutoff: f64) -> Vec<String>
where
    I: IntoIterator<Item = &'c String>,
{
    let mut matcher = SequenceMatcher::new("", query);
    let mut scored: Vec<(f64, &String)> = Vec::new();

    for candidate in candidates {
        matcher.set_first(candidate);
        if matcher.real_quick_ratio() < cutoff || matcher.quick_ratio() < cutoff {
            continue;
        }

        let score = matcher.ratio();
        if score >= cutoff {
            scored.push((score, candidate));
        }
    }

    scored.sort_by(|(score_a, name_a), (score_b, name_b)| {
        match score_b.total_cmp(score_a) {
            Ordering::Equal => name_b.cmp(name_a),
            other => other,
        }
    });

    scored
        .into_iter()
        .take(limit)
        .map(|(_, name)| name.clone())
        .collect()
}
