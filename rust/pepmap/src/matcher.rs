//! Exact peptide search with Knuth-Morris-Pratt.
//!
//! A [`PeptideMatcher`] precomputes the prefix table for one peptide and can
//! then be run against any number of texts. All occurrences are reported,
//! including ones that overlap each other (`"AA"` in `"AAAA"` matches at 0, 1 and 2).

use crate::errors::{
    PepMapError,
    Result,
};

#[derive(Debug, Clone)]
pub struct PeptideMatcher<'p> {
    pattern: &'p [u8],
    lps: Vec<usize>,
}

impl<'p> PeptideMatcher<'p> {
    pub fn new(pattern: &'p str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(PepMapError::InvalidPattern);
        }
        let pattern = pattern.as_bytes();
        Ok(Self {
            pattern,
            lps: build_lps(pattern),
        })
    }

    pub fn pattern_len(&self) -> usize {
        self.pattern.len()
    }

    /// Lazily yields the start of every occurrence in `text`, ascending.
    pub fn find_iter<'m, 't>(&'m self, text: &'t str) -> MatchIter<'m, 'p, 't> {
        MatchIter {
            matcher: self,
            text: text.as_bytes(),
            i: 0,
            j: 0,
        }
    }

    pub fn find_all(&self, text: &str) -> Vec<usize> {
        self.find_iter(text).collect()
    }
}

/// Convenience wrapper for a single pattern/text pair.
pub fn find_all(pattern: &str, text: &str) -> Result<Vec<usize>> {
    Ok(PeptideMatcher::new(pattern)?.find_all(text))
}

/// `lps[k]` is the length of the longest proper prefix of `pattern[..=k]`
/// that is also a suffix of it.
fn build_lps(pattern: &[u8]) -> Vec<usize> {
    let mut lps = vec![0; pattern.len()];
    let mut prefix_len = 0;
    let mut i = 1;

    while i < pattern.len() {
        if pattern[prefix_len] == pattern[i] {
            prefix_len += 1;
            lps[i] = prefix_len;
            i += 1;
        } else if prefix_len != 0 {
            prefix_len = lps[prefix_len - 1];
        } else {
            lps[i] = 0;
            i += 1;
        }
    }
    lps
}

pub struct MatchIter<'m, 'p, 't> {
    matcher: &'m PeptideMatcher<'p>,
    text: &'t [u8],
    i: usize,
    j: usize,
}

impl Iterator for MatchIter<'_, '_, '_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let pattern = self.matcher.pattern;
        let m = pattern.len();
        let n = self.text.len();

        loop {
            if self.j == m {
                let start = self.i - m;
                // Resume from the border so overlapping matches are not skipped.
                self.j = self.matcher.lps[m - 1];
                return Some(start);
            }
            // Not enough text left to complete a match.
            if n - self.i < m - self.j {
                return None;
            }
            if self.text[self.i] == pattern[self.j] {
                self.i += 1;
                self.j += 1;
            } else if self.j > 0 {
                self.j = self.matcher.lps[self.j - 1];
            } else {
                self.i += 1;
            }
        }
    }
}
