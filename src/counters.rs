//! Strata histograms
//!
//! A strata histogram holds, for a single read, the number of candidate alignments
//! found at each edit-distance level. Index `0` is a perfect match, index `1` one
//! mismatch, and so on. Lower strata are always better.
//!
//! Any random-access slice of counts can be analysed through the [`Counters`] trait.
//! [`StrataCounters`] is an owned buffer that an aligner can fill and reuse between reads.

use std::{fmt, str::FromStr};

use auto_impl::auto_impl;

use crate::error::{Error, ParseError};

/// Separator between strata in the textual counters form
pub const STRATA_SEPARATOR: u8 = b':';

/// A read-only view over a strata histogram.
///
/// The histogram length is carried by the slice itself, so callers never pass
/// the number of strata separately.
#[auto_impl(&, Box, Arc)]
pub trait Counters {
    /// Returns the per-strata counts
    fn counters(&self) -> &[u64];

    /// Number of strata in the histogram
    fn num_strata(&self) -> usize {
        self.counters().len()
    }

    /// Total number of alignments across all strata, saturating at `u64::MAX`
    fn num_maps(&self) -> u64 {
        self.counters()
            .iter()
            .fold(0u64, |total, &count| total.saturating_add(count))
    }
}

impl Counters for [u64] {
    fn counters(&self) -> &[u64] {
        self
    }
}

impl Counters for Vec<u64> {
    fn counters(&self) -> &[u64] {
        self
    }
}

impl<const N: usize> Counters for [u64; N] {
    fn counters(&self) -> &[u64] {
        self
    }
}

/// An owned, reusable strata histogram.
///
/// The buffer grows while hits are added and keeps its length on [`clear`](Self::clear),
/// so a read without alignments is represented as all-zero counts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StrataCounters {
    counts: Vec<u64>,
}
impl StrataCounters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a zeroed histogram covering strata `0..num_strata`
    #[must_use]
    pub fn with_strata(num_strata: usize) -> Self {
        Self {
            counts: vec![0; num_strata],
        }
    }

    /// Records a single alignment at `strata`
    pub fn add_hit(&mut self, strata: usize) {
        self.add_hits(strata, 1);
    }

    /// Records `n` alignments at `strata`, growing the histogram if needed
    pub fn add_hits(&mut self, strata: usize, n: u64) {
        if strata >= self.counts.len() {
            self.counts.resize(strata + 1, 0);
        }
        self.counts[strata] = self.counts[strata].saturating_add(n);
    }

    /// Overwrites the count at `strata`, growing the histogram if needed
    pub fn set(&mut self, strata: usize, n: u64) {
        if strata >= self.counts.len() {
            self.counts.resize(strata + 1, 0);
        }
        self.counts[strata] = n;
    }

    /// Count at `strata`, or `None` past the end of the histogram
    #[must_use]
    pub fn get(&self, strata: usize) -> Option<u64> {
        self.counts.get(strata).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    #[must_use]
    pub fn total_maps(&self) -> u64 {
        self.num_maps()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u64] {
        &self.counts
    }

    /// Zeroes every strata but keeps the histogram length
    pub fn clear(&mut self) {
        self.counts.fill(0);
    }

    /// Drops all strata
    pub fn reset(&mut self) {
        self.counts.clear();
    }

    /// Writes the colon-separated form of this histogram into `buffer`
    pub fn write_to(&self, buffer: &mut Vec<u8>) {
        write_counters(&self.counts, buffer);
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u64> {
        self.counts
    }
}

impl Counters for StrataCounters {
    fn counters(&self) -> &[u64] {
        &self.counts
    }
}

impl From<Vec<u64>> for StrataCounters {
    fn from(counts: Vec<u64>) -> Self {
        Self { counts }
    }
}

impl From<&[u64]> for StrataCounters {
    fn from(counts: &[u64]) -> Self {
        Self {
            counts: counts.to_vec(),
        }
    }
}

impl fmt::Display for StrataCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut translater = itoa::Buffer::new();
        for (idx, count) in self.counts.iter().enumerate() {
            if idx > 0 {
                f.write_str(":")?;
            }
            f.write_str(translater.format(*count))?;
        }
        Ok(())
    }
}

impl FromStr for StrataCounters {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseError::EmptyInput.into());
        }
        let counts = s
            .split(STRATA_SEPARATOR as char)
            .map(|field| {
                if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ParseError::InvalidCount(field.to_string()));
                }
                field
                    .parse::<u64>()
                    .map_err(|_| ParseError::InvalidCount(field.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { counts })
    }
}

/// Appends the colon-separated decimal form of `counts` to `buffer` (e.g. `0:2:0:1`)
pub fn write_counters(counts: &[u64], buffer: &mut Vec<u8>) {
    let mut translater = itoa::Buffer::new();
    for (idx, count) in counts.iter().enumerate() {
        if idx > 0 {
            buffer.push(STRATA_SEPARATOR);
        }
        buffer.extend_from_slice(translater.format(*count).as_bytes());
    }
}
