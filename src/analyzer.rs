//! Strata counter analysis
//!
//! Pure functions that classify a read from its strata histogram: the best strata
//! with at least one alignment, whether that best alignment is unique or tied,
//! and lazy walks over the populated strata.
//!
//! A read without any alignment is a normal outcome (`None` / [`UniqDegree::Unmapped`]).
//! Only caller bugs, such as an empty histogram or a starting strata past its end,
//! are reported as errors.
//!
//! All functions only borrow the histogram and keep no state, so they can be called
//! concurrently on distinct histograms without synchronization.

use crate::{
    counters::Counters,
    error::{CounterError, Error, Result},
};

/// Integer sentinel for "no matching strata"
pub const NO_MATCHING_STRATA: i64 = -1;

/// A populated strata and the number of alignments found there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrataHit {
    pub strata: usize,
    pub count: u64,
}

/// Uniqueness of a read's best alignment.
///
/// Only the best matching strata is considered. Alignments on worse strata never
/// make a unique best hit ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqDegree {
    /// No strata has an alignment
    Unmapped,
    /// Exactly one alignment on the best strata
    Unique,
    /// Several equally good alignments on the best strata
    Tied(u64),
}
impl UniqDegree {
    /// Classifies the count found at the best strata
    #[must_use]
    pub fn from_count(count: u64) -> Self {
        match count {
            0 => Self::Unmapped,
            1 => Self::Unique,
            n => Self::Tied(n),
        }
    }

    /// Integer form: `-1` unmapped, `1` unique, `n > 1` number of tied hits.
    ///
    /// Fails if the tie count does not fit in an `i64`.
    pub fn as_i64(&self) -> Result<i64> {
        match self {
            Self::Unmapped => Ok(NO_MATCHING_STRATA),
            Self::Unique => Ok(1),
            Self::Tied(n) => Ok(i64::try_from(*n).map_err(anyhow::Error::from)?),
        }
    }

    #[must_use]
    pub fn is_mapped(&self) -> bool {
        !matches!(self, Self::Unmapped)
    }

    #[must_use]
    pub fn is_unique(&self) -> bool {
        matches!(self, Self::Unique)
    }

    /// Number of alignments on the best strata
    #[must_use]
    pub fn num_best_maps(&self) -> u64 {
        match self {
            Self::Unmapped => 0,
            Self::Unique => 1,
            Self::Tied(n) => *n,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unmapped => "unmapped",
            Self::Unique => "unique",
            Self::Tied(_) => "tied",
        }
    }
}

impl TryFrom<UniqDegree> for i64 {
    type Error = Error;

    fn try_from(degree: UniqDegree) -> Result<Self> {
        degree.as_i64()
    }
}

/// Everything the output stage needs about a read, computed in one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrataAnalysis {
    pub min_strata: Option<usize>,
    pub degree: UniqDegree,
    pub total_maps: u64,
}

fn checked_counts<C: Counters + ?Sized>(counters: &C) -> Result<&[u64]> {
    let counts = counters.counters();
    if counts.is_empty() {
        return Err(CounterError::EmptyHistogram.into());
    }
    Ok(counts)
}

fn first_hit_from(counts: &[u64], begin_strata: usize) -> Option<StrataHit> {
    counts
        .iter()
        .enumerate()
        .skip(begin_strata)
        .find(|&(_, &count)| count > 0)
        .map(|(strata, &count)| StrataHit { strata, count })
}

/// Returns the lowest strata with at least one alignment.
///
/// `None` means the read is unmapped, which is not the same as strata `0`.
pub fn min_matching_strata<C: Counters + ?Sized>(counters: &C) -> Result<Option<usize>> {
    let counts = checked_counts(counters)?;
    Ok(first_hit_from(counts, 0).map(|hit| hit.strata))
}

/// Same as [`min_matching_strata`] with [`NO_MATCHING_STRATA`] for an unmapped read
pub fn min_matching_strata_i64<C: Counters + ?Sized>(counters: &C) -> Result<i64> {
    match min_matching_strata(counters)? {
        Some(strata) => Ok(i64::try_from(strata).map_err(anyhow::Error::from)?),
        None => Ok(NO_MATCHING_STRATA),
    }
}

/// Returns the first populated strata at or after `begin_strata`, with its count.
///
/// `begin_strata` must lie within the histogram. `None` means every remaining
/// strata is empty.
pub fn next_matching_strata<C: Counters + ?Sized>(
    counters: &C,
    begin_strata: usize,
) -> Result<Option<StrataHit>> {
    let counts = checked_counts(counters)?;
    if begin_strata >= counts.len() {
        return Err(CounterError::StrataOutOfRange {
            begin: begin_strata,
            len: counts.len(),
        }
        .into());
    }
    Ok(first_hit_from(counts, begin_strata))
}

/// Classifies a read by the number of alignments on its best strata
pub fn uniq_degree<C: Counters + ?Sized>(counters: &C) -> Result<UniqDegree> {
    let counts = checked_counts(counters)?;
    Ok(first_hit_from(counts, 0).map_or(UniqDegree::Unmapped, |hit| {
        UniqDegree::from_count(hit.count)
    }))
}

/// Distance from the best matching strata to the next populated strata.
///
/// `None` if the read is unmapped or only a single strata is populated.
pub fn strata_gap<C: Counters + ?Sized>(counters: &C) -> Result<Option<usize>> {
    let counts = checked_counts(counters)?;
    let Some(best) = first_hit_from(counts, 0) else {
        return Ok(None);
    };
    Ok(first_hit_from(counts, best.strata + 1).map(|next| next.strata - best.strata))
}

/// Computes the best strata, the uniqueness degree and the total alignment count
pub fn analyze<C: Counters + ?Sized>(counters: &C) -> Result<StrataAnalysis> {
    let counts = checked_counts(counters)?;
    let best = first_hit_from(counts, 0);
    Ok(StrataAnalysis {
        min_strata: best.map(|hit| hit.strata),
        degree: best.map_or(UniqDegree::Unmapped, |hit| UniqDegree::from_count(hit.count)),
        total_maps: counts.num_maps(),
    })
}

/// Iterates over every populated strata in ascending order
pub fn matching_strata<C: Counters + ?Sized>(counters: &C) -> MatchingStrata<'_> {
    MatchingStrata {
        counts: counters.counters(),
        next: 0,
    }
}

/// Lazy walk over populated strata, see [`matching_strata`]
#[derive(Debug, Clone)]
pub struct MatchingStrata<'a> {
    counts: &'a [u64],
    next: usize,
}
impl Iterator for MatchingStrata<'_> {
    type Item = StrataHit;

    fn next(&mut self) -> Option<Self::Item> {
        let hit = first_hit_from(self.counts, self.next)?;
        self.next = hit.strata + 1;
        Some(hit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.counts.len().saturating_sub(self.next)))
    }
}
