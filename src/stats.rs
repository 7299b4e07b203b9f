//! Uniqueness statistics over many reads
//!
//! [`UniquenessStats`] classifies reads one at a time and accumulates how many were
//! unmapped, unique or tied, together with the distribution of their best strata.
//!
//! [`StatsSummarizer`] splits a batch of histograms across worker threads. Each
//! thread owns a private accumulator and the partials are merged once all threads
//! finish, so no locking is involved. Histograms are only borrowed and must not be
//! modified while a summary is running.

use log::{debug, trace};

use crate::{
    analyzer::{analyze, UniqDegree},
    counters::Counters,
    error::{Error, Result},
};

/// Per-class read counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniquenessStats {
    /// Number of reads observed
    pub reads: u64,
    /// Reads without any matching strata
    pub unmapped: u64,
    /// Reads with a single alignment on their best strata
    pub unique: u64,
    /// Reads with several alignments on their best strata
    pub tied: u64,
    /// Sum of the tied alignment counts of all tied reads
    pub tied_maps: u64,
    /// Number of mapped reads per best strata
    pub best_strata: Vec<u64>,
}
impl UniquenessStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies a single read and adds it to the totals
    pub fn observe<C: Counters + ?Sized>(&mut self, counters: &C) -> Result<UniqDegree> {
        let analysis = analyze(counters)?;
        self.reads = self.reads.saturating_add(1);
        match analysis.degree {
            UniqDegree::Unmapped => self.unmapped = self.unmapped.saturating_add(1),
            UniqDegree::Unique => self.unique = self.unique.saturating_add(1),
            UniqDegree::Tied(n) => {
                self.tied = self.tied.saturating_add(1);
                self.tied_maps = self.tied_maps.saturating_add(n);
            }
        }
        if let Some(strata) = analysis.min_strata {
            if strata >= self.best_strata.len() {
                self.best_strata.resize(strata + 1, 0);
            }
            self.best_strata[strata] = self.best_strata[strata].saturating_add(1);
        }
        Ok(analysis.degree)
    }

    /// Adds the totals of `other` into this accumulator, saturating at `u64::MAX`
    pub fn merge(&mut self, other: &Self) {
        self.reads = self.reads.saturating_add(other.reads);
        self.unmapped = self.unmapped.saturating_add(other.unmapped);
        self.unique = self.unique.saturating_add(other.unique);
        self.tied = self.tied.saturating_add(other.tied);
        self.tied_maps = self.tied_maps.saturating_add(other.tied_maps);
        if other.best_strata.len() > self.best_strata.len() {
            self.best_strata.resize(other.best_strata.len(), 0);
        }
        for (total, count) in self.best_strata.iter_mut().zip(&other.best_strata) {
            *total = total.saturating_add(*count);
        }
    }

    #[must_use]
    pub fn mapped(&self) -> u64 {
        self.unique.saturating_add(self.tied)
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction_unique(&self) -> f64 {
        if self.reads == 0 {
            return 0.0;
        }
        self.unique as f64 / self.reads as f64
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction_mapped(&self) -> f64 {
        if self.reads == 0 {
            return 0.0;
        }
        self.mapped() as f64 / self.reads as f64
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatsBuilder {
    num_threads: Option<usize>,
}
impl StatsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of worker threads (`0` uses every available CPU)
    #[must_use]
    pub fn num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    #[must_use]
    pub fn build(self) -> StatsSummarizer {
        let num_threads = match self.num_threads.unwrap_or(0) {
            0 => num_cpus::get(),
            n => n.min(num_cpus::get()),
        };
        StatsSummarizer { num_threads }
    }
}

/// Computes [`UniquenessStats`] for a batch of reads in parallel
#[derive(Debug, Clone, Copy)]
pub struct StatsSummarizer {
    num_threads: usize,
}
impl Default for StatsSummarizer {
    fn default() -> Self {
        StatsBuilder::default().build()
    }
}
impl StatsSummarizer {
    #[must_use]
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Summarizes `histograms`, one histogram per read.
    ///
    /// Reads are split into contiguous chunks, one per thread. Every thread is
    /// joined before returning, then the first error in thread order is returned.
    pub fn summarize<H: Counters + Sync>(&self, histograms: &[H]) -> Result<UniquenessStats> {
        if histograms.is_empty() {
            return Ok(UniquenessStats::default());
        }

        let num_threads = self.num_threads.max(1);
        let reads_per_thread = histograms.len().div_ceil(num_threads);
        debug!(
            "Summarizing {} reads on {} threads ({} reads per thread)",
            histograms.len(),
            num_threads,
            reads_per_thread
        );

        let total = std::thread::scope(|scope| -> Result<UniquenessStats> {
            let handles: Vec<_> = histograms
                .chunks(reads_per_thread)
                .enumerate()
                .map(|(tid, chunk)| {
                    scope.spawn(move || -> Result<UniquenessStats> {
                        trace!("Thread {tid} processing {} reads", chunk.len());
                        let mut stats = UniquenessStats::default();
                        for histogram in chunk {
                            stats.observe(histogram)?;
                        }
                        Ok(stats)
                    })
                })
                .collect();

            let partials: Vec<Result<UniquenessStats>> = handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .map_err(|_| Error::from(anyhow::anyhow!("Summary thread panicked")))?
                })
                .collect();

            partials
                .into_iter()
                .try_fold(UniquenessStats::default(), |mut total, partial| {
                    total.merge(&partial?);
                    Ok(total)
                })
        })?;

        debug!(
            "Summarized {} reads: {} unique, {} tied, {} unmapped",
            total.reads, total.unique, total.tied, total.unmapped
        );
        Ok(total)
    }
}

#[cfg(test)]
mod testing {
    use super::*;
    use crate::{counters::StrataCounters, error::CounterError};
    use anyhow::Result;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    fn random_reads(num_reads: usize) -> Vec<StrataCounters> {
        let mut rng = SmallRng::seed_from_u64(7);
        (0..num_reads)
            .map(|_| {
                let mut counters = StrataCounters::with_strata(5);
                for _ in 0..rng.random_range(0..4) {
                    counters.add_hit(rng.random_range(0..5));
                }
                counters
            })
            .collect()
    }

    #[test]
    fn test_observe() -> Result<()> {
        let mut stats = UniquenessStats::new();
        assert_eq!(stats.observe(&[0u64, 2, 0, 1, 0])?, UniqDegree::Tied(2));
        assert_eq!(stats.observe(&[1u64, 0, 0])?, UniqDegree::Unique);
        assert_eq!(stats.observe(&[0u64, 0, 0])?, UniqDegree::Unmapped);
        assert_eq!(stats.observe(&[0u64, 0, 0, 3])?, UniqDegree::Tied(3));

        assert_eq!(stats.reads, 4);
        assert_eq!(stats.unique, 1);
        assert_eq!(stats.tied, 2);
        assert_eq!(stats.tied_maps, 5);
        assert_eq!(stats.unmapped, 1);
        assert_eq!(stats.mapped(), 3);
        assert_eq!(stats.best_strata, vec![1, 1, 0, 1]);
        assert!((stats.fraction_unique() - 0.25).abs() < f64::EPSILON);
        assert!((stats.fraction_mapped() - 0.75).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn test_observe_rejects_empty_histogram() {
        let mut stats = UniquenessStats::new();
        let empty: Vec<u64> = Vec::new();
        assert!(matches!(
            stats.observe(&empty),
            Err(Error::CounterError(CounterError::EmptyHistogram))
        ));
        assert_eq!(stats.reads, 0);
    }

    #[test]
    fn test_empty_stats_fractions() {
        let stats = UniquenessStats::new();
        assert!(stats.fraction_unique().abs() < f64::EPSILON);
        assert!(stats.fraction_mapped().abs() < f64::EPSILON);
    }

    #[test]
    fn test_merge() -> Result<()> {
        let mut left = UniquenessStats::new();
        left.observe(&[1u64])?;
        let mut right = UniquenessStats::new();
        right.observe(&[0u64, 0, 2])?;
        right.observe(&[0u64, 0, 0])?;

        left.merge(&right);
        assert_eq!(left.reads, 3);
        assert_eq!(left.unique, 1);
        assert_eq!(left.tied, 1);
        assert_eq!(left.unmapped, 1);
        assert_eq!(left.best_strata, vec![1, 0, 1]);
        Ok(())
    }

    #[test]
    fn test_observe_saturates() -> Result<()> {
        let mut stats = UniquenessStats::new();
        assert_eq!(stats.observe(&[u64::MAX])?, UniqDegree::Tied(u64::MAX));
        assert_eq!(stats.observe(&[2u64])?, UniqDegree::Tied(2));
        assert_eq!(stats.tied, 2);
        assert_eq!(stats.tied_maps, u64::MAX);
        assert_eq!(stats.best_strata, vec![2]);
        Ok(())
    }

    #[test]
    fn test_merge_saturates() {
        let mut left = UniquenessStats {
            reads: u64::MAX,
            unique: u64::MAX,
            tied: 1,
            tied_maps: u64::MAX - 1,
            best_strata: vec![u64::MAX],
            ..UniquenessStats::default()
        };
        let right = UniquenessStats {
            reads: 3,
            unique: 2,
            tied: 1,
            tied_maps: 5,
            best_strata: vec![2, 1],
            ..UniquenessStats::default()
        };
        left.merge(&right);
        assert_eq!(left.reads, u64::MAX);
        assert_eq!(left.unique, u64::MAX);
        assert_eq!(left.tied, 2);
        assert_eq!(left.tied_maps, u64::MAX);
        assert_eq!(left.best_strata, vec![u64::MAX, 1]);
        assert_eq!(left.mapped(), u64::MAX);
    }

    #[test]
    fn test_summarize_extreme_counts() -> Result<()> {
        let reads = vec![vec![u64::MAX, 1], vec![0, u64::MAX], vec![3, 0]];
        let stats = StatsBuilder::new().num_threads(2).build().summarize(&reads)?;
        assert_eq!(stats.reads, 3);
        assert_eq!(stats.tied, 3);
        assert_eq!(stats.tied_maps, u64::MAX);
        assert_eq!(stats.best_strata, vec![2, 1]);
        Ok(())
    }

    #[test]
    fn test_builder_threads() {
        let summarizer = StatsBuilder::new().num_threads(1).build();
        assert_eq!(summarizer.num_threads(), 1);

        let summarizer = StatsBuilder::new().num_threads(0).build();
        assert_eq!(summarizer.num_threads(), num_cpus::get());

        let summarizer = StatsBuilder::new().num_threads(usize::MAX).build();
        assert_eq!(summarizer.num_threads(), num_cpus::get());
    }

    #[test]
    fn test_parallel_matches_sequential() -> Result<()> {
        let reads = random_reads(1000);

        let mut expected = UniquenessStats::new();
        for read in &reads {
            expected.observe(read)?;
        }

        for num_threads in [1, 2, 4, 0] {
            let summarizer = StatsBuilder::new().num_threads(num_threads).build();
            let stats = summarizer.summarize(&reads)?;
            assert_eq!(stats.reads, expected.reads);
            assert_eq!(stats.unique, expected.unique);
            assert_eq!(stats.tied, expected.tied);
            assert_eq!(stats.tied_maps, expected.tied_maps);
            assert_eq!(stats.unmapped, expected.unmapped);
            assert_eq!(stats.best_strata, expected.best_strata);
        }
        Ok(())
    }

    #[test]
    fn test_summarize_no_reads() -> Result<()> {
        let reads: Vec<Vec<u64>> = Vec::new();
        let stats = StatsSummarizer::default().summarize(&reads)?;
        assert_eq!(stats, UniquenessStats::default());
        Ok(())
    }

    #[test]
    fn test_summarize_first_error_in_thread_order() {
        let reads = vec![Vec::new(), vec![1u64], vec![2u64], Vec::new()];
        let result = StatsBuilder::new().num_threads(4).build().summarize(&reads);
        assert!(matches!(
            result,
            Err(Error::CounterError(CounterError::EmptyHistogram))
        ));
    }

    #[test]
    fn test_summarize_propagates_errors() {
        let reads = vec![vec![1u64, 0], Vec::new(), vec![0u64, 2]];
        let result = StatsBuilder::new().num_threads(2).build().summarize(&reads);
        assert!(matches!(
            result,
            Err(Error::CounterError(CounterError::EmptyHistogram))
        ));
    }
}
