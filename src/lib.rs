//! # strata
//!
//! Classification of read mapping quality from strata histograms.
//!
//! A mapper collects, for every read, the number of candidate alignments found at each
//! edit-distance level (a *strata*). Strata `0` holds perfect matches, strata `1`
//! alignments with one mismatch, and so on. This crate answers the questions an output
//! stage asks of that histogram:
//!
//! - which is the best strata with at least one alignment ([`min_matching_strata`]),
//! - is the best alignment unique or tied with others ([`uniq_degree`]),
//! - which populated strata follows a given one ([`next_matching_strata`]).
//!
//! ## Usage
//!
//! ```rust
//! use strata::{min_matching_strata, next_matching_strata, uniq_degree, StrataCounters, UniqDegree};
//!
//! let mut counters = StrataCounters::with_strata(5);
//! counters.add_hits(1, 2);
//! counters.add_hit(3);
//!
//! assert_eq!(min_matching_strata(&counters).unwrap(), Some(1));
//! assert_eq!(uniq_degree(&counters).unwrap(), UniqDegree::Tied(2));
//!
//! let next = next_matching_strata(&counters, 2).unwrap().unwrap();
//! assert_eq!((next.strata, next.count), (3, 1));
//! ```
//!
//! Batches of reads can be summarized on several threads with [`StatsSummarizer`].

mod analyzer;
mod counters;
mod error;
mod stats;

pub mod prelude;

pub use analyzer::{
    analyze, matching_strata, min_matching_strata, min_matching_strata_i64, next_matching_strata,
    strata_gap, uniq_degree, MatchingStrata, StrataAnalysis, StrataHit, UniqDegree,
    NO_MATCHING_STRATA,
};
pub use counters::{write_counters, Counters, StrataCounters, STRATA_SEPARATOR};
pub use error::{CounterError, Error, ParseError, Result};
pub use stats::{StatsBuilder, StatsSummarizer, UniquenessStats};
