pub use crate::{
    analyze, matching_strata, min_matching_strata, next_matching_strata, uniq_degree, Counters,
    StrataCounters, StrataHit, UniqDegree,
};

pub use crate::stats::{StatsBuilder, StatsSummarizer, UniquenessStats};
