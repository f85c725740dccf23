//! The mention aggregation pipeline: dedup and time filtering, mention
//! extraction, statistical aggregation, report building, and optional
//! narrative augmentation, composed by [`run::MentionRun`].

pub mod aggregate;
pub mod extract;
pub mod filter;
pub mod narrative;
pub mod qna;
pub mod report;
pub mod run;

pub use aggregate::AggregateState;
pub use extract::{extract_from_comment, extract_from_submission};
pub use filter::RunFilter;
pub use narrative::NarrativeOutcome;
pub use qna::{answer_question, QnaOutcome};
pub use report::{build_report, ReportLimits};
pub use run::{MentionRun, RunConfig};

/// Content older than this trailing window is excluded from a run.
pub const RETENTION_WINDOW_DAYS: i64 = 7;

/// Mixed tie-break: a neutral average flips to "mixed" when positive and
/// negative counts are both non-zero and differ by less than this fraction
/// of the total. Past revisions disagreed between 0.10 and 0.15; keep it in
/// one place.
pub const MIXED_SPLIT_RATIO: f64 = 0.10;
