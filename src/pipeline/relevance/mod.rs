//! Keyword relevance filter.
//!
//! Narrows the roster to the patients a chat message is about, without
//! involving the model: pattern table → criteria → conjunctive match →
//! bypass / fallback / truncation bounding.

pub mod criteria;
pub mod filter;
pub mod patterns;

pub use criteria::{analyze_query, FilterCriteria};
pub use filter::{
    filter_by_criteria, get_relevant_patients, is_general_query, matches_criteria,
    select_relevant_patients, RelevantSelection, SelectionReason, FALLBACK_PATIENT_COUNT,
    MAX_RELEVANT_PATIENTS,
};
pub use patterns::{AgeRange, QueryPattern, GENERAL_QUERY_TERMS, QUERY_PATTERNS};
