//! List acquisition: pagination, debounced query input, staleness-safe
//! fetching, and client-side refinement.

pub mod controller;
pub mod debounce;
pub mod pagination;
pub mod pipeline;
pub mod refine;

pub use controller::{FetchOutcome, FetchPhase, ListController, ListOptions, ListSnapshot};
pub use debounce::{DEFAULT_QUIET_INTERVAL, Debouncer};
pub use pagination::Pagination;
pub use pipeline::{ListPipeline, ListView, QueryEffect, SearchMode};
pub use refine::{
    Predicate, Refinement, SEARCH_PREDICATE, STATUS_PREDICATE, Searchable, equals, fuzzy_search,
    refine, search_term, status_is, text_search,
};
