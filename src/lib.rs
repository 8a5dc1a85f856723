#[macro_use]
mod macros;

pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod list;
pub mod remote;
pub mod types;

pub use config::Config;
pub use error::{FolioError, Result};
pub use list::{
    Debouncer, FetchOutcome, FetchPhase, ListController, ListOptions, ListPipeline, ListSnapshot,
    ListView, Pagination, QueryEffect, Refinement, SearchMode, Searchable, refine,
};
pub use remote::{
    FilterSet, HttpCollection, PageRequest, PageResult, RemoteCollection, SharedCollection,
    StaticCollection, WithFallback,
};
pub use types::{
    AssignmentStatus, CollectionKind, Journal, JournalStatus, Listable, RequestStatus,
    ReviewAssignment, Role, RoleRequest,
};
