use serde_json::json;

use super::{CommandOutput, build_source, filters_from_pairs, join_fetch};
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::display::{format_page_footer, render_table};
use crate::error::{FolioError, Result};
use crate::list::{FetchOutcome, ListController, ListOptions, ListPipeline, SearchMode};
use crate::types::{
    CollectionKind, Journal, Listable, ReviewAssignment, RoleRequest, SEARCH_FILTER,
};

/// Options for a one-shot list command
#[derive(Debug, Clone)]
pub struct ListArgs {
    pub search: Option<String>,
    pub status: Option<String>,
    pub filters: Vec<(String, String)>,
    pub page: u32,
    pub limit: Option<u32>,
    pub offline: bool,
    pub output: OutputOptions,
}

/// Fetch one page of a collection and print it
pub async fn cmd_list(kind: CollectionKind, args: ListArgs) -> Result<()> {
    match kind {
        CollectionKind::Journals => list_collection::<Journal>(args).await,
        CollectionKind::Assignments => list_collection::<ReviewAssignment>(args).await,
        CollectionKind::RoleRequests => list_collection::<RoleRequest>(args).await,
    }
}

async fn list_collection<T: Listable>(args: ListArgs) -> Result<()> {
    let config = Config::load()?;
    let source = build_source::<T>(&config, args.offline)?;

    let mut filters = filters_from_pairs(&args.filters)?;
    if let Some(search) = args.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        filters.insert(SEARCH_FILTER, search)?;
    }

    let options = ListOptions::new(args.limit.unwrap_or(config.page_size))
        .initial_page(args.page)
        .filters(filters);
    let controller = ListController::new(source, options)?;
    let mut pipeline = ListPipeline::new(
        controller,
        SearchMode::Server {
            filter_key: SEARCH_FILTER.to_string(),
        },
        config.search_debounce(),
    );
    pipeline.set_status(args.status.as_deref())?;

    if let FetchOutcome::Failed(message) = join_fetch(pipeline.mount()).await? {
        return Err(FolioError::Other(message));
    }

    let view = pipeline.view();
    let pagination = view.pagination;

    let json_output = json!({
        "collection": T::KIND.as_str(),
        "items": view.items,
        "page": pagination.current_page(),
        "limit": pagination.limit(),
        "total": pagination.total(),
        "total_pages": pagination.total_pages(),
        "filters": pipeline.controller().filters(),
        "status": view.status,
    });

    let text_output = if view.items.is_empty() {
        format!("No {} found.", T::KIND)
    } else {
        format!(
            "{}\n\n{}",
            render_table(&view.items),
            format_page_footer(&pagination, view.items.len(), view.fetched)
        )
    };

    pipeline.shutdown();

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(args.output)
}
