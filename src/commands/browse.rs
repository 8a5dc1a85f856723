//! Line-driven interactive browser.
//!
//! Reads stdin one line at a time. Plain text is a search query that is
//! debounced and then narrows the fetched page. Lines starting with `:` are
//! commands that page, filter or refresh the list. The list re-renders
//! whenever a fetch completes.

use std::io::Write;

use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use super::{build_source, filters_from_pairs};
use crate::config::Config;
use crate::display::{format_item_line, format_page_footer, format_view_status};
use crate::error::{FolioError, Result};
use crate::list::{
    FetchOutcome, ListController, ListOptions, ListPipeline, QueryEffect, SearchMode,
};
use crate::remote::FilterSet;
use crate::remote::filters::parse_filter_pair;
use crate::types::{CollectionKind, Journal, Listable, ReviewAssignment, RoleRequest};

const HELP: &str = "\
Type to search the current page. Commands:
  :n / :p          next / previous page
  :page N          jump to page N
  :status S|all    show only status S, or every status
  :filter k=v      add a server-side filter (resets to page 1)
  :unfilter k      remove a server-side filter
  :r               refresh
  :clear           clear the search
  :help            show this help
  :q               quit";

#[derive(Debug, Clone)]
pub struct BrowseOptions {
    pub filters: Vec<(String, String)>,
    pub limit: Option<u32>,
    pub offline: bool,
    /// Match search input as a fuzzy subsequence instead of a substring
    pub fuzzy: bool,
}

/// One line of browser input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    NextPage,
    PrevPage,
    Page(u32),
    Status(Option<String>),
    Filter(String, String),
    Unfilter(String),
    Refresh,
    Help,
    Quit,
}

pub fn parse_browse_command(line: &str) -> Result<BrowseCommand> {
    let Some(command) = line.trim().strip_prefix(':') else {
        return Ok(BrowseCommand::Search(line.trim().to_string()));
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    let missing = |what: &str| FolioError::validation("command", format!(":{name} needs {what}"));

    match name {
        "n" | "next" => Ok(BrowseCommand::NextPage),
        "p" | "prev" => Ok(BrowseCommand::PrevPage),
        "page" => {
            if arg.is_empty() {
                return Err(missing("a page number"));
            }
            arg.parse().map(BrowseCommand::Page).map_err(|_| {
                FolioError::validation("page", format!("'{arg}' is not a page number"))
            })
        }
        "status" => match arg {
            "" => Err(missing("a status or 'all'")),
            "all" => Ok(BrowseCommand::Status(None)),
            status => Ok(BrowseCommand::Status(Some(status.to_string()))),
        },
        "filter" => {
            if arg.is_empty() {
                return Err(missing("key=value"));
            }
            let (key, value) = parse_filter_pair(arg)?;
            Ok(BrowseCommand::Filter(key, value))
        }
        "unfilter" => {
            if arg.is_empty() {
                return Err(missing("a filter key"));
            }
            Ok(BrowseCommand::Unfilter(arg.to_string()))
        }
        "r" | "refresh" => Ok(BrowseCommand::Refresh),
        "clear" => Ok(BrowseCommand::Search(String::new())),
        "h" | "help" | "?" => Ok(BrowseCommand::Help),
        "q" | "quit" => Ok(BrowseCommand::Quit),
        other => Err(FolioError::validation(
            "command",
            format!("unknown command ':{other}', try :help"),
        )),
    }
}

/// Browse a collection interactively
pub async fn cmd_browse(kind: CollectionKind, options: BrowseOptions) -> Result<()> {
    match kind {
        CollectionKind::Journals => browse::<Journal>(options).await,
        CollectionKind::Assignments => browse::<ReviewAssignment>(options).await,
        CollectionKind::RoleRequests => browse::<RoleRequest>(options).await,
    }
}

async fn browse<T: Listable>(options: BrowseOptions) -> Result<()> {
    let config = Config::load()?;
    let source = build_source::<T>(&config, options.offline)?;
    let filters = filters_from_pairs(&options.filters)?;

    let controller = ListController::new(
        source,
        ListOptions::new(options.limit.unwrap_or(config.page_size)).filters(filters),
    )?;
    let mut changes = controller.subscribe();
    let mode = if options.fuzzy {
        SearchMode::Fuzzy
    } else {
        SearchMode::Client
    };
    let mut pipeline = ListPipeline::new(controller, mode, config.search_debounce());

    println!("Browsing {} (:help for commands)", T::KIND.bold());
    pipeline.controller().mount().await;
    changes.borrow_and_update();
    render(&pipeline);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Vec<JoinHandle<FetchOutcome>> = Vec::new();
    loop {
        pending.retain(|handle| !handle.is_finished());
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_browse_command(&line) {
                    Ok(BrowseCommand::Quit) => {
                        pipeline.shutdown();
                        return Ok(());
                    }
                    Ok(command) => match handle_command(&mut pipeline, command) {
                        Ok(Some(handle)) => pending.push(handle),
                        Ok(None) => {}
                        Err(e) => eprintln!("{} {e}", "error:".red()),
                    },
                    Err(e) => eprintln!("{} {e}", "error:".red()),
                }
            }
            Some(query) = pipeline.next_settled() => {
                match pipeline.apply_query(&query) {
                    Ok(QueryEffect::Unchanged) => {}
                    Ok(_) => render(&pipeline),
                    Err(e) => eprintln!("{} {e}", "error:".red()),
                }
            }
            Ok(()) = changes.changed() => {
                changes.borrow_and_update();
                if !pipeline.view().loading {
                    render(&pipeline);
                }
            }
        }
    }

    // Input closed: let pending input settle and in-flight fetches land.
    let mut dirty = false;
    let settled = if pipeline.has_pending_input() {
        pipeline.next_settled().await
    } else {
        pipeline.try_settled()
    };
    if let Some(query) = settled {
        dirty = !matches!(pipeline.apply_query(&query)?, QueryEffect::Unchanged);
    }
    for handle in pending {
        let _ = handle.await;
    }
    if dirty || changes.has_changed().unwrap_or(false) {
        render(&pipeline);
    }

    pipeline.shutdown();
    Ok(())
}

fn handle_command<T: Listable>(
    pipeline: &mut ListPipeline<T>,
    command: BrowseCommand,
) -> Result<Option<JoinHandle<FetchOutcome>>> {
    let current = pipeline.view().pagination.current_page();
    let handle = match command {
        BrowseCommand::Search(query) => {
            pipeline.input(query);
            None
        }
        BrowseCommand::NextPage => Some(pipeline.go_to_page(current.saturating_add(1))),
        BrowseCommand::PrevPage => Some(pipeline.go_to_page(current.saturating_sub(1))),
        BrowseCommand::Page(page) => Some(pipeline.go_to_page(page)),
        BrowseCommand::Refresh => Some(pipeline.refresh()),
        BrowseCommand::Status(status) => {
            pipeline.set_status(status.as_deref())?;
            render(pipeline);
            None
        }
        BrowseCommand::Filter(key, value) => {
            stage_filter_change(pipeline, |filters| filters.insert(&key, &value).map(drop))?
        }
        BrowseCommand::Unfilter(key) => stage_filter_change(pipeline, |filters| {
            filters
                .remove(&key)
                .map(drop)
                .ok_or_else(|| FolioError::validation("filter", format!("'{key}' is not set")))
        })?,
        BrowseCommand::Help => {
            println!("{HELP}");
            None
        }
        BrowseCommand::Quit => None,
    };
    Ok(handle)
}

/// Edit the filters now and fetch page 1 in the background. Staging under
/// the list lock keeps back-to-back edits from overwriting each other.
fn stage_filter_change<T, F>(
    pipeline: &ListPipeline<T>,
    update: F,
) -> Result<Option<JoinHandle<FetchOutcome>>>
where
    T: Listable,
    F: FnOnce(&mut FilterSet) -> Result<()>,
{
    let controller = pipeline.controller();
    if !controller.stage_filters(update)? {
        return Ok(None);
    }
    let controller = controller.clone();
    Ok(Some(tokio::spawn(async move { controller.fetch_first_page().await })))
}

fn render<T: Listable>(pipeline: &ListPipeline<T>) {
    let view = pipeline.view();
    let mut out = std::io::stdout().lock();

    let _ = writeln!(out);
    if let Some(status) = format_view_status(&view) {
        let _ = writeln!(out, "{status}");
    }
    if view.items.is_empty() {
        let _ = writeln!(out, "{}", format!("No {} on this page.", T::KIND).dimmed());
    }
    for item in &view.items {
        let _ = writeln!(out, "{}", format_item_line(item));
    }
    let filters = pipeline.controller().filters();
    let mut footer = format_page_footer(&view.pagination, view.items.len(), view.fetched);
    if !filters.is_empty() {
        footer.push_str(&format!(" [{filters}]"));
    }
    let _ = writeln!(out, "{}", footer.dimmed());
    let _ = out.flush();
}
