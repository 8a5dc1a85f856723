use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::error::Result;
use crate::list::{ListView, Pagination};
use crate::types::Listable;

pub fn format_status_colored(status: &str) -> String {
    format_status_colored_with_format(status, |s| format!("[{}]", s))
}

pub fn format_status_colored_with_format<F>(status: &str, format_fn: F) -> String
where
    F: Fn(&str) -> String,
{
    let badge = format_fn(status);
    match status {
        "pending" | "paused" => badge.yellow().to_string(),
        "active" | "accepted" | "approved" | "submitted" => badge.green().to_string(),
        "declined" | "rejected" | "overdue" => badge.red().to_string(),
        "archived" => badge.dimmed().to_string(),
        _ => badge,
    }
}

/// Render records as a rounded table, one row per record.
pub fn render_table<T: Listable>(items: &[T]) -> String {
    let mut builder = Builder::default();
    builder.push_record(T::columns().iter().copied());
    for item in items {
        builder.push_record(item.cells());
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// One compact line per record for the interactive browser.
pub fn format_item_line<T: Listable>(item: &T) -> String {
    let cells = item.cells();
    let id = cells.first().map(String::as_str).unwrap_or("?");
    let title = cells.get(1).map(String::as_str).unwrap_or("");
    let status = item
        .status_label()
        .map(|s| format_status_colored(&s))
        .unwrap_or_default();
    format!("{:>5}  {}  {}", id.dimmed(), title, status)
}

/// `Page 2 of 3 (25 total)`, with the refined count when it differs.
pub fn format_page_footer(pagination: &Pagination, shown: usize, fetched: usize) -> String {
    let pages = pagination.total_pages().max(1);
    let mut footer = format!(
        "Page {} of {} ({} total)",
        pagination.current_page(),
        pages,
        pagination.total()
    );
    if shown != fetched {
        footer.push_str(&format!(", showing {shown} of {fetched} on this page"));
    }
    footer
}

/// Status line for a list view: loading indicator, error, active query.
pub fn format_view_status<T>(view: &ListView<T>) -> Option<String> {
    let mut parts = Vec::new();
    if view.loading {
        parts.push("loading...".cyan().to_string());
    }
    if let Some(error) = &view.error {
        parts.push(format!("{} {}", "error:".red().bold(), error));
    }
    if let Some(query) = &view.query {
        parts.push(format!("search: {}", query.cyan()));
    }
    if let Some(status) = &view.status {
        parts.push(format!("status: {}", format_status_colored(status)));
    }
    (!parts.is_empty()).then(|| parts.join("  "))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
