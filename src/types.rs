//! Records served by the publishing API and the collections that hold them.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use jiff::Timestamp;
use jiff::civil::Date;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::FolioError;
use crate::list::Searchable;
use crate::remote::{FilterSet, StaticCollection};

/// Filter key the server uses for free-text search.
pub const SEARCH_FILTER: &str = "search";

/// The collections this client can list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum CollectionKind {
    Journals,
    Assignments,
    RoleRequests,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 3] = [
        CollectionKind::Journals,
        CollectionKind::Assignments,
        CollectionKind::RoleRequests,
    ];

    /// API path, relative to the configured base URL.
    pub fn path(&self) -> &'static str {
        match self {
            CollectionKind::Journals => "journals",
            CollectionKind::Assignments => "reviews/assignments",
            CollectionKind::RoleRequests => "role-requests",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Journals => "journals",
            CollectionKind::Assignments => "assignments",
            CollectionKind::RoleRequests => "role-requests",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionKind {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "journals" | "journal" => Ok(CollectionKind::Journals),
            "assignments" | "assignment" | "reviews" => Ok(CollectionKind::Assignments),
            "role-requests" | "role_requests" | "requests" => Ok(CollectionKind::RoleRequests),
            _ => Err(FolioError::InvalidCollection(s.to_string())),
        }
    }
}

/// A record type that can be listed, filtered and rendered as a table row.
pub trait Listable:
    Searchable + Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    const KIND: CollectionKind;

    /// Table header, one entry per cell of [`Listable::cells`].
    fn columns() -> &'static [&'static str];

    fn cells(&self) -> Vec<String>;

    /// Value of a filterable field, used when filtering static data.
    fn field_value(&self, key: &str) -> Option<String>;

    /// Built-in records served offline or when the API is unreachable.
    fn sample_data() -> Vec<Self> {
        Vec::new()
    }

    /// Server-side filter semantics for in-memory data: `search` is a
    /// case-insensitive substring match, every other key must equal the
    /// field value. Keys the record does not know are ignored.
    fn matches_filters(&self, filters: &FilterSet) -> bool {
        filters.iter().all(|(key, value)| {
            if key == SEARCH_FILTER {
                return self
                    .search_text()
                    .to_lowercase()
                    .contains(&value.to_lowercase());
            }
            match self.field_value(key) {
                Some(field) => field.eq_ignore_ascii_case(value),
                None => true,
            }
        })
    }
}

/// An in-memory collection that filters the way the server does.
pub fn static_collection<T: Listable>(items: Vec<T>) -> StaticCollection<T> {
    StaticCollection::new(items)
        .with_matcher(|item: &T, filters: &FilterSet| item.matches_filters(filters))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JournalStatus {
    #[default]
    Active,
    Paused,
    Archived,
}

enum_labels!(JournalStatus, FolioError::InvalidStatus, {
    Active => "active",
    Paused => "paused",
    Archived => "archived",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issn: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub editor: String,
    #[serde(default)]
    pub status: JournalStatus,
}

impl Searchable for Journal {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.title, self.subject, self.editor)
    }

    fn status_label(&self) -> Option<String> {
        Some(self.status.to_string())
    }

    fn valid_statuses() -> &'static [&'static str] {
        JournalStatus::LABELS
    }
}

impl Listable for Journal {
    const KIND: CollectionKind = CollectionKind::Journals;

    fn columns() -> &'static [&'static str] {
        &["ID", "Title", "Subject", "Editor", "ISSN", "Status"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.subject.clone(),
            self.editor.clone(),
            self.issn.clone().unwrap_or_else(|| "-".to_string()),
            self.status.to_string(),
        ]
    }

    fn field_value(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.to_string()),
            "subject" => Some(self.subject.clone()),
            "editor" => Some(self.editor.clone()),
            "status" => Some(self.status.to_string()),
            "issn" => self.issn.clone(),
            _ => None,
        }
    }

    fn sample_data() -> Vec<Self> {
        sample_journals()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
    Submitted,
    Overdue,
}

enum_labels!(AssignmentStatus, FolioError::InvalidStatus, {
    Pending => "pending",
    Accepted => "accepted",
    Declined => "declined",
    Submitted => "submitted",
    Overdue => "overdue",
});

/// A paper assigned to a reviewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewAssignment {
    pub id: u64,
    pub paper_title: String,
    #[serde(default)]
    pub journal: String,
    #[serde(default)]
    pub reviewer: String,
    #[serde(default)]
    pub status: AssignmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Date>,
    /// Opaque review rating payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<serde_json::Value>,
}

impl Searchable for ReviewAssignment {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.paper_title, self.journal, self.reviewer)
    }

    fn status_label(&self) -> Option<String> {
        Some(self.status.to_string())
    }

    fn valid_statuses() -> &'static [&'static str] {
        AssignmentStatus::LABELS
    }
}

impl Listable for ReviewAssignment {
    const KIND: CollectionKind = CollectionKind::Assignments;

    fn columns() -> &'static [&'static str] {
        &["ID", "Paper", "Journal", "Reviewer", "Due", "Status"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.paper_title.clone(),
            self.journal.clone(),
            self.reviewer.clone(),
            self.due_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.status.to_string(),
        ]
    }

    fn field_value(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.to_string()),
            "journal" => Some(self.journal.clone()),
            "reviewer" => Some(self.reviewer.clone()),
            "status" => Some(self.status.to_string()),
            "due_date" => self.due_date.map(|d| d.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Author,
    Reviewer,
    Editor,
    Admin,
}

enum_labels!(Role, FolioError::InvalidRole, {
    Author => "author",
    Reviewer => "reviewer",
    Editor => "editor",
    Admin => "admin",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

enum_labels!(RequestStatus, FolioError::InvalidStatus, {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

/// A user's request to be granted an elevated role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRequest {
    pub id: u64,
    pub user_name: String,
    #[serde(default)]
    pub email: String,
    pub requested_role: Role,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Searchable for RoleRequest {
    fn search_text(&self) -> String {
        format!("{} {} {}", self.user_name, self.email, self.requested_role)
    }

    fn status_label(&self) -> Option<String> {
        Some(self.status.to_string())
    }

    fn valid_statuses() -> &'static [&'static str] {
        RequestStatus::LABELS
    }
}

impl Listable for RoleRequest {
    const KIND: CollectionKind = CollectionKind::RoleRequests;

    fn columns() -> &'static [&'static str] {
        &["ID", "User", "Email", "Role", "Submitted", "Status"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.user_name.clone(),
            self.email.clone(),
            self.requested_role.to_string(),
            self.submitted_at
                .map(|t| t.strftime("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.status.to_string(),
        ]
    }

    fn field_value(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.to_string()),
            "email" => Some(self.email.clone()),
            "role" | "requested_role" => Some(self.requested_role.to_string()),
            "status" => Some(self.status.to_string()),
            _ => None,
        }
    }
}

/// Built-in journals served when the API is unreachable.
pub fn sample_journals() -> Vec<Journal> {
    let rows: [(&str, &str, &str, Option<&str>, JournalStatus); 12] = [
        (
            "Journal of Applied Machine Learning",
            "computer science",
            "A. Okafor",
            Some("2049-3630"),
            JournalStatus::Active,
        ),
        (
            "Computational Linguistics Review",
            "linguistics",
            "M. Lindqvist",
            Some("1530-9312"),
            JournalStatus::Active,
        ),
        (
            "Annals of Theoretical Physics",
            "physics",
            "R. Haddad",
            Some("0003-4916"),
            JournalStatus::Active,
        ),
        ("Marine Ecology Letters", "biology", "S. Tanaka", None, JournalStatus::Paused),
        (
            "Neural Systems Quarterly",
            "neuroscience",
            "L. Moreau",
            Some("1741-2552"),
            JournalStatus::Active,
        ),
        (
            "Historical Economics",
            "economics",
            "P. Adeyemi",
            Some("0014-4983"),
            JournalStatus::Archived,
        ),
        (
            "Journal of Graph Theory and Algorithms",
            "mathematics",
            "K. Novak",
            Some("0364-9024"),
            JournalStatus::Active,
        ),
        ("Public Health Methods", "medicine", "E. Brennan", None, JournalStatus::Active),
        (
            "Climate Dynamics Letters",
            "earth science",
            "J. Ferreira",
            Some("0930-7575"),
            JournalStatus::Active,
        ),
        (
            "Studies in Medieval Literature",
            "humanities",
            "H. Castell",
            None,
            JournalStatus::Archived,
        ),
        (
            "Neuroimaging Reports",
            "neuroscience",
            "D. Varga",
            Some("2666-9560"),
            JournalStatus::Paused,
        ),
        (
            "Software Engineering Practice",
            "computer science",
            "T. Mensah",
            Some("1382-3256"),
            JournalStatus::Active,
        ),
    ];

    rows.into_iter()
        .zip(1u64..)
        .map(|((title, subject, editor, issn, status), id)| Journal {
            id,
            title: title.to_string(),
            issn: issn.map(str::to_string),
            subject: subject.to_string(),
            editor: editor.to_string(),
            status,
        })
        .collect()
}
