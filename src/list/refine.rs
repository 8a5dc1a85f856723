//! Client-side refinement of an already-fetched page.
//!
//! A [`Refinement`] is a named set of pure predicates combined with logical
//! AND. Refinement never touches the server total and never triggers a
//! fetch; it only narrows what the consumer displays.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// Predicate name used for the free-text search term.
pub const SEARCH_PREDICATE: &str = "search";
/// Predicate name used for the categorical status filter.
pub const STATUS_PREDICATE: &str = "status";

pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Records that can be narrowed by text and status.
pub trait Searchable {
    /// Text the search term is matched against.
    fn search_text(&self) -> String;

    /// Categorical status used by the status filter, if the record has one.
    fn status_label(&self) -> Option<String> {
        None
    }

    /// Status labels a status filter may name. Empty accepts any label.
    fn valid_statuses() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }
}

pub struct Refinement<T> {
    predicates: BTreeMap<String, Predicate<T>>,
}

impl<T> Default for Refinement<T> {
    fn default() -> Self {
        Self {
            predicates: BTreeMap::new(),
        }
    }
}

impl<T> Clone for Refinement<T> {
    fn clone(&self) -> Self {
        Self {
            predicates: self.predicates.clone(),
        }
    }
}

impl<T> fmt::Debug for Refinement<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refinement")
            .field("predicates", &self.predicates.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> Refinement<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `set`.
    pub fn with<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.set(name, predicate);
        self
    }

    /// Install or replace the predicate called `name`.
    pub fn set<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.predicates.insert(name.into(), Arc::new(predicate));
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.predicates.remove(name).is_some()
    }

    pub fn clear(&mut self) {
        self.predicates.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.predicates.keys().map(String::as_str)
    }

    /// True when every active predicate accepts `item`.
    pub fn matches(&self, item: &T) -> bool {
        self.predicates.values().all(|p| p(item))
    }
}

/// Narrow `items` to those accepted by every predicate in `refinement`.
///
/// An empty refinement is the identity. `items` is never mutated.
pub fn refine<T: Clone>(items: &[T], refinement: &Refinement<T>) -> Vec<T> {
    if refinement.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| refinement.matches(item))
        .cloned()
        .collect()
}

/// Case-insensitive substring match of `term` against `make_searchable(item)`.
/// A blank term accepts everything.
pub fn text_search<T, F>(
    term: &str,
    make_searchable: F,
) -> impl Fn(&T) -> bool + Send + Sync + 'static + use<T, F>
where
    T: 'static,
    F: Fn(&T) -> String + Send + Sync + 'static,
{
    let needle = term.trim().to_lowercase();
    move |item| needle.is_empty() || make_searchable(item).to_lowercase().contains(&needle)
}

/// Fuzzy match (skim, smart case) of `term` against `make_searchable(item)`.
pub fn fuzzy_search<T, F>(
    term: &str,
    make_searchable: F,
) -> impl Fn(&T) -> bool + Send + Sync + 'static + use<T, F>
where
    T: 'static,
    F: Fn(&T) -> String + Send + Sync + 'static,
{
    let pattern = term.trim().to_string();
    let matcher = SkimMatcherV2::default().smart_case();
    move |item| {
        pattern.is_empty()
            || matcher
                .fuzzy_match(&make_searchable(item), &pattern)
                .is_some()
    }
}

/// Categorical equality: `extract(item) == expected`.
pub fn equals<T, V, F>(
    extract: F,
    expected: V,
) -> impl Fn(&T) -> bool + Send + Sync + 'static + use<T, V, F>
where
    T: 'static,
    V: PartialEq + Send + Sync + 'static,
    F: Fn(&T) -> V + Send + Sync + 'static,
{
    move |item| extract(item) == expected
}

/// Status equality for `Searchable` records, case-insensitive.
pub fn status_is<T: Searchable + 'static>(
    status: &str,
) -> impl Fn(&T) -> bool + Send + Sync + 'static + use<T> {
    let wanted = status.trim().to_lowercase();
    move |item| {
        item.status_label()
            .is_some_and(|label| label.to_lowercase() == wanted)
    }
}

/// Text search over a `Searchable` record's search text.
pub fn search_term<T: Searchable + 'static>(
    term: &str,
) -> impl Fn(&T) -> bool + Send + Sync + 'static + use<T> {
    text_search(term, T::search_text)
}
