use std::{borrow::Cow, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Categorical fields a list view can narrow on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Category,
    Difficulty,
    Type,
    Role,
    Status,
}

impl Facet {
    pub const ALL: [Facet; 5] = [
        Facet::Category,
        Facet::Difficulty,
        Facet::Type,
        Facet::Role,
        Facet::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::Category => "category",
            Facet::Difficulty => "difficulty",
            Facet::Type => "type",
            Facet::Role => "role",
            Facet::Status => "status",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facet {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Facet::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| AppError::ValidationError(format!("Unknown filter '{s}'")))
    }
}

/// A record that can be searched and narrowed by facet.
pub trait Filterable {
    /// Fields the free-text search looks into.
    fn search_fields(&self) -> Vec<&str>;

    /// `None` when the record type has no such facet.
    fn facet_value(&self, facet: Facet) -> Option<Cow<'_, str>>;
}

impl<T: Filterable + ?Sized> Filterable for &T {
    fn search_fields(&self) -> Vec<&str> {
        (**self).search_fields()
    }

    fn facet_value(&self, facet: Facet) -> Option<Cow<'_, str>> {
        (**self).facet_value(facet)
    }
}

/// `""` and `"all"` select everything.
pub fn is_wildcard(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("all")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring over the record's search fields.
    Text(String),
    /// Exact match on one facet.
    Facet(Facet, String),
}

impl Predicate {
    pub fn is_wildcard(&self) -> bool {
        match self {
            Predicate::Text(query) => query.trim().is_empty(),
            Predicate::Facet(_, value) => is_wildcard(value),
        }
    }

    pub fn matches<T: Filterable + ?Sized>(&self, record: &T) -> bool {
        if self.is_wildcard() {
            return true;
        }
        match self {
            Predicate::Text(query) => {
                let needle = query.trim().to_lowercase();
                record
                    .search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
            Predicate::Facet(facet, value) => record
                .facet_value(*facet)
                .is_some_and(|actual| actual == value.as_str()),
        }
    }
}

/// The free-text query plus categorical selections active in a list view.
/// A record passes when it satisfies every predicate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterConfig {
    predicates: Vec<Predicate>,
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, query: &str) -> Self {
        self.set_search(query);
        self
    }

    pub fn with_facet(mut self, facet: Facet, value: &str) -> Self {
        self.set_facet(facet, value);
        self
    }

    /// Replaces the current text query.
    pub fn set_search(&mut self, query: &str) {
        self.predicates.retain(|p| !matches!(p, Predicate::Text(_)));
        self.predicates.push(Predicate::Text(query.to_string()));
    }

    /// Replaces the current selection for `facet`.
    pub fn set_facet(&mut self, facet: Facet, value: &str) {
        self.predicates
            .retain(|p| !matches!(p, Predicate::Facet(f, _) if *f == facet));
        self.predicates.push(Predicate::Facet(facet, value.to_string()));
    }

    /// Both configurations at once: the union of their predicates.
    pub fn and(&self, other: &FilterConfig) -> FilterConfig {
        let mut predicates = self.predicates.clone();
        predicates.extend(other.predicates.iter().cloned());
        FilterConfig { predicates }
    }

    pub fn search_query(&self) -> Option<&str> {
        self.predicates.iter().find_map(|p| match p {
            Predicate::Text(q) if !q.trim().is_empty() => Some(q.as_str()),
            _ => None,
        })
    }

    pub fn facet(&self, facet: Facet) -> Option<&str> {
        self.predicates.iter().find_map(|p| match p {
            Predicate::Facet(f, v) if *f == facet && !is_wildcard(v) => Some(v.as_str()),
            _ => None,
        })
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// True when no predicate narrows anything.
    pub fn is_empty(&self) -> bool {
        self.predicates.iter().all(Predicate::is_wildcard)
    }

    pub fn matches<T: Filterable + ?Sized>(&self, record: &T) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }

    pub fn apply<'a, T: Filterable>(&self, records: &'a [T]) -> Vec<&'a T> {
        records.iter().filter(|r| self.matches(*r)).collect()
    }
}
