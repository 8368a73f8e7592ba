use std::{cmp::Ordering, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
    Score,
    /// Name or title, whichever the record carries.
    Name,
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "score" => Ok(SortKey::Score),
            "name" | "title" => Ok(SortKey::Name),
            other => Err(AppError::ValidationError(format!("Unknown sort key '{other}'"))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(AppError::ValidationError(format!("Unknown sort order '{other}'"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SortValue {
    Date(DateTime<Utc>),
    Number(f64),
    Text(String),
}

impl SortValue {
    fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => compare_text(a, b),
            _ => Ordering::Equal,
        }
    }
}

/// Case-folded comparison first so "apple" and "Banana" sort the way a
/// reader expects; the raw text breaks ties so equal keys stay equal.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub trait Sortable {
    /// `None` means the record has no value for `key` (a pending score);
    /// such records always sort last.
    fn sort_value(&self, key: SortKey) -> Option<SortValue>;
}

impl<T: Sortable + ?Sized> Sortable for &T {
    fn sort_value(&self, key: SortKey) -> Option<SortValue> {
        (**self).sort_value(key)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn asc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Asc)
    }

    pub fn desc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Desc)
    }
}

fn compare_values(a: &Option<SortValue>, b: &Option<SortValue>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => direction.apply(a.compare(b)),
    }
}

pub fn compare<T: Sortable + ?Sized>(a: &T, b: &T, spec: SortSpec) -> Ordering {
    compare_values(&a.sort_value(spec.key), &b.sort_value(spec.key), spec.direction)
}

/// Stable sort; records with equal keys keep their relative order.
pub fn sort_records<T: Sortable>(records: Vec<T>, spec: SortSpec) -> Vec<T> {
    let mut keyed: Vec<(Option<SortValue>, T)> = records
        .into_iter()
        .map(|r| (r.sort_value(spec.key), r))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_values(a, b, spec.direction));
    keyed.into_iter().map(|(_, r)| r).collect()
}
