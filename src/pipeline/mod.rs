//! The list pipeline shared by every manager view:
//! records -> filter -> sort -> paginate.
//!
//! Nothing in here knows about HTTP, routing or where records come from.

pub mod filter;
pub mod paginate;
pub mod sort;
pub mod view;

pub use filter::{is_wildcard, Facet, FilterConfig, Filterable, Predicate};
pub use paginate::{clamp_page, page_bounds, paginate, total_pages, Page};
pub use sort::{compare, sort_records, SortDirection, SortKey, SortSpec, SortValue, Sortable};
pub use view::{ListView, LoadState};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Everything a list view needs to turn a record set into one page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub filters: FilterConfig,
    pub sort: SortSpec,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filters: FilterConfig::default(),
            sort: SortSpec::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListQuery {
    pub fn new(filters: FilterConfig, sort: SortSpec, page: usize, page_size: usize) -> Self {
        Self {
            filters,
            sort,
            page,
            page_size,
        }
    }
}

/// Filtered and sorted, not yet paged.
pub fn filter_and_sort<'a, T>(records: &'a [T], filters: &FilterConfig, sort: SortSpec) -> Vec<&'a T>
where
    T: Filterable + Sortable,
{
    sort_records(filters.apply(records), sort)
}

pub fn run<T>(records: &[T], query: &ListQuery) -> Page<T>
where
    T: Filterable + Sortable + Clone,
{
    let sorted = filter_and_sort(records, &query.filters, query.sort);
    paginate(sorted, query.page, query.page_size).map(T::clone)
}
