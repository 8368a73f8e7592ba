use std::future::Future;

use crate::{
    errors::{AppError, AppResult},
    pipeline::{
        clamp_page, filter_and_sort, paginate, total_pages, Facet, FilterConfig, Filterable,
        ListQuery, Page, SortSpec, Sortable,
    },
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// State behind one manager view: the fetched records, the load status and
/// the current filter/sort/page selection. The stored page is kept in range
/// after every change.
#[derive(Clone, Debug)]
pub struct ListView<T> {
    label: String,
    records: Vec<T>,
    state: LoadState,
    query: ListQuery,
}

impl<T> ListView<T>
where
    T: Filterable + Sortable + Clone,
{
    pub fn new(label: &str, page_size: usize) -> Self {
        Self {
            label: label.to_string(),
            records: Vec::new(),
            state: LoadState::Idle,
            query: ListQuery {
                page_size: page_size.max(1),
                ..ListQuery::default()
            },
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn current_page_number(&self) -> usize {
        self.query.page
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Marks a fetch as started. Returns false if one is already in flight.
    pub fn begin_load(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        self.state = LoadState::Loading;
        true
    }

    pub fn finish_load(&mut self, result: AppResult<Vec<T>>) {
        match result {
            Ok(records) => {
                self.records = records;
                self.state = LoadState::Loaded;
                self.clamp();
            }
            Err(err) => {
                log::warn!("{} view failed to load: {}", self.label, err);
                self.state = LoadState::Failed(AppError::load_failed(&self.label).to_string());
            }
        }
    }

    /// Runs one fetch. Calling this again after a failure is the retry.
    pub async fn load<Fut>(&mut self, fetch: Fut) -> bool
    where
        Fut: Future<Output = AppResult<Vec<T>>>,
    {
        if !self.begin_load() {
            return false;
        }
        let result = fetch.await;
        self.finish_load(result);
        self.error().is_none()
    }

    pub fn set_search(&mut self, query: &str) {
        self.query.filters.set_search(query);
        self.query.page = 1;
    }

    pub fn set_facet(&mut self, facet: Facet, value: &str) {
        self.query.filters.set_facet(facet, value);
        self.query.page = 1;
    }

    pub fn set_filters(&mut self, filters: FilterConfig) {
        self.query.filters = filters;
        self.query.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.query.page_size = page_size.max(1);
        self.query.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.query.sort = sort;
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.query.page = page;
        self.clamp();
    }

    /// Drops matching records, then pulls the page back into range.
    pub fn remove_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        let before = self.records.len();
        self.records.retain(|r| !predicate(r));
        self.clamp();
        before - self.records.len()
    }

    pub fn upsert<F>(&mut self, record: T, same: F)
    where
        F: Fn(&T, &T) -> bool,
    {
        match self.records.iter_mut().find(|r| same(r, &record)) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
        self.clamp();
    }

    pub fn filtered_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| self.query.filters.matches(*r))
            .count()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered_count(), self.query.page_size)
    }

    pub fn current_page(&self) -> Page<T> {
        let sorted = filter_and_sort(&self.records, &self.query.filters, self.query.sort);
        paginate(sorted, self.query.page, self.query.page_size).map(T::clone)
    }

    fn clamp(&mut self) {
        self.query.page = clamp_page(self.query.page, self.total_pages());
    }
}
