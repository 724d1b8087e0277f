//! In-memory search and pagination over a fetched entity list.
//!
//! # Design
//! Pages keep the full unfiltered list and recompute the filtered view on
//! every query change; there is no debounce and no server-side paging.
//! Page numbers are 1-based and always clamped into the filtered range.

use std::ops::{Range, RangeInclusive};

use uuid::Uuid;

/// Rows per page on table pages.
pub const TABLE_PAGE_SIZE: usize = 10;
/// Cards per page on card-grid pages unless configured otherwise.
pub const DEFAULT_CARD_PAGE_SIZE: usize = 6;
pub const CARD_PAGE_SIZES: RangeInclusive<usize> = 3..=8;

/// An entity that can be shown in a searchable list.
pub trait ListItem {
    fn id(&self) -> Uuid;

    /// Display values matched by the search box.
    fn search_fields(&self) -> Vec<String>;
}

/// Layout of a list page, which fixes its page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Table,
    Cards(usize),
}

impl PageKind {
    pub fn page_size(&self) -> usize {
        match *self {
            PageKind::Table => TABLE_PAGE_SIZE,
            PageKind::Cards(n) => n.clamp(*CARD_PAGE_SIZES.start(), *CARD_PAGE_SIZES.end()),
        }
    }
}

/// `ceil(total / page_size)`; zero items means zero pages.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Index range of `page` (1-based) within a list of `total` items.
pub fn page_bounds(total: usize, page_size: usize, page: usize) -> Range<usize> {
    let start = page.saturating_sub(1).saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    start..end
}

/// Case-insensitive substring match against any search field.
pub fn matches<T: ListItem>(item: &T, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn filter<'a, T: ListItem>(items: &'a [T], query: &str) -> Vec<&'a T> {
    items.iter().filter(|item| matches(*item, query)).collect()
}

/// State behind a searchable, paginated list page.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    items: Vec<T>,
    query: String,
    page: usize,
    page_size: usize,
}

impl<T: ListItem> ListView<T> {
    pub fn new(kind: PageKind) -> Self {
        Self::with_page_size(kind.page_size())
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            query: String::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Swap in a freshly fetched list, keeping the query.
    pub fn replace_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.clamp_page();
    }

    /// Update the search term. A different term starts again at page 1.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.page = 1;
        }
    }

    pub fn filtered(&self) -> Vec<&T> {
        filter(&self.items, &self.query)
    }

    pub fn filtered_len(&self) -> usize {
        self.items.iter().filter(|item| matches(*item, &self.query)).count()
    }

    pub fn total_pages(&self) -> usize {
        page_count(self.filtered_len(), self.page_size)
    }

    /// Move to `page`, clamped into `1..=total_pages`.
    pub fn go_to(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }

    /// Items on the current page.
    pub fn visible(&self) -> Vec<&T> {
        let filtered = self.filtered();
        let range = page_bounds(filtered.len(), self.page_size, self.page);
        filtered[range].to_vec()
    }

    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Apply `f` to the item with `id` in place. Returns whether it was found.
    pub fn patch(&mut self, id: Uuid, f: impl FnOnce(&mut T)) -> bool {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                f(item);
                self.clamp_page();
                true
            }
            None => false,
        }
    }

    /// Replace the item with the same id, or append it.
    pub fn upsert(&mut self, item: T) {
        match self.items.iter().position(|existing| existing.id() == item.id()) {
            Some(index) => self.items[index] = item,
            None => self.items.push(item),
        }
        self.clamp_page();
    }

    /// Remove an item, returning it with its former position.
    pub fn remove(&mut self, id: Uuid) -> Option<(usize, T)> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        let item = self.items.remove(index);
        self.clamp_page();
        Some((index, item))
    }

    /// Put an item back at `index` (or the end if the list shrank).
    pub fn insert_at(&mut self, index: usize, item: T) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        self.clamp_page();
    }

    fn clamp_page(&mut self) {
        let last = self.total_pages().max(1);
        if self.page > last {
            self.page = last;
        }
    }
}
