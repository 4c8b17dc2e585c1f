//! Insertion-ordered in-memory book collection.

use indexmap::{map::Entry, IndexMap};

use super::error::BookError;
use super::models::{Book, BookFilter, BookSummary};

/// Books keyed by id, iterated in insertion order.
#[derive(Debug, Default)]
pub struct BookStore {
    books: IndexMap<String, Book>,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Append a book. Fails without touching the collection if the id is taken.
    pub fn insert(&mut self, book: Book) -> Result<(), BookError> {
        match self.books.entry(book.id.clone()) {
            Entry::Occupied(entry) => Err(BookError::DuplicateId(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(book);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Book> {
        self.books.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Book> {
        self.books.get_mut(id)
    }

    /// Remove a book, keeping the relative order of the rest.
    pub fn remove(&mut self, id: &str) -> Option<Book> {
        self.books.shift_remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    /// Lazily narrow by reading, then finished, then name, projecting each
    /// survivor to its summary view.
    pub fn summaries<'a>(
        &'a self,
        filter: &'a BookFilter,
    ) -> impl Iterator<Item = BookSummary> + 'a {
        self.iter()
            .filter(move |book| filter.matches_reading(book))
            .filter(move |book| filter.matches_finished(book))
            .filter(move |book| filter.matches_name(book))
            .map(Book::summary_view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::BookPayload;
    use time::macros::datetime;

    fn book(id: &str, name: &str, reading: bool, finished: bool) -> Book {
        let payload = BookPayload {
            name: Some(name.to_string()),
            publisher: Some(format!("{name} Press")),
            page_count: 100,
            read_page: if finished { 100 } else { 10 },
            reading,
            ..BookPayload::default()
        };
        Book::new(
            id.to_string(),
            payload.validate().unwrap(),
            datetime!(2024-01-01 00:00 UTC),
        )
    }

    fn shelf() -> BookStore {
        let mut store = BookStore::new();
        store.insert(book("a", "Harry Potter", true, false)).unwrap();
        store.insert(book("b", "Dune", true, true)).unwrap();
        store.insert(book("c", "Emma", false, true)).unwrap();
        store
    }

    fn ids(store: &BookStore, filter: &BookFilter) -> Vec<String> {
        store.summaries(filter).map(|s| s.id).collect()
    }

    #[test]
    fn duplicate_id_is_rejected_without_mutation() {
        let mut store = shelf();
        let err = store.insert(book("b", "Other", false, false)).unwrap_err();
        assert_eq!(err, BookError::DuplicateId("b".into()));
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("b").map(|b| b.name.as_str()), Some("Dune"));
    }

    #[test]
    fn remove_preserves_order() {
        let mut store = shelf();
        assert!(store.remove("b").is_some());
        assert!(store.remove("b").is_none());
        let order: Vec<&str> = store.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(order, vec!["a", "c"]);
    }

    #[test]
    fn no_filter_returns_everything_in_order() {
        let store = shelf();
        assert_eq!(ids(&store, &BookFilter::default()), vec!["a", "b", "c"]);
    }

    #[test]
    fn filters_compose_by_narrowing() {
        let store = shelf();
        let filter = BookFilter {
            reading: Some(true),
            finished: Some(true),
            name: None,
        };
        assert_eq!(ids(&store, &filter), vec!["b"]);

        let filter = BookFilter {
            reading: Some(false),
            finished: None,
            name: Some("dune".into()),
        };
        assert!(ids(&store, &filter).is_empty());
    }

    #[test]
    fn name_filter_is_case_insensitive_substring() {
        let store = shelf();
        let filter = BookFilter {
            name: Some("potter".into()),
            ..BookFilter::default()
        };
        assert_eq!(ids(&store, &filter), vec!["a"]);
    }

    #[test]
    fn summaries_expose_only_id_name_publisher() {
        let store = shelf();
        let filter = BookFilter::default();
        let first = store.summaries(&filter).next().unwrap();
        assert_eq!(
            first,
            BookSummary {
                id: "a".into(),
                name: "Harry Potter".into(),
                publisher: Some("Harry Potter Press".into()),
            }
        );
    }
}
