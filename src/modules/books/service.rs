//! Book operations over a shared store.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::utils::{Clock, IdGenerator, RandomIds, SystemClock};

use super::error::BookError;
use super::models::{Book, BookFilter, BookPayload, BookSummary};
use super::store::BookStore;

/// Owns the shelf and the collaborators that stamp new records.
///
/// A single lock guards the store for every operation, so a reader never
/// observes a half-applied write.
pub struct BookService {
    store: Mutex<BookStore>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl BookService {
    pub fn new(store: BookStore, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            store: Mutex::new(store),
            clock,
            ids,
        }
    }

    fn store(&self) -> Result<MutexGuard<'_, BookStore>, BookError> {
        self.store.lock().map_err(|_| BookError::StoreUnavailable)
    }

    /// Validate and append a new book, returning its id.
    pub fn create(&self, payload: BookPayload) -> Result<String, BookError> {
        let draft = payload.validate()?;
        let id = self.ids.next_id();
        let book = Book::new(id.clone(), draft, self.clock.now());

        let mut store = self.store()?;
        store.insert(book)?;

        if store.get(&id).is_none() {
            return Err(BookError::InsertNotVisible(id));
        }

        tracing::info!(book_id = %id, total = store.len(), "book added");
        Ok(id)
    }

    /// Summaries of every book passing `filter`, in insertion order.
    pub fn list(&self, filter: &BookFilter) -> Result<Vec<BookSummary>, BookError> {
        let store = self.store()?;
        let books: Vec<BookSummary> = store.summaries(filter).collect();
        tracing::debug!(?filter, matched = books.len(), "books listed");
        Ok(books)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Book, BookError> {
        self.store()?
            .get(id)
            .cloned()
            .ok_or_else(|| BookError::NotFound(id.to_string()))
    }

    /// Replace the mutable fields of an existing book.
    ///
    /// The payload is validated before the lookup, so a bad payload is
    /// reported even for an unknown id.
    pub fn update_by_id(&self, id: &str, payload: BookPayload) -> Result<(), BookError> {
        let draft = payload.validate()?;
        let now = self.clock.now();

        let mut store = self.store()?;
        let book = store
            .get_mut(id)
            .ok_or_else(|| BookError::NotFound(id.to_string()))?;
        book.apply(draft, now);

        tracing::info!(book_id = %id, finished = book.finished, "book updated");
        Ok(())
    }

    pub fn delete_by_id(&self, id: &str) -> Result<(), BookError> {
        let mut store = self.store()?;
        store
            .remove(id)
            .ok_or_else(|| BookError::NotFound(id.to_string()))?;

        tracing::info!(book_id = %id, total = store.len(), "book deleted");
        Ok(())
    }

    /// Number of books currently on the shelf
    pub fn book_count(&self) -> Result<usize, BookError> {
        Ok(self.store()?.len())
    }
}

impl Default for BookService {
    fn default() -> Self {
        Self::new(
            BookStore::new(),
            Arc::new(SystemClock),
            Arc::new(RandomIds),
        )
    }
}
