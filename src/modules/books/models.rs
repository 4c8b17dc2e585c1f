use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::error::BookError;

/// A book held on the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier, fixed at creation
    pub id: String,
    pub name: String,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: u32,
    pub read_page: u32,
    /// Derived: `read_page == page_count` as of the last write
    pub finished: bool,
    pub reading: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub inserted_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Book {
    /// Build a fresh record from a validated draft.
    pub fn new(id: String, draft: BookDraft, now: OffsetDateTime) -> Self {
        Self {
            id,
            finished: draft.is_finished(),
            name: draft.name,
            year: draft.year,
            author: draft.author,
            summary: draft.summary,
            publisher: draft.publisher,
            page_count: draft.page_count,
            read_page: draft.read_page,
            reading: draft.reading,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Replace every mutable field, keeping `id` and `inserted_at`.
    ///
    /// `updated_at` never moves backwards even if `now` does.
    pub fn apply(&mut self, draft: BookDraft, now: OffsetDateTime) {
        self.finished = draft.is_finished();
        self.name = draft.name;
        self.year = draft.year;
        self.author = draft.author;
        self.summary = draft.summary;
        self.publisher = draft.publisher;
        self.page_count = draft.page_count;
        self.read_page = draft.read_page;
        self.reading = draft.reading;
        self.updated_at = self.updated_at.max(now);
    }

    pub fn summary_view(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            publisher: self.publisher.clone(),
        }
    }
}

/// Reduced projection returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: Option<String>,
}

/// Request body for creating or replacing a book.
///
/// Everything is optional on the wire so that a missing name is reported
/// as a validation failure rather than a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub read_page: u32,
    #[serde(default)]
    pub reading: bool,
}

impl BookPayload {
    /// Check the payload, name first and page bounds second.
    pub fn validate(self) -> Result<BookDraft, BookError> {
        let name = match self.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(BookError::MissingName),
        };

        if self.read_page > self.page_count {
            return Err(BookError::PageOverflow {
                read_page: self.read_page,
                page_count: self.page_count,
            });
        }

        Ok(BookDraft {
            name,
            year: self.year,
            author: self.author,
            summary: self.summary,
            publisher: self.publisher,
            page_count: self.page_count,
            read_page: self.read_page,
            reading: self.reading,
        })
    }
}

/// A payload that passed validation; `name` is non-empty and
/// `read_page <= page_count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub name: String,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
}

impl BookDraft {
    pub fn is_finished(&self) -> bool {
        self.read_page == self.page_count
    }
}

/// Raw list query string: `?reading=1&finished=0&name=potter`.
///
/// Keys may repeat, so every supplied value is kept in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookQuery {
    pub reading: Vec<String>,
    pub finished: Vec<String>,
    pub name: Vec<String>,
}

impl FromIterator<(String, String)> for BookQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "reading" => query.reading.push(value),
                "finished" => query.finished.push(value),
                "name" => query.name.push(value),
                _ => {}
            }
        }
        query
    }
}

/// Typed list filter. `None` lets every record through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub reading: Option<bool>,
    pub finished: Option<bool>,
    /// Lowercased needle
    pub name: Option<String>,
}

impl BookFilter {
    pub fn matches_reading(&self, book: &Book) -> bool {
        self.reading.map_or(true, |wanted| book.reading == wanted)
    }

    pub fn matches_finished(&self, book: &Book) -> bool {
        self.finished.map_or(true, |wanted| book.finished == wanted)
    }

    pub fn matches_name(&self, book: &Book) -> bool {
        self.name
            .as_deref()
            .map_or(true, |needle| book.name.to_lowercase().contains(needle))
    }
}

/// A single `"1"` is true; any other supplied value, or a repeated key, is
/// false. No value leaves the flag unset.
fn flag(values: &[String]) -> Option<bool> {
    match values {
        [] => None,
        [value] => Some(value == "1"),
        _ => Some(false),
    }
}

impl From<BookQuery> for BookFilter {
    fn from(query: BookQuery) -> Self {
        Self {
            reading: flag(&query.reading),
            finished: flag(&query.finished),
            // last value wins when the key repeats
            name: query.name.last().map(|name| name.to_lowercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    fn payload(name: Option<&str>, page_count: u32, read_page: u32) -> BookPayload {
        BookPayload {
            name: name.map(str::to_string),
            page_count,
            read_page,
            ..BookPayload::default()
        }
    }

    #[test]
    fn missing_name_is_checked_before_pages() {
        let err = payload(None, 10, 20).validate().unwrap_err();
        assert_eq!(err, BookError::MissingName);

        let err = payload(Some(""), 10, 20).validate().unwrap_err();
        assert_eq!(err, BookError::MissingName);
    }

    #[test]
    fn read_page_beyond_page_count_is_rejected() {
        let err = payload(Some("Dune"), 100, 150).validate().unwrap_err();
        assert_eq!(
            err,
            BookError::PageOverflow {
                read_page: 150,
                page_count: 100
            }
        );
    }

    #[test]
    fn finished_is_derived_from_pages() {
        let now = datetime!(2024-05-01 10:00 UTC);
        let done = Book::new("a".into(), payload(Some("Dune"), 412, 412).validate().unwrap(), now);
        assert!(done.finished);

        let halfway = Book::new("b".into(), payload(Some("Emma"), 400, 200).validate().unwrap(), now);
        assert!(!halfway.finished);
        assert_eq!(halfway.inserted_at, halfway.updated_at);
    }

    #[test]
    fn apply_keeps_identity_and_never_rewinds_updated_at() {
        let created = datetime!(2024-05-01 10:00 UTC);
        let mut book = Book::new(
            "a".into(),
            payload(Some("Dune"), 412, 10).validate().unwrap(),
            created,
        );

        book.apply(
            payload(Some("Dune Messiah"), 256, 256).validate().unwrap(),
            datetime!(2024-04-01 00:00 UTC),
        );

        assert_eq!(book.id, "a");
        assert_eq!(book.name, "Dune Messiah");
        assert!(book.finished);
        assert_eq!(book.inserted_at, created);
        assert_eq!(book.updated_at, created);
    }

    #[test]
    fn book_serializes_in_camel_case_with_rfc3339_times() {
        let book = Book::new(
            "abc".into(),
            payload(Some("Dune"), 412, 412).validate().unwrap(),
            datetime!(2024-05-01 10:00 UTC),
        );
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["pageCount"], 412);
        assert_eq!(value["readPage"], 412);
        assert_eq!(value["insertedAt"], "2024-05-01T10:00:00Z");
        assert_eq!(value["updatedAt"], "2024-05-01T10:00:00Z");
    }

    #[test]
    fn payload_parses_camel_case_fields() {
        let payload: BookPayload = serde_json::from_value(json!({
            "name": "Dune",
            "year": 1965,
            "pageCount": 412,
            "readPage": 100,
            "reading": true
        }))
        .unwrap();
        assert_eq!(payload.page_count, 412);
        assert_eq!(payload.read_page, 100);
        assert!(payload.reading);
        assert_eq!(payload.year, Some(1965));
    }

    fn query(pairs: &[(&str, &str)]) -> BookQuery {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn query_flags_only_accept_one_as_true() {
        let filter = BookFilter::from(query(&[
            ("reading", "1"),
            ("finished", "true"),
            ("name", "PoTTer"),
        ]));
        assert_eq!(filter.reading, Some(true));
        assert_eq!(filter.finished, Some(false));
        assert_eq!(filter.name.as_deref(), Some("potter"));

        let filter = BookFilter::from(query(&[("reading", ""), ("page", "2")]));
        assert_eq!(filter.reading, Some(false));
        assert_eq!(filter.finished, None);
        assert_eq!(filter.name, None);
    }

    #[test]
    fn repeated_query_keys_are_tolerated() {
        let filter = BookFilter::from(query(&[
            ("reading", "1"),
            ("reading", "0"),
            ("name", "dune"),
            ("name", "Emma"),
        ]));
        assert_eq!(filter.reading, Some(false));
        assert_eq!(filter.name.as_deref(), Some("emma"));
    }
}
