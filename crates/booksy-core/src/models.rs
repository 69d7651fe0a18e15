//! Data models for Booksy
//!
//! Defines the book record as it is stored on disk, the closed set of book
//! formats, and the summary shown in book listings.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog;
use crate::error::{BooksyError, Result};
use crate::order;
use crate::section::{chapter_key, chapter_number, is_chapter};

/// Section key to section text, in insertion order
pub type Content = IndexMap<String, String>;

/// The kind of book being written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookFormat {
    #[serde(rename = "novel")]
    Novel,
    #[serde(rename = "poetry_collection")]
    PoetryCollection,
    #[serde(rename = "memoir")]
    Memoir,
    #[serde(rename = "cookbook")]
    Cookbook,
    #[serde(rename = "children_s_book", alias = "children's_book")]
    ChildrensBook,
    #[serde(rename = "technical_business")]
    TechnicalBusiness,
}

impl BookFormat {
    /// Every supported format, in menu order
    pub const ALL: [BookFormat; 6] = [
        BookFormat::Novel,
        BookFormat::PoetryCollection,
        BookFormat::Memoir,
        BookFormat::Cookbook,
        BookFormat::ChildrensBook,
        BookFormat::TechnicalBusiness,
    ];

    /// Stored key, e.g. `technical_business`
    pub fn key(self) -> &'static str {
        catalog::spec(self).key
    }

    /// Human-readable name, e.g. `Technical/Business`
    pub fn display_name(self) -> &'static str {
        catalog::spec(self).display_name
    }

    /// Whether chapters can be added to books of this format
    pub fn has_chapters(self) -> bool {
        catalog::spec(self).has_chapters()
    }
}

impl fmt::Display for BookFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for BookFormat {
    type Err = BooksyError;

    /// Accepts stored keys and display names: `"Children's Book"` and
    /// `children_s_book` both parse.
    fn from_str(s: &str) -> Result<Self> {
        let key = normalize_format_name(s);
        catalog::spec_by_key(&key)
            .map(|spec| spec.format)
            .ok_or_else(|| BooksyError::UnsupportedFormat {
                format: s.to_string(),
            })
    }
}

/// Lowercase and replace every non-alphanumeric character with `_`
fn normalize_format_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// A book and all of its section text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    /// Unique identifier
    pub id: Uuid,
    /// Book title
    pub title: String,
    /// Author name
    pub author: String,
    /// Declared format, fixes the template and section order
    pub format: BookFormat,
    /// When this book was created
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    /// When this book was last changed
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    /// Section key to section text
    #[serde(default)]
    pub content: Content,
}

impl Book {
    /// Create a new book populated from its format's template
    ///
    /// Title and author are trimmed and must not be empty.
    pub fn new(title: &str, author: &str, format: BookFormat) -> Result<Self> {
        let title = title.trim();
        let author = author.trim();
        if title.is_empty() {
            return Err(BooksyError::InvalidInput("title cannot be empty".into()));
        }
        if author.is_empty() {
            return Err(BooksyError::InvalidInput("author cannot be empty".into()));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            author: author.to_string(),
            format,
            created_at: now,
            updated_at: now,
            content: catalog::template(format, title, author),
        })
    }

    /// Mark the book as changed now
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Text of a section
    pub fn section(&self, key: &str) -> Option<&str> {
        self.content.get(key).map(String::as_str)
    }

    /// Section keys in display/export order
    pub fn section_order(&self) -> Vec<&str> {
        order::content_order(self.format, &self.content)
    }

    /// Sections with their text in display/export order
    pub fn ordered_sections(&self) -> Vec<(&str, &str)> {
        self.section_order()
            .into_iter()
            .filter_map(|key| self.section(key).map(|text| (key, text)))
            .collect()
    }

    /// All chapter keys, unordered
    pub fn chapter_keys(&self) -> impl Iterator<Item = &str> {
        self.content
            .keys()
            .map(String::as_str)
            .filter(|key| is_chapter(key))
    }

    /// The chapter with the highest number, after which new chapters go
    pub fn last_chapter(&self) -> Option<&str> {
        self.chapter_keys()
            .filter_map(|key| chapter_number(key).map(|n| (n, key)))
            .max_by_key(|(n, _)| *n)
            .map(|(_, key)| key)
    }

    /// Number the next added chapter gets: highest existing number plus one
    ///
    /// `None` once chapter numbers are exhausted.
    pub fn next_chapter_number(&self) -> Option<u32> {
        let highest = self.chapter_keys().filter_map(chapter_number).max().unwrap_or(0);
        highest.checked_add(1)
    }

    /// Append a numbered chapter with boilerplate text and return its key
    pub fn add_chapter(&mut self) -> Result<String> {
        if !self.format.has_chapters() {
            return Err(BooksyError::ChaptersNotSupported {
                format: self.format.key().to_string(),
            });
        }

        let n = self
            .next_chapter_number()
            .ok_or_else(|| BooksyError::InvalidInput("no chapter numbers left".into()))?;
        let key = chapter_key(n);
        self.content.insert(key.clone(), catalog::chapter_boilerplate(n));
        self.touch();
        Ok(key)
    }

    /// Remove a chapter
    ///
    /// Any chapter key is accepted; keeping the first two chapters is left
    /// to the caller (see [`crate::section::is_protected_chapter`]).
    pub fn delete_chapter(&mut self, key: &str) -> Result<()> {
        if !is_chapter(key) {
            return Err(BooksyError::NotAChapter {
                key: key.to_string(),
            });
        }
        if self.content.shift_remove(key).is_none() {
            return Err(BooksyError::MissingSectionKey {
                key: key.to_string(),
            });
        }
        self.touch();
        Ok(())
    }

    /// Overwrite the text of an existing section
    pub fn update_section(&mut self, key: &str, text: impl Into<String>) -> Result<()> {
        match self.content.get_mut(key) {
            Some(slot) => {
                *slot = text.into();
                self.touch();
                Ok(())
            }
            None => Err(BooksyError::MissingSectionKey {
                key: key.to_string(),
            }),
        }
    }

    /// Total whitespace-separated words over all sections
    pub fn word_count(&self) -> usize {
        self.content.values().map(|text| word_count(text)).sum()
    }

    /// Summary for book listings
    pub fn summary(&self) -> BookSummary {
        BookSummary {
            id: self.id,
            title: self.title.clone(),
            author: self.author.clone(),
            format: self.format,
            created_at: self.created_at,
            updated_at: self.updated_at,
            section_count: self.content.len(),
            word_count: self.word_count(),
        }
    }
}

/// Words in a piece of section text
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// What the book list shows for each book
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub format: BookFormat,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub section_count: usize,
    pub word_count: usize,
}

/// ISO-8601 timestamps
///
/// Written as RFC 3339 in UTC. Older stores hold naive local timestamps such
/// as `2024-03-01T09:15:00.123456`; those are read as local time.
pub(crate) mod timestamp {
    use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        let naive = raw.parse::<NaiveDateTime>().ok()?;
        let local = Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            // Falls in a DST gap
            .unwrap_or_else(|| naive.and_utc());
        Some(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn novel() -> Book {
        Book::new("The Long Road", "Jo Writer", BookFormat::Novel).unwrap()
    }

    #[test]
    fn test_book_new() {
        let book = novel();
        assert_eq!(book.title, "The Long Road");
        assert_eq!(book.author, "Jo Writer");
        assert_eq!(book.format, BookFormat::Novel);
        assert_eq!(book.created_at, book.updated_at);
        assert!(book.content.contains_key("prologue"));
        assert_eq!(book.section("title_page"), Some("The Long Road\n\nby Jo Writer"));
    }

    #[test]
    fn test_book_new_rejects_blank_fields() {
        assert!(matches!(
            Book::new("  ", "A", BookFormat::Novel),
            Err(BooksyError::InvalidInput(_))
        ));
        assert!(matches!(
            Book::new("T", "", BookFormat::Novel),
            Err(BooksyError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("novel".parse::<BookFormat>().unwrap(), BookFormat::Novel);
        assert_eq!(
            "Poetry Collection".parse::<BookFormat>().unwrap(),
            BookFormat::PoetryCollection
        );
        assert_eq!(
            "Children's Book".parse::<BookFormat>().unwrap(),
            BookFormat::ChildrensBook
        );
        assert_eq!(
            "Technical/Business".parse::<BookFormat>().unwrap(),
            BookFormat::TechnicalBusiness
        );
        assert!(matches!(
            "screenplay".parse::<BookFormat>(),
            Err(BooksyError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_format_serde_keys() {
        for format in BookFormat::ALL {
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{}\"", format.key()));
        }
        let legacy: BookFormat = serde_json::from_str("\"children's_book\"").unwrap();
        assert_eq!(legacy, BookFormat::ChildrensBook);
        assert!(serde_json::from_str::<BookFormat>("\"screenplay\"").is_err());
    }

    #[test]
    fn test_format_display() {
        assert_eq!(BookFormat::ChildrensBook.to_string(), "Children's Book");
        assert_eq!(BookFormat::Novel.key(), "novel");
    }

    #[test]
    fn test_add_chapter() {
        let mut book = novel();
        let before = book.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(5));

        let key = book.add_chapter().unwrap();
        assert_eq!(key, "chapter_3");
        assert_eq!(
            book.section("chapter_3"),
            Some("# Chapter 3\n\n[Write your chapter content here...]")
        );
        assert!(book.updated_at > before);
        assert_eq!(book.last_chapter(), Some("chapter_3"));
    }

    #[test]
    fn test_add_chapter_after_out_of_order_delete() {
        let mut book = novel();
        book.add_chapter().unwrap(); // chapter_3
        book.update_section("chapter_3", "keep me").unwrap();

        book.delete_chapter("chapter_2").unwrap();
        let key = book.add_chapter().unwrap();

        assert_eq!(key, "chapter_4");
        assert_eq!(book.section("chapter_3"), Some("keep me"));
        assert_eq!(book.chapter_keys().count(), 3);
    }

    #[test]
    fn test_add_chapter_memoir_named_chapters() {
        let mut book = Book::new("Me", "I", BookFormat::Memoir).unwrap();
        assert_eq!(book.add_chapter().unwrap(), "chapter_3");
    }

    #[test]
    fn test_add_chapter_unsupported_format() {
        let mut book = Book::new("Soups", "Ada", BookFormat::Cookbook).unwrap();
        let before = book.clone();
        assert!(matches!(
            book.add_chapter(),
            Err(BooksyError::ChaptersNotSupported { .. })
        ));
        assert_eq!(book, before);
    }

    #[test]
    fn test_delete_chapter() {
        let mut book = novel();
        book.add_chapter().unwrap();
        book.delete_chapter("chapter_3").unwrap();

        assert!(book.section("chapter_3").is_none());
        assert!(!book.section_order().contains(&"chapter_3"));
    }

    #[test]
    fn test_delete_chapter_errors() {
        let mut book = novel();
        assert!(matches!(
            book.delete_chapter("prologue"),
            Err(BooksyError::NotAChapter { .. })
        ));
        assert!(matches!(
            book.delete_chapter("chapter_9"),
            Err(BooksyError::MissingSectionKey { .. })
        ));
        assert!(book.content.contains_key("prologue"));
    }

    #[test]
    fn test_core_allows_deleting_first_chapter() {
        let mut book = novel();
        book.delete_chapter("chapter_1").unwrap();
        assert!(book.section("chapter_1").is_none());
    }

    #[test]
    fn test_update_section_verbatim() {
        let mut book = novel();
        let text = "# Kapitel Eins\n\n## Überschrift\n\nCafé, naïve 🚀 «quoted»\n\n";
        book.update_section("prologue", text).unwrap();
        assert_eq!(book.section("prologue"), Some(text));
    }

    #[test]
    fn test_update_missing_section() {
        let mut book = novel();
        let result = book.update_section("glossary", "text");
        assert!(matches!(result, Err(BooksyError::MissingSectionKey { .. })));
        assert!(book.section("glossary").is_none());
    }

    #[test]
    fn test_word_count_and_summary() {
        let mut book = Book::new("T", "A", BookFormat::ChildrensBook).unwrap();
        book.content.clear();
        book.content.insert("title_page".into(), "T\n\nby A".into());
        book.content.insert("chapter_1".into(), "one two  three\nfour".into());

        assert_eq!(book.word_count(), 7);
        let summary = book.summary();
        assert_eq!(summary.section_count, 2);
        assert_eq!(summary.word_count, 7);
        assert_eq!(summary.id, book.id);
    }

    #[test]
    fn test_book_serialization() {
        let book = novel();
        let json = serde_json::to_string(&book).unwrap();
        let deserialized: Book = serde_json::from_str(&json).unwrap();
        assert_eq!(book, deserialized);
    }

    #[test]
    fn test_book_field_names() {
        let book = novel();
        let value = serde_json::to_value(&book).unwrap();
        for field in [
            "id",
            "title",
            "author",
            "format",
            "created_at",
            "updated_at",
            "content",
        ] {
            assert!(value.get(field).is_some(), "missing field {}", field);
        }
        assert_eq!(value["format"], "novel");
        assert_eq!(value["id"], book.id.to_string());
    }

    #[test]
    fn test_legacy_record_loads() {
        let json = r#"{
            "id": "6f1c2d7e-2a7b-4a8e-9a43-3f0c1d2e3b4a",
            "title": "Old Book",
            "author": "Someone",
            "format": "children's_book",
            "created_at": "2024-03-01T09:15:00.123456",
            "updated_at": "2024-03-02T10:00:00",
            "content": {"title_page": "Old Book\n\nby Someone"}
        }"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.format, BookFormat::ChildrensBook);
        assert!(book.updated_at > book.created_at);
    }

    #[test]
    fn test_content_keeps_stored_key_order() {
        let json = r#"{
            "id": "6f1c2d7e-2a7b-4a8e-9a43-3f0c1d2e3b4a",
            "title": "Bedtime",
            "author": "Someone",
            "format": "children_s_book",
            "created_at": "2024-03-01T09:15:00",
            "updated_at": "2024-03-01T09:15:00",
            "content": {
                "title_page": "Bedtime\n\nby Someone",
                "chapter_1": "one",
                "chapter_2": "two",
                "activities": "draw",
                "chapter_3": "three",
                "chapter_10": "ten"
            }
        }"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(
            book.section_order(),
            vec!["title_page", "chapter_1", "chapter_2", "activities", "chapter_3", "chapter_10"]
        );

        let saved = serde_json::to_string(&book).unwrap();
        let reloaded: Book = serde_json::from_str(&saved).unwrap();
        let keys: Vec<_> = reloaded.content.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["title_page", "chapter_1", "chapter_2", "activities", "chapter_3", "chapter_10"]
        );
    }

    #[test]
    fn test_delete_chapter_keeps_remaining_order() {
        let mut book = novel();
        book.add_chapter().unwrap();
        book.delete_chapter("chapter_2").unwrap();
        let keys: Vec<_> = book.content.keys().map(String::as_str).collect();
        let prologue = keys.iter().position(|k| *k == "prologue").unwrap();
        let chapter_3 = keys.iter().position(|k| *k == "chapter_3").unwrap();
        assert!(prologue < chapter_3);
        assert_eq!(keys.last(), Some(&"chapter_3"));
    }

    #[test]
    fn test_timestamp_parse() {
        let utc = timestamp::parse("2024-05-01T12:00:00Z").unwrap();
        assert_eq!(utc.to_rfc3339(), "2024-05-01T12:00:00+00:00");
        assert!(timestamp::parse("2024-05-01T12:00:00.5").is_some());
        assert!(timestamp::parse("yesterday").is_none());
    }
}
