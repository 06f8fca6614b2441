use serde::Serialize;

use super::book_id::BookId;

/// An insertion-ordered set of book ids (`readBooks`, `readList`, `likedBooks`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Shelf(Vec<BookId>);

impl Shelf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, book: &BookId) -> bool {
        self.0.contains(book)
    }

    /// Returns `true` if the book was not already shelved.
    pub fn insert(&mut self, book: &BookId) -> bool {
        if self.contains(book) {
            return false;
        }
        self.0.push(book.clone());
        true
    }

    /// Returns `true` if the book was shelved.
    pub fn remove(&mut self, book: &BookId) -> bool {
        let before = self.0.len();
        self.0.retain(|b| b != book);
        self.0.len() != before
    }

    /// Flip membership. Returns `true` if the book is shelved afterwards.
    pub fn toggle(&mut self, book: &BookId) -> bool {
        if self.remove(book) {
            false
        } else {
            self.0.push(book.clone());
            true
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &BookId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
