//! The search result cursor.
//!
//! A [`SearchResults`] is bound to one completed query: it walks the
//! matched [`MovieSet`]'s postings in insertion order, one at a time, on
//! demand. It is read-only over the index (it holds a shared borrow) and
//! is dropped at the end of the session or on early termination.

use crate::index::{MovieSet, Posting};

/// Cursor over the postings matched by one query term.
#[derive(Debug)]
pub struct SearchResults<'a> {
    postings: &'a [Posting],
    position: usize,
}

impl<'a> SearchResults<'a> {
    pub(crate) fn new(set: &'a MovieSet) -> Self {
        SearchResults {
            postings: set.postings(),
            position: 0,
        }
    }

    /// Total number of matches for the query.
    pub fn num_results(&self) -> usize {
        self.postings.len()
    }

    /// True if the cursor has postings left to yield.
    pub fn has_more(&self) -> bool {
        self.position < self.postings.len()
    }
}

impl<'a> Iterator for SearchResults<'a> {
    type Item = &'a Posting;

    fn next(&mut self) -> Option<Self::Item> {
        let posting = self.postings.get(self.position)?;
        self.position += 1;
        Some(posting)
    }
}
