//! The inverted movie index.
//!
//! [`MovieIndex`] maintains five field indices — title word, genre, year,
//! type, and id — each backed by its own [`HashTable`] so that a lookup by
//! `(field, term)` is unambiguous. Values are [`MovieSet`]s: the ordered
//! postings recorded under one normalized term.
//!
//! Keys are FNV-1a hashes of the normalized term; the year index hashes
//! the year's integer value through the little-endian integer form instead
//! of its decimal string.

use log::debug;

use crate::analysis::{normalize, tokenize};
use crate::error::Result;
use crate::hashtable::{HashTable, fnv1a_64, fnv1a_64_int};
use crate::movie::Movie;
use crate::search::SearchResults;

/// Initial bucket count for each field index.
const INDEX_BUCKETS: usize = 128;

/// The field a term is indexed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexField {
    /// Individual words of the title.
    Title,
    /// Genre names.
    Genre,
    /// Release year.
    Year,
    /// Record type ("movie", "short", ...).
    Type,
    /// Record identifier.
    Id,
}

impl IndexField {
    /// All field kinds, in reporting order.
    pub const ALL: [IndexField; 5] = [
        IndexField::Title,
        IndexField::Genre,
        IndexField::Year,
        IndexField::Type,
        IndexField::Id,
    ];

    /// Human-readable field name.
    pub fn name(&self) -> &'static str {
        match self {
            IndexField::Title => "title",
            IndexField::Genre => "genre",
            IndexField::Year => "year",
            IndexField::Type => "type",
            IndexField::Id => "id",
        }
    }
}

/// One recorded occurrence of a document under an index term.
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    /// Document id of the corpus file the record came from.
    pub doc_id: u64,
    /// Byte offset of the record's row within that file.
    pub offset: u64,
    /// The record's title, used for duplicate elimination and reports.
    pub title: String,
}

/// The postings recorded under one normalized index term.
///
/// Within one set no two postings share a title: adding a posting whose
/// title is already present removes the old posting first, so the newest
/// write wins when a record is reprocessed.
#[derive(Debug, Clone)]
pub struct MovieSet {
    description: String,
    postings: Vec<Posting>,
}

impl MovieSet {
    fn new(description: &str) -> Self {
        MovieSet {
            description: description.to_string(),
            postings: Vec::new(),
        }
    }

    /// The normalized term this set is keyed by.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of postings in the set.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// True if the set holds no postings.
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// The postings, in insertion order.
    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    fn add(&mut self, posting: Posting) {
        let existing = self
            .postings
            .iter()
            .position(|present| present.title == posting.title);
        if let Some(position) = existing {
            self.postings.remove(position);
        }
        self.postings.push(posting);
    }
}

/// The five-field inverted index over the movie corpus.
///
/// Built once, single-threaded, before any connection is accepted; all
/// lookup paths take `&self` and the index is never mutated after build.
#[derive(Debug)]
pub struct MovieIndex {
    title: HashTable<MovieSet>,
    genre: HashTable<MovieSet>,
    year: HashTable<MovieSet>,
    kind: HashTable<MovieSet>,
    id: HashTable<MovieSet>,
}

impl MovieIndex {
    /// Create an empty index.
    pub fn new() -> Result<Self> {
        Ok(MovieIndex {
            title: HashTable::with_buckets(INDEX_BUCKETS)?,
            genre: HashTable::with_buckets(INDEX_BUCKETS)?,
            year: HashTable::with_buckets(INDEX_BUCKETS)?,
            kind: HashTable::with_buckets(INDEX_BUCKETS)?,
            id: HashTable::with_buckets(INDEX_BUCKETS)?,
        })
    }

    fn table(&self, field: IndexField) -> &HashTable<MovieSet> {
        match field {
            IndexField::Title => &self.title,
            IndexField::Genre => &self.genre,
            IndexField::Year => &self.year,
            IndexField::Type => &self.kind,
            IndexField::Id => &self.id,
        }
    }

    fn table_mut(&mut self, field: IndexField) -> &mut HashTable<MovieSet> {
        match field {
            IndexField::Title => &mut self.title,
            IndexField::Genre => &mut self.genre,
            IndexField::Year => &mut self.year,
            IndexField::Type => &mut self.kind,
            IndexField::Id => &mut self.id,
        }
    }

    /// Index one movie under every applicable field.
    ///
    /// Title words are tokenized and indexed individually; genres are
    /// indexed slot by slot; year, type, and id index their single field.
    /// Absent fields are not indexed, and a record without a title is not
    /// indexable at all (postings are deduplicated by title).
    pub fn add_movie(&mut self, movie: &Movie, doc_id: u64, offset: u64) {
        let Some(title) = movie.title.as_deref() else {
            debug!("record at doc {doc_id} offset {offset} has no title; skipping");
            return;
        };
        let posting = Posting {
            doc_id,
            offset,
            title: title.to_string(),
        };

        for word in tokenize(title) {
            self.add_term(IndexField::Title, &word, posting.clone());
        }
        for genre in &movie.genres {
            self.add_term(IndexField::Genre, genre, posting.clone());
        }
        if let Some(year) = movie.year {
            self.add_term(IndexField::Year, &year.to_string(), posting.clone());
        }
        if let Some(kind) = movie.kind.as_deref() {
            self.add_term(IndexField::Type, kind, posting.clone());
        }
        if let Some(id) = movie.id.as_deref() {
            self.add_term(IndexField::Id, id, posting.clone());
        }
    }

    /// Record one posting under a normalized term in the given field index.
    ///
    /// The term's [`MovieSet`] is created lazily on first use; the set's
    /// duplicate-elimination policy applies on every add.
    fn add_term(&mut self, field: IndexField, term: &str, posting: Posting) {
        let term = normalize(term);
        if term.is_empty() {
            return;
        }
        let Some(key) = key_for(field, &term) else {
            return;
        };
        let table = self.table_mut(field);
        match table.lookup_mut(key) {
            Some(set) => set.add(posting),
            None => {
                let mut set = MovieSet::new(&term);
                set.add(posting);
                table.put(key, set);
            }
        }
    }

    /// Look up the result set for a term in the given field index.
    ///
    /// The term is normalized before hashing; `None` is a lookup miss, not
    /// an error.
    pub fn lookup(&self, field: IndexField, term: &str) -> Option<&MovieSet> {
        let term = normalize(term);
        let key = key_for(field, &term)?;
        self.table(field).lookup(key)
    }

    /// Run a title-word query, the lookup the serving path uses.
    ///
    /// Returns a cursor over the matched postings, or `None` when the term
    /// has no matches.
    pub fn find(&self, term: &str) -> Option<SearchResults<'_>> {
        let set = self.lookup(IndexField::Title, term)?;
        if set.is_empty() {
            return None;
        }
        Some(SearchResults::new(set))
    }

    /// Iterate the result sets of one field index.
    pub fn sets(&self, field: IndexField) -> impl Iterator<Item = &MovieSet> {
        self.table(field).iter().map(|(_, set)| set)
    }

    /// Number of distinct terms in one field index.
    pub fn term_count(&self, field: IndexField) -> usize {
        self.table(field).len()
    }

    /// Total number of terms across all field indices.
    pub fn total_terms(&self) -> usize {
        IndexField::ALL
            .iter()
            .map(|&field| self.term_count(field))
            .sum()
    }
}

/// Hash a normalized term into its index key.
///
/// Year terms hash the integer value's little-endian bytes; everything
/// else hashes the term's bytes directly. A year term that does not parse
/// as an integer cannot match anything.
fn key_for(field: IndexField, term: &str) -> Option<u64> {
    match field {
        IndexField::Year => term.parse::<i64>().ok().map(|year| fnv1a_64_int(year as u64)),
        _ => Some(fnv1a_64(term.as_bytes())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> Movie {
        Movie::parse_row("tt0133093|movie|The Matrix|-|0|1999|-|136|Action,Sci-Fi").unwrap()
    }

    #[test]
    fn test_title_words_are_individually_reachable() {
        let mut index = MovieIndex::new().unwrap();
        index.add_movie(&matrix(), 1, 0);

        for term in ["the", "matrix", "The", "MATRIX"] {
            let set = index.lookup(IndexField::Title, term).unwrap();
            assert_eq!(set.len(), 1);
            assert_eq!(set.postings()[0].title, "The Matrix");
        }
        assert!(index.lookup(IndexField::Title, "reloaded").is_none());
    }

    #[test]
    fn test_reprocessing_a_record_keeps_one_posting_per_set() {
        let mut index = MovieIndex::new().unwrap();
        index.add_movie(&matrix(), 1, 0);
        index.add_movie(&matrix(), 1, 0);

        let action = index.lookup(IndexField::Genre, "Action").unwrap();
        assert_eq!(action.len(), 1);
        assert_eq!(action.postings()[0].title, "The Matrix");

        let word = index.lookup(IndexField::Title, "matrix").unwrap();
        assert_eq!(word.len(), 1);
    }

    #[test]
    fn test_newest_write_wins_on_title_collision() {
        let mut index = MovieIndex::new().unwrap();
        index.add_movie(&matrix(), 1, 0);
        index.add_movie(&matrix(), 2, 512);

        let set = index.lookup(IndexField::Title, "matrix").unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.postings()[0].doc_id, 2);
        assert_eq!(set.postings()[0].offset, 512);
    }

    #[test]
    fn test_year_index_uses_integer_hashing() {
        let mut index = MovieIndex::new().unwrap();
        index.add_movie(&matrix(), 1, 0);

        let set = index.lookup(IndexField::Year, "1999").unwrap();
        assert_eq!(set.description(), "1999");
        assert_eq!(set.len(), 1);
        assert!(index.lookup(IndexField::Year, "2000").is_none());
        assert!(index.lookup(IndexField::Year, "not-a-year").is_none());
    }

    #[test]
    fn test_type_and_id_indices() {
        let mut index = MovieIndex::new().unwrap();
        index.add_movie(&matrix(), 1, 0);

        assert_eq!(index.lookup(IndexField::Type, "Movie").unwrap().len(), 1);
        assert_eq!(index.lookup(IndexField::Id, "tt0133093").unwrap().len(), 1);
    }

    #[test]
    fn test_record_without_title_is_not_indexed() {
        let mut index = MovieIndex::new().unwrap();
        let movie = Movie::parse_row("tt999|movie|-|-|0|1980|-|90|Drama").unwrap();
        index.add_movie(&movie, 1, 0);
        assert_eq!(index.total_terms(), 0);
    }

    #[test]
    fn test_find_takes_the_title_index() {
        let mut index = MovieIndex::new().unwrap();
        index.add_movie(&matrix(), 1, 0);

        let results = index.find("matrix").unwrap();
        assert_eq!(results.num_results(), 1);
        assert!(index.find("nonexistent").is_none());
    }

    #[test]
    fn test_distinct_titles_share_a_term() {
        let mut index = MovieIndex::new().unwrap();
        index.add_movie(&matrix(), 1, 0);
        let sequel = Movie::parse_row(
            "tt0234215|movie|The Matrix Reloaded|-|0|2003|-|138|Action,Sci-Fi",
        )
        .unwrap();
        index.add_movie(&sequel, 1, 64);

        let set = index.lookup(IndexField::Title, "matrix").unwrap();
        assert_eq!(set.len(), 2);
        let action = index.lookup(IndexField::Genre, "action").unwrap();
        assert_eq!(action.len(), 2);
    }

    #[test]
    fn test_term_counts() {
        let mut index = MovieIndex::new().unwrap();
        index.add_movie(&matrix(), 1, 0);

        // "the" and "matrix"
        assert_eq!(index.term_count(IndexField::Title), 2);
        assert_eq!(index.term_count(IndexField::Genre), 2);
        assert_eq!(index.term_count(IndexField::Year), 1);
        assert_eq!(index.total_terms(), 7);
    }
}
