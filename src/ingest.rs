//! Corpus build: parse every crawled file and feed the index.
//!
//! Rows that fail to parse are skipped with a warning; a few bad rows
//! never abort the build. An empty corpus produces an empty index, and
//! queries against it take the zero-match path.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{info, warn};

use crate::corpus::DocIdMap;
use crate::error::Result;
use crate::index::MovieIndex;
use crate::movie::Movie;

/// Build the movie index over every file in the doc id map.
pub fn build_index(docs: &DocIdMap) -> Result<MovieIndex> {
    let mut index = MovieIndex::new()?;
    for (doc_id, path) in docs.iter() {
        index_file(&mut index, doc_id, path)?;
    }
    info!("{} entries in the index", index.total_terms());
    Ok(index)
}

/// Parse one corpus file row by row, recording each row's byte offset.
fn index_file(index: &mut MovieIndex, doc_id: u64, path: &Path) -> Result<()> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut offset: u64 = 0;
    let mut line = String::new();
    loop {
        line.clear();
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            break;
        }
        let row = line.trim_end_matches(['\n', '\r']);
        if !row.is_empty() {
            match Movie::parse_row(row) {
                Ok(movie) => index.add_movie(&movie, doc_id, offset),
                Err(error) => {
                    warn!("skipping row at {}:{offset}: {error}", path.display());
                }
            }
        }
        offset += read as u64;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::TempDir;

    use crate::index::IndexField;

    fn crawl(dir: &TempDir) -> DocIdMap {
        let mut docs = DocIdMap::new().unwrap();
        docs.crawl(dir.path()).unwrap();
        docs
    }

    #[test]
    fn test_build_and_query_round_trip() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("movies.txt"),
            "tt0133093|movie|The Matrix|-|0|1999|-|136|Action,Sci-Fi\n\
             tt0234215|movie|The Matrix Reloaded|-|0|2003|-|138|Action,Sci-Fi\n",
        )
        .unwrap();

        let docs = crawl(&dir);
        let index = build_index(&docs).unwrap();

        let results = index.find("matrix").unwrap();
        assert_eq!(results.num_results(), 2);

        // The recorded offsets resolve back to the original rows.
        for posting in index.find("reloaded").unwrap() {
            let row = docs.row_text(posting.doc_id, posting.offset).unwrap();
            assert!(row.contains("The Matrix Reloaded"));
        }
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("movies.txt"),
            "not a movie row\n\
             tt0111161|movie|The Shawshank Redemption|-|0|1994|-|142|Drama\n",
        )
        .unwrap();

        let index = build_index(&crawl(&dir)).unwrap();
        assert_eq!(index.find("shawshank").unwrap().num_results(), 1);
        assert!(index.find("not").is_none());
    }

    #[test]
    fn test_empty_corpus_builds_empty_index() {
        let dir = TempDir::new().unwrap();
        let index = build_index(&crawl(&dir)).unwrap();
        assert_eq!(index.total_terms(), 0);
        assert!(index.find("anything").is_none());
    }

    #[test]
    fn test_rows_across_multiple_files() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a.txt"),
            "tt001|movie|Alpha Story|-|0|1980|-|90|Drama\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("b.txt"),
            "tt002|movie|Beta Story|-|0|1981|-|95|Drama\n",
        )
        .unwrap();

        let docs = crawl(&dir);
        let index = build_index(&docs).unwrap();

        let results = index.find("story").unwrap();
        assert_eq!(results.num_results(), 2);
        assert_eq!(index.lookup(IndexField::Genre, "drama").unwrap().len(), 2);
    }
}
