//! The movie record and the pipe-delimited row parser.
//!
//! A corpus row carries 9 pipe-separated fields:
//! `id|type|title|(unused)|is_adult|year|(unused)|runtime|genres`,
//! where `genres` is a comma-separated list. A field holding the literal
//! `"-"` means "missing" and parses to `None`.

use serde::{Deserialize, Serialize};

use crate::error::{CinedexError, Result};

/// Number of pipe-separated fields in a corpus row.
const NUM_FIELDS: usize = 9;

/// Maximum number of genre slots a record can carry.
pub const MAX_GENRES: usize = 10;

/// One parsed movie record.
///
/// Every field may be absent in the source row; absent fields are `None`
/// and are simply not indexed. Genres hold at most [`MAX_GENRES`] entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Unique record identifier (e.g. "tt0133093").
    pub id: Option<String>,

    /// Record type (e.g. "movie", "short", "tvEpisode").
    pub kind: Option<String>,

    /// Display title.
    pub title: Option<String>,

    /// Adult-content flag.
    pub is_adult: Option<bool>,

    /// Release year.
    pub year: Option<i32>,

    /// Runtime in minutes.
    pub runtime: Option<i32>,

    /// Genre names, in row order, stopping at the first absent slot.
    pub genres: Vec<String>,
}

impl Movie {
    /// Parse one delimited corpus row into a movie record.
    ///
    /// Fails with `MalformedRecord` when the row has fewer than
    /// [`NUM_FIELDS`] pipe-separated fields.
    pub fn parse_row(row: &str) -> Result<Movie> {
        let fields: Vec<&str> = row.split('|').collect();
        if fields.len() < NUM_FIELDS {
            return Err(CinedexError::malformed_record(format!(
                "expected {} fields, got {}",
                NUM_FIELDS,
                fields.len()
            )));
        }

        Ok(Movie {
            id: text_field(fields[0]),
            kind: text_field(fields[1]),
            title: text_field(fields[2]),
            is_adult: int_field(fields[4]).map(|flag| flag != 0),
            year: int_field(fields[5]),
            runtime: int_field(fields[7]),
            genres: genre_field(fields[8]),
        })
    }
}

/// A text field; `"-"` denotes missing.
fn text_field(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() || token == "-" {
        None
    } else {
        Some(token.to_string())
    }
}

/// A numeric field; `"-"` or anything unparsable denotes missing.
fn int_field(token: &str) -> Option<i32> {
    let token = token.trim();
    if token == "-" {
        None
    } else {
        token.parse().ok()
    }
}

/// The comma-separated genre list, capped at [`MAX_GENRES`] slots.
fn genre_field(token: &str) -> Vec<String> {
    match text_field(token) {
        None => Vec::new(),
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|genre| !genre.is_empty())
            .take(MAX_GENRES)
            .map(str::to_string)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: &str = "tt0133093|movie|The Matrix|-|0|1999|-|136|Action,Sci-Fi";

    #[test]
    fn test_parse_full_row() {
        let movie = Movie::parse_row(ROW).unwrap();
        assert_eq!(movie.id.as_deref(), Some("tt0133093"));
        assert_eq!(movie.kind.as_deref(), Some("movie"));
        assert_eq!(movie.title.as_deref(), Some("The Matrix"));
        assert_eq!(movie.is_adult, Some(false));
        assert_eq!(movie.year, Some(1999));
        assert_eq!(movie.runtime, Some(136));
        assert_eq!(movie.genres, vec!["Action", "Sci-Fi"]);
    }

    #[test]
    fn test_dash_means_missing() {
        let movie = Movie::parse_row("-|-|-|-|-|-|-|-|-").unwrap();
        assert_eq!(movie.id, None);
        assert_eq!(movie.kind, None);
        assert_eq!(movie.title, None);
        assert_eq!(movie.is_adult, None);
        assert_eq!(movie.year, None);
        assert_eq!(movie.runtime, None);
        assert!(movie.genres.is_empty());
    }

    #[test]
    fn test_short_row_is_malformed() {
        let result = Movie::parse_row("tt001|movie|Title");
        assert!(matches!(result, Err(CinedexError::MalformedRecord(_))));
    }

    #[test]
    fn test_unparsable_year_is_missing() {
        let movie = Movie::parse_row("tt001|movie|Title|-|0|198x|-|90|Drama").unwrap();
        assert_eq!(movie.year, None);
    }

    #[test]
    fn test_genre_list_is_capped() {
        let genres = (0..15).map(|i| format!("g{i}")).collect::<Vec<_>>().join(",");
        let row = format!("tt001|movie|Title|-|0|1990|-|90|{genres}");
        let movie = Movie::parse_row(&row).unwrap();
        assert_eq!(movie.genres.len(), MAX_GENRES);
    }

    #[test]
    fn test_genre_list_trims_line_terminator() {
        let movie = Movie::parse_row("tt001|movie|Title|-|0|1990|-|90|Drama,War\n").unwrap();
        assert_eq!(movie.genres, vec!["Drama", "War"]);
    }

    #[test]
    fn test_adult_flag_parses_true() {
        let movie = Movie::parse_row("tt002|movie|Title|-|1|1990|-|90|-").unwrap();
        assert_eq!(movie.is_adult, Some(true));
    }
}
