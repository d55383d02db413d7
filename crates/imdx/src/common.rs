// ai
//! 📦 Common data structures — the building blocks of imdx
//!
//! ---
//!
//! 🎬 COLD OPEN — INT. DATA CENTER — 3:47 AM
//!
//! A tab-separated line arrives. Nine fields. One of them says `\N`.
//! Another says `1`, which apparently means "adult". A third says
//! `Comedy,Drama`, which means two things at once. The parser squints,
//! splits, and hands over a `Record`. It does not ask follow-up questions.
//!
//! 🦆
//!
//! This module defines the humble yet load-bearing structs that ferry a title
//! from a TSV row to a search-index document:
//! - [`Record`] / [`TitlePair`]: one decoded title, serde-ready in the document shape.
//! - `TitleColumn`: the named column table (index → name) the parser decodes through.
//! - `IndexDocument`: a record already serialized, waiting for its batch.
//!
//! ---
//!
//! ⚠️  `\N` in the genres column is NOT special-cased. It becomes `["\\N"]`.
//! That's what the dataset importer has always done and nobody agreed on
//! what it *should* do, so we reproduce it faithfully and move on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MalformedRow;

/// 🕳️ The dataset's way of saying "nothing to see here".
pub(crate) const NULL_SENTINEL: &str = "\\N";

/// 📏 Every data line carries exactly this many tab-separated fields.
pub(crate) const COLUMN_COUNT: usize = 9;

/// 🏷️ The named column table. Discriminant = position in the row.
///
/// If the dataset ever reorders its columns, this enum is the only place
/// that needs to move. The arity check stays separate and explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TitleColumn {
    Tconst = 0,
    TitleType = 1,
    PrimaryTitle = 2,
    OriginalTitle = 3,
    IsAdult = 4,
    StartYear = 5,
    EndYear = 6,
    RuntimeMinutes = 7,
    Genres = 8,
}

impl TitleColumn {
    /// 📋 All columns, in row order.
    #[cfg(test)]
    pub(crate) const ALL: [TitleColumn; COLUMN_COUNT] = [
        Self::Tconst,
        Self::TitleType,
        Self::PrimaryTitle,
        Self::OriginalTitle,
        Self::IsAdult,
        Self::StartYear,
        Self::EndYear,
        Self::RuntimeMinutes,
        Self::Genres,
    ];

    /// 🏷️ The header name the dataset uses for this column.
    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::Tconst => "tconst",
            Self::TitleType => "titleType",
            Self::PrimaryTitle => "primaryTitle",
            Self::OriginalTitle => "originalTitle",
            Self::IsAdult => "isAdult",
            Self::StartYear => "startYear",
            Self::EndYear => "endYear",
            Self::RuntimeMinutes => "runtimeMinutes",
            Self::Genres => "genres",
        }
    }

    const fn position(self) -> usize {
        self as usize
    }
}

/// 🎭 The two names every title goes by: the one on the poster, and the one at home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitlePair {
    /// 📣 Promotional / display title.
    pub primary: String,
    /// 🌍 Title in the original language.
    pub original: String,
}

/// 🎬 One decoded title row.
///
/// Serializes straight into the index-document shape:
/// `{ id, kind, title: {primary, original}, adult, startYear?, endYear?, runtimeMinutes?, genres }`.
/// Absent optionals are omitted on the way out and come back as `None` on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// 🔑 Unique identifier, doubles as the document `_id`. Duplicates overwrite.
    pub id: String,
    /// 🏷️ movie, short, tvSeries, ... — what the selection filter looks at.
    pub kind: String,
    pub title: TitlePair,
    #[serde(rename = "adult")]
    pub is_adult: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<i32>,
    pub genres: Vec<String>,
}

impl Record {
    /// 🔪 Decode one tab-delimited data line into a `Record`.
    ///
    /// Exactly nine fields or bust. `\N` in a numeric column means absent;
    /// anything else non-numeric is a [`MalformedRow`]. Genres are split on
    /// commas with no trimming, no filtering and no sentinel handling, so
    /// `""` becomes `[""]` and `\N` becomes `["\\N"]`.
    pub fn from_tsv_line(line: &str) -> Result<Self, MalformedRow> {
        let row = RawTitleRow::split(line)?;

        Ok(Self {
            id: row.text(TitleColumn::Tconst),
            kind: row.text(TitleColumn::TitleType),
            title: TitlePair {
                primary: row.text(TitleColumn::PrimaryTitle),
                original: row.text(TitleColumn::OriginalTitle),
            },
            is_adult: row.get(TitleColumn::IsAdult) == "1",
            start_year: row.optional_int(TitleColumn::StartYear)?,
            end_year: row.optional_int(TitleColumn::EndYear)?,
            runtime_minutes: row.optional_int(TitleColumn::RuntimeMinutes)?,
            genres: row
                .get(TitleColumn::Genres)
                .split(',')
                .map(str::to_owned)
                .collect(),
        })
    }

    /// 📄 Serialize into the document the sink will store, keyed by `id`.
    pub(crate) fn to_document(&self) -> serde_json::Result<IndexDocument> {
        Ok(IndexDocument {
            id: self.id.clone(),
            body: serde_json::to_string(self)?,
        })
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.start_year {
            Some(year) => write!(f, "{} ({})", self.title.original, year),
            None => write!(f, "{} (????)", self.title.original),
        }
    }
}

/// 📄 A record that has already been turned into JSON, plus the key to file it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IndexDocument {
    pub(crate) id: String,
    pub(crate) body: String,
}

/// 🔪 A line split into its nine raw fields, borrowed from the line itself.
struct RawTitleRow<'a> {
    fields: [&'a str; COLUMN_COUNT],
}

impl<'a> RawTitleRow<'a> {
    fn split(line: &'a str) -> Result<Self, MalformedRow> {
        let mut fields = [""; COLUMN_COUNT];
        let mut found = 0usize;
        for field in line.split('\t') {
            if found < COLUMN_COUNT {
                fields[found] = field;
            }
            found += 1;
        }

        if found != COLUMN_COUNT {
            return Err(MalformedRow::FieldCount {
                expected: COLUMN_COUNT,
                found,
            });
        }
        Ok(Self { fields })
    }

    fn get(&self, column: TitleColumn) -> &'a str {
        self.fields[column.position()]
    }

    fn text(&self, column: TitleColumn) -> String {
        self.get(column).to_owned()
    }

    fn optional_int(&self, column: TitleColumn) -> Result<Option<i32>, MalformedRow> {
        let raw = self.get(column);
        if raw == NULL_SENTINEL {
            return Ok(None);
        }
        raw.parse::<i32>()
            .map(Some)
            .map_err(|_| MalformedRow::NotANumber {
                column: column.name(),
                raw: raw.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THE_GODFATHER: &str =
        "tt0068646\tmovie\tThe Godfather\tThe Godfather\t0\t1972\t\\N\t175\tCrime,Drama";

    #[test]
    fn the_one_where_a_classic_movie_parses_into_every_field() {
        let record = Record::from_tsv_line(THE_GODFATHER).expect("💀 the Godfather refused to parse");

        assert_eq!(record.id, "tt0068646");
        assert_eq!(record.kind, "movie");
        assert_eq!(record.title.primary, "The Godfather");
        assert_eq!(record.title.original, "The Godfather");
        assert!(!record.is_adult);
        assert_eq!(record.start_year, Some(1972));
        assert_eq!(record.end_year, None);
        assert_eq!(record.runtime_minutes, Some(175));
        assert_eq!(record.genres, vec!["Crime", "Drama"]);
    }

    #[test]
    fn the_one_where_only_a_literal_one_means_adult() {
        let line_with = |flag: &str| {
            format!("tt1\tmovie\tA\tB\t{flag}\t2000\t\\N\t90\tDrama")
        };

        for (flag, expected) in [("1", true), ("0", false), ("true", false), ("", false), ("\\N", false)] {
            let record = Record::from_tsv_line(&line_with(flag)).expect("💀 parse failed");
            assert_eq!(record.is_adult, expected, "isAdult='{flag}'");
        }
    }

    #[test]
    fn the_one_where_the_sentinel_means_absent_and_gibberish_means_trouble() {
        let all_absent = "tt2\tshort\tX\tY\t0\t\\N\t\\N\t\\N\tShort";
        let record = Record::from_tsv_line(all_absent).expect("💀 sentinels should parse");
        assert_eq!((record.start_year, record.end_year, record.runtime_minutes), (None, None, None));

        let bad_runtime = "tt3\tmovie\tX\tY\t0\t1999\t\\N\tninety\tDrama";
        let err = Record::from_tsv_line(bad_runtime).expect_err("💀 'ninety' is not a number");
        assert_eq!(
            err,
            MalformedRow::NotANumber {
                column: "runtimeMinutes",
                raw: "ninety".into()
            }
        );

        // 🧪 lowercase \n is not the sentinel. Close, but no popcorn.
        let fake_sentinel = "tt4\tmovie\tX\tY\t0\t\\n\t\\N\t90\tDrama";
        assert!(matches!(
            Record::from_tsv_line(fake_sentinel),
            Err(MalformedRow::NotANumber { column: "startYear", .. })
        ));
    }

    #[test]
    fn the_one_where_genres_split_exactly_as_written() {
        let with_genres = |genres: &str| {
            let line = format!("tt5\tmovie\tX\tY\t0\t2001\t\\N\t100\t{genres}");
            Record::from_tsv_line(&line).expect("💀 parse failed").genres
        };

        assert_eq!(with_genres("Comedy,Drama"), vec!["Comedy", "Drama"]);
        assert_eq!(with_genres(""), vec![""]);
        assert_eq!(with_genres("\\N"), vec!["\\N"]);
        assert_eq!(with_genres("Action, Comedy,"), vec!["Action", " Comedy", ""]);
    }

    #[test]
    fn the_one_where_the_wrong_number_of_tabs_is_rejected() {
        let eight_fields = "tt6\tmovie\tX\tY\t0\t2001\t\\N\t100";
        assert_eq!(
            Record::from_tsv_line(eight_fields),
            Err(MalformedRow::FieldCount { expected: 9, found: 8 })
        );

        let ten_fields = format!("{THE_GODFATHER}\textra");
        assert_eq!(
            Record::from_tsv_line(&ten_fields),
            Err(MalformedRow::FieldCount { expected: 9, found: 10 })
        );
    }

    #[test]
    fn the_one_where_titles_keep_their_spaces_and_unicode() {
        let line = "tt7\tmovie\t  Amélie \tLe Fabuleux Destin d'Amélie Poulain\t0\t2001\t\\N\t122\tComedy,Romance";
        let record = Record::from_tsv_line(line).expect("💀 parse failed");
        assert_eq!(record.title.primary, "  Amélie ");
        assert_eq!(record.title.original, "Le Fabuleux Destin d'Amélie Poulain");
    }

    #[test]
    fn the_one_where_the_column_table_matches_the_dataset_header() {
        let header: Vec<&str> = TitleColumn::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(
            header.join("\t"),
            "tconst\ttitleType\tprimaryTitle\toriginalTitle\tisAdult\tstartYear\tendYear\truntimeMinutes\tgenres"
        );
        for (index, column) in TitleColumn::ALL.iter().enumerate() {
            assert_eq!(column.position(), index);
        }
    }

    #[test]
    fn the_one_where_a_document_survives_the_round_trip() -> anyhow::Result<()> {
        let sparse = Record::from_tsv_line("tt8\tshort\tP\tO\t1\t\\N\t\\N\t\\N\t")?;
        let dense = Record::from_tsv_line("tt9\ttvSeries\tP\tO\t0\t1990\t1995\t45\tComedy,Family")?;

        for record in [sparse, dense] {
            let document = record.to_document()?;
            assert_eq!(document.id, record.id);
            let back: Record = serde_json::from_str(&document.body)?;
            assert_eq!(back, record);
        }
        Ok(())
    }

    #[test]
    fn the_one_where_absent_fields_are_left_out_of_the_document() -> anyhow::Result<()> {
        let record = Record::from_tsv_line("tt10\tmovie\tP\tO\t0\t2020\t\\N\t\\N\tDrama")?;
        let value: serde_json::Value = serde_json::from_str(&record.to_document()?.body)?;

        assert_eq!(
            value,
            serde_json::json!({
                "id": "tt10",
                "kind": "movie",
                "title": {"primary": "P", "original": "O"},
                "adult": false,
                "startYear": 2020,
                "genres": ["Drama"]
            })
        );
        Ok(())
    }

    #[test]
    fn the_one_where_display_reads_like_a_marquee() -> anyhow::Result<()> {
        let record = Record::from_tsv_line(THE_GODFATHER)?;
        assert_eq!(record.to_string(), "The Godfather (1972)");
        Ok(())
    }
}
