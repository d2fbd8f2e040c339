//! The two auxiliary lookup tables keyed by year only: the winning executive
//! ticket and the free-text election annotations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::MergeError;

/// The winning president and vice-president of one election.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub pres: String,
    pub vice: String,
}

/// Winning tickets keyed by election year. Independent of the merged state
/// dataset apart from the common year axis.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresidentialResults {
    entries: BTreeMap<u32, Ticket>,
}

impl PresidentialResults {
    /// One row per election year, exactly `[year, president, vice]`.
    pub fn from_rows(rows: &[Vec<String>]) -> Result<PresidentialResults, MergeError> {
        let mut entries: BTreeMap<u32, Ticket> = BTreeMap::new();
        for row in rows.iter() {
            match row.as_slice() {
                [year, pres, vice] => {
                    let year = year
                        .parse::<u32>()
                        .map_err(|_| MergeError::BadYear { text: year.clone() })?;
                    entries.insert(
                        year,
                        Ticket {
                            pres: pres.clone(),
                            vice: vice.clone(),
                        },
                    );
                }
                _ => {
                    return Err(MergeError::RowShape {
                        expected: 3,
                        found: row.len(),
                    })
                }
            }
        }
        Ok(PresidentialResults { entries })
    }

    pub fn ticket(&self, year: u32) -> Option<&Ticket> {
        self.entries.get(&year)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Free-text annotations keyed by a year-like string key. The key is not
/// validated as numeric; the tokens are kept verbatim, including the quote
/// characters wrapping the first and last token by source convention.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElectionNotes {
    entries: BTreeMap<String, Vec<String>>,
}

impl ElectionNotes {
    /// The first token of a row is the key, the remaining tokens form the
    /// annotation.
    pub fn from_rows(rows: &[Vec<String>]) -> Result<ElectionNotes, MergeError> {
        let mut entries: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for row in rows.iter() {
            match row.split_first() {
                Some((key, tokens)) => {
                    entries.insert(key.clone(), tokens.to_vec());
                }
                None => return Err(MergeError::EmptyRow),
            }
        }
        Ok(ElectionNotes { entries })
    }

    pub fn tokens(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(|tokens| tokens.as_slice())
    }

    /// The display form of an annotation: the wrapping quotes are stripped
    /// and the tokens joined by single spaces. The stored tokens are left
    /// untouched.
    pub fn annotation(&self, key: &str) -> Option<String> {
        let mut tokens: Vec<String> = self.entries.get(key)?.clone();
        if let Some(first) = tokens.first_mut() {
            if let Some(stripped) = first.strip_prefix('"') {
                *first = stripped.to_string();
            }
        }
        if let Some(last) = tokens.last_mut() {
            if let Some(stripped) = last.strip_suffix('"') {
                *last = stripped.to_string();
            }
        }
        Some(tokens.join(" "))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
