// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A closed arithmetic sequence of years.
///
/// The two axes of the system are provided as constants: elections run on a
/// 4-year cadence, censuses on a 10-year cadence. `start` must not exceed
/// `end` and `step` must be non-zero.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct YearAxis {
    pub start: u32,
    pub step: u32,
    pub end: u32,
}

impl YearAxis {
    /// The primary time axis: every presidential election from 1892 to 2020.
    pub const ELECTIONS: YearAxis = YearAxis {
        start: 1892,
        step: 4,
        end: 2020,
    };

    /// The secondary axis, used only by population data.
    pub const CENSUSES: YearAxis = YearAxis {
        start: 1890,
        step: 10,
        end: 2020,
    };

    pub fn len(&self) -> usize {
        ((self.end - self.start) / self.step + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// The years of the axis, in ascending order.
    pub fn years(&self) -> impl Iterator<Item = u32> {
        (self.start..=self.end).step_by(self.step as usize)
    }

    pub fn year_at(&self, ordinal: usize) -> u32 {
        self.start + self.step * ordinal as u32
    }
}

/// Whether the per-year fields of a source follow the census axis or the
/// election axis.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum SourceKind {
    /// One field per census year; values are selected through the aligner.
    CensusAligned,
    /// One field per election year, in chronological order.
    ElectionAligned,
}

/// One line of a state-keyed source file: the state name followed by the raw
/// per-year values, kept verbatim.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SourceRow {
    pub state: String,
    pub values: Vec<String>,
}

impl SourceRow {
    /// Splits the leading state-name field off a raw record.
    pub fn from_fields(fields: &[String]) -> Result<SourceRow, MergeError> {
        match fields.split_first() {
            Some((state, values)) => Ok(SourceRow {
                state: state.clone(),
                values: values.to_vec(),
            }),
            None => Err(MergeError::EmptyRow),
        }
    }
}

/// A named source to merge: its key identifies the values in the merged
/// dataset (for instance `uspop`).
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DataSource {
    pub key: String,
    pub kind: SourceKind,
    pub rows: Vec<SourceRow>,
}

// ******** Output data structures *********

/// Per-state mapping from source key to the raw string value of one year.
pub type StateRecord = BTreeMap<String, String>;

/// The fully merged dataset, keyed by election year, then state name, then
/// source key. Built once by the [`crate::DatasetBuilder`] and immutable
/// afterwards. Serializes with stringified year keys and round-trips exactly.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergedDataset {
    entries: BTreeMap<u32, BTreeMap<String, StateRecord>>,
}

impl MergedDataset {
    pub(crate) fn from_entries(entries: BTreeMap<u32, BTreeMap<String, StateRecord>>) -> Self {
        MergedDataset { entries }
    }

    pub fn years(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn record(&self, year: u32, state: &str) -> Result<&StateRecord, MergeError> {
        let by_state = self
            .entries
            .get(&year)
            .ok_or(MergeError::MissingYear { year })?;
        by_state.get(state).ok_or_else(|| MergeError::MissingState {
            year,
            state: state.to_string(),
        })
    }

    /// Looks up one merged value. Never defaults: a key that was not merged
    /// for this (year, state) is an error.
    pub fn value(&self, year: u32, state: &str, key: &str) -> Result<&str, MergeError> {
        let record = self.record(year, state)?;
        record
            .get(key)
            .map(|v| v.as_str())
            .ok_or_else(|| MergeError::MissingValue {
                year,
                state: state.to_string(),
                key: key.to_string(),
            })
    }
}

// ********* Errors **********

/// Errors raised while building or querying the merged dataset.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum MergeError {
    /// A merge was attempted before `initialize`.
    NotInitialized,
    /// `initialize` was called twice.
    AlreadyInitialized,
    /// No census-aligned source to take the state list from.
    NoCensusSource,
    /// A record with no fields at all.
    EmptyRow,
    /// A source row names a state that was not initialized.
    UnknownState { state: String },
    /// A row does not carry one field per year of its axis.
    RowWidth {
        state: String,
        expected: usize,
        found: usize,
    },
    /// Two sources claimed the same key.
    DuplicateSourceKey { key: String },
    /// A year field that does not parse as an integer.
    BadYear { text: String },
    /// A derived-fact row with the wrong number of fields.
    RowShape { expected: usize, found: usize },
    MissingYear {
        year: u32,
    },
    MissingState {
        year: u32,
        state: String,
    },
    MissingValue {
        year: u32,
        state: String,
        key: String,
    },
}

impl Error for MergeError {}

impl Display for MergeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeError::NotInitialized => write!(f, "merge attempted before initialization"),
            MergeError::AlreadyInitialized => write!(f, "builder already initialized"),
            MergeError::NoCensusSource => write!(f, "no census-aligned source provided"),
            MergeError::EmptyRow => write!(f, "empty source row"),
            MergeError::UnknownState { state } => {
                write!(f, "state {:?} is not part of the initialized state set", state)
            }
            MergeError::RowWidth {
                state,
                expected,
                found,
            } => write!(
                f,
                "row for state {:?} has {} value fields, expected {}",
                state, found, expected
            ),
            MergeError::DuplicateSourceKey { key } => {
                write!(f, "source key {:?} was already merged", key)
            }
            MergeError::BadYear { text } => write!(f, "cannot parse year from {:?}", text),
            MergeError::RowShape { expected, found } => {
                write!(f, "row has {} fields, expected {}", found, expected)
            }
            MergeError::MissingYear { year } => write!(f, "year {} is not in the dataset", year),
            MergeError::MissingState { year, state } => {
                write!(f, "state {:?} is not present under year {}", state, year)
            }
            MergeError::MissingValue { year, state, key } => write!(
                f,
                "no {:?} value for state {:?} under year {}",
                key, state, year
            ),
        }
    }
}
