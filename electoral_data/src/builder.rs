use std::collections::{BTreeMap, BTreeSet};

use log::debug;

pub use crate::config::*;
use crate::nearest_census_index;

/// A two-phase builder for the merged dataset.
///
/// The builder owns the in-progress mapping: `initialize` lays out the
/// (year x state) skeleton, every source is then merged with `merge_source`
/// in any order, and `snapshot` hands out the immutable result.
///
/// ```
/// pub use electoral_data::{DataSource, DatasetBuilder, SourceKind, SourceRow, YearAxis};
/// # use electoral_data::MergeError;
///
/// let election = YearAxis { start: 1892, step: 4, end: 1896 };
/// let census = YearAxis { start: 1890, step: 10, end: 1900 };
///
/// let mut builder = DatasetBuilder::new(election, census);
/// builder.initialize(&["Ohio".to_string()])?;
/// builder.merge_source(&DataSource {
///     key: "uspop".to_string(),
///     kind: SourceKind::CensusAligned,
///     rows: vec![SourceRow {
///         state: "Ohio".to_string(),
///         values: vec!["100".to_string(), "200".to_string()],
///     }],
/// })?;
///
/// let dataset = builder.snapshot()?;
/// assert_eq!(dataset.value(1892, "Ohio", "uspop")?, "100");
/// # Ok::<(), MergeError>(())
/// ```
pub struct DatasetBuilder {
    election: YearAxis,
    census: YearAxis,
    entries: Option<BTreeMap<u32, BTreeMap<String, StateRecord>>>,
    merged_keys: BTreeSet<String>,
}

impl DatasetBuilder {
    pub fn new(election: YearAxis, census: YearAxis) -> DatasetBuilder {
        DatasetBuilder {
            election,
            census,
            entries: None,
            merged_keys: BTreeSet::new(),
        }
    }

    /// Lays out an empty record for every (year, state) pair. Must be called
    /// exactly once, before the first merge.
    pub fn initialize(&mut self, states: &[String]) -> Result<(), MergeError> {
        if self.entries.is_some() {
            return Err(MergeError::AlreadyInitialized);
        }
        let mut entries: BTreeMap<u32, BTreeMap<String, StateRecord>> = BTreeMap::new();
        for year in self.election.years() {
            let mut by_state: BTreeMap<String, StateRecord> = BTreeMap::new();
            for state in states.iter() {
                by_state.insert(state.clone(), StateRecord::new());
            }
            entries.insert(year, by_state);
        }
        self.entries = Some(entries);
        Ok(())
    }

    /// Merges one source into the dataset under its key.
    ///
    /// Every row must carry exactly one field per year of the axis implied by
    /// the source kind, and every row state must have been initialized.
    pub fn merge_source(&mut self, source: &DataSource) -> Result<(), MergeError> {
        let election = self.election;
        let census = self.census;
        let entries = self.entries.as_mut().ok_or(MergeError::NotInitialized)?;

        if self.merged_keys.contains(&source.key) {
            return Err(MergeError::DuplicateSourceKey {
                key: source.key.clone(),
            });
        }

        let expected = match source.kind {
            SourceKind::CensusAligned => census.len(),
            SourceKind::ElectionAligned => election.len(),
        };
        for row in source.rows.iter() {
            if row.values.len() != expected {
                return Err(MergeError::RowWidth {
                    state: row.state.clone(),
                    expected,
                    found: row.values.len(),
                });
            }
        }

        // The field selection depends only on the year, not the state:
        // resolve it once per merge.
        let field_of_year: Vec<usize> = match source.kind {
            SourceKind::CensusAligned => election
                .years()
                .map(|year| nearest_census_index(&census, year))
                .collect(),
            SourceKind::ElectionAligned => (0..election.len()).collect(),
        };

        for row in source.rows.iter() {
            for (ordinal, year) in election.years().enumerate() {
                let record = entries
                    .get_mut(&year)
                    .and_then(|by_state| by_state.get_mut(&row.state))
                    .ok_or_else(|| MergeError::UnknownState {
                        state: row.state.clone(),
                    })?;
                record.insert(source.key.clone(), row.values[field_of_year[ordinal]].clone());
            }
        }

        debug!(
            "merge_source: merged key {:?} ({} rows)",
            source.key,
            source.rows.len()
        );
        self.merged_keys.insert(source.key.clone());
        Ok(())
    }

    /// Consumes the builder and returns the immutable dataset.
    pub fn snapshot(self) -> Result<MergedDataset, MergeError> {
        let entries = self.entries.ok_or(MergeError::NotInitialized)?;
        Ok(MergedDataset::from_entries(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(x: &str) -> String {
        x.to_string()
    }

    fn small_axes() -> (YearAxis, YearAxis) {
        (
            YearAxis {
                start: 1892,
                step: 4,
                end: 1896,
            },
            YearAxis {
                start: 1890,
                step: 10,
                end: 1900,
            },
        )
    }

    fn direct_source(key: &str, state: &str, values: &[&str]) -> DataSource {
        DataSource {
            key: s(key),
            kind: SourceKind::ElectionAligned,
            rows: vec![SourceRow {
                state: s(state),
                values: values.iter().map(|v| s(v)).collect(),
            }],
        }
    }

    #[test]
    fn merge_before_initialize_is_rejected() {
        let (election, census) = small_axes();
        let mut builder = DatasetBuilder::new(election, census);
        let res = builder.merge_source(&direct_source("uselec", "Ohio", &["3", "4"]));
        assert_eq!(res, Err(MergeError::NotInitialized));
    }

    #[test]
    fn double_initialize_is_rejected() {
        let (election, census) = small_axes();
        let mut builder = DatasetBuilder::new(election, census);
        builder.initialize(&[s("Ohio")]).unwrap();
        assert_eq!(
            builder.initialize(&[s("Ohio")]),
            Err(MergeError::AlreadyInitialized)
        );
    }

    #[test]
    fn duplicate_source_key_is_rejected() {
        let (election, census) = small_axes();
        let mut builder = DatasetBuilder::new(election, census);
        builder.initialize(&[s("Ohio")]).unwrap();
        builder
            .merge_source(&direct_source("uselec", "Ohio", &["3", "4"]))
            .unwrap();
        let res = builder.merge_source(&direct_source("uselec", "Ohio", &["5", "6"]));
        assert_eq!(
            res,
            Err(MergeError::DuplicateSourceKey { key: s("uselec") })
        );
    }

    #[test]
    fn uninitialized_state_is_rejected() {
        let (election, census) = small_axes();
        let mut builder = DatasetBuilder::new(election, census);
        builder.initialize(&[s("Ohio")]).unwrap();
        let res = builder.merge_source(&direct_source("uselec", "Kansas", &["3", "4"]));
        assert_eq!(res, Err(MergeError::UnknownState { state: s("Kansas") }));
    }

    #[test]
    fn wrong_row_width_is_rejected() {
        let (election, census) = small_axes();
        let mut builder = DatasetBuilder::new(election, census);
        builder.initialize(&[s("Ohio")]).unwrap();
        let res = builder.merge_source(&direct_source("uselec", "Ohio", &["3"]));
        assert_eq!(
            res,
            Err(MergeError::RowWidth {
                state: s("Ohio"),
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn merge_order_is_immaterial() {
        let (election, census) = small_axes();
        let mut builder = DatasetBuilder::new(election, census);
        builder.initialize(&[s("Ohio")]).unwrap();
        // Direct source first, census-aligned source second.
        builder
            .merge_source(&direct_source("uselec", "Ohio", &["3", "4"]))
            .unwrap();
        builder
            .merge_source(&DataSource {
                key: s("uspop"),
                kind: SourceKind::CensusAligned,
                rows: vec![SourceRow {
                    state: s("Ohio"),
                    values: vec![s("100"), s("200")],
                }],
            })
            .unwrap();
        let dataset = builder.snapshot().unwrap();
        assert_eq!(dataset.value(1892, "Ohio", "uselec").unwrap(), "3");
        assert_eq!(dataset.value(1892, "Ohio", "uspop").unwrap(), "100");
    }

    #[test]
    fn snapshot_without_initialize_is_rejected() {
        let (election, census) = small_axes();
        let builder = DatasetBuilder::new(election, census);
        assert_eq!(builder.snapshot(), Err(MergeError::NotInitialized));
    }
}
