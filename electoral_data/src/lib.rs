mod builder;
mod config;
mod facts;

use log::info;

pub use crate::builder::*;
pub use crate::config::*;
pub use crate::facts::*;

/// Index of the census year closest to `year`, as a 0-based position into
/// the value fields of a census-aligned row.
///
/// Linear scan keeping the first year at the current minimum distance: the
/// comparison is a strict `<`, so exact ties resolve to the earlier census
/// year.
pub fn nearest_census_index(census: &YearAxis, year: u32) -> usize {
    let mut best_dif = u32::MAX;
    let mut target = 0;
    for (idx, census_year) in census.years().enumerate() {
        let dif = year.abs_diff(census_year);
        if dif < best_dif {
            best_dif = dif;
            target = idx;
        }
    }
    target
}

/// Builds the merged dataset from the given sources.
///
/// The state set is taken from the rows of the census-aligned source; the
/// sources are then merged in the order given, each under its own key.
pub fn build_state_dataset(
    election: &YearAxis,
    census: &YearAxis,
    sources: &[DataSource],
) -> Result<MergedDataset, MergeError> {
    info!(
        "build_state_dataset: {} sources over {} election years",
        sources.len(),
        election.len()
    );
    let population = sources
        .iter()
        .find(|source| source.kind == SourceKind::CensusAligned)
        .ok_or(MergeError::NoCensusSource)?;
    let states: Vec<String> = population.rows.iter().map(|row| row.state.clone()).collect();

    let mut builder = DatasetBuilder::new(*election, *census);
    builder.initialize(&states)?;
    for source in sources.iter() {
        builder.merge_source(source)?;
    }
    builder.snapshot()
}
