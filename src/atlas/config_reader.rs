use std::fs;

use log::debug;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use electoral_data::YearAxis;

use crate::atlas::io_common::file_stem;
use crate::atlas::{AtlasResult, OpeningJsonSnafu, ParsingJsonSnafu};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "datasetName")]
    pub dataset_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "stateDataFile")]
    _state_data_file: Option<String>,
    #[serde(rename = "presidentsFile")]
    _presidents_file: Option<String>,
    #[serde(rename = "electionInfoFile")]
    _election_info_file: Option<String>,
}

impl OutputSettings {
    pub fn state_data_file(&self) -> String {
        self._state_data_file
            .clone()
            .unwrap_or_else(|| "state_data.json".to_string())
    }

    pub fn presidents_file(&self) -> String {
        self._presidents_file
            .clone()
            .unwrap_or_else(|| "presidents.json".to_string())
    }

    pub fn election_info_file(&self) -> String {
        self._election_info_file
            .clone()
            .unwrap_or_else(|| "election_info.json".to_string())
    }
}

/// The role of a source file in the pipeline.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SourceRole {
    Population,
    ElectoralVotes,
    Party,
    Presidents,
    Info,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub kind: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "key")]
    _key: Option<String>,
    #[serde(rename = "delimiter")]
    _delimiter: Option<String>,
}

impl SourceFile {
    pub fn role(&self) -> AtlasResult<SourceRole> {
        match self.kind.as_str() {
            "population" => Ok(SourceRole::Population),
            "electoral" => Ok(SourceRole::ElectoralVotes),
            "party" => Ok(SourceRole::Party),
            "presidents" => Ok(SourceRole::Presidents),
            "info" => Ok(SourceRole::Info),
            x => whatever!("Source kind not implemented {:?}", x),
        }
    }

    /// The merge key of this source, defaulting to the file-name stem.
    pub fn source_key(&self) -> String {
        self._key
            .clone()
            .unwrap_or_else(|| file_stem(&self.file_path))
    }

    pub fn delimiter_byte(&self) -> AtlasResult<u8> {
        match self._delimiter.as_deref() {
            None => Ok(match self.role()? {
                SourceRole::Info => b' ',
                _ => b',',
            }),
            Some(d) if d.len() == 1 => Ok(d.as_bytes()[0]),
            Some(d) => whatever!("delimiter must be a single byte, got {:?}", d),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AxisSettings {
    #[serde(rename = "electionStart")]
    pub election_start: Option<u32>,
    #[serde(rename = "electionEnd")]
    pub election_end: Option<u32>,
    #[serde(rename = "censusStart")]
    pub census_start: Option<u32>,
    #[serde(rename = "censusEnd")]
    pub census_end: Option<u32>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AtlasConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "sourceFiles")]
    pub source_files: Vec<SourceFile>,
    pub axes: Option<AxisSettings>,
}

impl AtlasConfig {
    /// The election and census axes, with the configured bounds applied over
    /// the defaults. The cycle lengths are fixed.
    pub fn axes(&self) -> AtlasResult<(YearAxis, YearAxis)> {
        let mut election = YearAxis::ELECTIONS;
        let mut census = YearAxis::CENSUSES;
        if let Some(axes) = self.axes.as_ref() {
            if let Some(year) = axes.election_start {
                election.start = year;
            }
            if let Some(year) = axes.election_end {
                election.end = year;
            }
            if let Some(year) = axes.census_start {
                census.start = year;
            }
            if let Some(year) = axes.census_end {
                census.end = year;
            }
        }
        if election.is_empty() || census.is_empty() {
            whatever!(
                "axis bounds are inverted: elections {}-{}, censuses {}-{}",
                election.start,
                election.end,
                census.start,
                census.end
            );
        }
        Ok((election, census))
    }
}

pub fn read_config(path: &str) -> AtlasResult<AtlasConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {
        path: path.to_string(),
    })?;
    debug!("read config: {:?}", contents);
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(js: &str) -> AtlasConfig {
        serde_json::from_str(js).unwrap()
    }

    const MINIMAL: &str = r#"{
        "outputSettings": {"datasetName": "test"},
        "sourceFiles": [
            {"kind": "population", "filePath": "data/uspop.csv"},
            {"kind": "info", "filePath": "useinfo.csv"}
        ]
    }"#;

    #[test]
    fn defaults_are_applied() {
        let config = parse(MINIMAL);
        assert_eq!(config.output_settings.state_data_file(), "state_data.json");
        assert_eq!(config.output_settings.presidents_file(), "presidents.json");
        let (election, census) = config.axes().unwrap();
        assert_eq!(election, YearAxis::ELECTIONS);
        assert_eq!(census, YearAxis::CENSUSES);
    }

    #[test]
    fn source_key_defaults_to_the_file_stem() {
        let config = parse(MINIMAL);
        assert_eq!(config.source_files[0].source_key(), "uspop");
    }

    #[test]
    fn delimiter_defaults_by_kind() {
        let config = parse(MINIMAL);
        assert_eq!(config.source_files[0].delimiter_byte().unwrap(), b',');
        assert_eq!(config.source_files[1].delimiter_byte().unwrap(), b' ');
    }

    #[test]
    fn multi_byte_delimiter_is_rejected() {
        let config = parse(
            r#"{
            "outputSettings": {"datasetName": "test"},
            "sourceFiles": [
                {"kind": "party", "filePath": "usparty.csv", "delimiter": "||"}
            ]
        }"#,
        );
        assert!(config.source_files[0].delimiter_byte().is_err());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let config = parse(
            r#"{
            "outputSettings": {"datasetName": "test"},
            "sourceFiles": [
                {"kind": "turnout", "filePath": "turnout.csv"}
            ]
        }"#,
        );
        assert!(config.source_files[0].role().is_err());
    }

    #[test]
    fn axis_overrides_are_applied() {
        let config = parse(
            r#"{
            "outputSettings": {"datasetName": "test"},
            "sourceFiles": [{"kind": "population", "filePath": "uspop.csv"}],
            "axes": {"electionStart": 1892, "electionEnd": 1896, "censusEnd": 1900}
        }"#,
        );
        let (election, census) = config.axes().unwrap();
        assert_eq!(election.years().collect::<Vec<u32>>(), vec![1892, 1896]);
        assert_eq!(census.years().collect::<Vec<u32>>(), vec![1890, 1900]);
    }

    #[test]
    fn inverted_axis_bounds_are_rejected() {
        let config = parse(
            r#"{
            "outputSettings": {"datasetName": "test"},
            "sourceFiles": [{"kind": "population", "filePath": "uspop.csv"}],
            "axes": {"electionStart": 2020, "electionEnd": 1892}
        }"#,
        );
        assert!(config.axes().is_err());
    }
}
