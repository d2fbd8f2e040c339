// Primitives for reading the delimited source files.

use std::fs;

use csv::ReaderBuilder;
use log::debug;
use snafu::prelude::*;

use crate::atlas::{AtlasResult, OpeningSourceSnafu, SourceLineParseSnafu};

/// Reads a headerless delimited file into raw per-line fields.
///
/// Every line is stripped of trailing whitespace before splitting and blank
/// lines are skipped. Quoting is disabled so field content stays verbatim,
/// and rows are allowed to differ in width: short rows are a concern of the
/// consumer, not of the reader.
pub fn read_rows(path: &str, delimiter: u8) -> AtlasResult<Vec<Vec<String>>> {
    let raw = fs::read_to_string(path).context(OpeningSourceSnafu {
        path: path.to_string(),
    })?;
    let cleaned = raw
        .lines()
        .map(|line| line.trim_end())
        .filter(|line| !line.is_empty())
        .collect::<Vec<&str>>()
        .join("\n");

    let rdr = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .quoting(false)
        .flexible(true)
        .from_reader(cleaned.as_bytes());

    let mut res: Vec<Vec<String>> = Vec::new();
    for (idx, record) in rdr.into_records().enumerate() {
        let lineno = idx + 1;
        let record = record.context(SourceLineParseSnafu {
            path: path.to_string(),
            lineno,
        })?;
        debug!("read_rows: {:?} {:?}", lineno, record);
        res.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(res)
}
