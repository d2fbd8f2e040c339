use log::{info, warn};

use electoral_data::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use serde_json::Value as JSValue;
use text_diff::print_diff;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;

use crate::atlas::config_reader::*;

#[derive(Debug, Snafu)]
pub enum AtlasError {
    #[snafu(display("Error opening source file {path}"))]
    OpeningSource {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing row {lineno} of {path}"))]
    SourceLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display(""))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing output file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error merging the data sources"))]
    Merging { source: MergeError },
    #[snafu(display(""))]
    MissingParentDir {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type AtlasResult<T> = Result<T, AtlasError>;

// Width at which the downstream renderer wraps the annotation text.
const ANNOTATION_WIDTH: usize = 42;

/// Runs the whole pipeline: reads the configured source files, builds the
/// merged dataset and the derived tables, and writes the JSON output files.
pub fn run_atlas(
    config_path: String,
    out_dir: Option<String>,
    reference_path: Option<String>,
    show_year: Option<u32>,
) -> AtlasResult<()> {
    let config = read_config(&config_path)?;
    info!("config: {:?}", config);
    let (election, census) = config.axes()?;
    let config_dir = Path::new(config_path.as_str())
        .parent()
        .context(MissingParentDirSnafu {})?;

    if config.source_files.is_empty() {
        whatever!("no source files listed in the configuration");
    }

    let mut state_sources: Vec<DataSource> = Vec::new();
    let mut presidents: Option<PresidentialResults> = None;
    let mut notes: Option<ElectionNotes> = None;

    for sf in config.source_files.iter() {
        let path = config_dir.join(&sf.file_path).display().to_string();
        info!("Reading source file {:?}", path);
        let rows = io_csv::read_rows(&path, sf.delimiter_byte()?)?;
        match sf.role()? {
            SourceRole::Population => {
                state_sources.push(state_source(sf, SourceKind::CensusAligned, &rows)?)
            }
            SourceRole::ElectoralVotes | SourceRole::Party => {
                state_sources.push(state_source(sf, SourceKind::ElectionAligned, &rows)?)
            }
            SourceRole::Presidents => {
                presidents = Some(PresidentialResults::from_rows(&rows).context(MergingSnafu)?)
            }
            SourceRole::Info => {
                notes = Some(ElectionNotes::from_rows(&rows).context(MergingSnafu)?)
            }
        }
    }

    info!(
        "Building dataset {:?} from {} state sources",
        config.output_settings.dataset_name,
        state_sources.len()
    );
    let dataset = build_state_dataset(&election, &census, &state_sources).context(MergingSnafu)?;

    let mut out_root = out_dir
        .or_else(|| config.output_settings.output_directory.clone())
        .unwrap_or_else(|| config_dir.display().to_string());
    if out_root.is_empty() {
        // A config file given as a bare name has an empty parent directory.
        out_root = ".".to_string();
    }
    fs::create_dir_all(&out_root).context(WritingOutputSnafu {
        path: out_root.clone(),
    })?;

    let dataset_js = serde_json::to_string_pretty(&dataset).context(ParsingJsonSnafu {})?;
    write_output(
        &out_root,
        &config.output_settings.state_data_file(),
        &dataset_js,
    )?;

    match presidents.as_ref() {
        Some(table) => {
            let js = serde_json::to_string_pretty(table).context(ParsingJsonSnafu {})?;
            write_output(&out_root, &config.output_settings.presidents_file(), &js)?;
        }
        None => warn!(
            "no presidential results source configured, skipping {}",
            config.output_settings.presidents_file()
        ),
    }

    match notes.as_ref() {
        Some(table) => {
            let js = serde_json::to_string_pretty(table).context(ParsingJsonSnafu {})?;
            write_output(
                &out_root,
                &config.output_settings.election_info_file(),
                &js,
            )?;
        }
        None => warn!(
            "no election info source configured, skipping {}",
            config.output_settings.election_info_file()
        ),
    }

    if let Some(year) = show_year {
        print_year_summary(year, presidents.as_ref(), notes.as_ref());
    }

    // The reference dataset, if provided for comparison
    if let Some(reference_p) = reference_path {
        check_against_reference(&reference_p, &dataset_js)?;
    }

    Ok(())
}

fn state_source(
    sf: &SourceFile,
    kind: SourceKind,
    rows: &[Vec<String>],
) -> AtlasResult<DataSource> {
    let mut parsed: Vec<SourceRow> = Vec::new();
    for fields in rows.iter() {
        parsed.push(SourceRow::from_fields(fields).context(MergingSnafu)?);
    }
    Ok(DataSource {
        key: sf.source_key(),
        kind,
        rows: parsed,
    })
}

fn write_output(root: &str, name: &str, contents: &str) -> AtlasResult<()> {
    let path = Path::new(root).join(name).display().to_string();
    info!("Writing {:?}", path);
    fs::write(&path, contents).context(WritingOutputSnafu { path: path.clone() })?;
    Ok(())
}

fn check_against_reference(reference_path: &str, dataset_js: &str) -> AtlasResult<()> {
    let contents = fs::read_to_string(reference_path).context(OpeningJsonSnafu {
        path: reference_path.to_string(),
    })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    let pretty_reference = serde_json::to_string_pretty(&js).context(ParsingJsonSnafu {})?;
    if pretty_reference != dataset_js {
        warn!("Found differences with the reference dataset");
        print_diff(pretty_reference.as_str(), dataset_js, "\n");
        whatever!("Difference detected between the merged dataset and the reference dataset");
    }
    Ok(())
}

fn print_year_summary(
    year: u32,
    presidents: Option<&PresidentialResults>,
    notes: Option<&ElectionNotes>,
) {
    match presidents.and_then(|table| table.ticket(year)) {
        Some(ticket) => {
            println!("President: {}", ticket.pres);
            println!("Vice-President: {}", ticket.vice);
        }
        None => println!("No presidential result recorded for {}", year),
    }
    if let Some(text) = notes.and_then(|table| table.annotation(&year.to_string())) {
        for line in wrap_line(&text, ANNOTATION_WIDTH) {
            println!("{}", line);
        }
    }
}

// Greedy word wrap, matching the renderer's text box.
fn wrap_line(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
