use clap::Parser;

/// Builds the denormalized per-election-year state dataset consumed by the
/// bubble-chart renderer.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The JSON configuration listing the source files, output settings and
    /// optionally the year axes. Source file paths are resolved relative to this file.
    #[clap(short, long, value_parser)]
    pub config: String,

    /// (file path, optional) A reference copy of the merged state dataset in JSON format.
    /// If provided, elatlas will check that the freshly built dataset matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (directory, optional) If specified, the output files will be written to this
    /// directory. Setting this option overrides the path that may be specified with the
    /// --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (election year, optional) After building, prints the winning ticket and the
    /// election annotation for the given year to the standard output.
    #[clap(long, value_parser)]
    pub show_year: Option<u32>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
