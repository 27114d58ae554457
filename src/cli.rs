//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

use webbook::{DataKind, SearchType, SpectrumKind, Units};

/// Search and download compound data from the NIST Chemistry WebBook.
#[derive(Parser, Debug)]
#[command(name = "webbook")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: $XDG_CONFIG_HOME/webbook/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub request: RequestArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Request settings shared by every network command.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct RequestArgs {
    /// Pause after each response, in seconds
    #[arg(long, global = true)]
    pub delay: Option<f64>,

    /// Attempts per request including the first (1-10)
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub max_attempts: Option<u32>,

    /// Whole-request timeout in seconds (1-3600)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// WebBook host to query instead of the public one
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// User-Agent header value
    #[arg(long, global = true)]
    pub user_agent: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the WebBook and list matching compound identifiers
    Search(SearchArgs),
    /// Resolve an identifier (NIST ID, CAS, or InChI) and print the compound
    Show(ShowArgs),
    /// Download a compound's JCAMP-DX spectra
    Spectra(SpectraArgs),
    /// Print a compound's gas chromatography retention-index tables
    Gc(GcArgs),
    /// Print the WebBook's robots.txt crawl delay
    CrawlDelay(CrawlDelayArgs),
    /// Filter the precomputed compound index
    Index(IndexArgs),
    /// List every search parameter with a description
    Params,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitsArg {
    Si,
    Cal,
}

impl From<UnitsArg> for Units {
    fn from(value: UnitsArg) -> Self {
        match value {
            UnitsArg::Si => Self::Si,
            UnitsArg::Cal => Self::Calorie,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct SearchArgs {
    /// Name, InChI, CAS, formula, NIST ID, or a MOL file path for structure searches
    pub identifier: String,

    /// What the identifier is
    #[arg(short = 't', long = "type", default_value = "name")]
    pub search_type: SearchType,

    /// Unit system for thermodynamic data
    #[arg(long, value_enum, default_value_t = UnitsArg::Si)]
    pub units: UnitsArg,

    /// Exactly match the specified isotopes (formula searches)
    #[arg(long)]
    pub match_isotopes: bool,

    /// Allow elements not in the formula (formula searches)
    #[arg(long)]
    pub allow_other: bool,

    /// Allow more atoms than specified (formula searches)
    #[arg(long)]
    pub allow_extra: bool,

    /// Exclude ions (formula searches)
    #[arg(long)]
    pub no_ion: bool,

    /// Require data of this kind, by codename (repeatable, e.g. --require cMS)
    #[arg(long = "require", value_parser = parse_data_kind)]
    pub required: Vec<DataKind>,

    /// Load every hit's compound page
    #[arg(long)]
    pub load: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug)]
pub struct ShowArgs {
    /// NIST compound ID, CAS registry number, or InChI
    pub identifier: String,

    /// Also fetch 2D and 3D coordinate files
    #[arg(long)]
    pub coordinates: bool,

    /// Print the record as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug)]
pub struct SpectraArgs {
    /// NIST compound ID
    pub id: String,

    /// Spectrum kinds to fetch: IR, TZ, MS, UV (default: all)
    #[arg(short, long = "kind")]
    pub kinds: Vec<SpectrumKind>,

    /// Directory to save .jdx files into
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,
}

#[derive(ClapArgs, Debug)]
pub struct GcArgs {
    /// NIST compound ID
    pub id: String,

    /// Print the tables as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug)]
pub struct CrawlDelayArgs {
    /// User agent whose robots.txt group to read
    #[arg(long, default_value = "*")]
    pub agent: String,
}

#[derive(ClapArgs, Debug)]
pub struct IndexArgs {
    /// Index CSV file (default: `index_path` from the config file)
    pub path: Option<PathBuf>,

    /// Require data of this kind, by codename (repeatable)
    #[arg(long = "require", value_parser = parse_data_kind)]
    pub required: Vec<DataKind>,

    /// Only entries with an InChI
    #[arg(long)]
    pub with_inchi: bool,

    /// Only entries with exactly this formula
    #[arg(long)]
    pub formula: Option<String>,

    /// Stop after this many entries
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print matching entries as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_data_kind(value: &str) -> Result<DataKind, String> {
    DataKind::from_codename(value.trim()).ok_or_else(|| {
        let known: Vec<&str> = DataKind::ALL.iter().map(|kind| kind.codename()).collect();
        format!("unknown data kind '{value}' (expected one of {})", known.join(", "))
    })
}
