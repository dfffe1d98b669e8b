//! Command-line plumbing shared by the converter binaries: common flags,
//! logger setup and the status banner.

use std::fmt::Display;
use std::path::PathBuf;

use clap::{ArgAction, Args};
use env_logger::Env;
use hdf2fits::convert::{DEFAULT_GROUP, DEFAULT_INPUT, DEFAULT_NPY_INPUT, DEFAULT_OUTPUT};

/// Closing status line printed after a successful run.
pub const FINISHED: &str = " *** Conversion finished. ***";

/// Input and output files of the HDF5 converters.
#[derive(Debug, Clone, Args)]
pub struct HdfFiles {
    /// Input HDF5 filename
    #[arg(
        short = 'i',
        long = "i",
        value_name = "FILE",
        env = "HDF2FITS_INPUT",
        default_value = DEFAULT_INPUT,
    )]
    pub input: PathBuf,

    /// Output FITS filename
    #[arg(
        short = 'o',
        long = "o",
        value_name = "FILE",
        env = "HDF2FITS_OUTPUT",
        default_value = DEFAULT_OUTPUT,
    )]
    pub output: PathBuf,
}

/// Group selection for the group-wide converters.
#[derive(Debug, Clone, Args)]
pub struct GroupArg {
    /// HDF5 group name
    #[arg(
        short = 'g',
        long = "g",
        value_name = "GROUP",
        env = "HDF2FITS_GROUP",
        default_value = DEFAULT_GROUP,
    )]
    pub group: String,
}

/// Input and output files of `npy2fits`.
#[derive(Debug, Clone, Args)]
pub struct NpyFiles {
    /// Input numpy filename
    #[arg(
        short = 'i',
        long = "i",
        value_name = "FILE",
        env = "NPY2FITS_INPUT",
        default_value = DEFAULT_NPY_INPUT,
    )]
    pub input: PathBuf,

    /// Output FITS filename
    #[arg(
        short = 'o',
        long = "o",
        value_name = "FILE",
        env = "HDF2FITS_OUTPUT",
        default_value = DEFAULT_OUTPUT,
    )]
    pub output: PathBuf,
}

/// Logging verbosity flags.
#[derive(Debug, Clone, Default, Args)]
pub struct Verbosity {
    /// More detail (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Only report warnings and errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Verbosity {
    /// Default `env_logger` filter for these flags.
    pub fn level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Print a status line unless running quietly.
    pub fn say(&self, text: impl Display) {
        if !self.quiet {
            println!("{text}");
        }
    }
}

/// Initialise `env_logger`. `RUST_LOG` overrides the level the flags select.
pub fn init_logging(verbosity: &Verbosity) {
    env_logger::Builder::from_env(Env::default().default_filter_or(verbosity.level()))
        .format_timestamp(None)
        .format_target(false)
        .format_level(false)
        .init();
}

/// The opening status block: tool name, then one aligned line per field.
pub fn banner(tool: &str, fields: &[(&str, String)]) -> String {
    let mut out = format!(" *** {tool} ***");
    for (label, value) in fields {
        out.push_str(&format!("\n {label:<16}: {value}"));
    }
    out
}
