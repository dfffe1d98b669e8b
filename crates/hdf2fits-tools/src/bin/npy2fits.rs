//! Convert a numpy `.npy` array into a FITS image extension.

use anyhow::{Context, Result};
use clap::Parser;
use hdf2fits::convert::convert_npy;
use hdf2fits_tools::{banner, init_logging, NpyFiles, Verbosity, FINISHED};

/// Store a numpy array file as extension 1 of a FITS file.
///
/// Without flags it reads `data.npy` and writes `data.fits`.
#[derive(Debug, Parser)]
#[command(name = "npy2fits", version, about)]
struct Cli {
    #[command(flatten)]
    files: NpyFiles,

    #[command(flatten)]
    verbosity: Verbosity,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.verbosity);

    cli.verbosity.say(banner(
        "npy2fits",
        &[
            ("Input filename", cli.files.input.display().to_string()),
            ("Output filename", cli.files.output.display().to_string()),
        ],
    ));

    convert_npy(&cli.files.input, &cli.files.output)
        .with_context(|| format!("failed to convert {}", cli.files.input.display()))?;

    cli.verbosity.say(FINISHED);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn flagless_uses_fixed_names() {
        let cli = Cli::try_parse_from(["npy2fits"]).unwrap();
        assert_eq!(cli.files.input, PathBuf::from("data.npy"));
        assert_eq!(cli.files.output, PathBuf::from("data.fits"));
    }

    #[test]
    fn flags_override_names() {
        let cli = Cli::try_parse_from(["npy2fits", "-i", "beam.npy", "--o", "beam.fits"]).unwrap();
        assert_eq!(cli.files.input, PathBuf::from("beam.npy"));
        assert_eq!(cli.files.output, PathBuf::from("beam.fits"));
    }
}
