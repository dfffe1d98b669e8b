//! Convert a one-dimensional HDF5 dataset into a FITS table column.

use anyhow::{Context, Result};
use clap::Parser;
use hdf2fits::convert::convert_column;
use hdf2fits_tools::{banner, init_logging, HdfFiles, Verbosity, FINISHED};

/// Store one 1-D HDF5 dataset as the single column of a FITS binary table
#[derive(Debug, Parser)]
#[command(name = "hdf2fits-column", version, about, long_about = None)]
struct Cli {
    /// DataSet name (include the group if needed)
    ds: String,

    #[command(flatten)]
    files: HdfFiles,

    #[command(flatten)]
    verbosity: Verbosity,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.verbosity);

    cli.verbosity.say(banner(
        "hdf2fits-column",
        &[
            ("Input filename", cli.files.input.display().to_string()),
            ("DataSet", cli.ds.clone()),
            ("Output filename", cli.files.output.display().to_string()),
        ],
    ));

    convert_column(&cli.files.input, &cli.ds, &cli.files.output).with_context(|| {
        format!(
            "failed to convert dataset '{}' of {}",
            cli.ds,
            cli.files.input.display()
        )
    })?;

    cli.verbosity.say(FINISHED);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn dataset_is_required() {
        assert!(Cli::try_parse_from(["hdf2fits-column"]).is_err());
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["hdf2fits-column", "/grp/energy"]).unwrap();
        assert_eq!(cli.ds, "/grp/energy");
        assert_eq!(cli.files.input, PathBuf::from("data.hdf"));
        assert_eq!(cli.files.output, PathBuf::from("data.fits"));
    }

    #[test]
    fn short_flags() {
        let cli =
            Cli::try_parse_from(["hdf2fits-column", "x", "-i", "run.h5", "-o", "x.fits", "-q"])
                .unwrap();
        assert_eq!(cli.files.input, PathBuf::from("run.h5"));
        assert_eq!(cli.files.output, PathBuf::from("x.fits"));
        assert!(cli.verbosity.quiet);
    }
}
