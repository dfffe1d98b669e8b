//! Convert one HDF5 dataset into a named FITS extension.

use anyhow::{Context, Result};
use clap::Parser;
use hdf2fits::convert::convert_dataset;
use hdf2fits_tools::{banner, init_logging, HdfFiles, Verbosity, FINISHED};

/// Store one HDF5 dataset as extension 1 of a FITS file, named after the dataset
#[derive(Debug, Parser)]
#[command(name = "hdf2fits-dataset", version, about, long_about = None)]
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
        "hdf2fits-dataset",
        &[
            ("Input filename", cli.files.input.display().to_string()),
            ("DataSet", cli.ds.clone()),
            ("Output filename", cli.files.output.display().to_string()),
        ],
    ));

    convert_dataset(&cli.files.input, &cli.ds, &cli.files.output).with_context(|| {
        format!(
            "failed to convert dataset '{}' of {}",
            cli.ds,
            cli.files.input.display()
        )
    })?;

    cli.verbosity.say(FINISHED);
    Ok(())
}
