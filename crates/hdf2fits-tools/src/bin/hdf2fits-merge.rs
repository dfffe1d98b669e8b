//! Merge every dataset of an HDF5 group into one FITS table.

use anyhow::{Context, Result};
use clap::Parser;
use hdf2fits::convert::merge_group;
use hdf2fits_tools::{banner, init_logging, GroupArg, HdfFiles, Verbosity, FINISHED};

/// Store each dataset directly under an HDF5 group as one column of a FITS binary table
#[derive(Debug, Parser)]
#[command(name = "hdf2fits-merge", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    files: HdfFiles,

    #[command(flatten)]
    group: GroupArg,

    #[command(flatten)]
    verbosity: Verbosity,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.verbosity);

    cli.verbosity.say(banner(
        "hdf2fits-merge",
        &[
            ("Input filename", cli.files.input.display().to_string()),
            ("Group name", cli.group.group.clone()),
            ("Output filename", cli.files.output.display().to_string()),
        ],
    ));

    merge_group(&cli.files.input, &cli.group.group, &cli.files.output).with_context(|| {
        format!(
            "failed to merge group '{}' of {}",
            cli.group.group,
            cli.files.input.display()
        )
    })?;

    cli.verbosity.say(FINISHED);
    Ok(())
}
