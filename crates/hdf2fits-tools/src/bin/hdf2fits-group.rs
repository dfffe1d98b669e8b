//! Convert every dataset of an HDF5 group into its own FITS extension.

use anyhow::{Context, Result};
use clap::Parser;
use hdf2fits::convert::convert_group;
use hdf2fits_tools::{banner, init_logging, GroupArg, HdfFiles, Verbosity, FINISHED};

/// Store each dataset directly under an HDF5 group as a named FITS extension
#[derive(Debug, Parser)]
#[command(name = "hdf2fits-group", version, about, long_about = None)]
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
        "hdf2fits-group",
        &[
            ("Input filename", cli.files.input.display().to_string()),
            ("Group name", cli.group.group.clone()),
            ("Output filename", cli.files.output.display().to_string()),
        ],
    ));

    convert_group(&cli.files.input, &cli.group.group, &cli.files.output).with_context(|| {
        format!(
            "failed to convert group '{}' of {}",
            cli.group.group,
            cli.files.input.display()
        )
    })?;

    cli.verbosity.say(FINISHED);
    Ok(())
}
