//! One dataset as a named FITS extension.

use std::path::Path;

use log::info;

use crate::error::Result;
use crate::extension::ExtensionType;
use crate::io::{append_hdu, HduList};
use crate::source::Hdf5Source;

use super::name_and_orient;

/// Write `dataset` of `input` as extension 1 of `output`.
///
/// Compound datasets become a `BINTABLE` with one column per field, numeric
/// arrays an `IMAGE`.
///
/// The file is written in two passes: an empty primary HDU plus the
/// appended extension, then a rewrite after EXTNAME is set and `IMAGE` rows
/// are reversed. Returns the type of the written extension.
pub fn convert_dataset<P, Q>(input: P, dataset: &str, output: Q) -> Result<ExtensionType>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let output = output.as_ref();
    let source = Hdf5Source::open(input)?;
    HduList::with_primary().write_to(output)?;

    info!("Converting DataSet : {dataset}");
    let contents = source.dataset_contents(dataset)?;
    append_hdu(output, &contents.to_hdu()?)?;

    let mut hdus = HduList::open(output)?;
    let ext_type = name_and_orient(hdus.last_extension_mut()?, dataset)?;
    hdus.write_to(output)?;
    Ok(ext_type)
}
