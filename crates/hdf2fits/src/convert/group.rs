//! Every dataset of a group as its own named FITS extension.

use std::path::Path;

use log::{debug, info};

use crate::error::Result;
use crate::io::{append_hdu, HduList};
use crate::source::Hdf5Source;

use super::name_and_orient;

/// Append each direct-child dataset of `group` to `output` as one extension,
/// named after the dataset. Returns the dataset names in the order written.
///
/// Each extension is first staged as a complete in-memory FITS stream and
/// parsed back, so its final header is the one a reader of the staged file
/// would see.
pub fn convert_group<P, Q>(input: P, group: &str, output: Q) -> Result<Vec<String>>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let output = output.as_ref();
    let source = Hdf5Source::open(input)?;
    let names = source.dataset_names(group)?;
    HduList::with_primary().write_to(output)?;

    for name in &names {
        info!("Converting DataSet : {name}");
        let contents = source.member_contents(group, name)?;

        let mut staged = HduList::with_primary();
        staged.push(contents.to_hdu()?);
        let mut staged = HduList::parse(&staged.to_bytes())?;
        let hdu = staged.last_extension_mut()?;
        name_and_orient(hdu, name)?;

        append_hdu(output, hdu)?;
    }
    debug!("wrote {} extensions to {}", names.len(), output.display());
    Ok(names)
}
