//! Every dataset of a group as one column of a single FITS binary table.

use std::path::Path;

use log::info;

use crate::error::Result;
use crate::io::HduList;
use crate::source::Hdf5Source;
use crate::table::Table;

/// Collect the direct-child datasets of `group` into one `BINTABLE`, one
/// column per dataset, and write it to `output`. All datasets must be
/// one-dimensional with the same length. Returns the column names.
pub fn merge_group<P, Q>(input: P, group: &str, output: Q) -> Result<Vec<String>>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let source = Hdf5Source::open(input)?;
    let names = source.dataset_names(group)?;

    let mut table = Table::new();
    for name in &names {
        info!("Adding DataSet : {name}");
        table.insert(name, source.read_member(group, name)?)?;
    }

    let mut hdus = HduList::with_primary();
    hdus.push(table.to_hdu()?);
    hdus.write_to(output)?;
    Ok(names)
}
