//! One dataset as the single column of a FITS binary table.

use std::path::Path;

use log::info;

use crate::error::Result;
use crate::io::HduList;
use crate::source::Hdf5Source;
use crate::table::Table;

/// Store the one-dimensional dataset `dataset` of `input` as a column named
/// `dataset` in a new `BINTABLE`, overwriting `output`.
pub fn convert_column<P, Q>(input: P, dataset: &str, output: Q) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let source = Hdf5Source::open(input)?;

    info!("Adding DataSet  : {dataset}");
    let data = source.read_dataset(dataset)?;
    let mut table = Table::new();
    table.insert(dataset, data)?;

    let mut hdus = HduList::with_primary();
    hdus.push(table.to_hdu()?);
    hdus.write_to(output)
}
