//! A `.npy` array as a FITS image extension.

use std::path::Path;

use log::info;

use crate::error::Result;
use crate::image::image_hdu;
use crate::io::{append_hdu, HduList};
use crate::source::read_npy;

/// Write the array stored in `input` as extension 1 of `output`, as is:
/// no EXTNAME and no row reversal.
pub fn convert_npy<P, Q>(input: P, output: Q) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let output = output.as_ref();
    let data = read_npy(input)?;
    info!("Array shape : {:?} ({})", data.shape(), data.element_type());

    HduList::with_primary().write_to(output)?;
    append_hdu(output, &image_hdu(&data)?)
}
