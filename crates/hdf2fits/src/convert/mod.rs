//! The batch conversions, one module per tool.
//!
//! Each operation reads its whole input, writes a FITS file whose first HDU
//! is an empty primary, and logs one `info` line per stage.

use log::info;

use crate::error::Result;
use crate::extension::ExtensionType;
use crate::hdu::Hdu;
use crate::image::{encode_pixels, read_image};

pub mod column;
pub mod dataset;
pub mod group;
pub mod merge;
pub mod npy;

pub use column::convert_column;
pub use dataset::convert_dataset;
pub use group::convert_group;
pub use merge::merge_group;
pub use npy::convert_npy;

/// Default HDF5 input file.
pub const DEFAULT_INPUT: &str = "data.hdf";
/// Default FITS output file.
pub const DEFAULT_OUTPUT: &str = "data.fits";
/// Default group: the file root.
pub const DEFAULT_GROUP: &str = "/";
/// Default `.npy` input file.
pub const DEFAULT_NPY_INPUT: &str = "data.npy";

/// Name an appended extension after its dataset and, for `IMAGE` data,
/// reverse the rows so row 0 of the source ends up as the last FITS row.
pub(crate) fn name_and_orient(hdu: &mut Hdu, name: &str) -> Result<ExtensionType> {
    hdu.set_extname(name)?;
    let ext_type = hdu.extension_type()?;
    info!("--- FITS extension : {ext_type}");
    if ext_type == ExtensionType::Image {
        let mut data = read_image(hdu)?;
        data.flip_rows();
        hdu.data = encode_pixels(&data)?;
    }
    Ok(ext_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::ArrayData;
    use ndarray::{arr1, arr2};

    #[test]
    fn image_rows_are_reversed() {
        let data = ArrayData::from(arr2(&[[1i32, 2], [3, 4]]).into_dyn());
        let mut hdu = Hdu::from_array(&data).unwrap();
        let ext_type = name_and_orient(&mut hdu, "img").unwrap();
        assert_eq!(ext_type, ExtensionType::Image);
        assert_eq!(hdu.extname(), Some("img"));
        assert_eq!(
            read_image(&hdu).unwrap(),
            ArrayData::from(arr2(&[[3i32, 4], [1, 2]]).into_dyn())
        );
    }

    #[test]
    fn table_rows_keep_order() {
        let names = arr1(&[String::from("a"), String::from("b")]).into_dyn();
        let mut hdu = Hdu::from_array(&ArrayData::from(names)).unwrap();
        let before = hdu.data.clone();
        let ext_type = name_and_orient(&mut hdu, "names").unwrap();
        assert_eq!(ext_type, ExtensionType::BinaryTable);
        assert_eq!(hdu.data, before);
        assert_eq!(hdu.extname(), Some("names"));
    }
}
