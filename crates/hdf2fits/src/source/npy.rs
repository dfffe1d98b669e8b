//! `.npy` array files as [`ArrayData`].

use std::path::Path;

use log::debug;
use ndarray::ArrayD;
use ndarray_npy::ReadNpyError;

use crate::array::ArrayData;
use crate::error::Result;

/// Try reading `path` as an array of each listed element type in turn,
/// moving on only when the file's dtype descriptor does not match.
macro_rules! read_first_matching {
    ($path:expr, $($t:ty),+ $(,)?) => {{
        let path = $path;
        $(
            match ndarray_npy::read_npy::<_, ArrayD<$t>>(path) {
                Ok(array) => return Ok(ArrayData::from(array)),
                Err(ReadNpyError::WrongDescriptor(descr)) => {
                    debug!("{} is not {}: {descr:?}", path.display(), stringify!($t));
                }
                Err(err) => return Err(err.into()),
            }
        )+
    }};
}

/// Load a `.npy` file whose element type is not known in advance.
///
/// Numeric and boolean arrays are supported; any other dtype is reported
/// through the last descriptor mismatch.
pub fn read_npy<P: AsRef<Path>>(path: P) -> Result<ArrayData> {
    let path = path.as_ref();
    read_first_matching!(path, f64, f32, i64, i32, i16, i8, u64, u32, u16, u8);
    Ok(ArrayData::from(ndarray_npy::read_npy::<_, ArrayD<bool>>(
        path,
    )?))
}
