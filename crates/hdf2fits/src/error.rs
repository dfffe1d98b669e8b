use crate::array::ElementType;

/// All errors that can occur while reading sources or writing FITS output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed FITS header block.
    #[error("invalid FITS header: {0}")]
    InvalidHeader(&'static str),
    /// Premature end of data while reading.
    #[error("unexpected end of file")]
    UnexpectedEof,
    /// Unrecognized BITPIX value.
    #[error("invalid BITPIX value: {0}")]
    InvalidBitpix(i64),
    /// Malformed keyword name in a header card.
    #[error("invalid keyword name")]
    InvalidKeyword,
    /// A header value could not be parsed correctly.
    #[error("invalid header value")]
    InvalidValue,
    /// A required keyword was not found in the header.
    #[error("missing required keyword: {0}")]
    MissingKeyword(&'static str),
    /// Header text (EXTNAME, TTYPEn) outside printable ASCII.
    #[error("header text must be printable ASCII: {0:?}")]
    NonAsciiText(String),
    /// Unknown or unsupported XTENSION type.
    #[error("unsupported XTENSION type: {0}")]
    UnsupportedExtension(String),
    /// A binary table TFORM this crate does not read.
    #[error("unsupported TFORM: {0}")]
    UnsupportedTform(String),
    /// The source dataset has an element type with no FITS counterpart here.
    #[error("dataset '{name}' has unsupported datatype {dtype}")]
    UnsupportedDatatype { name: String, dtype: String },
    /// HDF5 refused to read a dataset into the requested memory layout.
    #[error("failed to read raw data of dataset '{0}'")]
    RawRead(String),
    /// The array cannot be stored as FITS image pixels.
    #[error("{dtype} array of rank {ndim} cannot be stored as a FITS image")]
    NotAnImage { dtype: ElementType, ndim: usize },
    /// Table columns must be one-dimensional.
    #[error("column '{name}' must be one-dimensional, got rank {ndim}")]
    NotOneDimensional { name: String, ndim: usize },
    /// A column's length disagrees with the table's row count.
    #[error("column '{name}' has {found} rows, table has {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        found: usize,
    },
    /// No column with the requested TTYPE.
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    /// The file holds only a primary HDU.
    #[error("FITS file has no extension HDU")]
    NoExtension,
    /// An I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// An error reported by the HDF5 library.
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),
    /// A `.npy` file could not be decoded.
    #[error("NPY error: {0}")]
    Npy(#[from] ndarray_npy::ReadNpyError),
    /// Decoded pixel count does not fit the declared axes.
    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
