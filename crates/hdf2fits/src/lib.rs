//! Conversion of HDF5 datasets and numpy arrays into FITS files.
//!
//! The crate bundles a small FITS writer/reader (headers, image extensions,
//! binary tables) with readers for HDF5 containers and `.npy` files, and the
//! five batch conversions built on top of them in [`convert`].

pub mod array;
pub mod bintable;
pub mod block;
pub mod convert;
pub mod endian;
pub mod error;
pub mod extension;
pub mod hdu;
pub mod header;
pub mod image;
pub mod io;
pub mod primary;
pub mod source;
pub mod table;
pub mod value;

pub use array::{ArrayData, ElementType};
pub use block::{BLOCK_SIZE, CARDS_PER_BLOCK, CARD_SIZE};
pub use error::{Error, Result};
pub use hdu::Hdu;
pub use io::HduList;
pub use table::Table;
