//! Readers for the container formats converted into FITS.

pub mod h5;
pub mod npy;

pub use h5::{Contents, Hdf5Source};
pub use npy::read_npy;
