//! Whole-file FITS reading, writing and appending.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::hdu::{parse_hdu, Hdu};

/// All HDUs of a FITS file, primary first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HduList {
    hdus: Vec<Hdu>,
}

impl HduList {
    /// A list holding only a data-less primary HDU.
    pub fn with_primary() -> Self {
        HduList {
            hdus: vec![Hdu::empty_primary()],
        }
    }

    /// Read and parse a FITS file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        Self::parse(&bytes)
    }

    /// Parse a complete FITS byte stream.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut hdus = Vec::new();
        let mut offset = 0;
        while offset < bytes.len() {
            let (hdu, consumed) = parse_hdu(&bytes[offset..])?;
            hdus.push(hdu);
            offset += consumed;
        }
        if !hdus.first().is_some_and(Hdu::is_primary) {
            return Err(Error::MissingKeyword("SIMPLE"));
        }
        debug!("parsed {} HDUs from {} bytes", hdus.len(), bytes.len());
        Ok(HduList { hdus })
    }

    pub fn push(&mut self, hdu: Hdu) {
        self.hdus.push(hdu);
    }

    pub fn len(&self) -> usize {
        self.hdus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hdus.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Hdu> {
        self.hdus.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hdu> {
        self.hdus.iter()
    }

    /// Finds the first HDU whose EXTNAME matches `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&Hdu> {
        self.hdus.iter().find(|h| h.extname() == Some(name))
    }

    /// The last HDU, which must be an extension.
    pub fn last_extension_mut(&mut self) -> Result<&mut Hdu> {
        if self.hdus.len() < 2 {
            return Err(Error::NoExtension);
        }
        self.hdus.last_mut().ok_or(Error::NoExtension)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.hdus.iter().flat_map(Hdu::to_bytes).collect()
    }

    /// Write the whole list to `path`, replacing any existing file.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path.as_ref(), self.to_bytes())?;
        debug!("wrote {} HDUs to {}", self.hdus.len(), path.as_ref().display());
        Ok(())
    }
}

impl IntoIterator for HduList {
    type Item = Hdu;
    type IntoIter = std::vec::IntoIter<Hdu>;

    fn into_iter(self) -> Self::IntoIter {
        self.hdus.into_iter()
    }
}

/// Append `hdu` to the end of an existing FITS file.
pub fn append_hdu<P: AsRef<Path>>(path: P, hdu: &Hdu) -> Result<()> {
    let mut file = OpenOptions::new().append(true).open(path.as_ref())?;
    file.write_all(&hdu.to_bytes())?;
    debug!("appended {} HDU to {}", hdu.xtension().unwrap_or("primary"), path.as_ref().display());
    Ok(())
}
