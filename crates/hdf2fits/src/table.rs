//! In-memory tables of named, equally long, one-dimensional columns.

use crate::array::ArrayData;
use crate::bintable::{bintable_hdu, column_names, read_column};
use crate::error::{Error, Result};
use crate::hdu::Hdu;

/// An ordered collection of named columns sharing one row count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<(String, ArrayData)>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows, 0 for a table without columns.
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |(_, data)| data.rows())
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&ArrayData> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data)
    }

    /// Add `data` as the column `name`, replacing a column of the same name
    /// in place.
    ///
    /// The column must be one-dimensional and, unless it is the only column,
    /// as long as the existing ones.
    pub fn insert(&mut self, name: &str, data: ArrayData) -> Result<()> {
        if data.ndim() != 1 {
            return Err(Error::NotOneDimensional {
                name: name.to_owned(),
                ndim: data.ndim(),
            });
        }
        if let Some((_, other)) = self.columns.iter().find(|(n, _)| n != name) {
            if other.rows() != data.rows() {
                return Err(Error::ColumnLength {
                    name: name.to_owned(),
                    expected: other.rows(),
                    found: data.rows(),
                });
            }
        }

        match self.columns.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = data,
            None => self.columns.push((name.to_owned(), data)),
        }
        Ok(())
    }

    /// Serialize as a `BINTABLE` extension HDU.
    pub fn to_hdu(&self) -> Result<Hdu> {
        bintable_hdu(&self.columns)
    }

    /// Read every column of a `BINTABLE` extension.
    pub fn from_hdu(hdu: &Hdu) -> Result<Self> {
        let mut table = Table::new();
        for name in column_names(hdu)? {
            let data = read_column(hdu, &name)?;
            table.insert(&name, data)?;
        }
        Ok(table)
    }
}
