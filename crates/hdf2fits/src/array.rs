//! Dynamically typed n-dimensional arrays read from HDF5 or `.npy` sources.

use std::fmt;

use ndarray::{ArrayD, Axis};

/// Element type of an [`ArrayData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
    Str,
}

impl ElementType {
    /// Returns `true` for types that can be stored as FITS image pixels.
    pub fn is_numeric(self) -> bool {
        !matches!(self, ElementType::Str)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::Bool => "bool",
            ElementType::U8 => "u8",
            ElementType::I8 => "i8",
            ElementType::U16 => "u16",
            ElementType::I16 => "i16",
            ElementType::U32 => "u32",
            ElementType::I32 => "i32",
            ElementType::U64 => "u64",
            ElementType::I64 => "i64",
            ElementType::F32 => "f32",
            ElementType::F64 => "f64",
            ElementType::Str => "string",
        };
        f.write_str(name)
    }
}

/// An n-dimensional array whose element type is only known at run time.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Bool(ArrayD<bool>),
    U8(ArrayD<u8>),
    I8(ArrayD<i8>),
    U16(ArrayD<u16>),
    I16(ArrayD<i16>),
    U32(ArrayD<u32>),
    I32(ArrayD<i32>),
    U64(ArrayD<u64>),
    I64(ArrayD<i64>),
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
    Str(ArrayD<String>),
}

/// Run `$body` with `$arr` bound to the inner array of whichever variant `$data` holds.
macro_rules! with_array {
    ($data:expr, $arr:ident => $body:expr) => {
        match $data {
            ArrayData::Bool($arr) => $body,
            ArrayData::U8($arr) => $body,
            ArrayData::I8($arr) => $body,
            ArrayData::U16($arr) => $body,
            ArrayData::I16($arr) => $body,
            ArrayData::U32($arr) => $body,
            ArrayData::I32($arr) => $body,
            ArrayData::U64($arr) => $body,
            ArrayData::I64($arr) => $body,
            ArrayData::F32($arr) => $body,
            ArrayData::F64($arr) => $body,
            ArrayData::Str($arr) => $body,
        }
    };
}

impl ArrayData {
    pub fn element_type(&self) -> ElementType {
        match self {
            ArrayData::Bool(_) => ElementType::Bool,
            ArrayData::U8(_) => ElementType::U8,
            ArrayData::I8(_) => ElementType::I8,
            ArrayData::U16(_) => ElementType::U16,
            ArrayData::I16(_) => ElementType::I16,
            ArrayData::U32(_) => ElementType::U32,
            ArrayData::I32(_) => ElementType::I32,
            ArrayData::U64(_) => ElementType::U64,
            ArrayData::I64(_) => ElementType::I64,
            ArrayData::F32(_) => ElementType::F32,
            ArrayData::F64(_) => ElementType::F64,
            ArrayData::Str(_) => ElementType::Str,
        }
    }

    /// Array shape, slowest-varying axis first.
    pub fn shape(&self) -> &[usize] {
        with_array!(self, a => a.shape())
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        with_array!(self, a => a.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of axis 0; a scalar counts as one row.
    pub fn rows(&self) -> usize {
        self.shape().first().copied().unwrap_or(1)
    }

    /// Reverse the order of axis 0. Scalars are left unchanged.
    pub fn flip_rows(&mut self) {
        if self.ndim() == 0 {
            return;
        }
        with_array!(self, a => a.invert_axis(Axis(0)))
    }
}

macro_rules! impl_from_array {
    ($($t:ty => $variant:ident),* $(,)?) => {$(
        impl From<ArrayD<$t>> for ArrayData {
            fn from(a: ArrayD<$t>) -> Self {
                ArrayData::$variant(a)
            }
        }
    )*};
}

impl_from_array!(
    bool => Bool,
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    String => Str,
);
