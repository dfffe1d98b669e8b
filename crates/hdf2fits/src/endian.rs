//! Big-endian conversion of typed sample buffers.
//!
//! FITS stores every numeric value big-endian. Samples are collected into a
//! properly aligned `Vec<T>`, byte-swapped in place and reinterpreted through
//! `bytemuck`, so no per-element byte slicing is needed.

use bytemuck::{cast_slice, pod_collect_to_vec, Pod};

/// A numeric sample type with a fixed big-endian on-disk representation.
pub trait BigEndian: Pod {
    /// Convert a native value to its big-endian bit pattern.
    fn to_be(self) -> Self;
    /// Convert a big-endian bit pattern to the native value.
    fn from_be(self) -> Self;
}

macro_rules! impl_big_endian_int {
    ($($t:ty),*) => {$(
        impl BigEndian for $t {
            fn to_be(self) -> Self {
                <$t>::to_be(self)
            }
            fn from_be(self) -> Self {
                <$t>::from_be(self)
            }
        }
    )*};
}

impl_big_endian_int!(u8, i8, u16, i16, u32, i32, u64, i64);

impl BigEndian for f32 {
    fn to_be(self) -> Self {
        f32::from_bits(self.to_bits().to_be())
    }
    fn from_be(self) -> Self {
        f32::from_bits(u32::from_be(self.to_bits()))
    }
}

impl BigEndian for f64 {
    fn to_be(self) -> Self {
        f64::from_bits(self.to_bits().to_be())
    }
    fn from_be(self) -> Self {
        f64::from_bits(u64::from_be(self.to_bits()))
    }
}

/// Encode native samples as contiguous big-endian bytes.
pub fn encode_be<T, I>(samples: I) -> Vec<u8>
where
    T: BigEndian,
    I: IntoIterator<Item = T>,
{
    let swapped: Vec<T> = samples.into_iter().map(BigEndian::to_be).collect();
    cast_slice::<T, u8>(&swapped).to_vec()
}

/// Decode contiguous big-endian bytes into native samples.
///
/// Trailing bytes that do not form a whole sample are ignored.
pub fn decode_be<T: BigEndian>(raw: &[u8]) -> Vec<T> {
    let whole = raw.len() - raw.len() % std::mem::size_of::<T>();
    let mut samples: Vec<T> = pod_collect_to_vec(&raw[..whole]);
    for v in &mut samples {
        *v = v.from_be();
    }
    samples
}
