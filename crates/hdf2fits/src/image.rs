//! Image extension encoding and decoding.
//!
//! Pixels are written big-endian in row-major order with the array shape
//! reversed into NAXISn, so NAXIS1 is the fastest-varying (last) array axis.
//! Element types FITS cannot store natively (unsigned 16/32/64-bit integers
//! and signed bytes) go through the standard BZERO offset.

use ndarray::{ArrayD, IxDyn};

use crate::array::{ArrayData, ElementType};
use crate::endian::{decode_be, encode_be, BigEndian};
use crate::error::{Error, Result};
use crate::extension::{build_extension_header, ExtensionType};
use crate::hdu::Hdu;
use crate::header::Card;
use crate::value::Value;

/// BZERO that maps `u64` onto signed 64-bit storage.
pub const U64_ZERO: f64 = 9_223_372_036_854_775_808.0;
/// BZERO that maps `u32` onto signed 32-bit storage.
pub const U32_ZERO: i64 = 2_147_483_648;
/// BZERO that maps `u16` onto signed 16-bit storage.
pub const U16_ZERO: i64 = 32_768;
/// BZERO that maps `i8` onto unsigned byte storage.
pub const I8_ZERO: i64 = -128;

/// BITPIX and optional zero offset for an element type.
///
/// Returns `None` for strings, which have no pixel representation.
pub fn pixel_format(dtype: ElementType) -> Option<(i64, Option<Value>)> {
    let format = match dtype {
        ElementType::Bool | ElementType::U8 => (8, None),
        ElementType::I8 => (8, Some(Value::Integer(I8_ZERO))),
        ElementType::I16 => (16, None),
        ElementType::U16 => (16, Some(Value::Integer(U16_ZERO))),
        ElementType::I32 => (32, None),
        ElementType::U32 => (32, Some(Value::Integer(U32_ZERO))),
        ElementType::I64 => (64, None),
        ElementType::U64 => (64, Some(Value::Float(U64_ZERO))),
        ElementType::F32 => (-32, None),
        ElementType::F64 => (-64, None),
        ElementType::Str => return None,
    };
    Some(format)
}

/// Encode the samples of `data` in logical row-major order, with the zero
/// offset of [`pixel_format`] already removed.
pub fn encode_pixels(data: &ArrayData) -> Result<Vec<u8>> {
    let bytes = match data {
        ArrayData::Bool(a) => a.iter().map(|&b| u8::from(b)).collect(),
        ArrayData::U8(a) => a.iter().copied().collect(),
        ArrayData::I8(a) => a.iter().map(|&v| (v as u8) ^ 0x80).collect(),
        ArrayData::I16(a) => encode_be(a.iter().copied()),
        ArrayData::U16(a) => encode_be(a.iter().map(|&v| (v ^ 0x8000) as i16)),
        ArrayData::I32(a) => encode_be(a.iter().copied()),
        ArrayData::U32(a) => encode_be(a.iter().map(|&v| (v ^ 0x8000_0000) as i32)),
        ArrayData::I64(a) => encode_be(a.iter().copied()),
        ArrayData::U64(a) => encode_be(a.iter().map(|&v| (v ^ (1 << 63)) as i64)),
        ArrayData::F32(a) => encode_be(a.iter().copied()),
        ArrayData::F64(a) => encode_be(a.iter().copied()),
        ArrayData::Str(a) => {
            return Err(Error::NotAnImage {
                dtype: ElementType::Str,
                ndim: a.ndim(),
            })
        }
    };
    Ok(bytes)
}

/// Build an `IMAGE` extension holding `data`.
///
/// A scalar is stored as a one-element, one-axis image.
pub fn image_hdu(data: &ArrayData) -> Result<Hdu> {
    let dtype = data.element_type();
    let (bitpix, bzero) = pixel_format(dtype).ok_or(Error::NotAnImage {
        dtype,
        ndim: data.ndim(),
    })?;

    let mut naxes: Vec<usize> = data.shape().iter().rev().copied().collect();
    if naxes.is_empty() {
        naxes.push(1);
    }

    let mut header = build_extension_header(ExtensionType::Image, bitpix, &naxes, 0);
    if let Some(bzero) = bzero {
        header.push(Card::new("BSCALE", 1i64));
        header.push(Card::with_comment(
            "BZERO",
            bzero,
            "offset data range to that of unsigned",
        ));
    }

    Ok(Hdu::new(header, encode_pixels(data)?))
}

fn decode<T, U>(raw: &[u8], shape: &[usize], convert: impl Fn(T) -> U) -> Result<ArrayD<U>>
where
    T: BigEndian,
{
    let samples: Vec<U> = decode_be::<T>(raw).into_iter().map(convert).collect();
    Ok(ArrayD::from_shape_vec(IxDyn(shape), samples)?)
}

/// Decode the pixels of an image HDU (primary or `IMAGE` extension).
///
/// The element type is restored from BITPIX and BZERO; the array shape is
/// NAXISn reversed. A header without axes yields an empty 1-D array.
pub fn read_image(hdu: &Hdu) -> Result<ArrayData> {
    if !hdu.is_primary() && hdu.extension_type()? != ExtensionType::Image {
        return Err(Error::InvalidHeader("not an image HDU"));
    }

    let header = &hdu.header;
    let bitpix = header
        .get_int("BITPIX")
        .ok_or(Error::MissingKeyword("BITPIX"))?;
    if header.get_float("BSCALE").unwrap_or(1.0) != 1.0 {
        return Err(Error::InvalidHeader("scaled images are not supported"));
    }
    let bzero = header.get_float("BZERO").unwrap_or(0.0);

    let mut shape = header.naxes()?;
    shape.reverse();
    if shape.is_empty() {
        shape.push(0);
    }

    let count: usize = shape.iter().product();
    let needed = count * (bitpix.unsigned_abs() as usize / 8);
    if hdu.data.len() < needed {
        return Err(Error::UnexpectedEof);
    }
    decode_pixels(bitpix, bzero, &hdu.data[..needed], &shape)
}

/// Decode big-endian samples stored with `bitpix` and zero offset `bzero`
/// into an array of `shape`, choosing the element type the offset implies.
pub fn decode_pixels(bitpix: i64, bzero: f64, raw: &[u8], shape: &[usize]) -> Result<ArrayData> {
    let data = match bitpix {
        8 if bzero == 0.0 => {
            ArrayData::U8(ArrayD::from_shape_vec(IxDyn(shape), raw.to_vec())?)
        }
        8 if bzero == I8_ZERO as f64 => ArrayData::I8(ArrayD::from_shape_vec(
            IxDyn(shape),
            raw.iter().map(|&b| (b ^ 0x80) as i8).collect(),
        )?),
        16 if bzero == 0.0 => ArrayData::I16(decode(raw, shape, |v: i16| v)?),
        16 if bzero == U16_ZERO as f64 => {
            ArrayData::U16(decode(raw, shape, |v: i16| (v as u16) ^ 0x8000)?)
        }
        32 if bzero == 0.0 => ArrayData::I32(decode(raw, shape, |v: i32| v)?),
        32 if bzero == U32_ZERO as f64 => {
            ArrayData::U32(decode(raw, shape, |v: i32| (v as u32) ^ 0x8000_0000)?)
        }
        64 if bzero == 0.0 => ArrayData::I64(decode(raw, shape, |v: i64| v)?),
        64 if bzero == U64_ZERO => {
            ArrayData::U64(decode(raw, shape, |v: i64| (v as u64) ^ (1 << 63))?)
        }
        -32 => ArrayData::F32(decode(raw, shape, |v: f32| v)?),
        -64 => ArrayData::F64(decode(raw, shape, |v: f64| v)?),
        8 | 16 | 32 | 64 => return Err(Error::InvalidHeader("unsupported BZERO")),
        other => return Err(Error::InvalidBitpix(other)),
    };
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr0, arr1, arr2, Array3};

    fn through_image(data: ArrayData) -> ArrayData {
        read_image(&image_hdu(&data).unwrap()).unwrap()
    }

    #[test]
    fn naxes_are_reversed_shape() {
        let data: ArrayData = Array3::<i32>::zeros((2, 3, 5)).into_dyn().into();
        let hdu = image_hdu(&data).unwrap();
        assert_eq!(hdu.header.get_int("BITPIX"), Some(32));
        assert_eq!(hdu.header.naxes().unwrap(), vec![5, 3, 2]);
        assert_eq!(hdu.data.len(), 2 * 3 * 5 * 4);
    }

    #[test]
    fn pixels_are_row_major_big_endian() {
        let data: ArrayData = arr2(&[[1i16, 2], [3, 4]]).into_dyn().into();
        let hdu = image_hdu(&data).unwrap();
        assert_eq!(hdu.data, vec![0, 1, 0, 2, 0, 3, 0, 4]);
    }

    #[test]
    fn flipped_view_is_written_in_logical_order() {
        let mut data: ArrayData = arr2(&[[1u8, 2], [3, 4]]).into_dyn().into();
        data.flip_rows();
        assert_eq!(image_hdu(&data).unwrap().data, vec![3, 4, 1, 2]);
    }

    #[test]
    fn u16_uses_bzero_offset() {
        let data: ArrayData = arr1(&[0u16, 1, u16::MAX]).into_dyn().into();
        let hdu = image_hdu(&data).unwrap();
        assert_eq!(hdu.header.get_int("BITPIX"), Some(16));
        assert_eq!(hdu.header.get_int("BZERO"), Some(32768));
        assert_eq!(hdu.header.get_int("BSCALE"), Some(1));
        assert_eq!(&hdu.data[..2], &(i16::MIN).to_be_bytes());
        assert_eq!(through_image(data.clone()), data);
    }

    #[test]
    fn unsigned_and_signed_byte_survive() {
        let cases: Vec<ArrayData> = vec![
            arr1(&[i8::MIN, -1, 0, i8::MAX]).into_dyn().into(),
            arr1(&[0u32, 7, u32::MAX]).into_dyn().into(),
            arr1(&[0u64, 1 << 40, u64::MAX]).into_dyn().into(),
            arr1(&[u8::MAX, 0]).into_dyn().into(),
        ];
        for data in cases {
            assert_eq!(through_image(data.clone()), data);
        }
    }

    #[test]
    fn u64_header_carries_float_bzero() {
        let data: ArrayData = arr1(&[1u64]).into_dyn().into();
        let hdu = image_hdu(&data).unwrap();
        assert_eq!(hdu.header.get_float("BZERO"), Some(U64_ZERO));
        let reparsed = crate::hdu::parse_hdu(&hdu.to_bytes()).unwrap().0;
        assert_eq!(read_image(&reparsed).unwrap(), data);
    }

    #[test]
    fn floats_survive() {
        let data: ArrayData = arr2(&[[1.5f64, -0.25], [f64::MAX, 0.0]]).into_dyn().into();
        assert_eq!(through_image(data.clone()), data);
        let data: ArrayData = arr1(&[3.25f32]).into_dyn().into();
        assert_eq!(through_image(data.clone()), data);
    }

    #[test]
    fn bool_reads_back_as_u8() {
        let data: ArrayData = arr1(&[true, false, true]).into_dyn().into();
        assert_eq!(
            through_image(data),
            ArrayData::from(arr1(&[1u8, 0, 1]).into_dyn())
        );
    }

    #[test]
    fn scalar_is_one_element_image() {
        let data: ArrayData = arr0(42i64).into_dyn().into();
        let hdu = image_hdu(&data).unwrap();
        assert_eq!(hdu.header.naxes().unwrap(), vec![1]);
        assert_eq!(
            read_image(&hdu).unwrap(),
            ArrayData::from(arr1(&[42i64]).into_dyn())
        );
    }

    #[test]
    fn strings_have_no_pixel_format() {
        assert!(pixel_format(ElementType::Str).is_none());
        let data: ArrayData = arr1(&[String::from("x")]).into_dyn().into();
        assert!(matches!(image_hdu(&data), Err(Error::NotAnImage { .. })));
    }

    #[test]
    fn primary_without_axes_reads_empty() {
        let data = read_image(&Hdu::empty_primary()).unwrap();
        assert_eq!(data.shape(), &[0]);
        assert_eq!(data.element_type(), ElementType::U8);
    }

    #[test]
    fn unknown_bzero_rejected() {
        let mut hdu = image_hdu(&arr1(&[1i16]).into_dyn().into()).unwrap();
        hdu.header.push(Card::new("BZERO", 5i64));
        assert!(matches!(
            read_image(&hdu),
            Err(Error::InvalidHeader("unsupported BZERO"))
        ));
    }

    #[test]
    fn short_data_is_eof() {
        let mut hdu = image_hdu(&arr1(&[1i32, 2]).into_dyn().into()).unwrap();
        hdu.data.truncate(6);
        assert!(matches!(read_image(&hdu), Err(Error::UnexpectedEof)));
    }
}
