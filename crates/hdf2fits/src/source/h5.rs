//! HDF5 datasets and groups as [`ArrayData`] or, for compound datasets, a
//! [`Table`].

use std::path::Path;

use bytemuck::{pod_collect_to_vec, AnyBitPattern, NoUninit};
use hdf5::types::{
    CompoundType, EnumType, FloatSize, IntSize, TypeDescriptor, VarLenAscii, VarLenUnicode,
};
use hdf5::{Dataset, Datatype, File, Group};
use hdf5_sys::h5d::H5Dread;
use hdf5_sys::h5p::H5P_DEFAULT;
use hdf5_sys::h5s::H5S_ALL;
use log::debug;
use ndarray::{ArrayD, IxDyn};

use crate::array::ArrayData;
use crate::error::{Error, Result};
use crate::hdu::Hdu;
use crate::table::Table;

/// What one dataset holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Contents {
    /// A plain n-dimensional array.
    Array(ArrayData),
    /// A compound dataset: one column per field, one row per element.
    Records(Table),
}

impl Contents {
    /// Arrays go through [`Hdu::from_array`]; records always become a
    /// `BINTABLE` with one column per field.
    pub fn to_hdu(&self) -> Result<Hdu> {
        match self {
            Contents::Array(data) => Hdu::from_array(data),
            Contents::Records(table) => table.to_hdu(),
        }
    }
}

/// An HDF5 file opened read-only.
pub struct Hdf5Source {
    file: File,
}

impl Hdf5Source {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!("opened HDF5 file {}", path.display());
        Ok(Hdf5Source { file })
    }

    /// Read the dataset at `name`, a path relative to the file root.
    pub fn read_dataset(&self, name: &str) -> Result<ArrayData> {
        read_array(&self.file.dataset(name)?)
    }

    /// Like [`read_dataset`](Self::read_dataset), but compound datasets are
    /// read as records instead of being rejected.
    pub fn dataset_contents(&self, name: &str) -> Result<Contents> {
        read_contents(&self.file.dataset(name)?)
    }

    /// Open the group at `path` (`/` is the root group).
    pub fn group(&self, path: &str) -> Result<Group> {
        Ok(self.file.group(path)?)
    }

    /// Names of the datasets that are direct children of `group`, in the
    /// library's iteration order. Sub-groups and their members are skipped.
    pub fn dataset_names(&self, group: &str) -> Result<Vec<String>> {
        let names: Vec<String> = self
            .group(group)?
            .datasets()?
            .iter()
            .map(|ds| basename(&ds.name()).to_owned())
            .collect();
        debug!("group {group} holds {} datasets", names.len());
        Ok(names)
    }

    /// Read the dataset `name` looked up relative to `group`.
    pub fn read_member(&self, group: &str, name: &str) -> Result<ArrayData> {
        read_array(&self.group(group)?.dataset(name)?)
    }

    /// Contents of the dataset `name` looked up relative to `group`.
    pub fn member_contents(&self, group: &str, name: &str) -> Result<Contents> {
        read_contents(&self.group(group)?.dataset(name)?)
    }
}

/// Last component of an HDF5 object path.
fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn unsupported(name: &str, dtype: &TypeDescriptor) -> Error {
    Error::UnsupportedDatatype {
        name: name.to_owned(),
        dtype: format!("{dtype:?}"),
    }
}

/// Read a whole dataset, choosing the element type from its HDF5 datatype.
///
/// Fixed-length strings lose their NUL padding and enums are read as their
/// base integer type. Compound datasets are rejected; see [`read_contents`].
pub fn read_array(ds: &Dataset) -> Result<ArrayData> {
    let descriptor = ds.dtype()?.to_descriptor()?;
    debug!("reading {} as {descriptor:?}, shape {:?}", ds.name(), ds.shape());
    let data = match descriptor {
        TypeDescriptor::Boolean => ArrayData::Bool(ds.read_dyn()?),
        TypeDescriptor::Integer(IntSize::U1) => ArrayData::I8(ds.read_dyn()?),
        TypeDescriptor::Integer(IntSize::U2) => ArrayData::I16(ds.read_dyn()?),
        TypeDescriptor::Integer(IntSize::U4) => ArrayData::I32(ds.read_dyn()?),
        TypeDescriptor::Integer(IntSize::U8) => ArrayData::I64(ds.read_dyn()?),
        TypeDescriptor::Unsigned(IntSize::U1) => ArrayData::U8(ds.read_dyn()?),
        TypeDescriptor::Unsigned(IntSize::U2) => ArrayData::U16(ds.read_dyn()?),
        TypeDescriptor::Unsigned(IntSize::U4) => ArrayData::U32(ds.read_dyn()?),
        TypeDescriptor::Unsigned(IntSize::U8) => ArrayData::U64(ds.read_dyn()?),
        TypeDescriptor::Float(FloatSize::U4) => ArrayData::F32(ds.read_dyn()?),
        TypeDescriptor::Float(FloatSize::U8) => ArrayData::F64(ds.read_dyn()?),
        TypeDescriptor::VarLenUnicode => ArrayData::Str(
            ds.read_dyn::<VarLenUnicode>()?
                .map(|s| s.as_str().to_owned()),
        ),
        TypeDescriptor::VarLenAscii => ArrayData::Str(
            ds.read_dyn::<VarLenAscii>()?
                .map(|s| s.as_str().to_owned()),
        ),
        ty @ (TypeDescriptor::FixedAscii(_) | TypeDescriptor::FixedUnicode(_)) => {
            // No byte order to convert: the file type is the memory type.
            let raw = read_raw(ds, &ds.dtype()?)?;
            decode_native(&ds.name(), &ty, &raw, &ds.shape())?
        }
        ty @ TypeDescriptor::Enum(_) => {
            let raw = read_raw(ds, &Datatype::from_descriptor(&ty)?)?;
            decode_native(&ds.name(), &ty, &raw, &ds.shape())?
        }
        other => return Err(unsupported(&ds.name(), &other)),
    };
    Ok(data)
}

/// Read a dataset as [`Contents`]: compound datasets become records, all
/// others go through [`read_array`].
pub fn read_contents(ds: &Dataset) -> Result<Contents> {
    match ds.dtype()?.to_descriptor()? {
        TypeDescriptor::Compound(compound) => {
            Ok(Contents::Records(read_records(ds, &compound)?))
        }
        _ => Ok(Contents::Array(read_array(ds)?)),
    }
}

/// One column per compound field, in declaration order, one row per element.
/// Only scalar and one-dimensional compound datasets are read.
fn read_records(ds: &Dataset, compound: &CompoundType) -> Result<Table> {
    let name = ds.name();
    let rows = match ds.ndim() {
        0 => 1,
        1 => ds.shape()[0],
        ndim => return Err(Error::NotOneDimensional { name, ndim }),
    };

    let packed = compound.to_packed_repr();
    if packed.size == 0 {
        return Err(unsupported(&name, &TypeDescriptor::Compound(packed)));
    }
    let mem_type = Datatype::from_descriptor(&TypeDescriptor::Compound(packed.clone()))?;
    let raw = read_raw(ds, &mem_type)?;
    debug!("{name}: {rows} records of {} bytes, {} fields", packed.size, packed.fields.len());

    let mut fields = packed.fields.clone();
    fields.sort_by_key(|f| f.index);
    let mut table = Table::new();
    for field in &fields {
        let width = field.ty.size();
        let mut column = Vec::with_capacity(rows * width);
        for record in raw.chunks_exact(packed.size) {
            column.extend_from_slice(&record[field.offset..field.offset + width]);
        }
        let data = decode_native(&name, &field.ty, &column, &[rows])?;
        table.insert(&field.name, data)?;
    }
    Ok(table)
}

/// Read every element of `ds` converted to `mem_type`, as raw native bytes.
fn read_raw(ds: &Dataset, mem_type: &Datatype) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; ds.size() * mem_type.size()];
    if buf.is_empty() {
        return Ok(buf);
    }
    // SAFETY: `buf` holds one `mem_type`-sized element per dataset point and
    // both handles stay open for the duration of the call.
    let status = unsafe {
        H5Dread(
            ds.id(),
            mem_type.id(),
            H5S_ALL,
            H5S_ALL,
            H5P_DEFAULT,
            buf.as_mut_ptr().cast(),
        )
    };
    if status < 0 {
        return Err(Error::RawRead(ds.name()));
    }
    Ok(buf)
}

fn native<T: NoUninit + AnyBitPattern>(raw: &[u8], shape: &[usize]) -> Result<ArrayD<T>> {
    Ok(ArrayD::from_shape_vec(IxDyn(shape), pod_collect_to_vec::<u8, T>(raw))?)
}

fn enum_base(e: &EnumType) -> TypeDescriptor {
    if e.signed {
        TypeDescriptor::Integer(e.size)
    } else {
        TypeDescriptor::Unsigned(e.size)
    }
}

/// Fixed-length string contents up to the NUL padding.
fn fixed_string(bytes: &[u8]) -> String {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Decode tightly packed native-endian elements of type `ty`.
fn decode_native(
    name: &str,
    ty: &TypeDescriptor,
    raw: &[u8],
    shape: &[usize],
) -> Result<ArrayData> {
    let data = match ty {
        TypeDescriptor::Boolean => ArrayData::Bool(ArrayD::from_shape_vec(
            IxDyn(shape),
            raw.iter().map(|&b| b != 0).collect(),
        )?),
        TypeDescriptor::Integer(IntSize::U1) => ArrayData::I8(native(raw, shape)?),
        TypeDescriptor::Integer(IntSize::U2) => ArrayData::I16(native(raw, shape)?),
        TypeDescriptor::Integer(IntSize::U4) => ArrayData::I32(native(raw, shape)?),
        TypeDescriptor::Integer(IntSize::U8) => ArrayData::I64(native(raw, shape)?),
        TypeDescriptor::Unsigned(IntSize::U1) => ArrayData::U8(native(raw, shape)?),
        TypeDescriptor::Unsigned(IntSize::U2) => ArrayData::U16(native(raw, shape)?),
        TypeDescriptor::Unsigned(IntSize::U4) => ArrayData::U32(native(raw, shape)?),
        TypeDescriptor::Unsigned(IntSize::U8) => ArrayData::U64(native(raw, shape)?),
        TypeDescriptor::Float(FloatSize::U4) => ArrayData::F32(native(raw, shape)?),
        TypeDescriptor::Float(FloatSize::U8) => ArrayData::F64(native(raw, shape)?),
        TypeDescriptor::Enum(e) => decode_native(name, &enum_base(e), raw, shape)?,
        TypeDescriptor::FixedAscii(n) | TypeDescriptor::FixedUnicode(n) if *n > 0 => {
            let values = raw.chunks_exact(*n).map(fixed_string).collect();
            ArrayData::Str(ArrayD::from_shape_vec(IxDyn(shape), values)?)
        }
        other => return Err(unsupported(name, other)),
    };
    Ok(data)
}
