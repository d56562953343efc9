//! Minimal writer for the MAT-file level 5 container.
//!
//! Covers exactly what conversion needs: little-endian files holding full
//! numeric arrays, one uncompressed `miMATRIX` element per array. The
//! layout follows the published MAT-file format: a 128-byte header, then
//! data elements made of an 8-byte tag plus a payload zero-padded to an
//! 8-byte boundary.

use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use thiserror::Error;

use crate::model::{ArrayData, ElementType};

// Data element types.
const MI_INT8: u32 = 1;
const MI_UINT8: u32 = 2;
const MI_INT16: u32 = 3;
const MI_UINT16: u32 = 4;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_SINGLE: u32 = 7;
const MI_DOUBLE: u32 = 9;
const MI_INT64: u32 = 12;
const MI_UINT64: u32 = 13;
const MI_MATRIX: u32 = 14;

// Array class codes, stored in the array-flags subelement.
const MX_DOUBLE_CLASS: u32 = 6;
const MX_SINGLE_CLASS: u32 = 7;
const MX_INT8_CLASS: u32 = 8;
const MX_UINT8_CLASS: u32 = 9;
const MX_INT16_CLASS: u32 = 10;
const MX_UINT16_CLASS: u32 = 11;
const MX_INT32_CLASS: u32 = 12;
const MX_UINT32_CLASS: u32 = 13;
const MX_INT64_CLASS: u32 = 14;
const MX_UINT64_CLASS: u32 = 15;

const HEADER_TEXT_LEN: usize = 116;
const VERSION: u16 = 0x0100;

/// An error writing a `.mat` file.
#[derive(Debug, Error)]
pub enum WriteMatError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// The encoded element would overflow the container's 32-bit size
    /// field, or a dimension exceeds `i32::MAX`.
    #[error("array `{name}` is too large for a MAT-file element")]
    ArrayTooLarge { name: String },
}

/// (array class, data storage type) for each supported element type.
fn element_kind(ty: ElementType) -> (u32, u32) {
    match ty {
        ElementType::I8 => (MX_INT8_CLASS, MI_INT8),
        ElementType::I16 => (MX_INT16_CLASS, MI_INT16),
        ElementType::I32 => (MX_INT32_CLASS, MI_INT32),
        ElementType::I64 => (MX_INT64_CLASS, MI_INT64),
        ElementType::U8 => (MX_UINT8_CLASS, MI_UINT8),
        ElementType::U16 => (MX_UINT16_CLASS, MI_UINT16),
        ElementType::U32 => (MX_UINT32_CLASS, MI_UINT32),
        ElementType::U64 => (MX_UINT64_CLASS, MI_UINT64),
        ElementType::F32 => (MX_SINGLE_CLASS, MI_SINGLE),
        ElementType::F64 => (MX_DOUBLE_CLASS, MI_DOUBLE),
    }
}

/// MATLAB dimensions for a row-major shape. The format has no
/// one-dimensional arrays: scalars become 1×1, vectors 1×n, and anything
/// of rank ≥ 2 keeps its dimensions.
fn mat_dims(shape: &[usize]) -> Vec<usize> {
    match shape {
        [] => vec![1, 1],
        [n] => vec![1, *n],
        _ => shape.to_vec(),
    }
}

/// Payload length rounded up to the container's 8-byte alignment.
fn padded(len: usize) -> u64 {
    (len as u64 + 7) & !7
}

fn write_padding<W: Write>(writer: &mut W, len: usize) -> io::Result<()> {
    let pad = (padded(len) - len as u64) as usize;
    writer.write_all(&[0u8; 7][..pad])
}

/// Write the elements in column-major order, as the container requires.
/// Reversing the axes and walking the view row-major visits the source's
/// first index fastest.
fn write_elements<W: Write>(writer: &mut W, data: &ArrayData) -> io::Result<()> {
    match data {
        ArrayData::I8(a) => {
            for &v in a.t().iter() {
                writer.write_i8(v)?;
            }
        }
        ArrayData::I16(a) => {
            for &v in a.t().iter() {
                writer.write_i16::<LittleEndian>(v)?;
            }
        }
        ArrayData::I32(a) => {
            for &v in a.t().iter() {
                writer.write_i32::<LittleEndian>(v)?;
            }
        }
        ArrayData::I64(a) => {
            for &v in a.t().iter() {
                writer.write_i64::<LittleEndian>(v)?;
            }
        }
        ArrayData::U8(a) => {
            for &v in a.t().iter() {
                writer.write_u8(v)?;
            }
        }
        ArrayData::U16(a) => {
            for &v in a.t().iter() {
                writer.write_u16::<LittleEndian>(v)?;
            }
        }
        ArrayData::U32(a) => {
            for &v in a.t().iter() {
                writer.write_u32::<LittleEndian>(v)?;
            }
        }
        ArrayData::U64(a) => {
            for &v in a.t().iter() {
                writer.write_u64::<LittleEndian>(v)?;
            }
        }
        ArrayData::F32(a) => {
            for &v in a.t().iter() {
                writer.write_f32::<LittleEndian>(v)?;
            }
        }
        ArrayData::F64(a) => {
            for &v in a.t().iter() {
                writer.write_f64::<LittleEndian>(v)?;
            }
        }
    }
    Ok(())
}

/// Writer for `.mat` files.
///
/// ```no_run
/// use ndarray::array;
/// use npz2mat::mat5::MatWriter;
/// use npz2mat::ArrayData;
/// use std::fs::File;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut mat = MatWriter::new(File::create("arrays.mat")?)?;
/// mat.add_array("a", &ArrayData::I32(array![[1, 2], [3, 4]].into_dyn()))?;
/// mat.finish()?;
/// # Ok(())
/// # }
/// ```
pub struct MatWriter<W: Write> {
    writer: W,
}

impl<W: Write> MatWriter<W> {
    /// Start a new `.mat` file, writing the 128-byte file header.
    pub fn new(mut writer: W) -> Result<MatWriter<W>, WriteMatError> {
        let mut text = [b' '; HEADER_TEXT_LEN];
        let description = b"MATLAB 5.0 MAT-file, created by npz2mat";
        text[..description.len()].copy_from_slice(description);
        writer.write_all(&text)?;
        // No subsystem data.
        writer.write_all(&[0u8; 8])?;
        writer.write_u16::<LittleEndian>(VERSION)?;
        // Endian indicator: reads as "MI" on a big-endian interpretation.
        writer.write_all(b"IM")?;
        Ok(MatWriter { writer })
    }

    /// Append one named array as an uncompressed `miMATRIX` element.
    ///
    /// The name is written byte-for-byte; shape and element type follow
    /// the source array, except that the format forces scalars to 1×1 and
    /// vectors to 1×n.
    pub fn add_array(&mut self, name: &str, data: &ArrayData) -> Result<(), WriteMatError> {
        let dims = mat_dims(data.shape());
        let (class, data_type) = element_kind(data.element_type());
        let name_bytes = name.as_bytes();
        let data_bytes = data.len() * data.element_type().size_bytes();

        // Element body: array flags, dimensions, name, data. Each is an
        // 8-byte tag plus its padded payload.
        let body = 16
            + 8
            + padded(4 * dims.len())
            + 8
            + padded(name_bytes.len())
            + 8
            + padded(data_bytes);
        if body > u64::from(u32::MAX) || dims.iter().any(|&d| d > i32::MAX as usize) {
            return Err(WriteMatError::ArrayTooLarge {
                name: name.to_string(),
            });
        }

        let w = &mut self.writer;
        w.write_u32::<LittleEndian>(MI_MATRIX)?;
        w.write_u32::<LittleEndian>(body as u32)?;

        // Array flags: class code in the low byte; nzmax unused.
        w.write_u32::<LittleEndian>(MI_UINT32)?;
        w.write_u32::<LittleEndian>(8)?;
        w.write_u32::<LittleEndian>(class)?;
        w.write_u32::<LittleEndian>(0)?;

        // Dimensions.
        w.write_u32::<LittleEndian>(MI_INT32)?;
        w.write_u32::<LittleEndian>((4 * dims.len()) as u32)?;
        for &dim in &dims {
            w.write_i32::<LittleEndian>(dim as i32)?;
        }
        write_padding(w, 4 * dims.len())?;

        // Name.
        w.write_u32::<LittleEndian>(MI_INT8)?;
        w.write_u32::<LittleEndian>(name_bytes.len() as u32)?;
        w.write_all(name_bytes)?;
        write_padding(w, name_bytes.len())?;

        // Data, column-major.
        w.write_u32::<LittleEndian>(data_type)?;
        w.write_u32::<LittleEndian>(data_bytes as u32)?;
        write_elements(w, data)?;
        write_padding(w, data_bytes)?;

        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W, WriteMatError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
