use std::fs::File;
use std::io;
use std::path::Path;

use ndarray::ArrayD;
use ndarray_npy::{NpzReader, ReadNpzError};
use thiserror::Error;

use crate::model::ArrayData;

// ---------------------------------------------------------------------------
// Archive reading
// ---------------------------------------------------------------------------

/// An error opening or decoding an `.npz` archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The file could not be opened or statted.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The zip container or an inner `.npy` entry could not be decoded.
    #[error(transparent)]
    Npz(#[from] ReadNpzError),
}

/// One named array read out of an archive.
#[derive(Debug, Clone)]
pub struct NamedArray {
    /// User-facing array name (container entry name minus the `.npy`
    /// storage suffix).
    pub name: String,
    pub data: ArrayData,
}

/// Full contents of one `.npz` archive.
#[derive(Debug)]
pub struct ArchiveContents {
    /// On-disk size of the archive file.
    pub size_bytes: u64,
    /// All arrays, in the container's own entry order.
    pub arrays: Vec<NamedArray>,
}

/// numpy stores each array as `<name>.npy` inside the zip container; strip
/// the suffix to recover the array name. Entries written without the
/// suffix keep their name as-is.
fn array_name(entry: &str) -> &str {
    entry.strip_suffix(".npy").unwrap_or(entry)
}

/// Read every named array of the archive at `path` into memory.
///
/// Entry order is whatever order the container yields; for archives
/// written by `numpy.savez` that is insertion order.
pub fn read_archive(path: &Path) -> Result<ArchiveContents, ArchiveError> {
    let file = File::open(path)?;
    let size_bytes = file.metadata()?.len();
    let mut npz = NpzReader::new(file)?;

    let mut arrays = Vec::new();
    for entry in npz.names()? {
        let data = read_entry(&mut npz, &entry)?;
        log::debug!(
            "read `{}`: {} {:?}",
            array_name(&entry),
            data.element_type(),
            data.shape()
        );
        arrays.push(NamedArray {
            name: array_name(&entry).to_string(),
            data,
        });
    }

    Ok(ArchiveContents { size_bytes, arrays })
}

/// Read one entry, resolving its element type by trial.
///
/// `.npy` headers carry the dtype as a descriptor string, but the reader
/// only exposes typed access, so each supported element type is attempted
/// in turn until one matches. When none does, the final attempt's error
/// names the offending descriptor.
fn read_entry(npz: &mut NpzReader<File>, entry: &str) -> Result<ArrayData, ArchiveError> {
    let mut last: Option<ReadNpzError> = None;

    macro_rules! probe {
        ($($ty:ty => $variant:ident,)+) => {
            $(
                let result: Result<ArrayD<$ty>, ReadNpzError> = npz.by_name(entry);
                match result {
                    Ok(array) => return Ok(ArrayData::$variant(array)),
                    Err(err) => last = Some(err),
                }
            )+
        };
    }

    probe!(
        f64 => F64,
        f32 => F32,
        i64 => I64,
        i32 => I32,
        i16 => I16,
        i8 => I8,
        u64 => U64,
        u32 => U32,
        u16 => U16,
        u8 => U8,
    );

    // Every probe ran, so `last` is populated.
    Err(last.expect("no element type probed").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementType;
    use ndarray::array;
    use ndarray_npy::NpzWriter;

    #[test]
    fn storage_suffix_is_stripped() {
        assert_eq!(array_name("x.npy"), "x");
        assert_eq!(array_name("x"), "x");
        assert_eq!(array_name("nested/name.npy"), "nested/name");
    }

    #[test]
    fn mixed_element_types_resolve_per_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.npz");

        let mut npz = NpzWriter::new(File::create(&path).unwrap());
        npz.add_array("ints", &array![1i32, 2, 3]).unwrap();
        npz.add_array("floats", &array![[0.5f64, 1.5], [2.5, 3.5]]).unwrap();
        npz.finish().unwrap();

        let contents = read_archive(&path).unwrap();
        assert_eq!(contents.size_bytes, std::fs::metadata(&path).unwrap().len());
        assert_eq!(contents.arrays.len(), 2);

        let ints = &contents.arrays[0];
        assert_eq!(ints.name, "ints");
        assert_eq!(ints.data.element_type(), ElementType::I32);
        assert_eq!(ints.data.shape(), &[3]);

        let floats = &contents.arrays[1];
        assert_eq!(floats.name, "floats");
        assert_eq!(floats.data.element_type(), ElementType::F64);
        assert_eq!(floats.data.shape(), &[2, 2]);
    }
}
