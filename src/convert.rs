//! The two conversion-service operations.
//!
//! Both are stateless request/response calls: they validate their path
//! arguments in a fixed order, open their own file handles, and release
//! them before returning. Nothing is shared or cached between calls.

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::ConvertError;
use crate::mat5::MatWriter;
use crate::model::{ArchiveSummary, ArrayEntry, ConversionResult};
use crate::npz::{self, NamedArray};

// ---------------------------------------------------------------------------
// Inspect
// ---------------------------------------------------------------------------

/// Read the archive at `archive_path` and describe every array it
/// contains, in the archive's own order.
///
/// The summary reflects the file's content at call time; a repeated call
/// re-reads the file and may observe external modification.
///
/// # Errors
///
/// * [`ConvertError::InvalidInput`] when `archive_path` is empty
/// * [`ConvertError::NotFound`] when it does not reference an existing file
/// * [`ConvertError::ReadFailure`] when the archive cannot be opened or
///   decoded (the source error carries the decoder's diagnostic)
pub fn inspect<P: AsRef<Path>>(archive_path: P) -> Result<ArchiveSummary, ConvertError> {
    let archive_path = archive_path.as_ref();

    if archive_path.as_os_str().is_empty() {
        return Err(ConvertError::InvalidInput("no archive path given"));
    }
    if !archive_path.exists() {
        return Err(ConvertError::NotFound(archive_path.to_path_buf()));
    }

    let contents = npz::read_archive(archive_path)
        .map_err(|err| ConvertError::read_failure(archive_path, err))?;

    let entries = contents
        .arrays
        .iter()
        .map(|named| ArrayEntry::describe(&named.name, &named.data))
        .collect();

    Ok(ArchiveSummary {
        path: archive_path.to_path_buf(),
        size_bytes: contents.size_bytes,
        entries,
    })
}

// ---------------------------------------------------------------------------
// Convert
// ---------------------------------------------------------------------------

/// Rewrite the archive at `archive_path` as a `.mat` file at
/// `output_path`.
///
/// Every array is written under its original name with element type and
/// shape preserved (the target format forces scalars to 1×1 and vectors
/// to 1×n); nothing is filtered, renamed, or transformed. An existing
/// output file is replaced. Content is staged in a temporary file next to
/// the destination and only moved into place once complete, so a failed
/// conversion leaves no partial output behind.
///
/// # Errors
///
/// Arguments are checked in a fixed order so the first applicable error
/// is always the one reported:
///
/// * [`ConvertError::InvalidInput`] for an empty `archive_path`, then
///   for an empty `output_path`
/// * [`ConvertError::NotFound`] when `archive_path` does not exist
/// * [`ConvertError::ReadFailure`] when the archive cannot be decoded
/// * [`ConvertError::WriteFailure`] when the output cannot be staged,
///   written, or moved into place (bad target directory, permissions,
///   disk)
pub fn convert<P, Q>(archive_path: P, output_path: Q) -> Result<ConversionResult, ConvertError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let archive_path = archive_path.as_ref();
    let output_path = output_path.as_ref();

    if archive_path.as_os_str().is_empty() {
        return Err(ConvertError::InvalidInput("no archive path given"));
    }
    if output_path.as_os_str().is_empty() {
        return Err(ConvertError::InvalidInput("no output path given"));
    }
    if !archive_path.exists() {
        return Err(ConvertError::NotFound(archive_path.to_path_buf()));
    }

    let contents = npz::read_archive(archive_path)
        .map_err(|err| ConvertError::read_failure(archive_path, err))?;

    write_mat(output_path, &contents.arrays)
        .map_err(|err| ConvertError::write_failure(output_path, err))?;

    let output_size_bytes = fs::metadata(output_path)
        .map_err(|err| ConvertError::write_failure(output_path, err))?
        .len();

    let array_names: Vec<String> = contents.arrays.iter().map(|a| a.name.clone()).collect();

    log::info!(
        "converted {} array(s) from {} to {}",
        array_names.len(),
        archive_path.display(),
        output_path.display()
    );

    Ok(ConversionResult {
        output_path: output_path.to_path_buf(),
        output_size_bytes,
        array_names,
    })
}

/// Write all arrays into a fresh `.mat` file at `path`, atomically.
fn write_mat(
    path: &Path,
    arrays: &[NamedArray],
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Stage in the destination directory so the final rename cannot cross
    // filesystems.
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staged = NamedTempFile::new_in(dir)?;

    let mut writer = MatWriter::new(BufWriter::new(staged.as_file()))?;
    for named in arrays {
        writer.add_array(&named.name, &named.data)?;
    }
    writer.finish()?;

    // On failure, keep only the io error so the staged file is removed
    // right away instead of riding along inside the returned error.
    staged.persist(path).map_err(|err| err.error)?;
    Ok(())
}
