use std::fmt;
use std::path::PathBuf;

use ndarray::ArrayD;

// ---------------------------------------------------------------------------
// ElementType – closed set of supported element kinds
// ---------------------------------------------------------------------------

/// Numeric representation of one array element.
///
/// Covers the fixed-width types numpy archives use in practice; each maps
/// one-to-one onto a MATLAB array class. Archives containing anything else
/// (strings, objects, complex numbers) are rejected at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl ElementType {
    /// numpy-style dtype name, as shown in summaries.
    pub fn name(self) -> &'static str {
        match self {
            ElementType::I8 => "int8",
            ElementType::I16 => "int16",
            ElementType::I32 => "int32",
            ElementType::I64 => "int64",
            ElementType::U8 => "uint8",
            ElementType::U16 => "uint16",
            ElementType::U32 => "uint32",
            ElementType::U64 => "uint64",
            ElementType::F32 => "float32",
            ElementType::F64 => "float64",
        }
    }

    /// Width of one element in bytes.
    pub fn size_bytes(self) -> usize {
        match self {
            ElementType::I8 | ElementType::U8 => 1,
            ElementType::I16 | ElementType::U16 => 2,
            ElementType::I32 | ElementType::U32 | ElementType::F32 => 4,
            ElementType::I64 | ElementType::U64 | ElementType::F64 => 8,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// ScalarValue – one element lifted out of a typed array
// ---------------------------------------------------------------------------

/// A single array element, widened for previews.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Int(v) => write!(f, "{v}"),
            ScalarValue::UInt(v) => write!(f, "{v}"),
            ScalarValue::Float(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// ArrayData – array contents with the element type resolved at load time
// ---------------------------------------------------------------------------

/// One array's contents. The variant records the element type discovered in
/// the archive; the shape stays n-dimensional and flattened access is
/// row-major.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    I8(ArrayD<i8>),
    I16(ArrayD<i16>),
    I32(ArrayD<i32>),
    I64(ArrayD<i64>),
    U8(ArrayD<u8>),
    U16(ArrayD<u16>),
    U32(ArrayD<u32>),
    U64(ArrayD<u64>),
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
}

/// Run `$body` with `$arr` bound to the inner `ArrayD`, whatever the
/// element type.
macro_rules! with_array {
    ($data:expr, $arr:ident => $body:expr) => {
        match $data {
            ArrayData::I8($arr) => $body,
            ArrayData::I16($arr) => $body,
            ArrayData::I32($arr) => $body,
            ArrayData::I64($arr) => $body,
            ArrayData::U8($arr) => $body,
            ArrayData::U16($arr) => $body,
            ArrayData::U32($arr) => $body,
            ArrayData::U64($arr) => $body,
            ArrayData::F32($arr) => $body,
            ArrayData::F64($arr) => $body,
        }
    };
}

impl ArrayData {
    pub fn element_type(&self) -> ElementType {
        match self {
            ArrayData::I8(_) => ElementType::I8,
            ArrayData::I16(_) => ElementType::I16,
            ArrayData::I32(_) => ElementType::I32,
            ArrayData::I64(_) => ElementType::I64,
            ArrayData::U8(_) => ElementType::U8,
            ArrayData::U16(_) => ElementType::U16,
            ArrayData::U32(_) => ElementType::U32,
            ArrayData::U64(_) => ElementType::U64,
            ArrayData::F32(_) => ElementType::F32,
            ArrayData::F64(_) => ElementType::F64,
        }
    }

    /// Dimensions of the array, row-major.
    pub fn shape(&self) -> &[usize] {
        with_array!(self, a => a.shape())
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        with_array!(self, a => a.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first `n` elements in flattened (row-major) order.
    pub fn head(&self, n: usize) -> Vec<ScalarValue> {
        match self {
            ArrayData::I8(a) => a.iter().take(n).map(|&v| ScalarValue::Int(v.into())).collect(),
            ArrayData::I16(a) => a.iter().take(n).map(|&v| ScalarValue::Int(v.into())).collect(),
            ArrayData::I32(a) => a.iter().take(n).map(|&v| ScalarValue::Int(v.into())).collect(),
            ArrayData::I64(a) => a.iter().take(n).map(|&v| ScalarValue::Int(v)).collect(),
            ArrayData::U8(a) => a.iter().take(n).map(|&v| ScalarValue::UInt(v.into())).collect(),
            ArrayData::U16(a) => a.iter().take(n).map(|&v| ScalarValue::UInt(v.into())).collect(),
            ArrayData::U32(a) => a.iter().take(n).map(|&v| ScalarValue::UInt(v.into())).collect(),
            ArrayData::U64(a) => a.iter().take(n).map(|&v| ScalarValue::UInt(v)).collect(),
            ArrayData::F32(a) => a.iter().take(n).map(|&v| ScalarValue::Float(v.into())).collect(),
            ArrayData::F64(a) => a.iter().take(n).map(|&v| ScalarValue::Float(v)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// ArrayEntry – description of one named array
// ---------------------------------------------------------------------------

/// Arrays at most this long have their full contents in the sample.
pub const SAMPLE_FULL_MAX: usize = 10;

/// Longer arrays are previewed by this many leading elements.
pub const SAMPLE_HEAD: usize = 5;

/// Description of one named array inside an archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayEntry {
    /// Name of the array, unique within its archive.
    pub name: String,
    /// Dimensions, row-major.
    pub shape: Vec<usize>,
    pub element_type: ElementType,
    /// Product of the dimensions.
    pub element_count: usize,
    /// Full contents for arrays of up to [`SAMPLE_FULL_MAX`] elements,
    /// otherwise the first [`SAMPLE_HEAD`] elements in flattened order.
    pub sample_values: Vec<ScalarValue>,
}

impl ArrayEntry {
    /// Describe one named array.
    pub fn describe(name: &str, data: &ArrayData) -> ArrayEntry {
        let element_count = data.len();
        let sample_values = if element_count <= SAMPLE_FULL_MAX {
            data.head(element_count)
        } else {
            data.head(SAMPLE_HEAD)
        };
        ArrayEntry {
            name: name.to_string(),
            shape: data.shape().to_vec(),
            element_type: data.element_type(),
            element_count,
            sample_values,
        }
    }
}

impl fmt::Display for ArrayEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {:?}, {} elements",
            self.name, self.element_type, self.shape, self.element_count
        )?;
        let sample = self
            .sample_values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        if self.element_count <= SAMPLE_FULL_MAX {
            write!(f, ", values [{sample}]")
        } else {
            write!(f, ", first {SAMPLE_HEAD} [{sample}]")
        }
    }
}

// ---------------------------------------------------------------------------
// ArchiveSummary – everything inspect() learns about one archive
// ---------------------------------------------------------------------------

/// Contents of one archive, as reported by [`inspect`](crate::inspect).
///
/// Built fresh on every call from the file's current on-disk content;
/// nothing is cached between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveSummary {
    /// Archive the summary was read from.
    pub path: PathBuf,
    /// On-disk size of the archive.
    pub size_bytes: u64,
    /// One entry per named array, in the archive's own order.
    pub entries: Vec<ArrayEntry>,
}

impl ArchiveSummary {
    /// Number of arrays in the archive.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of all contained arrays, in archive order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}

impl fmt::Display for ArchiveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "archive: {} ({})\narrays: {}",
            self.path.display(),
            format_size(self.size_bytes),
            self.entries.len()
        )?;
        for entry in &self.entries {
            write!(f, "\n  {entry}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ConversionResult – report of one successful conversion
// ---------------------------------------------------------------------------

/// Report returned by a successful [`convert`](crate::convert()) call.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    /// The file that was written.
    pub output_path: PathBuf,
    /// Size of the written file.
    pub output_size_bytes: u64,
    /// Names of the arrays written, in archive order.
    pub array_names: Vec<String>,
}

impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "wrote {} ({}), {} array(s): {}",
            self.output_path.display(),
            format_size(self.output_size_bytes),
            self.array_names.len(),
            self.array_names.join(", ")
        )
    }
}

/// Render a byte count as `B` or `KiB`.
pub(crate) fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else {
        format!("{:.2} KiB", bytes as f64 / 1024.0)
    }
}
