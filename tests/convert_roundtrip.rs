//! End-to-end tests: build real `.npz` archives on disk, inspect and
//! convert them, and read the generated `.mat` files back with an
//! independent parser.

use std::fs::{self, File};
use std::path::Path;

use anyhow::Result;
use ndarray::{array, Array1, Array3};
use ndarray_npy::NpzWriter;
use npz2mat::{convert, inspect, ConvertError, ElementType, ScalarValue};
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The fixture used across tests: a small int32 vector that fits the
/// full-sample rule and a float64 vector long enough to be truncated.
fn write_fixture(path: &Path) -> Result<()> {
    let mut npz = NpzWriter::new(File::create(path)?);
    npz.add_array("x", &array![1i32, 2, 3])?;
    npz.add_array("y", &Array1::from_iter((0..12).map(f64::from)))?;
    npz.finish()?;
    Ok(())
}

fn parse_mat(path: &Path) -> Result<matfile::MatFile> {
    matfile::MatFile::parse(File::open(path)?)
        .map_err(|err| anyhow::anyhow!("parsing {}: {err}", path.display()))
}

#[test]
fn inspect_reports_every_array() -> Result<()> {
    init_logging();
    let dir = TempDir::new()?;
    let path = dir.path().join("data.npz");
    write_fixture(&path)?;

    let summary = inspect(&path)?;
    assert_eq!(summary.path, path);
    assert_eq!(summary.size_bytes, fs::metadata(&path)?.len());
    assert_eq!(summary.names(), vec!["x", "y"]);

    let x = &summary.entries[0];
    assert_eq!(x.shape, vec![3]);
    assert_eq!(x.element_type, ElementType::I32);
    assert_eq!(x.element_count, 3);
    assert_eq!(
        x.sample_values,
        vec![ScalarValue::Int(1), ScalarValue::Int(2), ScalarValue::Int(3)]
    );

    let y = &summary.entries[1];
    assert_eq!(y.shape, vec![12]);
    assert_eq!(y.element_type, ElementType::F64);
    assert_eq!(y.element_count, 12);
    assert_eq!(
        y.sample_values,
        (0..5).map(|v| ScalarValue::Float(v.into())).collect::<Vec<_>>()
    );

    assert!(summary.to_string().starts_with("archive: "));
    Ok(())
}

#[test]
fn inspect_rereads_the_file_each_call() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("data.npz");
    write_fixture(&path)?;
    assert_eq!(inspect(&path)?.len(), 2);

    // Replace the archive on disk; a second call must see the new content.
    let mut npz = NpzWriter::new(File::create(&path)?);
    npz.add_array("only", &array![1u8])?;
    npz.finish()?;

    let summary = inspect(&path)?;
    assert_eq!(summary.names(), vec!["only"]);
    assert_eq!(summary.entries[0].element_type, ElementType::U8);
    Ok(())
}

#[test]
fn missing_and_empty_paths_are_rejected() {
    assert!(matches!(inspect(""), Err(ConvertError::InvalidInput(_))));
    assert!(matches!(
        inspect("/no/such/file.npz"),
        Err(ConvertError::NotFound(_))
    ));

    assert!(matches!(
        convert("", "out.mat"),
        Err(ConvertError::InvalidInput(_))
    ));
    // The empty output argument is reported before the missing archive is
    // noticed.
    match convert("/no/such/file.npz", "") {
        Err(ConvertError::InvalidInput(msg)) => assert!(msg.contains("output")),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
    assert!(matches!(
        convert("/no/such/file.npz", "out.mat"),
        Err(ConvertError::NotFound(_))
    ));
}

#[test]
fn convert_requires_an_output_path() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("data.npz");
    write_fixture(&path)?;

    match convert(&path, "") {
        Err(ConvertError::InvalidInput(msg)) => assert!(msg.contains("output")),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
    Ok(())
}

#[test]
fn truncated_archive_is_a_read_failure() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("broken.npz");
    fs::write(&path, b"PK\x03\x04 not actually a zip archive")?;

    match inspect(&path) {
        Err(ConvertError::ReadFailure { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected ReadFailure, got {other:?}"),
    }
    Ok(())
}

#[test]
fn boolean_arrays_are_unsupported() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("bools.npz");
    let mut npz = NpzWriter::new(File::create(&path)?);
    npz.add_array("flags", &array![true, false])?;
    npz.finish()?;

    assert!(matches!(
        inspect(&path),
        Err(ConvertError::ReadFailure { .. })
    ));
    Ok(())
}

#[test]
fn convert_round_trips_through_an_independent_parser() -> Result<()> {
    init_logging();
    let dir = TempDir::new()?;
    let npz_path = dir.path().join("data.npz");
    let mat_path = dir.path().join("data.mat");
    write_fixture(&npz_path)?;

    let report = convert(&npz_path, &mat_path)?;
    assert_eq!(report.output_path, mat_path);
    assert_eq!(report.array_names, vec!["x", "y"]);
    assert_eq!(report.output_size_bytes, fs::metadata(&mat_path)?.len());

    let parsed = parse_mat(&mat_path)?;
    assert_eq!(parsed.arrays().len(), 2);

    // Vectors come back as 1×n: the target format has no rank-1 arrays.
    let x = parsed.find_by_name("x").expect("x not written");
    assert_eq!(x.size().to_vec(), vec![1, 3]);
    match x.data() {
        matfile::NumericData::Int32 { real, .. } => assert_eq!(real.as_slice(), &[1, 2, 3][..]),
        _ => panic!("x did not come back as int32"),
    }

    let y = parsed.find_by_name("y").expect("y not written");
    assert_eq!(y.size().to_vec(), vec![1, 12]);
    match y.data() {
        matfile::NumericData::Double { real, .. } => {
            let expected: Vec<f64> = (0..12).map(f64::from).collect();
            assert_eq!(real.as_slice(), expected.as_slice())
        }
        _ => panic!("y did not come back as double"),
    }
    Ok(())
}

#[test]
fn matrices_convert_column_major() -> Result<()> {
    let dir = TempDir::new()?;
    let npz_path = dir.path().join("m.npz");
    let mat_path = dir.path().join("m.mat");

    let mut npz = NpzWriter::new(File::create(&npz_path)?);
    npz.add_array("m", &array![[1i32, 2, 3], [4, 5, 6]])?;
    npz.finish()?;

    // The flattened preview stays row-major on the way in...
    let summary = inspect(&npz_path)?;
    assert_eq!(summary.entries[0].shape, vec![2, 3]);
    assert_eq!(
        summary.entries[0].sample_values,
        (1..=6i64).map(ScalarValue::Int).collect::<Vec<_>>()
    );

    // ...while the stored data is transposed for the column-major format.
    convert(&npz_path, &mat_path)?;
    let parsed = parse_mat(&mat_path)?;
    let m = parsed.find_by_name("m").expect("m not written");
    assert_eq!(m.size().to_vec(), vec![2, 3]);
    match m.data() {
        matfile::NumericData::Int32 { real, .. } => assert_eq!(real.as_slice(), &[1, 4, 2, 5, 3, 6][..]),
        _ => panic!("m did not come back as int32"),
    }
    Ok(())
}

#[test]
fn higher_rank_and_unsigned_types_survive() -> Result<()> {
    let dir = TempDir::new()?;
    let npz_path = dir.path().join("cube.npz");
    let mat_path = dir.path().join("cube.mat");

    let cube = Array3::from_shape_vec((2, 2, 2), (0u8..8).collect::<Vec<_>>())?;
    let mut npz = NpzWriter::new(File::create(&npz_path)?);
    npz.add_array("cube", &cube)?;
    npz.add_array("scale", &array![0.5f32, 1.5])?;
    npz.finish()?;

    convert(&npz_path, &mat_path)?;
    let parsed = parse_mat(&mat_path)?;

    let cube = parsed.find_by_name("cube").expect("cube not written");
    assert_eq!(cube.size().to_vec(), vec![2, 2, 2]);
    match cube.data() {
        // Column-major: the first axis varies fastest.
        matfile::NumericData::UInt8 { real, .. } => {
            assert_eq!(real.as_slice(), &[0, 4, 2, 6, 1, 5, 3, 7][..])
        }
        _ => panic!("cube did not come back as uint8"),
    }

    let scale = parsed.find_by_name("scale").expect("scale not written");
    match scale.data() {
        matfile::NumericData::Single { real, .. } => assert_eq!(real.as_slice(), &[0.5, 1.5][..]),
        _ => panic!("scale did not come back as single"),
    }
    Ok(())
}

#[test]
fn scalar_arrays_become_one_by_one() -> Result<()> {
    let dir = TempDir::new()?;
    let npz_path = dir.path().join("scalar.npz");
    let mat_path = dir.path().join("scalar.mat");

    let mut npz = NpzWriter::new(File::create(&npz_path)?);
    npz.add_array("answer", &ndarray::arr0(42i64))?;
    npz.finish()?;

    let summary = inspect(&npz_path)?;
    assert_eq!(summary.entries[0].shape, Vec::<usize>::new());
    assert_eq!(summary.entries[0].element_count, 1);
    assert_eq!(summary.entries[0].sample_values, vec![ScalarValue::Int(42)]);

    convert(&npz_path, &mat_path)?;
    let parsed = parse_mat(&mat_path)?;
    let answer = parsed.find_by_name("answer").expect("answer not written");
    assert_eq!(answer.size().to_vec(), vec![1, 1]);
    match answer.data() {
        matfile::NumericData::Int64 { real, .. } => assert_eq!(real.as_slice(), &[42][..]),
        _ => panic!("answer did not come back as int64"),
    }
    Ok(())
}

#[test]
fn convert_replaces_an_existing_output() -> Result<()> {
    let dir = TempDir::new()?;
    let npz_path = dir.path().join("data.npz");
    let mat_path = dir.path().join("data.mat");
    write_fixture(&npz_path)?;
    fs::write(&mat_path, b"stale content")?;

    let report = convert(&npz_path, &mat_path)?;
    assert_eq!(report.output_size_bytes, fs::metadata(&mat_path)?.len());
    assert!(parse_mat(&mat_path)?.find_by_name("x").is_some());
    Ok(())
}

#[test]
fn missing_output_directory_is_a_write_failure() -> Result<()> {
    let dir = TempDir::new()?;
    let npz_path = dir.path().join("data.npz");
    let mat_path = dir.path().join("no/such/dir/data.mat");
    write_fixture(&npz_path)?;

    match convert(&npz_path, &mat_path) {
        Err(ConvertError::WriteFailure { path: reported, .. }) => assert_eq!(reported, mat_path),
        other => panic!("expected WriteFailure, got {other:?}"),
    }
    assert!(!mat_path.exists());
    Ok(())
}

#[test]
fn empty_archives_convert_to_a_bare_header() -> Result<()> {
    let dir = TempDir::new()?;
    let npz_path = dir.path().join("empty.npz");
    let mat_path = dir.path().join("empty.mat");

    let npz = NpzWriter::new(File::create(&npz_path)?);
    npz.finish()?;

    assert!(inspect(&npz_path)?.is_empty());

    let report = convert(&npz_path, &mat_path)?;
    assert!(report.array_names.is_empty());
    // A MAT file with no arrays is exactly its 128-byte header.
    assert_eq!(report.output_size_bytes, 128);
    Ok(())
}
