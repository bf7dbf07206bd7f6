use filestats::inventory::{inventory_root, run_inventory, InventoryError, InventoryRequest};
use filestats::scanner::{PatternSet, SkipSet, Walker, WalkerConfig};
use filestats::stats::StatsError;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_scan_matches_patterns_and_summarizes() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.nii"), vec![0u8; 100]).unwrap();
    fs::write(dir.path().join("b.img"), vec![1u8; 200]).unwrap();
    fs::write(dir.path().join("c.txt"), vec![2u8; 50]).unwrap();

    let report = inventory_root(dir.path(), "*.nii*;*.img*").unwrap();

    let paths: Vec<PathBuf> = report.files.iter().map(|r| r.path.clone()).collect();
    assert_eq!(file_names(&paths), ["a.nii", "b.img"]);

    let s = report.summary;
    assert_eq!(s.count, 2);
    assert_eq!(s.sum, 300);
    assert_eq!(s.mean, 150.0);
    assert_eq!(s.min, 100);
    assert_eq!(s.max, 200);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_scan_compressed_variants_match() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("scan.nii.gz"), b"gz").unwrap();
    fs::write(dir.path().join("scan.img.bz2"), b"bz2").unwrap();
    fs::write(dir.path().join("scan.hdr"), b"hdr").unwrap();

    let report = inventory_root(dir.path(), "*.nii*;*.img*").unwrap();
    assert_eq!(report.summary.count, 2);
}

#[test]
fn test_scan_empty_directory_is_empty_input() {
    let dir = tempdir().unwrap();

    match inventory_root(dir.path(), "*.nii*") {
        Err(InventoryError::Stats(StatsError::EmptyInput)) => {}
        other => panic!("Expected EmptyInput, got {other:?}"),
    }
}

#[test]
fn test_scan_no_matching_files_is_empty_input() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), b"text").unwrap();

    assert!(matches!(
        inventory_root(dir.path(), "*.nii*"),
        Err(InventoryError::Stats(StatsError::EmptyInput))
    ));
}

#[test]
fn test_scan_recurses_into_subdirectories() {
    let dir = tempdir().unwrap();
    let deep = dir.path().join("sub").join("deeper");
    fs::create_dir_all(&deep).unwrap();
    fs::write(dir.path().join("top.nii"), b"1").unwrap();
    fs::write(deep.join("bottom.nii"), b"22").unwrap();

    let report = inventory_root(dir.path(), "*.nii").unwrap();

    assert_eq!(report.summary.count, 2);
    assert_eq!(report.summary.sum, 3);
}

#[test]
fn test_skip_directory_excludes_its_files() {
    let dir = tempdir().unwrap();
    let skipped = dir.path().join("scratch");
    fs::create_dir(&skipped).unwrap();
    fs::write(dir.path().join("keep.nii"), vec![0u8; 10]).unwrap();
    fs::write(skipped.join("drop.nii"), vec![0u8; 20]).unwrap();
    fs::write(skipped.join("drop2.img"), vec![0u8; 30]).unwrap();

    let request = InventoryRequest::new(
        vec![dir.path().to_path_buf()],
        PatternSet::parse("*.nii*;*.img*").unwrap(),
    )
    .with_skip_dirs(vec![skipped.clone()]);
    let report = run_inventory(&request).unwrap();

    assert_eq!(report.summary.count, 1);
    assert!(report.files.iter().all(|r| !r.path.starts_with(&skipped)));
}

#[test]
fn test_skip_does_not_prune_sibling_with_shared_prefix() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("data")).unwrap();
    fs::create_dir(dir.path().join("data2")).unwrap();
    fs::write(dir.path().join("data").join("a.nii"), b"a").unwrap();
    fs::write(dir.path().join("data2").join("b.nii"), b"bb").unwrap();

    let request =
        InventoryRequest::new(vec![dir.path().to_path_buf()], PatternSet::parse("*.nii").unwrap())
            .with_skip_dirs(vec![dir.path().join("data")]);
    let report = run_inventory(&request).unwrap();

    assert_eq!(report.summary.count, 1);
    assert_eq!(report.files.records()[0].path, dir.path().join("data2").join("b.nii"));
}

#[test]
fn test_missing_skip_dir_is_a_warning() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.nii"), b"a").unwrap();

    let request =
        InventoryRequest::new(vec![dir.path().to_path_buf()], PatternSet::parse("*.nii").unwrap())
            .with_skip_dirs(vec![dir.path().join("does-not-exist")]);
    let report = run_inventory(&request).unwrap();

    assert_eq!(report.summary.count, 1);
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn test_walk_is_repeatable_and_sorted() {
    let dir = tempdir().unwrap();
    for name in ["zeta.nii", "alpha.nii", "mid.nii"] {
        fs::write(dir.path().join(name), b"x").unwrap();
    }
    fs::create_dir(dir.path().join("beta")).unwrap();
    fs::write(dir.path().join("beta").join("inner.nii"), b"x").unwrap();

    let config = WalkerConfig::new(PatternSet::parse("*.nii").unwrap(), SkipSet::default());
    let walker = Walker::new(dir.path(), config);

    let first: Vec<PathBuf> = walker.walk().map(Result::unwrap).collect();
    let second: Vec<PathBuf> = walker.walk().map(Result::unwrap).collect();

    assert_eq!(first, second);
    assert_eq!(file_names(&first), ["alpha.nii", "inner.nii", "mid.nii", "zeta.nii"]);
}

#[test]
fn test_files_sorted_ascending_by_size() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.nii"), vec![0u8; 300]).unwrap();
    fs::write(dir.path().join("b.nii"), vec![0u8; 100]).unwrap();
    fs::write(dir.path().join("c.nii"), vec![0u8; 200]).unwrap();

    let report = inventory_root(dir.path(), "*.nii").unwrap();
    let sizes: Vec<u64> = report.files.iter().map(|r| r.size).collect();

    assert_eq!(sizes, [100, 200, 300]);
    assert_eq!(report.files.min().unwrap().size, report.summary.min);
    assert_eq!(report.files.max().unwrap().size, report.summary.max);
}
