#![cfg(unix)]

use filestats::inventory::{run_inventory, InventoryError, InventoryRequest};
use filestats::scanner::{PatternSet, ScanError};
use std::fs;
use std::os::unix::fs::symlink;
use tempfile::tempdir;

fn request(root: &std::path::Path) -> InventoryRequest {
    InventoryRequest::new(vec![root.to_path_buf()], PatternSet::parse("*.nii*").unwrap())
}

#[test]
fn test_symlinked_file_never_counted() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("original.nii");
    fs::write(&original, b"identical content").unwrap();
    symlink(&original, dir.path().join("link.nii")).unwrap();

    let report = run_inventory(&request(dir.path()).with_duplicates(true)).unwrap();

    assert_eq!(report.summary.count, 1);
    assert_eq!(report.files.records()[0].path, original);
    assert!(report.duplicates.unwrap().groups.is_empty());
}

#[test]
fn test_dangling_symlink_ignored() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("real.nii"), b"x").unwrap();
    symlink(dir.path().join("gone.nii"), dir.path().join("dangling.nii")).unwrap();

    let report = run_inventory(&request(dir.path())).unwrap();

    assert_eq!(report.summary.count, 1);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_symlinked_directory_not_followed_by_default() {
    let dir = tempdir().unwrap();
    let target = tempdir().unwrap();
    fs::write(dir.path().join("here.nii"), b"x").unwrap();
    fs::write(target.path().join("there.nii"), b"y").unwrap();
    symlink(target.path(), dir.path().join("linked")).unwrap();

    let report = run_inventory(&request(dir.path())).unwrap();

    assert_eq!(report.summary.count, 1);
}

#[test]
fn test_symlinked_directory_followed_when_enabled() {
    let dir = tempdir().unwrap();
    let target = tempdir().unwrap();
    fs::write(dir.path().join("here.nii"), b"x").unwrap();
    fs::write(target.path().join("there.nii"), b"yy").unwrap();
    symlink(target.path(), dir.path().join("linked")).unwrap();

    let report = run_inventory(&request(dir.path()).with_follow_dir_symlinks(true)).unwrap();

    assert_eq!(report.summary.count, 2);
    assert!(report
        .files
        .iter()
        .any(|r| r.path == dir.path().join("linked").join("there.nii")));
}

#[test]
fn test_linked_sibling_directory_counted_once() {
    let dir = tempdir().unwrap();
    let real = dir.path().join("real");
    fs::create_dir(&real).unwrap();
    fs::write(real.join("a.nii"), b"only once").unwrap();
    symlink(&real, dir.path().join("zlink")).unwrap();

    let report = run_inventory(
        &request(dir.path())
            .with_follow_dir_symlinks(true)
            .with_duplicates(true),
    )
    .unwrap();

    assert_eq!(report.summary.count, 1);
    assert_eq!(report.files.records()[0].path, real.join("a.nii"));
    assert!(report.duplicates.unwrap().groups.is_empty());
}

#[test]
fn test_symlink_cycle_fails_loudly() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("a.nii"), b"x").unwrap();
    symlink(dir.path(), sub.join("loop")).unwrap();

    let result = run_inventory(&request(dir.path()).with_follow_dir_symlinks(true));

    assert!(matches!(
        result,
        Err(InventoryError::SymlinkCycle(ScanError::SymlinkCycle { .. }))
    ));
}

#[test]
fn test_symlink_cycle_harmless_when_not_following() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("a.nii"), b"x").unwrap();
    symlink(dir.path(), sub.join("loop")).unwrap();

    let report = run_inventory(&request(dir.path())).unwrap();

    assert_eq!(report.summary.count, 1);
}
