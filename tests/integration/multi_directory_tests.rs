use filestats::inventory::{run_inventory, InventoryError, InventoryRequest, WarningKind};
use filestats::scanner::PatternSet;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn patterns() -> PatternSet {
    PatternSet::parse("*.nii*;*.img*").unwrap()
}

#[test]
fn test_scan_two_non_overlapping_directories() {
    let dir1 = tempdir().unwrap();
    let dir2 = tempdir().unwrap();
    fs::write(dir1.path().join("a.nii"), b"dup").unwrap();
    fs::write(dir2.path().join("b.img"), b"dup").unwrap();

    let request = InventoryRequest::new(
        vec![dir1.path().to_path_buf(), dir2.path().to_path_buf()],
        patterns(),
    )
    .with_duplicates(true);
    let report = run_inventory(&request).unwrap();

    assert_eq!(report.roots.len(), 2);
    assert_eq!(report.summary.count, 2);
    let dups = report.duplicates.unwrap();
    assert_eq!(dups.groups.len(), 1);
    assert_eq!(dups.groups[0].files.len(), 2);
}

#[test]
fn test_scan_overlapping_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("a.nii"), b"content").unwrap();
    fs::write(sub.join("b.nii"), b"content").unwrap();

    // Parent and child: the child is already covered, so nothing is counted twice
    let request =
        InventoryRequest::new(vec![dir.path().to_path_buf(), sub.clone()], patterns())
            .with_duplicates(true);
    let report = run_inventory(&request).unwrap();

    assert_eq!(report.roots, vec![dir.path().to_path_buf()]);
    assert_eq!(report.summary.count, 2);
    assert_eq!(report.duplicates.unwrap().groups[0].files.len(), 2);
}

#[test]
fn test_same_root_twice_counted_once() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.nii"), b"content").unwrap();

    let request = InventoryRequest::new(
        vec![dir.path().to_path_buf(), dir.path().join(".")],
        patterns(),
    );
    let report = run_inventory(&request).unwrap();

    assert_eq!(report.roots.len(), 1);
    assert_eq!(report.summary.count, 1);
}

#[test]
fn test_invalid_root_is_reported_and_others_continue() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.nii"), vec![0u8; 42]).unwrap();
    let missing = dir.path().join("missing");

    let request =
        InventoryRequest::new(vec![missing.clone(), dir.path().to_path_buf()], patterns());
    let report = run_inventory(&request).unwrap();

    assert_eq!(report.summary.sum, 42);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, WarningKind::InvalidPath);
    assert_eq!(report.warnings[0].path, missing);
}

#[test]
fn test_all_roots_invalid_fails() {
    let request = InventoryRequest::new(
        vec![PathBuf::from("/nonexistent/one"), PathBuf::from("/nonexistent/two")],
        patterns(),
    );

    assert!(matches!(
        run_inventory(&request),
        Err(InventoryError::NoValidRoots(errors)) if errors.len() == 2
    ));
}

#[test]
fn test_relative_root_is_made_absolute() {
    let request =
        InventoryRequest::new(vec![PathBuf::from("src")], PatternSet::parse("*.rs").unwrap());
    let report = run_inventory(&request).unwrap();

    assert!(report.roots[0].is_absolute());
    assert!(report.files.iter().all(|r| r.path.is_absolute()));
    assert!(report.summary.count > 0);
}
