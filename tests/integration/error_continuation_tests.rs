use filestats::duplicates::DuplicateFinder;
use filestats::inventory::{run_inventory, InventoryRequest, Warning, WarningKind};
use filestats::scanner::{HashError, PatternSet, ScanError};
use filestats::stats::{collect, summarize, FileRecord, SizeCollection};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_collect_continues_past_vanished_file() {
    let dir = tempdir().unwrap();
    let kept = dir.path().join("kept.nii");
    fs::write(&kept, vec![0u8; 64]).unwrap();
    let vanished = dir.path().join("vanished.nii");

    let outcome = collect(vec![vanished.clone(), kept.clone()]);

    assert_eq!(outcome.collection.len(), 1);
    assert_eq!(outcome.collection.records()[0], FileRecord::new(64, kept));
    assert_eq!(outcome.errors.len(), 1);
    assert!(matches!(&outcome.errors[0], ScanError::Vanished(p) if *p == vanished));

    // The summary covers the surviving subset
    let summary = summarize(&outcome.collection).unwrap();
    assert_eq!(summary.count, 1);
    assert_eq!(summary.sum, 64);
}

#[test]
fn test_finder_continues_past_unreadable_file() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.nii");
    let b = dir.path().join("b.nii");
    fs::write(&a, b"same").unwrap();
    fs::write(&b, b"same").unwrap();
    let missing = dir.path().join("missing.nii");

    let sizes = SizeCollection::from_records(vec![
        FileRecord::new(4, a.clone()),
        FileRecord::new(4, b.clone()),
        FileRecord::new(4, missing.clone()),
    ]);
    let paths = vec![a.clone(), missing.clone(), b.clone()];

    let report = DuplicateFinder::with_defaults().find(&paths, &sizes).unwrap();

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].files, vec![a, b]);
    assert_eq!(report.hashed_files, 2);
    assert_eq!(report.errors.len(), 1);
    assert!(matches!(&report.errors[0], HashError::Unreadable { path, .. } if *path == missing));

    let warning = Warning::from(&report.errors[0]);
    assert_eq!(warning.kind, WarningKind::Unreadable);
}

#[test]
#[cfg(unix)]
fn test_unreadable_directory_skipped_with_warning() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("open.nii"), vec![0u8; 5]).unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("hidden.nii"), vec![0u8; 7]).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Running as root ignores directory permissions
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let request =
        InventoryRequest::new(vec![dir.path().to_path_buf()], PatternSet::parse("*.nii").unwrap());
    let result = run_inventory(&request);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let report = result.unwrap();

    assert_eq!(report.summary.count, 1);
    assert_eq!(report.summary.sum, 5);
    assert!(report.is_partial());
    assert_eq!(report.warnings[0].kind, WarningKind::PermissionDenied);
    assert_eq!(report.warnings[0].path, locked);
}

#[test]
#[cfg(unix)]
fn test_unreadable_file_still_counted_in_statistics() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let a = dir.path().join("a.nii");
    let b = dir.path().join("b.nii");
    fs::write(&a, b"twin").unwrap();
    fs::write(&b, b"twin").unwrap();
    fs::set_permissions(&b, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::File::open(&b).is_ok() {
        fs::set_permissions(&b, fs::Permissions::from_mode(0o644)).unwrap();
        return;
    }

    let request =
        InventoryRequest::new(vec![dir.path().to_path_buf()], PatternSet::parse("*.nii").unwrap())
            .with_duplicates(true);
    let result = run_inventory(&request);
    fs::set_permissions(&b, fs::Permissions::from_mode(0o644)).unwrap();
    let report = result.unwrap();

    // Stat needs no read permission, hashing does
    assert_eq!(report.summary.count, 2);
    assert!(report.duplicates.unwrap().groups.is_empty());
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, WarningKind::Unreadable);
    assert_eq!(report.warnings[0].path, PathBuf::from(&b));
}
