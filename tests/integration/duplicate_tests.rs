use filestats::duplicates::{group, DuplicateFinder, FinderConfig};
use filestats::inventory::{run_inventory, InventoryRequest};
use filestats::scanner::{Hasher, PatternSet};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_identical_content_grouped() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.nii");
    let b = dir.path().join("b.nii");
    let c = dir.path().join("c.nii");
    fs::write(&a, b"same same").unwrap();
    fs::write(&b, b"same same").unwrap();
    fs::write(&c, b"different").unwrap();

    let batch = Hasher::new().hash_many(&[a.clone(), b.clone(), c.clone()], None);
    assert!(batch.errors.is_empty());
    let groups = group(batch.hashed);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files, vec![a, b]);
    assert!(groups.iter().all(|g| !g.files.contains(&c)));
}

#[test]
fn test_inventory_with_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("one.nii"), b"duplicate").unwrap();
    fs::write(dir.path().join("two.nii"), b"duplicate").unwrap();
    fs::write(dir.path().join("three.nii"), b"unique").unwrap();
    // Same size as the duplicates, different bytes
    fs::write(dir.path().join("four.nii"), b"duplicatf").unwrap();

    let request =
        InventoryRequest::new(vec![dir.path().to_path_buf()], PatternSet::parse("*.nii").unwrap())
            .with_duplicates(true)
            .with_io_threads(2);
    let report = run_inventory(&request).unwrap();
    let dups = report.duplicates.unwrap();

    assert_eq!(dups.groups.len(), 1);
    assert_eq!(dups.groups[0].size, 9);
    assert_eq!(dups.groups[0].len(), 2);
    assert_eq!(dups.hashed_files, 3);
    assert_eq!(dups.unique_size_files, 1);
    assert_eq!(dups.wasted_space(), 9);
}

#[test]
fn test_duplicates_not_run_unless_requested() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("one.nii"), b"duplicate").unwrap();
    fs::write(dir.path().join("two.nii"), b"duplicate").unwrap();

    let request =
        InventoryRequest::new(vec![dir.path().to_path_buf()], PatternSet::parse("*.nii").unwrap());
    let report = run_inventory(&request).unwrap();

    assert!(report.duplicates.is_none());
}

#[test]
fn test_group_members_follow_scan_order() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("a_sub");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("z.nii"), b"payload").unwrap();
    fs::write(sub.join("m.nii"), b"payload").unwrap();
    fs::write(dir.path().join("b.nii"), b"payload").unwrap();

    let request =
        InventoryRequest::new(vec![dir.path().to_path_buf()], PatternSet::parse("*.nii").unwrap())
            .with_duplicates(true);
    let report = run_inventory(&request).unwrap();
    let dups = report.duplicates.unwrap();

    assert_eq!(
        dups.groups[0].files,
        vec![sub.join("m.nii"), dir.path().join("b.nii"), dir.path().join("z.nii")]
    );
}

#[test]
fn test_several_groups_ordered_by_first_appearance() {
    let dir = tempdir().unwrap();
    let paths: Vec<_> = ["a", "b", "c", "d"]
        .iter()
        .map(|n| dir.path().join(format!("{n}.nii")))
        .collect();
    fs::write(&paths[0], b"second-kind").unwrap();
    fs::write(&paths[1], b"first--kind").unwrap();
    fs::write(&paths[2], b"second-kind").unwrap();
    fs::write(&paths[3], b"first--kind").unwrap();

    let report = DuplicateFinder::with_defaults().find_all(&paths).unwrap();

    assert_eq!(report.groups.len(), 2);
    assert_eq!(report.groups[0].files, vec![paths[0].clone(), paths[2].clone()]);
    assert_eq!(report.groups[1].files, vec![paths[1].clone(), paths[3].clone()]);
}

#[test]
fn test_thread_count_does_not_change_result() {
    let dir = tempdir().unwrap();
    let paths: Vec<_> = (0..20)
        .map(|i| {
            let p = dir.path().join(format!("f{i:02}.nii"));
            fs::write(&p, format!("content-{}", i % 5)).unwrap();
            p
        })
        .collect();

    let single = DuplicateFinder::new(FinderConfig::default().with_io_threads(1))
        .find_all(&paths)
        .unwrap();
    let many = DuplicateFinder::new(FinderConfig::default().with_io_threads(8))
        .find_all(&paths)
        .unwrap();

    assert_eq!(single.groups, many.groups);
    assert_eq!(single.groups.len(), 5);
    assert!(single.groups.iter().all(|g| g.len() == 4));
}
