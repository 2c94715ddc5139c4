/*!
 * Loader Tests
 * Reading workloads from disk
 */

use partition_sim::loader::{load_from_path, LoaderError, WarningKind};
use partition_sim::process::ProcessDescriptor;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_input(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write input");
    file
}

#[test]
fn test_load_from_file() {
    let file = write_input(
        "1024\n\
         # id size arrival duration\n\
         1 200 0 5\n\
         2 120\n\
         3 -4\n\
         4 300 2\n",
    );

    let workload = load_from_path(file.path()).unwrap();
    assert_eq!(workload.capacity, 1024);
    assert_eq!(workload.processes.len(), 3);
    assert_eq!(workload.processes[1], ProcessDescriptor::new(2, 120));
    assert_eq!(workload.processes[2].arrival, 2);
    assert_eq!(workload.warnings.len(), 1);
    assert_eq!(workload.warnings[0].line, 5);
    assert_eq!(workload.warnings[0].kind, WarningKind::NonPositiveSize(-4));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.txt");
    assert!(matches!(
        load_from_path(&missing),
        Err(LoaderError::Io { .. })
    ));
}

#[test]
fn test_only_invalid_lines_is_error() {
    let file = write_input("100\n1\n2 0\n");
    assert!(matches!(
        load_from_path(file.path()),
        Err(LoaderError::NoProcesses)
    ));
}
