use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// File names picked up when walking a directory: `test*.c`.
pub const TEST_FILE_PREFIX: &str = "test";
pub const TEST_FILE_EXTENSION: &str = "c";

pub fn is_test_file(path: &Path) -> bool {
    let name_ok = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(TEST_FILE_PREFIX));
    name_ok && path.extension().is_some_and(|ext| ext == TEST_FILE_EXTENSION)
}

/// Expand inputs into a sorted, deduplicated list of files.
///
/// Files are taken as given; directories are walked for `test*.c`.
pub fn find_test_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(
                WalkDir::new(input)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file() && is_test_file(e.path()))
                    .map(|e| e.path().to_path_buf()),
            );
        } else {
            files.push(input.clone());
        }
    }
    files.sort();
    files.dedup();
    files
}
