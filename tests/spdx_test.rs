// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

/// Source roots owned by this workspace; build output and anything else at
/// the top level are not walked.
const SOURCE_ROOTS: &[&str] = &["src", "tests", "cutsel-driver/src", "cutsel-driver/tests"];

fn check_spdx_identifier(file_path: &Path) -> bool {
    let file = fs::File::open(file_path).unwrap();
    let reader = io::BufReader::new(file);
    if let Some(Ok(first_line)) = reader.lines().next() {
        return first_line.starts_with("// SPDX-License-Identifier: Apache-2.0");
    }
    false
}

#[test]
fn check_all_rust_files_for_spdx() {
    let project_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut missing_spdx_files = Vec::new();
    let mut checked = 0;
    let mut dir_worklist: Vec<PathBuf> = SOURCE_ROOTS
        .iter()
        .map(|root| project_dir.join(root))
        .filter(|dir| dir.is_dir())
        .collect();

    while let Some(dir) = dir_worklist.pop() {
        for entry in fs::read_dir(dir).unwrap() {
            let entry = entry.unwrap();
            let path = entry.path();

            if path.is_dir() {
                dir_worklist.push(path.clone());
                continue;
            }

            if path.extension().is_some_and(|ext| ext == "rs") {
                checked += 1;
                if !check_spdx_identifier(&path) {
                    missing_spdx_files.push(path);
                }
            }
        }
    }

    assert!(checked > 0, "no Rust sources found under {:?}", SOURCE_ROOTS);
    if !missing_spdx_files.is_empty() {
        panic!(
            "The following files are missing SPDX identifiers: {:?}",
            missing_spdx_files
        );
    }
}
