use std::path::{Path, PathBuf};

/// a fresh path under the temp directory, any leftover of an earlier run is removed
pub fn temp_image_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("blockvfs_{}_{name}", std::process::id()));
    if path.is_dir() {
        std::fs::remove_dir_all(&path).expect("Failed to remove leftover test directory");
    } else if path.exists() {
        std::fs::remove_file(&path).expect("Failed to remove leftover test file");
    }
    path
}

/// write `content` to a fresh host file named `name` inside its own temp directory
///
/// the directory keeps the base name of the file equal to `name`
pub fn host_file(name: &str, content: &[u8]) -> PathBuf {
    let dir = temp_image_path(&format!("{name}.d"));
    std::fs::create_dir_all(&dir).expect("Failed to create host file directory");
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write host file");
    path
}

/// remove a file created by [host_file] together with its directory
pub fn remove_host_file(path: &Path) {
    if let Some(dir) = path.parent() {
        let _ = std::fs::remove_dir_all(dir);
    }
}

/// deterministic, non-repeating-looking content without zero bytes
pub fn sample_content(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8 + 1).collect()
}
