pub mod paths;

use std::io;
use std::path::{Path, PathBuf};

use crate::config::STORAGE_ROOT;

/// Local filesystem storage behind the admin panel. All public methods take
/// storage-relative paths ("uploads/...") and resolve them under the
/// configured root directory.
#[derive(Clone)]
pub struct FilesStorage {
    root: PathBuf,
}

impl FilesStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Absolute path for a storage-relative path.
    pub fn full_path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.full_path(relative).exists()
    }

    /// Writes bytes at the given path, creating parent directories as needed.
    pub fn save(&self, relative: &str, bytes: &[u8]) -> io::Result<()> {
        let target = self.full_path(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(target, bytes)
    }

    pub fn delete(&self, relative: &str) -> io::Result<()> {
        std::fs::remove_file(self.full_path(relative))
    }

    /// Moves a stored object, creating the destination directory as needed.
    pub fn rename(&self, from: &str, to: &str) -> io::Result<()> {
        let target = self.full_path(to);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::rename(self.full_path(from), target)
    }

    /// Opens a stored object for streamed reads.
    pub async fn open(&self, relative: &str) -> io::Result<tokio::fs::File> {
        tokio::fs::File::open(self.full_path(relative)).await
    }

    /// Names of the direct child directories of `base`, sorted.
    pub fn list_dirs(&self, base: &str) -> io::Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in std::fs::read_dir(self.full_path(base))? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        names.sort();
        Ok(names)
    }

    pub fn make_dir(&self, relative: &str) -> io::Result<()> {
        std::fs::create_dir_all(self.full_path(relative))
    }

    pub fn remove_dir(&self, relative: &str) -> io::Result<()> {
        std::fs::remove_dir_all(self.full_path(relative))
    }

    /// Total size in bytes of every file under `base`, recursively.
    pub fn dir_size(&self, base: &str) -> io::Result<u64> {
        fn walk(dir: &Path) -> io::Result<u64> {
            let mut size = 0;
            for entry in std::fs::read_dir(dir)? {
                let entry = entry?;
                let metadata = entry.metadata()?;
                size += if metadata.is_dir() {
                    walk(&entry.path())?
                } else {
                    metadata.len()
                };
            }
            Ok(size)
        }

        let base = self.full_path(base);
        if !base.exists() {
            return Ok(0);
        }
        walk(&base)
    }

    /// Resolves a download request through the fallback chain; returns the
    /// first storage path that exists on disk.
    pub fn resolve_download(&self, given: &str) -> Option<String> {
        paths::download_candidates(given)
            .into_iter()
            .find(|candidate| self.full_path(candidate).is_file())
    }

    /// Makes sure the managed root directory exists on startup.
    pub fn ensure_root_exists(&self) -> io::Result<()> {
        std::fs::create_dir_all(self.root.join(STORAGE_ROOT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (tempfile::TempDir, FilesStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FilesStorage::new(dir.path());
        storage.ensure_root_exists().unwrap();
        (dir, storage)
    }

    #[test]
    fn save_creates_parent_directories() {
        let (_dir, storage) = storage();

        storage.save("uploads/capstone/report.pdf", b"pdf").unwrap();

        assert!(storage.exists("uploads/capstone/report.pdf"));
    }

    #[test]
    fn rename_moves_within_the_tree() {
        let (_dir, storage) = storage();
        storage.save("uploads/capstone/report.pdf", b"pdf").unwrap();

        storage
            .rename("uploads/capstone/report.pdf", "uploads/capstone/Final Report.pdf")
            .unwrap();

        assert!(!storage.exists("uploads/capstone/report.pdf"));
        assert!(storage.exists("uploads/capstone/Final Report.pdf"));
    }

    #[test]
    fn list_dirs_returns_sorted_child_names_only() {
        let (_dir, storage) = storage();
        storage.make_dir("uploads/thesis").unwrap();
        storage.make_dir("uploads/capstone").unwrap();
        storage.make_dir("uploads/capstone/2024").unwrap();
        storage.save("uploads/loose.txt", b"x").unwrap();

        let names = storage.list_dirs("uploads").unwrap();

        assert_eq!(names, vec!["capstone", "thesis"]);
    }

    #[test]
    fn remove_dir_deletes_recursively() {
        let (_dir, storage) = storage();
        storage.save("uploads/capstone/2024/report.pdf", b"pdf").unwrap();

        storage.remove_dir("uploads/capstone").unwrap();

        assert!(!storage.exists("uploads/capstone"));
        assert!(storage.remove_dir("uploads/capstone").is_err());
    }

    #[test]
    fn dir_size_walks_nested_directories() {
        let (_dir, storage) = storage();
        storage.save("uploads/a.bin", &[0u8; 10]).unwrap();
        storage.save("uploads/capstone/b.bin", &[0u8; 32]).unwrap();
        storage.save("uploads/capstone/2024/c.bin", &[0u8; 8]).unwrap();

        assert_eq!(storage.dir_size("uploads").unwrap(), 50);
        assert_eq!(storage.dir_size("uploads/missing").unwrap(), 0);
    }

    #[test]
    fn download_resolution_falls_back_to_known_subfolders() {
        let (_dir, storage) = storage();
        storage.save("uploads/capstone/report.pdf", b"pdf").unwrap();

        assert_eq!(
            storage.resolve_download("report.pdf").as_deref(),
            Some("uploads/capstone/report.pdf")
        );
    }

    #[test]
    fn download_resolution_prefers_earlier_candidates() {
        let (_dir, storage) = storage();
        storage.save("uploads/report.pdf", b"root").unwrap();
        storage.save("uploads/capstone/report.pdf", b"sub").unwrap();

        assert_eq!(
            storage.resolve_download("report.pdf").as_deref(),
            Some("uploads/report.pdf")
        );
    }

    #[test]
    fn download_resolution_misses_cleanly() {
        let (_dir, storage) = storage();

        assert_eq!(storage.resolve_download("absent.pdf"), None);
    }
}
