//! Path conventions for the managed storage tree. Every managed path is
//! relative, rooted at the fixed `uploads` segment; callers never supply the
//! root themselves.

use std::path::{Component, Path};

use crate::config::STORAGE_ROOT;
use crate::error::ApiError;

/// Destination for replacement uploads on the primary-file edit flow.
pub const PRIMARY_FILES_DIR: &str = "uploads/primaryFiles";

/// Destination for replacement uploads on the version edit flow.
pub const VERSION_FILES_DIR: &str = "uploads/files";

/// Subfolders probed by the download fallback chain after the root and
/// primaryFiles locations miss.
pub const DOWNLOAD_FALLBACK_SUBFOLDERS: [&str; 2] = ["capstone", "files"];

/// Rejects absolute paths, backslashes and parent-directory components.
pub fn ensure_safe_relative(input: &str) -> Result<(), ApiError> {
    if input.contains('\\') || input.contains('\0') {
        return Err(ApiError::Validation("Invalid path.".to_string()));
    }

    let path = Path::new(input);
    for component in path.components() {
        match component {
            Component::Normal(_) => {}
            _ => return Err(ApiError::Validation("Invalid path.".to_string())),
        }
    }

    Ok(())
}

/// Computes the storage path for a fresh upload: `uploads[/folder]/filename`.
/// Blank folder input collapses to the root with no trailing separator.
pub fn upload_path(folder: Option<&str>, filename: &str) -> Result<String, ApiError> {
    if filename.trim().is_empty() || filename.contains('/') {
        return Err(ApiError::Validation("Invalid filename.".to_string()));
    }
    ensure_safe_relative(filename)?;

    let folder = folder.map(str::trim).unwrap_or("");
    if folder.is_empty() {
        return Ok(format!("{}/{}", STORAGE_ROOT, filename));
    }

    ensure_safe_relative(folder)?;
    Ok(format!("{}/{}/{}", STORAGE_ROOT, folder, filename))
}

/// Computes the storage path for a replacement upload landing in a fixed
/// directory (`uploads/primaryFiles` or `uploads/files`).
pub fn replacement_path(dir: &str, filename: &str) -> Result<String, ApiError> {
    if filename.trim().is_empty() || filename.contains('/') {
        return Err(ApiError::Validation("Invalid filename.".to_string()));
    }
    ensure_safe_relative(filename)?;

    Ok(format!("{}/{}", dir, filename))
}

/// Rename-without-reupload: keeps the directory and the original extension,
/// replacing only the base name. Returns None when the stored path is not
/// under the managed root, in which case no rename happens.
pub fn rename_within(old_path: &str, new_name: &str) -> Option<String> {
    if !old_path.starts_with(&format!("{}/", STORAGE_ROOT)) {
        return None;
    }

    let old = Path::new(old_path);
    let directory = old.parent()?.to_str()?;
    let stem = file_stem(new_name);
    if stem.is_empty() || stem.contains('/') || ensure_safe_relative(stem).is_err() {
        return None;
    }

    let renamed = match old.extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{}/{}.{}", directory, stem, ext),
        _ => format!("{}/{}", directory, stem),
    };

    Some(renamed)
}

/// Candidate storage paths for a download request, in resolution order.
pub fn download_candidates(given: &str) -> Vec<String> {
    let mut candidates = vec![
        format!("{}/{}", STORAGE_ROOT, given),
        format!("{}/{}", PRIMARY_FILES_DIR, given),
    ];

    for subfolder in DOWNLOAD_FALLBACK_SUBFOLDERS {
        candidates.push(format!("{}/{}/{}", STORAGE_ROOT, subfolder, given));
    }

    candidates
}

/// Base name without the final extension, mirroring how filenames are stored.
pub fn file_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
}

/// Final extension of a filename, empty when there is none.
pub fn extension(name: &str) -> &str {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_path_joins_folder_and_name() {
        assert_eq!(
            upload_path(Some("capstone"), "report.pdf").unwrap(),
            "uploads/capstone/report.pdf"
        );
    }

    #[test]
    fn blank_folder_collapses_to_root() {
        assert_eq!(upload_path(None, "report.pdf").unwrap(), "uploads/report.pdf");
        assert_eq!(
            upload_path(Some(""), "report.pdf").unwrap(),
            "uploads/report.pdf"
        );
        assert_eq!(
            upload_path(Some("   "), "report.pdf").unwrap(),
            "uploads/report.pdf"
        );
    }

    #[test]
    fn nested_folders_are_allowed() {
        assert_eq!(
            upload_path(Some("accreditation/2024"), "self-study.docx").unwrap(),
            "uploads/accreditation/2024/self-study.docx"
        );
    }

    #[test]
    fn traversal_is_rejected() {
        assert!(upload_path(Some(".."), "report.pdf").is_err());
        assert!(upload_path(Some("a/../../etc"), "report.pdf").is_err());
        assert!(upload_path(Some("/etc"), "report.pdf").is_err());
        assert!(upload_path(None, "..").is_err());
        assert!(upload_path(None, "a/b.pdf").is_err());
        assert!(replacement_path(PRIMARY_FILES_DIR, "../escape.pdf").is_err());
    }

    #[test]
    fn rename_preserves_directory_and_extension() {
        assert_eq!(
            rename_within("uploads/capstone/report.pdf", "Final Report").as_deref(),
            Some("uploads/capstone/Final Report.pdf")
        );
    }

    #[test]
    fn rename_strips_extension_typed_into_the_new_name() {
        assert_eq!(
            rename_within("uploads/capstone/report.pdf", "Final Report.docx").as_deref(),
            Some("uploads/capstone/Final Report.pdf")
        );
    }

    #[test]
    fn rename_outside_managed_root_is_skipped() {
        assert_eq!(rename_within("tmp/report.pdf", "Final"), None);
        assert_eq!(rename_within("report.pdf", "Final"), None);
    }

    #[test]
    fn rename_without_old_extension_keeps_bare_stem() {
        assert_eq!(
            rename_within("uploads/notes/minutes", "Agenda").as_deref(),
            Some("uploads/notes/Agenda")
        );
    }

    #[test]
    fn download_candidates_follow_fallback_order() {
        let candidates = download_candidates("report.pdf");
        assert_eq!(
            candidates,
            vec![
                "uploads/report.pdf",
                "uploads/primaryFiles/report.pdf",
                "uploads/capstone/report.pdf",
                "uploads/files/report.pdf",
            ]
        );
    }

    #[test]
    fn stem_and_extension_split_filenames() {
        assert_eq!(file_stem("report.pdf"), "report");
        assert_eq!(extension("report.pdf"), "pdf");
        assert_eq!(file_stem("archive.tar.gz"), "archive.tar");
        assert_eq!(extension("archive.tar.gz"), "gz");
        assert_eq!(extension("README"), "");
    }
}
