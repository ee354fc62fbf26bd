//! Video discovery for directory batches.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::validate::has_video_extension;

/// Recursively collect allow-listed video files under `dir`, in sorted
/// enumeration order.
///
/// `specific` restricts the scan to exact file-name matches. Full
/// validation (size, content type) is deferred to the per-file analysis
/// step, so an undersized or mistyped member still yields a per-file error
/// result instead of being silently dropped here.
pub fn discover_videos(dir: &Path, specific: Option<&str>) -> Vec<PathBuf> {
    let mut videos = Vec::new();

    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !entry.file_type().is_file() || !has_video_extension(path) {
            continue;
        }
        if let Some(name) = specific {
            if path.file_name().and_then(|n| n.to_str()) != Some(name) {
                continue;
            }
        }
        videos.push(path.to_path_buf());
    }

    videos
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::write(path, b"video bytes here").unwrap();
    }

    #[test]
    fn test_discovers_videos_recursively() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.mp4"));
        touch(&dir.path().join("b.txt"));
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        touch(&nested.join("c.mov"));

        let videos = discover_videos(dir.path(), None);
        let names: Vec<_> = videos
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.mp4", "c.mov"]);
    }

    #[test]
    fn test_specific_restricts_to_exact_name() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("clip.mp4"));
        touch(&dir.path().join("other.mp4"));
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        touch(&nested.join("clip.mp4"));

        let videos = discover_videos(dir.path(), Some("clip.mp4"));
        assert_eq!(videos.len(), 2);
        assert!(videos
            .iter()
            .all(|p| p.file_name().unwrap() == "clip.mp4"));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_videos(dir.path(), None).is_empty());
    }
}
