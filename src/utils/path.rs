use std::path::{Path, PathBuf};

/// Extension of a base name: everything from the last `.` on, dot included.
pub fn extension_of(name: &str) -> Option<&str> {
    name.rfind('.').map(|index| &name[index..])
}

/// Base name with its extension removed.
pub fn stem_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(index) => &name[..index],
        None => name,
    }
}

/// Output path for `original`: same directory and stem, `target_extension`
/// in place of the last `.`-suffix (appended when there is none).
pub fn derive_path(original: &Path, target_extension: &str) -> PathBuf {
    let name = original
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    original.with_file_name(format!("{}{}", stem_of(&name), target_extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extension_of_path(path: &Path) -> Option<String> {
        let name = path.file_name()?.to_str()?;
        extension_of(name).map(str::to_owned)
    }

    #[test]
    fn extension_is_last_dot_suffix() {
        assert_eq!(extension_of("photo.jpg"), Some(".jpg"));
        assert_eq!(extension_of("archive.tar.gz"), Some(".gz"));
        assert_eq!(extension_of(".jpg"), Some(".jpg"));
        assert_eq!(extension_of("trailing."), Some("."));
        assert_eq!(extension_of("README"), None);
    }

    #[test]
    fn derive_replaces_extension_and_keeps_directory() {
        let derived = derive_path(Path::new("shots/2024/a.jpg"), ".png");
        assert_eq!(derived, PathBuf::from("shots/2024/a.png"));
    }

    #[test]
    fn derive_only_replaces_last_suffix() {
        let derived = derive_path(Path::new("dir/my.holiday.photo.jpg"), ".png");
        assert_eq!(derived, PathBuf::from("dir/my.holiday.photo.png"));
    }

    #[test]
    fn derive_appends_when_there_is_no_extension() {
        assert_eq!(derive_path(Path::new("dir/raw"), ".png"), PathBuf::from("dir/raw.png"));
    }

    #[test]
    fn derive_on_dotfile_uses_empty_stem() {
        assert_eq!(derive_path(Path::new("dir/.jpg"), ".png"), PathBuf::from("dir/.png"));
    }

    #[test]
    fn derive_is_deterministic_and_round_trips() {
        let paths = [
            "a.jpg",
            "nested/dir/b.jpeg",
            "/abs/c.tar.gz",
            "no_extension",
            "./relative/d.JPG",
            "dir/.hidden",
        ];
        for target in [".png", ".bmp", ".tiff"] {
            for path in paths {
                let first = derive_path(Path::new(path), target);
                let second = derive_path(Path::new(path), target);
                assert_eq!(first, second);
                assert_eq!(extension_of_path(&first).as_deref(), Some(target), "{path}");
                assert_eq!(first.parent(), Path::new(path).parent(), "{path}");
            }
        }
    }
}
