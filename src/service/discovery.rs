use log::{debug, info};
use walkdir::WalkDir;

use crate::error::DiscoveryError;
use crate::models::conversion::ConversionSpec;
use crate::models::file::{FileDiscoveryInput, FileList};
use crate::service::traits::i_service::DiscoveryServiceTrait;

/// Recursive discovery over `walkdir`.
///
/// Entries are visited in pre-order with siblings sorted by file name, so two
/// runs over the same tree report files in the same order. Without
/// `follow_links` a symlink is neither descended into nor matched. Any entry
/// that cannot be read fails the whole walk.
pub struct WalkDirDiscoveryService;

impl DiscoveryServiceTrait for WalkDirDiscoveryService {
    fn discover(
        &self,
        input: &FileDiscoveryInput,
        spec: &ConversionSpec,
    ) -> Result<FileList, DiscoveryError> {
        let walker = WalkDir::new(&input.root)
            .follow_links(input.follow_links)
            .sort_by_file_name();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|source| DiscoveryError::Walk {
                path: source
                    .path()
                    .unwrap_or(&input.root)
                    .to_path_buf(),
                source,
            })?;
            if entry.depth() == 0 {
                if !entry.file_type().is_dir() {
                    return Err(DiscoveryError::NotADirectory(input.root.clone()));
                }
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }
            if spec.matches(entry.path()) {
                debug!("Matched {}", entry.path().display());
                files.push(entry.into_path());
            }
        }

        info!(
            "Found {} {} file(s) under {}",
            files.len(),
            spec.source_extension(),
            input.root.display()
        );
        Ok(FileList::new(files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::conversion::MatchPolicy;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    fn relative(root: &Path, files: &FileList) -> Vec<PathBuf> {
        files
            .iter()
            .map(|path| path.strip_prefix(root).unwrap().to_path_buf())
            .collect()
    }

    fn jpg_to_png() -> ConversionSpec {
        ConversionSpec::new(".jpg", ".png").unwrap()
    }

    #[test]
    fn finds_matching_files_recursively_in_sorted_order() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "b.jpg");
        touch(temp.path(), "a.jpg");
        touch(temp.path(), "a.png");
        touch(temp.path(), "notes.txt");
        touch(temp.path(), "nested/deeper/c.jpg");
        touch(temp.path(), "nested/c.jpeg");
        touch(temp.path(), "nested/UPPER.JPG");

        let files = WalkDirDiscoveryService
            .discover(&FileDiscoveryInput::new(temp.path()), &jpg_to_png())
            .unwrap();

        assert_eq!(
            relative(temp.path(), &files),
            vec![
                PathBuf::from("a.jpg"),
                PathBuf::from("b.jpg"),
                PathBuf::from("nested/deeper/c.jpg"),
            ]
        );
    }

    #[test]
    fn never_matches_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("album.jpg")).unwrap();
        touch(temp.path(), "album.jpg/inside.jpg");

        let files = WalkDirDiscoveryService
            .discover(&FileDiscoveryInput::new(temp.path()), &jpg_to_png())
            .unwrap();

        assert_eq!(
            relative(temp.path(), &files),
            vec![PathBuf::from("album.jpg/inside.jpg")]
        );
    }

    #[test]
    fn ignore_case_policy_matches_upper_case_extension() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.JPG");
        touch(temp.path(), "b.jpg");
        let spec =
            ConversionSpec::with_match_policy(".jpg", ".png", MatchPolicy::IgnoreAsciiCase).unwrap();

        let files = WalkDirDiscoveryService
            .discover(&FileDiscoveryInput::new(temp.path()), &spec)
            .unwrap();

        assert_eq!(files.len(), 2);
    }

    #[test]
    fn empty_tree_yields_empty_list() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.png");

        let files = WalkDirDiscoveryService
            .discover(&FileDiscoveryInput::new(temp.path()), &jpg_to_png())
            .unwrap();

        assert!(files.is_empty());
    }

    #[test]
    fn missing_root_fails_cleanly() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("gone");

        let result =
            WalkDirDiscoveryService.discover(&FileDiscoveryInput::new(&missing), &jpg_to_png());

        match result {
            Err(DiscoveryError::Walk { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected a walk error, got {:?}", other),
        }
    }

    #[test]
    fn file_root_is_rejected() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.jpg");
        let root = temp.path().join("a.jpg");

        let result =
            WalkDirDiscoveryService.discover(&FileDiscoveryInput::new(&root), &jpg_to_png());

        assert!(matches!(result, Err(DiscoveryError::NotADirectory(_))));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed_by_default() {
        let temp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        touch(outside.path(), "linked/far.jpg");
        touch(temp.path(), "real.jpg");
        std::os::unix::fs::symlink(outside.path().join("linked"), temp.path().join("link_dir"))
            .unwrap();
        std::os::unix::fs::symlink(temp.path().join("real.jpg"), temp.path().join("alias.jpg"))
            .unwrap();

        let default = WalkDirDiscoveryService
            .discover(&FileDiscoveryInput::new(temp.path()), &jpg_to_png())
            .unwrap();
        assert_eq!(relative(temp.path(), &default), vec![PathBuf::from("real.jpg")]);

        let mut input = FileDiscoveryInput::new(temp.path());
        input.follow_links = true;
        let followed = WalkDirDiscoveryService.discover(&input, &jpg_to_png()).unwrap();
        assert_eq!(
            relative(temp.path(), &followed),
            vec![
                PathBuf::from("alias.jpg"),
                PathBuf::from("link_dir/far.jpg"),
                PathBuf::from("real.jpg"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn link_cycle_fails_the_walk_when_following() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "sub/a.jpg");
        std::os::unix::fs::symlink(temp.path(), temp.path().join("sub/loop")).unwrap();

        let mut input = FileDiscoveryInput::new(temp.path());
        input.follow_links = true;
        let result = WalkDirDiscoveryService.discover(&input, &jpg_to_png());

        assert!(matches!(result, Err(DiscoveryError::Walk { .. })));
    }
}
