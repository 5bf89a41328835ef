use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileDiscoveryInput {
    pub root: PathBuf,
    pub follow_links: bool,
}

impl FileDiscoveryInput {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileDiscoveryInput {
            root: root.into(),
            follow_links: false,
        }
    }
}

/// Files selected by one discovery pass, in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileList {
    files: Vec<PathBuf>,
}

impl FileList {
    pub fn new(files: Vec<PathBuf>) -> Self {
        FileList { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn into_vec(self) -> Vec<PathBuf> {
        self.files
    }
}
