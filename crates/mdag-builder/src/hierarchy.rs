//! The file/directory hierarchy a build consumes.
//!
//! Nodes are either in-memory (built by hand, mostly for embedding and tests)
//! or loaded from the filesystem with [`Node::from_path`], in which case file
//! contents are read only when the file is built.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::{BuildError, BuildResult};

/// A file or a directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    File(FileNode),
    Dir(DirNode),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Self::File(file) => file.name(),
            Self::Dir(dir) => dir.name(),
        }
    }

    /// Declared size in bytes.
    pub fn size(&self) -> u64 {
        match self {
            Self::File(file) => file.size(),
            Self::Dir(dir) => dir.size(),
        }
    }

    /// Load the tree rooted at `path`.
    ///
    /// Directory children are ordered by file name. Symlinks and special
    /// files are skipped. File contents are not read here.
    pub fn from_path(path: &Path) -> BuildResult<Self> {
        let meta = fs::symlink_metadata(path).map_err(|source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = entry_name(path)?;

        if meta.is_dir() {
            load_dir(name, path).map(Self::Dir)
        } else if meta.is_file() {
            Ok(Self::File(FileNode::from_path(name, path, meta.len())))
        } else {
            Err(BuildError::Hierarchy {
                name,
                reason: "not a regular file or directory".into(),
            })
        }
    }
}

impl From<FileNode> for Node {
    fn from(file: FileNode) -> Self {
        Self::File(file)
    }
}

impl From<DirNode> for Node {
    fn from(dir: DirNode) -> Self {
        Self::Dir(dir)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum FileSource {
    Inline(Vec<u8>),
    Path(PathBuf),
}

/// A file: a name, a declared size, and a way to get its bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileNode {
    name: String,
    size: u64,
    source: FileSource,
}

impl FileNode {
    /// An in-memory file. Its declared size is the content length.
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            size: content.len() as u64,
            source: FileSource::Inline(content),
        }
    }

    /// A file whose bytes are read from `path` when needed.
    pub fn from_path(name: impl Into<String>, path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            source: FileSource::Path(path.into()),
        }
    }

    /// Override the declared size. The declared size is recorded in the
    /// parent's link as-is; it does not affect chunking.
    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// The file's content.
    pub fn bytes(&self) -> BuildResult<Cow<'_, [u8]>> {
        match &self.source {
            FileSource::Inline(content) => Ok(Cow::Borrowed(content.as_slice())),
            FileSource::Path(path) => {
                fs::read(path)
                    .map(Cow::Owned)
                    .map_err(|e| BuildError::Hierarchy {
                        name: self.name.clone(),
                        reason: format!("cannot read {}: {e}", path.display()),
                    })
            }
        }
    }
}

/// A directory: a name, a declared size, and ordered children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirNode {
    name: String,
    size: u64,
    children: Vec<Node>,
}

impl DirNode {
    /// A directory whose declared size is the sum of its children's.
    pub fn new(name: impl Into<String>, children: Vec<Node>) -> Self {
        let size = children.iter().map(Node::size).sum();
        Self {
            name: name.into(),
            size,
            children,
        }
    }

    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Direct children in build order. Each call starts from the first child.
    pub fn children(&self) -> std::slice::Iter<'_, Node> {
        self.children.iter()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

fn entry_name(path: &Path) -> BuildResult<String> {
    let raw = path.file_name().unwrap_or(path.as_os_str());
    raw.to_str()
        .map(str::to_owned)
        .ok_or_else(|| BuildError::Hierarchy {
            name: path.display().to_string(),
            reason: "name is not valid UTF-8".into(),
        })
}

fn load_dir(name: String, path: &Path) -> BuildResult<DirNode> {
    let mut children = Vec::new();
    let listing = WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in listing {
        let entry = entry.map_err(|e| BuildError::Hierarchy {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        let file_type = entry.file_type();
        if file_type.is_dir() {
            let child_name = entry_name(entry.path())?;
            children.push(Node::Dir(load_dir(child_name, entry.path())?));
        } else if file_type.is_file() {
            let child_name = entry_name(entry.path())?;
            let len = entry
                .metadata()
                .map_err(|e| BuildError::Hierarchy {
                    name: child_name.clone(),
                    reason: e.to_string(),
                })?
                .len();
            children.push(Node::File(FileNode::from_path(child_name, entry.path(), len)));
        } else {
            warn!(path = %entry.path().display(), "skipping non-regular entry");
        }
    }

    Ok(DirNode::new(name, children))
}
