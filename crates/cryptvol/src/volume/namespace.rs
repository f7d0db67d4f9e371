//! Mount identifier namespaces.

use std::path::PathBuf;

/// Identifiers available in a drive-letter namespace.
const DRIVE_LETTERS: std::ops::RangeInclusive<char> = 'A'..='Z';

/// Maps short mount identifiers (drive letters) to mount paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountNamespace {
    /// Windows drive roots: `Z` -> `Z:\`.
    DriveLetters,
    /// One directory per letter below a root: `Z` -> `<root>/Z`.
    Directory(PathBuf),
}

impl MountNamespace {
    /// Namespace of directories below `root`.
    #[must_use]
    pub fn under(root: impl Into<PathBuf>) -> Self {
        Self::Directory(root.into())
    }

    /// Normalise an identifier (trimmed, upper case, trailing `:` dropped).
    #[must_use]
    pub fn normalize(identifier: &str) -> String {
        identifier
            .trim()
            .trim_end_matches([':', '\\', '/'])
            .to_ascii_uppercase()
    }

    /// Path at which `identifier` is mounted.
    #[must_use]
    pub fn mount_path(&self, identifier: &str) -> PathBuf {
        let id = Self::normalize(identifier);
        match self {
            Self::DriveLetters => PathBuf::from(format!("{id}:\\")),
            Self::Directory(root) => root.join(id),
        }
    }

    /// Every identifier in the namespace, in order.
    pub fn identifiers(&self) -> impl Iterator<Item = String> {
        DRIVE_LETTERS.map(String::from)
    }
}

impl Default for MountNamespace {
    #[cfg(windows)]
    fn default() -> Self {
        Self::DriveLetters
    }

    #[cfg(not(windows))]
    fn default() -> Self {
        Self::under("/media/veracrypt")
    }
}
