//! Mount table queries.

use std::io;
use std::path::Path;

/// Answers whether a path is an active mount point.
///
/// The live implementation is [`SystemMountTable`]; tests substitute an
/// in-memory table.
pub trait MountTable: Send + Sync {
    /// Whether `path` is the root of a mounted filesystem.
    ///
    /// A path that does not exist is not a mount point. Any other failure to
    /// query the OS is returned as an error.
    fn is_mount_point(&self, path: &Path) -> io::Result<bool>;
}

/// Mount table backed by the host operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMountTable;

impl SystemMountTable {
    /// Create a new system mount table.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl MountTable for SystemMountTable {
    fn is_mount_point(&self, path: &Path) -> io::Result<bool> {
        use rustix::fs::{FileType, lstat};
        use rustix::io::Errno;

        let stat = match lstat(path) {
            Ok(stat) => stat,
            Err(Errno::NOENT | Errno::NOTDIR) => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        if FileType::from_raw_mode(stat.st_mode as _) == FileType::Symlink {
            return Ok(false);
        }

        let parent = lstat(path.join("..")).map_err(io::Error::from)?;

        // A different device means something is mounted here; a shared
        // inode means `path` is the filesystem root.
        let mounted = stat.st_dev != parent.st_dev || stat.st_ino == parent.st_ino;

        tracing::trace!(path = %path.display(), mounted, "Queried mount table");
        Ok(mounted)
    }
}

#[cfg(windows)]
impl MountTable for SystemMountTable {
    fn is_mount_point(&self, path: &Path) -> io::Result<bool> {
        use std::path::Component;

        let mut components = path.components();
        let is_drive_root = matches!(components.next(), Some(Component::Prefix(_)))
            && matches!(components.next(), Some(Component::RootDir))
            && components.next().is_none();

        if !is_drive_root {
            return Ok(false);
        }

        match std::fs::metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn filesystem_root_is_mount_point() {
        assert!(SystemMountTable::new().is_mount_point(Path::new("/")).unwrap());
    }

    #[test]
    fn missing_path_is_not_mount_point() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(!SystemMountTable::new().is_mount_point(&missing).unwrap());
    }

    #[test]
    fn plain_directory_is_not_mount_point() {
        let dir = tempfile::tempdir().unwrap();
        let child = dir.path().join("child");
        std::fs::create_dir(&child).unwrap();
        assert!(!SystemMountTable::new().is_mount_point(&child).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_is_not_mount_point() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("root-link");
        std::os::unix::fs::symlink("/", &link).unwrap();
        assert!(!SystemMountTable::new().is_mount_point(&link).unwrap());
    }
}
