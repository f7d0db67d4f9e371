//! Live mount state queries.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cryptvol_common::CryptvolResult;

use super::{MountNamespace, MountTable, SystemMountTable};

/// Answers whether mount points are bound, straight from the OS.
///
/// Nothing is cached: every query reads live state so a controller never
/// acts on a stale belief about what is mounted.
#[derive(Clone)]
pub struct VolumeStateChecker {
    table: Arc<dyn MountTable>,
    namespace: MountNamespace,
}

impl VolumeStateChecker {
    /// Create a checker over the host mount table.
    #[must_use]
    pub fn new(namespace: MountNamespace) -> Self {
        Self::with_table(Arc::new(SystemMountTable::new()), namespace)
    }

    /// Create a checker over a custom mount table.
    #[must_use]
    pub fn with_table(table: Arc<dyn MountTable>, namespace: MountNamespace) -> Self {
        Self { table, namespace }
    }

    /// The identifier namespace in use.
    #[must_use]
    pub const fn namespace(&self) -> &MountNamespace {
        &self.namespace
    }

    /// Mount path for an identifier.
    #[must_use]
    pub fn mount_path(&self, identifier: &str) -> PathBuf {
        self.namespace.mount_path(identifier)
    }

    /// Whether `path` exists and is an active mount point.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the OS cannot be queried. A missing path is
    /// reported as `Ok(false)`.
    pub fn is_mounted(&self, path: &Path) -> CryptvolResult<bool> {
        tracing::debug!(path = %path.display(), "Checking if path is mounted");

        if !path.try_exists()? {
            return Ok(false);
        }
        Ok(self.table.is_mount_point(path)?)
    }

    /// Whether the mount point for `identifier` is bound.
    ///
    /// # Errors
    ///
    /// See [`Self::is_mounted`].
    pub fn is_identifier_mounted(&self, identifier: &str) -> CryptvolResult<bool> {
        self.is_mounted(&self.mount_path(identifier))
    }

    /// Identifiers whose mount point is not currently bound.
    ///
    /// # Errors
    ///
    /// Propagates the first OS query failure.
    pub fn available_mount_identifiers(&self) -> CryptvolResult<BTreeSet<String>> {
        tracing::info!("Fetching available mount identifiers");

        let mut available = BTreeSet::new();
        for id in self.namespace.identifiers() {
            if !self.is_identifier_mounted(&id)? {
                available.insert(id);
            }
        }
        Ok(available)
    }
}

impl Default for VolumeStateChecker {
    fn default() -> Self {
        Self::new(MountNamespace::default())
    }
}

impl fmt::Debug for VolumeStateChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VolumeStateChecker")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io;

    struct FixedTable(HashSet<PathBuf>);

    impl MountTable for FixedTable {
        fn is_mount_point(&self, path: &Path) -> io::Result<bool> {
            Ok(self.0.contains(path))
        }
    }

    struct BrokenTable;

    impl MountTable for BrokenTable {
        fn is_mount_point(&self, _path: &Path) -> io::Result<bool> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "mount table"))
        }
    }

    fn checker_with(root: &Path, mounted: &[&str]) -> VolumeStateChecker {
        let ns = MountNamespace::under(root);
        let table = FixedTable(mounted.iter().map(|id| ns.mount_path(id)).collect());
        VolumeStateChecker::with_table(Arc::new(table), ns)
    }

    #[test]
    fn existing_directory_that_is_not_mounted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Z")).unwrap();
        let checker = checker_with(dir.path(), &[]);
        assert!(!checker.is_identifier_mounted("Z").unwrap());
    }

    #[test]
    fn mount_point_must_also_exist() {
        let dir = tempfile::tempdir().unwrap();
        // The table claims Z is mounted but the path is absent.
        let checker = checker_with(dir.path(), &["Z"]);
        assert!(!checker.is_identifier_mounted("Z").unwrap());

        std::fs::create_dir(dir.path().join("Z")).unwrap();
        assert!(checker.is_identifier_mounted("Z").unwrap());
    }

    #[test]
    fn available_excludes_mounted() {
        let dir = tempfile::tempdir().unwrap();
        for id in ["X", "Y"] {
            std::fs::create_dir(dir.path().join(id)).unwrap();
        }
        let checker = checker_with(dir.path(), &["X", "Y"]);

        let available = checker.available_mount_identifiers().unwrap();
        assert_eq!(available.len(), 24);
        assert!(!available.contains("X"));
        assert!(!available.contains("Y"));
        assert!(available.contains("Z"));
    }

    #[test]
    fn query_failures_propagate() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Z")).unwrap();
        let checker =
            VolumeStateChecker::with_table(Arc::new(BrokenTable), MountNamespace::under(dir.path()));

        let err = checker.is_identifier_mounted("Z").unwrap_err();
        assert!(matches!(err, cryptvol_common::CryptvolError::Io(_)));
    }
}
