//! Volume state checking.
//!
//! This module answers two questions against live OS state:
//! - Is a mount point currently bound?
//! - Which mount identifiers are still free?

mod namespace;
mod state;
mod table;

pub use namespace::MountNamespace;
pub use state::VolumeStateChecker;
pub use table::{MountTable, SystemMountTable};
