//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::application::services::{CourseIndex, LoadReport};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding application settings and I/O dependencies.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    /// Course file from settings, already path-expanded.
    pub fn data_file(&self) -> PathBuf {
        self.settings.data_file.clone()
    }

    /// Create an empty course index bound to this container's filesystem.
    pub fn course_index(&self) -> CourseIndex {
        CourseIndex::new(Arc::clone(&self.fs))
    }

    /// Create a course index and load the configured course file into it.
    ///
    /// Balances after loading when `balance_on_load` is set.
    pub fn load_course_index(&self) -> ApplicationResult<(CourseIndex, LoadReport)> {
        let mut index = self.course_index();
        let report = index.load(&self.settings.data_file)?;
        if self.settings.balance_on_load && !index.is_balanced() {
            debug!("balance_on_load: rebalancing {} courses", index.count());
            index.balance();
        }
        Ok((index, report))
    }
}
