// ============================================================================
// File: packages/jobcomp/src/backends/factory.rs
// ----------------------------------------------------------------------------
// Backend registry resolving configured names to backend instances
// ============================================================================

use std::collections::HashMap;
use std::fmt;

use crate::backends::config::{JobCompConfig, normalize_backend_name};
use crate::backends::filetxt::FileTxtBackend;
use crate::backends::logger::LogBackend;
use crate::backends::trait_def::JobCompBackend;
use crate::error::{JobCompError, JobCompResult};

/// Constructor for one backend type
pub type BackendFactory =
    Box<dyn Fn(&JobCompConfig) -> JobCompResult<Box<dyn JobCompBackend>> + Send + Sync>;

/// Name-keyed registry of backend factories
///
/// A backend is only selectable once registered here; the trait bound on
/// the factory's output guarantees every contract method is present.
#[derive(Default)]
pub struct BackendRegistry {
    factories: HashMap<String, BackendFactory>,
}

impl BackendRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the bundled backends
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(FileTxtBackend::NAME, |config| {
            Ok(Box::new(FileTxtBackend::new(config)?))
        });
        registry.insert(LogBackend::NAME, |config| Ok(Box::new(LogBackend::new(config))));
        registry
    }

    /// Register a backend factory under a name
    ///
    /// # Arguments
    /// * `name` - Backend name, with or without the `jobcomp/` prefix
    /// * `factory` - Constructor invoked on every successful init
    ///
    /// # Returns
    /// Error if the name is empty, reserved or already taken
    pub fn register<N, F>(&mut self, name: N, factory: F) -> JobCompResult<()>
    where
        N: Into<String>,
        F: Fn(&JobCompConfig) -> JobCompResult<Box<dyn JobCompBackend>> + Send + Sync + 'static,
    {
        let name = name.into();
        let Some(key) = normalize_backend_name(&name).map(str::to_string) else {
            return Err(JobCompError::InvalidConfig {
                backend: name,
                details: "backend name must not be empty or 'none'".to_string(),
            });
        };

        if self.factories.contains_key(&key) {
            return Err(JobCompError::DuplicateBackend { name: key });
        }

        log::debug!("registered jobcomp backend {key}");
        self.insert(key, factory);
        Ok(())
    }

    fn insert<N, F>(&mut self, name: N, factory: F)
    where
        N: Into<String>,
        F: Fn(&JobCompConfig) -> JobCompResult<Box<dyn JobCompBackend>> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Create a backend instance by name
    ///
    /// # Returns
    /// Boxed backend or `UnknownBackend` if nothing is registered under `name`
    pub fn create(
        &self,
        name: &str,
        config: &JobCompConfig,
    ) -> JobCompResult<Box<dyn JobCompBackend>> {
        let factory = normalize_backend_name(name)
            .and_then(|key| self.factories.get(key))
            .ok_or_else(|| JobCompError::UnknownBackend {
                name: name.trim().to_string(),
                available: self.available_backends().join(", "),
            })?;
        factory(config)
    }

    /// Check whether a backend name is registered
    pub fn contains(&self, name: &str) -> bool {
        normalize_backend_name(name).is_some_and(|key| self.factories.contains_key(key))
    }

    /// Get all registered backend names, sorted
    pub fn available_backends(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("backends", &self.available_backends())
            .finish()
    }
}
