use super::foraging::ForagingSimulation;
use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, EngineResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::info;

/// Explicit surface-id → engine map.
///
/// Each drawing surface owns one engine instance. Lookups for a surface
/// that was never initialized fail with `NotInitialized` instead of
/// creating state on the fly.
#[derive(Debug)]
pub struct EngineRegistry<E> {
    engines: RwLock<HashMap<String, E>>,
}

impl<E> Default for EngineRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EngineRegistry<E> {
    pub fn new() -> Self {
        EngineRegistry {
            engines: RwLock::new(HashMap::new()),
        }
    }

    /// Bind `engine` to `surface`, returning the instance it replaced.
    pub fn initialize(&self, surface: impl Into<String>, engine: E) -> Option<E> {
        let surface = surface.into();
        let previous = self.engines.write().insert(surface.clone(), engine);
        info!(
            "📋 [Registry] Surface '{}' {}",
            surface,
            if previous.is_some() { "re-initialized" } else { "initialized" }
        );
        previous
    }

    pub fn with_engine<R>(&self, surface: &str, f: impl FnOnce(&E) -> R) -> EngineResult<R> {
        let engines = self.engines.read();
        let engine = engines
            .get(surface)
            .ok_or(EngineError::NotInitialized("simulation surface"))?;
        Ok(f(engine))
    }

    pub fn with_engine_mut<R>(
        &self,
        surface: &str,
        f: impl FnOnce(&mut E) -> R,
    ) -> EngineResult<R> {
        let mut engines = self.engines.write();
        let engine = engines
            .get_mut(surface)
            .ok_or(EngineError::NotInitialized("simulation surface"))?;
        Ok(f(engine))
    }

    pub fn remove(&self, surface: &str) -> Option<E> {
        let removed = self.engines.write().remove(surface);
        if removed.is_some() {
            info!("🗑️ [Registry] Surface '{}' released", surface);
        }
        removed
    }

    pub fn contains(&self, surface: &str) -> bool {
        self.engines.read().contains_key(surface)
    }

    pub fn len(&self) -> usize {
        self.engines.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.read().is_empty()
    }

    pub fn surfaces(&self) -> Vec<String> {
        self.engines.read().keys().cloned().collect()
    }
}

pub type ForagingRegistry = EngineRegistry<ForagingSimulation>;

impl EngineRegistry<ForagingSimulation> {
    /// Create a fresh simulation for `surface` from `config`.
    pub fn initialize_simulation(&self, surface: &str, config: &EngineConfig) -> EngineResult<()> {
        let simulation = ForagingSimulation::new(config)?;
        self.initialize(surface, simulation);
        Ok(())
    }
}
