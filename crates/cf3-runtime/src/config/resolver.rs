//! Configuration resolver trait for layered overrides.
//!
//! ```text
//! ConfigLoader.load()  →  Cf3Config (base)
//!                              │
//!                              ▼
//!                     ConfigResolver.apply()
//!                              │
//!                              ▼
//!                     Cf3Config (final)
//! ```

use super::Cf3Config;

/// Applies overrides on top of a loaded configuration.
///
/// Only values the resolver actually carries should be applied;
/// everything else keeps its loaded value.
pub trait ConfigResolver {
    fn apply(&self, config: &mut Cf3Config);
}

/// Resolver that changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpResolver;

impl ConfigResolver for NoOpResolver {
    fn apply(&self, _config: &mut Cf3Config) {}
}
