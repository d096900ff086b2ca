//! Typed modeling settings.
//!
//! Named fields instead of a stringly get/set-by-key store; the host loads
//! and saves this struct however it persists configuration.

use serde::{Deserialize, Serialize};

/// Default tolerance for welding coincident vertices.
pub const DEFAULT_WELD_TOLERANCE: f32 = crate::math::COMPARE_EPSILON;

/// Kernel-relevant editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelingSettings {
    /// Tolerance for grouping coincident vertices into shared groups.
    pub weld_tolerance: f32,
    /// Whether the renderer supports geometry-shader expansion; selects the
    /// handle-builder strategy.
    pub geometry_shaders: bool,
}

impl Default for ModelingSettings {
    fn default() -> Self {
        Self {
            weld_tolerance: DEFAULT_WELD_TOLERANCE,
            geometry_shaders: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ModelingSettings::default();
        assert_eq!(settings.weld_tolerance, DEFAULT_WELD_TOLERANCE);
        assert!(settings.geometry_shaders);
    }
}
