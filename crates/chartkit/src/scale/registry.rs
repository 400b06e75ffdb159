use chartkit_core::alloc::HashMap;

use crate::config::{ScaleConfig, ScaleOptions};
use crate::scale::Scale;
use crate::types::{AxisPosition, ScaleKind};

/// Per-kind scale defaults, owned by a chart.
///
/// Every chart starts with the built-in defaults; changing them through
/// [`ScaleRegistry::update_defaults`] only affects that chart.
#[derive(Debug, Clone)]
pub struct ScaleRegistry {
    defaults: HashMap<ScaleKind, ScaleConfig>,
}

impl Default for ScaleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ScaleRegistry {
    /// Registry with the built-in kinds.
    pub fn new() -> Self {
        let mut registry = Self {
            defaults: HashMap::default(),
        };
        registry.register(
            ScaleKind::Category,
            ScaleConfig::new().position(AxisPosition::Bottom),
        );
        registry.register(ScaleKind::Linear, ScaleConfig::new().position(AxisPosition::Left));
        registry.register(
            ScaleKind::Logarithmic,
            ScaleConfig::new().position(AxisPosition::Left),
        );
        registry.register(
            ScaleKind::RadialLinear,
            ScaleConfig::new().position(AxisPosition::ChartArea),
        );
        registry
    }

    /// Set the defaults of `kind`, replacing earlier ones.
    pub fn register(&mut self, kind: ScaleKind, defaults: ScaleConfig) {
        tracing::debug!(?kind, "registering scale defaults");
        self.defaults.insert(kind, defaults);
    }

    /// Merge `patch` over the current defaults of `kind`.
    pub fn update_defaults(&mut self, kind: ScaleKind, patch: &ScaleConfig) {
        let merged = self
            .defaults
            .get(&kind)
            .map(|current| current.merged(patch))
            .unwrap_or_else(|| patch.clone());
        self.defaults.insert(kind, merged);
    }

    pub fn defaults(&self, kind: ScaleKind) -> Option<&ScaleConfig> {
        self.defaults.get(&kind)
    }

    pub fn is_registered(&self, kind: ScaleKind) -> bool {
        self.defaults.contains_key(&kind)
    }

    /// Construct a scale for resolved options.
    pub fn create(&self, options: ScaleOptions) -> Scale {
        Scale::new(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AxisId;

    #[test]
    fn test_builtin_positions() {
        let registry = ScaleRegistry::new();
        assert_eq!(
            registry.defaults(ScaleKind::Category).and_then(|d| d.position),
            Some(AxisPosition::Bottom)
        );
        assert_eq!(
            registry.defaults(ScaleKind::Logarithmic).and_then(|d| d.position),
            Some(AxisPosition::Left)
        );
    }

    #[test]
    fn test_update_defaults_merges() {
        let mut registry = ScaleRegistry::new();
        registry.update_defaults(ScaleKind::Linear, &ScaleConfig::new().begin_at_zero(true));
        let defaults = registry.defaults(ScaleKind::Linear).unwrap();
        assert_eq!(defaults.position, Some(AxisPosition::Left));
        assert_eq!(defaults.ticks.begin_at_zero, Some(true));

        // Other charts keep their own registry.
        let fresh = ScaleRegistry::new();
        assert_eq!(fresh.defaults(ScaleKind::Linear).unwrap().ticks.begin_at_zero, None);
    }

    #[test]
    fn test_create_picks_variant() {
        let registry = ScaleRegistry::new();
        let scale = registry.create(ScaleOptions::new(ScaleKind::Logarithmic, AxisId::Y_PRIMARY));
        assert!(matches!(scale, Scale::Logarithmic(_)));
        assert_eq!(scale.id(), AxisId::Y_PRIMARY);
    }
}
