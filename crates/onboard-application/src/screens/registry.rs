//! Step -> screen mapping.

use std::collections::HashMap;
use std::sync::Arc;

use onboard_core::step::{StepCatalog, StepId};

use super::{
    AutoConversionScreen, CompleteScreen, ContinueScreen, EkycHandlerScreen, KycChoiceScreen,
    Screen, WelcomeScreen,
};

/// Registry of the screen hosting each step.
#[derive(Default, Clone)]
pub struct ScreenRegistry {
    screens: HashMap<StepId, Arc<dyn Screen>>,
}

impl ScreenRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in demo screens; every other catalog step gets a plain
    /// continue screen.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for step in StepCatalog::all() {
            registry.register(step.id, Arc::new(ContinueScreen));
        }
        registry
            .register(StepId::Welcome, Arc::new(WelcomeScreen))
            .register(StepId::KycChoice, Arc::new(KycChoiceScreen))
            .register(StepId::EkycHandler, Arc::new(EkycHandlerScreen))
            .register(StepId::AutoConversion, Arc::new(AutoConversionScreen))
            .register(StepId::Complete, Arc::new(CompleteScreen));
        registry
    }

    /// Registers (or replaces) the screen for `step`.
    pub fn register(&mut self, step: StepId, screen: Arc<dyn Screen>) -> &mut Self {
        self.screens.insert(step, screen);
        self
    }

    /// The screen for `step`; a missing screen is logged as a routing error.
    pub fn get(&self, step: StepId) -> Option<Arc<dyn Screen>> {
        let screen = self.screens.get(&step).cloned();
        if screen.is_none() {
            tracing::error!(%step, "[Screen] No screen registered for step");
        }
        screen
    }

    pub fn contains(&self, step: StepId) -> bool {
        self.screens.contains_key(&step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_catalog() {
        let registry = ScreenRegistry::builtin();
        for step in StepCatalog::all() {
            assert!(registry.contains(step.id), "missing screen for {}", step.id);
        }
    }

    #[test]
    fn test_empty_registry_has_no_screens() {
        let registry = ScreenRegistry::new();
        assert!(registry.get(StepId::Welcome).is_none());
    }
}
