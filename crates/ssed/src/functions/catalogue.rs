//! Name-to-constructor registry used to build the dispatch table.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::features::FeatureStore;
use super::predict::{PREDICT_FUNCTION, PredictHandler};
use super::{FunctionHandler, HandlerDeps};

type HandlerFactory = Box<dyn Fn(&HandlerDeps) -> Arc<dyn FunctionHandler> + Send + Sync>;

/// Maps manifest function names (case-insensitively) to handler
/// constructors.
pub struct HandlerCatalogue {
    factories: HashMap<String, HandlerFactory>,
}

impl HandlerCatalogue {
    /// A catalogue with no handlers.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// The handlers this plugin ships.
    #[must_use]
    pub fn standard() -> Self {
        Self::empty().register(PREDICT_FUNCTION, predict_handler)
    }

    /// Adds or replaces the constructor for `name`.
    #[must_use]
    pub fn register<F>(mut self, name: &str, factory: F) -> Self
    where
        F: Fn(&HandlerDeps) -> Arc<dyn FunctionHandler> + Send + Sync + 'static,
    {
        self.factories
            .insert(name.to_ascii_lowercase(), Box::new(factory));
        self
    }

    /// Constructs the handler registered for `name`.
    #[must_use]
    pub fn construct(&self, name: &str, deps: &HandlerDeps) -> Option<Arc<dyn FunctionHandler>> {
        self.factories
            .get(&name.to_ascii_lowercase())
            .map(|factory| factory(deps))
    }

    /// Returns `true` when `name` has a constructor.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&name.to_ascii_lowercase())
    }
}

impl fmt::Debug for HandlerCatalogue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("HandlerCatalogue")
            .field("functions", &names)
            .finish()
    }
}

fn predict_handler(deps: &HandlerDeps) -> Arc<dyn FunctionHandler> {
    Arc::new(PredictHandler::new(
        Arc::clone(&deps.backend),
        FeatureStore::new(deps.feature_dir.clone()),
    ))
}
