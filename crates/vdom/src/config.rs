use crate::diff::DiffStrategy;
use std::sync::Arc;

/// Renderer configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RendererConfig {
    /// Strategy used for every child-list reconciliation.
    pub diff_strategy: DiffStrategy,
    /// Drain the job queue before `render` returns.
    pub flush_on_render: bool,
    /// Upper bound on jobs run by one flush.
    pub max_flush_jobs: usize,
    /// Tag of the offscreen container a keep-alive parks inactive subtrees in.
    pub storage_tag: Arc<str>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            diff_strategy: DiffStrategy::default(),
            flush_on_render: true,
            max_flush_jobs: 10_000,
            storage_tag: Arc::from("div"),
        }
    }
}

impl RendererConfig {
    pub fn with_strategy(strategy: DiffStrategy) -> Self {
        Self {
            diff_strategy: strategy,
            ..Self::default()
        }
    }
}
