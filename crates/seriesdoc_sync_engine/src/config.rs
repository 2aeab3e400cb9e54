//! Configuration for the sync engine.

use seriesdoc_core::{MergeLabel, OutputModes};
use seriesdoc_sync_protocol::IndexSettings;

/// Prefix of every destination index name.
pub const INDEX_PREFIX: &str = "d_";

/// Returns the destination index for a project, e.g. `d_kubernetes`.
pub fn index_name(project: &str) -> String {
    format!("{}{}", INDEX_PREFIX, project)
}

/// What to do when deletes fail for a reason other than "not found".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteFailurePolicy {
    /// Fail the call.
    #[default]
    Fatal,
    /// Resubmit the failed deletes once, then fail if any still fail.
    RetryOnce,
}

/// Configuration for sync operations.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Project identifier; selects the destination index.
    pub project: String,
    /// Document shapes to emit.
    pub modes: OutputModes,
    /// Shared type base for field-bearing documents, if merging.
    pub merge: Option<MergeLabel>,
    /// Diagnostic verbosity. Above zero, points and item failures are logged.
    pub debug: u8,
    /// Handling of non-not-found delete failures.
    pub delete_policy: DeleteFailurePolicy,
    /// Settings used when the destination index is created.
    pub index_settings: IndexSettings,
}

impl SyncConfig {
    /// Creates a configuration for a project with no output modes enabled.
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            modes: OutputModes::none(),
            merge: None,
            debug: 0,
            delete_policy: DeleteFailurePolicy::Fatal,
            index_settings: IndexSettings::standard(),
        }
    }

    /// Sets the output modes.
    pub fn with_modes(mut self, modes: OutputModes) -> Self {
        self.modes = modes;
        self
    }

    /// Enables merge mode under the given label.
    pub fn with_merge(mut self, label: MergeLabel) -> Self {
        self.merge = Some(label);
        self
    }

    /// Sets the diagnostic verbosity.
    pub fn with_debug(mut self, level: u8) -> Self {
        self.debug = level;
        self
    }

    /// Sets the delete failure policy.
    pub fn with_delete_policy(mut self, policy: DeleteFailurePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    /// Overrides the index creation settings.
    pub fn with_index_settings(mut self, settings: IndexSettings) -> Self {
        self.index_settings = settings;
        self
    }

    /// Destination index for this configuration.
    pub fn index_name(&self) -> String {
        index_name(&self.project)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_config_builder() {
        let config = SyncConfig::new("kubernetes")
            .with_modes(OutputModes::none().with_wide(true))
            .with_merge(MergeLabel::new("all").unwrap())
            .with_debug(2)
            .with_delete_policy(DeleteFailurePolicy::RetryOnce);

        assert_eq!(config.index_name(), "d_kubernetes");
        assert!(config.modes.wide);
        assert_eq!(config.merge.as_ref().unwrap().as_str(), "all");
        assert_eq!(config.debug, 2);
        assert_eq!(config.delete_policy, DeleteFailurePolicy::RetryOnce);
        assert_eq!(config.index_settings, IndexSettings::standard());
    }

    #[test]
    fn defaults() {
        let config = SyncConfig::new("p");
        assert!(config.modes.is_empty());
        assert!(config.merge.is_none());
        assert_eq!(config.delete_policy, DeleteFailurePolicy::Fatal);
    }
}
