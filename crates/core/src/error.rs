//! Error types for traffic sources.

use thiserror::Error;

/// Errors starting a traffic source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// `start` was called before the source was configured.
    #[error("Traffic source {source_name} started before it was configured")]
    NotConfigured { source_name: String },

    /// `start` was called on a source that already started.
    #[error("Traffic source {source_name} already started")]
    AlreadyStarted { source_name: String },

    /// `start` was called on a source that was already stopped.
    #[error("Traffic source {source_name} was stopped")]
    Stopped { source_name: String },

    /// The application layer installed no client applications.
    #[error("Traffic source {source_name} has no client applications to schedule")]
    NoApplications { source_name: String },
}
