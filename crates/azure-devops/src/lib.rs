//! Azure DevOps infrastructure adapter for the PR template rollout.
//!
//! Implements the [`rollout::RepositoryHost`] port against the Azure DevOps
//! Git REST API using [`reqwest`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules.
//! URL construction, authentication, status-code interpretation and JSON wire
//! shapes are handled here; the [`rollout`] and `workflow` crates never see
//! them.
//!
//! ## Status handling
//!
//! | Call | Accepted | Everything else |
//! |------|----------|-----------------|
//! | list repositories, refs, push, pull request | 2xx | [`rollout::HostError::UnexpectedStatus`] |
//! | template existence | 2xx (exists), 404 (absent) | [`rollout::HostError::UnexpectedStatus`] |
//!
//! Nothing is retried and the list endpoints are not paginated.

mod client;
mod models;

pub use client::{AzureDevOpsClient, ClientError};
