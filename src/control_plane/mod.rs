//! Control-plane client
//!
//! Reads the legacy connector (status, config, offsets) and creates its
//! replacement. The [`ControlPlane`] trait is the seam the migration driver
//! talks to; [`CloudControlPlane`] implements it over the cloud REST API.
//!
//! Reads are retried with backoff on transient failures. Creation is the one
//! mutating call and is sent exactly once.

mod client;
mod types;

pub use client::{CloudControlPlane, ControlPlaneOptions, DEFAULT_BASE_URL};
pub use types::{ConnectorId, ConnectorStatus, OffsetReference};

use crate::config::ConnectorConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Operations the migration needs from the control plane
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Lifecycle state and full config of a connector
    ///
    /// Fails with `NotFound` when no connector has that name.
    async fn fetch_connector_status(&self, name: &str) -> Result<ConnectorStatus>;

    /// Last committed offsets of a connector
    async fn fetch_offsets(&self, name: &str) -> Result<OffsetReference>;

    /// Create a connector resuming from `offsets`
    ///
    /// Fails with `Validation` when the config is rejected and `Conflict`
    /// when the name is taken.
    async fn create_connector(
        &self,
        name: &str,
        config: &ConnectorConfig,
        offsets: &OffsetReference,
    ) -> Result<ConnectorId>;
}
