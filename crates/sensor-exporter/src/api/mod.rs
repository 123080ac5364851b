//! HTTP exposition of sensor metrics
//!
//! # API Endpoints
//!
//! - `GET /metrics` - Take a fresh reading and return it in the configured format
//! - `GET /healthz` - Liveness probe, never touches the sensor
//!
//! Every `/metrics` request triggers exactly one sensor transaction per
//! registered collector. When a collector fails, the configured
//! [`FailurePolicy`] decides what the scraper sees.

use std::sync::Arc;

use crate::metrics::encoders::MetricsEncoder;
use crate::registry::MetricsRegistry;

pub mod errors;
pub mod handlers;
pub mod server;

pub use errors::ApiError;
pub use server::ApiServer;

/// What a scrape returns when a collector fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, derive_more::Display)]
pub enum FailurePolicy {
    /// Answer 503 with the failure reason
    #[default]
    #[display("fail")]
    Fail,
    /// Answer 200 without the failing collector's series
    #[display("degrade")]
    Degrade,
}

/// Shared state of the scrape endpoint
pub struct ScrapeContext {
    pub registry: MetricsRegistry,
    pub encoder: Box<dyn MetricsEncoder>,
    pub policy: FailurePolicy,
}

impl ScrapeContext {
    pub fn new(
        registry: MetricsRegistry,
        encoder: Box<dyn MetricsEncoder>,
        policy: FailurePolicy,
    ) -> Arc<Self> {
        Arc::new(Self {
            registry,
            encoder,
            policy,
        })
    }
}
