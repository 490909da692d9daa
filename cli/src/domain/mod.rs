//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs` or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod host;
pub mod keys;
pub mod report;
pub mod validate;

pub use config::Settings;
pub use error::{ConfigError, HostError, KeyError};
pub use host::{
    HostCandidate, HostDetail, HostField, HostRecord, HostSummary, KeyRequest, PublicKeyStatus,
};
pub use keys::{FileRemoval, KeyFilePair, PairRemoval};
pub use report::{
    CreateReport, DeleteReport, OperationState, StepOutcome, SweepOutcome, SweepReport,
    TrustStoreRemoval,
};
