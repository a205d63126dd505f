//! Shared types, errors, and configuration for LoomLedger.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - The explicit request context (branch, user, role) and permission model
//! - Application-wide error types
//! - Configuration management
//! - Tracing bootstrap for binaries

pub mod config;
pub mod context;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
pub use context::{Permission, RequestContext, Role};
pub use error::{AppError, AppResult};
