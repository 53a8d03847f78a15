//! # chatwhisk Core
//!
//! Domain types, traits, and error definitions shared by the chatwhisk
//! helper crates. Serverless bot actions thread one [`Payload`] through a
//! conversation turn; every helper either inspects it or hands it to another
//! action through the [`ActionInvoker`] seam.
//!
//! ## Design Philosophy
//!
//! The remote call is a trait defined here. Implementations live in
//! `chatwhisk-actions`. This enables:
//! - Swapping the transport (OpenWhisk REST, scripted replies) without
//!   touching the helpers
//! - Testing every helper with a recorded, scripted invoker
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod invoke;
pub mod payload;
pub mod response;
pub mod stage;
pub mod violation;

// Re-export key types at crate root for ergonomics
pub use error::{ActionError, Error, Result, ValidationError};
pub use invoke::{ActionInvoker, InvokeRequest, InvokeResponse};
pub use payload::{Payload, linkage_field_for};
pub use response::{ErrorBody, ErrorResponse, default_error_handler};
pub use stage::Stage;
pub use violation::{Rule, Violation};
