//! Action helpers for chatwhisk bots.
//!
//! A bot action receives `{config, payload}` and does its work by invoking
//! other actions in the same package:
//!
//! - [`ConfigStore`]: configuration values, falling back to the datastore
//! - [`ContextStore`]: persist and load the user's conversation context
//! - [`Datastore`]: document create/read/update/delete
//! - [`RemoteLogger`]: leveled logging through the `logger` action
//! - [`Sender`]: emit an intent through `core-output`
//! - [`ConversationBridge`]: hand the turn to a conversation service
//!
//! [`Helpers`] wires them all over one invoker and one shared turn payload.

pub mod client;
pub mod config_store;
pub mod context;
pub mod datastore;
pub mod helpers;
pub mod logger;
pub mod openwhisk;
pub mod params;
pub mod scripted;
pub mod send;
pub mod wcs;

use chatwhisk_core::Payload;
use std::sync::Arc;

/// The turn payload shared between helpers of one invocation.
pub type SharedPayload = Arc<tokio::sync::RwLock<Payload>>;

pub use client::ActionClient;
pub use config_store::ConfigStore;
pub use context::ContextStore;
pub use datastore::{Datastore, DeleteTarget, ReadTarget};
pub use helpers::Helpers;
pub use logger::{LogMessage, LogOutcome, RemoteLogger};
pub use openwhisk::OpenWhiskInvoker;
pub use params::ActionParams;
pub use scripted::ScriptedInvoker;
pub use send::Sender;
pub use wcs::ConversationBridge;
