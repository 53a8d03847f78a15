//! Payload validation for chatwhisk bot actions.
//!
//! A turn payload is checked before it moves on to the next pipeline stage:
//!
//! | Stage | Checks |
//! |---|---|
//! | `INPUT` | `id`, `input.channel`, `input.user`, `input.message` |
//! | `MIDDLEWARE` | all of `INPUT`, then `conversationcontext.user._id`, `conversationcontext.user.<input.channel>_id`, optional `messagecontext` object |
//! | `OUTPUT` | `id`, `conversationcontext.user._id`, `conversationcontext.user.<output.channel>_id`, `output.channel/user/intent` and the optional output fields |
//! | `STORE` | `id`, `conversationcontext.user._id` |
//!
//! ```
//! use chatwhisk_core::Payload;
//! use chatwhisk_validate::validate_payload;
//!
//! let payload = Payload::new(serde_json::json!({
//!     "id": "abcd",
//!     "input": { "channel": "facebook", "user": "user", "message": "foo" },
//!     "conversationcontext": { "user": { "_id": "12345", "facebook_id": "12345678" } }
//! }));
//! assert!(validate_payload(&payload, "MIDDLEWARE").is_ok());
//! ```

pub mod helper;
pub mod shape;
pub mod stage;

pub use helper::{validate, validate_then};
pub use shape::{Fields, ObjectShape, Validator};
pub use stage::{stage_validator, validate_payload, validate_stage};
