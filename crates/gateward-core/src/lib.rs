//! Core types for gateward.
//!
//! This crate provides the strongly-typed identifiers shared by the gateward
//! client and CLI:
//!
//! - **Identifiers**: `UserId`, `GroupId`, and `RuleId` newtypes over the
//!   backend's integer primary keys
//!
//! # Example
//!
//! ```
//! use gateward_core::{GroupId, UserId};
//!
//! // Parse a user ID from its decimal representation
//! let user_id: UserId = "42".parse().unwrap();
//!
//! // Construct a group ID directly
//! let group_id = GroupId::new(7);
//!
//! assert_eq!(user_id.get(), 42);
//! assert_eq!(group_id.to_string(), "7");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ids;

pub use ids::{GroupId, IdError, RuleId, UserId};
