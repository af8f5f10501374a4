//! Typed client for the gateward access-control admin API.
//!
//! This crate wraps the REST backend of the domain/URL access-gating service:
//! it authenticates a session, then manages Users, Groups, and access Rules
//! through typed resource stores.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Users / Groups / Rules   (resource stores)  │
//! └───────────────────┬──────────────────────────┘
//!                     │
//!          ┌──────────▼───────────┐
//!          │  Client::dispatch    │  single authenticated choke point
//!          │  (status → error)    │
//!          └──────────┬───────────┘
//!                     │ reads credential / persists refresh
//!          ┌──────────▼───────────┐
//!          │      Session         │  shared credential state
//!          └──────────────────────┘
//! ```
//!
//! Every backend call goes through [`Client`]'s request path, which refuses to
//! send anything while unauthenticated, attaches the session credential, and
//! maps response statuses onto [`ClientError`]. The stores add two behaviors on
//! top of plain proxying: concurrent membership hydration and membership
//! reconciliation (minimal attach/detach set between current and desired
//! members).
//!
//! # Example
//!
//! ```no_run
//! use gateward_client::{Client, Config, NewGroup};
//!
//! # async fn example() -> Result<(), gateward_client::ClientError> {
//! let client = Client::new(Config::new("http://localhost:8080/"));
//!
//! client.login("admin", "b109f3bbbc244eb8...").await?;
//!
//! let group = client.groups().create(&NewGroup { name: "staff".into() }).await?;
//! let members = client.groups().members_of(group.id).await?;
//! println!("{} has {} members", group.name, members.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod config;
pub mod error;
pub mod groups;
pub mod models;
pub mod rules;
pub mod session;
pub mod users;

pub use client::Client;
pub use config::{Config, CredentialScheme};
pub use error::{ClientError, Result};
pub use groups::Groups;
pub use models::{
    DomainRule, Group, GroupUpdate, NewDomainRule, NewGroup, NewUrlRule, NewUser, UrlRule, User,
    UserUpdate,
};
pub use rules::Rules;
pub use session::Session;
pub use users::Users;

pub use gateward_core::{GroupId, RuleId, UserId};
