//! Lobbyist - arcade account plugin core for chat bots.
//!
//! Implements the storage- and API-facing half of an arcade lookup bot:
//! binding game-account handles to chat users, screening player names
//! through an external profanity classifier, and projecting lobby/profile
//! feeds into display-ready values. Command parsing, prompting and message
//! rendering belong to the embedding bot, which calls into this crate with
//! already-parsed arguments and branches on [`ErrorKind`].
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - MongoDB integration, store traits, in-memory store
//! - `cache` - In-process caching with Moka
//! - `handles` - Account-handle registry (bind/list/switch/unbind)
//! - `classify` - Cache-aside name classification with failure policy
//! - `arcade` - Arcade API client and wire types
//! - `feed` - Lobby/profile feed projections with name redaction

pub mod arcade;
pub mod cache;
pub mod classify;
pub mod config;
pub mod database;
pub mod error;
pub mod feed;
pub mod handles;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
