//! Pure Rust async client for Valve's [A2S server query protocol](https://developer.valvesoftware.com/wiki/Server_queries).
//!
//! [`A2SQuery`] connects one UDP socket to a running Source or GoldSource
//! game server and exposes the three query round-trips the protocol
//! defines: [`info`](query::A2SQuery::info),
//! [`players`](query::A2SQuery::players) and
//! [`rules`](query::A2SQuery::rules). Challenge handshakes are answered
//! automatically.
//!
//! ```no_run
//! use a2squery::{A2SQuery, ServerInfo, DEFAULT_PORT};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), a2squery::SourceQueryError> {
//!     let mut query = A2SQuery::connect("203.0.113.7", DEFAULT_PORT, None).await?;
//!
//!     match query.info().await? {
//!         ServerInfo::Source(info) => println!("{} is playing {}", info.name, info.map),
//!         ServerInfo::GoldSource(info) => println!("{} is playing {}", info.name, info.map),
//!     }
//!
//!     query.close();
//!     Ok(())
//! }
//! ```
//!
//! Multi-packet (split) responses are out of scope and rejected, as are
//! the master-server and RCON protocols.
pub mod error;
pub mod info;
pub mod packet;
pub mod player;
pub mod query;
mod cursor;
mod rules;

pub use error::SourceQueryError;
pub use info::{Environment, GoldSourceInfo, ServerInfo, ServerType, SourceInfo};
pub use player::Player;
pub use query::{A2SQuery, DEFAULT_PORT, DEFAULT_TIMEOUT};
