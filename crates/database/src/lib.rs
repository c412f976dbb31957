pub mod cache;
pub mod db_connect;
pub mod service;

use surrealdb::{Surreal, engine::any::Any};

pub use cache::{ConnectionCache, Connector};
pub use db_connect::{DbCredentials, SurrealConnector};

/// Session handle shared by every repository once the cache resolves it
pub type DbHandle = Surreal<Any>;

/// The process-wide store connection, created on first use
pub type Database = ConnectionCache<SurrealConnector>;
