//! Service layer for the admin client.
//!
//! - Remote data access (`RemoteGateway`, `HttpGateway`)

mod gateway;

#[cfg(test)]
pub(crate) mod testing;

pub use gateway::{API_PREFIX, HttpGateway, RemoteGateway};
