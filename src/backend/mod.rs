//! Catalog search backends
//!
//! The search bar talks to the catalog through [`SearchBackend`]; the
//! production implementation speaks GraphQL over HTTP.

mod client;
mod graphql;
#[cfg(test)]
pub(crate) mod testing;
mod traits;

pub use client::{GraphQlClient, GraphQlOperation};
pub use graphql::GraphQlBackend;
pub use traits::SearchBackend;
