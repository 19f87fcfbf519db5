//! Origin services and the transport that reaches them.

mod clients;
mod connector;
mod error;
pub mod rpc;

#[cfg(test)]
pub(crate) mod mock;

pub use clients::{DiClient, DiService, OriginClient, RecoClient, RecoService};
pub use connector::{Connector, FromConnection, TcpConnector};
pub use error::OriginError;

/// Service names used in logs.
pub const RECO_SERVICE_NAME: &str = "reco";
pub const DI_SERVICE_NAME: &str = "di";
