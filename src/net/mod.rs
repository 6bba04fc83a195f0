//! Network boundary to the remote identity service.
//!
//! DESIGN
//! ======
//! Every remote interaction goes through [`gateway::AuthGateway`]; wire
//! types live in [`types`] and mirror the service's JSON contract
//! (camelCase field names) exactly.

pub mod gateway;
pub mod types;
