//! # loginapp
//!
//! Client library and CLI for the LoginApp identity service.
//!
//! The library owns the client-side session/token lifecycle: [`net::gateway::AuthGateway`]
//! is the single HTTP boundary to the remote service, and
//! [`session::store::SessionStore`] holds the process-wide session state it
//! reconciles. Caller-side form validation lives in [`forms`]; the `loginapp`
//! binary wires each command to exactly one gateway operation.

pub mod forms;
pub mod net;
pub mod session;
