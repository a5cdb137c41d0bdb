//! The alarm engine and its transition rules.

pub mod security;
pub mod transitions;

pub use security::{SecurityService, SecurityServiceBuilder};
pub use transitions::GateRejection;
