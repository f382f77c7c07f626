//! Authentication module for service wiring and the pluggable capability traits

pub mod factory;
pub mod traits;

pub use factory::{AuthenticationServiceFactory, AuthenticationServices, FactoryError};
pub use traits::{CredentialsChecker, SessionService};
