use serde::{Deserialize, Serialize};

/// Credentials presented by a client to start a session
///
/// Both fields are required for a verification attempt; a missing field is
/// rejected before any verifier is consulted. Unrecognized fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Opaque identity assertion produced by the client
    pub assertion: Option<String>,
    /// The relying party the assertion was issued for, e.g. a service origin
    pub audience: Option<String>,
}

impl Credentials {
    #[must_use]
    pub fn new(assertion: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            assertion: Some(assertion.into()),
            audience: Some(audience.into()),
        }
    }
}

/// An `(appid, userid)` pair established by verification or by a valid token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    pub appid: String,
    pub userid: String,
}

impl VerifiedIdentity {
    #[must_use]
    pub fn new(appid: impl Into<String>, userid: impl Into<String>) -> Self {
        Self {
            appid: appid.into(),
            userid: userid.into(),
        }
    }
}
