// Shared helpers
pub mod crypto;
