pub mod provider;

pub use provider::{CredentialProvider, EnvCredential, StaticToken};
