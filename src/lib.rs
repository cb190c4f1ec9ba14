pub mod artifact;
pub mod chain;
pub mod cli;
pub mod commands;
pub mod compiler;
pub mod confirmation;
pub mod consts;
pub mod deployer;
pub mod settings;
pub mod setup;
pub mod sources;
pub mod verifier;

pub use self::settings::Settings;
pub use artifact::{Artifact, ArtifactStore};
pub use commands::run;
