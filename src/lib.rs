// ABOUTME: Public library API for publishing notes to Wiki.js
// ABOUTME: Re-exports core modules for the CLI and integration tests

pub mod cli;
pub mod document;
pub mod error;
pub mod graphql;
pub mod model;
pub mod publish;
pub mod report;
pub mod settings;
pub mod wiki;

pub use error::{Error, Result};
pub use model::{Document, RemotePage};
pub use publish::{PublishOutcome, Publisher};
pub use settings::Settings;
