#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod config;
pub mod dialog;
pub mod error;
pub mod handoff;
pub mod intake;
pub mod llm;
pub mod narrative;
pub mod orchestrator;
pub mod prompts;
pub mod sanitize;

pub use config::Config;
pub use error::{AiselfError, Result};
pub use orchestrator::{OptimisticHandoff, Orchestrator, SessionReport};
