pub mod generator;

pub use generator::{LetterPair, NarrativeGenerator};
