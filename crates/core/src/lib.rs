//! Domain layer for the vocabulary trainer.
//!
//! Pure logic only: no database or HTTP dependencies. The `db` crate
//! persists what this crate decides, and the `api` crate wires the
//! injectable collaborators (distractors, translation suggestions) in.

pub mod card;
pub mod distractors;
pub mod error;
pub mod grading;
pub mod mastery;
pub mod selection;
pub mod translation;
pub mod types;
pub mod vocab;
