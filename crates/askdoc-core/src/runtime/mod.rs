//! Inference runtime supervision

pub mod supervisor;

pub use supervisor::{ModelInvoker, ModelState, ModelSupervisor};
