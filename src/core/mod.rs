//! Core data model shared by the selector, the script renderer and the
//! orchestrator.

pub mod filter;
pub mod workspace;
