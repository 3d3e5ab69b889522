//! Embedded Surface Integration
//!
//! This module owns the boundary to the embedded browser engine: the
//! [`EmbeddedSurface`] lifecycle hook that accepts early per-document script
//! text, the [`InjectionController`] that guarantees the compiled override
//! script reaches every new document before hosted content runs, and the
//! per-document [`DocumentState`] flags.
//!
//! # Ordering Contract
//!
//! The single ordering contract in the system: for every document/frame
//! context the surface creates, the registered script executes strictly
//! before any hosted-page script observes the global scope. Late or skipped
//! injection is a silent total failure of spoofing for that document, so
//! surface implementations must treat the contract as correctness-critical,
//! not best-effort.

pub mod document;
pub mod host;
pub mod injection;

// Re-export commonly used types for convenience
pub use document::DocumentState;
pub use host::{EmbeddedSurface, MockSurface, ScriptRun};
pub use injection::InjectionController;
