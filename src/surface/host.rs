//! Embedded surface abstraction.
//!
//! [`EmbeddedSurface`] models the one capability the injection layer needs
//! from the embedding browser engine: a document/frame-creation lifecycle
//! hook that accepts script text for early, per-document execution. A mock
//! implementation is provided for tests.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

/// Document/frame-creation hook of the embedding browser engine.
#[async_trait]
pub trait EmbeddedSurface: Send + Sync {
    /// Registers `script` for execution in every document context this
    /// surface creates from now on.
    ///
    /// Implementations MUST run the script strictly before any hosted-page
    /// script observes the global scope of the new document, in every new
    /// top-level context and frame. This ordering is correctness-critical:
    /// a document whose injection ran late, or not at all, is silently
    /// unprotected.
    async fn register_early_script(&self, script: &str) -> Result<()>;
}

/// One script execution inside a simulated document, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptRun {
    /// An early script registered through [`EmbeddedSurface`].
    Early(String),
    /// A hosted-page script.
    Page(String),
}

impl ScriptRun {
    /// Whether this run was an injected early script.
    pub fn is_early(&self) -> bool {
        matches!(self, ScriptRun::Early(_))
    }
}

/// In-memory surface for tests.
///
/// Simulates the engine's document lifecycle: every opened document first
/// executes all registered early scripts, then whatever page scripts the
/// test feeds it, and the exact order is recorded per document.
#[derive(Debug, Default)]
pub struct MockSurface {
    early_scripts: RwLock<Vec<String>>,
    documents: RwLock<HashMap<Uuid, Vec<ScriptRun>>>,
}

impl MockSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the engine creating a new document context.
    ///
    /// All early scripts registered so far run immediately, before any page
    /// script can be fed to the document.
    pub fn open_document(&self) -> Uuid {
        let id = Uuid::new_v4();
        let runs: Vec<ScriptRun> = self
            .early_scripts
            .read()
            .iter()
            .cloned()
            .map(ScriptRun::Early)
            .collect();

        self.documents.write().insert(id, runs);
        id
    }

    /// Simulates a hosted-page script executing in `document`.
    pub fn run_page_script(&self, document: Uuid, source: &str) {
        if let Some(runs) = self.documents.write().get_mut(&document) {
            runs.push(ScriptRun::Page(source.to_string()));
        }
    }

    /// Everything that ran in `document`, in execution order.
    pub fn runs(&self, document: Uuid) -> Vec<ScriptRun> {
        self.documents
            .read()
            .get(&document)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of early scripts currently registered.
    pub fn early_script_count(&self) -> usize {
        self.early_scripts.read().len()
    }
}

#[async_trait]
impl EmbeddedSurface for MockSurface {
    async fn register_early_script(&self, script: &str) -> Result<()> {
        self.early_scripts.write().push(script.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_early_scripts_run_before_page_scripts() {
        let surface = MockSurface::new();
        surface.register_early_script("early();").await.unwrap();

        let doc = surface.open_document();
        surface.run_page_script(doc, "page();");

        let runs = surface.runs(doc);
        assert_eq!(runs.len(), 2);
        assert!(runs[0].is_early());
        assert!(!runs[1].is_early());
    }

    #[tokio::test]
    async fn test_registration_only_affects_future_documents() {
        let surface = MockSurface::new();
        let before = surface.open_document();

        surface.register_early_script("early();").await.unwrap();
        let after = surface.open_document();

        assert!(surface.runs(before).is_empty());
        assert_eq!(surface.runs(after).len(), 1);
    }
}
