//! Injection Controller
//!
//! Bridges the spoofing engine to the embedded surface: validates the active
//! profile, compiles it exactly once, registers the compiled text with the
//! surface's document lifecycle hook, and owns the per-document state map.

use std::collections::HashMap;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::spoof::{ProfileDefinition, ScriptSynthesizer, ScriptText, SpoofError};
use crate::surface::document::DocumentState;
use crate::surface::host::EmbeddedSurface;

/// Delivers the compiled override script to every new document context and
/// tracks per-document state.
///
/// The compiled script is produced once at construction; per-document state
/// is created fresh on [`document_created`](Self::document_created) and
/// dropped on [`document_closed`](Self::document_closed) — nothing crosses a
/// document boundary.
#[derive(Debug)]
pub struct InjectionController {
    profile_id: String,
    script: ScriptText,
    documents: RwLock<HashMap<Uuid, DocumentState>>,
}

impl InjectionController {
    /// Validates `profile` and compiles its override script.
    ///
    /// # Errors
    ///
    /// Returns [`SpoofError::InconsistentProfile`] if the profile violates
    /// the family consistency invariant.
    pub fn new(profile: &ProfileDefinition) -> Result<Self, SpoofError> {
        profile.validate()?;
        let script = ScriptSynthesizer::compile(profile);

        info!(
            profile = %profile.id,
            script_bytes = script.as_str().len(),
            "compiled identity override script"
        );

        Ok(Self {
            profile_id: profile.id.clone(),
            script,
            documents: RwLock::new(HashMap::new()),
        })
    }

    /// Id of the profile this controller was compiled from.
    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    /// The compiled override script.
    pub fn script(&self) -> &ScriptText {
        &self.script
    }

    /// Registers the compiled script with `surface` so it executes before
    /// hosted content in every document the surface creates from now on.
    pub async fn attach(&self, surface: &dyn EmbeddedSurface) -> Result<()> {
        surface
            .register_early_script(self.script.as_str())
            .await
            .context("failed to register early override script")?;

        info!(profile = %self.profile_id, "override script registered with surface");
        Ok(())
    }

    /// Records a newly created document context and returns its id.
    ///
    /// The document starts with fresh flags; state is never carried over
    /// from a previous document.
    pub fn document_created(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.documents.write().insert(id, DocumentState::new());

        debug!(document = %id, "document context created");
        id
    }

    /// Drops all state for a closed document context.
    pub fn document_closed(&self, id: Uuid) {
        if self.documents.write().remove(&id).is_some() {
            debug!(document = %id, "document context discarded");
        }
    }

    /// Runs `f` against the state of one document, if it is still alive.
    pub fn with_document<R>(&self, id: Uuid, f: impl FnOnce(&mut DocumentState) -> R) -> Option<R> {
        self.documents.write().get_mut(&id).map(f)
    }

    /// Number of live document contexts.
    pub fn document_count(&self) -> usize {
        self.documents.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::host::MockSurface;

    #[test]
    fn test_inconsistent_profile_is_rejected() {
        let mut profile = ProfileDefinition::firefox_desktop();
        profile.has_runtime_bridge = true;

        assert!(InjectionController::new(&profile).is_err());
    }

    #[test]
    fn test_script_is_compiled_once() {
        let profile = ProfileDefinition::firefox_desktop();
        let controller = InjectionController::new(&profile).unwrap();

        let direct = ScriptSynthesizer::compile(&profile);
        assert_eq!(controller.script(), &direct);
        assert_eq!(controller.profile_id(), "firefox-desktop");
    }

    #[tokio::test]
    async fn test_attach_registers_compiled_script() {
        let controller =
            InjectionController::new(&ProfileDefinition::firefox_desktop()).unwrap();
        let surface = MockSurface::new();

        controller.attach(&surface).await.unwrap();

        assert_eq!(surface.early_script_count(), 1);
        let doc = surface.open_document();
        let runs = surface.runs(doc);
        assert_eq!(runs.len(), 1);
        assert!(runs[0].is_early());
    }

    #[test]
    fn test_document_state_is_per_document() {
        let controller =
            InjectionController::new(&ProfileDefinition::firefox_desktop()).unwrap();

        let first = controller.document_created();
        let second = controller.document_created();

        assert_eq!(
            controller.with_document(first, |s| s.mark_applied()),
            Some(true)
        );
        assert_eq!(
            controller.with_document(first, |s| s.mark_applied()),
            Some(false)
        );
        // A fresh document still gets a first application.
        assert_eq!(
            controller.with_document(second, |s| s.mark_applied()),
            Some(true)
        );

        controller.with_document(first, |s| s.modifier_down());
        assert_eq!(
            controller.with_document(second, |s| s.modifier_held()),
            Some(false)
        );

        controller.document_closed(first);
        assert_eq!(controller.document_count(), 1);
        assert!(controller.with_document(first, |s| s.is_applied()).is_none());
    }
}
