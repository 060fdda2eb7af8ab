use ladle_index::IndexManifest;
use ladle_llm::RecipeAdvisor;

use crate::retriever::Retriever;

/// Shared state handed to every API handler.
pub struct AppState {
    pub retriever: Retriever,
    pub advisor: RecipeAdvisor,
    /// Manifest of the loaded index, kept for health and stats reporting.
    pub manifest: IndexManifest,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("manifest", &self.manifest)
            .finish_non_exhaustive()
    }
}
