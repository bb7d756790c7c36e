//! Runtime settings for the streaming pipeline.

use log::warn;
use serde::Deserialize;

use crate::error::WorldError;

/// Tunable world-streaming parameters.
///
/// Loaded once at startup, either from the compiled-in defaults or a JSON
/// settings document, and read-only afterwards.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    /// Radius in chunks around the observer that must be meshed and shown.
    #[serde(default = "default_view_distance")]
    pub view_distance: i32,
    /// Radius in chunks within which deactivated chunks stay resident for
    /// cheap reactivation. Clamped to at least `view_distance`.
    #[serde(default = "default_load_distance")]
    pub load_distance: i32,
    /// Run the pipeline stages on dedicated worker threads. When false, all
    /// stages run inline on the game loop's cadence.
    #[serde(default = "default_enable_threading")]
    pub enable_threading: bool,
    /// Maximum queued edits applied to one chunk per scheduling quantum.
    /// This is backpressure, not concurrency: a chunk with more pending
    /// edits is requeued rather than monopolizing its worker.
    #[serde(default = "default_edit_budget")]
    pub edit_budget: usize,
    /// Upper bound on dormant chunks retained for reactivation; the least
    /// recently deactivated chunk beyond it is destroyed.
    #[serde(default = "default_retained_chunk_cap")]
    pub retained_chunk_cap: usize,
}

fn default_view_distance() -> i32 {
    5
}

fn default_load_distance() -> i32 {
    7
}

fn default_enable_threading() -> bool {
    true
}

fn default_edit_budget() -> usize {
    64
}

fn default_retained_chunk_cap() -> usize {
    512
}

impl Settings {
    /// Loads settings from a JSON document, normalizing invalid radii.
    ///
    /// # Errors
    /// [`WorldError::Config`] if the document does not parse.
    pub fn from_json(text: &str) -> Result<Self, WorldError> {
        let mut settings: Settings = serde_json::from_str(text)?;
        if settings.load_distance < settings.view_distance {
            warn!(
                "load_distance {} below view_distance {}, clamping",
                settings.load_distance, settings.view_distance
            );
            settings.load_distance = settings.view_distance;
        }
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            view_distance: default_view_distance(),
            load_distance: default_load_distance(),
            enable_threading: default_enable_threading(),
            edit_budget: default_edit_budget(),
            retained_chunk_cap: default_retained_chunk_cap(),
        }
    }
}
