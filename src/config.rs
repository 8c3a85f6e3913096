//! Loading a catalog (categories + questions + action templates) from TOML.
//!
//! Used when no remote store is configured, or as an operator override.
//! Expected schema: `[[categories]]`, `[[questions]]` (with nested
//! `[[questions.options]]`), `[[actions]]`.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{ActionTemplate, Catalog, Category, Question};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct CatalogConfig {
  #[serde(default)]
  pub categories: Vec<Category>,
  #[serde(default)]
  pub questions: Vec<Question>,
  #[serde(default)]
  pub actions: Vec<ActionTemplate>,
}

impl CatalogConfig {
  pub fn into_catalog(self) -> Catalog {
    Catalog {
      categories: self.categories,
      questions: self.questions,
      actions: self.actions,
    }
  }
}

/// Attempt to load a catalog from CATALOG_CONFIG_PATH. On any parsing/IO
/// error, returns None; callers fall back to the next catalog source.
pub fn load_catalog_from_env() -> Option<Catalog> {
  let path = std::env::var("CATALOG_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<CatalogConfig>(&s) {
      Ok(cfg) => {
        info!(
          target: "datrix_backend",
          %path,
          categories = cfg.categories.len(),
          questions = cfg.questions.len(),
          "Loaded catalog config (TOML)"
        );
        Some(cfg.into_catalog())
      }
      Err(e) => {
        error!(target: "datrix_backend", %path, error = %e, "Failed to parse TOML catalog");
        None
      }
    },
    Err(e) => {
      error!(target: "datrix_backend", %path, error = %e, "Failed to read TOML catalog file");
      None
    }
  }
}
