//! Application state: the resolved catalog, the in-memory result store, and
//! the optional remote datastore client.
//!
//! The catalog is resolved once at startup and held immutably for the
//! process lifetime; the scoring engine itself never performs I/O. Catalog
//! source order: remote store, then TOML config, then built-in seeds.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::load_catalog_from_env;
use crate::domain::{AnswerSet, AssessmentResult, Catalog};
use crate::scoring::{self, InvalidCatalog};
use crate::seeds::seed_catalog;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub results: Arc<RwLock<HashMap<String, AssessmentResult>>>,
    pub store: Option<Store>,
}

impl AppState {
    /// Resolve the catalog, build the remote client, start with empty stores.
    #[instrument(level = "info", skip_all)]
    pub async fn init() -> Self {
        let store = Store::from_env();
        if let Some(s) = &store {
            info!(target: "datrix_backend", base_url = %s.base_url, "Remote store enabled.");
        } else {
            info!(target: "datrix_backend", "Remote store disabled (no STORE_BASE_URL). Using local catalog sources.");
        }

        let catalog = resolve_catalog(store.as_ref()).await;

        // Inventory summary by category.
        for c in &catalog.categories {
            let n = catalog
                .questions
                .iter()
                .filter(|q| q.category_id == c.id)
                .count();
            info!(target: "datrix_backend", category = %c.id, weight = c.weight, questions = n, "Startup catalog inventory");
        }
        let weight_total: f64 = catalog.categories.iter().map(|c| c.weight).sum();
        if !weights_sum_to_100(weight_total) {
            warn!(target: "datrix_backend", weight_total, "Category weights do not sum to 100");
        }

        Self {
            catalog: Arc::new(catalog),
            results: Arc::new(RwLock::new(HashMap::new())),
            store,
        }
    }

    /// Score a submission, keep the result in memory, and push it to the
    /// remote store best-effort. Returns the new assessment id + result.
    #[instrument(level = "info", skip(self, answers), fields(answer_count = answers.len()))]
    pub async fn submit(
        &self,
        answers: &AnswerSet,
    ) -> Result<(String, AssessmentResult), InvalidCatalog> {
        let result = scoring::score(&self.catalog, answers)?;
        let id = Uuid::new_v4().to_string();

        self.results.write().await.insert(id.clone(), result.clone());
        info!(target: "scoring", assessment_id = %id, pct = result.percentage, grade = ?result.grade, unanswered = result.unanswered, "Assessment scored and stored");

        if let Some(store) = &self.store {
            if let Err(e) = store.save_assessment(&id, &result).await {
                error!(target: "datrix_backend", assessment_id = %id, error = %e, "Failed to persist assessment to remote store; result kept in memory");
            }
        }

        Ok((id, result))
    }

    /// Read-only access to a stored result by id.
    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_result(&self, id: &str) -> Option<AssessmentResult> {
        let results = self.results.read().await;
        results.get(id).cloned()
    }
}

/// Try catalog sources in order; any invalid or empty candidate logs and
/// falls through. The built-in seeds are the guaranteed floor.
async fn resolve_catalog(store: Option<&Store>) -> Catalog {
    if let Some(s) = store {
        match fetch_remote_catalog(s).await {
            Ok(catalog) => match validate(&catalog) {
                Ok(()) => {
                    info!(target: "datrix_backend", source = "remote_store", "Catalog resolved");
                    return catalog;
                }
                Err(e) => {
                    error!(target: "datrix_backend", error = %e, "Remote catalog failed validation; falling back")
                }
            },
            Err(e) => {
                error!(target: "datrix_backend", error = %e, "Remote catalog fetch failed; falling back")
            }
        }
    }

    if let Some(catalog) = load_catalog_from_env() {
        match validate(&catalog) {
            Ok(()) => {
                info!(target: "datrix_backend", source = "toml_config", "Catalog resolved");
                return catalog;
            }
            Err(e) => {
                error!(target: "datrix_backend", error = %e, "TOML catalog failed validation; falling back")
            }
        }
    }

    info!(target: "datrix_backend", source = "seeds", "Catalog resolved");
    seed_catalog()
}

async fn fetch_remote_catalog(store: &Store) -> Result<Catalog, String> {
    let categories = store.fetch_categories().await?;
    let questions = store.fetch_questions().await?;
    // Action templates are optional in the store; missing table just means
    // no recommendations.
    let actions = match store.fetch_actions().await {
        Ok(a) => a,
        Err(e) => {
            warn!(target: "datrix_backend", error = %e, "No action templates from store");
            vec![]
        }
    };
    if categories.is_empty() || questions.is_empty() {
        return Err("remote catalog is empty".into());
    }
    Ok(Catalog { categories, questions, actions })
}

/// Weights are advisory; fractional configs accumulate float error, so the
/// startup check tolerates a small epsilon instead of exact equality.
fn weights_sum_to_100(total: f64) -> bool {
    (total - 100.0).abs() < 1e-6
}

/// Startup referential-integrity check: every question must point at a known
/// category. Deeper checks (zero max scores) surface per-submission as
/// `InvalidCatalog` from the engine.
fn validate(catalog: &Catalog) -> Result<(), String> {
    if catalog.categories.is_empty() {
        return Err("catalog has no categories".into());
    }
    if catalog.questions.is_empty() {
        return Err("catalog has no questions".into());
    }
    for q in &catalog.questions {
        if !catalog.categories.iter().any(|c| c.id == q.category_id) {
            return Err(format!(
                "question '{}' references unknown category '{}'",
                q.id, q.category_id
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Answer;

    #[tokio::test]
    async fn submit_then_get_round_trip() {
        let state = AppState {
            catalog: Arc::new(seed_catalog()),
            results: Arc::new(RwLock::new(HashMap::new())),
            store: None,
        };
        let answers = AnswerSet::from([
            ("fin_01".to_string(), Answer::Single("less_than_60".into())),
        ]);
        let (id, result) = state.submit(&answers).await.unwrap();
        let stored = state.get_result(&id).await.unwrap();
        assert_eq!(stored, result);
        assert!(state.get_result("nope").await.is_none());
    }

    #[test]
    fn weight_check_tolerates_float_accumulation() {
        // e.g. 12 categories at 100.0/12 each.
        let total: f64 = (0..12).map(|_| 100.0f64 / 12.0).sum();
        assert!(weights_sum_to_100(total));
        assert!(weights_sum_to_100(100.0));
        assert!(!weights_sum_to_100(99.5));
    }

    #[test]
    fn validate_rejects_orphaned_question() {
        let mut catalog = seed_catalog();
        catalog.questions[0].category_id = "missing".into();
        assert!(validate(&catalog).is_err());
        assert!(validate(&seed_catalog()).is_ok());
    }
}
