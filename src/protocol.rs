//! Public DTOs for the HTTP endpoints (serde ready).
//! Keep this small and stable so assessment UIs can evolve independently.

use serde::{Deserialize, Serialize};

use crate::domain::{AnswerSet, AssessmentResult, Catalog, ChoiceOption, QuestionKind};

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub service: &'static str,
}

/// Catalog as rendered by an assessment UI: categories in display order,
/// each with its questions nested.
#[derive(Serialize)]
pub struct CatalogOut {
    pub categories: Vec<CategoryOut>,
}

#[derive(Serialize)]
pub struct CategoryOut {
    pub id: String,
    pub name: String,
    pub weight: f64,
    pub description: String,
    pub questions: Vec<QuestionOut>,
}

#[derive(Serialize)]
pub struct QuestionOut {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub text: String,
    pub options: Vec<ChoiceOption>,
    #[serde(rename = "maxScore")]
    pub max_score: f64,
}

/// Group the flat catalog by category for delivery.
pub fn catalog_to_out(catalog: &Catalog) -> CatalogOut {
    let mut ordered: Vec<_> = catalog.categories.iter().collect();
    ordered.sort_by_key(|c| c.display_order);
    CatalogOut {
        categories: ordered
            .into_iter()
            .map(|c| CategoryOut {
                id: c.id.clone(),
                name: c.name.clone(),
                weight: c.weight,
                description: c.description.clone(),
                questions: catalog
                    .questions
                    .iter()
                    .filter(|q| q.category_id == c.id)
                    .map(|q| QuestionOut {
                        id: q.id.clone(),
                        kind: q.kind,
                        text: q.text.clone(),
                        options: q.options.clone(),
                        max_score: q.max_score(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

#[derive(Deserialize)]
pub struct SubmitIn {
    /// question id -> selected value (string) or values (array of strings).
    pub answers: AnswerSet,
}

#[derive(Serialize)]
pub struct SubmitOut {
    pub success: bool,
    #[serde(rename = "assessmentId")]
    pub assessment_id: String,
    #[serde(flatten)]
    pub result: AssessmentResult,
}

#[derive(Debug, Deserialize)]
pub struct ResultQuery {
    #[serde(rename = "assessmentId")]
    pub assessment_id: String,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Answer;
    use crate::seeds::seed_catalog;

    #[test]
    fn submit_in_accepts_mixed_answer_shapes() {
        let body = r#"{"answers": {"fin_01": "less_than_60", "cs_01": ["gots", "sedex"]}}"#;
        let parsed: SubmitIn = serde_json::from_str(body).unwrap();
        assert!(matches!(parsed.answers.get("fin_01"), Some(Answer::Single(v)) if v == "less_than_60"));
        assert!(matches!(parsed.answers.get("cs_01"), Some(Answer::Multi(vs)) if vs.len() == 2));
    }

    #[test]
    fn catalog_out_groups_questions_by_category() {
        let out = catalog_to_out(&seed_catalog());
        assert_eq!(out.categories.len(), 6);
        assert_eq!(out.categories[0].id, "financial_health");
        assert!(out.categories.iter().all(|c| !c.questions.is_empty()));
    }

    #[test]
    fn tier_serializes_with_display_names() {
        use crate::domain::Tier;
        assert_eq!(serde_json::to_string(&Tier::WorldClass).unwrap(), "\"World Class\"");
        assert_eq!(serde_json::to_string(&Tier::IndustryLeader).unwrap(), "\"Industry Leader\"");
        assert_eq!(serde_json::to_string(&Tier::Emerging).unwrap(), "\"Emerging\"");
    }
}
