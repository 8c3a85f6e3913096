//! Domain models: catalog reference data (categories, questions, options,
//! action templates) and the derived scoring result types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A weighted grouping of related questions (a "pillar" in report copy).
/// `weight` is advisory metadata (nominally sums to 100 across the catalog);
/// scoring itself is unweighted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Category {
  pub id: String,
  pub name: String,
  #[serde(default)] pub weight: f64,
  #[serde(default)] pub display_order: u32,
  #[serde(default)] pub description: String,
}

/// How a question is answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
  SingleChoice,
  MultipleChoice,
}

/// One selectable option. `value` is unique within its question; the value
/// "none" marks the sentinel option on multiple_choice questions ("none of
/// the above") and is excluded from the max-score denominator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChoiceOption {
  pub value: String,
  pub label: String,
  pub score: f64,
}

impl ChoiceOption {
  pub fn is_none_sentinel(&self) -> bool {
    self.value == "none"
  }
}

/// Immutable catalog question. `max_score` may be stored by the catalog
/// source; when absent it is derived from the options (see `max_score()`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
  pub id: String,
  pub category_id: String,
  #[serde(rename = "type")]
  pub kind: QuestionKind,
  #[serde(default)] pub text: String,
  pub options: Vec<ChoiceOption>,
  #[serde(default)] pub max_score: Option<f64>,
}

impl Question {
  /// Best-achievable score for this question.
  /// single_choice: the highest option score (the top option is full marks).
  /// multiple_choice: sum of all option scores excluding the "none" sentinel.
  /// A stored `max_score` wins over the derived value.
  pub fn max_score(&self) -> f64 {
    if let Some(m) = self.max_score {
      return m;
    }
    match self.kind {
      QuestionKind::SingleChoice => self.options.iter().map(|o| o.score).fold(0.0, f64::max),
      QuestionKind::MultipleChoice => self
        .options
        .iter()
        .filter(|o| !o.is_none_sentinel())
        .map(|o| o.score)
        .sum(),
    }
  }

  /// True if any option can award points; used to detect malformed catalogs
  /// where a stored max of 0 contradicts the options.
  pub fn has_positive_option(&self) -> bool {
    self.options.iter().any(|o| o.score > 0.0)
  }
}

/// A submitted answer: one value for single_choice, a set of values for
/// multiple_choice. Deserialized untagged so the wire format stays a plain
/// JSON object of string-or-array values.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
  Single(String),
  Multi(Vec<String>),
}

/// Raw submission payload: question id -> selection.
pub type AnswerSet = HashMap<String, Answer>;

/// Static per-category recommendation template. Priority is an attribute of
/// the category's action plan, not derived from the score.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionTemplate {
  pub category_id: String,
  pub priority: Priority,
  pub action: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
  High,
  Medium,
}

/// The full reference data bundle the engine scores against.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
  pub categories: Vec<Category>,
  pub questions: Vec<Question>,
  pub actions: Vec<ActionTemplate>,
}

/// Letter grade, co-derived with `Tier` from the overall percentage band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
  A,
  B,
  C,
  D,
  F,
}

/// Human-readable performance label for the same band as the grade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
  #[serde(rename = "World Class")]
  WorldClass,
  #[serde(rename = "Industry Leader")]
  IndustryLeader,
  Competitive,
  Developing,
  Emerging,
}

/// Per-category derived score. `percentage` is rounded to 2 decimals and
/// defined as 0 when `max_possible` is 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
  pub category_id: String,
  pub name: String,
  pub raw_score: f64,
  pub max_possible: f64,
  pub percentage: f64,
}

/// Narrative summary: one fixed overall line per tier, plus category lists.
/// Categories scoring in [60, 75) land in neither list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Insights {
  pub overall: String,
  pub strengths: Vec<String>,
  pub improvement_areas: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
  pub category: String,
  pub priority: Priority,
  pub action: String,
}

/// The scored report. Created once per submission, immutable thereafter;
/// persistence and rendering belong to the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
  pub total_score: f64,
  pub max_possible: f64,
  pub percentage: f64,
  pub grade: Grade,
  pub tier: Tier,
  /// Ordered by catalog display order.
  pub category_scores: Vec<CategoryScore>,
  pub insights: Insights,
  pub recommendations: Vec<Recommendation>,
  /// Questions in the catalog with no answer in the submission.
  pub unanswered: usize,
}
