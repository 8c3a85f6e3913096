//! The assessment scoring engine.
//!
//! Pure transformation: (catalog, answers) -> scored report. No I/O, no
//! shared state; callers fetch the catalog and persist the result at the
//! boundary. Two submissions with identical inputs produce identical output.
//!
//! Policy notes:
//!   - Unanswered questions contribute 0 but still count their max toward
//!     the denominator, so incomplete submissions score lower.
//!   - Unknown question ids and unknown option values degrade gracefully
//!     (logged, never fatal) so stale client state or catalog drift cannot
//!     fail a whole submission.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{
  Answer, AnswerSet, AssessmentResult, Catalog, Category, CategoryScore, Grade, Insights,
  Question, QuestionKind, Recommendation, Tier,
};
use crate::util::percentage;

/// Category percentage at or above which a category counts as a strength.
const STRENGTH_THRESHOLD: f64 = 75.0;
/// Category percentage below which a category is flagged for improvement.
/// Categories in [60, 75) land in neither insight list.
const IMPROVEMENT_THRESHOLD: f64 = 60.0;
/// Category percentage below which the category's action template fires.
const ACTION_THRESHOLD: f64 = 70.0;
/// Recommendations are cut at this many entries, in catalog display order.
const MAX_RECOMMENDATIONS: usize = 5;

/// Malformed reference data. Operator-facing: correctly seeded catalogs
/// never trigger these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidCatalog {
  #[error("question '{question_id}' references unknown category '{category_id}'")]
  UnknownCategory {
    question_id: String,
    category_id: String,
  },
  #[error("category '{category_id}' has zero max score but questions with positive-score options")]
  ZeroMaxCategory { category_id: String },
}

/// Score a submission against the catalog.
///
/// Categories in the output follow the catalog's display order. An empty
/// answer set is not an error: it scores 0% everywhere and is reported via
/// `unanswered` (and a warning log) for caller-side feedback.
pub fn score(catalog: &Catalog, answers: &AnswerSet) -> Result<AssessmentResult, InvalidCatalog> {
  if answers.is_empty() {
    warn!(target: "scoring", questions = catalog.questions.len(), "Empty answer set; scoring proceeds at 0%");
  }

  let ordered = ordered_categories(&catalog.categories);
  let known: HashSet<&str> = ordered.iter().map(|c| c.id.as_str()).collect();

  let mut raw: HashMap<&str, f64> = HashMap::new();
  let mut max: HashMap<&str, f64> = HashMap::new();
  let mut positive: HashSet<&str> = HashSet::new();
  let mut unanswered = 0usize;

  for q in &catalog.questions {
    if !known.contains(q.category_id.as_str()) {
      return Err(InvalidCatalog::UnknownCategory {
        question_id: q.id.clone(),
        category_id: q.category_id.clone(),
      });
    }
    let answer = answers.get(&q.id);
    if answer.is_none() {
      unanswered += 1;
    }
    let awarded = answer.map(|a| question_score(q, a)).unwrap_or(0.0);
    *raw.entry(q.category_id.as_str()).or_default() += awarded;
    // Unanswered questions still count against the denominator.
    *max.entry(q.category_id.as_str()).or_default() += q.max_score();
    if q.has_positive_option() {
      positive.insert(q.category_id.as_str());
    }
  }

  for qid in answers.keys() {
    if !catalog.questions.iter().any(|q| &q.id == qid) {
      warn!(target: "scoring", question_id = %qid, "Ignoring answer for unknown question id");
    }
  }

  let mut category_scores = Vec::with_capacity(ordered.len());
  let mut total_score = 0.0;
  let mut max_possible = 0.0;
  for c in &ordered {
    let r = raw.get(c.id.as_str()).copied().unwrap_or(0.0);
    let m = max.get(c.id.as_str()).copied().unwrap_or(0.0);
    if m == 0.0 && positive.contains(c.id.as_str()) {
      return Err(InvalidCatalog::ZeroMaxCategory {
        category_id: c.id.clone(),
      });
    }
    total_score += r;
    max_possible += m;
    category_scores.push(CategoryScore {
      category_id: c.id.clone(),
      name: c.name.clone(),
      raw_score: r,
      max_possible: m,
      percentage: percentage(r, m),
    });
  }

  let overall = percentage(total_score, max_possible);
  let (grade, tier) = grade_tier(overall);
  let insights = build_insights(&category_scores, tier);
  let recommendations = build_recommendations(catalog, &category_scores);

  debug!(target: "scoring", total = total_score, max = max_possible, pct = overall, ?grade, ?tier, unanswered, "Submission scored");

  Ok(AssessmentResult {
    total_score,
    max_possible,
    percentage: overall,
    grade,
    tier,
    category_scores,
    insights,
    recommendations,
    unanswered,
  })
}

/// Points awarded for one question given its submitted answer.
fn question_score(q: &Question, answer: &Answer) -> f64 {
  match (q.kind, answer) {
    (QuestionKind::SingleChoice, Answer::Single(v)) => {
      match q.options.iter().find(|o| &o.value == v) {
        Some(o) => o.score,
        None => {
          debug!(target: "scoring", question_id = %q.id, value = %v, "Unknown option value; scoring 0");
          0.0
        }
      }
    }
    (QuestionKind::SingleChoice, Answer::Multi(_)) => {
      warn!(target: "scoring", question_id = %q.id, "Multi-value answer on single_choice question; scoring 0");
      0.0
    }
    (QuestionKind::MultipleChoice, a) => {
      let selected: HashSet<&str> = match a {
        Answer::Single(v) => HashSet::from([v.as_str()]),
        // HashSet collapses duplicate selections so each value counts once.
        Answer::Multi(vs) => vs.iter().map(String::as_str).collect(),
      };
      q.options
        .iter()
        .filter(|o| selected.contains(o.value.as_str()))
        .map(|o| o.score)
        .sum()
    }
  }
}

/// Band the overall percentage into grade + tier. Lower bounds are
/// inclusive; the highest qualifying band wins.
pub fn grade_tier(pct: f64) -> (Grade, Tier) {
  if pct >= 85.0 {
    (Grade::A, Tier::WorldClass)
  } else if pct >= 75.0 {
    (Grade::B, Tier::IndustryLeader)
  } else if pct >= 65.0 {
    (Grade::C, Tier::Competitive)
  } else if pct >= 50.0 {
    (Grade::D, Tier::Developing)
  } else {
    (Grade::F, Tier::Emerging)
  }
}

/// Fixed overall narrative, one per tier.
fn overall_narrative(tier: Tier) -> &'static str {
  match tier {
    Tier::WorldClass => {
      "Exceptional performance! Your organization demonstrates world-class capabilities across multiple dimensions."
    }
    Tier::IndustryLeader => {
      "Strong performance! You are among the industry leaders with solid operational excellence."
    }
    Tier::Competitive => {
      "Competitive positioning with good fundamentals. Focus on targeted improvements for leadership position."
    }
    Tier::Developing => {
      "Developing capabilities with significant growth potential. Strategic improvements needed."
    }
    Tier::Emerging => {
      "Emerging stage with substantial improvement opportunities. Immediate action recommended."
    }
  }
}

fn build_insights(category_scores: &[CategoryScore], tier: Tier) -> Insights {
  let mut strengths = Vec::new();
  let mut improvement_areas = Vec::new();
  for cs in category_scores {
    if cs.percentage >= STRENGTH_THRESHOLD {
      strengths.push(format!("{}: {:.1}% - Strong capability", cs.name, cs.percentage));
    } else if cs.percentage < IMPROVEMENT_THRESHOLD {
      improvement_areas.push(format!("{}: {:.1}% - Needs attention", cs.name, cs.percentage));
    }
  }
  Insights {
    overall: overall_narrative(tier).to_string(),
    strengths,
    improvement_areas,
  }
}

/// One recommendation per under-threshold category that has an action
/// template, in catalog display order, capped. The cap is a plain cut, not
/// a ranking; catalog order keeps it deterministic.
fn build_recommendations(catalog: &Catalog, category_scores: &[CategoryScore]) -> Vec<Recommendation> {
  let mut out = Vec::new();
  for cs in category_scores {
    if cs.percentage >= ACTION_THRESHOLD {
      continue;
    }
    if let Some(tpl) = catalog.actions.iter().find(|a| a.category_id == cs.category_id) {
      out.push(Recommendation {
        category: cs.name.clone(),
        priority: tpl.priority,
        action: tpl.action.clone(),
      });
      if out.len() == MAX_RECOMMENDATIONS {
        break;
      }
    }
  }
  out
}

/// Categories sorted by display order (stable on catalog order for ties).
fn ordered_categories(categories: &[Category]) -> Vec<&Category> {
  let mut ordered: Vec<&Category> = categories.iter().collect();
  ordered.sort_by_key(|c| c.display_order);
  ordered
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{ActionTemplate, ChoiceOption, Priority};

  fn cat(id: &str, name: &str, order: u32) -> Category {
    Category {
      id: id.into(),
      name: name.into(),
      weight: 0.0,
      display_order: order,
      description: String::new(),
    }
  }

  fn opt(value: &str, score: f64) -> ChoiceOption {
    ChoiceOption {
      value: value.into(),
      label: value.into(),
      score,
    }
  }

  fn q_single(id: &str, cid: &str, scores: &[f64]) -> Question {
    Question {
      id: id.into(),
      category_id: cid.into(),
      kind: QuestionKind::SingleChoice,
      text: String::new(),
      options: scores
        .iter()
        .enumerate()
        .map(|(i, s)| opt(&format!("o{i}"), *s))
        .collect(),
      max_score: None,
    }
  }

  fn q_multi(id: &str, cid: &str, scores: &[f64], with_none: bool) -> Question {
    let mut options: Vec<ChoiceOption> = scores
      .iter()
      .enumerate()
      .map(|(i, s)| opt(&format!("o{i}"), *s))
      .collect();
    if with_none {
      options.push(opt("none", 0.0));
    }
    Question {
      id: id.into(),
      category_id: cid.into(),
      kind: QuestionKind::MultipleChoice,
      text: String::new(),
      options,
      max_score: None,
    }
  }

  fn single(v: &str) -> Answer {
    Answer::Single(v.into())
  }

  fn multi(vs: &[&str]) -> Answer {
    Answer::Multi(vs.iter().map(|s| s.to_string()).collect())
  }

  fn financial_catalog() -> Catalog {
    // One category, two single_choice questions scored 0/2/4/5.
    Catalog {
      categories: vec![cat("fin", "Financial Health", 1)],
      questions: vec![
        q_single("q1", "fin", &[0.0, 2.0, 4.0, 5.0]),
        q_single("q2", "fin", &[0.0, 2.0, 4.0, 5.0]),
      ],
      actions: vec![ActionTemplate {
        category_id: "fin".into(),
        priority: Priority::High,
        action: "Implement robust financial tracking systems".into(),
      }],
    }
  }

  #[test]
  fn top_option_plus_unanswered_is_half_marks() {
    let catalog = financial_catalog();
    let answers = AnswerSet::from([("q1".into(), single("o3"))]);
    let res = score(&catalog, &answers).unwrap();
    let cs = &res.category_scores[0];
    assert_eq!(cs.raw_score, 5.0);
    assert_eq!(cs.max_possible, 10.0);
    assert_eq!(cs.percentage, 50.0);
    assert_eq!(res.unanswered, 1);
    assert_eq!(res.grade, Grade::D);
    assert_eq!(res.tier, Tier::Developing);
  }

  #[test]
  fn conservation_of_totals() {
    let catalog = Catalog {
      categories: vec![cat("a", "A", 1), cat("b", "B", 2)],
      questions: vec![
        q_single("q1", "a", &[0.0, 5.0]),
        q_multi("q2", "b", &[1.0, 1.0, 1.0], true),
        q_single("q3", "b", &[0.0, 2.0, 4.0]),
      ],
      actions: vec![],
    };
    let answers = AnswerSet::from([
      ("q1".into(), single("o1")),
      ("q2".into(), multi(&["o0", "o2"])),
      ("q3".into(), single("o2")),
    ]);
    let res = score(&catalog, &answers).unwrap();
    let raw_sum: f64 = res.category_scores.iter().map(|c| c.raw_score).sum();
    let max_sum: f64 = res.category_scores.iter().map(|c| c.max_possible).sum();
    assert_eq!(raw_sum, res.total_score);
    assert_eq!(max_sum, res.max_possible);
    assert_eq!(res.total_score, 11.0);
    assert_eq!(res.max_possible, 12.0);
  }

  #[test]
  fn empty_answer_set_scores_zero_everywhere() {
    let catalog = financial_catalog();
    let res = score(&catalog, &AnswerSet::new()).unwrap();
    assert_eq!(res.percentage, 0.0);
    assert_eq!(res.grade, Grade::F);
    assert_eq!(res.tier, Tier::Emerging);
    assert_eq!(res.unanswered, 2);
    assert!(res.category_scores.iter().all(|c| c.percentage == 0.0));
    // 0% is below the action threshold, so the configured action fires.
    assert_eq!(res.recommendations.len(), 1);
    assert_eq!(res.recommendations[0].priority, Priority::High);
  }

  #[test]
  fn unknown_question_id_ignored() {
    let catalog = financial_catalog();
    let answers = AnswerSet::from([
      ("q1".into(), single("o3")),
      ("ghost".into(), single("o0")),
    ]);
    let res = score(&catalog, &answers).unwrap();
    assert_eq!(res.total_score, 5.0);
  }

  #[test]
  fn unknown_option_value_scores_zero() {
    let catalog = financial_catalog();
    let answers = AnswerSet::from([
      ("q1".into(), single("not_an_option")),
      ("q2".into(), single("o3")),
    ]);
    let res = score(&catalog, &answers).unwrap();
    assert_eq!(res.total_score, 5.0);
    assert_eq!(res.max_possible, 10.0);
  }

  #[test]
  fn multi_choice_sums_selected_excluding_none_from_max() {
    // Options scored [1,1,1,1,1] plus a "none" sentinel; 3 selections.
    let catalog = Catalog {
      categories: vec![cat("cs", "Compliance", 1)],
      questions: vec![q_multi("q1", "cs", &[1.0, 1.0, 1.0, 1.0, 1.0], true)],
      actions: vec![],
    };
    let answers = AnswerSet::from([("q1".into(), multi(&["o0", "o2", "o4"]))]);
    let res = score(&catalog, &answers).unwrap();
    assert_eq!(res.total_score, 3.0);
    assert_eq!(res.max_possible, 5.0);
  }

  #[test]
  fn multi_choice_duplicates_count_once() {
    let catalog = Catalog {
      categories: vec![cat("cs", "Compliance", 1)],
      questions: vec![q_multi("q1", "cs", &[1.0, 1.0, 1.0], false)],
      actions: vec![],
    };
    let answers = AnswerSet::from([("q1".into(), multi(&["o0", "o0", "o1", "bogus"]))]);
    let res = score(&catalog, &answers).unwrap();
    assert_eq!(res.total_score, 2.0);
  }

  #[test]
  fn multi_value_answer_on_single_choice_scores_zero() {
    let catalog = financial_catalog();
    let answers = AnswerSet::from([("q1".into(), multi(&["o3"]))]);
    let res = score(&catalog, &answers).unwrap();
    assert_eq!(res.total_score, 0.0);
  }

  #[test]
  fn single_value_answer_on_multi_choice_counts_as_one_selection() {
    let catalog = Catalog {
      categories: vec![cat("cs", "Compliance", 1)],
      questions: vec![q_multi("q1", "cs", &[1.0, 1.0], false)],
      actions: vec![],
    };
    let answers = AnswerSet::from([("q1".into(), single("o1"))]);
    let res = score(&catalog, &answers).unwrap();
    assert_eq!(res.total_score, 1.0);
  }

  #[test]
  fn grade_tier_band_boundaries() {
    let cases = [
      (0.0, Grade::F, Tier::Emerging),
      (49.99, Grade::F, Tier::Emerging),
      (50.0, Grade::D, Tier::Developing),
      (64.99, Grade::D, Tier::Developing),
      (65.0, Grade::C, Tier::Competitive),
      (74.99, Grade::C, Tier::Competitive),
      (75.0, Grade::B, Tier::IndustryLeader),
      (84.99, Grade::B, Tier::IndustryLeader),
      (85.0, Grade::A, Tier::WorldClass),
      (100.0, Grade::A, Tier::WorldClass),
    ];
    for (pct, grade, tier) in cases {
      assert_eq!(grade_tier(pct), (grade, tier), "at {pct}%");
    }
  }

  #[test]
  fn percentage_always_within_bounds() {
    let catalog = financial_catalog();
    for answers in [
      AnswerSet::new(),
      AnswerSet::from([("q1".into(), single("o3")), ("q2".into(), single("o3"))]),
      AnswerSet::from([("q1".into(), single("o0"))]),
    ] {
      let res = score(&catalog, &answers).unwrap();
      assert!(res.percentage >= 0.0 && res.percentage <= 100.0);
      for cs in &res.category_scores {
        assert!(cs.percentage >= 0.0 && cs.percentage <= 100.0);
      }
    }
  }

  #[test]
  fn idempotent_for_identical_inputs() {
    let catalog = financial_catalog();
    let answers = AnswerSet::from([("q1".into(), single("o2")), ("q2".into(), single("o1"))]);
    let a = score(&catalog, &answers).unwrap();
    let b = score(&catalog, &answers).unwrap();
    assert_eq!(a, b);
    assert_eq!(
      serde_json::to_string(&a).unwrap(),
      serde_json::to_string(&b).unwrap()
    );
  }

  #[test]
  fn insight_lists_follow_thresholds_with_gap_band() {
    // strong: 100%, gap: 60%, weak: 40% over 5-point single questions.
    let catalog = Catalog {
      categories: vec![
        cat("strong", "Strong", 1),
        cat("mid", "Middle", 2),
        cat("weak", "Weak", 3),
      ],
      questions: vec![
        q_single("s1", "strong", &[0.0, 5.0]),
        q_single("m1", "mid", &[0.0, 3.0, 5.0]),
        q_single("w1", "weak", &[0.0, 2.0, 5.0]),
      ],
      actions: vec![],
    };
    let answers = AnswerSet::from([
      ("s1".into(), single("o1")),
      ("m1".into(), single("o1")),
      ("w1".into(), single("o1")),
    ]);
    let res = score(&catalog, &answers).unwrap();
    assert_eq!(res.insights.strengths, vec!["Strong: 100.0% - Strong capability"]);
    assert_eq!(res.insights.improvement_areas, vec!["Weak: 40.0% - Needs attention"]);
    // 60% sits in the [60, 75) gap: neither a strength nor an improvement area.
    assert!(!res.insights.strengths.iter().any(|s| s.contains("Middle")));
    assert!(!res.insights.improvement_areas.iter().any(|s| s.contains("Middle")));
  }

  #[test]
  fn overall_narrative_matches_band() {
    let catalog = financial_catalog();
    let answers = AnswerSet::from([("q1".into(), single("o3")), ("q2".into(), single("o3"))]);
    let res = score(&catalog, &answers).unwrap();
    assert_eq!(res.percentage, 100.0);
    assert!(res.insights.overall.starts_with("Exceptional performance!"));

    let res = score(&catalog, &AnswerSet::new()).unwrap();
    assert!(res.insights.overall.starts_with("Emerging stage"));
  }

  #[test]
  fn recommendations_capped_at_five_in_display_order() {
    let mut categories = Vec::new();
    let mut questions = Vec::new();
    let mut actions = Vec::new();
    for i in 0..7 {
      let id = format!("c{i}");
      categories.push(cat(&id, &format!("Category {i}"), i as u32));
      questions.push(q_single(&format!("q{i}"), &id, &[0.0, 5.0]));
      actions.push(ActionTemplate {
        category_id: id,
        priority: if i % 2 == 0 { Priority::High } else { Priority::Medium },
        action: format!("Action {i}"),
      });
    }
    let catalog = Catalog { categories, questions, actions };
    // Nothing answered: all 7 categories fall below the action threshold.
    let res = score(&catalog, &AnswerSet::new()).unwrap();
    assert_eq!(res.recommendations.len(), 5);
    let names: Vec<&str> = res.recommendations.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(names, vec!["Category 0", "Category 1", "Category 2", "Category 3", "Category 4"]);
  }

  #[test]
  fn category_above_action_threshold_gets_no_recommendation() {
    let catalog = financial_catalog();
    // 7/10 = 70%: at the threshold, not below it.
    let answers = AnswerSet::from([("q1".into(), single("o3")), ("q2".into(), single("o1"))]);
    let res = score(&catalog, &answers).unwrap();
    assert_eq!(res.category_scores[0].percentage, 70.0);
    assert!(res.recommendations.is_empty());
  }

  #[test]
  fn unknown_category_reference_is_invalid_catalog() {
    let catalog = Catalog {
      categories: vec![cat("fin", "Financial Health", 1)],
      questions: vec![q_single("q1", "missing", &[0.0, 5.0])],
      actions: vec![],
    };
    let err = score(&catalog, &AnswerSet::new()).unwrap_err();
    assert_eq!(
      err,
      InvalidCatalog::UnknownCategory {
        question_id: "q1".into(),
        category_id: "missing".into(),
      }
    );
  }

  #[test]
  fn stored_zero_max_with_positive_options_is_invalid_catalog() {
    let mut q = q_single("q1", "fin", &[0.0, 5.0]);
    q.max_score = Some(0.0);
    let catalog = Catalog {
      categories: vec![cat("fin", "Financial Health", 1)],
      questions: vec![q],
      actions: vec![],
    };
    let err = score(&catalog, &AnswerSet::new()).unwrap_err();
    assert_eq!(err, InvalidCatalog::ZeroMaxCategory { category_id: "fin".into() });
  }

  #[test]
  fn all_zero_options_is_not_an_error() {
    let catalog = Catalog {
      categories: vec![cat("fin", "Financial Health", 1)],
      questions: vec![q_single("q1", "fin", &[0.0, 0.0])],
      actions: vec![],
    };
    let res = score(&catalog, &AnswerSet::new()).unwrap();
    assert_eq!(res.category_scores[0].percentage, 0.0);
  }

  #[test]
  fn stored_max_score_overrides_derived() {
    let mut q = q_single("q1", "fin", &[0.0, 5.0]);
    q.max_score = Some(20.0);
    let catalog = Catalog {
      categories: vec![cat("fin", "Financial Health", 1)],
      questions: vec![q],
      actions: vec![],
    };
    let answers = AnswerSet::from([("q1".into(), single("o1"))]);
    let res = score(&catalog, &answers).unwrap();
    assert_eq!(res.max_possible, 20.0);
    assert_eq!(res.percentage, 25.0);
  }

  #[test]
  fn category_order_follows_display_order_not_input_order() {
    let catalog = Catalog {
      categories: vec![cat("b", "Second", 2), cat("a", "First", 1)],
      questions: vec![
        q_single("q1", "a", &[0.0, 5.0]),
        q_single("q2", "b", &[0.0, 5.0]),
      ],
      actions: vec![],
    };
    let res = score(&catalog, &AnswerSet::new()).unwrap();
    let ids: Vec<&str> = res.category_scores.iter().map(|c| c.category_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
  }

  #[test]
  fn percentages_round_to_two_decimals() {
    // 1 of 3 points: 33.333... -> 33.33.
    let catalog = Catalog {
      categories: vec![cat("a", "A", 1)],
      questions: vec![q_single("q1", "a", &[0.0, 1.0, 3.0])],
      actions: vec![],
    };
    let answers = AnswerSet::from([("q1".into(), single("o1"))]);
    let res = score(&catalog, &answers).unwrap();
    assert_eq!(res.category_scores[0].percentage, 33.33);
    assert_eq!(res.percentage, 33.33);
  }
}
