//! Built-in seed catalog: six pillars, a representative question set, and
//! the static per-pillar recommendation templates. Guarantees the service
//! scores sensibly even without a remote store or a TOML catalog.

use crate::domain::{
  ActionTemplate, Catalog, Category, ChoiceOption, Priority, Question, QuestionKind,
};

fn opt(value: &str, label: &str, score: f64) -> ChoiceOption {
  ChoiceOption { value: value.into(), label: label.into(), score }
}

fn single(id: &str, cid: &str, text: &str, options: Vec<ChoiceOption>) -> Question {
  Question {
    id: id.into(),
    category_id: cid.into(),
    kind: QuestionKind::SingleChoice,
    text: text.into(),
    options,
    max_score: None,
  }
}

fn multi(id: &str, cid: &str, text: &str, options: Vec<ChoiceOption>) -> Question {
  Question {
    id: id.into(),
    category_id: cid.into(),
    kind: QuestionKind::MultipleChoice,
    text: text.into(),
    options,
    max_score: None,
  }
}

pub fn seed_catalog() -> Catalog {
  Catalog {
    categories: seed_categories(),
    questions: seed_questions(),
    actions: seed_actions(),
  }
}

pub fn seed_categories() -> Vec<Category> {
  vec![
    Category {
      id: "financial_health".into(),
      name: "Financial Health".into(),
      weight: 20.0,
      display_order: 1,
      description: "Financial stability, cost optimization, and profitability management".into(),
    },
    Category {
      id: "production_excellence".into(),
      name: "Production Excellence".into(),
      weight: 25.0,
      display_order: 2,
      description: "Manufacturing efficiency, quality, and technology adoption".into(),
    },
    Category {
      id: "supply_chain".into(),
      name: "Supply Chain".into(),
      weight: 15.0,
      display_order: 3,
      description: "Sourcing strategy, inventory management, and logistics".into(),
    },
    Category {
      id: "sales_marketing".into(),
      name: "Sales & Marketing".into(),
      weight: 20.0,
      display_order: 4,
      description: "Market reach, customer relationships, and brand positioning".into(),
    },
    Category {
      id: "compliance_sustainability".into(),
      name: "Compliance & Sustainability".into(),
      weight: 10.0,
      display_order: 5,
      description: "Regulatory compliance, environmental standards, and certifications".into(),
    },
    Category {
      id: "human_capital".into(),
      name: "Human Capital".into(),
      weight: 10.0,
      display_order: 6,
      description: "Workforce capability, training, and organizational culture".into(),
    },
  ]
}

pub fn seed_questions() -> Vec<Question> {
  vec![
    single(
      "fin_01",
      "financial_health",
      "What is your current working capital cycle (in days)?",
      vec![
        opt("less_than_60", "Less than 60 days", 5.0),
        opt("60_to_90", "60-90 days", 4.0),
        opt("91_to_120", "91-120 days", 2.0),
        opt("more_than_120", "More than 120 days", 0.0),
      ],
    ),
    single(
      "fin_02",
      "financial_health",
      "Do you have sufficient cash reserves to cover at least 2 months of operational expenses?",
      vec![
        opt("yes_3plus", "Yes, 3+ months covered", 5.0),
        opt("yes_2months", "Yes, 2-3 months covered", 4.0),
        opt("yes_1month", "Yes, 1-2 months covered", 2.0),
        opt("no", "No, less than 1 month", 0.0),
      ],
    ),
    single(
      "prod_01",
      "production_excellence",
      "What is your average capacity utilization?",
      vec![
        opt("above_85", "85-95%", 5.0),
        opt("75_to_85", "75-85%", 4.0),
        opt("60_to_75", "60-75%", 2.0),
        opt("below_60", "Below 60%", 0.0),
      ],
    ),
    single(
      "prod_02",
      "production_excellence",
      "What is your in-line rejection rate?",
      vec![
        opt("below_1", "Below 1%", 5.0),
        opt("1_to_3", "1-3%", 4.0),
        opt("3_to_5", "3-5%", 2.0),
        opt("above_5", "Above 5%", 0.0),
      ],
    ),
    single(
      "sc_01",
      "supply_chain",
      "What is your annual inventory turnover?",
      vec![
        opt("above_8x", "More than 8x", 5.0),
        opt("6_to_8x", "6-8x", 4.0),
        opt("4_to_6x", "4-6x", 2.0),
        opt("below_4x", "Less than 4x", 0.0),
      ],
    ),
    single(
      "sm_01",
      "sales_marketing",
      "What share of revenue comes from your top 3 customers?",
      vec![
        opt("below_40", "Less than 40%", 5.0),
        opt("40_to_60", "40-60%", 4.0),
        opt("60_to_80", "60-80%", 2.0),
        opt("above_80", "More than 80%", 0.0),
      ],
    ),
    multi(
      "cs_01",
      "compliance_sustainability",
      "Which of the following certifications do you currently hold?",
      vec![
        opt("gots", "GOTS (Global Organic Textile Standard)", 1.0),
        opt("oeko_tex", "OEKO-TEX Standard 100", 1.0),
        opt("bci", "BCI (Better Cotton Initiative)", 1.0),
        opt("sa8000", "SA8000 (Social Accountability)", 1.0),
        opt("sedex", "SEDEX/SMETA", 1.0),
        opt("none", "None of the above", 0.0),
      ],
    ),
    multi(
      "hc_01",
      "human_capital",
      "Do you have employee welfare programs (canteen, transport, healthcare)?",
      vec![
        opt("canteen", "Subsidized canteen", 1.0),
        opt("transport", "Employee transport", 1.0),
        opt("healthcare", "Healthcare/medical support", 1.0),
        opt("housing", "Housing support", 1.0),
        opt("childcare", "Childcare facilities", 1.0),
        opt("none", "None of the above", 0.0),
      ],
    ),
    single(
      "hc_02",
      "human_capital",
      "What is your annual employee turnover?",
      vec![
        opt("below_15", "Below 15%", 5.0),
        opt("15_to_30", "15-30%", 4.0),
        opt("30_to_50", "30-50%", 2.0),
        opt("above_50", "Above 50%", 0.0),
      ],
    ),
  ]
}

/// Static action plans, one per pillar. Priority is fixed per pillar.
pub fn seed_actions() -> Vec<ActionTemplate> {
  let a = |cid: &str, priority, action: &str| ActionTemplate {
    category_id: cid.into(),
    priority,
    action: action.into(),
  };
  vec![
    a(
      "financial_health",
      Priority::High,
      "Implement robust financial tracking systems and explore working capital optimization strategies",
    ),
    a(
      "production_excellence",
      Priority::High,
      "Invest in automation, quality systems, and lean manufacturing practices to improve efficiency",
    ),
    a(
      "supply_chain",
      Priority::Medium,
      "Diversify supplier base and implement digital supply chain visibility tools",
    ),
    a(
      "sales_marketing",
      Priority::Medium,
      "Develop digital presence, diversify customer base, and strengthen brand positioning",
    ),
    a(
      "compliance_sustainability",
      Priority::High,
      "Pursue key certifications (GOTS, OEKO-TEX) and implement sustainability initiatives",
    ),
    a(
      "human_capital",
      Priority::Medium,
      "Enhance training programs, improve retention strategies, and invest in employee welfare",
    ),
  ]
}
