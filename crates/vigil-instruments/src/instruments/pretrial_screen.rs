use vigil_core::models::instrument::{Domain, InstrumentDefinition, ScoringMethod};

use super::{band, item, yes_no};
use crate::BuiltinInstrument;

/// Pretrial Risk Screen.
/// Seven items across three domains, additive, total 0–9.
/// 0–2: Low, 3–5: Moderate, 6+: High.
pub struct PretrialScreen;

impl BuiltinInstrument for PretrialScreen {
    fn id(&self) -> &str {
        "pretrial_screen"
    }

    fn definition(&self) -> &InstrumentDefinition {
        static DEFINITION: std::sync::LazyLock<InstrumentDefinition> =
            std::sync::LazyLock::new(|| InstrumentDefinition {
                id: "pretrial_screen".to_string(),
                name: "Pretrial Risk Screen".to_string(),
                version: "2.1".to_string(),
                scoring_method: ScoringMethod::Additive,
                active: true,
                domains: vec![
                    Domain {
                        id: "criminal_history".to_string(),
                        name: "Criminal History".to_string(),
                        weight: 1,
                        items: vec![
                            item(
                                "age_at_first_arrest",
                                "Age at first arrest",
                                &[("33_plus", "33 or older", 0), ("under_33", "Under 33", 1)],
                            ),
                            item(
                                "failures_to_appear",
                                "Failures to appear in the past 24 months",
                                &[("none", "None", 0), ("one", "One", 1), ("two_plus", "Two or more", 2)],
                            ),
                            yes_no(
                                "prior_incarcerations",
                                "Three or more prior jail incarcerations",
                                1,
                            ),
                        ],
                    },
                    Domain {
                        id: "employment_residence".to_string(),
                        name: "Employment and Residential Stability".to_string(),
                        weight: 1,
                        items: vec![
                            item(
                                "employment_at_arrest",
                                "Employment status at time of arrest",
                                &[
                                    ("full_time", "Employed full time", 0),
                                    ("part_time", "Employed part time", 1),
                                    ("unemployed", "Not employed", 2),
                                ],
                            ),
                            yes_no(
                                "residential_instability",
                                "At current residence less than six months",
                                1,
                            ),
                        ],
                    },
                    Domain {
                        id: "substance_use".to_string(),
                        name: "Substance Use".to_string(),
                        weight: 1,
                        items: vec![
                            yes_no("recent_drug_use", "Illegal drug use in the past six months", 1),
                            yes_no("severe_drug_problem", "Severe drug-use problem", 1),
                        ],
                    },
                ],
                scoring_table: vec![
                    band(0, Some(2), "Low"),
                    band(3, Some(5), "Moderate"),
                    band(6, None, "High"),
                ],
                fallback_level: None,
                description: Some(
                    "Brief screen of failure-to-appear and new-arrest risk while awaiting trial"
                        .to_string(),
                ),
            });
        &DEFINITION
    }
}
