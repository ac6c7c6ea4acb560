use vigil_core::models::instrument::{Domain, InstrumentDefinition, Item, ScoringMethod};

use super::{band, item, yes_no};
use crate::BuiltinInstrument;

/// Community Supervision Needs Inventory.
/// Weighted: criminal history and attitudes count double. Total 0–19.
pub struct SupervisionNeeds;

impl BuiltinInstrument for SupervisionNeeds {
    fn id(&self) -> &str {
        "supervision_needs"
    }

    fn definition(&self) -> &InstrumentDefinition {
        static DEFINITION: std::sync::LazyLock<InstrumentDefinition> =
            std::sync::LazyLock::new(|| {
                let domain = |id: &str, name: &str, weight: i64, items: Vec<Item>| Domain {
                    id: id.to_string(),
                    name: name.to_string(),
                    weight,
                    items,
                };

                InstrumentDefinition {
                    id: "supervision_needs".to_string(),
                    name: "Community Supervision Needs Inventory".to_string(),
                    version: "1.3".to_string(),
                    scoring_method: ScoringMethod::Weighted,
                    active: true,
                    domains: vec![
                        domain(
                            "criminal_history",
                            "Criminal History",
                            2,
                            vec![
                                item(
                                    "prior_convictions",
                                    "Prior adult convictions",
                                    &[
                                        ("none", "None", 0),
                                        ("one_two", "One or two", 1),
                                        ("three_plus", "Three or more", 2),
                                    ],
                                ),
                                yes_no("prior_violence", "Any prior violent offense", 2),
                            ],
                        ),
                        domain(
                            "peer_associations",
                            "Peer Associations",
                            1,
                            vec![
                                item(
                                    "criminal_peers",
                                    "Friends with criminal involvement",
                                    &[("none", "None", 0), ("some", "Some", 1), ("most", "Most", 2)],
                                ),
                                yes_no("gang_involvement", "Current gang involvement", 2),
                            ],
                        ),
                        domain(
                            "attitudes",
                            "Criminal Attitudes",
                            2,
                            vec![item(
                                "accountability",
                                "Accountability for offense",
                                &[
                                    ("accepts", "Accepts responsibility", 0),
                                    ("minimizes", "Minimizes", 1),
                                    ("denies", "Denies or blames others", 2),
                                ],
                            )],
                        ),
                        domain(
                            "stability",
                            "Housing and Employment",
                            1,
                            vec![
                                item(
                                    "housing",
                                    "Current housing",
                                    &[
                                        ("stable", "Stable", 0),
                                        ("transitional", "Transitional", 1),
                                        ("homeless", "Homeless", 2),
                                    ],
                                ),
                                yes_no("unemployed", "Currently unemployed", 1),
                            ],
                        ),
                    ],
                    scoring_table: vec![
                        band(0, Some(5), "Low"),
                        band(6, Some(11), "Moderate"),
                        band(12, Some(15), "High"),
                        band(16, None, "Very High"),
                    ],
                    fallback_level: None,
                    description: Some(
                        "Case-planning inventory for supervision intensity".to_string(),
                    ),
                }
            });
        &DEFINITION
    }
}
