//! End-to-end scenarios through `compute_split`.

use std::collections::BTreeMap;

use tipsplit_core::{
    compute_split, Money, OffTheTopRule, Participant, PoolAmount, SplitResult, SplitRule,
    SplitTemplate,
};

fn pool(text: &str) -> PoolAmount {
    text.parse().expect("valid pool")
}

fn amounts(result: &SplitResult) -> Vec<i64> {
    result
        .participants
        .iter()
        .map(|p| p.calculated_amount.expect("amount filled").cents())
        .collect()
}

fn trio() -> Vec<Participant> {
    vec![
        Participant::new("p-1", "Alex", "server"),
        Participant::new("p-2", "Bo", "server"),
        Participant::new("p-3", "Cy", "busser"),
    ]
}

#[test]
fn equal_split_gives_extra_cent_to_first_name() {
    let template = SplitTemplate::new(trio(), SplitRule::Equal);

    for _ in 0..5 {
        let result = compute_split(&template, pool("10.00"));
        assert_eq!(amounts(&result), vec![334, 333, 333]);
        assert!(result.warnings.is_empty());
    }
}

#[test]
fn equal_split_tie_break_ignores_roster_order() {
    let mut people = trio();
    people.reverse();
    let template = SplitTemplate::new(people, SplitRule::Equal);

    let result = compute_split(&template, pool("10.00"));
    assert_eq!(result.amount_for("p-1"), Some(Money::from_cents(334)));
    assert_eq!(amounts(&result), vec![333, 333, 334]);
}

#[test]
fn off_the_top_over_100_percent_is_scaled_and_main_rule_gets_nothing() {
    let template = SplitTemplate::new(trio(), SplitRule::Equal).with_off_the_top(vec![
        OffTheTopRule::new("server", 90.0),
        OffTheTopRule::new("busser", 60.0),
    ]);

    let result = compute_split(&template, pool("100.00"));

    // scaled to 60% / 40%
    assert_eq!(amounts(&result), vec![3000, 3000, 4000]);
    assert_eq!(result.total().cents(), 10000);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("exceeded 100%"));
}

#[test]
fn negative_pool_degrades_to_noop_with_single_warning() {
    let template = SplitTemplate::new(trio(), SplitRule::Equal);

    let result = compute_split(&template, pool("-5.00"));

    assert_eq!(result.participants, trio());
    assert!(result.participants.iter().all(|p| p.calculated_amount.is_none()));
    assert_eq!(result.warnings, vec!["Pool cannot be negative.".to_string()]);
}

#[test]
fn each_validation_failure_is_reported_alone() {
    let mut people = trio();
    people[2].hours = Some(-1.0);
    let template = SplitTemplate::new(people, SplitRule::HoursBased)
        .with_off_the_top(vec![OffTheTopRule::new("host", -5.0)]);

    let result = compute_split(&template, pool("20"));
    assert_eq!(result.warnings, vec!["Participant 'Cy' has negative hours.".to_string()]);

    let empty = SplitTemplate::new(Vec::new(), SplitRule::Equal);
    let result = compute_split(&empty, pool("20"));
    assert!(result.participants.is_empty());
    assert_eq!(result.warnings, vec!["At least one participant is required.".to_string()]);
}

#[test]
fn hours_fallback_when_nobody_recorded_hours() {
    let people: Vec<Participant> = trio().into_iter().map(|p| p.with_hours(0.0)).collect();
    let template = SplitTemplate::new(people, SplitRule::HoursBased);

    let result = compute_split(&template, pool("10.00"));

    assert_eq!(amounts(&result), vec![334, 333, 333]);
    assert_eq!(result.total().cents(), 1000);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("No hours recorded"));
}

#[test]
fn hybrid_shortfall_goes_to_remaining_roles() {
    let people = vec![
        Participant::new("s1", "Alex", "server"),
        Participant::new("s2", "Bo", "server"),
        Participant::new("b1", "Cy", "busser"),
        Participant::new("b2", "Di", "busser"),
    ];
    let template = SplitTemplate::new(
        people,
        SplitRule::Hybrid {
            formula: "server:60".to_string(),
        },
    );

    let result = compute_split(&template, pool("100.00"));

    assert_eq!(amounts(&result), vec![3000, 3000, 2000, 2000]);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("40.00"));
}

#[test]
fn percentage_rule_reads_template_role_weights() {
    let weights = BTreeMap::from([("Server".to_string(), 35.0), ("busser".to_string(), 30.0)]);
    let template = SplitTemplate::new(trio(), SplitRule::Percentage).with_role_weights(weights);

    let result = compute_split(&template, pool("200.00"));

    assert_eq!(amounts(&result), vec![7000, 7000, 6000]);
    assert!(result.warnings.is_empty());
}

#[test]
fn role_weighted_with_off_the_top_conserves_pool() {
    let weights = BTreeMap::from([("server".to_string(), 3.0), ("busser".to_string(), 1.0)]);
    let template = SplitTemplate::new(trio(), SplitRule::RoleWeighted { weights })
        .with_off_the_top(vec![OffTheTopRule::new("busser", 7.5)]);

    let result = compute_split(&template, pool("123.45"));

    assert_eq!(result.total().cents(), 12345);
    assert!(amounts(&result).iter().all(|&c| c >= 0));
}

#[test]
fn identical_inputs_give_identical_results() {
    let people = vec![
        Participant::new("a", "Alex", "server").with_hours(7.25),
        Participant::new("b", "Bo", "server").with_hours(3.5),
        Participant::new("c", "Cy", "bar").with_hours(1.0),
        Participant::new("d", "Di", "busser").with_hours(4.75),
    ];
    let template = SplitTemplate::new(people, SplitRule::HoursBased)
        .with_off_the_top(vec![OffTheTopRule::new("bar", 3.0), OffTheTopRule::new("chef", 2.0)]);

    let first = compute_split(&template, pool("317.03"));
    let second = compute_split(&template, pool("317.03"));

    assert_eq!(first, second);
    assert_eq!(first.total().cents(), 31703);
    assert_eq!(first.warnings.len(), 1);
}

#[test]
fn json_template_with_legacy_rule_name() {
    let template = SplitTemplate::from_json(
        r#"{
            "participants": [
                {"id": "1", "name": "Alex", "role": "server", "hours": 6},
                {"id": "2", "name": "Bo", "role": "busser", "hours": 2}
            ],
            "rule": {"type": "hours_based"},
            "offTheTop": [{"role": "busser", "percentage": 10}]
        }"#,
    )
    .unwrap();

    let result = compute_split(&template, pool("80.00"));

    // 800 off the top to Bo; 7200 by 6:2
    assert_eq!(amounts(&result), vec![5400, 800 + 1800]);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["participants"][0]["calculatedAmount"], 5400);
    assert_eq!(json["warnings"], serde_json::json!([]));
}
