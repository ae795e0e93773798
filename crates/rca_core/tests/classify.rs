use rca_core::classify::{classify_action, ActionLabel};

#[test]
fn fixed_and_resolved_map_to_resolution() {
    assert_eq!(classify_action("Fixed the issue"), ActionLabel::Resolution);
    assert_eq!(
        classify_action("incident resolved after rollback"),
        ActionLabel::Resolution
    );
}

#[test]
fn investigating_maps_to_investigation() {
    assert_eq!(
        classify_action("Still investigating root cause"),
        ActionLabel::Investigation
    );
}

#[test]
fn error_and_failed_map_to_error_report() {
    assert_eq!(
        classify_action("Error: request failed"),
        ActionLabel::ErrorReport
    );
    assert_eq!(
        classify_action("deploy failed on canary"),
        ActionLabel::ErrorReport
    );
}

#[test]
fn everything_else_maps_to_update() {
    assert_eq!(classify_action("Deployed new config"), ActionLabel::Update);
    assert_eq!(classify_action(""), ActionLabel::Update);
}

#[test]
fn classification_is_case_insensitive() {
    assert_eq!(classify_action("FIXED THE ISSUE"), ActionLabel::Resolution);
    assert_eq!(
        classify_action("InVeStIgAtInG the spike"),
        ActionLabel::Investigation
    );
}

#[test]
fn resolution_and_investigation_outrank_error_report() {
    assert_eq!(
        classify_action("fixed the error in the retry loop"),
        ActionLabel::Resolution
    );
    assert_eq!(
        classify_action("investigating the failed deploy"),
        ActionLabel::Investigation
    );
}

#[test]
fn labels_display_as_documented_strings() {
    assert_eq!(ActionLabel::Resolution.to_string(), "Resolution");
    assert_eq!(ActionLabel::Investigation.to_string(), "Investigation");
    assert_eq!(ActionLabel::ErrorReport.to_string(), "Error Report");
    assert_eq!(ActionLabel::Update.to_string(), "Update");
}
