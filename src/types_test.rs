// Unit tests for types module

use super::*;
use pretty_assertions::assert_eq;

fn state(displayed: bool, text: &str, attrs: &[(&str, Option<&str>)]) -> ElementState {
    ElementState {
        displayed,
        text: text.to_string(),
        attributes: attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect(),
    }
}

#[test]
fn test_viewport_size_parse() {
    // Valid formats
    let size = ViewportSize::parse("1920x1080").unwrap();
    assert_eq!(size.width, 1920);
    assert_eq!(size.height, 1080);

    let size = ViewportSize::parse("375x667").unwrap();
    assert_eq!(size.width, 375);
    assert_eq!(size.height, 667);

    // Invalid formats
    assert!(ViewportSize::parse("1920").is_err());
    assert!(ViewportSize::parse("1920x").is_err());
    assert!(ViewportSize::parse("x1080").is_err());
    assert!(ViewportSize::parse("abc x def").is_err());
    assert!(ViewportSize::parse("1920X1080").is_err()); // uppercase X
}

#[test]
fn test_visible_assertion() {
    let visible = state(true, "Join Room", &[]);
    let hidden = state(false, "Join Room", &[]);

    assert!(Assertion::Visible.evaluate(&visible).is_ok());
    assert_eq!(
        Assertion::Visible.evaluate(&hidden),
        Err("element is not visible".to_string())
    );
}

#[test]
fn test_attribute_contains_assertion() {
    let assertion = Assertion::AttributeContains {
        attribute: "class".to_string(),
        substring: "transition-transform".to_string(),
    };

    let full = state(
        true,
        "Create New Room",
        &[("class", Some("transition-transform active:scale-95 px-4"))],
    );
    assert!(assertion.evaluate(&full).is_ok());

    // Failure message must name the missing substring
    let partial = state(true, "Create New Room", &[("class", Some("px-4"))]);
    let err = assertion.evaluate(&partial).unwrap_err();
    assert!(err.contains("transition-transform"), "message was: {}", err);
    assert!(err.contains("px-4"), "message was: {}", err);

    let missing = state(true, "Create New Room", &[("class", None)]);
    assert_eq!(
        assertion.evaluate(&missing),
        Err("attribute 'class' is not present".to_string())
    );
}

#[test]
fn test_text_equals_assertion() {
    let assertion = Assertion::TextEquals {
        expected: "Example Domain".to_string(),
    };

    // Trimmed comparison
    assert!(assertion.evaluate(&state(true, "  Example Domain\n", &[])).is_ok());

    let err = assertion.evaluate(&state(true, "Other Heading", &[])).unwrap_err();
    assert!(err.contains("Other Heading"), "message was: {}", err);
    assert!(err.contains("Example Domain"), "message was: {}", err);
}

#[test]
fn test_transient_assertion_never_passes() {
    let assertion = Assertion::Transient {
        description: "loading spinner".to_string(),
    };
    assert!(assertion.is_transient());
    assert!(!Assertion::Visible.is_transient());

    let err = assertion.evaluate(&state(true, "", &[])).unwrap_err();
    assert!(err.contains("loading spinner"), "message was: {}", err);
}

#[test]
fn test_suite_json_round_trip() {
    let json = r#"{
        "checks": [
            {
                "name": "join-visible",
                "locator": { "by": "text", "text": "Join Room" },
                "assertions": [ { "kind": "visible" } ]
            },
            {
                "name": "create-animates",
                "locator": { "by": "css", "selector": "button.create" },
                "assertions": [
                    { "kind": "attribute_contains", "attribute": "class", "substring": "active:scale-95" },
                    { "kind": "text_equals", "expected": "Create New Room" }
                ]
            }
        ]
    }"#;

    let suite = CheckSuite::from_json(json).unwrap();
    assert_eq!(suite.checks.len(), 2);
    assert_eq!(suite.checks[0].name, "join-visible");
    assert_eq!(
        suite.checks[0].locator,
        Locator::Text {
            text: "Join Room".to_string()
        }
    );
    assert_eq!(suite.checks[0].assertions, vec![Assertion::Visible]);
    assert_eq!(
        suite.checks[1].assertions[1],
        Assertion::TextEquals {
            expected: "Create New Room".to_string()
        }
    );

    // Serialization keeps the tagged form
    let round = serde_json::to_string(&suite).unwrap();
    let reparsed = CheckSuite::from_json(&round).unwrap();
    assert_eq!(reparsed, suite);
}

#[test]
fn test_suite_rejects_unknown_assertion_kind() {
    let json = r#"{
        "checks": [
            {
                "name": "bad",
                "locator": { "by": "css", "selector": "h1" },
                "assertions": [ { "kind": "glows_in_the_dark" } ]
            }
        ]
    }"#;
    assert!(CheckSuite::from_json(json).is_err());
}

#[test]
fn test_locator_display() {
    let css = Locator::Css {
        selector: "button.submit".to_string(),
    };
    let text = Locator::Text {
        text: "Join Room".to_string(),
    };
    assert_eq!(css.to_string(), "css=button.submit");
    assert_eq!(text.to_string(), "text=Join Room");
}

#[test]
fn test_report_overall_and_counts() {
    let all_passed = RunReport {
        results: vec![CheckResult::passed("a"), CheckResult::passed("b")],
    };
    assert_eq!(all_passed.overall(), Outcome::Passed);
    assert_eq!(all_passed.counts(), (2, 0, 0));
    assert_eq!(all_passed.exit_code(), 0);

    let one_failed = RunReport {
        results: vec![
            CheckResult::passed("a"),
            CheckResult::failed("b", "element not found"),
        ],
    };
    assert_eq!(one_failed.overall(), Outcome::Failed);
    assert_eq!(one_failed.counts(), (1, 1, 0));
    assert_eq!(one_failed.exit_code(), 1);

    // Errored dominates Failed
    let errored = RunReport {
        results: vec![
            CheckResult::failed("a", "element not found"),
            CheckResult::errored("b", "session error: crash"),
            CheckResult::not_run("c"),
        ],
    };
    assert_eq!(errored.overall(), Outcome::Errored);
    assert_eq!(errored.counts(), (0, 1, 2));
    assert_eq!(errored.exit_code(), 2);
}

#[test]
fn test_not_run_message() {
    let result = CheckResult::not_run("later-check");
    assert_eq!(result.outcome, Outcome::Errored);
    assert_eq!(result.messages, vec!["not run: prior error".to_string()]);
}
