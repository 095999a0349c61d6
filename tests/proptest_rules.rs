//! Property-based tests for the creation, filter and update rules.
//!
//! Uses proptest to verify that:
//! - Creation succeeds iff all three required fields are non-empty
//! - Filters return exactly the issues whose fields equal the constraints
//! - Blank update values never change an issue
//! - A single-field update touches only that field

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use tracing::info;

use issue_tracker::filter::IssueFilter;
use issue_tracker::model::{Fields, Issue, IssueField};
use issue_tracker::update::resolve_update;
use issue_tracker::validation::IssueValidator;
use issue_tracker::TrackerError;

/// Initialize test logging for proptest
fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();
}

fn make_issue(id: &str, created_by: &str, assigned_to: &str, open: bool) -> Issue {
    let at = Utc.timestamp_opt(1_722_422_796, 0).unwrap();
    Issue {
        id: id.to_string(),
        issue_title: format!("title {id}"),
        issue_text: "text".to_string(),
        created_by: created_by.to_string(),
        assigned_to: assigned_to.to_string(),
        status_text: String::new(),
        open,
        created_on: at,
        updated_on: at,
    }
}

fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[A-Za-z]{1,8}"]
}

const WRITABLE_TEXT: [IssueField; 5] = [
    IssueField::IssueTitle,
    IssueField::IssueText,
    IssueField::CreatedBy,
    IssueField::AssignedTo,
    IssueField::StatusText,
];

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 100,
        ..Default::default()
    })]

    /// Property: creation succeeds iff every required field is non-empty
    #[test]
    fn create_requires_all_three(
        title in name_strategy(),
        text in name_strategy(),
        creator in name_strategy(),
    ) {
        init_test_logging();
        info!("proptest_create: title={title:?} text={text:?} creator={creator:?}");

        let fields = Fields::new()
            .with("issue_title", title.as_str())
            .with("issue_text", text.as_str())
            .with("created_by", creator.as_str());
        let result = IssueValidator::validate_create(&fields);

        let all_present = !title.is_empty() && !text.is_empty() && !creator.is_empty();
        if all_present {
            let issue = result.unwrap();
            prop_assert_eq!(issue.issue_title, title);
            prop_assert_eq!(issue.assigned_to, "");
            prop_assert_eq!(issue.status_text, "");
        } else {
            prop_assert!(matches!(result, Err(TrackerError::MissingFields)));
        }
    }

    /// Property: list returns exactly the issues whose fields equal the constraints
    #[test]
    fn filter_selects_exact_subset(
        issues in prop::collection::vec(
            (prop::sample::select(vec!["Mike", "Joe", "Ann"]),
             prop::sample::select(vec!["", "Mike", "Joe"]),
             any::<bool>()),
            0..12,
        ),
        creator in prop::sample::select(vec!["Mike", "Joe", "Ann", "Zed"]),
        open in prop::option::of(any::<bool>()),
    ) {
        init_test_logging();
        let issues: Vec<Issue> = issues
            .iter()
            .enumerate()
            .map(|(n, (by, to, is_open))| make_issue(&format!("id{n}"), by, to, *is_open))
            .collect();

        let mut filter = IssueFilter::all().with("created_by", creator);
        if let Some(open) = open {
            filter = filter.with("open", open.to_string());
        }

        let matched = filter.apply(&issues);
        let expected: Vec<Issue> = issues
            .iter()
            .filter(|issue| issue.created_by == creator)
            .filter(|issue| open.is_none_or(|open| issue.open == open))
            .cloned()
            .collect();
        prop_assert_eq!(matched, expected);
    }

    /// Property: any `open` constraint other than "true" selects closed issues
    #[test]
    fn open_coercion_only_true_is_true(value in "[a-zA-Z0-9]{0,6}") {
        init_test_logging();
        let issues = vec![make_issue("a", "me", "", true), make_issue("b", "me", "", false)];
        let matched = IssueFilter::all().with("open", value.as_str()).apply(&issues);
        prop_assert_eq!(matched.len(), 1);
        prop_assert_eq!(matched[0].open, value == "true");
    }

    /// Property: blank values never produce a change
    #[test]
    fn blank_update_is_no_op(mask in prop::collection::vec(any::<bool>(), 5)) {
        init_test_logging();
        let existing = make_issue("abc", "Mike", "Joe", true);
        let mut fields = Fields::new().with("_id", "abc");
        for (field, include) in WRITABLE_TEXT.iter().zip(&mask) {
            if *include {
                fields.insert(field.as_str(), "");
            }
        }

        let result = resolve_update(&existing, &fields);
        prop_assert!(
            matches!(result, Err(TrackerError::NoUpdateFields { ref id }) if id == "abc"),
            "expected NoUpdateFields for id abc, got {:?}",
            result
        );
    }

    /// Property: a single non-blank field changes exactly that field
    #[test]
    fn single_field_update_is_isolated(
        index in 0usize..5,
        value in "[a-z]{1,10}",
    ) {
        init_test_logging();
        let target = WRITABLE_TEXT[index];
        let existing = make_issue("abc", "Mike", "Joe", true);
        let mut fields = Fields::new().with("_id", "ignored-for-mutation");
        for field in WRITABLE_TEXT {
            fields.insert(field.as_str(), if field == target { value.as_str() } else { "" });
        }

        let changes = resolve_update(&existing, &fields).unwrap();
        prop_assert_eq!(changes.fields(), vec![target]);

        let mut updated = existing.clone();
        changes.apply_to(&mut updated);
        prop_assert_eq!(updated.text(target), Some(value.as_str()));
        prop_assert_eq!(&updated.id, &existing.id);
        prop_assert_eq!(updated.open, existing.open);
        for field in WRITABLE_TEXT {
            if field != target {
                prop_assert_eq!(updated.text(field), existing.text(field));
            }
        }
    }
}
