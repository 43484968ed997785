//! Example-based tests for the search engine.
//!
//! Property-based tests live in `property_tests.rs`.

use std::io;

use super::*;
use crate::oracle::{Guarded, probe_fn};
use crate::test_utils::{ScriptedOracle, positions};

// ─────────────────────────────────────────────────────────────────────────────
// Confirmed boundaries
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn finds_first_new_candidate_among_ten() {
    let mut oracle = ScriptedOracle::from_script("nnnnnyyyyy");
    let result = least_satisfying(&positions(10), &mut oracle).await.unwrap();

    assert_eq!(result.index, 5);
    assert_eq!(result.verdict, Verdict::Confirmed);
    assert!(result.unknown_spans.is_empty());
    // ceil(log2(10)) + 1
    assert!(result.evaluations <= 5, "{} evaluations", result.evaluations);
    assert_eq!(result.evaluations, oracle.calls.len());
}

#[tokio::test]
async fn two_candidates_need_no_evaluation() {
    let mut oracle = ScriptedOracle::from_script("ny");
    let result = least_satisfying(&positions(2), &mut oracle).await.unwrap();

    assert_eq!(result.index, 1);
    assert!(result.is_confirmed());
    assert!(oracle.calls.is_empty());
}

#[tokio::test]
async fn regression_right_after_first_candidate() {
    let mut oracle = ScriptedOracle::from_script("nyyyyyyy");
    let result = least_satisfying(&positions(8), &mut oracle).await.unwrap();
    assert_eq!(result.index, 1);
    assert!(result.is_confirmed());
}

#[tokio::test]
async fn regression_at_last_candidate() {
    let mut oracle = ScriptedOracle::from_script("nnnnnnny");
    let result = least_satisfying(&positions(8), &mut oracle).await.unwrap();
    assert_eq!(result.index, 7);
    assert!(result.is_confirmed());
}

#[tokio::test]
async fn endpoints_are_never_evaluated() {
    let mut oracle = ScriptedOracle::from_script("nnnyyyy");
    least_satisfying(&positions(7), &mut oracle).await.unwrap();
    assert!(!oracle.calls.contains(&0));
    assert!(!oracle.calls.contains(&6));
}

#[tokio::test]
async fn routes_around_unknown_run_to_a_confirmed_boundary() {
    let mut oracle = ScriptedOracle::from_script("nnn ???? nn yyy");
    let result = least_satisfying(&positions(12), &mut oracle).await.unwrap();

    assert_eq!(result.index, 9);
    assert_eq!(result.verdict, Verdict::Confirmed);
    assert_eq!(result.unknown_spans, vec![UnknownSpan::new(3, 6)]);
    assert!(oracle.repeated_calls().is_empty());
}

#[tokio::test]
async fn single_unknown_candidate_is_skipped() {
    let mut oracle = ScriptedOracle::from_script("nnn?nnyyy");
    let result = least_satisfying(&positions(9), &mut oracle).await.unwrap();

    assert_eq!(result.index, 6);
    assert!(result.is_confirmed());
}

// ─────────────────────────────────────────────────────────────────────────────
// Unknown spans and ambiguous boundaries
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_pair_before_regression() {
    let mut oracle = ScriptedOracle::from_script("nn??yy");
    let result = least_satisfying(&positions(6), &mut oracle).await.unwrap();

    assert_eq!(result.index, 4);
    assert_eq!(result.unknown_spans, vec![UnknownSpan::new(2, 3)]);
    // Candidates 2 and 3 could hold the regression as well.
    assert_eq!(
        result.verdict,
        Verdict::Ambiguous {
            span: UnknownSpan::new(2, 3)
        }
    );
    assert_eq!(result.suspects(), 2..=4);
    assert!(oracle.repeated_calls().is_empty());
}

#[tokio::test]
async fn whole_gap_unknown_terminates_as_ambiguous() {
    let mut oracle = ScriptedOracle::from_script("n???y");
    let result = least_satisfying(&positions(5), &mut oracle).await.unwrap();

    assert_eq!(result.index, 4);
    assert_eq!(
        result.verdict,
        Verdict::Ambiguous {
            span: UnknownSpan::new(1, 3)
        }
    );
    assert!(!result.is_confirmed());
    assert_eq!(result.evaluations, 3);
}

#[tokio::test]
async fn unknown_span_is_mapped_once() {
    let mut oracle = ScriptedOracle::from_script("nnnnn ????? nn yyy");
    let result = least_satisfying(&positions(15), &mut oracle).await.unwrap();

    assert_eq!(result.index, 12);
    assert!(result.is_confirmed());
    assert_eq!(result.unknown_spans, vec![UnknownSpan::new(5, 9)]);
    assert!(oracle.repeated_calls().is_empty());
    // Midpoint, the span (plus its two neighbours), then two bisection steps.
    assert_eq!(result.evaluations, 9);
}

#[tokio::test]
async fn unknown_runs_outside_the_search_path_are_never_probed() {
    let mut oracle = ScriptedOracle::from_script("n ?? n ?? y ?? y");
    let result = least_satisfying(&positions(10), &mut oracle).await.unwrap();

    // The regression is somewhere in 4..=6.
    assert_eq!(result.index, 6);
    assert_eq!(
        result.verdict,
        Verdict::Ambiguous {
            span: UnknownSpan::new(4, 5)
        }
    );
    assert_eq!(result.unknown_spans, vec![UnknownSpan::new(4, 5)]);
    for untouched in [1, 2, 7, 8] {
        assert!(!oracle.calls.contains(&untouched));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Oracle behavior
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn failing_probe_is_treated_as_unknown() {
    let truth = crate::test_utils::outcomes("nnnnyyy");
    let mut oracle = Guarded::new(probe_fn(|c: &usize, _| {
        if *c == 3 {
            Err(io::Error::other("canary build missing"))
        } else {
            Ok(truth[*c])
        }
    }));
    let result = least_satisfying(&positions(7), &mut oracle).await.unwrap();

    assert_eq!(result.index, 4);
    assert_eq!(result.unknown_spans, vec![UnknownSpan::new(3, 3)]);
    assert_eq!(
        result.verdict,
        Verdict::Ambiguous {
            span: UnknownSpan::new(3, 3)
        }
    );
}

#[tokio::test]
async fn first_probe_receives_progress_hint() {
    let mut oracle = ScriptedOracle::from_script("nnnnnyyyyy");
    least_satisfying(&positions(10), &mut oracle).await.unwrap();

    assert_eq!(
        oracle.hints.first(),
        Some(&ProgressHint {
            remaining: 5,
            steps: 3
        })
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Preconditions and assumed outcomes
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn single_candidate_is_rejected_without_probing() {
    let mut oracle = ScriptedOracle::from_script("y");
    let err = least_satisfying(&positions(1), &mut oracle)
        .await
        .unwrap_err();

    assert_eq!(err, SearchError::TooFewCandidates(1));
    assert!(oracle.calls.is_empty());
}

#[tokio::test]
async fn empty_sequence_is_rejected() {
    let mut oracle = ScriptedOracle::from_script("");
    let err = least_satisfying(&positions(0), &mut oracle)
        .await
        .unwrap_err();
    assert_eq!(err, SearchError::TooFewCandidates(0));
}

#[tokio::test]
async fn first_candidate_known_new_is_rejected_without_probing() {
    let candidates = positions(6);
    let mut oracle = ScriptedOracle::from_script("yyyyyy");
    let mut bisector = Bisector::new(&candidates);
    bisector.assume(0, Outcome::Satisfies).unwrap();

    let err = bisector.run(&mut oracle).await.unwrap_err();

    assert_eq!(err, SearchError::FirstCandidateNotOld(Outcome::Satisfies));
    assert!(oracle.calls.is_empty());
}

#[tokio::test]
async fn last_candidate_known_untestable_is_rejected() {
    let candidates = positions(4);
    let mut oracle = ScriptedOracle::from_script("nnn?");
    let mut bisector = Bisector::new(&candidates);
    bisector.assume(3, Outcome::Unknown).unwrap();

    let err = bisector.run(&mut oracle).await.unwrap_err();

    assert_eq!(err, SearchError::LastCandidateNotNew(Outcome::Unknown));
    assert!(oracle.calls.is_empty());
}

#[tokio::test]
async fn assumed_outcomes_are_not_re_evaluated() {
    let candidates = positions(16);
    let mut oracle = ScriptedOracle::from_script("nnnnnnnnnnnnyyyy");
    let mut bisector = Bisector::new(&candidates);
    bisector.assume(7, Outcome::DoesNotSatisfy).unwrap();
    bisector.assume(13, Outcome::Satisfies).unwrap();

    let result = bisector.run(&mut oracle).await.unwrap();

    assert_eq!(result.index, 12);
    assert!(!oracle.calls.contains(&7));
    assert!(!oracle.calls.contains(&13));
    assert!(oracle.calls.iter().all(|&c| c > 7 && c < 13));
}

#[tokio::test]
async fn inverted_assumptions_fail_fast() {
    let candidates = positions(8);
    let mut oracle = ScriptedOracle::from_script("nnnnyyyy");
    let mut bisector = Bisector::new(&candidates);
    bisector.assume(2, Outcome::Satisfies).unwrap();
    bisector.assume(5, Outcome::DoesNotSatisfy).unwrap();

    let err = bisector.run(&mut oracle).await.unwrap_err();

    assert_eq!(
        err,
        SearchError::MonotonicityViolation {
            new_at: 2,
            old_at: 5
        }
    );
    assert!(oracle.calls.is_empty());
}

#[tokio::test]
async fn contradicting_span_neighbours_fail_fast() {
    // Mapping the unknown at 3 finds new behavior at 2 and old at 4.
    let mut oracle = ScriptedOracle::from_script("nny?nyy");
    let err = least_satisfying(&positions(7), &mut oracle)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SearchError::MonotonicityViolation {
            new_at: 2,
            old_at: 4
        }
    );
    assert_eq!(oracle.calls, vec![3, 2, 4]);
}

#[test]
fn assume_rejects_out_of_range_index() {
    let candidates = positions(3);
    let mut bisector = Bisector::new(&candidates);
    assert_eq!(
        bisector.assume(3, Outcome::Unknown),
        Err(SearchError::IndexOutOfRange { index: 3, len: 3 })
    );
}

#[test]
fn assume_rejects_conflicting_outcome() {
    let candidates = positions(3);
    let mut bisector = Bisector::new(&candidates);
    bisector.assume(1, Outcome::Unknown).unwrap();
    bisector.assume(1, Outcome::Unknown).unwrap();
    assert_eq!(
        bisector.assume(1, Outcome::Satisfies),
        Err(SearchError::AlreadyKnown {
            index: 1,
            existing: Outcome::Unknown
        })
    );
}

#[test]
fn confirmed_suspects_is_single_index() {
    let bisection = Bisection {
        index: 7,
        verdict: Verdict::Confirmed,
        unknown_spans: vec![],
        evaluations: 3,
    };
    assert_eq!(bisection.suspects(), 7..=7);
}

#[test]
fn verdict_serializes_with_status_tag() {
    let json = serde_json::to_value(Verdict::Ambiguous {
        span: UnknownSpan::new(2, 3),
    })
    .unwrap();
    assert_eq!(
        json,
        serde_json::json!({"status": "ambiguous", "span": {"left": 2, "right": 3}})
    );
}
