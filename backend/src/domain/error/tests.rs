//! Tests for the domain error payload and its catalogue.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Error::not_found("x"), ErrorCode::NotFound)]
#[case(Error::validation("x"), ErrorCode::Validation)]
#[case(Error::unauthorized("x"), ErrorCode::Unauthorized)]
#[case(Error::conflict("x"), ErrorCode::Conflict)]
#[case(Error::internal("x"), ErrorCode::Internal)]
fn constructors_set_code(#[case] err: Error, #[case] expected: ErrorCode) {
    assert_eq!(err.code(), expected);
    assert!(err.reason().is_none());
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::Validation, "   ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
fn incorrect_login_details_is_stable() {
    assert_eq!(Error::incorrect_login_details(), Error::incorrect_login_details());
}

#[rstest]
fn catalogue_entries_carry_reason_and_code() {
    let account = BankAccountId::random();
    let err = Error::insufficient_funds(&account);
    assert_eq!(err.code(), ErrorCode::Validation);
    assert_eq!(err.reason(), Some(ErrorReason::InsufficientFunds));
    assert!(err.message().contains(&account.to_string()));

    let user = UserId::random();
    let err = Error::user_has_bank_account_preventing_deletion(&user);
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        err.reason(),
        Some(ErrorReason::UserHasBankAccountPreventingDeletion)
    );
}

#[rstest]
fn anonymous_unauthorized_message_mentions_caller() {
    let err = Error::user_unauthorized(None);
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "Anonymous caller is unauthorized");
}

#[rstest]
fn serialises_camel_case_and_skips_empty_fields() {
    let plain = serde_json::to_value(Error::internal("boom")).expect("serialise");
    assert_eq!(plain, json!({ "code": "internal", "message": "boom" }));

    let detailed = serde_json::to_value(
        Error::incorrect_login_details().with_details(json!({ "field": "password" })),
    )
    .expect("serialise");
    assert_eq!(
        detailed,
        json!({
            "code": "validation",
            "reason": "incorrect_login_details",
            "message": "Login details provided are incorrect",
            "details": { "field": "password" },
        })
    );
}

#[rstest]
#[tokio::test]
async fn captures_trace_id_from_scope() {
    let trace_id: TraceId = "00000000-0000-0000-0000-000000000001"
        .parse()
        .expect("valid uuid");
    let err = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(err.trace_id(), Some("00000000-0000-0000-0000-000000000001"));
}

#[rstest]
fn trace_id_absent_outside_scope() {
    assert!(Error::not_found("missing").trace_id().is_none());
}
