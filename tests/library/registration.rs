use serde_json::json;
use unperline::{HandlerError, Session};

use crate::support::{register, service};

#[test]
fn ids_are_sequential() {
    let service = service();
    assert_eq!(register(&service, "ada"), 1);
    assert_eq!(register(&service, "grace"), 2);
}

#[test]
fn duplicate_username_and_email_conflict() {
    let service = service();
    register(&service, "ada");

    let err = service
        .dispatch(
            "user.register",
            json!({ "username": "ada", "email": "other@example.com" }),
            Session::new(),
        )
        .unwrap_err();
    assert!(matches!(err, HandlerError::Conflict(ref msg) if msg == "Username already exists"));

    let err = service
        .dispatch(
            "user.register",
            json!({ "username": "ada2", "email": "ada@example.com" }),
            Session::new(),
        )
        .unwrap_err();
    assert!(matches!(err, HandlerError::Conflict(ref msg) if msg == "Email already exists"));
}

#[test]
fn blank_fields_are_rejected() {
    let service = service();
    let err = service
        .dispatch(
            "user.register",
            json!({ "username": "  ", "email": "x@example.com" }),
            Session::new(),
        )
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[test]
fn deleted_ids_are_not_reused() {
    let service = service();
    let ada = register(&service, "ada");
    service
        .dispatch("profile.delete", json!({}), Session::for_user(ada))
        .unwrap();

    assert_eq!(register(&service, "ada"), 2);
}
