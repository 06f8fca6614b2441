use serde_json::json;
use unperline::{HandlerError, Session};

use crate::support::{act, apply, contains, register, service, state};

#[test]
fn read_twice_restores_absence() {
    let service = service();
    let ada = register(&service, "ada");

    let out = act(&service, ada, "b1", "read");
    assert!(contains(&out["readBooks"], "b1"));

    let out = act(&service, ada, "b1", "read");
    assert!(!contains(&out["readBooks"], "b1"));
    assert_eq!(state(&service, ada, "b1")["isRead"], false);
}

#[test]
fn like_on_unread_book_marks_read_and_unlists() {
    let service = service();
    let ada = register(&service, "ada");
    act(&service, ada, "b1", "readList");

    let out = act(&service, ada, "b1", "like");
    assert_eq!(out["success"], true);
    assert!(contains(&out["readBooks"], "b1"));
    assert!(contains(&out["likedBooks"], "b1"));
    assert!(!contains(&out["readList"], "b1"));
}

#[test]
fn rate_zero_removes_entry_and_read_flag() {
    let service = service();
    let ada = register(&service, "ada");
    apply(&service, ada, "b1", json!({ "action": "rate", "rating": 6, "review": "ok" })).unwrap();

    let out = apply(&service, ada, "b1", json!({ "action": "rate", "rating": 0 })).unwrap();
    assert!(out["bookRatings"].get("b1").is_none());
    assert!(!contains(&out["readBooks"], "b1"));
    assert_eq!(state(&service, ada, "b1")["exists"], false);
}

#[test]
fn second_rating_keeps_earlier_review() {
    let service = service();
    let ada = register(&service, "ada");
    apply(&service, ada, "b1", json!({ "action": "rate", "rating": 8, "review": "x" })).unwrap();

    let out = apply(&service, ada, "b1", json!({ "action": "rate", "rating": 6 })).unwrap();
    assert_eq!(out["bookRatings"]["b1"]["rating"], 6);
    assert_eq!(out["bookRatings"]["b1"]["review"], "x");
}

#[test]
fn read_list_toggle_leaves_read_shelf_alone() {
    let service = service();
    let ada = register(&service, "ada");
    act(&service, ada, "b1", "read");

    let out = act(&service, ada, "b1", "readList");
    assert!(contains(&out["readBooks"], "b1"));
    assert!(contains(&out["readList"], "b1"));
}

#[test]
fn cover_on_fresh_book() {
    let service = service();
    let ada = register(&service, "ada");

    let out = apply(
        &service,
        ada,
        "b1",
        json!({ "action": "cover", "coverUrl": "https://x/y.png" }),
    )
    .unwrap();
    assert_eq!(out["bookRatings"]["b1"]["coverUrl"], "https://x/y.png");
    assert!(contains(&out["readBooks"], "b1"));
}

#[test]
fn rate_then_get_state() {
    let service = service();
    let ada = register(&service, "ada");
    apply(&service, ada, "b1", json!({ "action": "rate", "rating": 7, "liked": true })).unwrap();

    let s = state(&service, ada, "b1");
    assert_eq!(s["exists"], true);
    assert_eq!(s["rating"], 7);
    assert_eq!(s["liked"], true);
    assert_eq!(s["isRead"], true);
    assert_eq!(s["isInReadList"], false);
    assert!(s.get("ratedAt").is_some());
    assert_eq!(s["isFirstTime"], false);
}

#[test]
fn unknown_action_is_a_decode_error() {
    let service = service();
    let ada = register(&service, "ada");

    let err = apply(&service, ada, "b1", json!({ "action": "shelve" })).unwrap_err();
    assert!(matches!(err, HandlerError::DecodeFailed(_)));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn missing_action_is_rejected_by_guard() {
    let service = service();
    let ada = register(&service, "ada");

    let err = apply(&service, ada, "b1", json!({})).unwrap_err();
    assert!(matches!(err, HandlerError::GuardRejected(_)));
}

#[test]
fn rating_above_ten_is_rejected() {
    let service = service();
    let ada = register(&service, "ada");

    let err = apply(&service, ada, "b1", json!({ "action": "rate", "rating": 11 })).unwrap_err();
    assert_eq!(err.status_code(), 422);
    assert_eq!(state(&service, ada, "b1")["isRead"], false);
}

#[test]
fn anonymous_caller_is_unauthorized() {
    let service = service();
    let err = service
        .dispatch("book.apply", json!({ "bookId": "b1", "action": "read" }), Session::new())
        .unwrap_err();
    assert_eq!(err.status_code(), 401);
}

#[test]
fn anonymous_caller_with_bad_payload_is_unauthorized() {
    let service = service();
    for (command, input) in [
        ("book.apply", json!({ "bookId": "b1" })),
        ("book.state", json!({})),
        ("profile.update", json!([1, 2])),
    ] {
        let err = service.dispatch(command, input, Session::new()).unwrap_err();
        assert!(matches!(err, HandlerError::Unauthorized(_)), "{command}: {err}");
    }
}

#[test]
fn unknown_user_is_not_found() {
    let service = service();
    let err = apply(&service, 99, "b1", json!({ "action": "read" })).unwrap_err();
    assert!(matches!(err, HandlerError::NotFound(_)));

    let err = service
        .dispatch("book.state", json!({ "bookId": "b1" }), Session::for_user(99))
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[test]
fn state_survives_reload_from_events() {
    let service = service();
    let ada = register(&service, "ada");
    act(&service, ada, "b1", "like");
    apply(&service, ada, "b2", json!({ "action": "rate", "rating": 9, "isFirstTime": true })).unwrap();
    act(&service, ada, "b3", "readList");

    let b2 = state(&service, ada, "b2");
    assert_eq!(b2["isFirstTime"], true);
    assert_eq!(b2["rating"], 9);
    assert_eq!(state(&service, ada, "b1")["isLiked"], true);
    assert_eq!(state(&service, ada, "b3")["isInReadList"], true);
}
