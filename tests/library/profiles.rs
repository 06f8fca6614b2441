use serde_json::json;
use unperline::{HandlerError, Session};

use crate::support::{act, register, service};

#[test]
fn own_profile_includes_shelves() {
    let service = service();
    let ada = register(&service, "ada");
    act(&service, ada, "b1", "like");

    let profile = service
        .dispatch("profile.get", json!({}), Session::for_user(ada))
        .unwrap();
    assert_eq!(profile["id"], ada);
    assert_eq!(profile["username"], "ada");
    assert_eq!(profile["likedBooks"], json!(["b1"]));
    assert_eq!(profile["readBooks"], json!(["b1"]));
}

#[test]
fn update_derives_full_name_and_caps_favorites() {
    let service = service();
    let ada = register(&service, "ada");

    let out = service
        .dispatch(
            "profile.update",
            json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "bio": "engines",
                "favoriteBooks": ["a", " ", "b", "c", "d", "e"],
            }),
            Session::for_user(ada),
        )
        .unwrap();
    assert_eq!(out["fullName"], "Ada Lovelace");
    assert_eq!(out["bio"], "engines");
    assert_eq!(out["favoriteBooks"], json!(["a", "b", "c", "d"]));

    let out = service
        .dispatch("profile.update", json!({ "pronouns": "she/her" }), Session::for_user(ada))
        .unwrap();
    assert_eq!(out["fullName"], "Ada Lovelace");
    assert_eq!(out["pronouns"], "she/her");
}

#[test]
fn update_rejects_taken_username() {
    let service = service();
    let ada = register(&service, "ada");
    register(&service, "grace");

    let err = service
        .dispatch("profile.update", json!({ "username": "grace" }), Session::for_user(ada))
        .unwrap_err();
    assert!(matches!(err, HandlerError::Conflict(_)));

    let out = service
        .dispatch("profile.update", json!({ "username": "ada" }), Session::for_user(ada))
        .unwrap();
    assert_eq!(out["username"], "ada");
}

#[test]
fn deleted_account_is_gone() {
    let service = service();
    let ada = register(&service, "ada");
    act(&service, ada, "b1", "read");

    service
        .dispatch("profile.delete", json!({}), Session::for_user(ada))
        .unwrap();

    let err = service
        .dispatch("profile.get", json!({}), Session::for_user(ada))
        .unwrap_err();
    assert_eq!(err.status_code(), 404);

    let err = service
        .dispatch("public.profile", json!({ "handle": "ada" }), Session::new())
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}
