use serde_json::{json, Value};
use unperline::Session;

use crate::support::{act, apply, register, service, service_with_limit};

fn public(service: &crate::support::Svc, command: &str, handle: &str) -> Value {
    service
        .dispatch(command, json!({ "handle": handle }), Session::new())
        .unwrap()
}

#[test]
fn profile_by_username_email_or_local_part() {
    let service = service();
    let ada = register(&service, "ada");
    act(&service, ada, "b1", "like");
    act(&service, ada, "b2", "readList");
    apply(&service, ada, "b3", json!({ "action": "rate", "rating": 8, "review": "sharp" })).unwrap();

    for handle in ["ada", "ada@example.com"] {
        let profile = public(&service, "public.profile", handle);
        assert_eq!(profile["id"], ada);
        assert_eq!(profile["stats"], json!({ "books": 2, "liked": 1, "readList": 1, "reviews": 1 }));
    }
}

#[test]
fn shared_local_part_resolves_to_lowest_user_id() {
    let service = service();
    let register_with = |username: &str, email: &str| {
        service
            .dispatch(
                "user.register",
                json!({ "username": username, "email": email }),
                Session::new(),
            )
            .unwrap()["id"]
            .as_u64()
            .unwrap()
    };
    register(&service, "u1");
    let first = register_with("first", "shared@a.com");
    for n in 3..10 {
        register(&service, &format!("u{n}"));
    }
    let tenth = register_with("tenth", "shared@b.com");
    assert_eq!((first, tenth), (2, 10));

    let profile = public(&service, "public.profile", "shared");
    assert_eq!(profile["id"], first);
    let profile = public(&service, "public.profile", "shared@b.com");
    assert_eq!(profile["id"], tenth);
}

#[test]
fn books_page_shows_rating_badges() {
    let service = service();
    let ada = register(&service, "ada");
    apply(&service, ada, "b1", json!({ "action": "rate", "rating": 4 })).unwrap();

    let page = public(&service, "public.books", "ada");
    assert_eq!(page["readBooks"], json!(["b1"]));
    assert_eq!(page["bookRatings"]["b1"], json!({ "value": 4, "count": 1 }));
    assert_eq!(page["profile"]["username"], "ada");

    let page = public(&service, "public.readlist", "ada");
    assert_eq!(page["readList"], json!([]));
}

#[test]
fn reviews_page_lists_written_reviews_only() {
    let service = service();
    let ada = register(&service, "ada");
    apply(&service, ada, "b1", json!({ "action": "rate", "rating": 8, "review": "yes" })).unwrap();
    apply(&service, ada, "b2", json!({ "action": "rate", "rating": 3 })).unwrap();

    let page = public(&service, "public.reviews", "ada");
    let reviews = page["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["bookId"], "b1");
}

#[test]
fn activity_is_newest_first() {
    let service = service();
    let ada = register(&service, "ada");
    act(&service, ada, "b1", "read");
    act(&service, ada, "b1", "like");

    let page = public(&service, "public.activity", "ada");
    let kinds: Vec<&str> = page["activity"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["liked", "read", "joined"]);
}

#[test]
fn book_reviews_collect_across_users() {
    let service = service();
    let ada = register(&service, "ada");
    let grace = register(&service, "grace");
    apply(&service, ada, "b1", json!({ "action": "rate", "rating": 6, "review": "first" })).unwrap();
    apply(&service, grace, "b1", json!({ "action": "rate", "rating": 9, "review": "second" })).unwrap();
    apply(&service, grace, "b2", json!({ "action": "rate", "rating": 9, "review": "other" })).unwrap();

    let out = service
        .dispatch("book.reviews", json!({ "bookId": "b1" }), Session::new())
        .unwrap();
    let reviews = out["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 2);
    let mut users: Vec<u64> = reviews.iter().map(|r| r["userId"].as_u64().unwrap()).collect();
    users.sort();
    assert_eq!(users, vec![ada, grace]);
}

#[test]
fn friends_feed_excludes_caller_and_respects_limit() {
    let service = service_with_limit(1);
    let ada = register(&service, "ada");
    let grace = register(&service, "grace");
    let lin = register(&service, "lin");
    act(&service, ada, "a1", "read");
    act(&service, grace, "g1", "read");
    act(&service, grace, "g2", "read");
    act(&service, lin, "l1", "read");

    let out = service
        .dispatch("friends.books", json!({}), Session::for_user(lin))
        .unwrap();
    let books = out["books"].as_array().unwrap();
    assert!(books.iter().all(|b| b["userId"] == grace));
    let ids: Vec<&str> = books.iter().map(|b| b["bookId"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["g1", "g2"]);
}

#[test]
fn friends_feed_without_session_sees_everyone() {
    let service = service();
    let ada = register(&service, "ada");
    let grace = register(&service, "grace");
    act(&service, ada, "a1", "read");
    act(&service, grace, "g1", "read");

    let out = service
        .dispatch("friends.books", json!({}), Session::new())
        .unwrap();
    assert_eq!(out["books"].as_array().unwrap().len(), 2);
}

#[test]
fn unknown_handle_is_not_found() {
    let service = service();
    let err = service
        .dispatch("public.books", json!({ "handle": "nobody" }), Session::new())
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}
