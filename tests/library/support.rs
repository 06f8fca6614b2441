use serde_json::{json, Value};
use unperline::handlers;
use unperline::{HandlerError, HashMapRepository, Service, Session, Settings};

pub type Svc = Service<HashMapRepository>;

pub fn service() -> Svc {
    handlers::service(HashMapRepository::new(), Settings::default())
}

pub fn service_with_limit(feed_limit: usize) -> Svc {
    handlers::service(HashMapRepository::new(), Settings { feed_limit })
}

/// Register a user and return their id.
pub fn register(service: &Svc, username: &str) -> u64 {
    let out = service
        .dispatch(
            "user.register",
            json!({ "username": username, "email": format!("{username}@example.com") }),
            Session::new(),
        )
        .unwrap();
    out["id"].as_u64().unwrap()
}

pub fn apply(service: &Svc, user: u64, book: &str, body: Value) -> Result<Value, HandlerError> {
    let mut input = body;
    input["bookId"] = json!(book);
    service.dispatch("book.apply", input, Session::for_user(user))
}

pub fn act(service: &Svc, user: u64, book: &str, action: &str) -> Value {
    apply(service, user, book, json!({ "action": action })).unwrap()
}

pub fn state(service: &Svc, user: u64, book: &str) -> Value {
    service
        .dispatch("book.state", json!({ "bookId": book }), Session::for_user(user))
        .unwrap()
}

pub fn contains(list: &Value, book: &str) -> bool {
    list.as_array()
        .map(|items| items.iter().any(|b| b == book))
        .unwrap_or(false)
}
