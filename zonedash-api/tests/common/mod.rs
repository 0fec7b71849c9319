//! Shared helpers for the HTTP-level tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use zonedash_api::{ApiClient, ApiConfig, Navigator, Route, Session};

/// Assert that a `Result` is `Ok` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Assert that a `Result` is `Err` and unwrap the error.
#[macro_export]
macro_rules! require_err {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_err(), "expected Err(..), got {res:?}");
        let Err(err) = res else {
            return;
        };
        err
    }};
}

/// Navigator that starts at a given path and records every redirect.
pub struct RecordingNavigator {
    current: Mutex<String>,
    pub redirects: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Arc<Self> {
        Arc::new(Self {
            current: Mutex::new(path.to_string()),
            redirects: Mutex::new(Vec::new()),
        })
    }

    pub fn redirects(&self) -> Vec<Route> {
        self.redirects.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    fn navigate(&self, route: Route) {
        *self.current.lock().unwrap() = route.path();
        self.redirects.lock().unwrap().push(route);
    }
}

/// Client pointed at a mock server, with `token` (if any) already in the session.
pub async fn client_for(
    server: &mockito::ServerGuard,
    token: Option<&str>,
    navigator: Arc<RecordingNavigator>,
) -> (ApiClient, Session) {
    let session = Session::in_memory();
    if let Some(token) = token {
        session.set(token).await.unwrap();
    }
    let config = ApiConfig::new(format!("{}/api", server.url()));
    let client = ApiClient::new(config, session.clone(), navigator).unwrap();
    (client, session)
}

/// Zone JSON as the backend sends it.
pub fn zone_json(id: &str, name: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "name": name,
        "status": status,
        "records_count": 3,
        "recordLimit": 200,
        "createdAt": "2024-03-01T10:00:00.000Z",
        "updatedAt": "2024-03-02T10:00:00.000Z"
    })
}
