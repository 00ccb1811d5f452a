//! Local HTTP stand-ins for the vendor sites.

use axum::http::{header, HeaderMap};
use axum::Router;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One request as the stand-in received it.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: &'static str,
    pub path: &'static str,
    pub cookie: Option<String>,
    pub form: HashMap<String, String>,
}

impl Seen {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form.get(name).map(String::as_str)
    }
}

/// Shared request log, handed to handlers as router state.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Seen>>>);

impl Recorder {
    pub fn record(
        &self,
        method: &'static str,
        path: &'static str,
        headers: &HeaderMap,
        form: HashMap<String, String>,
    ) {
        let cookie = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.0.lock().unwrap().push(Seen {
            method,
            path,
            cookie,
            form,
        });
    }

    /// Last request with this method and path.
    pub fn find(&self, method: &str, path: &str) -> Option<Seen> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|seen| seen.method == method && seen.path == path)
            .cloned()
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{}", addr)
}
