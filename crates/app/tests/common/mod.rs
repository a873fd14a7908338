//! Shared helpers for driving the router like a browser would
#![allow(dead_code)]

use std::path::PathBuf;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use axum_extra::extract::cookie::Key;
use tempfile::TempDir;
use tower::ServiceExt;

use ::common::prelude::{CredentialStore, DocumentStore};
use flatcms::{http_server, ServiceState};

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";

pub const SEEDED: &[(&str, &str)] = &[
    ("about.txt", "flatcms keeps every document as a plain file."),
    ("changes.txt", "v0.1.0: first release"),
    ("history.txt", "1993 - Yukihiro Matsumoto dreams up Ruby.\n2014 - flat files win."),
    ("readme.md", "# Readme\n\nIsn't that *swell*? Use `code` too."),
];

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn content_type(&self) -> &str {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    pub fn assert_redirect_home(&self) {
        assert_eq!(self.status, StatusCode::FOUND, "body: {}", self.body);
        assert_eq!(self.location(), Some("/"));
    }
}

/// A router over a throwaway data directory plus one browser's cookie.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
    pub data_dir: PathBuf,
    _temp: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("data");
        let documents = DocumentStore::open(&data_dir).await.unwrap();
        for (name, content) in SEEDED {
            documents.write(name, content.as_bytes()).await.unwrap();
        }

        let users_path = temp.path().join("users.toml");
        let hash = bcrypt::hash(PASSWORD, 4).unwrap();
        std::fs::write(&users_path, format!("[users]\n{} = \"{}\"\n", USERNAME, hash)).unwrap();

        let state = ServiceState::new(
            documents,
            CredentialStore::new(users_path),
            Key::generate(),
        );

        Self {
            router: http_server::router(state, tracing::Level::DEBUG),
            cookie: None,
            data_dir,
            _temp: temp,
        }
    }

    /// Same as [`TestApp::new`] but already signed in.
    pub async fn signed_in() -> Self {
        let mut app = Self::new().await;
        app.sign_in(USERNAME, PASSWORD).await.assert_redirect_home();
        // drop the welcome flash
        app.get("/").await;
        app
    }

    pub async fn sign_in(&mut self, username: &str, password: &str) -> TestResponse {
        self.post("/users/signin", &[("username", username), ("password", password)])
            .await
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = self.request("GET", path).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn get_with_accept(&mut self, path: &str, accept: &str) -> TestResponse {
        let request = self
            .request("GET", path)
            .header("accept", accept)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post(&mut self, path: &str, form: &[(&str, &str)]) -> TestResponse {
        let request = self
            .request("POST", path)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(serde_urlencoded::to_string(form).unwrap()))
            .unwrap();
        self.send(request).await
    }

    pub fn document_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.data_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    pub fn document_content(&self, name: &str) -> String {
        std::fs::read_to_string(self.data_dir.join(name)).unwrap()
    }

    fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .unwrap()
                .split(';')
                .next()
                .unwrap()
                .to_string();
            // a removal carries an empty value
            self.cookie = if pair.ends_with('=') { None } else { Some(pair) };
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}
