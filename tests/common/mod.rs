#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use paperstock::{
    auth::{FileStorage, Session, SessionStore, UserInfo},
    Console, ConsoleConfig,
};
use serde_json::Value;
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const TOKEN: &str = "test-token";
pub const EMAIL: &str = "operator@example.com";

/// Console wired to a mock backend, with its session file in a scratch directory.
pub struct TestConsole {
    pub server: MockServer,
    pub console: Console,
    session_dir: TempDir,
}

impl TestConsole {
    /// No stored session.
    pub async fn anonymous() -> Self {
        Self::build(false).await
    }

    /// A session for [`EMAIL`] is already on disk.
    pub async fn logged_in() -> Self {
        Self::build(true).await
    }

    async fn build(with_session: bool) -> Self {
        let server = MockServer::start().await;
        let session_dir = tempfile::tempdir().expect("temp dir");
        let session_file = session_dir.path().join("session.json");

        if with_session {
            SessionStore::new(Arc::new(FileStorage::new(&session_file)))
                .save(&Session {
                    token: TOKEN.to_string(),
                    user: Some(UserInfo {
                        email: EMAIL.to_string(),
                        logged_in_at: Utc::now(),
                    }),
                })
                .expect("seed session");
        }

        let console = Console::with_storage(
            config_for(&server, &session_file),
            Arc::new(FileStorage::new(&session_file)),
        )
        .expect("console");

        Self {
            server,
            console,
            session_dir,
        }
    }

    pub fn session_file(&self) -> PathBuf {
        self.session_dir.path().join("session.json")
    }

    /// A second console over the same backend and session file, as after a restart.
    pub fn restart(&self) -> Console {
        let file = self.session_file();
        Console::with_storage(config_for(&self.server, &file), Arc::new(FileStorage::new(&file)))
            .expect("console")
    }

    /// Answers `GET /api/{route}` with `body`.
    pub async fn mock_get(&self, route: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(api_path(route)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Bodies of every request received for `route` with `verb`.
    pub async fn request_bodies(&self, verb: &str, route: &str) -> Vec<Value> {
        let wanted = api_path(route);
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == verb && r.url.path() == wanted)
            .map(|r| serde_json::from_slice(&r.body).unwrap_or(Value::Null))
            .collect()
    }
}

pub fn api_path(route: &str) -> String {
    format!("/api/{}", route.trim_start_matches('/'))
}

fn config_for(server: &MockServer, session_file: &std::path::Path) -> ConsoleConfig {
    let mut config = ConsoleConfig::for_base_url(format!("{}/api", server.uri()));
    config.request_timeout_secs = 5;
    config.search_debounce_ms = 40;
    config.login_redirect_delay_ms = 0;
    config.session_file = Some(session_file.to_path_buf());
    config
}
