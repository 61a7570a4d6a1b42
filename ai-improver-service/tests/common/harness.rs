#![allow(dead_code)]

use std::time::Duration;

use ai_improver_service::{AiImprover, ImproverConfig};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const COMPLETION_PATH: &str = "/completion";

pub struct TestHarness {
    pub mock_server: MockServer,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self {
            mock_server: MockServer::start().await,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.mock_server.uri(), COMPLETION_PATH)
    }

    pub fn config(&self) -> ImproverConfig {
        ImproverConfig {
            endpoint_url: self.endpoint(),
            ..ImproverConfig::default()
        }
    }

    pub fn improver(&self) -> AiImprover {
        AiImprover::new(self.config()).unwrap()
    }

    fn completion_mock() -> wiremock::MockBuilder {
        Mock::given(method("POST"))
            .and(path(COMPLETION_PATH))
            .and(header("Content-Type", "application/json"))
    }

    pub async fn mount_json_response(&self, response: serde_json::Value) {
        Self::completion_mock()
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(&response)
                    .insert_header("Content-Type", "application/json"),
            )
            .expect(1)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mount_delayed_json_response(
        &self,
        response: serde_json::Value,
        delay: Duration,
        expected_calls: u64,
    ) {
        Self::completion_mock()
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(&response)
                    .set_delay(delay),
            )
            .expect(expected_calls)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mount_error_response(&self, status: u16) {
        Self::completion_mock()
            .respond_with(
                ResponseTemplate::new(status).set_body_string("{\"error\":\"model not loaded\"}"),
            )
            .expect(1)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mount_raw_body(&self, body: &str) {
        Self::completion_mock()
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&self.mock_server)
            .await;
    }
}

/// Endpoint on a port nothing listens on anymore.
pub fn closed_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}{COMPLETION_PATH}")
}
