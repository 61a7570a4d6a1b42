mod common;

use std::sync::Arc;
use std::time::Duration;

use ai_improver_service::{
    AiImprover, CycleError, FileDocument, ImproveError, ImproverConfig, MemoryDocument,
};
use common::harness::{TestHarness, closed_endpoint};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

mod improve {
    use super::*;

    #[tokio::test]
    async fn fragment_in_content_is_normalized() {
        let h = TestHarness::new().await;
        h.mount_json_response(json!({ "content": "<p>hi</p>" })).await;

        let out = h.improver().improve("<p>old</p>").await.unwrap();
        assert_eq!(out, "<!DOCTYPE html>\n<p>hi</p>\n</html>");
    }

    #[tokio::test]
    async fn complete_document_in_response_is_unchanged() {
        let h = TestHarness::new().await;
        h.mount_json_response(json!({ "response": "<!DOCTYPE html><body>ok</body></html>" }))
            .await;

        let out = h.improver().improve("<p>old</p>").await.unwrap();
        assert_eq!(out, "<!DOCTYPE html><body>ok</body></html>");
    }

    #[tokio::test]
    async fn content_wins_over_response() {
        let h = TestHarness::new().await;
        h.mount_json_response(json!({
            "content": "<!DOCTYPE html><html>A</html>",
            "response": "<!DOCTYPE html><html>B</html>",
        }))
        .await;

        let out = h.improver().improve("").await.unwrap();
        assert_eq!(out, "<!DOCTYPE html><html>A</html>");
    }

    #[tokio::test]
    async fn empty_object_yields_skeleton() {
        let h = TestHarness::new().await;
        h.mount_json_response(json!({})).await;

        let out = h.improver().improve("<p>old</p>").await.unwrap();
        assert_eq!(out, "<!DOCTYPE html>\n\n</html>");
    }

    #[tokio::test]
    async fn sends_exactly_one_request_with_wire_body() {
        let h = TestHarness::new().await;
        let page = "<html><body><h1>neuron</h1></body></html>";
        let prompt = ai_improver_service::prompt::build_prompt(page);

        Mock::given(method("POST"))
            .and(path("/completion"))
            .and(body_json(json!({
                "prompt": prompt,
                "temperature": 0.7,
                "top_p": 0.9,
                "n_predict": 2048,
                "stop": ["```", "</html>"],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": "x" })))
            .expect(1)
            .mount(&h.mock_server)
            .await;

        h.improver().improve(page).await.unwrap();
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn server_error_carries_status() {
        let h = TestHarness::new().await;
        h.mount_error_response(500).await;

        let err = h.improver().improve("<p>old</p>").await.unwrap_err();
        assert!(matches!(err, ImproveError::Server { status: 500 }));
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn not_found_is_a_server_error_too() {
        let h = TestHarness::new().await;
        h.mount_error_response(404).await;

        let err = h.improver().improve("").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn invalid_json_is_a_transport_error() {
        let h = TestHarness::new().await;
        h.mount_raw_body("<html>not json</html>").await;

        let err = h.improver().improve("").await.unwrap_err();
        assert!(matches!(err, ImproveError::Transport(_)), "got {err:?}");
        assert!(err.to_string().starts_with("[AI Improver] failed to improve page:"));
    }

    #[tokio::test]
    async fn connection_refused_is_a_transport_error() {
        let cfg = ImproverConfig {
            endpoint_url: closed_endpoint(),
            ..ImproverConfig::default()
        };
        let err = AiImprover::new(cfg).unwrap().improve("<p>x</p>").await.unwrap_err();
        assert!(matches!(err, ImproveError::Transport(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn caller_supplied_timeout_surfaces_as_transport_error() {
        let h = TestHarness::new().await;
        h.mount_delayed_json_response(json!({ "content": "late" }), Duration::from_secs(3), 1)
            .await;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let err = AiImprover::with_client(h.config(), client)
            .improve("")
            .await
            .unwrap_err();
        assert!(matches!(err, ImproveError::Transport(_)), "got {err:?}");
    }
}

mod concurrency {
    use super::*;

    #[tokio::test]
    async fn plain_improve_calls_race_independently() {
        let h = TestHarness::new().await;
        h.mount_delayed_json_response(
            json!({ "content": "<p>x</p>" }),
            Duration::from_millis(100),
            2,
        )
        .await;

        let improver = Arc::new(h.improver());
        let (a, b) = tokio::join!(improver.improve("a"), improver.improve("b"));
        assert_eq!(a.unwrap(), b.unwrap());
    }

    #[tokio::test]
    async fn exclusive_improve_rejects_overlap() {
        let h = TestHarness::new().await;
        h.mount_delayed_json_response(
            json!({ "content": "<p>x</p>" }),
            Duration::from_millis(300),
            1,
        )
        .await;

        let improver = h.improver();
        let (first, second) = tokio::join!(
            improver.improve_exclusive("a"),
            improver.improve_exclusive("b")
        );
        assert!(first.is_ok());
        assert!(matches!(second, Err(ImproveError::Busy)));
    }

    #[tokio::test]
    async fn exclusive_slot_is_released_after_completion() {
        let h = TestHarness::new().await;
        h.mount_delayed_json_response(json!({ "content": "<p>x</p>" }), Duration::ZERO, 2)
            .await;

        let improver = h.improver();
        improver.improve_exclusive("a").await.unwrap();
        improver.improve_exclusive("b").await.unwrap();
    }
}

mod cycle {
    use super::*;

    #[tokio::test]
    async fn replaces_document_and_reinjects_script() {
        let h = TestHarness::new().await;
        h.mount_json_response(json!({ "content": "<!DOCTYPE html><html><body>v2</body></html>" }))
            .await;

        let improver = h.improver().with_script_ref("/js/ai-improve-api.js");
        let mut page = MemoryDocument::new("<!DOCTYPE html><html><body>v1</body></html>");
        let current = page.html().to_string();

        let installed = improver.run_cycle(&current, &mut page).await.unwrap();

        assert_eq!(installed, "<!DOCTYPE html><html><body>v2</body></html>");
        assert_eq!(page.html(), installed);
        assert_eq!(page.scripts(), ["/js/ai-improve-api.js"]);
    }

    #[tokio::test]
    async fn failed_improve_leaves_document_untouched() {
        let h = TestHarness::new().await;
        h.mount_error_response(503).await;

        let mut page = MemoryDocument::new("<p>v1</p>");
        let err = h.improver().run_cycle("<p>v1</p>", &mut page).await.unwrap_err();

        assert!(matches!(err, CycleError::Improve(ImproveError::Server { status: 503 })));
        assert_eq!(page.html(), "<p>v1</p>");
        assert_eq!(page.replacements(), 0);
        assert!(page.scripts().is_empty());
    }

    #[tokio::test]
    async fn file_backed_page_is_rewritten() {
        let h = TestHarness::new().await;
        h.mount_json_response(json!({
            "content": "<!DOCTYPE html><html><head><title>v2</title></head><body></body></html>"
        }))
        .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("index.html");
        std::fs::write(&file, "<p>v1</p>").unwrap();

        let mut doc = FileDocument::new(&file);
        let current = doc.read().unwrap();
        h.improver().run_cycle(&current, &mut doc).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "<!DOCTYPE html><html><head><title>v2</title><script src=\"ai-improve-api.js\"></script></head><body></body></html>"
        );
    }
}
