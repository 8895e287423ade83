//! Chat client tests against a mock OpenAI-compatible server.

use serde_json::json;
use tk_core::{ReferenceKind, ReferenceRecord};
use tk_lookup::{ChatClient, ContentSource, LookupConfig, LookupError};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn reply(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}

fn client_for(server: &MockServer) -> ChatClient {
    let config = LookupConfig::default()
        .with_base_url(format!("{}/v1", server.uri()))
        .with_api_key("test-key")
        .with_model("test-model");
    ChatClient::new(config).unwrap()
}

#[tokio::test]
async fn lookup_parses_fenced_creature() {
    let server = MockServer::start().await;
    let content = "```json\n{\"name\": \"Goblin\", \"size\": \"Small humanoid\", \"hit_points\": \"7 (2d6)\", \"dex_score\": 14, \"dex_mod\": \"(+2)\", \"tags\": [\"goblinoid\"]}\n```";

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_string_contains("test-model"))
        .and(body_string_contains("Goblin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply(content)))
        .expect(1)
        .mount(&server)
        .await;

    let record = client_for(&server)
        .lookup(ReferenceKind::Creature, "Goblin")
        .await
        .unwrap();
    let ReferenceRecord::Creature(goblin) = record else {
        panic!("expected a creature");
    };
    assert_eq!(goblin.hit_point_value(), 7);
    assert_eq!(goblin.dex_score, 14);
    assert_eq!(goblin.tags, vec!["goblinoid"]);
    assert_eq!(goblin.source, "lookup");
}

#[tokio::test]
async fn lookup_without_json_is_no_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("I am not sure what that is.")))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .lookup(ReferenceKind::Spell, "Glitterbolt")
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::NoRecord { .. }));
}

#[tokio::test]
async fn server_errors_surface_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .lookup(ReferenceKind::Item, "Rope")
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::Api { status: 429 }));
}

#[tokio::test]
async fn empty_choices_are_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .suggest("Round 1", "")
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::EmptyResponse));
}

#[tokio::test]
async fn suggest_sends_summary_and_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Ogre (creature) HP 30/59"))
        .and(body_string_contains("The bridge is collapsing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("1. Shove the ogre off the bridge.")))
        .expect(1)
        .mount(&server)
        .await;

    let text = client_for(&server)
        .suggest("Round 2\n> 1. Ogre (creature) HP 30/59 AC 11 Init 8 [alive]", "The bridge is collapsing")
        .await
        .unwrap();
    assert!(text.contains("Shove the ogre"));
}

#[tokio::test]
async fn unconfigured_client_never_calls_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("{}")))
        .expect(0)
        .mount(&server)
        .await;

    let client = ChatClient::new(LookupConfig::default().with_base_url(server.uri())).unwrap();
    let err = client
        .lookup(ReferenceKind::Creature, "Goblin")
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::NotConfigured));
}
