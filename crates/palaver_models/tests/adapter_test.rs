//! Tests for provider request building and response extraction.

use palaver_core::{Role, TokenUsageData, TurnMessage};
use palaver_models::{
    ANTHROPIC_VERSION, FamilyAdapter, GenerationParams, ModelFamily, ProviderAdapter,
};
use palaver_error::{InferenceErrorKind, PalaverErrorKind};
use serde_json::json;
use strum::IntoEnumIterator;

fn turns() -> Vec<TurnMessage> {
    vec![
        TurnMessage::new(Role::User, "hi"),
        TurnMessage::new(Role::Assistant, "hello"),
        TurnMessage::new(Role::User, "how are you?"),
    ]
}

#[test]
fn test_classification_table() {
    let cases = [
        ("anthropic.claude-3-haiku-20240307-v1:0", ModelFamily::AnthropicClaude),
        ("us.anthropic.claude-3-5-sonnet-20241022-v2:0", ModelFamily::AnthropicClaude),
        ("amazon.titan-text-express-v1", ModelFamily::AmazonTitan),
        ("amazon.nova-lite-v1:0", ModelFamily::AmazonNova),
        ("meta.llama3-70b-instruct-v1:0", ModelFamily::MetaLlama),
        ("cohere.command-text-v14", ModelFamily::Generic),
        ("", ModelFamily::Generic),
    ];
    for (model_id, family) in cases {
        assert_eq!(ModelFamily::classify(model_id), family, "model {model_id:?}");
    }
}

#[test]
fn test_every_family_has_a_table_row() {
    for family in ModelFamily::iter() {
        assert_eq!(FamilyAdapter::for_family(family).family, family);
    }
}

#[test]
fn test_claude_request_shape() {
    let adapter = ProviderAdapter::for_model("anthropic.claude-3-haiku-20240307-v1:0");
    let body = adapter
        .build_request(
            &[TurnMessage::new(Role::User, "hi")],
            &GenerationParams::new(50, 0.5),
        )
        .expect("serializable");

    assert_eq!(
        body,
        json!({
            "anthropic_version": ANTHROPIC_VERSION,
            "messages": [{ "role": "user", "content": "hi" }],
            "max_tokens": 50,
            "temperature": 0.5,
        })
    );
}

#[test]
fn test_platform_role_goes_out_as_user() {
    let adapter = ProviderAdapter::for_model("anthropic.claude-v2");
    let body = adapter
        .build_request(
            &[TurnMessage::new(Role::Platform, "notice")],
            &GenerationParams::default(),
        )
        .expect("serializable");

    assert_eq!(body["messages"][0]["role"], "user");
}

#[test]
fn test_platform_role_goes_out_as_user_for_every_family() {
    let turns = [
        TurnMessage::new(Role::Platform, "notice"),
        TurnMessage::new(Role::User, "hi"),
    ];
    let params = GenerationParams::default();
    let body = |model: &str| {
        ProviderAdapter::for_model(model)
            .build_request(&turns, &params)
            .expect("serializable")
    };

    let claude = body("anthropic.claude-v2");
    assert_eq!(claude["messages"][0]["role"], "user");
    let nova = body("amazon.nova-lite-v1:0");
    assert_eq!(nova["messages"][0]["role"], "user");

    let flattened = "user: notice\nuser: hi";
    assert_eq!(body("amazon.titan-text-lite-v1")["inputText"], flattened);
    assert_eq!(body("meta.llama3-8b-instruct-v1:0")["prompt"], flattened);
    assert_eq!(body("mistral.mistral-7b-instruct-v0:2")["prompt"], flattened);
}

#[test]
fn test_titan_request_shape() {
    let adapter = ProviderAdapter::for_model("amazon.titan-text-lite-v1");
    let body = adapter
        .build_request(&turns(), &GenerationParams::new(200, 0.7))
        .expect("serializable");

    assert_eq!(
        body,
        json!({
            "inputText": "user: hi\nassistant: hello\nuser: how are you?",
            "textGenerationConfig": {
                "maxTokenCount": 200,
                "temperature": 0.7,
                "topP": 0.9,
            },
        })
    );
}

#[test]
fn test_nova_request_shape() {
    let adapter = ProviderAdapter::for_model("amazon.nova-pro-v1:0");
    let body = adapter
        .build_request(&turns()[..2], &GenerationParams::new(10, 0.1))
        .expect("serializable");

    assert_eq!(
        body,
        json!({
            "inferenceConfig": { "max_new_tokens": 10, "temperature": 0.1 },
            "messages": [
                { "role": "user", "content": [{ "text": "hi" }] },
                { "role": "assistant", "content": [{ "text": "hello" }] },
            ],
        })
    );
}

#[test]
fn test_llama_and_generic_request_shapes() {
    let params = GenerationParams::new(300, 0.9);

    let llama = ProviderAdapter::for_model("meta.llama2-13b-chat-v1")
        .build_request(&turns()[..1], &params)
        .expect("serializable");
    assert_eq!(
        llama,
        json!({ "prompt": "user: hi", "max_gen_len": 300, "temperature": 0.9 })
    );

    let generic = ProviderAdapter::for_model("mistral.mixtral-8x7b-instruct-v0:1")
        .build_request(&turns()[..1], &params)
        .expect("serializable");
    assert_eq!(
        generic,
        json!({ "prompt": "user: hi", "max_tokens": 300, "temperature": 0.9 })
    );
}

#[test]
fn test_claude_extraction() {
    let adapter = ProviderAdapter::for_model("anthropic.claude-instant-v1");
    let body = json!({
        "content": [{ "type": "text", "text": "first" }, { "type": "text", "text": "second" }],
        "usage": { "input_tokens": 12, "output_tokens": 3 },
    });

    assert_eq!(adapter.extract_text(&body).expect("claude shape"), "first");
    assert_eq!(adapter.extract_usage(&body), Some(TokenUsageData::new(12, 3)));
}

#[test]
fn test_claude_without_content_is_malformed() {
    let adapter = ProviderAdapter::for_model("anthropic.claude-instant-v1");
    let err = adapter.extract_text(&json!({ "content": [] })).unwrap_err();

    match err.kind() {
        PalaverErrorKind::Inference(e) => {
            assert!(matches!(e.kind, InferenceErrorKind::MalformedResponse(_)))
        }
        other => panic!("expected inference error, got {other:?}"),
    }
}

#[test]
fn test_titan_extraction() {
    let adapter = ProviderAdapter::for_model("amazon.titan-text-express-v1");
    let body = json!({
        "inputTextTokenCount": 7,
        "results": [{ "outputText": "answer", "tokenCount": 2, "completionReason": "FINISH" }],
    });

    assert_eq!(adapter.extract_text(&body).expect("titan shape"), "answer");
    assert_eq!(adapter.extract_usage(&body), Some(TokenUsageData::new(7, 2)));
    assert!(adapter.extract_text(&json!({ "results": [] })).is_err());
}

#[test]
fn test_nova_extraction_accepts_both_shapes() {
    let adapter = ProviderAdapter::for_model("amazon.nova-micro-v1:0");

    let single = json!({
        "output": { "message": { "role": "assistant", "content": [{ "text": "a" }, { "text": "b" }] } },
        "usage": { "inputTokens": 5, "outputTokens": 9 },
    });
    assert_eq!(adapter.extract_text(&single).expect("nova"), "a\nb");
    assert_eq!(adapter.extract_usage(&single), Some(TokenUsageData::new(5, 9)));

    let listed = json!({ "messages": [{ "role": "assistant", "content": [{ "text": "c" }] }] });
    assert_eq!(adapter.extract_text(&listed).expect("nova"), "c");
    assert_eq!(adapter.extract_usage(&listed), None);

    let unknown = json!({ "something": "else" });
    assert_eq!(adapter.extract_text(&unknown).expect("nova"), "");
}

#[test]
fn test_llama_extraction() {
    let adapter = ProviderAdapter::for_model("meta.llama3-8b-instruct-v1:0");
    let body = json!({
        "generation": "llama says hi",
        "prompt_token_count": 4,
        "generation_token_count": 6,
        "stop_reason": "stop",
    });

    assert_eq!(adapter.extract_text(&body).expect("llama"), "llama says hi");
    assert_eq!(adapter.extract_usage(&body), Some(TokenUsageData::new(4, 6)));
    assert!(adapter.extract_text(&json!({})).is_err());
}

#[test]
fn test_generic_extraction_fallbacks() {
    let adapter = ProviderAdapter::for_model("ai21.j2-ultra-v1");

    let text = |body| adapter.extract_text(&body).expect("generic never fails");
    assert_eq!(text(json!({ "generated_text": "g" })), "g");
    assert_eq!(text(json!({ "completion": "c" })), "c");
    assert_eq!(text(json!({ "generated_text": "", "completion": "c" })), "c");
    assert_eq!(text(json!({ "other": 1 })), "");
    assert_eq!(text(json!([1, 2, 3])), "");
    assert_eq!(adapter.extract_usage(&json!({ "generated_text": "g" })), None);
}

#[test]
fn test_sample_responses_extract_back_to_their_text() {
    let models = [
        "anthropic.claude-v2",
        "amazon.titan-text-express-v1",
        "amazon.nova-lite-v1:0",
        "meta.llama3-8b-instruct-v1:0",
        "unknown.model",
    ];
    for model in models {
        let adapter = ProviderAdapter::for_model(model);
        let body = adapter.sample_response("<metadata>{\"k\":1}</metadata>Hi");
        assert_eq!(
            adapter.extract_text(&body).expect("sample shape"),
            "<metadata>{\"k\":1}</metadata>Hi",
            "model {model}"
        );
    }
}
