mod harness;

use std::sync::Arc;

use harness::mock_backend::MockBackend;
use harness::provider_config;
use lingua_config::ProviderType;
use lingua_llm::types::Message;
use lingua_llm::{ChatRequest, Provider, build_provider};
use serde_json::json;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_adapter_serves_concurrent_callers() {
    let mock = MockBackend::start(json!({
        "content": [{"type": "text", "text": "pong"}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 3, "output_tokens": 1}
    }))
    .await
    .unwrap();
    let provider: Arc<dyn Provider> =
        build_provider("claude", &provider_config(ProviderType::Anthropic, mock.base_url("v1"))).unwrap();

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let provider = Arc::clone(&provider);
            tokio::spawn(async move {
                let request = ChatRequest::new("claude-sonnet-4-20250514", vec![Message::user(format!("ping {i}"))]);
                provider.chat_completions_create(&request).await
            })
        })
        .collect();

    for task in tasks {
        let response = task.await.unwrap().unwrap();
        assert_eq!(response.choices[0].message.content, "pong");
        assert_eq!(response.usage.unwrap().total_tokens, 4);
    }

    assert_eq!(mock.request_count(), 16);

    let mut prompts: Vec<String> = mock
        .requests()
        .iter()
        .map(|r| r.body["messages"][0]["content"].as_str().unwrap().to_owned())
        .collect();
    prompts.sort();
    prompts.dedup();
    assert_eq!(prompts.len(), 16);
}
