use std::time::Duration;

use ishaara::config::IshaaraConfig;
use ishaara::detector::SignLabel;
use ishaara::error::AssemblyError;
use ishaara::services::llm::{GeminiAssembler, SentenceAssembler};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const PATH: &str = "/v1/models/gemini-pro:generateContent";

/// One-shot HTTP server: answers a single request with `status` and `body`,
/// and hands back the raw request it received.
async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}{}", listener.local_addr().unwrap(), PATH);

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "Client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
        let content_length = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&buf).into_owned()
    });

    (endpoint, handle)
}

fn words(labels: &[&str]) -> Vec<SignLabel> {
    labels.iter().map(|l| SignLabel::new(*l)).collect()
}

fn completion(text: &str) -> String {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] }).to_string()
}

#[tokio::test]
async fn posts_prompt_with_key_and_returns_text() {
    let (endpoint, server) = serve_once("200 OK", completion("Hello, how are you?")).await;
    let assembler = GeminiAssembler::new(endpoint, "secret-key", Some(Duration::from_secs(5)));

    let result = assembler.assemble(words(&["hello", "how are you"])).await;
    assert_eq!(result, Ok("Hello, how are you?".to_string()));

    let request = server.await.unwrap();
    let request_line = request.lines().next().unwrap();
    assert!(
        request_line.starts_with(&format!("POST {}?key=secret-key ", PATH)),
        "Unexpected request line: {}",
        request_line
    );
    assert!(request.contains(": hello, how are you"), "Prompt missing from body");
}

#[tokio::test]
async fn empty_key_is_not_sent() {
    let (endpoint, server) = serve_once("200 OK", completion("Yes.")).await;
    let assembler = GeminiAssembler::new(endpoint, "", Some(Duration::from_secs(5)));

    assert_eq!(assembler.assemble(words(&["yes"])).await, Ok("Yes.".to_string()));
    let request = server.await.unwrap();
    assert!(!request.lines().next().unwrap().contains("key="));
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let (endpoint, server) = serve_once("503 Service Unavailable", "{}".to_string()).await;
    let assembler = GeminiAssembler::new(endpoint, "k", Some(Duration::from_secs(5)));

    let result = assembler.assemble(words(&["namaste"])).await;
    assert_eq!(result, Err(AssemblyError::Status(503)));
    server.await.unwrap();
}

#[tokio::test]
async fn lenient_config_reads_json_body_of_failed_status() {
    let (endpoint, server) = serve_once("500 Internal Server Error", r#"{"error": {"code": 500}}"#.to_string()).await;
    let config = IshaaraConfig {
        endpoint,
        api_key: "k".into(),
        request_timeout_ms: Some(5_000),
        empty_completion_is_error: false,
        ..IshaaraConfig::default()
    };
    let assembler = GeminiAssembler::from_config(&config);

    assert_eq!(assembler.assemble(words(&["namaste"])).await, Ok(String::new()));
    server.await.unwrap();
}

#[tokio::test]
async fn lenient_mode_keeps_status_for_non_json_body() {
    let (endpoint, server) = serve_once("502 Bad Gateway", "<html>bad gateway</html>".to_string()).await;
    let assembler =
        GeminiAssembler::new(endpoint, "k", Some(Duration::from_secs(5))).with_lenient_status(true);

    assert_eq!(assembler.assemble(words(&["namaste"])).await, Err(AssemblyError::Status(502)));
    server.await.unwrap();
}
