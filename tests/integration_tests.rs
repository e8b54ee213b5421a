//! Integration tests for the twinchat library.
//! These tests run against a scripted HTTP stub on the loopback interface;
//! no real backend is required.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;
    use tokio_test::assert_ok;

    use twinchat::TwinClient;
    use twinchat::chat::{ChatWidget, Renderer, TURN_FAILED_MESSAGE};
    use twinchat::types::{ChatRequest, Message, MessageRole, TranscriptEntry};

    /// Serves one scripted response per accepted connection and returns the
    /// raw requests it saw. Responses carry `Connection: close` so the
    /// client opens a fresh connection for every exchange.
    async fn spawn_stub(responses: Vec<String>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        let handle = tokio::spawn(async move {
            let mut captured = Vec::new();
            for response in responses {
                let (mut socket, _) = listener.accept().await.expect("accept");
                captured.push(read_http_request(&mut socket).await);
                socket
                    .write_all(response.as_bytes())
                    .await
                    .expect("write response");
                socket.shutdown().await.ok();
            }
            captured
        });
        (format!("http://{}", addr), handle)
    }

    /// Reads one HTTP/1.1 request: headers, then a Content-Length body.
    async fn read_http_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.expect("read request");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(header_end) = find_double_crlf(&buf) {
                let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
                let content_length = parse_content_length(&headers).unwrap_or(0);
                let body_start = header_end + 4;
                while buf.len() < body_start + content_length {
                    let n = socket.read(&mut chunk).await.expect("read body");
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
                break;
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn find_double_crlf(buf: &[u8]) -> Option<usize> {
        buf.windows(4).position(|window| window == b"\r\n\r\n")
    }

    fn parse_content_length(headers: &str) -> Option<usize> {
        headers.lines().find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse().ok()
            } else {
                None
            }
        })
    }

    fn json_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    /// Returns a base URL on which nothing is listening.
    async fn refused_base_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);
        format!("http://{}", addr)
    }

    /// Renderer that records view events instead of printing.
    #[derive(Default)]
    struct RecordingRenderer {
        events: Vec<String>,
    }

    impl Renderer for RecordingRenderer {
        fn render_greeting(&mut self) {
            self.events.push("greeting".to_string());
        }

        fn message_appended(&mut self, message: &Message) {
            self.events.push(format!("append:{}", message.role));
        }

        fn typing_started(&mut self) {
            self.events.push("typing:on".to_string());
        }

        fn typing_finished(&mut self) {
            self.events.push("typing:off".to_string());
        }

        fn render_transcript(&mut self, entries: &[TranscriptEntry]) {
            self.events.push(format!("transcript:{}", entries.len()));
        }

        fn print_info(&mut self, info: &str) {
            self.events.push(format!("info:{info}"));
        }

        fn print_error(&mut self, error: &str) {
            self.events.push(format!("error:{error}"));
        }
    }

    #[tokio::test]
    async fn chat_round_trip_establishes_session() {
        let (base_url, handle) = spawn_stub(vec![json_response(
            "200 OK",
            r#"{"response": "Hi there", "session_id": "abc"}"#,
        )])
        .await;
        let client = TwinClient::with_options(Some(base_url), None).expect("client");

        let reply = assert_ok!(client.chat(ChatRequest::new("Hello")).await);
        assert_eq!(reply.response, "Hi there");
        assert_eq!(reply.session_id, "abc");

        let captured = handle.await.expect("stub");
        assert!(captured[0].starts_with("POST /chat HTTP/1.1"));
        assert!(captured[0].contains(r#""message":"Hello""#));
        assert!(!captured[0].contains("session_id"));
    }

    #[tokio::test]
    async fn established_session_id_is_echoed_on_the_wire() {
        let (base_url, handle) = spawn_stub(vec![
            json_response("200 OK", r#"{"response": "Hi there", "session_id": "abc"}"#),
            json_response("200 OK", r#"{"response": "Sure", "session_id": "abc"}"#),
        ])
        .await;
        let client = TwinClient::with_options(Some(base_url), None).expect("client");

        assert_ok!(client.chat(ChatRequest::new("Hello")).await);
        assert_ok!(
            client
                .chat(ChatRequest::new("Tell me more").with_session_id("abc"))
                .await
        );

        let captured = handle.await.expect("stub");
        assert!(!captured[0].contains("session_id"));
        assert!(captured[1].contains(r#""session_id":"abc""#));
    }

    #[tokio::test]
    async fn backend_error_maps_to_api_error() {
        let (base_url, handle) = spawn_stub(vec![json_response(
            "500 Internal Server Error",
            r#"{"detail": "Bedrock error: model unavailable"}"#,
        )])
        .await;
        let client = TwinClient::with_options(Some(base_url), None).expect("client");

        let error = client.chat(ChatRequest::new("Hello")).await.unwrap_err();
        assert!(error.is_api());
        assert_eq!(error.status_code(), Some(500));
        assert!(error.to_string().contains("model unavailable"));

        handle.await.expect("stub");
    }

    #[tokio::test]
    async fn structured_detail_is_stringified() {
        let (base_url, handle) = spawn_stub(vec![json_response(
            "422 Unprocessable Entity",
            r#"{"detail": [{"loc": ["body", "message"], "msg": "field required"}]}"#,
        )])
        .await;
        let client = TwinClient::with_options(Some(base_url), None).expect("client");

        let error = client.chat(ChatRequest::new("Hello")).await.unwrap_err();
        assert_eq!(error.status_code(), Some(422));
        assert!(error.to_string().contains("field required"));

        handle.await.expect("stub");
    }

    #[tokio::test]
    async fn malformed_reply_is_a_serialization_error() {
        let (base_url, handle) =
            spawn_stub(vec![json_response("200 OK", "this is not json")]).await;
        let client = TwinClient::with_options(Some(base_url), None).expect("client");

        let error = client.chat(ChatRequest::new("Hello")).await.unwrap_err();
        assert!(error.is_serialization());

        handle.await.expect("stub");
    }

    #[tokio::test]
    async fn refused_connection_is_a_connection_error() {
        let base_url = refused_base_url().await;
        let client = TwinClient::with_options(Some(base_url), None).expect("client");

        let error = client.chat(ChatRequest::new("Hello")).await.unwrap_err();
        assert!(error.is_connection());
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let _ = read_http_request(&mut socket).await;
            tokio::time::sleep(Duration::from_secs(5)).await;
            let _ = socket
                .write_all(json_response("200 OK", "{}").as_bytes())
                .await;
        });
        let client = TwinClient::with_options(
            Some(format!("http://{}", addr)),
            Some(Duration::from_millis(250)),
        )
        .expect("client");

        let error = client.chat(ChatRequest::new("Hello")).await.unwrap_err();
        assert!(error.is_timeout());
    }

    #[tokio::test]
    async fn widget_turn_against_a_live_stub() {
        let (base_url, handle) = spawn_stub(vec![json_response(
            "200 OK",
            r#"{"response": "Hi there", "session_id": "abc"}"#,
        )])
        .await;
        let client = TwinClient::with_options(Some(base_url), None).expect("client");
        let mut renderer = RecordingRenderer::default();
        let mut widget = ChatWidget::new();

        widget.set_input("Hello");
        let outcome = widget.submit_turn(&client, &mut renderer).await;

        assert!(outcome.is_replied());
        assert_eq!(widget.message_count(), 2);
        assert_eq!(widget.messages()[0].role, MessageRole::User);
        assert_eq!(widget.messages()[1].content, "Hi there");
        assert_eq!(widget.session_id(), Some("abc"));
        assert!(!widget.is_awaiting_response());
        assert_eq!(
            renderer.events,
            vec!["append:user", "typing:on", "typing:off", "append:assistant"]
        );

        handle.await.expect("stub");
    }

    #[tokio::test]
    async fn widget_turn_against_a_dead_backend_appends_fallback() {
        let base_url = refused_base_url().await;
        let client = TwinClient::with_options(Some(base_url), None).expect("client");
        let mut renderer = RecordingRenderer::default();
        let mut widget = ChatWidget::new();

        widget.set_input("Hello");
        let outcome = widget.submit_turn(&client, &mut renderer).await;

        assert!(outcome.is_failed());
        assert_eq!(widget.message_count(), 2);
        assert_eq!(widget.messages()[1].content, TURN_FAILED_MESSAGE);
        assert!(widget.session_id().is_none());
        assert!(!widget.is_awaiting_response());
    }

    #[tokio::test]
    async fn service_info_probe_hits_the_root_route() {
        let (base_url, handle) = spawn_stub(vec![json_response(
            "200 OK",
            r#"{"message": "AI Digital Twin API", "memory_enabled": true, "storage": "local", "ai_model": "amazon.nova-lite-v1:0"}"#,
        )])
        .await;
        let client = TwinClient::with_options(Some(base_url), None).expect("client");

        let info = assert_ok!(client.service_info().await);
        assert_eq!(info.message, "AI Digital Twin API");
        assert_eq!(info.storage.as_deref(), Some("local"));

        let captured = handle.await.expect("stub");
        assert!(captured[0].starts_with("GET / HTTP/1.1"));
    }

    #[tokio::test]
    async fn health_probe_hits_the_health_route() {
        let (base_url, handle) = spawn_stub(vec![json_response(
            "200 OK",
            r#"{"status": "healthy", "use_s3": false, "bedrock_model": "amazon.nova-lite-v1:0"}"#,
        )])
        .await;
        let client = TwinClient::with_options(Some(base_url), None).expect("client");

        let health = assert_ok!(client.health().await);
        assert!(health.is_healthy());

        let captured = handle.await.expect("stub");
        assert!(captured[0].starts_with("GET /health HTTP/1.1"));
    }

    #[tokio::test]
    async fn conversation_history_parses_naive_timestamps() {
        let (base_url, handle) = spawn_stub(vec![json_response(
            "200 OK",
            r#"{"session_id": "abc", "messages": [
                {"role": "user", "content": "Hello", "timestamp": "2026-08-23T14:31:22.123456"},
                {"role": "assistant", "content": "Hi there", "timestamp": "2026-08-23T14:31:24"}
            ]}"#,
        )])
        .await;
        let client = TwinClient::with_options(Some(base_url), None).expect("client");

        let history = assert_ok!(client.conversation("abc").await);
        assert_eq!(history.session_id, "abc");
        assert_eq!(history.messages.len(), 2);
        assert_eq!(history.messages[0].role, MessageRole::User);
        assert_eq!(history.messages[1].content, "Hi there");

        let captured = handle.await.expect("stub");
        assert!(captured[0].starts_with("GET /conversation/abc HTTP/1.1"));
    }
}
