//! Integration tests for the advisor chain around a stubbed model call
//!
//! No network involved: the outbound call is replaced with a canned
//! response so the observable logging contract can be checked end to end.

use sage_core::{
    AdvisorChain, ChatLoggerAdvisor, ChatRequest, ChatResponse, Choice, Message, ResponseMessage,
    Role, TokenUsageAdvisor, Usage,
};
use std::io;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Collects formatted log output so log lines can be asserted on
#[derive(Clone, Default)]
struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl CaptureWriter {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn canned_response(usage: Option<Usage>) -> ChatResponse {
    ChatResponse {
        choices: vec![Choice {
            message: ResponseMessage {
                content: "Paris.".to_string(),
                role: Some(Role::Assistant),
            },
            index: 0,
            finish_reason: Some("stop".to_string()),
        }],
        usage,
    }
}

fn run_exchange(usage: Option<Usage>) -> String {
    let writer = CaptureWriter::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");

        rt.block_on(async {
            let chain = AdvisorChain::new()
                .with(TokenUsageAdvisor::new().unwrap().order(1))
                .with(ChatLoggerAdvisor::new().order(2));

            let request = ChatRequest::new(
                "openai/gpt-4o-mini",
                vec![
                    Message::system("You are a helpful AI assistant."),
                    Message::user("What is the capital of France?"),
                ],
            );

            let response = chain
                .around(request, |_| async move { Ok(canned_response(usage)) })
                .await
                .unwrap();
            assert_eq!(response.content(), Some("Paris."));
        });
    });

    writer.contents()
}

#[test]
fn test_exchange_logs_request_estimate_line() {
    let output = run_exchange(None);
    let line = output
        .lines()
        .find(|l| l.contains("Request: "))
        .expect("request line should be logged");
    assert!(line.contains("Request: 2 messages ~ "));
    assert!(line.trim_end().ends_with(" tokens."));
}

#[test]
fn test_exchange_logs_exact_usage_line() {
    let output = run_exchange(Some(Usage {
        prompt_tokens: 12,
        completion_tokens: 8,
        total_tokens: 20,
    }));
    assert!(
        output.contains("Response: promptTokens = 12, completionTokens = 8, totalTokens = 20."),
        "missing usage line in: {output}"
    );
}

#[test]
fn test_exchange_without_usage_logs_sentinel() {
    let output = run_exchange(None);
    assert!(
        output.contains("Response: usage metadata unavailable."),
        "missing sentinel line in: {output}"
    );
}

#[test]
fn test_logger_advisor_dumps_bodies() {
    let output = run_exchange(None);
    assert!(output.contains("What is the capital of France?"));
    assert!(output.contains("Paris."));
}
