// Tests for output formatting of responses and race orders

use super::*;
use serde_json::json;
use std::sync::{Arc, Mutex};

fn response(payload: serde_json::Value) -> ProviderResponse {
    serde_json::from_value(json!({
        "payload": payload,
        "provider": "p1",
        "responseStatus": 200,
        "responseHeaders": { "x-id": "7" }
    }))
    .unwrap()
}

/// Writer whose contents stay readable after the output writer takes it
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_response_json_shape() {
    let formatted = OutputFormat::Json
        .format_response(&response(json!({ "a": 1 })))
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&formatted).unwrap();
    assert_eq!(
        value,
        json!({
            "payload": { "a": 1 },
            "provider": "p1",
            "responseStatus": 200,
            "responseHeaders": { "x-id": "7" }
        })
    );
}

#[test]
fn test_response_yaml() {
    let formatted = OutputFormat::Yaml
        .format_response(&response(json!({ "a": 1 })))
        .unwrap();

    assert!(formatted.contains("provider: p1"));
    assert!(formatted.contains("responseStatus: 200"));
}

#[test]
fn test_response_human() {
    let formatted = OutputFormat::Human
        .format_response(&response(json!({ "$text": "plain answer" })))
        .unwrap();

    assert!(formatted.contains("Provider: p1"));
    assert!(formatted.contains("Status:   200"));
    assert!(formatted.contains("  x-id: 7"));
    assert!(formatted.ends_with("plain answer"));
}

#[test]
fn test_order_human() {
    let entries = vec![
        OrderEntry {
            position: 0,
            name: "mirror".to_string(),
            method: "GET".to_string(),
            url: "https://b.example.com/rates".to_string(),
            priority: Some(0),
            headers: vec![("Authorization".to_string(), "***".to_string())],
        },
        OrderEntry {
            position: 1,
            name: "primary".to_string(),
            method: "GET".to_string(),
            url: "https://a.example.com/rates".to_string(),
            priority: None,
            headers: Vec::new(),
        },
    ];

    let formatted = OutputFormat::Human.format_order(&entries).unwrap();
    assert_eq!(
        formatted,
        "0. mirror (priority 0) GET https://b.example.com/rates\n     Authorization: ***\n1. primary GET https://a.example.com/rates"
    );

    assert_eq!(OutputFormat::Human.format_order(&[]).unwrap(), "No providers");
}

#[test]
fn test_writer_sections_only_for_human() {
    let buffer = SharedBuffer::default();
    let mut output =
        OutputWriter::with_writer(OutputFormat::Json, false, false, Box::new(buffer.clone()));
    output.section("Response").unwrap();
    output.success("done").unwrap();
    assert_eq!(buffer.contents(), "");

    let buffer = SharedBuffer::default();
    let mut output =
        OutputWriter::with_writer(OutputFormat::Human, false, false, Box::new(buffer.clone()));
    output.section("Response").unwrap();
    output.success("done").unwrap();
    assert_eq!(buffer.contents(), "=== Response ===\ndone\n");
}

#[test]
fn test_writer_single_trailing_newline() {
    let buffer = SharedBuffer::default();
    let mut output =
        OutputWriter::with_writer(OutputFormat::Yaml, false, false, Box::new(buffer.clone()));
    output.response(&response(json!({}))).unwrap();

    let contents = buffer.contents();
    assert!(contents.ends_with('\n'));
    assert!(!contents.ends_with("\n\n"));
}
