//! Server-sent event decoding for streamed chat completions

use serde_json::Value;

/// One decoded `data:` payload
#[derive(Debug, PartialEq)]
pub(super) enum StreamEvent {
    Content(String),
    Done,
}

/// Reassembles SSE lines split across network chunks.
///
/// Bytes are buffered until a full line arrives, so a UTF-8 sequence cut by a
/// chunk boundary is decoded once it is complete.
#[derive(Debug, Default)]
pub(super) struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Feed raw bytes, returning every complete event they finish
    pub(super) fn push(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = match std::str::from_utf8(&line) {
                Ok(line) => line.to_string(),
                Err(e) => {
                    tracing::warn!(
                        "invalid UTF-8 in stream at byte {}, replacing",
                        e.valid_up_to()
                    );
                    String::from_utf8_lossy(&line).into_owned()
                }
            };
            if let Some(event) = parse_line(line.trim_end()) {
                events.push(event);
            }
        }
        events
    }
}

fn parse_line(line: &str) -> Option<StreamEvent> {
    let data = line.strip_prefix("data:")?.trim_start();
    if data == "[DONE]" {
        return Some(StreamEvent::Done);
    }
    let json: Value = serde_json::from_str(data).ok()?;
    json["choices"][0]["delta"]["content"]
        .as_str()
        .map(|content| StreamEvent::Content(content.to_string()))
}
