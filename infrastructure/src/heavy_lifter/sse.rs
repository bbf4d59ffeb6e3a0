//! Minimal server-sent-events decoder for `streamGenerateContent?alt=sse`.
//!
//! Only `data:` lines are meaningful for this API; comments, `event:` and
//! blank separator lines are dropped. Network chunks may split lines (and
//! UTF-8 sequences) anywhere, so bytes are buffered until a newline arrives.

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a network chunk, returning the payloads of completed `data:` lines.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut payloads = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(payload) = data_payload(&line) {
                payloads.push(payload);
            }
        }
        payloads
    }

    /// Flush a final line that arrived without a trailing newline.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        data_payload(&rest)
    }
}

fn data_payload(line: &[u8]) -> Option<String> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim_end_matches(['\r', '\n']);
    let payload = line.strip_prefix("data:")?;
    let payload = payload.strip_prefix(' ').unwrap_or(payload);
    if payload.is_empty() || payload == "[DONE]" {
        None
    } else {
        Some(payload.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_lines() {
        let mut decoder = SseDecoder::new();
        let out = decoder.push(b"data: {\"a\":1}\r\n\r\ndata: {\"b\":2}\n\n");
        assert_eq!(out, vec!["{\"a\":1}", "{\"b\":2}"]);
        assert!(decoder.finish().is_none());
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"te").is_empty());
        assert_eq!(decoder.push(b"xt\":\"hi\"}\n"), vec!["{\"text\":\"hi\"}"]);
    }

    #[test]
    fn test_utf8_split_across_chunks() {
        let bytes = "data: café\n".as_bytes();
        let (a, b) = bytes.split_at(bytes.len() - 2);
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(a).is_empty());
        assert_eq!(decoder.push(b), vec!["café"]);
    }

    #[test]
    fn test_ignores_non_data_lines() {
        let mut decoder = SseDecoder::new();
        let out = decoder.push(b": keepalive\nevent: message\ndata: x\ndata: [DONE]\n");
        assert_eq!(out, vec!["x"]);
    }

    #[test]
    fn test_finish_flushes_trailing_line() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: tail").is_empty());
        assert_eq!(decoder.finish().as_deref(), Some("tail"));
    }
}
