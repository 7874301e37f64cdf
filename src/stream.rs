//! Streamed reply assembly.
//!
//! The reply endpoint answers with an unframed body of UTF-8 text
//! fragments. The assembler reads it fragment by fragment and hands each
//! decoded piece to a callback, in arrival order, before reading on.

use std::sync::Arc;

use futures_util::StreamExt;

use crate::api::ChatApi;
use crate::error::StreamError;
use crate::models::LengthHint;
use crate::traits::HttpClient;

/// Incremental UTF-8 decoder for arbitrarily split byte fragments.
///
/// Incomplete trailing sequences are held until the next fragment;
/// invalid bytes become U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `bytes` (plus held-over bytes) as is complete.
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::new();

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    break;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    out.push_str(std::str::from_utf8(&self.pending[..valid]).unwrap_or_default());
                    match e.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + bad);
                        }
                        None => {
                            // Truncated sequence at the end; wait for more bytes.
                            self.pending.drain(..valid);
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Flush whatever is left once the body has ended.
    pub fn finish(&mut self) -> String {
        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        rest
    }

    /// Bytes held back waiting for the rest of a sequence.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Reads a streamed reply and delivers its text incrementally.
#[derive(Debug)]
pub struct StreamingAssembler<C: HttpClient> {
    api: Arc<ChatApi<C>>,
}

impl<C: HttpClient> Clone for StreamingAssembler<C> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

impl<C: HttpClient> StreamingAssembler<C> {
    pub fn new(api: Arc<ChatApi<C>>) -> Self {
        Self { api }
    }

    /// Send `message` and feed the reply to `on_chunk` as it arrives.
    ///
    /// Each non-empty decoded fragment is delivered before the next read.
    /// Fails if the reply has no body or a read fails midway; there is no
    /// retry, and text already delivered stays delivered.
    pub async fn stream<F>(
        &self,
        conversation_id: &str,
        message: &str,
        hint: LengthHint,
        mut on_chunk: F,
    ) -> Result<(), StreamError>
    where
        F: FnMut(&str),
    {
        let mut body = self
            .api
            .open_reply_stream(conversation_id, message, hint)
            .await?
            .ok_or(StreamError::NoBody)?;

        let mut decoder = Utf8ChunkDecoder::new();
        let mut fragments = 0usize;
        let mut bytes_read = 0usize;

        while let Some(next) = body.next().await {
            let bytes = next.map_err(|e| {
                tracing::warn!(conversation_id, fragments, error = %e, "Reply stream broke");
                StreamError::ReadFailed {
                    message: e.to_string(),
                }
            })?;

            bytes_read += bytes.len();
            let text = decoder.push(&bytes);
            if !text.is_empty() {
                fragments += 1;
                on_chunk(&text);
            }
        }

        let rest = decoder.finish();
        if !rest.is_empty() {
            fragments += 1;
            on_chunk(&rest);
        }

        tracing::debug!(conversation_id, fragments, bytes_read, "Reply stream ended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::traits::HttpError;
    use bytes::Bytes;

    const STREAM_URL: &str = "http://test/api/chat/1/stream?length=medium";

    fn assembler(client: MockHttpClient) -> StreamingAssembler<MockHttpClient> {
        StreamingAssembler::new(Arc::new(ChatApi::new(client, "http://test")))
    }

    #[test]
    fn test_decoder_passes_ascii_through() {
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.push(b"Hello"), "Hello");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_decoder_joins_split_sequence() {
        let bytes = "café ☕".as_bytes();
        let mut decoder = Utf8ChunkDecoder::new();
        // Split inside the three-byte cup.
        let split = bytes.len() - 1;
        let first = decoder.push(&bytes[..split]);
        assert_eq!(first, "café ");
        assert_eq!(decoder.pending_len(), 2);
        let second = decoder.push(&bytes[split..]);
        assert_eq!(second, "☕");
    }

    #[test]
    fn test_decoder_replaces_invalid_bytes() {
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.push(&[b'a', 0xFF, b'b']), "a\u{FFFD}b");
    }

    #[test]
    fn test_decoder_finish_flushes_truncated_tail() {
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.push(&[0xE2, 0x98]), "");
        assert_eq!(decoder.finish(), "\u{FFFD}");
        assert_eq!(decoder.finish(), "");
    }

    #[tokio::test]
    async fn test_chunks_delivered_in_order() {
        let client = MockHttpClient::new();
        client.set_response(STREAM_URL, MockResponse::text_stream(&["Hel", "lo, ", "world"]));

        let mut received = Vec::new();
        assembler(client)
            .stream("1", "Hi", LengthHint::Medium, |chunk| received.push(chunk.to_string()))
            .await
            .unwrap();

        assert_eq!(received, vec!["Hel", "lo, ", "world"]);
    }

    #[tokio::test]
    async fn test_empty_fragments_are_skipped() {
        let client = MockHttpClient::new();
        client.set_response(
            STREAM_URL,
            MockResponse::Stream(vec![Bytes::new(), Bytes::from("x"), Bytes::new()]),
        );

        let mut calls = 0;
        assembler(client)
            .stream("1", "Hi", LengthHint::Medium, |_| calls += 1)
            .await
            .unwrap();
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_missing_body_is_failure() {
        let client = MockHttpClient::new();
        client.set_response(STREAM_URL, MockResponse::NoBody);

        let result = assembler(client)
            .stream("1", "Hi", LengthHint::Medium, |_| {})
            .await;
        assert!(matches!(result, Err(StreamError::NoBody)));
    }

    #[tokio::test]
    async fn test_mid_stream_failure_after_partial_delivery() {
        let client = MockHttpClient::new();
        client.set_response(
            STREAM_URL,
            MockResponse::BrokenStream(
                vec![Bytes::from("partial")],
                HttpError::Io("connection reset".to_string()),
            ),
        );

        let mut received = String::new();
        let result = assembler(client)
            .stream("1", "Hi", LengthHint::Medium, |chunk| received.push_str(chunk))
            .await;

        assert_eq!(received, "partial");
        assert!(matches!(result, Err(StreamError::ReadFailed { .. })));
    }
}
