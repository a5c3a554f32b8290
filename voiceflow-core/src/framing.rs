use crate::command::Command;
use crate::error::DecodeError;
use crate::message::WorkerMessage;

/// The wire protocol is one JSON object per line in both directions.
pub const RECORD_SEPARATOR: u8 = b'\n';

/// Encodes one command as a single self-terminated record, suitable for one
/// write to the worker's stdin.
pub fn encode_command(command: &Command) -> Vec<u8> {
    // A Command is a struct of JSON-native types; serialization cannot fail.
    let mut out = serde_json::to_vec(command).expect("command serializes to JSON");
    out.push(RECORD_SEPARATOR);
    out
}

/// Incremental decoder for the worker's stdout.
///
/// `feed` may be called with arbitrarily split chunks; records spanning chunk
/// boundaries are reassembled, and an incomplete trailing record is buffered
/// for the next call. A complete line that does not parse is reported as an
/// `Err` entry and never stops decoding of later records.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Result<WorkerMessage, DecodeError>> {
        self.buf.extend_from_slice(chunk);

        let mut out = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == RECORD_SEPARATOR) {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = trim_record(&line[..pos]);

            if line.is_empty() {
                continue;
            }
            out.push(decode_record(line));
        }
        out
    }

    /// Bytes of an incomplete trailing record currently buffered.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

fn trim_record(line: &[u8]) -> &[u8] {
    // Tolerate CRLF and stray whitespace around a record.
    let start = line
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(line.len());
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &line[start..end]
}

fn decode_record(line: &[u8]) -> Result<WorkerMessage, DecodeError> {
    let text = std::str::from_utf8(line).map_err(|_| DecodeError::InvalidUtf8)?;
    let msg: WorkerMessage =
        serde_json::from_str(text).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;

    match (msg.result.is_some(), msg.error.is_some()) {
        (false, false) => Err(DecodeError::MissingPayload),
        (true, true) => Err(DecodeError::AmbiguousPayload),
        _ => Ok(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_messages(decoded: Vec<Result<WorkerMessage, DecodeError>>) -> Vec<WorkerMessage> {
        decoded.into_iter().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn encode_produces_one_terminated_record() {
        let bytes = encode_command(&Command::transcribe("a.wav"));
        assert_eq!(bytes.last(), Some(&RECORD_SEPARATOR));
        assert_eq!(bytes.iter().filter(|&&b| b == RECORD_SEPARATOR).count(), 1);

        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["command"], "transcribe");
        assert_eq!(value["args"][0], "a.wav");
        assert!(value["kwargs"].as_object().unwrap().is_empty());
    }

    #[test]
    fn decodes_a_stream_of_records() {
        let mut decoder = FrameDecoder::new();
        let decoded = decoder.feed(b"{\"result\":\"hello\"}\n{\"error\":\"mic not found\"}\n");
        assert_eq!(
            ok_messages(decoded),
            vec![
                WorkerMessage::result("hello"),
                WorkerMessage::error("mic not found"),
            ]
        );
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn reassembles_records_split_across_chunks() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.feed(b"{\"result\":\"he").is_empty());
        assert!(decoder.pending() > 0);

        let decoded = decoder.feed(b"llo\"}\n");
        assert_eq!(ok_messages(decoded), vec![WorkerMessage::result("hello")]);
    }

    #[test]
    fn chunk_boundary_invariance_byte_by_byte() {
        let stream = b"{\"result\":\"one\"}\n{\"result\":\"two\"}\n{\"error\":\"boom\"}\n";

        let mut whole = FrameDecoder::new();
        let expected = ok_messages(whole.feed(stream));

        let mut split = FrameDecoder::new();
        let mut collected = Vec::new();
        for byte in stream {
            collected.extend(split.feed(std::slice::from_ref(byte)));
        }
        assert_eq!(ok_messages(collected), expected);
        assert_eq!(expected.len(), 3);
    }

    #[test]
    fn malformed_line_between_records_is_isolated() {
        let mut decoder = FrameDecoder::new();
        let decoded = decoder.feed(b"{\"result\":\"a\"}\nRecording...\n{\"result\":\"b\"}\n");

        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[0], Ok(WorkerMessage::result("a")));
        assert!(matches!(decoded[1], Err(DecodeError::InvalidJson(_))));
        assert_eq!(decoded[2], Ok(WorkerMessage::result("b")));
    }

    #[test]
    fn empty_and_crlf_lines_are_skipped() {
        let mut decoder = FrameDecoder::new();
        let decoded = decoder.feed(b"\n\r\n{\"result\":\"x\"}\r\n");
        assert_eq!(ok_messages(decoded), vec![WorkerMessage::result("x")]);
    }

    #[test]
    fn payload_contract_is_enforced() {
        let mut decoder = FrameDecoder::new();
        let decoded = decoder.feed(b"{}\n{\"result\":\"a\",\"error\":\"b\"}\n");
        assert_eq!(decoded[0], Err(DecodeError::MissingPayload));
        assert_eq!(decoded[1], Err(DecodeError::AmbiguousPayload));
    }

    #[test]
    fn non_utf8_line_is_a_decode_error() {
        let mut decoder = FrameDecoder::new();
        let decoded = decoder.feed(b"\xff\xfe\n{\"result\":\"ok\"}\n");
        assert_eq!(decoded[0], Err(DecodeError::InvalidUtf8));
        assert_eq!(decoded[1], Ok(WorkerMessage::result("ok")));
    }

    #[test]
    fn command_round_trips_through_the_wire_format() {
        let command = Command::transcribe_base64("QUJD", "audio/wav");
        let bytes = encode_command(&command);
        let parsed: Command = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, command);
    }
}
