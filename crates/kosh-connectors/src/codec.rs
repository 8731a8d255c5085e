//! Delimiter framing shared by every socket connector.
//!
//! Feed ports frame records with `\n`, output ports with `\r`. A read may
//! land mid-record, so framing works off a per-connection byte buffer:
//! everything up to the last delimiter splits into records, the partial
//! tail stays buffered for the next read.

/// Drain complete frames off the front of `buf`, leaving any partial
/// trailing record in place. Empty frames are skipped.
pub fn drain_frames(buf: &mut Vec<u8>, delimiter: u8) -> Vec<String> {
    let Some(last) = buf.iter().rposition(|&b| b == delimiter) else {
        return Vec::new();
    };
    let complete: Vec<u8> = buf.drain(..=last).collect();
    complete
        .split(|&b| b == delimiter)
        .map(|frame| String::from_utf8_lossy(frame).trim().to_string())
        .filter(|record| !record.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::drain_frames;

    #[test]
    fn partial_tail_stays_buffered() {
        let mut buf = b"one\ntwo\nthr".to_vec();
        assert_eq!(drain_frames(&mut buf, b'\n'), vec!["one", "two"]);
        assert_eq!(buf, b"thr");

        buf.extend_from_slice(b"ee\n");
        assert_eq!(drain_frames(&mut buf, b'\n'), vec!["three"]);
        assert!(buf.is_empty());
    }

    #[test]
    fn no_delimiter_yields_nothing() {
        let mut buf = b"incomplete".to_vec();
        assert!(drain_frames(&mut buf, b'\n').is_empty());
        assert_eq!(buf, b"incomplete");
    }

    #[test]
    fn carriage_return_framing() {
        let mut buf = b"a,b,c\rd,e,f\r".to_vec();
        assert_eq!(drain_frames(&mut buf, b'\r'), vec!["a,b,c", "d,e,f"]);
    }

    #[test]
    fn blank_frames_are_skipped() {
        let mut buf = b"one\n\n\ntwo\n".to_vec();
        assert_eq!(drain_frames(&mut buf, b'\n'), vec!["one", "two"]);
    }
}
