//! Streaming framer for watch connections.
//!
//! CBOR items are self-delimited, so frames carry no length prefix: a frame
//! boundary is simply the end of one complete data item. Bytes are fed in as
//! they arrive and one frame is handed back per read; a partial trailing
//! item stays buffered for the next read.

use crate::decoder::CborDecoder;
use crate::error::CborError;
use crate::modes;

#[derive(Default)]
pub struct CborFramer {
    buf: Vec<u8>,
}

impl CborFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends bytes read from the stream.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Returns the next complete frame, or `None` when more bytes are
    /// needed. Buffered bytes that can never form a valid item surface the
    /// decode error.
    pub fn read_frame(&mut self) -> Result<Option<Vec<u8>>, CborError> {
        if self.buf.is_empty() {
            return Ok(None);
        }
        match CborDecoder::new(modes::LAX).decode_first(&self.buf) {
            Ok((_, consumed)) => Ok(Some(self.buf.drain(..consumed).collect())),
            Err(CborError::UnexpectedEof) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CborFramer;
    use crate::constants::SELF_DESCRIBED_PREFIX;
    use crate::error::CborError;

    #[test]
    fn frames_are_item_boundaries() {
        let mut framer = CborFramer::new();
        // Two self-described frames arriving in one burst.
        let mut stream = Vec::new();
        for frame in [&hex::decode("d9d9f70a").unwrap(), &hex::decode("d9d9f783010203").unwrap()] {
            stream.extend_from_slice(frame);
        }
        framer.push(&stream);
        assert_eq!(framer.read_frame().unwrap().unwrap(), hex::decode("d9d9f70a").unwrap());
        assert_eq!(
            framer.read_frame().unwrap().unwrap(),
            hex::decode("d9d9f783010203").unwrap()
        );
        assert_eq!(framer.read_frame().unwrap(), None);
    }

    #[test]
    fn partial_trailing_bytes_are_retained() {
        let mut framer = CborFramer::new();
        let frame = hex::decode("d9d9f7a24161014162820203").unwrap();
        let (head, tail) = frame.split_at(5);
        framer.push(head);
        assert_eq!(framer.read_frame().unwrap(), None);
        framer.push(tail);
        assert_eq!(framer.read_frame().unwrap().unwrap(), frame);
    }

    #[test]
    fn byte_by_byte_delivery_still_frames() {
        let mut framer = CborFramer::new();
        let frame = {
            let mut f = SELF_DESCRIBED_PREFIX.to_vec();
            f.extend_from_slice(&hex::decode("7f616161626163ff").unwrap());
            f
        };
        for byte in &frame[..frame.len() - 1] {
            framer.push(&[*byte]);
            assert_eq!(framer.read_frame().unwrap(), None);
        }
        framer.push(&frame[frame.len() - 1..]);
        assert_eq!(framer.read_frame().unwrap().unwrap(), frame);
    }

    #[test]
    fn garbage_on_the_stream_is_an_error() {
        let mut framer = CborFramer::new();
        framer.push(&[0xff, 0x00]);
        assert!(matches!(
            framer.read_frame(),
            Err(CborError::Malformed { .. })
        ));
    }
}
