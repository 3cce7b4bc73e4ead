//! On-disk record frame
//!
//! ```text
//! +------------------+
//! | Frame Length     | (u32 LE, includes itself and the checksum)
//! +------------------+
//! | Key              | (length-prefixed UTF-8)
//! +------------------+
//! | Body             | (length-prefixed bytes)
//! +------------------+
//! | Checksum         | (u32 LE, CRC32 over every preceding byte)
//! +------------------+
//! ```

use std::io::{self, Cursor, Read};

use super::checksum::compute_checksum;

/// Smallest possible frame: length + empty key + empty body + checksum.
pub const MIN_FRAME_SIZE: usize = 4 + 4 + 4 + 4;

/// A keyed, opaque record as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFrame {
    /// Unique record key
    pub key: String,
    /// Encoded record body
    pub body: Vec<u8>,
}

impl RecordFrame {
    /// Create a new frame
    pub fn new(key: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            body,
        }
    }

    /// Serialize to the on-disk frame format.
    pub fn encode(&self) -> Vec<u8> {
        let frame_length = (4 + 4 + self.key.len() + 4 + self.body.len() + 4) as u32;

        let mut frame = Vec::with_capacity(frame_length as usize);
        frame.extend_from_slice(&frame_length.to_le_bytes());
        frame.extend_from_slice(&(self.key.len() as u32).to_le_bytes());
        frame.extend_from_slice(self.key.as_bytes());
        frame.extend_from_slice(&(self.body.len() as u32).to_le_bytes());
        frame.extend_from_slice(&self.body);

        let checksum = compute_checksum(&frame);
        frame.extend_from_slice(&checksum.to_le_bytes());
        frame
    }

    /// Decode a frame from the start of `data`, verifying its checksum.
    ///
    /// Returns the frame and the number of bytes consumed.
    pub fn decode(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_FRAME_SIZE {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "Frame too short"));
        }

        let frame_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
        if frame_length < MIN_FRAME_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid frame length: {}", frame_length),
            ));
        }
        if data.len() < frame_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Frame truncated: expected {} bytes, got {}",
                    frame_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = frame_length - 4;
        let stored = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);
        let computed = compute_checksum(&data[..checksum_offset]);
        if computed != stored {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    computed, stored
                ),
            ));
        }

        let mut cursor = Cursor::new(&data[4..checksum_offset]);
        let key = String::from_utf8(read_prefixed(&mut cursor)?).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8 key: {}", e))
        })?;
        let body = read_prefixed(&mut cursor)?;

        if cursor.position() as usize != checksum_offset - 4 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Trailing bytes inside frame",
            ));
        }

        Ok((Self { key, body }, frame_length))
    }
}

fn read_prefixed<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let mut buf = vec![0u8; u32::from_le_bytes(len_buf) as usize];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}
