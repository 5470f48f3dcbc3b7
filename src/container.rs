//! The `.bg` container: fixed 11-byte header, quality byte, optional ICC
//! section, payload
//!
//! Byte layout, little-endian throughout (`spec.md` §4.1):
//! `['B','G'][version:u8][width:u32][height:u32]` followed by a single
//! mandatory quality byte (the normalized `[1,100]` encode quality, needed
//! so the decoder can re-derive the quantization tables the encoder used;
//! real JPEG carries the equivalent information in-stream as a DQT marker,
//! `zune-jpeg::headers::parse_dqt`, which this format's fixed-table design
//! collapses to a single byte instead of full 64-entry tables), then an
//! optional ICC section `[tag:u8 = 0x01][len:u32][bytes]` (grounded in
//! `original_source/c/icc_io.c`; the section is simply omitted when there is
//! no profile, rather than written with a zero length), then the
//! concatenated per-component entropy payloads.

use crate::config::check_image_size;
use crate::errors::BitGrainError;
use crate::image::ColorSpace;

const MAGIC: [u8; 2] = [b'B', b'G'];
const HEADER_LEN: usize = 11;
const ICC_TAG: u8 = 0x01;

/// The fixed 11-byte `.bg` header, decoded
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Header {
    pub colorspace: ColorSpace,
    pub width: u32,
    pub height: u32
}

impl Header {
    /// Append this header's 11 bytes to `out`
    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.push(self.colorspace.container_version());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
    }

    /// Parse the header from the start of `data`
    ///
    /// # Errors
    /// `MalformedHeader` on a short buffer, wrong magic, or an unrecognized
    /// or reserved (version 4) version byte; `DimensionsOutOfRange` if the
    /// declared dimensions exceed the codec's limits.
    pub fn parse(data: &[u8]) -> Result<Self, BitGrainError> {
        if data.len() < HEADER_LEN {
            return Err(BitGrainError::MalformedHeader("buffer shorter than 11-byte header".into()));
        }
        if data[0..2] != MAGIC {
            return Err(BitGrainError::MalformedHeader("bad magic bytes".into()));
        }
        let version = data[2];
        if version == 4 {
            return Err(BitGrainError::MalformedHeader(
                "version 4 (chroma subsampling) is reserved, not implemented".into()
            ));
        }
        let colorspace = ColorSpace::from_container_version(version)
            .ok_or_else(|| BitGrainError::MalformedHeader(format!("unknown version {version}")))?;

        let width = u32::from_le_bytes(data[3..7].try_into().unwrap());
        let height = u32::from_le_bytes(data[7..11].try_into().unwrap());

        if !check_image_size(width, height, colorspace.num_channels() as u32) {
            return Err(BitGrainError::DimensionsOutOfRange);
        }

        Ok(Header { colorspace, width, height })
    }
}

/// Append the mandatory quality byte to `out`, immediately after the header
pub fn write_quality(out: &mut Vec<u8>, quality: u8) {
    out.push(quality);
}

/// Parse the quality byte at `data[0]`
///
/// # Errors
/// `TruncatedPayload` if `data` is empty.
pub fn parse_quality(data: &[u8]) -> Result<u8, BitGrainError> {
    data.first().copied().ok_or(BitGrainError::TruncatedPayload)
}

/// Append an ICC section (tag + length + bytes) to `out`
pub fn write_icc_section(out: &mut Vec<u8>, icc: &[u8]) {
    out.push(ICC_TAG);
    out.extend_from_slice(&(icc.len() as u32).to_le_bytes());
    out.extend_from_slice(icc);
}

/// Parse an ICC section starting at `data[0]`, if present
///
/// Returns `(icc_bytes, bytes_consumed)`. `bytes_consumed` is 0 and the ICC
/// bytes are empty when `data` does not start with the ICC tag: absence is
/// *not* an error, since the section is optional.
///
/// # Errors
/// `TruncatedPayload` if the tag is present but the declared length exceeds
/// the remaining bytes.
pub fn parse_icc_section(data: &[u8]) -> Result<(Vec<u8>, usize), BitGrainError> {
    if data.is_empty() || data[0] != ICC_TAG {
        return Ok((Vec::new(), 0));
    }
    if data.len() < 5 {
        return Err(BitGrainError::TruncatedPayload);
    }
    let len = u32::from_le_bytes(data[1..5].try_into().unwrap()) as usize;
    if data.len() < 5 + len {
        return Err(BitGrainError::TruncatedPayload);
    }
    Ok((data[5..5 + len].to_vec(), 5 + len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips() {
        let header = Header { colorspace: ColorSpace::YCbCr, width: 640, height: 480 };
        let mut bytes = Vec::new();
        header.write(&mut bytes);
        assert_eq!(bytes.len(), HEADER_LEN);
        assert_eq!(Header::parse(&bytes).unwrap(), header);
    }

    #[test]
    fn short_buffer_is_malformed() {
        assert!(matches!(Header::parse(&[b'B', b'G', 1]), Err(BitGrainError::MalformedHeader(_))));
    }

    #[test]
    fn bad_magic_is_malformed() {
        let header = Header { colorspace: ColorSpace::Grayscale, width: 8, height: 8 };
        let mut bytes = Vec::new();
        header.write(&mut bytes);
        bytes[0] = b'X';
        assert!(matches!(Header::parse(&bytes), Err(BitGrainError::MalformedHeader(_))));
    }

    #[test]
    fn reserved_version_four_is_rejected() {
        let mut bytes = vec![b'B', b'G', 4];
        bytes.extend_from_slice(&8u32.to_le_bytes());
        bytes.extend_from_slice(&8u32.to_le_bytes());
        assert!(matches!(Header::parse(&bytes), Err(BitGrainError::MalformedHeader(_))));
    }

    #[test]
    fn oversized_dimensions_rejected() {
        let mut bytes = vec![b'B', b'G', 1];
        bytes.extend_from_slice(&70_000u32.to_le_bytes());
        bytes.extend_from_slice(&70_000u32.to_le_bytes());
        assert!(matches!(Header::parse(&bytes), Err(BitGrainError::DimensionsOutOfRange)));
    }

    #[test]
    fn quality_byte_round_trips() {
        let mut bytes = Vec::new();
        write_quality(&mut bytes, 73);
        assert_eq!(parse_quality(&bytes).unwrap(), 73);
    }

    #[test]
    fn missing_quality_byte_is_truncated_payload() {
        assert!(matches!(parse_quality(&[]), Err(BitGrainError::TruncatedPayload)));
    }

    #[test]
    fn icc_section_round_trips() {
        let icc = vec![7u8; 64];
        let mut bytes = Vec::new();
        write_icc_section(&mut bytes, &icc);
        let (parsed, consumed) = parse_icc_section(&bytes).unwrap();
        assert_eq!(parsed, icc);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn missing_icc_section_is_not_an_error() {
        let payload = [0xAAu8, 0xBB, 0xCC];
        let (icc, consumed) = parse_icc_section(&payload).unwrap();
        assert!(icc.is_empty());
        assert_eq!(consumed, 0);
    }

    #[test]
    fn truncated_icc_section_is_truncated_payload() {
        let mut bytes = vec![ICC_TAG];
        bytes.extend_from_slice(&100u32.to_le_bytes());
        bytes.extend_from_slice(&[1, 2, 3]);
        assert!(matches!(parse_icc_section(&bytes), Err(BitGrainError::TruncatedPayload)));
    }
}
