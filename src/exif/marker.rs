//! JPEG marker-segment scanning: locate the APP1/Exif payload.
//! Walks segment headers only; never decodes image data.

use super::ExifError;

/// JPEG start-of-image marker.
pub const MARKER_SOI: u16 = 0xFFD8;
/// APP1 marker byte (EXIF application segment).
pub const MARKER_APP1: u8 = 0xE1;
/// Signature at the start of an APP1 Exif payload.
pub const EXIF_SIGNATURE: &[u8] = b"Exif";
/// Length of the "Exif\0\0" prefix before the TIFF header.
pub const EXIF_PREFIX_LEN: usize = 6;

/// Scan JPEG marker segments and return the TIFF region of the first APP1
/// Exif payload (the bytes after "Exif\0\0").
///
/// Each segment is `0xFF, marker, length(2, big-endian)`; the length covers
/// the length field itself. Non-APP1 segments are skipped by advancing
/// `2 + length`. A declared length below 2 cannot make forward progress and
/// fails instead of looping.
pub fn find_exif_payload(data: &[u8]) -> Result<&[u8], ExifError> {
    if data.len() < 2 || u16::from_be_bytes([data[0], data[1]]) != MARKER_SOI {
        return Err(ExifError::NotAJpeg);
    }

    let mut i = 2usize;
    loop {
        if i + 4 > data.len() {
            return Err(ExifError::MalformedMarker);
        }
        if data[i] != 0xFF {
            return Err(ExifError::MalformedMarker);
        }
        let marker = data[i + 1];
        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if length < 2 {
            return Err(ExifError::MalformedMarker);
        }
        if marker == MARKER_APP1 {
            let payload_start = i + 4;
            let payload_end = i + 2 + length;
            if payload_end > data.len() {
                return Err(ExifError::MalformedMarker);
            }
            let payload = &data[payload_start..payload_end];
            if payload.len() < EXIF_PREFIX_LEN || &payload[..EXIF_SIGNATURE.len()] != EXIF_SIGNATURE
            {
                return Err(ExifError::NotExif);
            }
            return Ok(&payload[EXIF_PREFIX_LEN..]);
        }
        i += 2 + length;
    }
}
