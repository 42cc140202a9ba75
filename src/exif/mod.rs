//! JPEG/EXIF annotation extraction.
//!
//! Image generators that write to JPEG put the generation parameters into the
//! EXIF `UserComment` tag (0x9286) inside the APP1 segment. Extraction walks
//! the marker segments to the Exif payload, then reads two TIFF directories:
//! IFD0 for the `ExifIFDPointer`, and the Exif IFD for the comment itself.
//!
//! All offsets in the TIFF structure are attacker-influenced; every derived
//! offset is range-checked against the buffer before use. Structural failures
//! never escape [`annotation_from_jpeg`]; a corrupt file reads as "no
//! metadata", not as an error.

mod extractor;
mod marker;
mod tiff;

pub use extractor::{annotation_from_jpeg, user_comment};
pub use marker::{find_exif_payload, EXIF_PREFIX_LEN, MARKER_APP1, MARKER_SOI};
pub use tiff::{
    read_directory, read_ifd_entry, read_tiff_header, Endian, IfdEntry, TagTable, TagValue,
    EXIF_TAGS, IFD_ENTRY_LEN, ROOT_TAGS, TAG_EXIF_IFD_POINTER, TAG_USER_COMMENT, TIFF_HEADER_LEN,
    TIFF_MAGIC, TYPE_LONG, TYPE_UNDEFINED,
};

/// Structural failures while locating or decoding the EXIF comment.
///
/// These abort extraction for the file at hand and are downgraded to "no
/// annotation" at the [`annotation_from_jpeg`] boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ExifError {
    /// A read was attempted past the end of the buffer.
    #[error("read past end of buffer")]
    OutOfBounds,
    /// Missing the JPEG start-of-image marker (0xFFD8).
    #[error("missing JPEG start-of-image marker")]
    NotAJpeg,
    /// A marker segment is truncated, misaligned, or declares a length that
    /// cannot make forward progress.
    #[error("malformed JPEG marker segment")]
    MalformedMarker,
    /// The APP1 segment does not carry an Exif payload.
    #[error("APP1 segment is not an Exif payload")]
    NotExif,
    /// The TIFF header inside the Exif payload is invalid.
    #[error("invalid TIFF header")]
    BadTiffHeader,
}
