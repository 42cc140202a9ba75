//! EXIF extraction boundary: JPEG bytes in, annotation text out.

use super::marker::find_exif_payload;
use super::tiff::{read_directory, read_tiff_header, TagValue, EXIF_TAGS, ROOT_TAGS};
use super::ExifError;

/// Extract the EXIF UserComment from a JPEG buffer.
///
/// Returns `Ok(None)` when the file is structurally sound but carries no
/// comment (no ExifIFDPointer in IFD0, or no UserComment in the Exif IFD).
pub fn user_comment(data: &[u8]) -> Result<Option<String>, ExifError> {
    let tiff = find_exif_payload(data)?;
    let (bo, ifd0) = read_tiff_header(tiff)?;

    let root = read_directory(bo, tiff, ifd0, ROOT_TAGS)?;
    let Some(exif_ifd) = root.iter().find_map(|(_, v)| match v {
        TagValue::Long(offset) => Some(*offset),
        _ => None,
    }) else {
        return Ok(None);
    };

    let exif = read_directory(bo, tiff, exif_ifd, EXIF_TAGS)?;
    let comment = exif.into_iter().find_map(|(_, v)| match v {
        TagValue::Text(text) => Some(text),
        _ => None,
    });
    Ok(comment)
}

/// Like [`user_comment`], but downgrades every structural failure to `None`.
///
/// This is the pipeline entry point: corrupt or adversarial files read as
/// "no metadata" so the surrounding display keeps working. Empty comments
/// also read as `None`.
pub fn annotation_from_jpeg(data: &[u8]) -> Option<String> {
    user_comment(data)
        .ok()
        .flatten()
        .filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_jpeg_downgrades_to_none() {
        assert_eq!(annotation_from_jpeg(b"\x89PNG\r\n\x1a\n"), None);
        assert_eq!(annotation_from_jpeg(&[]), None);
    }

    #[test]
    fn truncated_jpeg_downgrades_to_none() {
        assert_eq!(annotation_from_jpeg(&[0xFF, 0xD8, 0xFF]), None);
    }
}
