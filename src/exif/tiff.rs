//! Minimal TIFF IFD reader for EXIF metadata extraction.
//! Operates on slices relative to the TIFF header start; does not allocate
//! except for the decoded comment text.

use super::ExifError;

/// TIFF magic number.
pub const TIFF_MAGIC: u16 = 0x002A;
/// Size of the TIFF header in bytes.
pub const TIFF_HEADER_LEN: usize = 8;
/// Size of one IFD entry in bytes.
pub const IFD_ENTRY_LEN: usize = 12;

/// ExifIFDPointer: offset of the nested Exif IFD (in IFD0).
pub const TAG_EXIF_IFD_POINTER: u16 = 0x8769;
/// UserComment: free-form comment blob (in the Exif IFD).
pub const TAG_USER_COMMENT: u16 = 0x9286;

/// TIFF field type: 32-bit unsigned integer.
pub const TYPE_LONG: u16 = 4;
/// TIFF field type: undefined byte blob.
pub const TYPE_UNDEFINED: u16 = 7;

/// Length of the character-code prefix before UserComment text
/// (e.g. "ASCII\0\0\0" or "UNICODE\0").
pub const COMMENT_CODE_LEN: usize = 8;

/// Tag id to display name, scoped to one IFD read.
pub type TagTable = &'static [(u16, &'static str)];

/// Tags resolved in IFD0.
pub const ROOT_TAGS: TagTable = &[(TAG_EXIF_IFD_POINTER, "ExifIFDPointer")];
/// Tags resolved in the nested Exif IFD.
pub const EXIF_TAGS: TagTable = &[(TAG_USER_COMMENT, "UserComment")];

/// Byte order of a TIFF stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    #[inline]
    pub fn read_u8(self, data: &[u8], offset: usize) -> Option<u8> {
        data.get(offset).copied()
    }

    #[inline]
    pub fn read_u16(self, data: &[u8], offset: usize) -> Option<u16> {
        let end = offset.checked_add(2)?;
        if end > data.len() {
            return None;
        }
        let bytes = &data[offset..end];
        Some(match self {
            Endian::Little => u16::from_le_bytes([bytes[0], bytes[1]]),
            Endian::Big => u16::from_be_bytes([bytes[0], bytes[1]]),
        })
    }

    #[inline]
    pub fn read_u32(self, data: &[u8], offset: usize) -> Option<u32> {
        let end = offset.checked_add(4)?;
        if end > data.len() {
            return None;
        }
        let bytes = &data[offset..end];
        Some(match self {
            Endian::Little => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            Endian::Big => u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        })
    }
}

/// Check the TIFF header at the start of `tiff` and return (byte order,
/// IFD0 offset). The IFD0 offset is relative to the header start and must be
/// at least [`TIFF_HEADER_LEN`].
pub fn read_tiff_header(tiff: &[u8]) -> Result<(Endian, u32), ExifError> {
    if tiff.len() < TIFF_HEADER_LEN {
        return Err(ExifError::BadTiffHeader);
    }
    let bo = if tiff[0] == 0x49 && tiff[1] == 0x49 {
        Endian::Little
    } else if tiff[0] == 0x4D && tiff[1] == 0x4D {
        Endian::Big
    } else {
        return Err(ExifError::BadTiffHeader);
    };
    let magic = bo.read_u16(tiff, 2).ok_or(ExifError::OutOfBounds)?;
    if magic != TIFF_MAGIC {
        return Err(ExifError::BadTiffHeader);
    }
    let ifd0 = bo.read_u32(tiff, 4).ok_or(ExifError::OutOfBounds)?;
    if (ifd0 as usize) < TIFF_HEADER_LEN {
        return Err(ExifError::BadTiffHeader);
    }
    Ok((bo, ifd0))
}

/// Single IFD entry (tag, type, count, value/offset).
#[derive(Debug, Clone, Copy)]
pub struct IfdEntry {
    pub tag: u16,
    pub field_type: u16,
    pub count: u32,
    pub value_offset: u32,
}

/// Read one IFD entry at `offset` (must have 12 bytes available).
pub fn read_ifd_entry(bo: Endian, tiff: &[u8], offset: usize) -> Option<IfdEntry> {
    if tiff.len().saturating_sub(offset) < IFD_ENTRY_LEN {
        return None;
    }
    Some(IfdEntry {
        tag: bo.read_u16(tiff, offset)?,
        field_type: bo.read_u16(tiff, offset + 2)?,
        count: bo.read_u32(tiff, offset + 4)?,
        value_offset: bo.read_u32(tiff, offset + 8)?,
    })
}

/// Decoded value of a resolved tag. Only the two shapes this reader needs:
/// inline LONG integers (IFD pointers) and UNDEFINED text blobs (comments).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    Long(u32),
    Text(String),
}

/// Walk one IFD at `ifd_offset` (relative to the TIFF header start) and
/// resolve the tags named in `table` to typed values, in entry order.
///
/// Tag ids absent from `table` are ignored, as are type/count combinations
/// other than LONG with count 1 and UNDEFINED blobs.
pub fn read_directory(
    bo: Endian,
    tiff: &[u8],
    ifd_offset: u32,
    table: TagTable,
) -> Result<Vec<(&'static str, TagValue)>, ExifError> {
    let offset = ifd_offset as usize;
    let num_entries = bo.read_u16(tiff, offset).ok_or(ExifError::OutOfBounds)? as usize;
    let entries_start = offset + 2;
    let entries_end = entries_start + num_entries * IFD_ENTRY_LEN;
    if entries_end > tiff.len() {
        return Err(ExifError::OutOfBounds);
    }

    let mut out = Vec::new();
    for i in 0..num_entries {
        let entry_offset = entries_start + i * IFD_ENTRY_LEN;
        let entry = read_ifd_entry(bo, tiff, entry_offset).ok_or(ExifError::OutOfBounds)?;
        let Some(&(_, name)) = table.iter().find(|&&(id, _)| id == entry.tag) else {
            continue;
        };
        if let Some(value) = decode_entry(tiff, entry, entry_offset) {
            out.push((name, value));
        }
    }
    Ok(out)
}

/// Decode one resolved entry. LONG count 1 is inline; UNDEFINED blobs live at
/// `value_offset` when larger than 4 bytes, else inside the entry itself.
fn decode_entry(tiff: &[u8], entry: IfdEntry, entry_offset: usize) -> Option<TagValue> {
    match entry.field_type {
        TYPE_LONG if entry.count == 1 => Some(TagValue::Long(entry.value_offset)),
        TYPE_UNDEFINED => read_comment_text(tiff, entry, entry_offset).map(TagValue::Text),
        _ => None,
    }
}

/// Decode an UNDEFINED blob as comment text, skipping the fixed 8-byte
/// character-code prefix. Returns None when the blob is out of bounds or too
/// short to hold any text after the prefix.
fn read_comment_text(tiff: &[u8], entry: IfdEntry, entry_offset: usize) -> Option<String> {
    let count = entry.count as usize;
    let bytes = if count > 4 {
        let start = entry.value_offset as usize;
        let end = start.checked_add(count)?;
        if end > tiff.len() {
            return None;
        }
        &tiff[start..end]
    } else {
        // Inline: raw bytes of the entry's value field, independent of byte order.
        let start = entry_offset + 8;
        let end = start + count;
        if end > tiff.len() {
            return None;
        }
        &tiff[start..end]
    };
    if bytes.len() <= COMMENT_CODE_LEN {
        return None;
    }
    let text = String::from_utf8_lossy(&bytes[COMMENT_CODE_LEN..]);
    Some(text.trim_matches('\0').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiff_header_little() {
        let data: Vec<u8> = vec![0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
        let (bo, ifd0) = read_tiff_header(&data).unwrap();
        assert_eq!(bo, Endian::Little);
        assert_eq!(ifd0, 8);
    }

    #[test]
    fn tiff_header_big() {
        let data: Vec<u8> = vec![0x4D, 0x4D, 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08];
        let (bo, ifd0) = read_tiff_header(&data).unwrap();
        assert_eq!(bo, Endian::Big);
        assert_eq!(ifd0, 8);
    }

    #[test]
    fn tiff_header_rejects_bad_order_and_low_offset() {
        assert_eq!(
            read_tiff_header(&[0x4A, 0x4A, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00]),
            Err(ExifError::BadTiffHeader)
        );
        // IFD0 offset below the header length would alias into the header.
        assert_eq!(
            read_tiff_header(&[0x49, 0x49, 0x2A, 0x00, 0x04, 0x00, 0x00, 0x00]),
            Err(ExifError::BadTiffHeader)
        );
    }

    #[test]
    fn reads_inline_long() {
        let mut v = vec![0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
        v.extend_from_slice(&1u16.to_le_bytes());
        v.extend_from_slice(&TAG_EXIF_IFD_POINTER.to_le_bytes());
        v.extend_from_slice(&TYPE_LONG.to_le_bytes());
        v.extend_from_slice(&1u32.to_le_bytes());
        v.extend_from_slice(&0x5Au32.to_le_bytes());
        v.extend_from_slice(&0u32.to_le_bytes());
        let tags = read_directory(Endian::Little, &v, 8, ROOT_TAGS).unwrap();
        assert_eq!(tags, vec![("ExifIFDPointer", TagValue::Long(0x5A))]);
    }

    #[test]
    fn unknown_tags_are_ignored() {
        let mut v = vec![0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
        v.extend_from_slice(&1u16.to_le_bytes());
        v.extend_from_slice(&0x0100u16.to_le_bytes());
        v.extend_from_slice(&TYPE_LONG.to_le_bytes());
        v.extend_from_slice(&1u32.to_le_bytes());
        v.extend_from_slice(&640u32.to_le_bytes());
        v.extend_from_slice(&0u32.to_le_bytes());
        let tags = read_directory(Endian::Little, &v, 8, ROOT_TAGS).unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn comment_with_out_of_range_offset_is_skipped() {
        let mut v = vec![0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
        v.extend_from_slice(&1u16.to_le_bytes());
        v.extend_from_slice(&TAG_USER_COMMENT.to_le_bytes());
        v.extend_from_slice(&TYPE_UNDEFINED.to_le_bytes());
        v.extend_from_slice(&64u32.to_le_bytes());
        v.extend_from_slice(&0xFFFF_0000u32.to_le_bytes());
        v.extend_from_slice(&0u32.to_le_bytes());
        let tags = read_directory(Endian::Little, &v, 8, EXIF_TAGS).unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn truncated_entry_table() {
        let mut v = vec![0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
        v.extend_from_slice(&40u16.to_le_bytes());
        assert_eq!(
            read_directory(Endian::Little, &v, 8, ROOT_TAGS),
            Err(ExifError::OutOfBounds)
        );
    }
}
