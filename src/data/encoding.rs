use std::fmt;

use clap::ValueEnum;

use crate::error::DataLoadError;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Text encoding of an input table.
///
/// The simulator's output has reached us both as plain UTF-8 and as UTF-16
/// (depending on how it was redirected to a file), so the encoding is chosen
/// per run rather than assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TextEncoding {
    Utf8,
    Utf16,
    /// UTF-16 when the bytes start with a UTF-16 byte order mark, UTF-8 otherwise.
    Auto,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => write!(f, "UTF-8"),
            TextEncoding::Utf16 => write!(f, "UTF-16"),
            TextEncoding::Auto => write!(f, "auto"),
        }
    }
}

/// Decode raw file bytes into text.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> Result<String, DataLoadError> {
    match encoding {
        TextEncoding::Utf8 => decode_utf8(bytes),
        TextEncoding::Utf16 => decode_utf16(bytes),
        TextEncoding::Auto => {
            if bytes.starts_with(&UTF16_LE_BOM) || bytes.starts_with(&UTF16_BE_BOM) {
                decode_utf16(bytes)
            } else {
                decode_utf8(bytes)
            }
        }
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<String, DataLoadError> {
    let body = bytes.strip_prefix(&UTF8_BOM[..]).unwrap_or(bytes);
    String::from_utf8(body.to_vec()).map_err(|e| DataLoadError::Decode {
        encoding: "UTF-8",
        reason: e.to_string(),
    })
}

fn decode_utf16(bytes: &[u8]) -> Result<String, DataLoadError> {
    let (body, big_endian) = if let Some(rest) = bytes.strip_prefix(&UTF16_LE_BOM[..]) {
        (rest, false)
    } else if let Some(rest) = bytes.strip_prefix(&UTF16_BE_BOM[..]) {
        (rest, true)
    } else {
        (bytes, false)
    };

    if body.len() % 2 != 0 {
        return Err(DataLoadError::Decode {
            encoding: "UTF-16",
            reason: format!("odd byte length {}", body.len()),
        });
    }

    let units = body.chunks_exact(2).map(|pair| {
        if big_endian {
            u16::from_be_bytes([pair[0], pair[1]])
        } else {
            u16::from_le_bytes([pair[0], pair[1]])
        }
    });

    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|e| DataLoadError::Decode {
            encoding: "UTF-16",
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le_with_bom(text: &str) -> Vec<u8> {
        let mut out = UTF16_LE_BOM.to_vec();
        for unit in text.encode_utf16() {
            out.extend_from_slice(&unit.to_le_bytes());
        }
        out
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"a,b\n1,2\n");
        assert_eq!(decode(&bytes, TextEncoding::Utf8).unwrap(), "a,b\n1,2\n");
    }

    #[test]
    fn utf16_le_and_be_decode() {
        let le = utf16le_with_bom("Trigger/Day, Rest_Rate_30%");
        assert_eq!(
            decode(&le, TextEncoding::Utf16).unwrap(),
            "Trigger/Day, Rest_Rate_30%"
        );

        let mut be = UTF16_BE_BOM.to_vec();
        for unit in "x,y".encode_utf16() {
            be.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode(&be, TextEncoding::Utf16).unwrap(), "x,y");
    }

    #[test]
    fn utf16_without_bom_is_little_endian() {
        let bytes: Vec<u8> = "1,2".encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        assert_eq!(decode(&bytes, TextEncoding::Utf16).unwrap(), "1,2");
    }

    #[test]
    fn odd_length_utf16_is_rejected() {
        let err = decode(&[0xFF, 0xFE, 0x41], TextEncoding::Utf16).unwrap_err();
        assert!(matches!(err, DataLoadError::Decode { encoding: "UTF-16", .. }));
    }

    #[test]
    fn auto_sniffs_the_byte_order_mark() {
        let wide = utf16le_with_bom("x,y");
        assert_eq!(decode(&wide, TextEncoding::Auto).unwrap(), "x,y");
        assert_eq!(decode(b"x,y", TextEncoding::Auto).unwrap(), "x,y");
    }

    #[test]
    fn utf16_read_as_utf8_fails() {
        let wide = utf16le_with_bom("x,y");
        assert!(decode(&wide, TextEncoding::Utf8).is_err());
    }
}
