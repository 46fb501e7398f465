use crate::utils::error::{PayrollError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decodes uploaded bytes as UTF-8 text, dropping a leading byte-order mark.
pub fn decode_text(bytes: Vec<u8>, source_name: &str) -> Result<String> {
    let bytes = if bytes.starts_with(UTF8_BOM) {
        bytes[UTF8_BOM.len()..].to_vec()
    } else {
        bytes
    };

    String::from_utf8(bytes).map_err(|e| PayrollError::InputDecodingError {
        source_name: source_name.to_string(),
        message: e.utf8_error().to_string(),
    })
}
