use crate::utils::error::{PayrollError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(PayrollError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PayrollError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_set.contains(extension.to_ascii_lowercase().as_str()) => Ok(()),
        Some(extension) => Err(PayrollError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(PayrollError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

/// Input files are plain delimited text.
pub fn validate_input_file(field_name: &str, file: &str) -> Result<()> {
    validate_path(field_name, file)?;
    validate_file_extension(field_name, file, &["csv", "txt"])
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| PayrollError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PayrollError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// The delimiter must be exactly one ASCII character other than a digit,
/// a comma (used inside code lists and values) or a quote.
pub fn validate_delimiter(field_name: &str, value: &str) -> Result<u8> {
    let reject = |reason: &str| PayrollError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let bytes = value.as_bytes();
    if bytes.len() != 1 || !bytes[0].is_ascii() {
        return Err(reject("Delimiter must be a single ASCII character"));
    }

    match bytes[0] {
        b'0'..=b'9' | b',' | b'"' | b'\n' | b'\r' => {
            Err(reject("Delimiter cannot be a digit, comma, quote or line break"))
        }
        b => Ok(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output.output_path", "./output").is_ok());
        assert!(validate_path("output.output_path", "  ").is_err());
        assert!(validate_path("output.output_path", "out\0put").is_err());
    }

    #[test]
    fn test_validate_input_file() {
        assert!(validate_input_file("substitution.catalog", "data/folha.csv").is_ok());
        assert!(validate_input_file("substitution.text", "relatorio.TXT").is_ok());
        assert!(validate_input_file("substitution.text", "relatorio.pdf").is_err());
        assert!(validate_input_file("substitution.text", "relatorio").is_err());
    }

    #[test]
    fn test_validate_delimiter() {
        assert_eq!(validate_delimiter("input.delimiter", ";").unwrap(), b';');
        assert_eq!(validate_delimiter("input.delimiter", "\t").unwrap(), b'\t');
        assert!(validate_delimiter("input.delimiter", ",").is_err());
        assert!(validate_delimiter("input.delimiter", ";;").is_err());
        assert!(validate_delimiter("input.delimiter", "").is_err());
        assert!(validate_delimiter("input.delimiter", "7").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("folha.csv".to_string());
        let absent: Option<String> = None;
        assert!(validate_required_field("substitution.catalog", &present).is_ok());
        assert!(matches!(
            validate_required_field("substitution.catalog", &absent),
            Err(PayrollError::MissingConfigError { .. })
        ));
    }
}
