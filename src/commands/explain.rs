use crate::core::import::ImportErrorCode;

/// 错误码说明，例如 "ERR_OPEN_ZIP: Cannot open the ZIP file"
pub fn explain_code(raw: &str) -> String {
    match ImportErrorCode::parse_status(raw) {
        Ok(()) => "OK".to_string(),
        Err(code) => {
            let suffix = if code.is_duplicate() { " (overwrite possible)" } else { "" };
            format!("{}: {}{}", code, code.localized(), suffix)
        }
    }
}
