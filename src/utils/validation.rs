use crate::utils::error::{MenuError, Result};
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> MenuError {
    MenuError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// 只接受 http / https，網站連結會直接放進訊息裡
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.trim().is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", scheme),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    Ok(())
}

/// 抽取結果與菜單都是 JSON
pub fn validate_json_path(field_name: &str, path: &str) -> Result<()> {
    validate_path(field_name, path)?;
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(()),
        Some(ext) => Err(invalid(
            field_name,
            path,
            format!("Unsupported file extension: {}. Expected a .json file", ext),
        )),
        None => Err(invalid(field_name, path, "File has no extension")),
    }
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("base_url", "https://joaoqalves.github.io/menu-stnico").is_ok());
        assert!(validate_url("base_url", "http://localhost:8000").is_ok());
        assert!(validate_url("base_url", "").is_err());
        assert!(validate_url("base_url", "  ").is_err());
        assert!(validate_url("base_url", "invalid-url").is_err());
        assert!(validate_url("base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_json_path() {
        assert!(validate_json_path("input", "output/2025_q4.json").is_ok());
        assert!(validate_json_path("input", "MENU.JSON").is_ok());
        assert!(validate_json_path("input", "2025_q4.pdf").is_err());
        assert!(validate_json_path("input", "menu").is_err());
        assert!(validate_json_path("input", "").is_err());
    }

    #[test]
    fn test_validate_range_and_path() {
        assert!(validate_range("year", 2025, 2000, 2100).is_ok());
        assert!(validate_range("year", 1999, 2000, 2100).is_err());
        assert!(validate_path("json_path", "menus/2025_q4_menu.json").is_ok());
        assert!(validate_path("json_path", "menu\u{0}.json").is_err());

        match validate_range("year", 2101, 2000, 2100) {
            Err(MenuError::InvalidConfigValueError { field, value, .. }) => {
                assert_eq!(field, "year");
                assert_eq!(value, "2101");
            }
            other => panic!("expected an invalid value error, got {:?}", other),
        }
    }
}
