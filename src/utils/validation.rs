use crate::utils::error::{AdminError, Result};
use std::path::{Path, PathBuf};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<Url> {
    if url_str.is_empty() {
        return Err(AdminError::InvalidArgumentError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(AdminError::InvalidArgumentError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AdminError::InvalidArgumentError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AdminError::InvalidArgumentError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 斷言失敗時回傳帶訊息的前置條件錯誤
pub fn ensure(condition: bool, message: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(AdminError::precondition(message))
    }
}

/// Resolves every service definition path to an absolute path and checks that it is a
/// regular file.
pub fn validate_definition_files(files: &[PathBuf]) -> Result<Vec<PathBuf>> {
    ensure(!files.is_empty(), "No file specified")?;

    let cwd = std::env::current_dir()?;
    let mut resolved = Vec::with_capacity(files.len());
    for file in files {
        let absolute = if file.is_absolute() {
            file.clone()
        } else {
            cwd.join(file)
        };
        ensure(
            absolute.is_file(),
            format!("{} is not a file", absolute.display()),
        )?;
        resolved.push(absolute);
    }

    Ok(resolved)
}

pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
