use std::path::Path;

/// Strip wrapping quotes and whitespace from a configured executable path.
pub fn normalize_adb_path(value: &str) -> String {
    let trimmed = value.trim();
    if let Some(inner) = trimmed
        .strip_prefix('"')
        .and_then(|candidate| candidate.strip_suffix('"'))
    {
        return inner.trim().to_string();
    }
    if let Some(inner) = trimmed
        .strip_prefix('\'')
        .and_then(|candidate| candidate.strip_suffix('\''))
    {
        return inner.trim().to_string();
    }
    trimmed.to_string()
}

/// Pick the adb program to invoke: the configured path, or plain `adb`
/// resolved through PATH when nothing is configured.
pub fn resolve_adb_program(configured: &str) -> String {
    let normalized = normalize_adb_path(configured);
    if normalized.is_empty() {
        "adb".to_string()
    } else {
        normalized
    }
}

pub fn validate_adb_program(program: &str) -> Result<(), String> {
    if program.trim().is_empty() {
        return Err("adb command is empty".to_string());
    }
    if program == "adb" {
        return Ok(());
    }
    let path = Path::new(program);
    if path.is_dir() {
        return Err("adb path must point to an executable file".to_string());
    }
    if !path.exists() {
        return Err("adb executable not found at the configured path".to_string());
    }
    Ok(())
}
