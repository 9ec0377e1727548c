use serde_json::{Map, Value};

use super::ConfigError;

/// Checks types and ranges of every known key before the typed decode.
///
/// Unknown keys are ignored; missing keys fall back to defaults later.
pub fn validate_config(config: &Value) -> Result<(), ConfigError> {
    let root = config
        .as_object()
        .ok_or_else(|| config_type_error("root", "object"))?;

    if let Some(server) = expect_optional_object(root, "server")? {
        validate_optional_string_field(server, "server.host", "host")?;
        validate_u64_field(server, "server.port", "port", 1, 65_535)?;
        validate_string_array_field(
            server,
            "server.cors_allowed_origins",
            "cors_allowed_origins",
        )?;
    }

    if let Some(app) = expect_optional_object(root, "app")? {
        validate_u64_field(
            app,
            "app.max_input_length",
            "max_input_length",
            1,
            10_000_000,
        )?;
    }

    if let Some(llm) = expect_optional_object(root, "llm")? {
        validate_optional_string_field(llm, "llm.base_url", "base_url")?;
        validate_optional_string_field(llm, "llm.api_key", "api_key")?;
        validate_optional_string_field(llm, "llm.chat_model", "chat_model")?;
        validate_optional_string_field(llm, "llm.embedding_model", "embedding_model")?;
        validate_f64_field(llm, "llm.temperature", "temperature", 0.0, 2.0)?;
        validate_nullable_u64_field(llm, "llm.max_tokens", "max_tokens", 1, 1_000_000)?;
        validate_u64_field(llm, "llm.timeout_secs", "timeout_secs", 1, 86_400)?;
        validate_u64_field(
            llm,
            "llm.embedding_batch_size",
            "embedding_batch_size",
            1,
            100_000,
        )?;
    }

    if let Some(rag) = expect_optional_object(root, "rag")? {
        if let Some(mode) = rag.get("mode") {
            match mode.as_str() {
                Some("similarity") | Some("static") => {}
                Some(other) => {
                    return Err(ConfigError::invalid(
                        "rag.mode",
                        format!("unknown mode '{}', expected 'similarity' or 'static'", other),
                    ))
                }
                None => return Err(config_type_error("rag.mode", "string")),
            }
        }
        validate_u64_field(rag, "rag.chunk_size", "chunk_size", 1, 100_000)?;
        validate_u64_field(rag, "rag.chunk_overlap", "chunk_overlap", 0, 100_000)?;
        validate_u64_field(rag, "rag.top_k", "top_k", 1, 100)?;

        let chunk_size = rag.get("chunk_size").and_then(|v| v.as_u64()).unwrap_or(500);
        let overlap = rag.get("chunk_overlap").and_then(|v| v.as_u64()).unwrap_or(50);
        if overlap >= chunk_size {
            return Err(ConfigError::invalid(
                "rag.chunk_overlap",
                format!("must be smaller than rag.chunk_size ({})", chunk_size),
            ));
        }
    }

    if let Some(persona) = expect_optional_object(root, "persona")? {
        validate_optional_string_field(persona, "persona.name", "name")?;
        validate_optional_string_field(persona, "persona.short_name", "short_name")?;
    }

    if let Some(messages) = expect_optional_object(root, "messages")? {
        // user-facing copy: replies must never be empty
        for key in ["fallback_context", "apology", "config_error", "contact_ack"] {
            if messages.contains_key(key) {
                validate_required_string_field(messages, &format!("messages.{}", key), key)?;
            }
        }
    }

    if let Some(knowledge) = expect_optional_object(root, "knowledge")? {
        if let Some(passages) = knowledge.get("passages").filter(|v| !v.is_null()) {
            let items = passages
                .as_array()
                .ok_or_else(|| config_type_error("knowledge.passages", "array"))?;
            for (index, item) in items.iter().enumerate() {
                let path = format!("knowledge.passages[{}]", index);
                let entry = item
                    .as_object()
                    .ok_or_else(|| config_type_error(&path, "object"))?;
                validate_required_string_field(entry, &format!("{}.category", path), "category")?;
                validate_required_string_field(entry, &format!("{}.content", path), "content")?;
            }
        }
    }

    Ok(())
}

fn expect_optional_object<'a>(
    root: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, ConfigError> {
    match root.get(key) {
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(Value::Null) | None => Ok(None),
        Some(_) => Err(config_type_error(key, "object")),
    }
}

/// Like `validate_u64_field`, for keys decoded into `Option`.
fn validate_nullable_u64_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    min: u64,
    max: u64,
) -> Result<(), ConfigError> {
    match section.get(key) {
        Some(Value::Null) | None => Ok(()),
        Some(_) => validate_u64_field(section, path, key, min, max),
    }
}

fn validate_u64_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    min: u64,
    max: u64,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(number) = value.as_u64() else {
        return Err(config_type_error(path, "integer"));
    };
    if number < min || number > max {
        return Err(ConfigError::invalid(
            path,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

fn validate_f64_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
    min: f64,
    max: f64,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(number) = value.as_f64() else {
        return Err(config_type_error(path, "number"));
    };
    if number < min || number > max {
        return Err(ConfigError::invalid(
            path,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

fn validate_required_string_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    let value = section
        .get(key)
        .ok_or_else(|| ConfigError::invalid(path, "value is required"))?;
    let Some(text) = value.as_str() else {
        return Err(config_type_error(path, "string"));
    };
    if text.trim().is_empty() {
        return Err(ConfigError::invalid(path, "value cannot be empty"));
    }
    Ok(())
}

fn validate_optional_string_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    if value.is_null() || value.as_str().is_some() {
        return Ok(());
    }
    Err(config_type_error(path, "string"))
}

fn validate_string_array_field(
    section: &Map<String, Value>,
    path: &str,
    key: &str,
) -> Result<(), ConfigError> {
    let Some(value) = section.get(key) else {
        return Ok(());
    };
    let Some(items) = value.as_array() else {
        return Err(config_type_error(path, "array of strings"));
    };
    for (index, item) in items.iter().enumerate() {
        let Some(text) = item.as_str() else {
            return Err(config_type_error(&format!("{}[{}]", path, index), "string"));
        };
        if text.trim().is_empty() {
            return Err(ConfigError::invalid(
                format!("{}[{}]", path, index),
                "value cannot be empty",
            ));
        }
    }
    Ok(())
}

fn config_type_error(path: &str, expected: &str) -> ConfigError {
    ConfigError::invalid(path, format!("expected {}", expected))
}
