use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use serde_json::Value;

/// Sentinel default for secrets that operators must override.
pub const PLACEHOLDER_SECRET: &str = "CHANGEME";

/// One variant per validation capability in the settings table. Applying a
/// validator to its own output returns an equivalent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    Text,
    Int,
    Bool,
    Color,
    FernetKey,
    Secret,
    TlsUrl,
    Path,
    List {
        delimiter: &'static str,
        element: &'static Validator,
    },
    NoneOr(&'static Validator),
}

impl Validator {
    /// Check and coerce a raw value. The error is the reason alone; the
    /// loader prefixes the failing key when it aggregates.
    pub fn apply(&self, raw: &Value) -> std::result::Result<Value, String> {
        match self {
            Self::Text => Ok(validate_text(raw)),
            Self::Int => validate_int(raw),
            Self::Bool => validate_bool(raw),
            Self::Color => validate_color(raw),
            Self::FernetKey => validate_fernet_key(raw),
            Self::Secret => validate_secret(raw),
            Self::TlsUrl => validate_tls_url(raw),
            Self::Path => validate_path(raw),
            Self::List { delimiter, element } => validate_list(raw, delimiter, element),
            Self::NoneOr(inner) => {
                if raw.is_null() {
                    Ok(Value::Null)
                } else {
                    inner.apply(raw)
                }
            }
        }
    }
}

// Strings render without surrounding quotes in error messages.
fn raw_display(raw: &Value) -> String {
    match raw {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn validate_text(raw: &Value) -> Value {
    match raw {
        Value::String(_) => raw.clone(),
        other => Value::String(raw_display(other)),
    }
}

fn validate_int(raw: &Value) -> std::result::Result<Value, String> {
    match raw {
        Value::Number(number) if number.is_i64() || number.is_u64() => Ok(raw.clone()),
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| format!("\"{text}\" cannot be interpreted as an integer.")),
        other => Err(format!(
            "\"{}\" cannot be interpreted as an integer.",
            raw_display(other)
        )),
    }
}

fn validate_bool(raw: &Value) -> std::result::Result<Value, String> {
    match raw {
        Value::Bool(_) => Ok(raw.clone()),
        Value::String(text) => match text.to_lowercase().as_str() {
            "t" | "true" | "y" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
            "f" | "false" | "n" | "no" | "off" | "0" => Ok(Value::Bool(false)),
            _ => Err(format!(
                "\"{text}\" cannot be interpreted as a boolean value."
            )),
        },
        other => Err(format!(
            "\"{}\" is not a bool or a string.",
            raw_display(other)
        )),
    }
}

fn validate_color(raw: &Value) -> std::result::Result<Value, String> {
    if let Value::String(text) = raw {
        if let Some(digits) = text.strip_prefix('#') {
            if digits.len() == 6 && digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
                return Ok(raw.clone());
            }
        }
    }
    Err(format!(
        "\"{}\" is not a valid color expression.",
        raw_display(raw)
    ))
}

fn validate_fernet_key(raw: &Value) -> std::result::Result<Value, String> {
    let Value::String(text) = raw else {
        return Err("Fernet key must be 32 url-safe base64-encoded bytes.".to_owned());
    };

    if text == PLACEHOLDER_SECRET {
        return Err("This setting must be changed from its default value.".to_owned());
    }

    match URL_SAFE.decode(text) {
        Ok(decoded) if decoded.len() == 32 => Ok(raw.clone()),
        _ => Err("Fernet key must be 32 url-safe base64-encoded bytes.".to_owned()),
    }
}

fn validate_secret(raw: &Value) -> std::result::Result<Value, String> {
    if raw.as_str() == Some(PLACEHOLDER_SECRET) {
        return Err("This setting must be changed from its default value.".to_owned());
    }
    Ok(validate_text(raw))
}

fn validate_tls_url(raw: &Value) -> std::result::Result<Value, String> {
    match raw.as_str() {
        Some(url) if url.starts_with("https://") => Ok(raw.clone()),
        _ => Err("This setting must be a URL starting with https://.".to_owned()),
    }
}

fn validate_path(raw: &Value) -> std::result::Result<Value, String> {
    if let Some(path) = raw.as_str() {
        if std::path::Path::new(path).exists() {
            return Ok(raw.clone());
        }
    }
    Err(format!("\"{}\" does not exist.", raw_display(raw)))
}

fn validate_list(
    raw: &Value,
    delimiter: &str,
    element: &Validator,
) -> std::result::Result<Value, String> {
    let items: Vec<Value> = match raw {
        Value::String(text) => text
            .split(delimiter)
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .map(|fragment| Value::String(fragment.to_owned()))
            .collect(),
        Value::Array(items) => items.clone(),
        other => {
            return Err(format!(
                "\"{}\" cannot be interpreted as a list.",
                raw_display(other)
            ))
        }
    };

    let mut validated = Vec::with_capacity(items.len());
    for item in &items {
        validated.push(element.apply(item)?);
    }
    Ok(Value::Array(validated))
}
