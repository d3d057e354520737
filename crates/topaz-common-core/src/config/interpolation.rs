use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterpolationError {
    #[error("Required environment variable not found: {0}")]
    RequiredVarNotFound(String),
}

pub type InterpolationResult<T> = Result<T, InterpolationError>;

static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("Invalid regex pattern")
});

/// Expands `${VAR}` and `${VAR:-default}` references from the environment.
///
/// Substituted values are not expanded again.
pub fn interpolate(input: &str) -> InterpolationResult<String> {
    let mut output = String::with_capacity(input.len());
    let mut last = 0;

    for caps in VAR_PATTERN.captures_iter(input) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        output.push_str(&input[last..whole.start()]);

        let value = match std::env::var(name.as_str()) {
            Ok(value) => value,
            Err(_) => match caps.get(2) {
                Some(default) => default.as_str().to_string(),
                None => {
                    return Err(InterpolationError::RequiredVarNotFound(
                        name.as_str().to_string(),
                    ))
                }
            },
        };
        output.push_str(&value);
        last = whole.end();
    }

    output.push_str(&input[last..]);
    Ok(output)
}

/// Applies [`interpolate`] to every string inside a TOML value.
pub fn interpolate_toml(value: &mut toml::Value) -> InterpolationResult<()> {
    match value {
        toml::Value::String(s) if has_variables(s) => *s = interpolate(s)?,
        toml::Value::Array(items) => {
            for item in items {
                interpolate_toml(item)?;
            }
        }
        toml::Value::Table(table) => {
            for (_, item) in table.iter_mut() {
                interpolate_toml(item)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// True when `input` contains a `${VAR}` reference.
pub fn has_variables(input: &str) -> bool {
    VAR_PATTERN.is_match(input)
}
