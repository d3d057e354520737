//! Helpers for putting user-supplied values on a batch or shell command line

use std::collections::BTreeMap;
use std::path::Path;

use crate::constants::{
    DASH,
    DOUBLE_QUOTE,
    DOUBLE_QUOTE_ESCAPED,
};

/// Escapes a value for a batch or shell script.
///
/// Every double quote is doubled, then the result is wrapped in double
/// quotes unless it already starts or ends with one. Empty input is returned
/// unchanged. For comma-delimited path lists use
/// [`escape_comma_delimited_paths_for_script`].
pub fn escape_for_script(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    wrap_in_double_quotes(&input.replace(DOUBLE_QUOTE, DOUBLE_QUOTE_ESCAPED))
}

/// Escapes a comma-delimited list of paths for a batch or shell script.
///
/// Users may quote each path individually, so all double quotes are removed
/// before the whole list is wrapped.
pub fn escape_comma_delimited_paths_for_script(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    wrap_in_double_quotes(&input.replace(DOUBLE_QUOTE, ""))
}

/// Adds a leading and a trailing double quote, each only when missing.
pub fn wrap_in_double_quotes(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut output = String::with_capacity(input.len() + 2);
    if !input.starts_with(DOUBLE_QUOTE) {
        output.push_str(DOUBLE_QUOTE);
    }
    output.push_str(input);
    if !input.ends_with(DOUBLE_QUOTE) {
        output.push_str(DOUBLE_QUOTE);
    }
    output
}

pub fn prefix_with_dash(input: &str) -> String {
    if input.is_empty() || input.starts_with(DASH) {
        input.to_string()
    } else {
        format!("{}{}", DASH, input)
    }
}

/// Parses `key=value` lines the way a properties file is read, except that
/// backslashes are kept literally (Windows paths survive untouched).
///
/// Blank lines and lines starting with `#` or `!` are skipped. The key ends
/// at the first `=`, `:` or whitespace; later duplicates win.
pub fn parse_properties(input: &str) -> BTreeMap<String, String> {
    let mut properties = BTreeMap::new();

    for line in input.lines() {
        let line = line.trim_start();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let key_end = line
            .find(|c: char| c == '=' || c == ':' || c.is_whitespace())
            .unwrap_or(line.len());
        let (key, rest) = line.split_at(key_end);

        let rest = rest.trim_start();
        let value = rest
            .strip_prefix(['=', ':'])
            .map_or(rest, str::trim_start);

        properties.insert(key.to_string(), value.to_string());
    }

    properties
}

/// Resolves `folder` against `workspace` when relative, then escapes it.
pub fn resolve_path(folder: &str, workspace: &Path) -> String {
    let folder_path = Path::new(folder);
    let resolved = if folder_path.is_absolute() {
        folder_path.to_path_buf()
    } else {
        workspace.join(folder_path)
    };

    escape_for_script(&resolved.to_string_lossy())
}
