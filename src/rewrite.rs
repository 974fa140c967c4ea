//! Rewriting of manifest paths so they resolve from inside the output
//! directory instead of the project root.
//!
//! The root manifest points at files like `dist/cjs/index.js` or
//! `./dist/esm/index.js`; the copy shipped inside `dist/` needs
//! `cjs/index.js` and `./esm/index.js`.

use serde_json::{Map, Value};

/// Strip the output-directory prefix from a single path.
///
/// `./<out_dir>/x` becomes `./x` and `<out_dir>/x` becomes `x`. Anything else
/// is returned unchanged.
pub fn strip_out_dir_prefix(path: &str, out_dir: &str) -> String {
    if let Some(rest) = path
        .strip_prefix("./")
        .and_then(|p| p.strip_prefix(out_dir))
        .and_then(|p| p.strip_prefix('/'))
    {
        return format!("./{}", rest);
    }

    if let Some(rest) = path
        .strip_prefix(out_dir)
        .and_then(|p| p.strip_prefix('/'))
    {
        return rest.to_string();
    }

    path.to_string()
}

/// Apply [`strip_out_dir_prefix`] to a JSON value. Non-strings pass through.
pub fn rewrite_path(value: &Value, out_dir: &str) -> Value {
    match value {
        Value::String(path) => {
            let rewritten = strip_out_dir_prefix(path, out_dir);
            if rewritten != *path {
                tracing::trace!("rewrote {} -> {}", path, rewritten);
            }
            Value::String(rewritten)
        }
        other => other.clone(),
    }
}

/// Rewrite every string leaf of an `exports` value, keeping key order and
/// nesting. Arrays and scalars other than strings are left alone.
pub fn rewrite_exports(value: &Value, out_dir: &str) -> Value {
    match value {
        Value::String(_) => rewrite_path(value, out_dir),
        Value::Object(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, entry)| (key.clone(), rewrite_exports(entry, out_dir)))
                .collect::<Map<String, Value>>(),
        ),
        other => other.clone(),
    }
}

/// Rewrite `sideEffects` when it is a list of globs. A boolean flag is
/// returned as is.
pub fn rewrite_side_effects(value: &Value, out_dir: &str) -> Value {
    match value {
        Value::Array(items) => {
            Value::Array(items.iter().map(|item| rewrite_path(item, out_dir)).collect())
        }
        other => other.clone(),
    }
}
