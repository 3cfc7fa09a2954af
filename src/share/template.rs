//! Share message templates.
//!
//! Placeholders are written `{{key}}`, optionally with whitespace inside the
//! braces (`{{ key }}`). Keys may contain letters, digits, `_`, `.` and `-`.
//! Unknown keys render as an empty string; braces that do not form a
//! placeholder are copied through unchanged. Rendering never fails.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value;

use super::request::ShareInfo;

/// Flat key/value data a template is rendered against.
pub type TemplateContext = HashMap<String, String>;

/// Template used when none is configured.
pub const DEFAULT_TEMPLATE: &str =
    "{{site_title}} share\nLink: {{link}}\nPassword: {{pwd}}\nExpires: {{expires_display}}";

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").expect("placeholder pattern is valid")
    })
}

/// Render `template` against `context`.
pub fn compile(template: &str, context: &TemplateContext) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures<'_>| {
            context.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

/// Keys referenced by `template`, in order of first appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for caps in placeholder_regex().captures_iter(template) {
        let key = &caps[1];
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
    keys
}

/// Build the template context for a share result.
///
/// Every field of `result` is flattened into the context; `overrides` are
/// applied last and win over result fields with the same name.
pub fn make_template_data<I, K, V>(result: &ShareInfo, overrides: I) -> TemplateContext
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut context = TemplateContext::new();
    for (key, value) in result.fields() {
        flatten_into(&mut context, key, value);
    }
    for (key, value) in overrides {
        context.insert(key.into(), value.into());
    }
    context
}

fn flatten_into(context: &mut TemplateContext, key: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (child, child_value) in map {
                flatten_into(context, &format!("{}.{}", key, child), child_value);
            }
        }
        other => {
            context.insert(key.to_string(), scalar_text(other));
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(scalar_text)
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}
