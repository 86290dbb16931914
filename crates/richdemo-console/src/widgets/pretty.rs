//! Pretty printing of serializable values.
//!
//! Values go through `serde_json::Value`, so anything `Serialize` works.
//! A container stays on one line when it fits; otherwise each entry gets its
//! own line, indented by four cells per level.

use serde::Serialize;
use serde_json::Value;

use crate::content::{Content, Line, Span};
use crate::error::{ConsoleError, ConsoleResult};
use crate::theme::theme;

use super::Renderable;

const INDENT: usize = 4;

#[derive(Debug, Clone)]
pub struct Pretty {
    value: Value,
    expand_all: bool,
}

impl Pretty {
    /// Capture `value`. Fails if it cannot be serialized.
    pub fn new<T: Serialize + ?Sized>(value: &T) -> ConsoleResult<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| ConsoleError::render_failure(format!("cannot pretty print: {e}")))?;
        Ok(Self::from_value(value))
    }

    #[must_use]
    pub fn from_value(value: Value) -> Self {
        Self {
            value,
            expand_all: false,
        }
    }

    /// Put every container entry on its own line, even when it would fit.
    #[must_use]
    pub fn expand_all(mut self, expand: bool) -> Self {
        self.expand_all = expand;
        self
    }

    fn emit(&self, value: &Value, indent: usize, key: Option<&str>, comma: bool, width: usize, out: &mut Vec<Line>) {
        let mut head = Line::plain(" ".repeat(indent));
        if let Some(key) = key {
            head.push(Span::styled(format!("{key:?}"), theme().key.clone()));
            head.push_str(": ");
        }

        let (open, close, entries): (&str, &str, Vec<(Option<&str>, &Value)>) = match value {
            Value::Object(map) if !map.is_empty() => (
                "{",
                "}",
                map.iter().map(|(k, v)| (Some(k.as_str()), v)).collect(),
            ),
            Value::Array(items) if !items.is_empty() => {
                ("[", "]", items.iter().map(|v| (None, v)).collect())
            }
            _ => {
                head.extend(compact(value));
                if comma {
                    head.push_str(",");
                }
                out.push(head);
                return;
            }
        };

        let inline = compact(value);
        if !self.expand_all && head.width() + inline.width() + usize::from(comma) <= width {
            head.extend(inline);
            if comma {
                head.push_str(",");
            }
            out.push(head);
            return;
        }

        head.push_str(open);
        out.push(head);
        let last = entries.len() - 1;
        for (i, (key, child)) in entries.into_iter().enumerate() {
            self.emit(child, indent + INDENT, key, i != last, width, out);
        }
        let mut tail = Line::plain(" ".repeat(indent));
        tail.push_str(if comma { format!("{close},") } else { close.to_string() });
        out.push(tail);
    }
}

/// Single-line rendering of any value.
fn compact(value: &Value) -> Line {
    let t = theme();
    match value {
        Value::Null => Line::styled("null", t.null.clone()),
        Value::Bool(b) => Line::styled(b.to_string(), t.boolean.clone()),
        Value::Number(n) => Line::styled(n.to_string(), t.number.clone()),
        Value::String(s) => Line::styled(format!("{s:?}"), t.string.clone()),
        Value::Array(items) => {
            let mut line = Line::plain("[");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    line.push_str(", ");
                }
                line.extend(compact(item));
            }
            line.push_str("]");
            line
        }
        Value::Object(map) => {
            let mut line = Line::plain("{");
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    line.push_str(", ");
                }
                line.push(Span::styled(format!("{k:?}"), t.key.clone()));
                line.push_str(": ");
                line.extend(compact(v));
            }
            line.push_str("}");
            line
        }
    }
}

impl Renderable for Pretty {
    fn render(&self, width: usize) -> ConsoleResult<Content> {
        let mut lines = Vec::new();
        self.emit(&self.value, 0, None, false, width, &mut lines);
        Ok(Content::from_lines(lines).wrap(width))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_fits_on_one_line() {
        let pretty = Pretty::from_value(json!({"name": "Alice", "age": 30}));
        assert_eq!(
            pretty.render(80).unwrap().plain_text(),
            r#"{"age": 30, "name": "Alice"}"#
        );
    }

    #[test]
    fn test_expands_when_too_wide() {
        let pretty = Pretty::from_value(json!({"name": "Alice", "roles": ["admin", "user"]}));
        let text = pretty.render(40).unwrap().plain_text();
        assert_eq!(
            text,
            "{\n    \"name\": \"Alice\",\n    \"roles\": [\"admin\", \"user\"]\n}"
        );
    }

    #[test]
    fn test_expand_all() {
        let pretty = Pretty::from_value(json!([1, 2])).expand_all(true);
        assert_eq!(pretty.render(80).unwrap().plain_text(), "[\n    1,\n    2\n]");
    }

    #[test]
    fn test_empty_containers_stay_inline() {
        let pretty = Pretty::from_value(json!({"tags": [], "meta": {}})).expand_all(true);
        let text = pretty.render(80).unwrap().plain_text();
        assert!(text.contains("\"meta\": {},"));
        assert!(text.contains("\"tags\": []"));
    }

    #[test]
    fn test_serializable_structs() {
        #[derive(Serialize)]
        struct Server {
            host: String,
            port: u16,
            healthy: bool,
        }
        let pretty = Pretty::new(&Server {
            host: "db1".into(),
            port: 5432,
            healthy: true,
        })
        .unwrap();
        let text = pretty.render(80).unwrap().plain_text();
        assert!(text.contains("\"port\": 5432"));
        assert!(text.contains("\"healthy\": true"));
    }

    #[test]
    fn test_values_carry_theme_styles() {
        let content = Pretty::from_value(json!({"n": 1})).render(80).unwrap();
        let styles: Vec<_> = content.lines()[0]
            .spans()
            .iter()
            .filter_map(Span::style)
            .cloned()
            .collect();
        assert!(styles.contains(&theme().key));
        assert!(styles.contains(&theme().number));
    }
}
