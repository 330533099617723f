use serde_json::Value;

use crate::{ data_uri::DataUri, error::SchemaViolation };

#[derive(Debug, Clone, PartialEq)]
pub enum PromptPart {
    Text(String),
    Media {
        mime_type: String,
        data: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderedPrompt {
    pub parts: Vec<PromptPart>,
}

impl RenderedPrompt {
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| {
                match part {
                    PromptPart::Text(text) => Some(text.as_str()),
                    PromptPart::Media { .. } => None,
                }
            })
            .collect()
    }

    pub fn media_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part, PromptPart::Media { .. }))
            .count()
    }
}

/// Instruction template with `{{{field}}}` text placeholders and
/// `{{media url=field}}` image placeholders.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub name: &'static str,
    source: &'static str,
}

impl PromptTemplate {
    pub const fn new(name: &'static str, source: &'static str) -> Self {
        Self { name, source }
    }

    /// Expects `input` to have been validated already. Missing fields render
    /// as empty text and an empty data URI attaches nothing.
    pub fn render(&self, input: &Value) -> Result<RenderedPrompt, SchemaViolation> {
        let mut parts = Vec::new();
        let mut text = String::new();
        let mut rest = self.source;

        while let Some(start) = rest.find("{{") {
            text.push_str(&rest[..start]);
            let tail = &rest[start..];

            if let Some(inner) = tail.strip_prefix("{{{") {
                if let Some(end) = inner.find("}}}") {
                    text.push_str(&plain_text(lookup(input, inner[..end].trim())));
                    rest = &inner[end + 3..];
                    continue;
                }
            } else if let Some(inner) = tail.strip_prefix("{{") {
                if let Some(end) = inner.find("}}") {
                    let tag = inner[..end].trim();
                    match tag.strip_prefix("media url=") {
                        Some(key) => {
                            let key = key.trim();
                            if let Some(media) = media_part(input, key)? {
                                flush(&mut parts, &mut text);
                                parts.push(media);
                            }
                        }
                        None => text.push_str(&plain_text(lookup(input, tag))),
                    }
                    rest = &inner[end + 2..];
                    continue;
                }
            }

            // Unterminated braces are literal text.
            text.push_str("{{");
            rest = &tail[2..];
        }

        text.push_str(rest);
        flush(&mut parts, &mut text);

        Ok(RenderedPrompt { parts })
    }
}

fn flush(parts: &mut Vec<PromptPart>, text: &mut String) {
    if !text.is_empty() {
        parts.push(PromptPart::Text(std::mem::take(text)));
    }
}

fn lookup<'a>(input: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(input, |current, segment| current.get(segment))
}

fn plain_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

fn media_part(input: &Value, key: &str) -> Result<Option<PromptPart>, SchemaViolation> {
    let uri = match lookup(input, key).and_then(Value::as_str) {
        Some(uri) if !uri.trim().is_empty() => uri,
        _ => {
            return Ok(None);
        }
    };

    let decoded = DataUri::parse(uri).map_err(|e|
        SchemaViolation::new(key, "base64 data URI", e.to_string())
    )?;

    Ok(
        Some(PromptPart::Media {
            mime_type: decoded.mime_type,
            data: decoded.data,
        })
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEMPLATE: PromptTemplate = PromptTemplate::new(
        "test",
        "Age: {{{age}}}\nWeight: {{{weight}}} kg\nNotes: {{{notes}}}\nPhoto: {{media url=photo}}\nDone."
    );

    #[test]
    fn test_text_placeholders_render_plain_values() {
        let rendered = TEMPLATE.render(&json!({ "age": 30, "weight": 72.5, "photo": "" })).unwrap();

        assert_eq!(rendered.text(), "Age: 30\nWeight: 72.5 kg\nNotes: \nPhoto: \nDone.");
        assert_eq!(rendered.media_count(), 0);
        assert_eq!(rendered.parts.len(), 1);
    }

    #[test]
    fn test_media_placeholder_attaches_decoded_bytes() {
        let photo = DataUri::encode("image/jpeg", b"jpeg-bytes");
        let rendered = TEMPLATE.render(
            &json!({ "age": 41, "weight": 80, "notes": "none", "photo": photo })
        ).unwrap();

        assert_eq!(rendered.parts.len(), 3);
        assert_eq!(rendered.parts[0], PromptPart::Text("Age: 41\nWeight: 80 kg\nNotes: none\nPhoto: ".to_string()));
        assert_eq!(rendered.parts[1], PromptPart::Media {
            mime_type: "image/jpeg".to_string(),
            data: b"jpeg-bytes".to_vec(),
        });
        assert_eq!(rendered.parts[2], PromptPart::Text("\nDone.".to_string()));
        assert!(!rendered.text().contains("base64"));
    }

    #[test]
    fn test_bad_data_uri_is_reported_on_the_field() {
        let err = TEMPLATE.render(&json!({ "photo": "not-a-data-uri" })).unwrap_err();
        assert_eq!(err.path, "photo");
    }

    #[test]
    fn test_double_stash_and_unterminated_braces() {
        let template = PromptTemplate::new("t", "Hi {{name}}, {{ oops");
        let rendered = template.render(&json!({ "name": "Ada" })).unwrap();
        assert_eq!(rendered.text(), "Hi Ada, {{ oops");
    }

    #[test]
    fn test_nested_lookup() {
        let template = PromptTemplate::new("t", "{{{profile.goal}}}");
        let rendered = template.render(&json!({ "profile": { "goal": "weightLoss" } })).unwrap();
        assert_eq!(rendered.text(), "weightLoss");
    }
}
