//! Prompt Templates
//!
//! Templates use `{name}` placeholders. `{{` and `}}` render literal braces.
//! Rendering fails if any placeholder is left unbound.

use std::collections::{BTreeSet, HashMap};

use crate::error::{AgentError, Result};

/// A text template with named placeholders
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
    placeholders: BTreeSet<String>,
}

enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

impl PromptTemplate {
    /// Parse a template body, collecting its placeholders
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        let placeholders = segments(&template)?
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(name) => Some(name.to_string()),
                Segment::Literal(_) => None,
            })
            .collect();

        Ok(Self {
            template,
            placeholders,
        })
    }

    /// Placeholder names in the template
    pub const fn placeholders(&self) -> &BTreeSet<String> {
        &self.placeholders
    }

    /// Raw template body
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Substitute every placeholder. Extra bindings are ignored.
    pub fn render(&self, vars: &HashMap<&str, String>) -> Result<String> {
        let missing: Vec<&str> = self
            .placeholders
            .iter()
            .map(String::as_str)
            .filter(|name| !vars.contains_key(name))
            .collect();
        if !missing.is_empty() {
            return Err(AgentError::Template(format!(
                "missing value for placeholder(s): {}",
                missing.join(", ")
            )));
        }

        let mut out = String::with_capacity(self.template.len());
        for segment in segments(&self.template)? {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => out.push_str(&vars[name]),
            }
        }
        Ok(out)
    }

    /// Convenience wrapper over [`render`](Self::render) for literal pairs
    pub fn render_with(&self, vars: &[(&str, &str)]) -> Result<String> {
        let map = vars
            .iter()
            .map(|(key, value)| (*key, (*value).to_string()))
            .collect();
        self.render(&map)
    }
}

fn segments(template: &str) -> Result<Vec<Segment<'_>>> {
    let mut out = Vec::new();
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        if pos > 0 {
            out.push(Segment::Literal(&rest[..pos]));
        }
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push(Segment::Literal("{"));
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push(Segment::Literal("}"));
            rest = &tail[2..];
        } else if tail.starts_with('}') {
            return Err(AgentError::Template("unmatched '}' in template".into()));
        } else {
            let end = tail
                .find('}')
                .ok_or_else(|| AgentError::Template("unclosed '{' in template".into()))?;
            let name = tail[1..end].trim();
            if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return Err(AgentError::Template(format!(
                    "invalid placeholder '{}'",
                    &tail[..=end]
                )));
            }
            out.push(Segment::Placeholder(name));
            rest = &tail[end + 1..];
        }
    }

    if !rest.is_empty() {
        out.push(Segment::Literal(rest));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_placeholders() {
        let template = PromptTemplate::new("Query: {query}\nResults: {results}\n{query}").unwrap();
        let names: Vec<&str> = template.placeholders().iter().map(String::as_str).collect();
        assert_eq!(names, vec!["query", "results"]);
    }

    #[test]
    fn test_render_substitutes_all() {
        let template = PromptTemplate::new("Q: {query} / R: {results}").unwrap();
        let text = template
            .render_with(&[("query", "rust"), ("results", "fast"), ("unused", "x")])
            .unwrap();
        assert_eq!(text, "Q: rust / R: fast");
    }

    #[test]
    fn test_unbound_placeholder_fails() {
        let template = PromptTemplate::new("Q: {query} / R: {results}").unwrap();
        let err = template.render_with(&[("query", "rust")]).unwrap_err();
        assert!(matches!(err, AgentError::Template(msg) if msg.contains("results")));
    }

    #[test]
    fn test_escaped_braces() {
        let template = PromptTemplate::new("{{\"tool\": \"{name}\"}}").unwrap();
        assert_eq!(template.placeholders().len(), 1);
        assert_eq!(
            template.render_with(&[("name", "Search")]).unwrap(),
            "{\"tool\": \"Search\"}"
        );
    }

    #[test]
    fn test_malformed_templates_rejected() {
        assert!(PromptTemplate::new("open {query").is_err());
        assert!(PromptTemplate::new("close } here").is_err());
        assert!(PromptTemplate::new("bad {two words}").is_err());
    }

    #[test]
    fn test_substituted_values_are_not_reparsed() {
        let template = PromptTemplate::new("{input}").unwrap();
        assert_eq!(template.render_with(&[("input", "{not_a_var}")]).unwrap(), "{not_a_var}");
    }
}
