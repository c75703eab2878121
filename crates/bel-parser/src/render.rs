//! Rendering statements back to text.

use std::{borrow::Cow, fmt, str::FromStr};

use crate::{
    assemble::{is_function_head, split_namespace},
    ast::{NodeData, NodeId, Object, Relation, Statement, Triple},
};

/// Output style for rendered statements.
///
/// | Format | Functions | Relations | Separator |
/// |--------|-----------|-----------|-----------|
/// | `Short` | abbreviated | abbreviated | `,` |
/// | `Medium` | abbreviated | long | `, ` |
/// | `Long` | long | long | `, ` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    Short,
    #[default]
    Medium,
    Long,
}

impl Format {
    fn separator(self) -> &'static str {
        match self {
            Format::Short => ",",
            Format::Medium | Format::Long => ", ",
        }
    }

    /// Relation name in this format; unknown relations render as written.
    pub fn relation_name(self, relation: &Relation) -> &str {
        let name = match self {
            Format::Short => relation.short_name(),
            Format::Medium | Format::Long => relation.long_name(),
        };
        name.unwrap_or(relation.written_name().as_str())
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Short => "short",
            Format::Medium => "medium",
            Format::Long => "long",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "short" => Ok(Format::Short),
            "medium" => Ok(Format::Medium),
            "long" => Ok(Format::Long),
            other => Err(format!("unknown format `{other}`")),
        }
    }
}

/// Quote a value if it contains whitespace, a comma, a parenthesis, a double
/// quote or a backslash, escaping internal quotes and backslashes.
pub fn quote_value(value: &str) -> Cow<'_, str> {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ',' | '(' | ')' | '"' | '\\'));
    if needs_quotes {
        Cow::Owned(quoted(value))
    } else {
        Cow::Borrowed(value)
    }
}

/// Like [`quote_value`], also quoting literals that would otherwise read
/// back as a namespace term or a function.
fn quote_literal(value: &str) -> Cow<'_, str> {
    if split_namespace(value).is_some() || is_function_head(value) {
        Cow::Owned(quoted(value))
    } else {
        quote_value(value)
    }
}

fn quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

impl Statement {
    /// Render the whole statement.
    pub fn render(&self, format: Format) -> String {
        self.render_triple(self.triple(), format)
    }

    /// Render a single node and its arguments.
    pub fn render_node(&self, id: NodeId, format: Format) -> String {
        match self.node(id).data() {
            NodeData::Function(function) => {
                let name = match format {
                    Format::Short | Format::Medium => function.short_name(),
                    Format::Long => function.long_name(),
                }
                .unwrap_or(function.written_name().as_str());
                let args: Vec<String> = function
                    .args()
                    .iter()
                    .map(|&arg| self.render_node(arg, format))
                    .collect();
                format!("{}({})", name, args.join(format.separator()))
            }
            NodeData::NsArg(ns_arg) => {
                format!("{}:{}", ns_arg.namespace(), quote_value(ns_arg.value()))
            }
            NodeData::StrArg(str_arg) => quote_literal(str_arg.value()).into_owned(),
        }
    }

    fn render_triple(&self, triple: &Triple, format: Format) -> String {
        let subject = self.render_node(triple.subject(), format);
        match (triple.relation(), triple.object()) {
            (Some(relation), Some(object)) => {
                let object = match object {
                    Object::Function(id) => self.render_node(*id, format),
                    Object::Statement(nested) => {
                        format!("({})", self.render_triple(nested, format))
                    }
                };
                format!("{} {} {}", subject, format.relation_name(relation), object)
            }
            _ => subject,
        }
    }
}
