//! Declarative field validation
//!
//! A schema is a tree of [`ObjectSchema`] nodes whose leaves are
//! [`FieldSchema`]s. Each leaf carries an ordered list of rules with a
//! human-readable message; the first failing rule of a field is reported,
//! keyed by the field's dotted path (`endereco.cep`).
//!
//! Validation runs over a `serde_json::Value` holding the raw form input, so
//! the same schema describes what the user typed and what goes on the wire.

pub mod schemas;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)*\.[a-zA-Z]{2,}$").unwrap()
});

/// Input mask applied when a field is edited.
pub type Mask = fn(&str) -> String;

#[derive(Debug, Clone)]
enum Rule {
    /// At least `n` characters.
    MinLen(usize, &'static str),
    Email(&'static str),
    OneOf(&'static [&'static str], &'static str),
    /// `YYYY-MM-DD`
    IsoDate(&'static str),
}

impl Rule {
    fn message(&self) -> &'static str {
        match self {
            Rule::MinLen(_, msg) | Rule::Email(msg) | Rule::OneOf(_, msg) | Rule::IsoDate(msg) => {
                *msg
            }
        }
    }

    fn holds(&self, value: &str) -> bool {
        match self {
            Rule::MinLen(n, _) => value.chars().count() >= *n,
            Rule::Email(_) => EMAIL_RE.is_match(value),
            Rule::OneOf(allowed, _) => allowed.contains(&value),
            Rule::IsoDate(_) => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
        }
    }
}

/// Constraints of a single string field.
#[derive(Debug, Clone, Default)]
pub struct FieldSchema {
    optional: bool,
    rules: Vec<Rule>,
    mask: Option<Mask>,
}

impl FieldSchema {
    pub fn string() -> Self {
        Self::default()
    }

    /// Non-empty.
    pub fn required(self, message: &'static str) -> Self {
        self.min_len(1, message)
    }

    pub fn min_len(mut self, n: usize, message: &'static str) -> Self {
        self.rules.push(Rule::MinLen(n, message));
        self
    }

    pub fn email(mut self, message: &'static str) -> Self {
        self.rules.push(Rule::Email(message));
        self
    }

    pub fn one_of(mut self, allowed: &'static [&'static str], message: &'static str) -> Self {
        self.rules.push(Rule::OneOf(allowed, message));
        self
    }

    pub fn iso_date(mut self, message: &'static str) -> Self {
        self.rules.push(Rule::IsoDate(message));
        self
    }

    /// Empty or absent values skip every rule.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn mask(mut self, mask: Mask) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Apply the input mask, if any.
    pub fn apply_mask(&self, raw: &str) -> String {
        match self.mask {
            Some(mask) => mask(raw),
            None => raw.to_string(),
        }
    }

    /// First failing rule's message.
    fn check(&self, value: Option<&Value>) -> Option<&'static str> {
        let text = match value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.as_str()),
            Some(_) => return Some("Valor inválido"),
        };

        match text {
            None | Some("") if self.optional => None,
            None => self.rules.first().map(Rule::message),
            Some(s) => self.rules.iter().find(|r| !r.holds(s)).map(Rule::message),
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Field(FieldSchema),
    Object { schema: ObjectSchema, optional: bool },
}

/// A JSON object of fields and nested objects.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    entries: Vec<(&'static str, Node)>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, field: FieldSchema) -> Self {
        self.entries.push((name, Node::Field(field)));
        self
    }

    pub fn object(mut self, name: &'static str, schema: ObjectSchema) -> Self {
        self.entries.push((
            name,
            Node::Object {
                schema,
                optional: false,
            },
        ));
        self
    }

    /// Nested object whose fields are validated only when it is present.
    pub fn optional_object(mut self, name: &'static str, schema: ObjectSchema) -> Self {
        self.entries.push((
            name,
            Node::Object {
                schema,
                optional: true,
            },
        ));
        self
    }

    /// Every leaf path, in declaration order.
    pub fn field_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_paths("", &mut paths);
        paths
    }

    fn collect_paths(&self, prefix: &str, out: &mut Vec<String>) {
        for (name, node) in &self.entries {
            let path = join(prefix, name);
            match node {
                Node::Field(_) => out.push(path),
                Node::Object { schema, .. } => schema.collect_paths(&path, out),
            }
        }
    }

    /// Look up the leaf at a dotted path.
    pub fn find(&self, path: &str) -> Option<&FieldSchema> {
        let (head, tail) = match path.split_once('.') {
            Some((head, tail)) => (head, Some(tail)),
            None => (path, None),
        };
        let node = self
            .entries
            .iter()
            .find(|(name, _)| *name == head)
            .map(|(_, node)| node)?;

        match (node, tail) {
            (Node::Field(field), None) => Some(field),
            (Node::Object { schema, .. }, Some(rest)) => schema.find(rest),
            _ => None,
        }
    }

    /// Validate the full input. Collects one error per failing field.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        self.validate_into(Some(value), "", &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_into(&self, value: Option<&Value>, prefix: &str, errors: &mut ValidationErrors) {
        for (name, node) in &self.entries {
            let path = join(prefix, name);
            let child = value.and_then(|v| v.get(*name));

            match node {
                Node::Field(field) => {
                    if let Some(message) = field.check(child) {
                        errors.push(path, message);
                    }
                }
                Node::Object { schema, optional } => match child {
                    Some(Value::Object(_)) => schema.validate_into(child, &path, errors),
                    None | Some(Value::Null) if *optional => {}
                    None | Some(Value::Null) => schema.validate_into(None, &path, errors),
                    Some(_) => errors.push(path, "Valor inválido"),
                },
            }
        }
    }

    /// Normalize raw input before validation and submission:
    /// empty optional fields become `null`, and optional nested objects
    /// whose fields are all empty become `null` (absent).
    pub fn prune(&self, value: &mut Value) {
        let Some(map) = value.as_object_mut() else {
            return;
        };

        for (name, node) in &self.entries {
            let Some(child) = map.get_mut(*name) else {
                continue;
            };
            match node {
                Node::Field(field) => {
                    if field.optional && child.as_str() == Some("") {
                        *child = Value::Null;
                    }
                }
                Node::Object { schema, optional } => {
                    schema.prune(child);
                    if *optional && is_blank(child) {
                        *child = Value::Null;
                    }
                }
            }
        }
    }
}

/// True when every string inside `value` is empty (ids and nulls ignored).
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map
            .iter()
            .filter(|(key, _)| key.as_str() != "id")
            .all(|(_, v)| is_blank(v)),
        _ => false,
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

/// Resolve a dotted path inside a JSON value.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| current.get(key))
}

/// A failing field and its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

/// Field-scoped validation failures; blocks submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Message to show next to the input at `path`.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.message.as_str())
    }

    pub fn paths(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.path.as_str()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
