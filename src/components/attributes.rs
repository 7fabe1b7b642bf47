//! Ordered attribute bag with identifier → wire-name aliasing
//!
//! Attribute names are written the way an author would spell them as an
//! identifier (`class_name`, `html_for`, `data_user_id`) and serialized under
//! their HTML wire name (`class`, `for`, `data-user-id`).

/// Explicit identifier → wire name aliases
const ALIASES: &[(&str, &str)] = &[
    ("class_name", "class"),
    ("html_for", "for"),
    ("http_equiv", "http-equiv"),
    ("accept_charset", "accept-charset"),
];

/// Resolve the wire name for an attribute identifier.
///
/// Rules, in order:
/// - explicit aliases (`class_name` → `class`)
/// - a single trailing underscore is dropped (`type_` → `type`)
/// - `data_*` and `aria_*` use hyphens (`data_user_id` → `data-user-id`)
/// - anything else is used as-is
pub fn wire_name(name: &str) -> String {
    if let Some((_, wire)) = ALIASES.iter().find(|(ident, _)| *ident == name) {
        return (*wire).to_string();
    }

    let name = match name.strip_suffix('_') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => name,
    };

    if name.starts_with("data_") || name.starts_with("aria_") {
        return name.replace('_', "-");
    }

    name.to_string()
}

/// Why `name` cannot be emitted as an attribute name, if it cannot
pub fn attribute_name_error(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("attribute names cannot be empty");
    }
    let forbidden = |c: char| {
        c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
    };
    if name.chars().any(forbidden) {
        return Some("attribute names cannot contain whitespace, quotes, '<', '>', '/' or '='");
    }
    None
}

/// A single attribute on a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Identifier the attribute was declared with
    pub name: String,
    /// Name emitted in markup
    pub wire_name: String,
    /// Value; `None` means unset and the attribute is omitted from output
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        let name = name.into();
        let wire_name = wire_name(&name);
        Self {
            name,
            wire_name,
            value,
        }
    }

    /// Attribute with a wire name that bypasses the alias rules
    pub fn with_wire_name(
        name: impl Into<String>,
        wire_name: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            wire_name: wire_name.into(),
            value,
        }
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

/// Attributes in declaration order.
///
/// Setting an attribute whose identifier or wire name already exists replaces
/// it in place, so the first declaration fixes the position and the last one
/// supplies the value. `class_name` followed by `class` emits one `class`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<Attribute>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an attribute with the same identifier or wire name
    pub fn set(&mut self, attribute: Attribute) {
        let existing = self
            .entries
            .iter_mut()
            .find(|a| a.name == attribute.name || a.wire_name == attribute.wire_name);
        match existing {
            Some(existing) => *existing = attribute,
            None => self.entries.push(attribute),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.entries.iter().find(|a| a.name == name)
    }

    /// Value of an attribute, `None` when absent or unset
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|a| a.value.as_deref())
    }

    pub fn remove(&mut self, name: &str) -> Option<Attribute> {
        let index = self.entries.iter().position(|a| a.name == name)?;
        Some(self.entries.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.entries.iter()
    }

    /// Attributes that carry a value, as `(wire name, value)` pairs
    pub fn set_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|a| a.value.as_deref().map(|v| (a.wire_name.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Attribute> for Attributes {
    fn from_iter<T: IntoIterator<Item = Attribute>>(iter: T) -> Self {
        let mut attributes = Attributes::new();
        for attribute in iter {
            attributes.set(attribute);
        }
        attributes
    }
}
