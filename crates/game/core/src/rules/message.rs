//! Diagnostics collected while validating and applying rule elements.
//!
//! Messages are plain records. They are collected on the rule element, never
//! thrown, and rendered through a [`MessageFormatter`] chosen by the host.

use std::collections::HashMap;

use serde::Serialize;

use crate::document::ValueType;

/// Severity of a diagnostic.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    strum::Display,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A single diagnostic about one rule element.
#[derive(Clone, Debug, PartialEq, Serialize, strum::EnumDiscriminants)]
#[serde(tag = "kind", rename_all = "kebab-case")]
#[strum_discriminants(
    name(MessageKind),
    derive(Hash, strum::Display, strum::AsRefStr, strum::EnumIter),
    strum(serialize_all = "kebab-case")
)]
pub enum RuleElementMessage {
    /// A required source field is absent.
    MissingProperty { property: String },

    /// The source has a field the schema does not know.
    AdditionalProperty { property: String },

    /// A source field has the wrong JSON type or an unknown identifier.
    WrongType { property: String, expected: String },

    /// A field is well-typed but cannot be parsed.
    SyntaxError { property: String, reason: String },

    /// The rule kind does not accept the value's type.
    WrongValueType { expected: String, found: ValueType },

    /// A SPECIAL component names no SPECIAL.
    WrongSpecialName { name: String },

    /// A declared selector is ignored for this rule kind.
    NotMatchingSelector { selector: String },

    /// The selected document has no such root field.
    WrongSelectedType { path: String, document: String },

    /// The target resolves only partially on the selected document.
    NotMatchingTarget { path: String, document: String },

    /// The target is not a plain number.
    NotModifiableNumber {
        path: String,
        document: String,
        found: ValueType,
    },

    /// The target is not a composite number.
    NotCompositeNumber {
        path: String,
        document: String,
        found: ValueType,
    },

    /// The target's type is not one this rule kind writes.
    WrongTargetType {
        path: String,
        document: String,
        expected: String,
        found: ValueType,
    },

    /// An actor-scoped rule selected something other than an actor.
    NotActor { document: String },

    /// A replacement changed the type of the target.
    ChangedType {
        path: String,
        document: String,
        from: ValueType,
        to: ValueType,
    },

    /// The rule had errors and changed nothing.
    NotSaved,
}

impl RuleElementMessage {
    pub fn kind(&self) -> MessageKind {
        MessageKind::from(self)
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::NotMatchingSelector { .. } => Severity::Info,
            Self::ChangedType { .. } | Self::NotSaved => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }

    /// Localization key of the message template.
    pub fn key(&self) -> &'static str {
        self.kind().key()
    }

    /// Named parameters that fill the template.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::MissingProperty { property } | Self::AdditionalProperty { property } => {
                vec![("property", property.clone())]
            }
            Self::WrongType { property, expected } => vec![
                ("property", property.clone()),
                ("expected", expected.clone()),
            ],
            Self::SyntaxError { property, reason } => vec![
                ("property", property.clone()),
                ("reason", reason.clone()),
            ],
            Self::WrongValueType { expected, found } => vec![
                ("expected", expected.clone()),
                ("found", found.to_string()),
            ],
            Self::WrongSpecialName { name } => vec![("name", name.clone())],
            Self::NotMatchingSelector { selector } => vec![("selector", selector.clone())],
            Self::WrongSelectedType { path, document }
            | Self::NotMatchingTarget { path, document } => {
                vec![("path", path.clone()), ("document", document.clone())]
            }
            Self::NotModifiableNumber {
                path,
                document,
                found,
            }
            | Self::NotCompositeNumber {
                path,
                document,
                found,
            } => vec![
                ("path", path.clone()),
                ("document", document.clone()),
                ("found", found.to_string()),
            ],
            Self::WrongTargetType {
                path,
                document,
                expected,
                found,
            } => vec![
                ("path", path.clone()),
                ("document", document.clone()),
                ("expected", expected.clone()),
                ("found", found.to_string()),
            ],
            Self::NotActor { document } => vec![("document", document.clone())],
            Self::ChangedType {
                path,
                document,
                from,
                to,
            } => vec![
                ("path", path.clone()),
                ("document", document.clone()),
                ("from", from.to_string()),
                ("to", to.to_string()),
            ],
            Self::NotSaved => Vec::new(),
        }
    }

    /// Render-ready text through the given formatter.
    pub fn render(&self, formatter: &dyn MessageFormatter) -> String {
        formatter.format(self.key(), &self.params())
    }
}

impl MessageKind {
    pub const fn key(&self) -> &'static str {
        match self {
            Self::MissingProperty => "rules.messages.missingProperty",
            Self::AdditionalProperty => "rules.messages.additionalProperty",
            Self::WrongType => "rules.messages.wrongType",
            Self::SyntaxError => "rules.messages.syntaxError",
            Self::WrongValueType => "rules.messages.wrongValueType",
            Self::WrongSpecialName => "rules.messages.wrongSpecialName",
            Self::NotMatchingSelector => "rules.messages.notMatchingSelector",
            Self::WrongSelectedType => "rules.messages.wrongSelectedType",
            Self::NotMatchingTarget => "rules.messages.notMatchingTarget",
            Self::NotModifiableNumber => "rules.messages.notModifiableNumber",
            Self::NotCompositeNumber => "rules.messages.notCompositeNumber",
            Self::WrongTargetType => "rules.messages.wrongTargetType",
            Self::NotActor => "rules.messages.notActor",
            Self::ChangedType => "rules.messages.changedType",
            Self::NotSaved => "rules.messages.notSaved",
        }
    }
}

/// Turns a message key and its parameters into display text.
///
/// [`TemplateCatalog`] is the built-in implementation.
pub trait MessageFormatter: Send + Sync {
    fn format(&self, key: &str, params: &[(&'static str, String)]) -> String;
}

const ENGLISH: &[(&str, &str)] = &[
    (
        "rules.messages.missingProperty",
        "Missing required property `{property}`.",
    ),
    (
        "rules.messages.additionalProperty",
        "Unknown property `{property}`.",
    ),
    (
        "rules.messages.wrongType",
        "Property `{property}` must be {expected}.",
    ),
    ("rules.messages.syntaxError", "Invalid {property}: {reason}."),
    (
        "rules.messages.wrongValueType",
        "Value must be {expected}, found {found}.",
    ),
    (
        "rules.messages.wrongSpecialName",
        "`{name}` is not a SPECIAL.",
    ),
    (
        "rules.messages.notMatchingSelector",
        "Selector {selector} is ignored; this rule always applies to the actor.",
    ),
    (
        "rules.messages.wrongSelectedType",
        "{document} has no property `{path}`.",
    ),
    (
        "rules.messages.notMatchingTarget",
        "`{path}` does not exist on {document}.",
    ),
    (
        "rules.messages.notModifiableNumber",
        "`{path}` on {document} is a {found}, not a modifiable number.",
    ),
    (
        "rules.messages.notCompositeNumber",
        "`{path}` on {document} is a {found}, not a CompositeNumber.",
    ),
    (
        "rules.messages.wrongTargetType",
        "`{path}` on {document} is a {found}, expected {expected}.",
    ),
    ("rules.messages.notActor", "{document} is not an actor."),
    (
        "rules.messages.changedType",
        "`{path}` on {document} changed from {from} to {to}.",
    ),
    (
        "rules.messages.notSaved",
        "This rule has errors and was not applied.",
    ),
];

/// Template table with `{param}` placeholders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateCatalog {
    templates: HashMap<String, String>,
}

impl TemplateCatalog {
    /// An empty catalog; every key renders as the fallback.
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// The built-in English templates.
    pub fn english() -> Self {
        let templates = ENGLISH
            .iter()
            .map(|(key, template)| ((*key).to_owned(), (*template).to_owned()))
            .collect();
        Self { templates }
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(key.into(), template.into());
    }

    /// Override or add templates (builder pattern).
    #[must_use]
    pub fn with_templates<K, V>(mut self, templates: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, template) in templates {
            self.insert(key, template);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.templates.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::english()
    }
}

impl MessageFormatter for TemplateCatalog {
    fn format(&self, key: &str, params: &[(&'static str, String)]) -> String {
        let Some(template) = self.get(key) else {
            if params.is_empty() {
                return key.to_owned();
            }
            let rendered: Vec<String> = params
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            return format!("{key} ({})", rendered.join(", "));
        };

        params
            .iter()
            .fold(template.to_owned(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn severities() {
        assert!(RuleElementMessage::NotSaved.is_warning());
        assert!(
            RuleElementMessage::WrongSpecialName {
                name: "foobar".into()
            }
            .is_error()
        );
        assert_eq!(
            RuleElementMessage::NotMatchingSelector {
                selector: "\"item\"".into()
            }
            .severity(),
            Severity::Info
        );
    }

    #[test]
    fn kind_identifiers_are_kebab_case() {
        let message = RuleElementMessage::NotCompositeNumber {
            path: "level".into(),
            document: "Courier".into(),
            found: ValueType::Number,
        };
        assert_eq!(message.kind(), MessageKind::NotCompositeNumber);
        assert_eq!(message.kind().to_string(), "not-composite-number");

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["kind"], "not-composite-number");
        assert_eq!(json["found"], "number");
    }

    #[test]
    fn english_catalog_covers_every_kind() {
        let catalog = TemplateCatalog::english();
        for kind in MessageKind::iter() {
            assert!(catalog.get(kind.key()).is_some(), "missing template for {kind}");
        }
    }

    #[test]
    fn renders_placeholders() {
        let message = RuleElementMessage::ChangedType {
            path: "range".into(),
            document: "Pistol".into(),
            from: ValueType::Number,
            to: ValueType::Text,
        };
        assert_eq!(
            message.render(&TemplateCatalog::english()),
            "`range` on Pistol changed from number to string."
        );
    }

    #[test]
    fn unknown_keys_render_key_and_params() {
        let catalog = TemplateCatalog::empty();
        assert_eq!(
            RuleElementMessage::NotActor {
                document: "Knife".into()
            }
            .render(&catalog),
            "rules.messages.notActor (document=Knife)"
        );
        assert_eq!(
            RuleElementMessage::NotSaved.render(&catalog),
            "rules.messages.notSaved"
        );
    }

    #[test]
    fn overrides_replace_templates() {
        let catalog = TemplateCatalog::english()
            .with_templates([("rules.messages.notSaved", "Nicht gespeichert.")]);
        assert_eq!(RuleElementMessage::NotSaved.render(&catalog), "Nicht gespeichert.");
    }
}
