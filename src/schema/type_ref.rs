//! Type references in both encodings, normalized to decorated strings at the
//! boundary so the adapters only deal with `"[Foo!]!"`-style text.
use serde::Deserialize;

/// Introspection `{kind, name, ofType}` chain.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeChain {
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "ofType")]
    pub of_type: Option<Box<TypeChain>>,
}

impl TypeChain {
    /// Innermost named type.
    pub fn named(&self) -> Option<&str> {
        match &self.of_type {
            Some(inner) if self.name.is_none() => inner.named(),
            _ => self.name.as_deref(),
        }
    }

    /// Full modifier syntax: `NON_NULL(LIST(NON_NULL(ID)))` → `[ID!]!`.
    pub fn decorated(&self) -> String {
        match (self.kind.as_str(), &self.of_type) {
            ("NON_NULL", Some(inner)) => format!("{}!", inner.decorated()),
            ("LIST", Some(inner)) => format!("[{}]", inner.decorated()),
            (_, Some(inner)) if self.name.is_none() => inner.decorated(),
            _ => self.name.clone().unwrap_or_default(),
        }
    }
}

/// A type reference that arrives either as a decorated string, an object with
/// a `name`, or a full introspection chain.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    Plain(String),
    Chain(TypeChain),
    Named { name: String },
}

impl TypeRef {
    pub fn decorated(&self) -> String {
        match self {
            TypeRef::Plain(s) => s.clone(),
            TypeRef::Chain(chain) => chain.decorated(),
            TypeRef::Named { name } => name.clone(),
        }
    }
}

/// `[Repository!]!` → `Repository`
pub fn strip_modifiers(decorated: &str) -> String {
    decorated.chars().filter(|c| !matches!(c, '!' | '[' | ']')).collect::<String>().trim().to_string()
}
