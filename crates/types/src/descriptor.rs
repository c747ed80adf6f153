use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of item an implementor reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Struct,
    Enum,
    Union,
    Type,
    Primitive,
    Trait,
    ForeignType,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Struct => "struct",
            TypeKind::Enum => "enum",
            TypeKind::Union => "union",
            TypeKind::Type => "type",
            TypeKind::Primitive => "primitive",
            TypeKind::Trait => "trait",
            TypeKind::ForeignType => "foreigntype",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "struct" => Ok(TypeKind::Struct),
            "enum" => Ok(TypeKind::Enum),
            "union" => Ok(TypeKind::Union),
            "type" => Ok(TypeKind::Type),
            "primitive" => Ok(TypeKind::Primitive),
            "trait" => Ok(TypeKind::Trait),
            "foreigntype" => Ok(TypeKind::ForeignType),
            other => Err(format!("unknown item kind: {other}")),
        }
    }
}

/// Structured view of one implementor entry.
///
/// Derived from the pre-rendered markup on demand; the markup itself is kept
/// alongside so nothing is lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementorDescriptor {
    /// Plain text of the impl line, e.g. `impl Hash for Flags`.
    pub text: String,
    /// Generic parameter list without the angle brackets, e.g. `V: Hash`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generics: Option<String>,
    /// `true` for negative impls such as `impl !Send for T`.
    #[serde(default)]
    pub negative: bool,
    /// Trait name as displayed, which may be a re-export alias.
    pub trait_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trait_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trait_href: Option<String>,
    /// Implementing type as displayed, including its generic arguments.
    pub self_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_kind: Option<TypeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_href: Option<String>,
}

impl ImplementorDescriptor {
    /// Blanket impls have no concrete implementing type to link to.
    pub fn is_blanket(&self) -> bool {
        self.self_path.is_none()
    }
}

impl fmt::Display for ImplementorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
