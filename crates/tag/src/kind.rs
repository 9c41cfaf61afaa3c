use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type designator for a code element.
///
/// The short codes are the wire format used in reference tags; the set is
/// closed and codes are case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ElementKind {
    #[serde(rename = "Fn")]
    Function,
    #[serde(rename = "Mth")]
    Method,
    #[serde(rename = "Ctor")]
    Constructor,
    #[serde(rename = "Cls")]
    Class,
    #[serde(rename = "Struct")]
    Struct,
    #[serde(rename = "Enum")]
    Enum,
    #[serde(rename = "EnumVal")]
    EnumVariant,
    #[serde(rename = "Iface")]
    Interface,
    #[serde(rename = "Trait")]
    Trait,
    #[serde(rename = "Impl")]
    Impl,
    #[serde(rename = "Mod")]
    Module,
    #[serde(rename = "Pkg")]
    Package,
    #[serde(rename = "File")]
    File,
    #[serde(rename = "Dir")]
    Directory,
    #[serde(rename = "Prop")]
    Property,
    #[serde(rename = "Field")]
    Field,
    #[serde(rename = "Var")]
    Variable,
    #[serde(rename = "Const")]
    Constant,
    #[serde(rename = "Type")]
    TypeAlias,
    #[serde(rename = "Macro")]
    Macro,
    #[serde(rename = "Test")]
    Test,
    #[serde(rename = "Api")]
    Endpoint,
    #[serde(rename = "Route")]
    Route,
    #[serde(rename = "Cfg")]
    Config,
    #[serde(rename = "Db")]
    Database,
    #[serde(rename = "Doc")]
    Document,
}

impl ElementKind {
    /// Every designator, in canonical declaration order.
    pub const ALL: [ElementKind; 26] = [
        ElementKind::Function,
        ElementKind::Method,
        ElementKind::Constructor,
        ElementKind::Class,
        ElementKind::Struct,
        ElementKind::Enum,
        ElementKind::EnumVariant,
        ElementKind::Interface,
        ElementKind::Trait,
        ElementKind::Impl,
        ElementKind::Module,
        ElementKind::Package,
        ElementKind::File,
        ElementKind::Directory,
        ElementKind::Property,
        ElementKind::Field,
        ElementKind::Variable,
        ElementKind::Constant,
        ElementKind::TypeAlias,
        ElementKind::Macro,
        ElementKind::Test,
        ElementKind::Endpoint,
        ElementKind::Route,
        ElementKind::Config,
        ElementKind::Database,
        ElementKind::Document,
    ];

    /// The canonical short code used in tag text.
    pub const fn code(self) -> &'static str {
        match self {
            ElementKind::Function => "Fn",
            ElementKind::Method => "Mth",
            ElementKind::Constructor => "Ctor",
            ElementKind::Class => "Cls",
            ElementKind::Struct => "Struct",
            ElementKind::Enum => "Enum",
            ElementKind::EnumVariant => "EnumVal",
            ElementKind::Interface => "Iface",
            ElementKind::Trait => "Trait",
            ElementKind::Impl => "Impl",
            ElementKind::Module => "Mod",
            ElementKind::Package => "Pkg",
            ElementKind::File => "File",
            ElementKind::Directory => "Dir",
            ElementKind::Property => "Prop",
            ElementKind::Field => "Field",
            ElementKind::Variable => "Var",
            ElementKind::Constant => "Const",
            ElementKind::TypeAlias => "Type",
            ElementKind::Macro => "Macro",
            ElementKind::Test => "Test",
            ElementKind::Endpoint => "Api",
            ElementKind::Route => "Route",
            ElementKind::Config => "Cfg",
            ElementKind::Database => "Db",
            ElementKind::Document => "Doc",
        }
    }

    /// Resolve a short code back to its designator.
    pub fn parse_code(code: &str) -> Option<ElementKind> {
        ElementKind::ALL.into_iter().find(|kind| kind.code() == code)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ElementKind;

    #[test]
    fn codes_round_trip() {
        for kind in ElementKind::ALL {
            assert_eq!(ElementKind::parse_code(kind.code()), Some(kind));
        }
    }

    #[test]
    fn codes_are_unique() {
        let mut codes: Vec<&str> = ElementKind::ALL.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), ElementKind::ALL.len());
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(ElementKind::parse_code("fn"), None);
        assert_eq!(ElementKind::parse_code("Widget"), None);
    }
}
