//! Attribute type definitions.

use serde::{Deserialize, Serialize};

/// Field types an attribute can take.
///
/// The serialized tag of each variant is its name (`"Int"`, `"String"`, ...).
/// Tags that do not match any variant decode to [`AttributeType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AttributeType {
    /// Type not chosen yet.
    #[default]
    Unknown,
    /// Boolean value.
    Bool,
    /// 16-bit signed integer.
    Short,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
    /// UTF-8 string.
    String,
    /// Point in time.
    Date,
    /// Binary data.
    Blob,
}

impl AttributeType {
    /// Every variant, in declaration order.
    pub const ALL: [AttributeType; 10] = [
        AttributeType::Unknown,
        AttributeType::Bool,
        AttributeType::Short,
        AttributeType::Int,
        AttributeType::Long,
        AttributeType::Float,
        AttributeType::Double,
        AttributeType::String,
        AttributeType::Date,
        AttributeType::Blob,
    ];

    /// Serialized tag.
    pub fn tag(self) -> &'static str {
        match self {
            AttributeType::Unknown => "Unknown",
            AttributeType::Bool => "Bool",
            AttributeType::Short => "Short",
            AttributeType::Int => "Int",
            AttributeType::Long => "Long",
            AttributeType::Float => "Float",
            AttributeType::Double => "Double",
            AttributeType::String => "String",
            AttributeType::Date => "Date",
            AttributeType::Blob => "Blob",
        }
    }

    /// Decode a serialized tag, falling back to `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|ty| ty.tag() == tag)
            .unwrap_or(AttributeType::Unknown)
    }

    /// Check if an attribute of this type can be an entity's primary key.
    pub fn can_be_primary_key(self) -> bool {
        matches!(
            self,
            AttributeType::Short | AttributeType::Int | AttributeType::Long | AttributeType::String
        )
    }

    /// Check if an attribute of this type can carry an index.
    pub fn can_be_indexed(self) -> bool {
        matches!(
            self,
            AttributeType::Bool
                | AttributeType::Short
                | AttributeType::Int
                | AttributeType::Long
                | AttributeType::String
                | AttributeType::Date
        )
    }
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_decode_to_their_variant() {
        for ty in AttributeType::ALL {
            assert_eq!(AttributeType::from_tag(ty.tag()), ty);
        }
    }

    #[test]
    fn test_unknown_tag_falls_back() {
        assert_eq!(AttributeType::from_tag("Decimal"), AttributeType::Unknown);
        assert_eq!(AttributeType::from_tag("int"), AttributeType::Unknown);
        assert_eq!(AttributeType::default(), AttributeType::Unknown);
    }

    #[test]
    fn test_capabilities() {
        assert!(AttributeType::Int.can_be_primary_key());
        assert!(AttributeType::String.can_be_primary_key());
        assert!(!AttributeType::Double.can_be_primary_key());
        assert!(!AttributeType::Date.can_be_primary_key());
        assert!(!AttributeType::Unknown.can_be_primary_key());

        assert!(AttributeType::Date.can_be_indexed());
        assert!(!AttributeType::Blob.can_be_indexed());
        assert!(!AttributeType::Float.can_be_indexed());

        for ty in AttributeType::ALL {
            if ty.can_be_primary_key() {
                assert!(ty.can_be_indexed(), "{ty} keys must be indexable");
            }
        }
    }

    #[test]
    fn test_serde_uses_tags() {
        let json = serde_json::to_string(&AttributeType::Long).unwrap();
        assert_eq!(json, "\"Long\"");
        let back: AttributeType = serde_json::from_str("\"Date\"").unwrap();
        assert_eq!(back, AttributeType::Date);
    }
}
