use std::{fmt, str::FromStr};

/// Reference to a type with its list and non-null wrappers, `[Int!]!` for example.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn named_non_null(name: impl Into<String>) -> Self {
        TypeRef::NonNull(Box::new(TypeRef::Named(name.into())))
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        match inner {
            TypeRef::NonNull(_) => inner,
            inner => TypeRef::NonNull(Box::new(inner)),
        }
    }

    /// The innermost named type.
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named_type(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    pub fn is_list(&self) -> bool {
        match self {
            TypeRef::List(_) => true,
            TypeRef::NonNull(inner) => inner.is_list(),
            TypeRef::Named(_) => false,
        }
    }

    /// Same type without the outermost non-null wrapper.
    pub fn nullable(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }

    /// Whether a value of type `self` can be used where `expected` is.
    pub fn is_subtype_of(&self, expected: &TypeRef) -> bool {
        match (self, expected) {
            (TypeRef::NonNull(inner), TypeRef::NonNull(expected)) => inner.is_subtype_of(expected),
            (TypeRef::NonNull(inner), expected) => inner.is_subtype_of(expected),
            (_, TypeRef::NonNull(_)) => false,
            (TypeRef::List(inner), TypeRef::List(expected)) => inner.is_subtype_of(expected),
            (TypeRef::Named(name), TypeRef::Named(expected)) => name == expected,
            _ => false,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid type reference '{0}'")]
pub struct InvalidTypeRef(pub String);

impl FromStr for TypeRef {
    type Err = InvalidTypeRef;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn parse(s: &str) -> Option<TypeRef> {
            let s = s.trim();
            if let Some(inner) = s.strip_suffix('!') {
                let inner = parse(inner)?;
                if inner.is_non_null() {
                    return None;
                }
                return Some(TypeRef::NonNull(Box::new(inner)));
            }
            if let Some(inner) = s.strip_prefix('[') {
                let inner = inner.strip_suffix(']')?;
                return Some(TypeRef::List(Box::new(parse(inner)?)));
            }
            let is_name = s
                .chars()
                .enumerate()
                .all(|(i, c)| c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit()));
            (is_name && !s.is_empty()).then(|| TypeRef::Named(s.to_string()))
        }

        parse(s).ok_or_else(|| InvalidTypeRef(s.to_string()))
    }
}
