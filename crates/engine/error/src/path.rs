use std::fmt;

/// Path of an error inside the response, made of response keys and list indices.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Default, Hash)]
pub struct ErrorPath(Vec<ErrorPathSegment>);

impl std::ops::Deref for ErrorPath {
    type Target = Vec<ErrorPathSegment>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub enum ErrorPathSegment {
    Field(Box<str>),
    Index(usize),
}

impl ErrorPath {
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn child(&self, segment: impl InsertIntoErrorPath) -> Self {
        let mut path = self.clone();
        segment.insert_into(&mut path);
        path
    }

    pub fn push(&mut self, segment: impl InsertIntoErrorPath) {
        segment.insert_into(self);
    }
}

pub trait InsertIntoErrorPath {
    fn insert_into(self, path: &mut ErrorPath);
}

impl InsertIntoErrorPath for &str {
    fn insert_into(self, path: &mut ErrorPath) {
        path.0.push(ErrorPathSegment::Field(self.into()));
    }
}

impl InsertIntoErrorPath for String {
    fn insert_into(self, path: &mut ErrorPath) {
        path.0.push(ErrorPathSegment::Field(self.into_boxed_str()));
    }
}

impl InsertIntoErrorPath for usize {
    fn insert_into(self, path: &mut ErrorPath) {
        path.0.push(ErrorPathSegment::Index(self));
    }
}

impl InsertIntoErrorPath for ErrorPathSegment {
    fn insert_into(self, path: &mut ErrorPath) {
        path.0.push(self);
    }
}

impl<T: InsertIntoErrorPath> FromIterator<T> for ErrorPath {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut path = ErrorPath::default();
        for segment in iter {
            segment.insert_into(&mut path);
        }
        path
    }
}

impl fmt::Display for ErrorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                ErrorPathSegment::Field(name) => f.write_str(name)?,
                ErrorPathSegment::Index(index) => write!(f, "{index}")?,
            }
        }
        Ok(())
    }
}

impl serde::Serialize for ErrorPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for segment in &self.0 {
            match segment {
                ErrorPathSegment::Field(name) => seq.serialize_element(name)?,
                ErrorPathSegment::Index(index) => seq.serialize_element(index)?,
            }
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_mixed_array() {
        let path = ErrorPath::root().child("users").child(2usize).child("name");
        assert_eq!(serde_json::to_value(&path).unwrap(), serde_json::json!(["users", 2, "name"]));
        assert_eq!(path.to_string(), "users.2.name");
    }

    #[test]
    fn child_does_not_mutate_parent() {
        let parent = ErrorPath::root().child("a");
        let _ = parent.child("b");
        assert_eq!(parent.len(), 1);
    }
}
