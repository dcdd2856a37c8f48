use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
};

/// Type map of request scoped data made available to resolvers and permissions, the incoming
/// HTTP headers for example.
#[derive(Default)]
pub struct Data(HashMap<TypeId, Box<dyn Any + Send + Sync>>);

impl Data {
    pub fn insert<D: Any + Send + Sync>(&mut self, data: D) {
        self.0.insert(TypeId::of::<D>(), Box::new(data));
    }

    #[must_use]
    pub fn with<D: Any + Send + Sync>(mut self, data: D) -> Self {
        self.insert(data);
        self
    }

    pub fn get<D: Any + Send + Sync>(&self) -> Option<&D> {
        self.0.get(&TypeId::of::<D>()).and_then(|data| data.downcast_ref::<D>())
    }

    pub fn merge(&mut self, other: Data) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Data").field(&self.0.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Viewer(&'static str);

    #[test]
    fn typed_lookup() {
        let data = Data::default().with(Viewer("ada")).with(42u32);
        assert_eq!(data.get::<Viewer>(), Some(&Viewer("ada")));
        assert_eq!(data.get::<u32>(), Some(&42));
        assert_eq!(data.get::<String>(), None);
    }

    #[test]
    fn merge_overrides() {
        let mut data = Data::default().with(1u8);
        data.merge(Data::default().with(2u8).with(Viewer("bob")));
        assert_eq!(data.get::<u8>(), Some(&2));
        assert!(data.get::<Viewer>().is_some());
    }
}
