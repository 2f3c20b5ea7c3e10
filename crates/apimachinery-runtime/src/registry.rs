use std::any::TypeId;
use std::collections::HashMap;

use crate::{Error, GroupVersionKind, RuntimeObject};

/// Reports the kinds an object is registered under.
pub trait ObjectTyper: Send + Sync {
    fn object_kinds(&self, obj: &dyn RuntimeObject) -> Result<Vec<GroupVersionKind>, Error>;
}

/// Constructs new, empty objects for registered kinds.
pub trait ObjectCreator: Send + Sync {
    fn new_object(&self, gvk: &GroupVersionKind) -> Result<Box<dyn RuntimeObject>, Error>;
}

type Constructor = fn() -> Box<dyn RuntimeObject>;

/// Maps kinds to object constructors and concrete types back to their kinds.
///
/// Built once at startup and shared behind an `Arc`; all lookups are reads.
#[derive(Default)]
pub struct Registry {
    constructors: HashMap<GroupVersionKind, Constructor>,
    kinds: HashMap<TypeId, Vec<GroupVersionKind>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T>(&mut self, gvk: GroupVersionKind)
    where
        T: RuntimeObject + Default + 'static,
    {
        self.constructors
            .insert(gvk.clone(), || Box::new(T::default()) as Box<dyn RuntimeObject>);
        self.kinds.entry(TypeId::of::<T>()).or_default().push(gvk);
    }

    pub fn recognizes(&self, gvk: &GroupVersionKind) -> bool {
        self.constructors.contains_key(gvk)
    }
}

impl ObjectTyper for Registry {
    fn object_kinds(&self, obj: &dyn RuntimeObject) -> Result<Vec<GroupVersionKind>, Error> {
        match self.kinds.get(&obj.as_any().type_id()) {
            Some(kinds) => Ok(kinds.clone()),
            None => Err(Error::NotRegistered {
                name: obj.type_name().to_owned(),
            }),
        }
    }
}

impl ObjectCreator for Registry {
    fn new_object(&self, gvk: &GroupVersionKind) -> Result<Box<dyn RuntimeObject>, Error> {
        match self.constructors.get(gvk) {
            Some(constructor) => Ok(constructor()),
            None => Err(Error::NotRegistered {
                name: gvk.to_string(),
            }),
        }
    }
}
