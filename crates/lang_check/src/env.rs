use lang_ast::Name;
use rustc_hash::FxHashMap;

use crate::TypeScheme;

/// Name to scheme mapping. `extend` leaves the receiver untouched, so nested
/// scopes never leak into their parents.
#[derive(Debug, Clone, Default)]
pub struct Env {
    bindings: FxHashMap<Name, TypeScheme>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&self, name: impl Into<Name>, scheme: impl Into<TypeScheme>) -> Env {
        let mut env = self.clone();
        env.insert(name, scheme);
        env
    }

    pub fn insert(&mut self, name: impl Into<Name>, scheme: impl Into<TypeScheme>) {
        self.bindings.insert(name.into(), scheme.into());
    }

    pub fn lookup(&self, name: &str) -> Option<&TypeScheme> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<N: Into<Name>, S: Into<TypeScheme>> FromIterator<(N, S)> for Env {
    fn from_iter<T: IntoIterator<Item = (N, S)>>(iter: T) -> Self {
        let mut env = Env::new();
        for (name, scheme) in iter {
            env.insert(name, scheme);
        }
        env
    }
}
