//! Quantifier bookkeeping.
//!
//! The [`DependencyStore`] is the single source of truth for the kind of every quantified
//! variable and for the dependency sets of existential variables. It keeps both directions
//! of the dependency relation: `dependencies[e]` (the universal variables `e` may depend on)
//! and `dependents[u]` (the existential variables that may depend on `u`).
//!
//! A [`Scope`] records which variables are bound in one (sub)formula. Adding or removing a
//! variable through a scope updates the store as well, so several scopes can share one store.

use std::cell::RefCell;
use std::collections::BTreeMap;

use log::trace;

use crate::types::{Var, VarSet};

#[derive(Debug, Default)]
struct StoreInner {
    univ_vars: VarSet,
    exist_vars: VarSet,
    dependencies: BTreeMap<Var, VarSet>,
    dependents: BTreeMap<Var, VarSet>,
}

#[derive(Debug, Default)]
pub struct DependencyStore {
    inner: RefCell<StoreInner>,
}

impl DependencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of universal variables across the whole formula.
    pub fn num_univ_vars(&self) -> usize {
        self.inner.borrow().univ_vars.len()
    }

    /// Total number of existential variables across the whole formula.
    pub fn num_exist_vars(&self) -> usize {
        self.inner.borrow().exist_vars.len()
    }

    pub fn is_univ_var(&self, v: Var) -> bool {
        self.inner.borrow().univ_vars.contains(&v)
    }

    pub fn is_exist_var(&self, v: Var) -> bool {
        self.inner.borrow().exist_vars.contains(&v)
    }

    pub fn univ_vars(&self) -> VarSet {
        self.inner.borrow().univ_vars.clone()
    }

    pub fn exist_vars(&self) -> VarSet {
        self.inner.borrow().exist_vars.clone()
    }

    /// Existential variables that may depend on the universal variable `u`.
    pub fn univ_var_dependents(&self, u: Var) -> VarSet {
        let inner = self.inner.borrow();
        assert!(inner.univ_vars.contains(&u), "{} is not a universal variable", u);
        inner.dependents.get(&u).cloned().unwrap_or_default()
    }

    pub fn num_univ_var_dependents(&self, u: Var) -> usize {
        self.inner.borrow().dependents.get(&u).map_or(0, |d| d.len())
    }

    /// Universal variables the existential variable `e` may depend on.
    pub fn exist_var_dependencies(&self, e: Var) -> VarSet {
        let inner = self.inner.borrow();
        assert!(inner.exist_vars.contains(&e), "{} is not an existential variable", e);
        inner.dependencies.get(&e).cloned().unwrap_or_default()
    }

    pub fn num_exist_var_dependencies(&self, e: Var) -> usize {
        self.inner.borrow().dependencies.get(&e).map_or(0, |d| d.len())
    }

    pub fn add_univ_var(&self, u: Var) {
        trace!("store: add universal {}", u);
        let mut inner = self.inner.borrow_mut();
        assert!(!inner.exist_vars.contains(&u), "{} is already existential", u);
        if inner.univ_vars.insert(u) {
            inner.dependents.insert(u, VarSet::new());
        }
    }

    /// Register the existential variable `e` with the given dependency set.
    ///
    /// # Panics
    ///
    /// Panics if `e` is already universal or a dependency is not a universal variable.
    pub fn add_exist_var(&self, e: Var, dependencies: &VarSet) {
        trace!("store: add existential {} depending on {:?}", e, dependencies);
        let mut inner = self.inner.borrow_mut();
        assert!(!inner.univ_vars.contains(&e), "{} is already universal", e);
        for &u in dependencies {
            assert!(inner.univ_vars.contains(&u), "{} depends on {} which is not universal", e, u);
        }
        inner.exist_vars.insert(e);
        if let Some(old) = inner.dependencies.insert(e, dependencies.clone()) {
            for u in old {
                if let Some(dependents) = inner.dependents.get_mut(&u) {
                    dependents.remove(&e);
                }
            }
        }
        for &u in dependencies {
            inner.dependents.entry(u).or_default().insert(e);
        }
    }

    /// Remove the universal variable `u`, dropping it from every dependency set.
    pub fn remove_univ_var(&self, u: Var) {
        trace!("store: remove universal {}", u);
        let mut inner = self.inner.borrow_mut();
        inner.univ_vars.remove(&u);
        for e in inner.dependents.remove(&u).unwrap_or_default() {
            if let Some(dependencies) = inner.dependencies.get_mut(&e) {
                dependencies.remove(&u);
            }
        }
    }

    /// Remove the existential variable `e`, dropping it from every dependents set.
    pub fn remove_exist_var(&self, e: Var) {
        trace!("store: remove existential {}", e);
        let mut inner = self.inner.borrow_mut();
        inner.exist_vars.remove(&e);
        for u in inner.dependencies.remove(&e).unwrap_or_default() {
            if let Some(dependents) = inner.dependents.get_mut(&u) {
                dependents.remove(&e);
            }
        }
    }

    /// Remove the dependency edge `e -> u`.
    ///
    /// # Panics
    ///
    /// Panics if the edge does not exist.
    pub fn remove_dependency(&self, e: Var, u: Var) {
        trace!("store: remove dependency {} -> {}", e, u);
        let mut inner = self.inner.borrow_mut();
        let removed = inner.dependencies.get_mut(&e).is_some_and(|d| d.remove(&u));
        assert!(removed, "{} does not depend on {}", e, u);
        if let Some(dependents) = inner.dependents.get_mut(&u) {
            dependents.remove(&e);
        }
    }
}

/// The variables bound in one (sub)formula.
#[derive(Debug)]
pub struct Scope<'a> {
    store: &'a DependencyStore,
    univ_vars: VarSet,
    exist_vars: VarSet,
}

impl<'a> Scope<'a> {
    pub fn new(store: &'a DependencyStore) -> Self {
        Self {
            store,
            univ_vars: VarSet::new(),
            exist_vars: VarSet::new(),
        }
    }

    pub fn store(&self) -> &'a DependencyStore {
        self.store
    }

    /// Universal variables bound in this scope.
    pub fn univ_vars(&self) -> &VarSet {
        &self.univ_vars
    }

    /// Existential variables bound in this scope.
    pub fn exist_vars(&self) -> &VarSet {
        &self.exist_vars
    }

    pub fn is_univ_var(&self, v: Var) -> bool {
        self.store.is_univ_var(v)
    }

    pub fn is_exist_var(&self, v: Var) -> bool {
        self.store.is_exist_var(v)
    }

    /// Whether `v` is bound in this scope (as opposed to an enclosing one).
    pub fn is_var_here_quantified(&self, v: Var) -> bool {
        self.univ_vars.contains(&v) || self.exist_vars.contains(&v)
    }

    pub fn univ_var_dependents(&self, u: Var) -> VarSet {
        self.store.univ_var_dependents(u)
    }

    pub fn exist_var_dependencies(&self, e: Var) -> VarSet {
        self.store.exist_var_dependencies(e)
    }

    /// Bind a universal variable here, registering it in the store if needed.
    pub fn add_univ_var(&mut self, u: Var) {
        self.store.add_univ_var(u);
        self.univ_vars.insert(u);
    }

    /// Bind an existential variable here and (re)set its dependency set in the store.
    pub fn add_exist_var(&mut self, e: Var, dependencies: &VarSet) {
        self.store.add_exist_var(e, dependencies);
        self.exist_vars.insert(e);
    }

    pub fn remove_univ_var(&mut self, u: Var) {
        self.univ_vars.remove(&u);
        self.store.remove_univ_var(u);
    }

    pub fn remove_exist_var(&mut self, e: Var) {
        self.exist_vars.remove(&e);
        self.store.remove_exist_var(e);
    }

    pub fn remove_dependency(&mut self, e: Var, u: Var) {
        self.store.remove_dependency(e, u);
    }

    /// Remove every variable bound here that does not occur in `support`.
    pub fn remove_unused_vars(&mut self, support: &VarSet) {
        let unused_univ: Vec<Var> = self.univ_vars.difference(support).copied().collect();
        for u in unused_univ {
            self.remove_univ_var(u);
        }
        let unused_exist: Vec<Var> = self.exist_vars.difference(support).copied().collect();
        for e in unused_exist {
            self.remove_exist_var(e);
        }
    }

    /// Remove every variable bound here.
    pub fn clear(&mut self) {
        self.remove_unused_vars(&VarSet::new());
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn vars(ids: &[u32]) -> VarSet {
        ids.iter().map(|&i| Var::new(i)).collect()
    }

    #[test]
    fn test_dependencies_both_directions() {
        let store = DependencyStore::new();
        store.add_univ_var(Var::new(1));
        store.add_univ_var(Var::new(2));
        store.add_exist_var(Var::new(3), &vars(&[1]));
        store.add_exist_var(Var::new(4), &vars(&[1, 2]));

        assert_eq!(store.num_univ_vars(), 2);
        assert_eq!(store.num_exist_vars(), 2);
        assert_eq!(store.univ_var_dependents(Var::new(1)), vars(&[3, 4]));
        assert_eq!(store.univ_var_dependents(Var::new(2)), vars(&[4]));
        assert_eq!(store.exist_var_dependencies(Var::new(4)), vars(&[1, 2]));
        assert_eq!(store.num_univ_var_dependents(Var::new(1)), 2);
        assert_eq!(store.num_exist_var_dependencies(Var::new(3)), 1);
    }

    #[test]
    fn test_remove_univ_var_drops_dependencies() {
        let store = DependencyStore::new();
        store.add_univ_var(Var::new(1));
        store.add_univ_var(Var::new(2));
        store.add_exist_var(Var::new(3), &vars(&[1, 2]));

        store.remove_univ_var(Var::new(1));
        assert!(!store.is_univ_var(Var::new(1)));
        assert_eq!(store.exist_var_dependencies(Var::new(3)), vars(&[2]));
    }

    #[test]
    fn test_remove_exist_var_drops_dependents() {
        let store = DependencyStore::new();
        store.add_univ_var(Var::new(1));
        store.add_exist_var(Var::new(2), &vars(&[1]));
        store.add_exist_var(Var::new(3), &vars(&[1]));

        store.remove_exist_var(Var::new(2));
        assert!(!store.is_exist_var(Var::new(2)));
        assert_eq!(store.univ_var_dependents(Var::new(1)), vars(&[3]));
    }

    #[test]
    fn test_remove_dependency() {
        let store = DependencyStore::new();
        store.add_univ_var(Var::new(1));
        store.add_univ_var(Var::new(2));
        store.add_exist_var(Var::new(3), &vars(&[1, 2]));

        store.remove_dependency(Var::new(3), Var::new(2));
        assert_eq!(store.exist_var_dependencies(Var::new(3)), vars(&[1]));
        assert!(store.univ_var_dependents(Var::new(2)).is_empty());
    }

    #[test]
    #[should_panic(expected = "does not depend on")]
    fn test_remove_missing_dependency_panics() {
        let store = DependencyStore::new();
        store.add_univ_var(Var::new(1));
        store.add_exist_var(Var::new(2), &VarSet::new());
        store.remove_dependency(Var::new(2), Var::new(1));
    }

    #[test]
    #[should_panic(expected = "which is not universal")]
    fn test_dependency_on_unknown_var_panics() {
        let store = DependencyStore::new();
        store.add_exist_var(Var::new(2), &vars(&[1]));
    }

    #[test]
    fn test_scope_binding() {
        let store = DependencyStore::new();
        let mut outer = Scope::new(&store);
        outer.add_univ_var(Var::new(1));

        let mut inner = Scope::new(&store);
        inner.add_exist_var(Var::new(2), &vars(&[1]));

        assert!(outer.is_var_here_quantified(Var::new(1)));
        assert!(!inner.is_var_here_quantified(Var::new(1)));
        assert!(inner.is_var_here_quantified(Var::new(2)));
        assert!(inner.is_univ_var(Var::new(1)));
        assert_eq!(store.num_exist_vars(), 1);
    }

    #[test]
    fn test_scope_remove_unused_and_clear() {
        let store = DependencyStore::new();
        let mut scope = Scope::new(&store);
        scope.add_univ_var(Var::new(1));
        scope.add_univ_var(Var::new(2));
        scope.add_exist_var(Var::new(3), &vars(&[1, 2]));
        scope.add_exist_var(Var::new(4), &vars(&[2]));

        scope.remove_unused_vars(&vars(&[1, 3]));
        assert_eq!(scope.univ_vars(), &vars(&[1]));
        assert_eq!(scope.exist_vars(), &vars(&[3]));
        assert_eq!(store.exist_var_dependencies(Var::new(3)), vars(&[1]));
        assert!(!store.is_exist_var(Var::new(4)));

        scope.clear();
        assert!(scope.univ_vars().is_empty());
        assert!(scope.exist_vars().is_empty());
        assert_eq!(store.num_univ_vars(), 0);
        assert_eq!(store.num_exist_vars(), 0);
    }
}
