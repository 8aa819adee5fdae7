//! The elimination engine.
//!
//! A [`Formula`] owns one matrix (a BDD) together with the [`Scope`] of variables quantified
//! in it, and decides it by eliminating variables:
//!
//! - an existential variable is abstracted (`∃e. f`) once its dependency set coincides with
//!   the universal variables still relevant to the matrix;
//! - a universal variable `u` is eliminated by expansion, `f[u↦0] ∧ f[u↦1]`, where every
//!   existential variable depending on `u` gets a fresh copy in the `u↦1` half so that it
//!   may still choose independently for the two values of `u`.
//!
//! The loop alternates the two until no universal variable is left.

use std::fmt::{Display, Formatter};

use log::{debug, info};

use crate::bdd::Bdd;
use crate::error::{DqbfError, Result};
use crate::function::Function;
use crate::heuristic::UnivVarElimHeuristic;
use crate::quantifiers::{DependencyStore, Scope};
use crate::reference::Ref;
use crate::types::{Var, VarSet};

/// Size of a formula, for diagnostics.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FormulaStats {
    pub nodes: u64,
    pub univ_vars: usize,
    pub exist_vars: usize,
}

impl Display for FormulaStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Formula BDD has {} nodes with {} universal variables and {} existential variables",
            self.nodes, self.univ_vars, self.exist_vars
        )
    }
}

pub struct Formula<'a> {
    bdd: &'a Bdd,
    scope: Scope<'a>,
    matrix: Ref,
    support_set: VarSet,
    need_to_recompute_support_set: bool,
    univ_vars_order_to_remove: Vec<Var>,
    heuristic: UnivVarElimHeuristic,
}

impl<'a> Formula<'a> {
    /// Create a formula with the constant-true matrix and an empty scope in `store`.
    pub fn new(bdd: &'a Bdd, store: &'a DependencyStore, heuristic: UnivVarElimHeuristic) -> Self {
        Self {
            bdd,
            scope: Scope::new(store),
            matrix: bdd.one,
            support_set: VarSet::new(),
            need_to_recompute_support_set: true,
            univ_vars_order_to_remove: Vec::new(),
            heuristic,
        }
    }

    pub fn bdd(&self) -> &'a Bdd {
        self.bdd
    }

    pub fn scope(&self) -> &Scope<'a> {
        &self.scope
    }

    pub fn heuristic(&self) -> UnivVarElimHeuristic {
        self.heuristic
    }

    pub fn add_univ_var(&mut self, u: Var) {
        self.bdd.register_var(u);
        self.scope.add_univ_var(u);
    }

    pub fn add_exist_var(&mut self, e: Var, dependencies: &VarSet) {
        self.bdd.register_var(e);
        self.scope.add_exist_var(e, dependencies);
    }

    pub fn univ_vars(&self) -> &VarSet {
        self.scope.univ_vars()
    }

    pub fn exist_vars(&self) -> &VarSet {
        self.scope.exist_vars()
    }

    pub fn matrix(&self) -> Function {
        self.bdd.function(self.matrix)
    }

    /// Replace the matrix.
    ///
    /// Fails if `f` was built by a different BDD manager than the one this formula is bound to.
    pub fn set_matrix(&mut self, f: Function) -> Result<()> {
        if !self.bdd.owns(&f) {
            return Err(DqbfError::IncompatibleManager {
                expected: self.bdd.id(),
                found: f.manager(),
            });
        }
        self.replace_matrix(f.node());
        Ok(())
    }

    fn replace_matrix(&mut self, matrix: Ref) {
        self.matrix = matrix;
        self.need_to_recompute_support_set = true;
    }

    /// Variables occurring in the matrix, recomputed only after the matrix changed.
    pub fn support_set(&mut self) -> &VarSet {
        if self.need_to_recompute_support_set {
            self.support_set = self.bdd.support(self.matrix);
            self.need_to_recompute_support_set = false;
        }
        &self.support_set
    }

    /// Drop every variable bound here that no longer occurs in the matrix.
    pub fn remove_unused_vars(&mut self) {
        self.support_set();
        self.scope.remove_unused_vars(&self.support_set);
    }

    pub fn eliminate_exist_var(&mut self, e: Var) {
        debug!("Eliminating exist variable {}", e);
        let cube = self.bdd.cube([e]);
        self.replace_matrix(self.bdd.exists(self.matrix, cube));
        self.scope.remove_exist_var(e);
    }

    /// Abstract all given existential variables at once.
    pub fn eliminate_exist_vars(&mut self, exist_vars_to_eliminate: &VarSet) {
        if exist_vars_to_eliminate.is_empty() {
            return;
        }

        debug!("Eliminating exist variables {:?}", exist_vars_to_eliminate);
        let cube = self.bdd.cube(exist_vars_to_eliminate.iter().copied());
        for &e in exist_vars_to_eliminate {
            self.scope.remove_exist_var(e);
        }
        self.replace_matrix(self.bdd.exists(self.matrix, cube));
    }

    /// Eliminate the universal variable `u` by expansion.
    ///
    /// Existential variables that depend on `u` and occur in the matrix are duplicated:
    /// the original keeps representing the `u = 0` half, a fresh copy (placed right below the
    /// original in the variable order) represents the `u = 1` half. Both lose the dependency
    /// on `u`. Existential variables not depending on `u` stay shared by both halves.
    pub fn eliminate_univ_var(&mut self, u: Var) {
        let mut exist_vars_to_duplicate = VarSet::new();
        for e in self.scope.univ_var_dependents(u) {
            if self.support_set().contains(&e) {
                exist_vars_to_duplicate.insert(e);
                self.scope.remove_dependency(e, u);
            }
        }

        self.scope.remove_univ_var(u);

        let mut vars_to_be_replaced = Vec::with_capacity(exist_vars_to_duplicate.len());
        let mut vars_to_replace_with = Vec::with_capacity(exist_vars_to_duplicate.len());
        for e in exist_vars_to_duplicate {
            let copy = self.bdd.new_var_after(e);
            let dependencies = self.scope.exist_var_dependencies(e);
            self.scope.add_exist_var(copy, &dependencies);
            vars_to_be_replaced.push(e);
            vars_to_replace_with.push(copy);
        }
        debug!(
            "Eliminating univ variable {}, duplicated {:?} as {:?}",
            u, vars_to_be_replaced, vars_to_replace_with
        );

        let f0 = self.bdd.restrict(self.matrix, u, false);
        let f1 = self.bdd.restrict(self.matrix, u, true);
        let f1 = self
            .bdd
            .swap_variables(f1, &vars_to_be_replaced, &vars_to_replace_with);
        self.replace_matrix(self.bdd.apply_and(f0, f1));
    }

    /// Existential variables that can be abstracted right now.
    ///
    /// Such a variable must occur in the matrix, be bound in this scope, and depend on exactly
    /// the universal variables collected so far: those in the support set together with every
    /// dependency of the existential variables already visited. Collecting a new universal
    /// variable invalidates all candidates accepted before it.
    pub fn possible_exist_vars_to_eliminate(&mut self) -> VarSet {
        let store = self.scope.store();

        let mut univ_vars_needed_to_depend_on = VarSet::new();
        let mut exist_vars_in_support_set = VarSet::new();
        for &v in self.support_set() {
            if store.is_univ_var(v) {
                univ_vars_needed_to_depend_on.insert(v);
            } else if store.is_exist_var(v) {
                exist_vars_in_support_set.insert(v);
            }
        }

        let mut possible_exist_vars_to_eliminate = VarSet::new();
        for e in exist_vars_in_support_set {
            let dependencies = store.exist_var_dependencies(e);
            if univ_vars_needed_to_depend_on.len() != store.num_univ_vars() {
                for &u in &dependencies {
                    if univ_vars_needed_to_depend_on.insert(u) {
                        possible_exist_vars_to_eliminate.clear();
                    }
                }
            }
            if self.scope.is_var_here_quantified(e) && dependencies.len() == univ_vars_needed_to_depend_on.len() {
                possible_exist_vars_to_eliminate.insert(e);
            }
        }

        possible_exist_vars_to_eliminate
    }

    fn initialize_univ_var_elimination_order(&mut self) {
        match self.heuristic {
            UnivVarElimHeuristic::NumOfDependenciesOnce => {
                let store = self.scope.store();
                let mut order: Vec<Var> = self.scope.univ_vars().iter().copied().collect();
                order.sort_by_key(|&u| std::cmp::Reverse(store.num_univ_var_dependents(u)));
                self.univ_vars_order_to_remove = order;
            }
            UnivVarElimHeuristic::NumOfDependenciesContinuous => {}
        }
    }

    fn univ_var_with_fewest_dependents(&self) -> Option<Var> {
        let store = self.scope.store();
        self.scope
            .univ_vars()
            .iter()
            .copied()
            .min_by_key(|&u| store.num_univ_var_dependents(u))
    }

    /// Next universal variable to eliminate, or `None` if there is none left.
    fn univ_var_to_eliminate(&mut self) -> Option<Var> {
        match self.heuristic {
            UnivVarElimHeuristic::NumOfDependenciesOnce => {
                while let Some(u) = self.univ_vars_order_to_remove.pop() {
                    if self.scope.univ_vars().contains(&u) {
                        return Some(u);
                    }
                }
                // The precomputed order only runs out if variables were added afterwards.
                self.univ_var_with_fewest_dependents()
            }
            UnivVarElimHeuristic::NumOfDependenciesContinuous => self.univ_var_with_fewest_dependents(),
        }
    }

    /// Abstract eligible existential variables until none is left.
    ///
    /// With `stop_without_univ_vars`, stops early once no universal variable is bound here.
    fn eliminate_possible_exist_vars(&mut self, stop_without_univ_vars: bool) {
        let mut exist_vars_to_eliminate = self.possible_exist_vars_to_eliminate();
        while !exist_vars_to_eliminate.is_empty() {
            self.eliminate_exist_vars(&exist_vars_to_eliminate);
            self.remove_unused_vars();
            if stop_without_univ_vars && self.univ_vars().is_empty() {
                break;
            }
            exist_vars_to_eliminate = self.possible_exist_vars_to_eliminate();
        }
    }

    /// Eliminate universal variables and every existential variable that becomes eligible.
    ///
    /// When this formula binds every existential variable of the store, it ends as a constant:
    /// any non-false matrix over existential variables only is satisfiable, so it is replaced
    /// by `true` and the scope is cleared. A subformula only sweeps the existential variables
    /// that became eligible after the last universal elimination.
    pub fn eliminate_possible_vars(&mut self) {
        self.remove_unused_vars();

        self.initialize_univ_var_elimination_order();

        while !self.univ_vars().is_empty() {
            self.eliminate_possible_exist_vars(true);

            if self.univ_vars().is_empty() {
                break;
            }

            let Some(u) = self.univ_var_to_eliminate() else {
                break;
            };
            info!("Eliminating univ variable {}", u);
            self.eliminate_univ_var(u);

            self.remove_unused_vars();
        }

        let store = self.scope.store();
        let num_exist_vars = self.exist_vars().len();
        if num_exist_vars == store.num_exist_vars() && self.support_set().len() == num_exist_vars {
            if !self.bdd.is_zero(self.matrix) {
                self.replace_matrix(self.bdd.one);
                self.scope.clear();
            }
        } else {
            self.eliminate_possible_exist_vars(false);
        }
    }

    pub fn stats(&self) -> FormulaStats {
        FormulaStats {
            nodes: self.bdd.size(self.matrix),
            univ_vars: self.univ_vars().len(),
            exist_vars: self.exist_vars().len(),
        }
    }

    pub fn print_stats(&self) {
        info!("{}", self.stats());
    }
}

impl Display for Formula<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.bdd.to_bracket_string(self.matrix))
    }
}
