//! # dqbdd-rs: DQBF solving with Binary Decision Diagrams
//!
//! **`dqbdd-rs`** decides **Dependency-Quantified Boolean Formulas** (DQBF) by eliminating
//! quantified variables from a matrix represented as a BDD.
//!
//! ## What is a DQBF?
//!
//! A DQBF generalizes QBF: every existential variable `e` comes with an explicit set of
//! universal variables it may depend on, instead of depending on everything quantified
//! before it. The formula `∀x1 ∀x2 ∃y1(x1) ∃y2(x2) . φ` is true iff there are Skolem
//! functions `y1(x1)` and `y2(x2)` making `φ` true for every assignment of `x1` and `x2`.
//!
//! ## How it is solved
//!
//! - An existential variable whose dependencies cover every universal variable still in
//!   the matrix is eliminated by abstraction, `∃e. φ = φ[e↦0] ∨ φ[e↦1]`.
//! - Otherwise a universal variable `u` is eliminated by expansion,
//!   `φ[u↦0] ∧ φ[u↦1][e↦e']`, where every existential `e` depending on `u` gets a fresh
//!   copy `e'` for the `u = 1` half.
//!
//! When no universal variable remains the matrix collapses to a constant, which is the answer.
//!
//! ## Basic Usage
//!
//! ```rust
//! use dqbdd_rs::solver::{DqbfSolver, SolverConfig, SolverResult};
//!
//! let input = "p cnf 2 2
//! a 1 0
//! d 2 1 0
//! 1 -2 0
//! -1 2 0
//! ";
//!
//! let solver = DqbfSolver::new(SolverConfig::default());
//! let result = solver.solve_str(input).unwrap();
//! assert_eq!(result, SolverResult::Sat);
//! assert_eq!(result.exit_code(), 10);
//! ```
//!
//! The engine can also be driven directly:
//!
//! ```rust
//! use dqbdd_rs::bdd::Bdd;
//! use dqbdd_rs::formula::Formula;
//! use dqbdd_rs::heuristic::UnivVarElimHeuristic;
//! use dqbdd_rs::quantifiers::DependencyStore;
//! use dqbdd_rs::types::{Var, VarSet};
//!
//! let bdd = Bdd::default();
//! let store = DependencyStore::new();
//! let mut formula = Formula::new(&bdd, &store, UnivVarElimHeuristic::default());
//!
//! let (u, e) = (Var::new(1), Var::new(2));
//! formula.add_univ_var(u);
//! formula.add_exist_var(e, &VarSet::from([u]));
//!
//! let m = bdd.apply_eq(bdd.mk_var(1), bdd.mk_var(2));
//! formula.set_matrix(bdd.function(m)).unwrap();
//! formula.eliminate_possible_vars();
//!
//! assert!(bdd.is_one(formula.matrix().node()));
//! ```
//!
//! ## Core Components
//!
//! - **[`bdd`]**: The BDD manager with an explicit, extendable variable ordering.
//! - **[`quantifiers`]**: The dependency store and per-formula scopes.
//! - **[`formula`]**: The elimination engine.
//! - **[`dqdimacs`]**: Reader for the DQDIMACS input format.
//! - **[`solver`]**: Front-end tying the reader and the engine together.

pub mod bdd;
pub mod cache;
pub mod dqdimacs;
pub mod error;
pub mod formula;
pub mod function;
pub mod heuristic;
pub mod node;
pub mod quantifiers;
pub mod reference;
pub mod solver;
pub mod table;
pub mod types;
pub mod utils;
