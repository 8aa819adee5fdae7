//! Solver front-end: DQDIMACS instance in, SAT/UNSAT out.

use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Instant;

use log::{debug, info};

use crate::bdd::Bdd;
use crate::dqdimacs::{self, DqdimacsInstance};
use crate::error::Result;
use crate::formula::Formula;
use crate::heuristic::UnivVarElimHeuristic;
use crate::quantifiers::DependencyStore;
use crate::types::{Var, VarSet};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SolverConfig {
    pub heuristic: UnivVarElimHeuristic,
    /// BDD storage size in bits (the manager holds `2^storage_bits` nodes).
    pub storage_bits: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            heuristic: UnivVarElimHeuristic::default(),
            storage_bits: 20,
        }
    }
}

impl SolverConfig {
    pub fn with_heuristic(mut self, heuristic: UnivVarElimHeuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_storage_bits(mut self, storage_bits: usize) -> Self {
        self.storage_bits = storage_bits;
        self
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SolverResult {
    Sat,
    Unsat,
}

impl SolverResult {
    /// Process exit code, following the usual QBF solver convention.
    pub fn exit_code(self) -> i32 {
        match self {
            SolverResult::Sat => 10,
            SolverResult::Unsat => 20,
        }
    }

    pub fn is_sat(self) -> bool {
        self == SolverResult::Sat
    }
}

impl Display for SolverResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Sat => write!(f, "SAT"),
            SolverResult::Unsat => write!(f, "UNSAT"),
        }
    }
}

pub struct DqbfSolver {
    config: SolverConfig,
}

impl DqbfSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Decide the instance.
    ///
    /// Variables occurring in clauses without being declared in the prefix are treated as
    /// existential variables without dependencies.
    pub fn solve(&self, instance: &DqdimacsInstance) -> Result<SolverResult> {
        let time_total = Instant::now();

        let bdd = Bdd::new(self.config.storage_bits);
        let store = DependencyStore::new();
        let mut formula = Formula::new(&bdd, &store, self.config.heuristic);
        debug!("bdd = {:?}", bdd);

        for &u in &instance.univ_vars {
            formula.add_univ_var(u);
        }
        for (e, dependencies) in &instance.exist_vars {
            formula.add_exist_var(*e, dependencies);
        }

        let undeclared: VarSet = instance
            .clauses
            .iter()
            .flatten()
            .map(|lit| Var::new(lit.unsigned_abs()))
            .filter(|&v| !store.is_univ_var(v) && !store.is_exist_var(v))
            .collect();
        if !undeclared.is_empty() {
            debug!("Variables {:?} are not in the prefix, quantifying them existentially", undeclared);
        }
        for v in undeclared {
            formula.add_exist_var(v, &VarSet::new());
        }

        let time_matrix = Instant::now();
        let mut matrix = bdd.one;
        for clause in &instance.clauses {
            matrix = bdd.apply_and(matrix, bdd.clause(clause.iter().copied()));
            if bdd.is_zero(matrix) {
                debug!("Matrix became false while conjoining clauses");
                break;
            }
        }
        formula.set_matrix(bdd.function(matrix))?;
        info!("Built matrix in {:.3} s", time_matrix.elapsed().as_secs_f64());
        formula.print_stats();

        formula.eliminate_possible_vars();
        formula.print_stats();

        let result = if bdd.is_zero(formula.matrix().node()) {
            SolverResult::Unsat
        } else {
            SolverResult::Sat
        };
        info!("Solved in {:.3} s: {}", time_total.elapsed().as_secs_f64(), result);
        Ok(result)
    }

    pub fn solve_str(&self, input: &str) -> Result<SolverResult> {
        let instance = dqdimacs::parse(input)?;
        self.solve(&instance)
    }

    pub fn solve_file(&self, path: impl AsRef<Path>) -> Result<SolverResult> {
        let path = path.as_ref();
        info!("Reading {}", path.display());
        let input = std::fs::read_to_string(path)?;
        self.solve_str(&input)
    }
}
