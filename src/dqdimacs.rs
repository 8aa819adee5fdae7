//! Reader for the DQDIMACS format.
//!
//! DQDIMACS extends QDIMACS with explicit dependency sets:
//!
//! ```text
//! c comment
//! p cnf <num_vars> <num_clauses>
//! a <u1> <u2> ... 0        universal variables
//! e <e1> <e2> ... 0        existential variables depending on all universals declared so far
//! d <e> <u1> <u2> ... 0    existential variable with an explicit dependency set
//! <lit> <lit> ... 0        clause
//! ```

use std::collections::HashSet;

use log::{debug, warn};

use crate::error::{DqbfError, Result};
use crate::types::{Var, VarSet};

/// A parsed DQDIMACS instance.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct DqdimacsInstance {
    /// Number of variables announced in the header.
    pub num_vars: u32,
    /// Number of clauses announced in the header.
    pub num_clauses: usize,
    /// Universal variables, in declaration order.
    pub univ_vars: Vec<Var>,
    /// Existential variables with their dependency sets, in declaration order.
    pub exist_vars: Vec<(Var, VarSet)>,
    /// Clauses as DIMACS literals (without the terminating `0`).
    pub clauses: Vec<Vec<i32>>,
}

impl DqdimacsInstance {
    pub fn is_declared(&self, v: Var) -> bool {
        self.univ_vars.contains(&v) || self.exist_vars.iter().any(|(e, _)| *e == v)
    }
}

/// Parse a DQDIMACS instance.
///
/// Clauses may span several lines, and the `0` terminating the very last clause may be
/// omitted. A clause count differing from the header is only reported as a warning.
pub fn parse(input: &str) -> Result<DqdimacsInstance> {
    let mut instance = DqdimacsInstance::default();
    let mut has_header = false;
    let mut declared: HashSet<Var> = HashSet::new();
    let mut clause: Vec<i32> = Vec::new();
    let mut num_lines = 0;

    for (i, line) in input.lines().enumerate() {
        let line_no = i + 1;
        num_lines = line_no;
        let line = line.trim();

        if line.is_empty() || line.starts_with('c') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            continue;
        };

        if first == "p" {
            if has_header {
                return Err(DqbfError::parse(line_no, "duplicate problem line"));
            }
            let (num_vars, num_clauses) = parse_header(tokens, line_no)?;
            instance.num_vars = num_vars;
            instance.num_clauses = num_clauses;
            has_header = true;
            continue;
        }

        if !has_header {
            return Err(DqbfError::parse(line_no, "missing problem line 'p cnf <vars> <clauses>'"));
        }

        match first {
            "a" | "e" | "d" => {
                if !instance.clauses.is_empty() || !clause.is_empty() {
                    return Err(DqbfError::parse(line_no, "quantifier prefix after the first clause"));
                }
                let vars = parse_prefix_vars(tokens, line_no, instance.num_vars)?;
                for &v in &vars {
                    if !declared.insert(v) && first != "d" {
                        return Err(DqbfError::parse(line_no, format!("variable {} is declared twice", v.id())));
                    }
                }
                match first {
                    "a" => instance.univ_vars.extend(vars),
                    "e" => {
                        let dependencies: VarSet = instance.univ_vars.iter().copied().collect();
                        instance.exist_vars.extend(vars.into_iter().map(|e| (e, dependencies.clone())));
                    }
                    _ => {
                        let (e, dependencies) = dependency_line(&instance, &vars, line_no)?;
                        instance.exist_vars.push((e, dependencies));
                    }
                }
            }
            _ => {
                for token in std::iter::once(first).chain(tokens) {
                    let lit: i32 = token
                        .parse()
                        .map_err(|_| DqbfError::parse(line_no, format!("invalid literal '{}'", token)))?;
                    if lit == 0 {
                        instance.clauses.push(std::mem::take(&mut clause));
                    } else if lit.unsigned_abs() > instance.num_vars {
                        return Err(DqbfError::parse(
                            line_no,
                            format!("literal {} is out of the declared range 1..={}", lit, instance.num_vars),
                        ));
                    } else {
                        clause.push(lit);
                    }
                }
            }
        }
    }

    if !has_header {
        return Err(DqbfError::parse(num_lines.max(1), "missing problem line 'p cnf <vars> <clauses>'"));
    }

    if !clause.is_empty() {
        debug!("Last clause is not terminated by 0");
        instance.clauses.push(clause);
    }

    if instance.clauses.len() != instance.num_clauses {
        warn!(
            "Expected {} clauses but parsed {}",
            instance.num_clauses,
            instance.clauses.len()
        );
    }

    debug!(
        "Parsed DQDIMACS instance with {} universal variables, {} existential variables and {} clauses",
        instance.univ_vars.len(),
        instance.exist_vars.len(),
        instance.clauses.len()
    );

    Ok(instance)
}

fn parse_header<'s>(mut tokens: impl Iterator<Item = &'s str>, line_no: usize) -> Result<(u32, usize)> {
    if tokens.next() != Some("cnf") {
        return Err(DqbfError::parse(line_no, "invalid problem line, expected 'p cnf <vars> <clauses>'"));
    }
    let num_vars = tokens
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(|| DqbfError::parse(line_no, "invalid number of variables"))?;
    let num_clauses = tokens
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| DqbfError::parse(line_no, "invalid number of clauses"))?;
    if let Some(token) = tokens.next() {
        return Err(DqbfError::parse(line_no, format!("unexpected token '{}' in problem line", token)));
    }
    Ok((num_vars, num_clauses))
}

/// Variables of a prefix line, without the terminating `0`.
fn parse_prefix_vars<'s>(tokens: impl Iterator<Item = &'s str>, line_no: usize, num_vars: u32) -> Result<Vec<Var>> {
    let mut vars = Vec::new();
    let mut terminated = false;
    for token in tokens {
        if terminated {
            return Err(DqbfError::parse(line_no, format!("unexpected token '{}' after terminating 0", token)));
        }
        let v: u32 = token
            .parse()
            .map_err(|_| DqbfError::parse(line_no, format!("invalid variable '{}'", token)))?;
        if v == 0 {
            terminated = true;
            continue;
        }
        if v > num_vars {
            return Err(DqbfError::parse(
                line_no,
                format!("variable {} is out of the declared range 1..={}", v, num_vars),
            ));
        }
        vars.push(Var::new(v));
    }
    if !terminated {
        return Err(DqbfError::parse(line_no, "missing terminating 0"));
    }
    Ok(vars)
}

fn dependency_line(instance: &DqdimacsInstance, vars: &[Var], line_no: usize) -> Result<(Var, VarSet)> {
    let Some((&e, dependencies)) = vars.split_first() else {
        return Err(DqbfError::parse(line_no, "missing existential variable in dependency line"));
    };
    if instance.is_declared(e) {
        return Err(DqbfError::parse(line_no, format!("variable {} is declared twice", e.id())));
    }
    for &u in dependencies {
        if !instance.univ_vars.contains(&u) {
            return Err(DqbfError::parse(
                line_no,
                format!("variable {} depends on {}, which is not a universal variable", e.id(), u.id()),
            ));
        }
    }
    Ok((e, dependencies.iter().copied().collect()))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn vars(ids: &[u32]) -> VarSet {
        ids.iter().map(|&i| Var::new(i)).collect()
    }

    fn parse_error_line(input: &str) -> usize {
        match parse(input) {
            Err(DqbfError::Parse { line, .. }) => line,
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_prefix_and_clauses() {
        let input = "c example
p cnf 5 4
a 1 2 0
d 3 1 0
d 4 2 0
e 5 0
3 2 5 0
-3 -2 5 0
4 1 -5 0
-4 -1 -5 0
";
        let instance = parse(input).unwrap();
        assert_eq!(instance.num_vars, 5);
        assert_eq!(instance.num_clauses, 4);
        assert_eq!(instance.univ_vars, vec![Var::new(1), Var::new(2)]);
        assert_eq!(
            instance.exist_vars,
            vec![
                (Var::new(3), vars(&[1])),
                (Var::new(4), vars(&[2])),
                (Var::new(5), vars(&[1, 2])),
            ]
        );
        assert_eq!(instance.clauses.len(), 4);
        assert_eq!(instance.clauses[1], vec![-3, -2, 5]);
    }

    #[test]
    fn test_exist_block_depends_on_preceding_universals() {
        let input = "p cnf 4 1
a 1 0
e 2 0
a 3 0
e 4 0
1 2 3 4 0
";
        let instance = parse(input).unwrap();
        assert_eq!(
            instance.exist_vars,
            vec![(Var::new(2), vars(&[1])), (Var::new(4), vars(&[1, 3]))]
        );
    }

    #[test]
    fn test_empty_dependency_set() {
        let instance = parse("p cnf 2 1\na 1 0\nd 2 0\n1 2 0\n").unwrap();
        assert_eq!(instance.exist_vars, vec![(Var::new(2), VarSet::new())]);
    }

    #[test]
    fn test_clause_without_final_zero_and_multiline() {
        let instance = parse("p cnf 3 2\n1 -2\n3 0\n-1 2").unwrap();
        assert_eq!(instance.clauses, vec![vec![1, -2, 3], vec![-1, 2]]);
    }

    #[test]
    fn test_undeclared_clause_vars_are_kept() {
        let instance = parse("p cnf 3 1\na 1 0\n1 3 0\n").unwrap();
        assert!(!instance.is_declared(Var::new(3)));
        assert_eq!(instance.clauses, vec![vec![1, 3]]);
    }

    #[test]
    fn test_empty_clause() {
        let instance = parse("p cnf 1 1\n0\n").unwrap();
        assert_eq!(instance.clauses, vec![Vec::<i32>::new()]);
    }

    #[test]
    fn test_clause_count_mismatch_is_tolerated() {
        let instance = parse("p cnf 2 5\n1 2 0\n").unwrap();
        assert_eq!(instance.clauses.len(), 1);
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(parse_error_line("c only a comment\n1 2 0\n"), 2);
        assert_eq!(parse_error_line(""), 1);
        assert_eq!(parse_error_line("c nothing\nc here\n"), 2);
    }

    #[test]
    fn test_malformed_header() {
        assert_eq!(parse_error_line("p dnf 2 1\n"), 1);
        assert_eq!(parse_error_line("p cnf two 1\n"), 1);
        assert_eq!(parse_error_line("p cnf 2\n"), 1);
        assert_eq!(parse_error_line("p cnf 2 1 7\n"), 1);
        assert_eq!(parse_error_line("p cnf 2 1\np cnf 2 1\n"), 2);
    }

    #[test]
    fn test_malformed_numbers() {
        assert_eq!(parse_error_line("p cnf 2 1\na x 0\n"), 2);
        assert_eq!(parse_error_line("p cnf 2 1\na -1 0\n"), 2);
        assert_eq!(parse_error_line("p cnf 2 1\n1 y 0\n"), 2);
    }

    #[test]
    fn test_prefix_errors() {
        // Out of range.
        assert_eq!(parse_error_line("p cnf 2 0\na 3 0\n"), 2);
        // Missing terminating 0.
        assert_eq!(parse_error_line("p cnf 2 0\na 1 2\n"), 2);
        // Tokens after the terminating 0.
        assert_eq!(parse_error_line("p cnf 2 0\na 1 0 2\n"), 2);
        // Declared twice.
        assert_eq!(parse_error_line("p cnf 2 0\na 1 0\ne 1 0\n"), 3);
        assert_eq!(parse_error_line("p cnf 2 0\na 1 0\nd 2 1 0\nd 2 1 0\n"), 4);
        // Prefix after a clause.
        assert_eq!(parse_error_line("p cnf 2 1\n1 0\na 2 0\n"), 3);
    }

    #[test]
    fn test_clause_literal_out_of_range() {
        assert_eq!(parse_error_line("p cnf 2 1\n3 0\n"), 2);
        assert_eq!(parse_error_line("p cnf 2 1\na 1 0\n1 -5000000 0\n"), 3);
        assert_eq!(parse_error_line("p cnf 2 1\n-2147483648 0\n"), 2);
        assert_eq!(parse_error_line("p cnf 0 1\n1 0\n"), 2);
        // The bounds themselves are accepted.
        assert_eq!(parse("p cnf 2 1\n-2 2 0\n").unwrap().clauses, vec![vec![-2, 2]]);
    }

    #[test]
    fn test_dependency_errors() {
        // Depends on an existential variable.
        assert_eq!(parse_error_line("p cnf 3 0\na 1 0\ne 2 0\nd 3 2 0\n"), 4);
        // Depends on an undeclared variable.
        assert_eq!(parse_error_line("p cnf 3 0\na 1 0\nd 3 2 0\n"), 3);
        // No existential variable at all.
        assert_eq!(parse_error_line("p cnf 3 0\na 1 0\nd 0\n"), 3);
    }
}
