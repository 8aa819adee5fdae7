//! The BDD manager.
//!
//! Nodes are hash-consed in a [`Table`] and addressed by [`Ref`] handles with complement
//! edges, so every function has exactly one handle and equality is handle equality.
//!
//! Unlike a manager with a fixed `x1 < x2 < ...` order, this one keeps an explicit
//! variable ordering. A fresh variable can be inserted directly below an existing one
//! ([`Bdd::new_var_after`]): the relative order of all existing variables is unchanged,
//! so existing nodes and cached results stay valid.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;

use log::debug;

use crate::cache::Cache;
use crate::function::{Function, ManagerId};
use crate::node::Node;
use crate::reference::Ref;
use crate::table::Table;
use crate::types::{Level, Var, VarSet};
use crate::utils::{pairing2, pairing3, MyHash};

type Storage = Table<Node>;

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum OpKey {
    Ite(Ref, Ref, Ref),
    Exists(Ref, Ref),
}

impl MyHash for OpKey {
    fn hash(&self) -> u64 {
        match self {
            OpKey::Ite(f, g, h) => pairing3(f.unsigned() as u64, g.unsigned() as u64, h.unsigned() as u64),
            OpKey::Exists(f, cube) => pairing2(f.unsigned() as u64, cube.unsigned() as u64),
        }
    }
}

/// Explicit variable ordering: `var_order[level] = var` and `level_map[var] = level`.
#[derive(Debug, Default)]
struct VarOrder {
    var_order: Vec<u32>,
    // Index 0 is unused (variables are 1-indexed).
    level_map: Vec<usize>,
}

impl VarOrder {
    fn num_vars(&self) -> usize {
        self.var_order.len()
    }

    fn contains(&self, v: u32) -> bool {
        v != 0 && (v as usize) < self.level_map.len()
    }

    fn level(&self, v: u32) -> Level {
        if v == 0 {
            return Level::TERMINAL;
        }
        assert!(self.contains(v), "Variable x{} is not registered", v);
        Level::new(self.level_map[v as usize])
    }

    fn var_at(&self, level: Level) -> u32 {
        self.var_order[level.index()]
    }

    fn next_id(&self) -> u32 {
        (self.var_order.len() + 1) as u32
    }

    /// Register a new variable at the given level, shifting everything below it down.
    fn insert(&mut self, level: usize) -> u32 {
        let v = self.next_id();
        if self.level_map.is_empty() {
            self.level_map.push(usize::MAX);
        }
        self.var_order.insert(level, v);
        self.level_map.push(level);
        for l in level..self.var_order.len() {
            let w = self.var_order[l];
            self.level_map[w as usize] = l;
        }
        v
    }
}

pub struct Bdd {
    id: ManagerId,
    storage: RefCell<Storage>,
    cache: RefCell<Cache<OpKey, Ref>>,
    size_cache: RefCell<Cache<Ref, u64>>,
    order: RefCell<VarOrder>,
    pub zero: Ref,
    pub one: Ref,
}

impl Bdd {
    pub fn new(storage_bits: usize) -> Self {
        assert!(storage_bits <= 31, "Storage bits should be in the range 0..=31");

        let cache_bits = storage_bits.min(16);

        let mut storage = Storage::new(storage_bits);

        // Allocate the terminal node:
        let one = storage.alloc();
        assert_eq!(one, 1); // Make sure the terminal node is (1).
        let one = Ref::positive(one as u32);
        let zero = -one;

        Self {
            id: ManagerId::fresh(),
            storage: RefCell::new(storage),
            cache: RefCell::new(Cache::new(cache_bits)),
            size_cache: RefCell::new(Cache::new(cache_bits)),
            order: RefCell::new(VarOrder::default()),
            zero,
            one,
        }
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::new(20)
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let storage = self.storage.borrow();
        f.debug_struct("Bdd")
            .field("id", &self.id)
            .field("capacity", &storage.capacity())
            .field("size", &storage.size())
            .field("num_vars", &self.num_vars())
            .finish()
    }
}

impl Bdd {
    pub fn id(&self) -> ManagerId {
        self.id
    }

    /// Tag a node handle of this manager as a [`Function`].
    pub fn function(&self, node: Ref) -> Function {
        Function::new(self.id, node)
    }

    /// Check whether the function was built by this manager.
    pub fn owns(&self, f: &Function) -> bool {
        f.manager() == self.id
    }

    fn node(&self, index: usize) -> Node {
        *self.storage.borrow().value(index)
    }

    pub fn variable(&self, index: usize) -> u32 {
        self.node(index).variable
    }
    pub fn low(&self, index: usize) -> Ref {
        self.node(index).low
    }
    pub fn high(&self, index: usize) -> Ref {
        self.node(index).high
    }

    pub fn low_node(&self, node: Ref) -> Ref {
        let low = self.low(node.index());
        if node.is_negated() {
            -low
        } else {
            low
        }
    }
    pub fn high_node(&self, node: Ref) -> Ref {
        let high = self.high(node.index());
        if node.is_negated() {
            -high
        } else {
            high
        }
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == self.zero
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == self.one
    }
    pub fn is_terminal(&self, node: Ref) -> bool {
        self.is_zero(node) || self.is_one(node)
    }

    /// Number of variables registered in the ordering.
    pub fn num_vars(&self) -> usize {
        self.order.borrow().num_vars()
    }

    /// Current level of the variable.
    ///
    /// # Panics
    ///
    /// Panics if the variable was never registered.
    pub fn level(&self, v: Var) -> Level {
        self.order.borrow().level(v.id())
    }

    /// The variable at the given level.
    pub fn var_at(&self, level: Level) -> Var {
        Var::new(self.order.borrow().var_at(level))
    }

    /// Level of the top variable of the node ([`Level::TERMINAL`] for constants).
    fn node_level(&self, node: Ref) -> Level {
        let v = self.variable(node.index());
        self.order.borrow().level(v)
    }

    /// Register all variables up to `v` (appended at the bottom of the ordering).
    pub fn register_var(&self, v: Var) {
        self.ensure_var(v.id());
    }

    fn ensure_var(&self, v: u32) {
        let mut order = self.order.borrow_mut();
        while (order.num_vars() as u32) < v {
            let level = order.num_vars();
            order.insert(level);
        }
    }

    /// Allocate a fresh variable at the bottom of the ordering.
    pub fn new_var(&self) -> Var {
        let mut order = self.order.borrow_mut();
        let level = order.num_vars();
        Var::new(order.insert(level))
    }

    /// Allocate a fresh variable placed directly below `v` in the ordering.
    ///
    /// Keeping a duplicated variable next to its original keeps the diagram compact
    /// when both appear in one function.
    pub fn new_var_after(&self, v: Var) -> Var {
        let mut order = self.order.borrow_mut();
        let level = order.level(v.id()).next();
        let fresh = order.insert(level.index());
        debug!("new_var_after({}) -> x{} at {}", v, fresh, level);
        Var::new(fresh)
    }

    pub fn mk_node(&self, v: u32, low: Ref, high: Ref) -> Ref {
        assert_ne!(v, 0, "Variable index should not be zero");

        // Handle canonicity
        if high.is_negated() {
            return -self.mk_node(v, -low, -high);
        }

        // Handle duplicates
        if low == high {
            return low;
        }

        let i = self.storage.borrow_mut().put(Node { variable: v, low, high });
        Ref::positive(i as u32)
    }

    pub fn mk_var(&self, v: u32) -> Ref {
        assert_ne!(v, 0, "Variable index should not be zero");
        self.ensure_var(v);
        self.mk_node(v, self.zero, self.one)
    }

    /// Conjunction of the given variables, all in positive polarity.
    pub fn cube(&self, vars: impl IntoIterator<Item = Var>) -> Ref {
        let mut vars: Vec<Var> = vars.into_iter().collect();
        for v in &vars {
            self.ensure_var(v.id());
        }
        vars.sort_by_key(|&v| std::cmp::Reverse(self.level(v)));
        vars.dedup();
        debug!("cube(vars = {:?})", vars);
        let mut current = self.one;
        for v in vars {
            current = self.mk_node(v.id(), self.zero, current);
        }
        current
    }

    /// Disjunction of DIMACS-style literals (`-3` is the negation of `x3`).
    pub fn clause(&self, literals: impl IntoIterator<Item = i32>) -> Ref {
        let mut literals: Vec<i32> = literals.into_iter().collect();
        for &lit in &literals {
            assert_ne!(lit, 0, "Variable index should not be zero");
            self.ensure_var(lit.unsigned_abs());
        }
        literals.sort_by_key(|&lit| (std::cmp::Reverse(self.level(Var::new(lit.unsigned_abs()))), lit));
        literals.dedup();
        debug!("clause(literals = {:?})", literals);
        if literals.windows(2).any(|w| w[0] == -w[1]) {
            // Contains both x and ~x.
            return self.one;
        }
        let mut current = self.zero;
        for lit in literals {
            let v = lit.unsigned_abs();
            current = if lit < 0 {
                self.mk_node(v, self.one, current)
            } else {
                self.mk_node(v, current, self.one)
            };
        }
        current
    }

    pub fn top_cofactors(&self, node: Ref, level: Level) -> (Ref, Ref) {
        if self.is_terminal(node) || level < self.node_level(node) {
            return (node, node);
        }
        assert_eq!(level, self.node_level(node));
        (self.low_node(node), self.high_node(node))
    }

    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ITE(x, y, z) = (x ∧ y) ∨ (¬x ∧ z)
    /// ```
    ///
    /// # Examples
    ///
    /// ```
    /// use dqbdd_rs::bdd::Bdd;
    ///
    /// let bdd = Bdd::default();
    /// let x = bdd.mk_var(1);
    /// let y = bdd.mk_var(2);
    /// let z = bdd.mk_var(3);
    /// let f = bdd.apply_ite(x, y, z);
    /// let x_and_y = bdd.apply_and(x, y);
    /// let not_x_and_z = bdd.apply_and(-x, z);
    /// assert_eq!(f, bdd.apply_or(x_and_y, not_x_and_z));
    /// ```
    pub fn apply_ite(&self, f: Ref, g: Ref, h: Ref) -> Ref {
        // Base cases:
        //   ite(1,G,H) => G
        //   ite(0,G,H) => H
        if self.is_one(f) {
            return g;
        }
        if self.is_zero(f) {
            return h;
        }

        // Standard triples:
        //   ite(F,F,H) => ite(F,1,H)
        //   ite(F,~F,H) => ite(F,0,H)
        //   ite(F,G,F) => ite(F,G,0)
        //   ite(F,G,~F) => ite(F,G,1)
        let g = if g == f {
            self.one
        } else if g == -f {
            self.zero
        } else {
            g
        };
        let h = if h == f {
            self.zero
        } else if h == -f {
            self.one
        } else {
            h
        };

        // More base cases:
        //   ite(F,G,G) => G
        //   ite(F,1,0) => F
        //   ite(F,0,1) => ~F
        if g == h {
            return g;
        }
        if self.is_one(g) && self.is_zero(h) {
            return f;
        }
        if self.is_zero(g) && self.is_one(h) {
            return -f;
        }

        let i = self.node_level(f);
        let j = self.node_level(g);
        let k = self.node_level(h);

        // Equivalent pairs (choose the one with the topmost variable first):
        //   ite(F,1,H) == ite(H,1,F) == F ∨ H
        //   ite(F,G,0) == ite(G,F,0) == F ∧ G
        if self.is_one(g) && k < i {
            return self.apply_ite(h, self.one, f);
        }
        if self.is_zero(h) && j < i {
            return self.apply_ite(g, f, self.zero);
        }

        // Make sure the first two pointers (f and g) are regular (not negated)
        let (mut f, mut g, mut h) = (f, g, h);

        // ite(~F,G,H) => ite(F,H,G)
        if f.is_negated() {
            f = -f;
            std::mem::swap(&mut g, &mut h);
        }

        // ite(F,~G,H) => ~ite(F,G,~H)
        let mut n = false;
        if g.is_negated() {
            n = true;
            g = -g;
            h = -h;
        }

        let key = OpKey::Ite(f, g, h);
        if let Some(&res) = self.cache.borrow().get(&key) {
            return if n { -res } else { res };
        }

        // Determine the top variable:
        let m = i.min(j).min(k);
        let v = self.order.borrow().var_at(m);

        let (f0, f1) = self.top_cofactors(f, m);
        let (g0, g1) = self.top_cofactors(g, m);
        let (h0, h1) = self.top_cofactors(h, m);

        let e = self.apply_ite(f0, g0, h0);
        let t = self.apply_ite(f1, g1, h1);

        let res = self.mk_node(v, e, t);
        debug!("computed: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
        self.cache.borrow_mut().insert(key, res);

        if n {
            -res
        } else {
            res
        }
    }

    pub fn apply_not(&self, f: Ref) -> Ref {
        -f
    }

    pub fn apply_and(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, self.zero)
    }

    pub fn apply_or(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, self.one, v)
    }

    pub fn apply_xor(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, -v, v)
    }

    pub fn apply_eq(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, -v)
    }

    pub fn apply_and_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = self.one;
        for node in nodes {
            res = self.apply_and(res, node);
            if self.is_zero(res) {
                break;
            }
        }
        res
    }

    /// Cofactor of `f` by the literal `v = value`, i.e. `f|v<-value`.
    pub fn restrict(&self, f: Ref, v: Var, value: bool) -> Ref {
        debug!("restrict(f = {}, v = {}, value = {})", f, v, value);
        let level = self.level(v);
        let mut cache = HashMap::new();
        self.restrict_(f, level, value, &mut cache)
    }

    fn restrict_(&self, f: Ref, level: Level, value: bool, cache: &mut HashMap<Ref, Ref>) -> Ref {
        if self.is_terminal(f) {
            return f;
        }

        let i = self.node_level(f);

        if level < i {
            // 'f' does not depend on the variable
            return f;
        }

        if level == i {
            return if value { self.high_node(f) } else { self.low_node(f) };
        }

        if let Some(&res) = cache.get(&f) {
            return res;
        }

        let low = self.restrict_(self.low_node(f), level, value, cache);
        let high = self.restrict_(self.high_node(f), level, value, cache);
        let res = self.mk_node(self.variable(f.index()), low, high);
        cache.insert(f, res);
        res
    }

    /// Existential abstraction `∃cube. f` over a positive cube (see [`Bdd::cube`]).
    pub fn exists(&self, f: Ref, cube: Ref) -> Ref {
        if self.is_terminal(f) || self.is_one(cube) {
            return f;
        }
        assert!(!self.is_zero(cube), "Cube should not be zero");

        // Skip cube variables above the top variable of 'f'
        let i = self.node_level(f);
        let mut cube = cube;
        while !self.is_one(cube) && self.node_level(cube) < i {
            debug_assert!(self.is_zero(self.low_node(cube)), "Cube should be positive");
            cube = self.high_node(cube);
        }
        if self.is_one(cube) {
            return f;
        }

        let key = OpKey::Exists(f, cube);
        if let Some(&res) = self.cache.borrow().get(&key) {
            return res;
        }

        let (f0, f1) = self.top_cofactors(f, i);
        let res = if self.node_level(cube) == i {
            let rest = self.high_node(cube);
            let e0 = self.exists(f0, rest);
            if self.is_one(e0) {
                self.one
            } else {
                let e1 = self.exists(f1, rest);
                self.apply_or(e0, e1)
            }
        } else {
            let e0 = self.exists(f0, cube);
            let e1 = self.exists(f1, cube);
            self.mk_node(self.variable(f.index()), e0, e1)
        };
        debug!("computed: exists(f = {}, cube = {}) -> {}", f, cube, res);

        self.cache.borrow_mut().insert(key, res);
        res
    }

    /// Existential abstraction over a set of variables.
    pub fn exists_vars(&self, f: Ref, vars: impl IntoIterator<Item = Var>) -> Ref {
        let cube = self.cube(vars);
        self.exists(f, cube)
    }

    /// Simultaneously swap each variable `xs[i]` with `ys[i]` in `f`.
    ///
    /// When no `ys[i]` occurs in `f`, this is plain renaming of `xs` to `ys`.
    pub fn swap_variables(&self, f: Ref, xs: &[Var], ys: &[Var]) -> Ref {
        assert_eq!(xs.len(), ys.len(), "Swapped variable lists should have equal length");
        if xs.is_empty() {
            return f;
        }
        let mut permutation = HashMap::new();
        for (&x, &y) in xs.iter().zip(ys) {
            permutation.insert(x.id(), y.id());
            permutation.insert(y.id(), x.id());
        }
        let mut cache = HashMap::new();
        self.permute_(f, &permutation, &mut cache)
    }

    fn permute_(&self, f: Ref, permutation: &HashMap<u32, u32>, cache: &mut HashMap<Ref, Ref>) -> Ref {
        if self.is_terminal(f) {
            return f;
        }
        if let Some(&res) = cache.get(&f) {
            return res;
        }

        let v = self.variable(f.index());
        let low = self.permute_(self.low_node(f), permutation, cache);
        let high = self.permute_(self.high_node(f), permutation, cache);
        let target = permutation.get(&v).copied().unwrap_or(v);
        let res = self.apply_ite(self.mk_var(target), high, low);
        cache.insert(f, res);
        res
    }

    /// Variables on which `f` actually depends.
    pub fn support(&self, f: Ref) -> VarSet {
        let mut vars = VarSet::new();
        let mut visited = HashSet::new();
        let mut stack = vec![f.index()];

        while let Some(i) = stack.pop() {
            if i == self.one.index() || !visited.insert(i) {
                continue;
            }
            let node = self.node(i);
            vars.insert(Var::new(node.variable));
            stack.push(node.low.index());
            stack.push(node.high.index());
        }

        vars
    }

    pub fn descendants(&self, nodes: impl IntoIterator<Item = Ref>) -> HashSet<usize> {
        let mut visited = HashSet::new();
        visited.insert(self.one.index());
        let mut stack: Vec<usize> = nodes.into_iter().map(|node| node.index()).collect();

        while let Some(i) = stack.pop() {
            if visited.insert(i) {
                stack.push(self.low(i).index());
                stack.push(self.high(i).index());
            }
        }

        visited
    }

    /// Number of nodes of `f`, the terminal included.
    pub fn size(&self, f: Ref) -> u64 {
        if let Some(&size) = self.size_cache.borrow().get(&f) {
            return size;
        }
        let size = self.descendants([f]).len() as u64;
        self.size_cache.borrow_mut().insert(f, size);
        size
    }

    pub fn to_bracket_string(&self, node: Ref) -> String {
        if self.is_zero(node) {
            return "(0)".to_string();
        } else if self.is_one(node) {
            return "(1)".to_string();
        }

        let v = self.variable(node.index());
        let low = self.low_node(node);
        let high = self.high_node(node);

        format!(
            "{}:(x{}, {}, {})",
            node,
            v,
            self.to_bracket_string(high),
            self.to_bracket_string(low)
        )
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_var() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);

        assert_eq!(bdd.variable(x.index()), 1);
        assert_eq!(bdd.high_node(x), bdd.one);
        assert_eq!(bdd.low_node(x), bdd.zero);
    }

    #[test]
    fn test_not_var() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);
        let not_x = -x;

        assert_eq!(bdd.variable(not_x.index()), 1);
        assert_eq!(bdd.high_node(not_x), bdd.zero);
        assert_eq!(bdd.low_node(not_x), bdd.one);
    }

    #[test]
    fn test_terminal() {
        let bdd = Bdd::default();

        assert!(bdd.is_terminal(bdd.zero));
        assert!(bdd.is_zero(bdd.zero));
        assert!(!bdd.is_one(bdd.zero));

        assert!(bdd.is_terminal(bdd.one));
        assert!(!bdd.is_zero(bdd.one));
        assert!(bdd.is_one(bdd.one));
    }

    #[test]
    fn test_cube() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);

        let f = bdd.apply_and(bdd.apply_and(x1, x2), x3);
        let cube = bdd.cube([Var::new(3), Var::new(1), Var::new(2)]);
        assert_eq!(f, cube);
    }

    #[test]
    fn test_clause() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);

        let f = bdd.apply_or(bdd.apply_or(x1, -x2), -x3);
        let clause = bdd.clause([-3, 1, -2]);
        assert_eq!(f, clause);
    }

    #[test]
    fn test_clause_tautology_and_duplicates() {
        let bdd = Bdd::default();

        assert_eq!(bdd.clause([1, 2, -1]), bdd.one);
        assert_eq!(bdd.clause([2, 2]), bdd.mk_var(2));
        assert_eq!(bdd.clause([]), bdd.zero);
    }

    #[test]
    fn test_de_morgan() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);

        assert_eq!(-bdd.apply_and(x, y), bdd.apply_or(-x, -y));
        assert_eq!(-bdd.apply_or(x, y), bdd.apply_and(-x, -y));
    }

    #[test]
    fn test_xor() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);
        let f = bdd.apply_and(x, y);

        assert_eq!(bdd.apply_xor(f, f), bdd.zero);
        assert_eq!(bdd.apply_xor(f, -f), bdd.one);
        assert_eq!(bdd.apply_xor(x, y), -bdd.apply_eq(x, y));
    }

    #[test]
    fn test_apply_ite() {
        let bdd = Bdd::default();

        let g = bdd.mk_var(2);
        let h = bdd.mk_var(3);
        assert_eq!(bdd.apply_ite(bdd.one, g, h), g);
        assert_eq!(bdd.apply_ite(bdd.zero, g, h), h);

        let f = bdd.mk_node(1, bdd.one, h);
        assert_eq!(bdd.apply_ite(f, f, h), bdd.apply_or(f, h));
        assert_eq!(bdd.apply_ite(f, g, f), bdd.apply_and(f, g));
        assert_eq!(bdd.apply_ite(f, -g, bdd.one), -bdd.apply_and(f, g));

        let f = bdd.mk_var(5);
        assert_eq!(bdd.apply_ite(f, g, g), g);
        assert_eq!(bdd.apply_ite(f, bdd.one, bdd.zero), f);
        assert_eq!(bdd.apply_ite(f, bdd.zero, bdd.one), -f);
    }

    #[test]
    fn test_restrict() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);

        let f = bdd.apply_or(bdd.apply_eq(x1, x2), x3);
        let f_x2_zero = bdd.restrict(f, Var::new(2), false);
        assert_eq!(f_x2_zero, bdd.apply_or(-x1, x3));

        let f_x2_one = bdd.restrict(f, Var::new(2), true);
        assert_eq!(f_x2_one, bdd.apply_or(x1, x3));

        // 'f' does not depend on x4
        bdd.mk_var(4);
        assert_eq!(bdd.restrict(f, Var::new(4), true), f);
    }

    #[test]
    fn test_exists() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);

        let f = bdd.apply_and(bdd.apply_eq(x1, x2), x3);
        assert_eq!(bdd.exists_vars(f, [Var::new(2)]), x3);
        assert_eq!(bdd.exists_vars(f, [Var::new(3)]), bdd.apply_eq(x1, x2));
        assert_eq!(bdd.exists_vars(f, [Var::new(1), Var::new(2), Var::new(3)]), bdd.one);
        assert_eq!(bdd.exists_vars(bdd.zero, [Var::new(1)]), bdd.zero);
        assert_eq!(bdd.exists_vars(f, []), f);
    }

    #[test]
    fn test_exists_matches_cofactor_disjunction() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);

        let f = bdd.apply_or(bdd.apply_and(x1, -x2), bdd.apply_xor(x2, x3));
        let v = Var::new(2);
        let expected = bdd.apply_or(bdd.restrict(f, v, false), bdd.restrict(f, v, true));
        assert_eq!(bdd.exists_vars(f, [v]), expected);
    }

    #[test]
    fn test_swap_variables() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);

        // Renaming x1 to x3 in (x1 & ~x2)
        let f = bdd.apply_and(x1, -x2);
        let g = bdd.swap_variables(f, &[Var::new(1)], &[Var::new(3)]);
        assert_eq!(g, bdd.apply_and(x3, -x2));

        // Proper swap of two occurring variables
        let f = bdd.apply_and(x1, -x2);
        let g = bdd.swap_variables(f, &[Var::new(1)], &[Var::new(2)]);
        assert_eq!(g, bdd.apply_and(x2, -x1));
    }

    #[test]
    fn test_support() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x3 = bdd.mk_var(3);

        let f = bdd.apply_xor(x1, x3);
        let support: Vec<u32> = bdd.support(f).into_iter().map(|v| v.id()).collect();
        assert_eq!(support, vec![1, 3]);
        assert!(bdd.support(bdd.one).is_empty());
        assert!(bdd.support(bdd.zero).is_empty());
    }

    #[test]
    fn test_new_var_after() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let f = bdd.apply_and(x1, x2);

        let y = bdd.new_var_after(Var::new(1));
        assert_eq!(y, Var::new(3));
        assert_eq!(bdd.level(Var::new(1)), Level::new(0));
        assert_eq!(bdd.level(y), Level::new(1));
        assert_eq!(bdd.level(Var::new(2)), Level::new(2));
        assert_eq!(bdd.var_at(Level::new(1)), y);

        // Existing nodes stay valid and new nodes respect the new ordering.
        let g = bdd.apply_and(f, bdd.mk_var(y.id()));
        assert_eq!(g, bdd.cube([Var::new(1), y, Var::new(2)]));
        assert_eq!(bdd.top_cofactors(g, Level::new(0)), (bdd.zero, bdd.cube([y, Var::new(2)])));
    }

    #[test]
    fn test_new_var_appends() {
        let bdd = Bdd::default();

        bdd.mk_var(2);
        assert_eq!(bdd.num_vars(), 2);
        let v = bdd.new_var();
        assert_eq!(v, Var::new(3));
        assert_eq!(bdd.level(v), Level::new(2));
    }

    #[test]
    fn test_size() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);
        assert_eq!(bdd.size(x), 2);
        assert_eq!(bdd.size(bdd.apply_and(x, y)), 3);
        assert_eq!(bdd.size(bdd.one), 1);
    }

    #[test]
    fn test_function_ownership() {
        let bdd = Bdd::default();
        let other = Bdd::default();

        let f = bdd.function(bdd.mk_var(1));
        assert!(bdd.owns(&f));
        assert!(!other.owns(&f));
        assert_ne!(bdd.id(), other.id());
    }
}
