/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The causal_model Authors and Contributors. All Rights Reserved.
 */

use std::collections::{HashMap, HashSet};

use crate::errors::PreconditionError;
use crate::variable::Variable;

/// A directed graph over `Variable` nodes, used both as the structural
/// backbone of a `CausalModel` and as the object d-separation and the
/// identification engine query directly.
#[derive(Debug, Clone, Default)]
pub struct CausalGraph {
    nodes: Vec<Variable>,
    edges: HashSet<(Variable, Variable)>,
}

impl CausalGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, v: Variable) {
        if !self.nodes.contains(&v) {
            self.nodes.push(v);
        }
    }

    pub fn add_edge(&mut self, from: Variable, to: Variable) {
        self.add_node(from.clone());
        self.add_node(to.clone());
        self.edges.insert((from, to));
    }

    pub fn remove_node(&mut self, v: &Variable) {
        self.nodes.retain(|n| n != v);
        self.edges.retain(|(a, b)| a != v && b != v);
    }

    pub fn remove_edge(&mut self, from: &Variable, to: &Variable) {
        self.edges.remove(&(from.clone(), to.clone()));
    }

    pub fn nodes(&self) -> &[Variable] {
        &self.nodes
    }

    pub fn has_edge(&self, from: &Variable, to: &Variable) -> bool {
        self.edges.contains(&(from.clone(), to.clone()))
    }

    pub fn edges(&self) -> impl Iterator<Item = &(Variable, Variable)> {
        self.edges.iter()
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn parents(&self, x: &Variable) -> Vec<Variable> {
        self.edges
            .iter()
            .filter(|(_, to)| to == x)
            .map(|(from, _)| from.clone())
            .collect()
    }

    pub fn children(&self, x: &Variable) -> Vec<Variable> {
        self.edges
            .iter()
            .filter(|(from, _)| from == x)
            .map(|(_, to)| to.clone())
            .collect()
    }

    fn closure(&self, seed: &Variable, step: impl Fn(&Self, &Variable) -> Vec<Variable>) -> HashSet<Variable> {
        let mut visited: HashSet<Variable> = HashSet::new();
        visited.insert(seed.clone());
        let mut frontier = vec![seed.clone()];
        while let Some(v) = frontier.pop() {
            for n in step(self, &v) {
                if visited.insert(n.clone()) {
                    frontier.push(n);
                }
            }
        }
        visited
    }

    /// Ancestors of `x`, inclusive of `x` itself.
    pub fn ancestors(&self, x: &Variable) -> HashSet<Variable> {
        self.closure(x, |g, v| g.parents(v))
    }

    /// Descendants of `x`, inclusive of `x` itself.
    pub fn descendants(&self, x: &Variable) -> HashSet<Variable> {
        self.closure(x, |g, v| g.children(v))
    }

    pub fn neighbors(&self, x: &Variable) -> HashSet<Variable> {
        let mut out: HashSet<Variable> = self.parents(x).into_iter().collect();
        out.extend(self.children(x));
        out
    }

    /// Nodes adjacent to some member of `xs` via a pair of anti-parallel
    /// edges (`x -> y` and `y -> x` both present).
    pub fn undirected_neighbors(&self, xs: &[Variable]) -> HashSet<Variable> {
        let mut out = HashSet::new();
        for x in xs {
            for y in &self.nodes {
                if self.has_edge(x, y) && self.has_edge(y, x) {
                    out.insert(y.clone());
                }
            }
        }
        out
    }

    pub fn is_collider(&self, x: &Variable, y: &Variable, z: &Variable) -> bool {
        self.has_edge(x, y) && self.has_edge(z, y)
    }

    pub fn is_chain(&self, x: &Variable, y: &Variable, z: &Variable) -> bool {
        (self.has_edge(x, y) && self.has_edge(y, z)) || (self.has_edge(z, y) && self.has_edge(y, x))
    }

    pub fn is_fork(&self, x: &Variable, y: &Variable, z: &Variable) -> bool {
        self.has_edge(y, x) && self.has_edge(y, z)
    }

    /// Kahn's algorithm, breaking ties by `Variable`'s string order so the
    /// elimination order used by `CausalModel::probability` is deterministic.
    pub fn topological_sort(&self) -> Result<Vec<Variable>, PreconditionError> {
        let mut indegree: HashMap<Variable, usize> = self.nodes.iter().map(|n| (n.clone(), 0)).collect();
        for (_, to) in &self.edges {
            *indegree.entry(to.clone()).or_insert(0) += 1;
        }
        let mut ready: Vec<Variable> = indegree
            .iter()
            .filter(|&(_, &d)| d == 0)
            .map(|(n, _)| n.clone())
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while !ready.is_empty() {
            ready.sort();
            let next = ready.remove(0);
            order.push(next.clone());
            for child in self.children(&next) {
                let d = indegree.get_mut(&child).expect("child is a graph node");
                *d -= 1;
                if *d == 0 {
                    ready.push(child);
                }
            }
        }

        if order.len() != self.nodes.len() {
            return Err(PreconditionError::GraphNotAcyclic);
        }
        Ok(order)
    }

    /// Copy with every edge duplicated in the reverse direction — the
    /// skeleton used to enumerate undirected paths for d-separation.
    pub fn undirected(&self) -> Self {
        let mut g = self.clone();
        for (a, b) in self.edges.clone() {
            g.edges.insert((b, a));
        }
        g
    }

    /// Copy containing every ordered pair of distinct nodes as an edge.
    pub fn complete(&self) -> Self {
        let mut g = Self {
            nodes: self.nodes.clone(),
            edges: HashSet::new(),
        };
        for a in &self.nodes {
            for b in &self.nodes {
                if a != b {
                    g.edges.insert((a.clone(), b.clone()));
                }
            }
        }
        g
    }

    /// Copy with every edge *into* a node of `xs` deleted.
    pub fn remove_into(&self, xs: &[Variable]) -> Self {
        let mut g = self.clone();
        g.edges.retain(|(_, to)| !xs.contains(to));
        g
    }

    /// Copy with every edge *out of* a node of `xs` deleted.
    pub fn remove_out_of(&self, xs: &[Variable]) -> Self {
        let mut g = self.clone();
        g.edges.retain(|(from, _)| !xs.contains(from));
        g
    }

    fn skeleton_adjacency(&self) -> HashMap<Variable, Vec<Variable>> {
        let mut adj: HashMap<Variable, Vec<Variable>> = self.nodes.iter().map(|n| (n.clone(), Vec::new())).collect();
        for (a, b) in &self.edges {
            adj.get_mut(a).expect("node").push(b.clone());
            adj.get_mut(b).expect("node").push(a.clone());
        }
        adj
    }

    fn simple_paths(&self, start: &Variable, end: &Variable, adj: &HashMap<Variable, Vec<Variable>>) -> Vec<Vec<Variable>> {
        let mut results = Vec::new();
        let mut visited: HashSet<Variable> = HashSet::new();
        visited.insert(start.clone());
        let mut path = vec![start.clone()];
        self.dfs_paths(end, adj, &mut visited, &mut path, &mut results);
        results
    }

    fn dfs_paths(
        &self,
        end: &Variable,
        adj: &HashMap<Variable, Vec<Variable>>,
        visited: &mut HashSet<Variable>,
        path: &mut Vec<Variable>,
        results: &mut Vec<Vec<Variable>>,
    ) {
        let current = path.last().expect("path always has a head").clone();
        if &current == end {
            results.push(path.clone());
            return;
        }
        if let Some(neighbors) = adj.get(&current) {
            for n in neighbors.clone() {
                if visited.insert(n.clone()) {
                    path.push(n.clone());
                    self.dfs_paths(end, adj, visited, path, results);
                    path.pop();
                    visited.remove(&n);
                }
            }
        }
    }

    fn path_blocked(&self, path: &[Variable], z: &HashSet<Variable>) -> bool {
        for i in 1..path.len().saturating_sub(1) {
            let (a, b, c) = (&path[i - 1], &path[i], &path[i + 1]);
            if self.is_collider(a, b, c) {
                if self.descendants(b).is_disjoint(z) {
                    return true;
                }
            } else if z.contains(b) {
                return true;
            }
        }
        false
    }

    /// True iff every simple undirected path between a node of `x` and a
    /// node of `y` is blocked by `z`. Requires the graph to be acyclic.
    pub fn is_d_separated(&self, x: &[Variable], y: &[Variable], z: &[Variable]) -> Result<bool, PreconditionError> {
        self.topological_sort()?;
        let adj = self.skeleton_adjacency();
        let z_set: HashSet<Variable> = z.iter().cloned().collect();
        for xi in x {
            for yi in y {
                for path in self.simple_paths(xi, yi, &adj) {
                    if path.len() > 1 && !self.path_blocked(&path, &z_set) {
                        return Ok(false);
                    }
                }
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str) -> Variable {
        Variable::boolean(name)
    }

    #[test]
    fn chain_d_separation_s3() {
        let (x, w, y) = (v("X"), v("W"), v("Y"));
        let mut g = CausalGraph::new();
        g.add_edge(x.clone(), w.clone());
        g.add_edge(w.clone(), y.clone());

        assert!(!g.is_d_separated(&[x.clone()], &[y.clone()], &[]).unwrap());
        assert!(g.is_d_separated(&[x], &[y], &[w]).unwrap());
    }

    #[test]
    fn fork_d_separation_s4() {
        let (x, y, z, w) = (v("X"), v("Y"), v("Z"), v("W"));
        let mut g = CausalGraph::new();
        g.add_edge(w.clone(), y.clone());
        g.add_edge(w.clone(), x.clone());
        g.add_edge(x.clone(), z.clone());

        assert!(g.is_d_separated(&[z.clone()], &[y.clone()], &[w.clone()]).unwrap());
        assert!(g.is_d_separated(&[z], &[y], &[x]).unwrap());
    }

    #[test]
    fn acyclicity_guard_s6() {
        let (a, b) = (v("A"), v("B"));
        let mut g = CausalGraph::new();
        g.add_edge(a.clone(), b.clone());
        g.add_edge(b, a);

        assert!(matches!(
            g.is_d_separated(&[], &[], &[]),
            Err(PreconditionError::GraphNotAcyclic)
        ));
    }

    #[test]
    fn ancestor_descendant_duality() {
        let (x, w, y) = (v("X"), v("W"), v("Y"));
        let mut g = CausalGraph::new();
        g.add_edge(x.clone(), w.clone());
        g.add_edge(w.clone(), y.clone());

        assert!(g.ancestors(&y).contains(&x));
        assert!(g.descendants(&x).contains(&y));
    }

    #[test]
    fn d_separation_is_symmetric() {
        let (x, w, y) = (v("X"), v("W"), v("Y"));
        let mut g = CausalGraph::new();
        g.add_edge(x.clone(), w.clone());
        g.add_edge(w.clone(), y.clone());

        let fwd = g.is_d_separated(&[x.clone()], &[y.clone()], &[]).unwrap();
        let bwd = g.is_d_separated(&[y], &[x], &[]).unwrap();
        assert_eq!(fwd, bwd);
    }
}
