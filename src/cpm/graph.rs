//! Dependency graph construction and validation.
//!
//! Builds an arena-indexed adjacency structure from flat task and
//! dependency lists and establishes a topological order via Kahn's
//! algorithm. A cycle is fatal: the builder reports every task left
//! with nonzero in-degree, which is exactly the union of all cycles.
//!
//! # Reference
//! Kahn (1962), "Topological sorting of large networks";
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::EngineError;
use crate::models::{Dependency, DependencyKind, Task};

/// A dependency edge as seen from one endpoint.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Edge {
    /// Index of the node at the other end.
    pub other: usize,
    /// Relationship kind.
    pub kind: DependencyKind,
    /// Lag in minutes (negative = lead).
    pub lag_min: i64,
}

/// A validated DAG over a task list.
///
/// Tasks live in an arena indexed by position; edges reference indices,
/// not ids, so the graph holds no cyclic object references. Built fresh
/// per solve and discarded afterwards.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    successors: Vec<Vec<Edge>>,
    predecessors: Vec<Vec<Edge>>,
    topo_order: Vec<usize>,
}

impl TaskGraph {
    /// Builds and validates the graph.
    ///
    /// Fails with [`EngineError::UnknownTask`] when an edge references
    /// a task not in the list, and [`EngineError::CycleDetected`]
    /// (naming every task on a cycle) when the edges do not form a DAG.
    /// A task with no dependencies is a valid root; a task with no
    /// successors is a valid sink.
    pub fn build(tasks: &[Task], dependencies: &[Dependency]) -> Result<Self, EngineError> {
        let ids: Vec<String> = tasks.iter().map(|t| t.id.clone()).collect();
        let index: HashMap<String, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let mut successors: Vec<Vec<Edge>> = vec![Vec::new(); ids.len()];
        let mut predecessors: Vec<Vec<Edge>> = vec![Vec::new(); ids.len()];

        for dep in dependencies {
            let pred = *index
                .get(dep.predecessor_id.as_str())
                .ok_or_else(|| EngineError::UnknownTask {
                    task_id: dep.predecessor_id.clone(),
                })?;
            let succ = *index
                .get(dep.successor_id.as_str())
                .ok_or_else(|| EngineError::UnknownTask {
                    task_id: dep.successor_id.clone(),
                })?;

            successors[pred].push(Edge {
                other: succ,
                kind: dep.kind,
                lag_min: dep.lag_min,
            });
            predecessors[succ].push(Edge {
                other: pred,
                kind: dep.kind,
                lag_min: dep.lag_min,
            });
        }

        let topo_order = kahn_order(&ids, &successors, &predecessors)?;

        Ok(Self {
            ids,
            index,
            successors,
            predecessors,
            topo_order,
        })
    }

    /// Number of tasks.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the graph has no tasks.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Arena index for a task id.
    pub fn index_of(&self, task_id: &str) -> Option<usize> {
        self.index.get(task_id).copied()
    }

    /// Task id at an arena index.
    pub fn id_of(&self, index: usize) -> &str {
        &self.ids[index]
    }

    /// Topological order (roots first).
    pub(crate) fn topo_order(&self) -> &[usize] {
        &self.topo_order
    }

    /// Outgoing edges of a node.
    pub(crate) fn successors(&self, index: usize) -> &[Edge] {
        &self.successors[index]
    }

    /// Incoming edges of a node.
    pub(crate) fn predecessors(&self, index: usize) -> &[Edge] {
        &self.predecessors[index]
    }

    /// Indices of tasks with no successors.
    pub(crate) fn sinks(&self) -> Vec<usize> {
        (0..self.len())
            .filter(|&i| self.successors[i].is_empty())
            .collect()
    }

    /// All nodes reachable from `start` via successor edges,
    /// excluding `start` itself.
    pub(crate) fn reachable_from(&self, start: usize) -> HashSet<usize> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(i) = queue.pop_front() {
            for edge in &self.successors[i] {
                if seen.insert(edge.other) {
                    queue.push_back(edge.other);
                }
            }
        }
        seen.remove(&start);
        seen
    }
}

/// Kahn's algorithm over the adjacency lists.
///
/// Ties are broken by arena index so the order is deterministic for a
/// given input ordering.
fn kahn_order(
    ids: &[String],
    successors: &[Vec<Edge>],
    predecessors: &[Vec<Edge>],
) -> Result<Vec<usize>, EngineError> {
    let mut in_degree: Vec<usize> = predecessors.iter().map(Vec::len).collect();
    let mut queue: VecDeque<usize> = (0..ids.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(ids.len());

    while let Some(i) = queue.pop_front() {
        order.push(i);
        for edge in &successors[i] {
            in_degree[edge.other] -= 1;
            if in_degree[edge.other] == 0 {
                queue.push_back(edge.other);
            }
        }
    }

    if order.len() != ids.len() {
        let mut task_ids: Vec<String> = (0..ids.len())
            .filter(|&i| in_degree[i] > 0)
            .map(|i| ids[i].clone())
            .collect();
        task_ids.sort();
        return Err(EngineError::CycleDetected { task_ids });
    }

    Ok(order)
}
