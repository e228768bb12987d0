//! Recursive inclusion between type declarations.
//!
//! Struct and union fields include their field types by value, and an
//! interface includes its parents. Any cycle through those edges is an
//! error. Generic and callback types are indirections and form no edge.

use std::collections::hash_map::Entry;
use std::hash::Hash;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::base::DeclId;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticsManager};
use crate::ir::{DeclKind, PackageGroup};

/// A directed graph: node to its outgoing `(label, target)` edges.
/// Node order decides which rotation of a cycle is reported.
pub type Graph<V, E> = IndexMap<V, Vec<(E, V)>>;

/// Every simple cycle of `graph`, each as the list of edge labels along it.
///
/// A cycle is reported once, starting at its lowest node. Edges to nodes
/// missing from the map are ignored.
pub fn detect_cycles<V, E>(graph: &Graph<V, E>) -> Vec<Vec<E>>
where
    V: Hash + Eq,
    E: Clone,
{
    let adjacency: Vec<Vec<(&E, usize)>> = graph
        .values()
        .map(|children| {
            children
                .iter()
                .filter_map(|(edge, child)| Some((edge, graph.get_index_of(child)?)))
                .collect()
        })
        .collect();
    let mut search = CycleSearch {
        visited: vec![false; adjacency.len()],
        adjacency,
        seed: 0,
        path: Vec::new(),
        cycles: Vec::new(),
    };
    for seed in 0..search.adjacency.len() {
        search.seed = seed;
        search.visit(seed);
    }
    search.cycles
}

struct CycleSearch<'g, E> {
    adjacency: Vec<Vec<(&'g E, usize)>>,
    visited: Vec<bool>,
    seed: usize,
    path: Vec<&'g E>,
    cycles: Vec<Vec<E>>,
}

impl<'g, E: Clone> CycleSearch<'g, E> {
    fn visit(&mut self, node: usize) {
        if node < self.seed {
            return;
        }
        if self.visited[node] {
            if node == self.seed {
                self.cycles
                    .push(self.path.iter().map(|edge| (*edge).clone()).collect());
            }
            return;
        }
        self.visited[node] = true;
        for i in 0..self.adjacency[node].len() {
            let (edge, next) = self.adjacency[node][i];
            self.path.push(edge);
            self.visit(next);
            self.path.pop();
        }
        self.visited[node] = false;
    }
}

/// Edge label: the declaration holding the reference and the type
/// reference itself.
pub type InclusionEdge = (DeclId, DeclId);

/// Build the inclusion graph over all type declarations, warning about
/// interfaces that extend the same parent more than once.
pub fn inclusion_graph(
    pg: &PackageGroup,
    dm: &mut DiagnosticsManager,
) -> Graph<DeclId, InclusionEdge> {
    let mut graph = Graph::new();
    for decl in pg.all_decls() {
        let edges = match pg.kind(decl) {
            DeclKind::Enum(_) => Vec::new(),
            DeclKind::Struct(st) => field_edges(pg, decl, &st.fields),
            DeclKind::Union(un) => field_edges(pg, decl, &un.fields),
            DeclKind::Iface(iface) => parent_edges(pg, decl, &iface.parents, dm),
            _ => continue,
        };
        graph.insert(decl, edges);
    }
    graph
}

fn field_edges(
    pg: &PackageGroup,
    decl: DeclId,
    fields: &[DeclId],
) -> Vec<(InclusionEdge, DeclId)> {
    fields
        .iter()
        .filter_map(|&field| {
            let ty_ref = pg.kind(field).ty_ref()?;
            let target = pg.resolved_type(ty_ref)?.as_user()?.decl;
            Some(((decl, ty_ref), target))
        })
        .collect()
}

fn parent_edges(
    pg: &PackageGroup,
    decl: DeclId,
    parents: &[DeclId],
    dm: &mut DiagnosticsManager,
) -> Vec<(InclusionEdge, DeclId)> {
    let mut edges = Vec::new();
    let mut first_extend: FxHashMap<DeclId, DeclId> = FxHashMap::default();
    for &parent in parents {
        let Some(ty_ref) = pg.kind(parent).ty_ref() else {
            continue;
        };
        let Some(target) = pg
            .resolved_type(ty_ref)
            .and_then(|ty| ty.as_iface())
            .map(|user| user.decl)
        else {
            continue;
        };
        edges.push(((decl, ty_ref), target));
        match first_extend.entry(target) {
            Entry::Vacant(entry) => {
                entry.insert(parent);
            }
            Entry::Occupied(prev) => {
                let diag = Diagnostic::new(
                    DiagnosticKind::DuplicateExtends {
                        parent: pg.description(target),
                        iface: pg.description(decl),
                    },
                    pg.node(parent).loc.clone(),
                )
                .with_note(pg.node(*prev.get()).loc.clone(), "previously extended here");
                dm.emit(diag);
            }
        }
    }
    edges
}

/// Report every inclusion cycle.
///
/// The error sits on the last edge of the cycle; each other edge becomes a
/// "referenced by" note, walking the cycle backwards.
pub fn check_recursive_inclusion(pg: &PackageGroup, dm: &mut DiagnosticsManager) {
    let graph = inclusion_graph(pg, dm);
    let cycles = detect_cycles(&graph);
    debug!(nodes = graph.len(), cycles = cycles.len(), "inclusion graph");
    for cycle in cycles {
        let mut edges = cycle.into_iter().rev();
        let Some((last_decl, last_ref)) = edges.next() else {
            continue;
        };
        let mut diag = Diagnostic::new(
            DiagnosticKind::RecursiveReference {
                decl: pg.description(last_decl),
            },
            pg.node(last_ref).loc.clone(),
        );
        for (decl, ty_ref) in edges {
            diag = diag.with_note(
                pg.node(ty_ref).loc.clone(),
                format!("referenced by {}", pg.description(decl)),
            );
        }
        dm.emit(diag);
    }
}
