//! Memoized per-declaration computations for consumers of the finished
//! package group.
//!
//! A backend defines an [`Analysis`] (for example mangled names or layout
//! info) and asks the [`AnalysisManager`] for it. Each `(analysis,
//! declaration)` pair is computed at most once. Analyses may ask the
//! manager for other declarations while computing; this terminates because
//! the semantic passes reject inclusion cycles.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::trace;

use crate::base::DeclId;
use crate::ir::{DeclKind, PackageGroup};

/// A derived fact about one declaration.
pub trait Analysis: Any + Sized {
    fn compute(pg: &PackageGroup, decl: DeclId, am: &AnalysisManager) -> Self;
}

/// Cache of analysis results keyed by analysis type and declaration.
#[derive(Default)]
pub struct AnalysisManager {
    cache: RefCell<FxHashMap<(TypeId, DeclId), Rc<dyn Any>>>,
}

impl AnalysisManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The result of `A` for `decl`, computing it on first request.
    pub fn get<A: Analysis>(&self, pg: &PackageGroup, decl: DeclId) -> Rc<A> {
        let key = (TypeId::of::<A>(), decl);
        if let Some(cached) = self.lookup::<A>(&key) {
            return cached;
        }
        // No borrow is held here: `compute` may call back into `get`.
        let value = Rc::new(A::compute(pg, decl, self));
        trace!(analysis = std::any::type_name::<A>(), %decl, "computed analysis");
        self.cache
            .borrow_mut()
            .insert(key, Rc::clone(&value) as Rc<dyn Any>);
        value
    }

    fn lookup<A: Analysis>(&self, key: &(TypeId, DeclId)) -> Option<Rc<A>> {
        let cached = Rc::clone(self.cache.borrow().get(key)?);
        cached.downcast::<A>().ok()
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }

    /// Drop every cached result.
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }
}

impl std::fmt::Debug for AnalysisManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisManager")
            .field("cached", &self.len())
            .finish()
    }
}

/// The dotted path of a declaration: package segments followed by the names
/// of its enclosing declarations and its own name.
///
/// Type references and interface parents have no name and share the path
/// of their holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclPath {
    pub segments: Vec<SmolStr>,
}

impl DeclPath {
    pub fn join(&self, separator: &str) -> String {
        self.segments
            .iter()
            .map(SmolStr::as_str)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl Analysis for DeclPath {
    fn compute(pg: &PackageGroup, decl: DeclId, am: &AnalysisManager) -> Self {
        if let DeclKind::Package(pkg) = pg.kind(decl) {
            return DeclPath {
                segments: pkg.segments().map(SmolStr::new).collect(),
            };
        }
        let mut segments = match pg.node(decl).parent {
            Some(parent) => am.get::<DeclPath>(pg, parent).segments.clone(),
            None => Vec::new(),
        };
        if let Some(name) = pg.node(decl).name() {
            segments.push(name.clone());
        }
        DeclPath { segments }
    }
}
