use std::collections::{HashMap, HashSet};

use crate::entry::{DirVisit, FileVisit};
use crate::path::RelativePath;
use crate::visitor::{RunContext, TreeVisitor, VisitSpec};

/// A [`TreeVisitor`] that cleans up the event stream as it passes through.
/// Drops duplicate and childless directories, and fills in directories the
/// producer implied but never supplied, so the downstream visitor sees each
/// directory exactly once and always before its descendants.
///
/// State is scoped to one run and cleared at `end_run`; an instance can be
/// reused for subsequent runs. Concurrent runs need independent instances.
pub struct NormalizingVisitor<V: TreeVisitor> {
    downstream: V,
    visited: HashSet<RelativePath>,
    pending: HashMap<RelativePath, DirVisit>,
}

impl<V: TreeVisitor> NormalizingVisitor<V> {
    pub fn new(downstream: V) -> Self {
        Self {
            downstream,
            visited: HashSet::new(),
            pending: HashMap::new(),
        }
    }

    pub fn downstream(&self) -> &V {
        &self.downstream
    }

    pub fn into_inner(self) -> V {
        self.downstream
    }

    // Forward every unvisited ancestor of `path`, including `path` itself,
    // outermost first. The chain is collected bottom-up and replayed
    // top-down; iterative so deeply nested paths cannot exhaust the call
    // stack. The tree root never passes through here.
    fn resolve(&mut self, path: &RelativePath) {
        let mut chain: Vec<RelativePath> = Vec::new();
        let mut current = path.clone();

        loop {
            let Some(parent) = current.parent() else {
                break;
            };
            if self.visited.contains(&current) {
                break;
            }
            chain.push(current);
            current = parent;
        }

        for dir_path in chain.into_iter().rev() {
            let dir = self.pending.remove(&dir_path).unwrap_or_else(|| {
                log::debug!("synthesizing directory {dir_path}");
                DirVisit::synthesized(dir_path.clone())
            });
            self.visited.insert(dir_path);
            self.downstream.visit_dir(dir);
        }
    }
}

impl<V: TreeVisitor> TreeVisitor for NormalizingVisitor<V> {
    fn start_run(&mut self, context: &RunContext) {
        self.downstream.start_run(context);
    }

    fn visit_file(&mut self, file: FileVisit) {
        debug_assert!(file.path().is_file());
        if let Some(parent) = file.path().parent() {
            self.resolve(&parent);
        }
        self.downstream.visit_file(file);
    }

    fn visit_dir(&mut self, dir: DirVisit) {
        let path = dir.path();
        if self.visited.contains(path) {
            // Already forwarded via ancestor resolution; drop the duplicate
            return;
        }
        // Buffer without forwarding. The entry goes downstream only once a
        // descendant visit materializes it.
        self.pending.insert(path.clone(), dir);
    }

    fn spec_change(&mut self, spec: &VisitSpec) {
        self.downstream.spec_change(spec);
    }

    fn end_run(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("discarding {} never-materialized directories", self.pending.len());
        }
        self.visited.clear();
        self.pending.clear();
        self.downstream.end_run();
    }

    fn did_work(&self) -> bool {
        self.downstream.did_work()
    }
}
