//! Shared helpers for split tree integration tests

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use thiserror::Error;
use trellis_split::{Handle, Node, SplitTree, View};

/// Reference bookkeeping shared by every view handed out by one test
#[derive(Debug, Default)]
pub struct Ledger {
    live: Cell<usize>,
    acquires: Cell<usize>,
    /// Remaining successful acquires before failures start, unlimited if `None`
    budget: Cell<Option<usize>>,
}

impl Ledger {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// A fresh view holding one reference owned by the caller
    pub fn view(self: &Rc<Self>, name: &str) -> CountingView {
        self.live.set(self.live.get() + 1);
        CountingView {
            name: Rc::from(name),
            ledger: Rc::clone(self),
        }
    }

    /// References currently outstanding across all views
    pub fn live(&self) -> usize {
        self.live.get()
    }

    pub fn acquires(&self) -> usize {
        self.acquires.get()
    }

    /// Let the next `n` acquires succeed and fail every one after that
    pub fn fail_after(&self, n: usize) {
        self.budget.set(Some(n));
    }

    pub fn unlimited(&self) {
        self.budget.set(None);
    }
}

#[derive(Error, Debug)]
#[error("acquire budget exhausted")]
pub struct Exhausted;

/// A view that records every acquire and release in its [`Ledger`]
#[derive(Debug)]
pub struct CountingView {
    name: Rc<str>,
    ledger: Rc<Ledger>,
}

impl CountingView {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl View for CountingView {
    type Error = Exhausted;

    fn acquire(&self) -> Result<Self, Exhausted> {
        match self.ledger.budget.get() {
            Some(0) => return Err(Exhausted),
            Some(n) => self.ledger.budget.set(Some(n - 1)),
            None => {}
        }
        self.ledger.acquires.set(self.ledger.acquires.get() + 1);
        self.ledger.live.set(self.ledger.live.get() + 1);
        Ok(Self {
            name: Rc::clone(&self.name),
            ledger: Rc::clone(&self.ledger),
        })
    }

    fn release(self) {
        drop(self);
    }

    fn same_view(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.name, &other.name)
    }

    fn label(&self) -> Option<String> {
        Some(self.name.to_string())
    }
}

impl Drop for CountingView {
    fn drop(&mut self) {
        self.ledger.live.set(self.ledger.live.get() - 1);
    }
}

/// Every handle reachable from the root, in pre-order
pub fn handles<V: View>(tree: &SplitTree<V>) -> Vec<Handle> {
    let mut out = Vec::new();
    if tree.is_empty() {
        return out;
    }
    let mut stack = vec![Handle::ROOT];
    while let Some(handle) = stack.pop() {
        out.push(handle);
        if let Node::Split(split) = tree.node(handle) {
            stack.push(split.right);
            stack.push(split.left);
        }
    }
    out
}

/// Structural invariants every tree version must satisfy
pub fn assert_well_formed<V: View>(tree: &SplitTree<V>) {
    if tree.is_empty() {
        return;
    }

    let mut referenced = HashSet::new();
    for node in tree.nodes() {
        if let Node::Split(split) = node {
            assert!(
                split.ratio > 0.0 && split.ratio < 1.0,
                "ratio {} out of bounds",
                split.ratio
            );
            for child in [split.left, split.right] {
                assert!(child.index() < tree.len(), "child {child} out of range");
                assert_ne!(child, Handle::ROOT, "root referenced as a child");
                assert!(referenced.insert(child), "node {child} has two parents");
            }
        }
    }

    // Every node is reachable exactly once from the root, so no cycles and no orphans
    let reachable = handles(tree);
    assert_eq!(reachable.len(), tree.len());
    let unique: HashSet<_> = reachable.iter().copied().collect();
    assert_eq!(unique.len(), tree.len());
}

/// Leaf names in in-order
pub fn in_order(tree: &SplitTree<CountingView>) -> Vec<String> {
    handles(tree)
        .into_iter()
        .filter_map(|h| tree.node(h).as_leaf().map(|v| v.name().to_string()))
        .collect()
}

pub fn leaf(view: &CountingView) -> SplitTree<CountingView> {
    SplitTree::init(view).unwrap()
}
