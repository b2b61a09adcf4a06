//! The reference-counting contract a split tree needs from its pane views

use std::convert::Infallible;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// A reference-counted handle to a pane's content.
///
/// The tree never looks inside a view. It holds exactly one logical
/// reference per leaf: it calls [`View::acquire`] whenever a leaf is copied
/// into a new tree version and [`View::release`] when a version is dropped.
pub trait View: Sized {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Take out one more reference to the same underlying view
    fn acquire(&self) -> Result<Self, Self::Error>;

    /// Give back one reference
    fn release(self);

    /// Whether both handles refer to the same underlying view
    fn same_view(&self, other: &Self) -> bool;

    /// Short label used when rendering diagrams
    fn label(&self) -> Option<String> {
        None
    }
}

impl<T: ?Sized + fmt::Display> View for Rc<T> {
    type Error = Infallible;

    fn acquire(&self) -> Result<Self, Infallible> {
        Ok(Rc::clone(self))
    }

    fn release(self) {
        drop(self);
    }

    fn same_view(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }

    fn label(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl<T: ?Sized + fmt::Display> View for Arc<T> {
    type Error = Infallible;

    fn acquire(&self) -> Result<Self, Infallible> {
        Ok(Arc::clone(self))
    }

    fn release(self) {
        drop(self);
    }

    fn same_view(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }

    fn label(&self) -> Option<String> {
        Some(self.to_string())
    }
}
