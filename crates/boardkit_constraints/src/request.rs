//! Binding requests: which resources a build wants, under which signal names.

use serde::Serialize;
use std::fmt;

/// A reference to a resource, or to a sub-signal within one.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct ResourceRef {
    /// Resource name.
    pub name: String,
    /// Resource number; `None` also matches number 0.
    pub number: Option<u32>,
    /// Dot-separated sub-signal path (`"dqs"`, `"uart.tx"`), or `None` for
    /// the whole resource.
    pub subsignal: Option<String>,
}

impl ResourceRef {
    /// References a whole resource.
    pub fn new(name: impl Into<String>, number: Option<u32>) -> Self {
        Self {
            name: name.into(),
            number,
            subsignal: None,
        }
    }

    /// Narrows the reference to a sub-signal path.
    pub fn subsignal(mut self, path: impl Into<String>) -> Self {
        self.subsignal = Some(path.into());
        self
    }

    /// The sub-signal path split into segments; empty for a whole resource.
    pub fn path(&self) -> Vec<&str> {
        match &self.subsignal {
            Some(path) => path.split('.').collect(),
            None => Vec::new(),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(n) = self.number {
            write!(f, "#{n}")?;
        }
        if let Some(sub) = &self.subsignal {
            write!(f, ".{sub}")?;
        }
        Ok(())
    }
}

/// One design signal bound to one resource reference.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Binding {
    /// The logical design-signal name.
    pub signal: String,
    /// What the signal is bound to.
    pub target: ResourceRef,
}

/// An ordered list of bindings.
///
/// Order is significant: records come out in the order bindings were added.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct BindingRequest {
    bindings: Vec<Binding>,
}

impl BindingRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding and returns the request.
    pub fn bind(mut self, signal: impl Into<String>, target: ResourceRef) -> Self {
        self.push(signal, target);
        self
    }

    /// Adds a binding.
    pub fn push(&mut self, signal: impl Into<String>, target: ResourceRef) {
        self.bindings.push(Binding {
            signal: signal.into(),
            target,
        });
    }

    /// The bindings in request order.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if nothing is requested.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, ResourceRef)> for BindingRequest {
    fn from_iter<I: IntoIterator<Item = (S, ResourceRef)>>(iter: I) -> Self {
        let mut request = BindingRequest::new();
        for (signal, target) in iter {
            request.push(signal, target);
        }
        request
    }
}
