//! Per-call traversal state.

use std::collections::HashSet;

use crate::error::SerializeError;
use crate::schema::{PropertyDeclaration, SchemaRegistry};
use crate::sink::TextSink;
use crate::value::{Graph, Identifier, Value};

use super::options::SerializeOptions;

/// State owned by exactly one serialize call.
///
/// The seen-set starts empty, only grows, and is dropped with the context.
/// The stack holds the identifiers of the objects currently being inlined,
/// outermost first.
pub(crate) struct SerializationContext<'a, S: TextSink + ?Sized> {
    pub(crate) graph: &'a Graph,
    pub(crate) schema: &'a dyn SchemaRegistry,
    pub(crate) options: &'a SerializeOptions,
    pub(crate) sink: &'a mut S,
    seen: HashSet<String>,
    stack: Vec<String>,
}

impl<'a, S: TextSink + ?Sized> SerializationContext<'a, S> {
    pub(crate) fn new(
        graph: &'a Graph,
        schema: &'a dyn SchemaRegistry,
        options: &'a SerializeOptions,
        sink: &'a mut S,
    ) -> Self {
        SerializationContext {
            graph,
            schema,
            options,
            sink,
            seen: HashSet::new(),
            stack: Vec::new(),
        }
    }

    pub(crate) fn is_seen(&self, fully_qualified: &str) -> bool {
        self.seen.contains(fully_qualified)
    }

    /// Returns false if the identifier was already present.
    pub(crate) fn mark_seen(&mut self, fully_qualified: String) -> bool {
        self.seen.insert(fully_qualified)
    }

    pub(crate) fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Push an object onto the traversal stack, enforcing `max_depth`.
    pub(crate) fn enter(&mut self, identifier: &Identifier) -> Result<(), SerializeError> {
        let fqi = identifier.fully_qualified();
        if self.stack.len() >= self.options.max_depth {
            let mut path = self.path();
            if !path.is_empty() {
                path.push_str(" > ");
            }
            path.push_str(&fqi);
            return Err(SerializeError::DepthExceeded {
                limit: self.options.max_depth,
                path,
            });
        }
        self.stack.push(fqi);
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.stack.pop();
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The object currently being inlined.
    pub(crate) fn current(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    pub(crate) fn path(&self) -> String {
        self.stack.join(" > ")
    }

    /// Build an `UnrecognisedValue` error naming the property by its owner.
    pub(crate) fn unrecognised(&self, property: &PropertyDeclaration, value: &Value) -> SerializeError {
        SerializeError::UnrecognisedValue {
            property: self.qualify(&property.name),
            found: value.describe(self.graph),
        }
    }

    /// `owner.property` when inside an object, otherwise the bare name.
    pub(crate) fn qualify(&self, property: &str) -> String {
        match self.current() {
            Some(owner) => format!("{}.{}", owner, property),
            None => property.to_string(),
        }
    }
}
