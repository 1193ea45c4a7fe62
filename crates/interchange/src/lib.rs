//! graphtext-interchange: JSON model and graph documents.
//!
//! Provides typed structs for model documents (namespaces of type
//! declarations) and two entry points:
//!
//! - [`from_model_json()`] builds a [`ModelRegistry`](graphtext_core::ModelRegistry)
//! - [`from_graph_json()`] builds a [`Graph`](graphtext_core::Graph) arena,
//!   resolving `$resource` links between listed resources in a second pass
//!   so documents may describe cyclic graphs.
//!
//! File-based wrappers [`load_model()`] and [`load_graph()`] read and parse
//! in one step.

pub mod deserialize;
pub mod types;

pub use deserialize::{
    from_graph_json, from_model_json, load_graph, load_model, InterchangeError, LoadedGraph,
};
pub use types::*;
