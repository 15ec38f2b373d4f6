// ==============================================================================
// Library API: The `Converter` Builder
// ==============================================================================
//
// Ties the pieces together for callers that start from a loaded `ProtoRoot`:
// pick the types to convert, mark which messages are GraphQL input objects,
// choose the scalar table, then run either pass.
//
// Configuration methods take `&mut self` and return `&mut Self`, so the same
// converter can be reused across roots. Each terminal call builds a fresh
// registry; nothing carries over between calls.

use miette::Context;

use crate::error::ConvertError;
use crate::graphql::graphql_schemas;
use crate::model::proto::{ProtoNode, ProtoRoot};
use crate::scalar::{Int64Representation, ScalarMapping};
use crate::suggest::suggest_similar_name;
use crate::typescript::{TypeScriptOutput, typescript_source};

/// Builder for converting a [`ProtoRoot`] into GraphQL SDL or TypeScript.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use protoshape::{Converter, load_descriptor};
///
/// let root = load_descriptor(Path::new("shop.json"))?;
/// let schemas = Converter::new()
///     .input_type("shop.CreateOrder")
///     .graphql(&root)?;
/// for sdl in schemas {
///     println!("{sdl}\n");
/// }
/// # Ok::<(), miette::Report>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Converter {
    selected: Vec<String>,
    inputs: Vec<String>,
    int64: Int64Representation,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict conversion to the named type. May be called multiple times;
    /// the list keeps call order. With no selection every type of the root is
    /// converted, in declaration order.
    pub fn select(&mut self, qualified: impl Into<String>) -> &mut Self {
        self.selected.push(qualified.into());
        self
    }

    /// Mark a message as a GraphQL input type.
    pub fn input_type(&mut self, qualified: impl Into<String>) -> &mut Self {
        self.inputs.push(qualified.into());
        self
    }

    pub fn int64_representation(&mut self, repr: Int64Representation) -> &mut Self {
        self.int64 = repr;
        self
    }

    pub fn scalars(&self) -> ScalarMapping {
        ScalarMapping::new(self.int64)
    }

    /// Apply the input marks to a copy of `root` and collect the node list to
    /// convert from it.
    pub fn prepare(&self, root: &ProtoRoot) -> Result<(ProtoRoot, Vec<ProtoNode>), ConvertError> {
        let mut root = root.clone();
        for name in &self.inputs {
            match root.lookup_mut(name) {
                Some(ProtoNode::Message(message)) => message.is_input = true,
                // Enums are valid in both positions.
                Some(ProtoNode::Enum(_)) => {}
                None => return Err(not_found(&root, name)),
            }
        }

        let nodes = if self.selected.is_empty() {
            root.nodes().cloned().collect()
        } else {
            self.selected
                .iter()
                .map(|name| root.lookup(name).cloned().ok_or_else(|| not_found(&root, name)))
                .collect::<Result<Vec<_>, _>>()?
        };
        Ok((root, nodes))
    }

    /// Run the GraphQL pass: SDL definitions for every reachable type, sorted
    /// by name.
    pub fn graphql(&self, root: &ProtoRoot) -> miette::Result<Vec<String>> {
        let (root, nodes) = self.prepare(root).map_err(miette::Report::new)?;
        graphql_schemas(&root, &nodes, self.scalars())
            .map_err(miette::Report::new)
            .context("convert to GraphQL")
    }

    /// Run the TypeScript pass: declarations for the selected types, in
    /// order, plus any warnings.
    pub fn typescript(&self, root: &ProtoRoot) -> miette::Result<TypeScriptOutput> {
        let (root, nodes) = self.prepare(root).map_err(miette::Report::new)?;
        typescript_source(&root, &nodes, self.scalars())
            .map_err(miette::Report::new)
            .context("convert to TypeScript")
    }
}

fn not_found(root: &ProtoRoot, name: &str) -> ConvertError {
    ConvertError::TypeNotFound {
        name: name.trim_start_matches('.').to_string(),
        help: suggest_similar_name(name, root.names()),
    }
}
