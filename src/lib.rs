//! Protobuf reflection graph → GraphQL SDL types and TypeScript declarations.
//!
//! The input is a [`ProtoRoot`] (every type of a loaded schema, by qualified
//! name) plus an ordered list of [`ProtoNode`]s to convert. Two passes are
//! available:
//!
//! - [`GraphqlSchemaBuilder`] converts the list and everything it references
//!   into GraphQL named types. Self- and mutually-referential messages are
//!   handled by deferring field construction. The result is a name-sorted list
//!   of SDL definitions.
//! - [`TypeScriptDeclarationBuilder`] emits one `export interface` or
//!   `export enum` per listed type, in list order.
//!
//! Both synthesize a key/value message for each map field and collapse oneof
//! groups into a single union-typed field.
//!
//! # Loading and converting
//!
//! ```no_run
//! use std::path::Path;
//!
//! use protoshape::{Converter, load_descriptor};
//!
//! let root = load_descriptor(Path::new("schemas/shop.json"))?;
//! let output = Converter::new()
//!     .select("shop.Order")
//!     .typescript(&root)?;
//! for warning in &output.warnings {
//!     eprintln!("{warning:?}");
//! }
//! print!("{}", output.source);
//! # Ok::<(), miette::Report>(())
//! ```
//!
//! # Building the graph by hand
//!
//! ```
//! use protoshape::model::proto::{FieldType, ProtoField, ProtoMessage, ProtoNode, ProtoRoot};
//! use protoshape::{ScalarMapping, graphql_schemas};
//!
//! let list: Vec<ProtoNode> = vec![
//!     ProtoMessage::new("Node")
//!         .field(ProtoField::new("next", FieldType::parse("Node")).optional())
//!         .into(),
//! ];
//! let sdl = graphql_schemas(&ProtoRoot::new(), &list, ScalarMapping::default())?;
//! assert_eq!(sdl, vec!["type Node {\n  next: Node\n}"]);
//! # Ok::<(), protoshape::error::ConvertError>(())
//! ```
//!
//! # Error handling
//!
//! The builders return [`ConvertError`](error::ConvertError). Loading and the
//! [`Converter`] entry points return [`miette::Result`], which renders with
//! source spans when printed with `{:?}`.

pub mod comments;
pub mod converter;
pub mod error;
pub mod graphql;
pub mod map_field;
pub mod model;
pub mod registry;
pub mod scalar;
pub(crate) mod suggest;
pub mod typescript;

pub use comments::{CommentFormatter, JsDocComments};
pub use converter::Converter;
pub use graphql::{GraphqlSchemaBuilder, graphql_schemas};
pub use model::descriptor::{
    load_descriptor, load_descriptor_into, load_descriptor_str, load_descriptor_str_into,
};
pub use model::proto::{ProtoNode, ProtoRoot};
pub use scalar::{Int64Representation, ScalarMapping};
pub use typescript::{TypeScriptDeclarationBuilder, TypeScriptOutput, typescript_source};
