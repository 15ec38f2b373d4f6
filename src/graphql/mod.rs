//! GraphQL output: the named-type model, the schema builder, and the SDL
//! printer.

pub mod builder;
pub mod sdl;
pub mod types;

pub use builder::{GraphqlSchemaBuilder, graphql_name, graphql_schemas};
