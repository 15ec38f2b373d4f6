//! The protobuf reflection graph consumed by the builders, and the loader
//! that builds it from protobuf.js JSON descriptors.

pub mod descriptor;
pub mod proto;
