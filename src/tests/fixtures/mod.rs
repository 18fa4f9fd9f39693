//! Schemas shared by the fixture-driven tests.

use crate::schema::model::SchemaType;

/// Paginated query with nested input object arguments.
pub const QUERY_SCHEMA: &str = include_str!("schema1.graphql");

/// Self-referencing user graph of a code hosting service.
pub const GITHUB_SCHEMA: &str = include_str!("github.graphql");

pub fn query_schema() -> SchemaType {
    SchemaType::parse(QUERY_SCHEMA).expect("valid fixture schema")
}

pub fn github_schema() -> SchemaType {
    SchemaType::parse(GITHUB_SCHEMA).expect("valid fixture schema")
}
