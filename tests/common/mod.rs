// ==============================================================================
// Shared Test Helpers
// ==============================================================================
//
// Fixture paths, the expected output for the shop fixture, and diagnostic
// rendering.
//
// Each test file that imports this module compiles its own copy, so not every
// item is used in every binary. Suppress the resulting dead_code warnings.
#![allow(dead_code)]

use std::path::PathBuf;

use miette::{GraphicalReportHandler, GraphicalTheme};

pub const FIXTURE_DIR: &str = "tests/fixtures";

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(FIXTURE_DIR).join(name)
}

/// `graphql` output for `shop.json` with no options.
pub const SHOP_GRAPHQL: &str = r#"type AttributesEntry_string_string {
  key: String!
  value: String!
}

type CreateOrder {
  quantity: String!
  note: String
  status: Status!
}

"""A customer order."""
type Order {
  items: [OrderItem]!
  id_or_ref: Order_id_or_ref
}

type OrderItem {
  """Stock keeping unit."""
  sku: String!
  quantity: Int!
  price_micros: String!
  status: Status!
  attributes: AttributesEntry_string_string!
}

union Order_id_or_ref = String | Ref

type Ref {
  code: String!
}

enum Status {
  A
  B
}
"#;

/// `typescript` output for `shop.json` with no options.
pub const SHOP_TYPESCRIPT: &str = r#"/** A customer order. */
export interface Order {
  items?: OrderItem[];
  id_or_ref: string | Ref;
}

export interface AttributesEntry_string_string {
  key: string;
  value: string;
}

export interface OrderItem {
  /** Stock keeping unit. */ sku: string;
  quantity: number;
  price_micros: string;
  status: Status;
  attributes: AttributesEntry_string_string;
}

export interface Ref {
  code: string;
}

export enum Status {
  A = "A",
  B = "B",
}

export interface CreateOrder {
  quantity: string;
  note?: string;
  status: Status;
}
"#;

/// Render a diagnostic to a deterministic string. Uses the non-unicode theme
/// at 80 columns.
pub fn render_diagnostic(report: &miette::Report) -> String {
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::none()).with_width(80);
    let mut buf = String::new();
    handler
        .render_report(&mut buf, report.as_ref())
        .expect("render to String is infallible");
    buf
}
