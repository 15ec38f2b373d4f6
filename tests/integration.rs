// ==============================================================================
// Integration Tests: Descriptor Fixtures Through Both Passes
// ==============================================================================
//
// Each test loads JSON fixtures from `tests/fixtures/` with the public loader
// and runs the GraphQL and/or TypeScript pass over the result.

mod common;
use common::{SHOP_GRAPHQL, SHOP_TYPESCRIPT, fixture, render_diagnostic};

use pretty_assertions::assert_eq;
use protoshape::error::ConvertError;
use protoshape::{
    Converter, GraphqlSchemaBuilder, Int64Representation, ProtoNode, ProtoRoot, ScalarMapping,
    graphql_schemas, load_descriptor, load_descriptor_into, typescript_source,
};

fn load(name: &str) -> ProtoRoot {
    load_descriptor(&fixture(name)).unwrap_or_else(|e| panic!("load {name}: {e:?}"))
}

fn joined(schemas: &[String]) -> String {
    format!("{}\n", schemas.join("\n\n"))
}

// ==============================================================================
// End-to-End
// ==============================================================================

#[test]
fn shop_to_graphql() {
    let schemas = Converter::new().graphql(&load("shop.json")).expect("converts");
    assert_eq!(joined(&schemas), SHOP_GRAPHQL);
}

#[test]
fn shop_to_typescript() {
    let output = Converter::new()
        .typescript(&load("shop.json"))
        .expect("converts");
    assert_eq!(output.source, SHOP_TYPESCRIPT);
    assert!(output.warnings.is_empty());
}

#[test]
fn input_types_and_their_maps_get_input_objects() {
    let mut root = load("shop.json");
    // Give the input message a map so the synthesized entry is checked too.
    let json = r#"{ "nested": { "Filter": { "fields": {
        "labels": { "keyType": "string", "type": "int32", "id": 1 }
    } } } }"#;
    protoshape::load_descriptor_str_into(&mut root, json, "filter.json").expect("loads");

    let schemas = Converter::new()
        .select("CreateOrder")
        .select("Filter")
        .input_type("CreateOrder")
        .input_type("Filter")
        .graphql(&root)
        .expect("converts");
    assert_eq!(
        schemas,
        vec![
            "input CreateOrder {\n  quantity: String!\n  note: String\n  status: Status!\n}",
            "input Filter {\n  labels: LabelsInputEntry_string_int32!\n}",
            "input LabelsInputEntry_string_int32 {\n  key: String!\n  value: Int!\n}",
            "enum Status {\n  A\n  B\n}",
        ]
    );
}

#[test]
fn int64_as_number_in_both_outputs() {
    let root = load("shop.json");
    let mut converter = Converter::new();
    converter
        .select("CreateOrder")
        .int64_representation(Int64Representation::Number);

    let schemas = converter.graphql(&root).expect("converts");
    assert!(schemas[0].contains("quantity: Float!"), "{schemas:#?}");

    let output = converter.typescript(&root).expect("converts");
    assert!(output.source.contains("quantity: number;"), "{}", output.source);
}

// ==============================================================================
// Ordering
// ==============================================================================

#[test]
fn permuting_the_list_only_permutes_typescript() {
    let root = load("shop.json");
    let forward: Vec<ProtoNode> = ["Ref", "Status"]
        .iter()
        .map(|n| root.lookup(n).cloned().expect("fixture type"))
        .collect();
    let backward: Vec<ProtoNode> = forward.iter().rev().cloned().collect();

    let gql_forward = graphql_schemas(&root, &forward, ScalarMapping::default()).expect("converts");
    let gql_backward =
        graphql_schemas(&root, &backward, ScalarMapping::default()).expect("converts");
    assert_eq!(gql_forward, gql_backward);

    let ts_forward = typescript_source(&root, &forward, ScalarMapping::default())
        .expect("converts")
        .source;
    let ts_backward = typescript_source(&root, &backward, ScalarMapping::default())
        .expect("converts")
        .source;
    let ref_decl = "export interface Ref {\n  code: string;\n}";
    let status_decl = "export enum Status {\n  A = \"A\",\n  B = \"B\",\n}";
    assert_eq!(ts_forward, format!("{ref_decl}\n\n{status_decl}\n"));
    assert_eq!(ts_backward, format!("{status_decl}\n\n{ref_decl}\n"));
}

// ==============================================================================
// Cycles
// ==============================================================================

#[test]
fn cyclic_graph_to_graphql() {
    let schemas = Converter::new().graphql(&load("graph.json")).expect("converts");
    assert_eq!(
        joined(&schemas),
        "type graph_A {\n  b: graph_B\n}\n\n\
         type graph_B {\n  a: graph_A\n  peers: graph_PeersEntry_int32_graph_A!\n}\n\n\
         type graph_Node {\n  value: String!\n  next: graph_Node\n  children: [graph_Node]!\n}\n\n\
         type graph_PeersEntry_int32_graph_A {\n  key: Int!\n  value: graph_A!\n}\n"
    );
}

#[test]
fn self_reference_names_the_enclosing_type() {
    let root = load("graph.json");
    let list: Vec<ProtoNode> = vec![root.lookup("graph.Node").cloned().expect("fixture type")];
    let mut builder = GraphqlSchemaBuilder::new(&root, &list);
    builder.build().expect("builds");
    let fields = builder.fields("graph.Node").expect("fields build");
    assert_eq!(fields[1].ty.base_name(), "graph_Node");
    assert_eq!(fields[2].ty.to_string(), "[graph_Node]!");
    assert_eq!(builder.registry().len(), 1);
}

#[test]
fn typescript_leaves_unlisted_references_dangling() {
    let output = Converter::new()
        .select("graph.A")
        .typescript(&load("graph.json"))
        .expect("converts");
    assert_eq!(output.source, "export interface A {\n  b?: B;\n}\n");
    assert_eq!(output.warnings.len(), 1);
    let rendered = render_diagnostic(&output.warnings[0]);
    assert!(
        rendered.contains("type `graph.B` is referenced but not declared in the output"),
        "{rendered}"
    );
}

// ==============================================================================
// Multiple Descriptors
// ==============================================================================

#[test]
fn references_across_descriptor_files() {
    let mut root = ProtoRoot::new();
    load_descriptor_into(&mut root, &fixture("multi/common.json")).expect("loads");
    load_descriptor_into(&mut root, &fixture("multi/invoice.json")).expect("loads");

    let schemas = Converter::new()
        .select("billing.Invoice")
        .graphql(&root)
        .expect("converts");
    assert_eq!(
        schemas,
        vec![
            "type billing_Invoice {\n  total: common_Money\n}",
            "type common_Money {\n  currency: String!\n  units: String!\n}",
        ]
    );
}

#[test]
fn loading_the_same_descriptor_twice_is_an_error() {
    let mut root = load("shop.json");
    let err = load_descriptor_into(&mut root, &fixture("shop.json")).unwrap_err();
    assert!(
        err.chain()
            .any(|e| e.to_string().contains("duplicate type name: Order")),
        "{err:?}"
    );
}

// ==============================================================================
// Errors
// ==============================================================================

#[test]
fn unknown_reference_is_fatal_in_both_passes() {
    let root = load("dangling.json");
    let list: Vec<ProtoNode> = root.nodes().cloned().collect();
    let expected = ConvertError::TypeNotFound {
        name: "Reff".to_string(),
        help: Some("did you mean `Ref`?".to_string()),
    };

    let err = graphql_schemas(&root, &list, ScalarMapping::default()).unwrap_err();
    assert_eq!(err, expected);
    let err = typescript_source(&root, &list, ScalarMapping::default()).unwrap_err();
    assert_eq!(err, expected);
}

#[test]
fn unknown_reference_renders_code_and_help() {
    let err = Converter::new().graphql(&load("dangling.json")).unwrap_err();
    let rendered = render_diagnostic(&err);
    assert!(rendered.contains("convert to GraphQL"), "{rendered}");
    assert!(rendered.contains("can't find type `Reff` in the schema"), "{rendered}");
    assert!(rendered.contains("did you mean `Ref`?"), "{rendered}");
}

#[test]
fn syntax_error_points_into_the_file() {
    let err = load_descriptor(&fixture("broken.json")).unwrap_err();
    let rendered = render_diagnostic(&err);
    assert!(rendered.contains("invalid descriptor JSON"), "{rendered}");
    assert!(rendered.contains("broken.json"), "{rendered}");
    assert!(rendered.contains("here"), "{rendered}");
}
