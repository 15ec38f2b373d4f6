// ==============================================================================
// Map Field Synthesis
// ==============================================================================
//
// A map field is converted as a two-field message with `key` and `value`
// fields. The message name is derived from the field's path without the
// owning message, plus the key kind and the value type. Named value types
// contribute their whole qualified name with dots turned into underscores:
//
//     shop.Order.labels : map<string, int32>     →  shop.LabelsEntry_string_int32
//     shop.Order.items  : map<string, .a.Item>   →  shop.ItemsEntry_string_a_Item
//
// Dropping the owning message makes sibling messages with an identical map
// field share one synthesized type; keeping the key and value types in the
// name keeps same-named maps of different types apart. Input messages get a
// distinct name because GraphQL input objects cannot reference output types.

use crate::model::proto::{FieldType, ProtoField, ProtoMessage, parent_scope};

/// Convert a snake_case or camelCase field name to PascalCase.
pub(crate) fn pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for c in name.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// The qualified name of the entry message synthesized for `field` inside
/// `enclosing`. `None` if the field is not a map field.
pub fn map_message_name(enclosing: &ProtoMessage, field: &ProtoField) -> Option<String> {
    let key = field.map_key?;
    let input = if enclosing.is_input { "Input" } else { "" };
    let value = match &field.field_type {
        FieldType::Scalar(kind) => kind.as_str().to_string(),
        FieldType::Named(name) => name.trim_start_matches('.').replace('.', "_"),
    };
    let simple = format!("{}{input}Entry_{key}_{value}", pascal_case(&field.name));
    let scope = parent_scope(&enclosing.name);
    Some(if scope.is_empty() {
        simple
    } else {
        format!("{scope}.{simple}")
    })
}

/// Manufacture the entry message for a map field: a required `key` of the
/// map's key kind and a required `value` of the map's value type.
pub fn synthesize_map_message(enclosing: &ProtoMessage, field: &ProtoField) -> Option<ProtoMessage> {
    let name = map_message_name(enclosing, field)?;
    let key = field.map_key?;
    let mut message = ProtoMessage::new(name)
        .field(ProtoField::new("key", FieldType::Scalar(key)))
        .field(ProtoField::new("value", field.field_type.clone()));
    message.is_input = enclosing.is_input;
    Some(message)
}
