//! Conversions between host values and template values.
//!
//! Host values go in through serde; tagged YAML values therefore show up in
//! templates as a one-entry mapping keyed by the tag (`{"!tag": value}`).

use crate::error::Result;
use crate::namespace::Value;
use minijinja::value::{Value as TemplateValue, ValueKind};
use std::collections::BTreeMap;

pub fn to_template_value(value: &Value) -> TemplateValue {
    TemplateValue::from_serialize(value)
}

/// Convert a value produced by a template back into a host value.
///
/// Returns `None` for values that have no data representation: undefined
/// values, macros, imported modules and other engine objects, or containers
/// holding any of those.
pub fn from_template_value(value: &TemplateValue) -> Result<Option<Value>> {
    if !is_data(value) {
        return Ok(None);
    }
    Ok(Some(serde_yaml::to_value(value)?))
}

/// Whether `value` is plain data all the way down.
///
/// Macros and modules report themselves as maps, so a map only counts when
/// it is the engine's own dictionary type.
fn is_data(value: &TemplateValue) -> bool {
    match value.kind() {
        ValueKind::Undefined | ValueKind::Plain | ValueKind::Invalid => false,
        ValueKind::Map => value
            .downcast_object_ref::<BTreeMap<TemplateValue, TemplateValue>>()
            .is_some_and(|map| map.values().all(is_data)),
        ValueKind::Seq => value
            .try_iter()
            .is_ok_and(|mut items| items.all(|item| is_data(&item))),
        _ => true,
    }
}
