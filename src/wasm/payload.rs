//! Payload and file helpers at the JS boundary
//!
//! Stateless exports backing the upload form: file screening, payload
//! validation, array normalization, and address display. The forbidden
//! property kinds (functions, symbols, Date objects) only exist on this
//! side of the boundary, so the one-level kind check lives here rather than
//! in the core validator.

use js_sys::{Array, Date, Object, Reflect, JSON};
use wasm_bindgen::prelude::*;

use crate::error::ProtectorError;
use crate::records;
use crate::transform::arrays_to_objects;
use crate::upload;
use crate::validate::ValidationError;
use crate::wasm::try_into_js_value::to_js_value;

/// Validate a raw JS payload before protection
///
/// The root must be a plain non-null object; the payload must survive
/// `JSON.stringify` (circular structures throw there); and no direct
/// property value may be a function, a symbol, or a Date object. Nested
/// containers are not scanned for forbidden kinds.
pub fn validate_payload(value: &JsValue) -> Result<(), ValidationError> {
    if value.is_null() || value.is_undefined() || !value.is_object() || Array::is_array(value) {
        return Err(ValidationError::new("Data must be a JSON object"));
    }

    JSON::stringify(value)
        .map_err(|_| ValidationError::new("Data contains non-serializable values"))?;

    let keys = Object::keys(value.unchecked_ref::<Object>());
    for key in keys.iter() {
        let property = Reflect::get(value, &key)
            .map_err(|_| ValidationError::new("Data contains non-serializable values"))?;
        if property.is_function() || property.is_symbol() || property.is_instance_of::<Date>() {
            let name = key.as_string().unwrap_or_default();
            return Err(ValidationError::new(&format!(
                "Property \"{}\" has an unsupported type",
                name
            )));
        }
    }

    Ok(())
}

/// Validate a payload object before handing it to the protect call
#[wasm_bindgen(js_name = validateJsonData)]
pub fn validate_json_data(value: JsValue) -> Result<(), JsValue> {
    validate_payload(&value).map_err(|err| ProtectorError::from(err).into())
}

/// Rewrite arrays into index-keyed objects (the SDK schema has no arrays)
#[wasm_bindgen(js_name = transformArraysToObjects)]
pub fn transform_arrays_to_objects(value: JsValue) -> Result<JsValue, JsValue> {
    let parsed: serde_json::Value = serde_wasm_bindgen::from_value(value)
        .map_err(|err| ProtectorError::Conversion(err.to_string()))?;
    Ok(to_js_value(&arrays_to_objects(&parsed))?)
}

/// Screen a file selection before its content is read (extension and the
/// 1 MiB size ceiling)
#[wasm_bindgen(js_name = checkFile)]
pub fn check_file(file_name: String, size_bytes: f64) -> Result<(), JsValue> {
    upload::check_file(&file_name, size_bytes as u64).map_err(JsValue::from)
}

/// Shorten an address for display ("0x3bc6...7345")
#[wasm_bindgen(js_name = shortAddress)]
pub fn short_address(address: String) -> String {
    records::short_address(&address)
}

// WASM tests - only run in wasm32 target
#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    fn obj_with(key: &str, value: &JsValue) -> JsValue {
        let obj = Object::new();
        Reflect::set(&obj, &JsValue::from_str(key), value).unwrap();
        obj.into()
    }

    #[wasm_bindgen_test]
    fn test_rejects_non_object_roots() {
        assert!(validate_payload(&JsValue::NULL).is_err());
        assert!(validate_payload(&JsValue::from_f64(42.0)).is_err());
        assert!(validate_payload(&JsValue::from_str("a string")).is_err());
        assert!(validate_payload(&Array::new().into()).is_err());
    }

    #[wasm_bindgen_test]
    fn test_accepts_empty_object() {
        assert!(validate_payload(&Object::new().into()).is_ok());
    }

    #[wasm_bindgen_test]
    fn test_rejects_function_property() {
        let payload = obj_with("callback", &js_sys::Function::new_no_args("return 1").into());
        assert!(validate_payload(&payload).is_err());
    }

    #[wasm_bindgen_test]
    fn test_rejects_date_property() {
        let payload = obj_with("when", &Date::new_0().into());
        assert!(validate_payload(&payload).is_err());
    }

    #[wasm_bindgen_test]
    fn test_rejects_circular_payload() {
        let obj = Object::new();
        Reflect::set(&obj, &JsValue::from_str("me"), &obj).unwrap();
        assert!(validate_payload(&obj.into()).is_err());
    }

    #[wasm_bindgen_test]
    fn test_nested_offenders_pass_the_one_level_check() {
        // The kind check deliberately inspects direct properties only
        let inner = obj_with("callback", &js_sys::Function::new_no_args("return 1").into());
        let payload = obj_with("nested", &inner);
        // JSON.stringify drops functions silently, so this passes
        assert!(validate_payload(&payload).is_ok());
    }

    #[wasm_bindgen_test]
    fn test_transform_binding_rewrites_arrays() {
        let value = serde_wasm_bindgen::to_value(&serde_json::json!({"tags": ["a", "b"]})).unwrap();
        let out = transform_arrays_to_objects(value).unwrap();
        let tags = Reflect::get(&out, &JsValue::from_str("tags")).unwrap();
        assert!(!Array::is_array(&tags));
        let first = Reflect::get(&tags, &JsValue::from_str("0")).unwrap();
        assert_eq!(first.as_string().unwrap(), "a");
    }

    #[wasm_bindgen_test]
    fn test_check_file_screens_size() {
        assert!(check_file("data.json".to_string(), 1_048_577.0).is_err());
        assert!(check_file("data.json".to_string(), 1_048_576.0).is_ok());
        assert!(check_file("data.txt".to_string(), 10.0).is_err());
    }
}
