use paramgen::error::ParamError;
use paramgen::param::ParamSet;
use paramgen::store::{ParamStore, SetCall, StoredValue};
use serde_json::json;

fn store() -> ParamStore {
    let params = ParamSet::from_value(json!({
        "steps": {"type": "int", "value": 10},
        "dt": {"type": "float", "value": 0.001},
        "useGPU": {"type": "bool", "value": false},
        "angles": {"type": "Vec2", "value": [0.5, 0.5]},
        "grid": {"type": "IVec3", "value": [1, 2, 3]},
        "labels": {"type": "std::vector<std::string>", "value": ["a", "b"]},
    }))
    .unwrap();
    ParamStore::new(&params)
}

#[test]
fn starts_at_defaults() {
    let store = store();
    assert_eq!(store.len(), 6);
    assert_eq!(store.get(0).unwrap(), &StoredValue::Int(10));
    assert_eq!(store.get(1).unwrap(), &StoredValue::Float(0.001));
    assert_eq!(store.get(3).unwrap(), &StoredValue::Vec(vec![0.5, 0.5]));
    assert_eq!(store.get(4).unwrap(), &StoredValue::IVec(vec![1, 2, 3]));
}

#[test]
fn setters_update_by_code() {
    let mut store = store();
    store.set_int(0, 20).unwrap();
    store.set_float(1, 0.002).unwrap();
    store.set_bool(2, true).unwrap();
    store.set_vec(3, 2, 1, 0.75).unwrap();
    store.set_ivec(4, 3, 0, 9).unwrap();
    store.set_string(5, 1, "z").unwrap();

    let snapshot = serde_json::to_value(store.snapshot()).unwrap();
    assert_eq!(
        snapshot,
        json!({
            "steps": 20,
            "dt": 0.002,
            "useGPU": true,
            "angles": [0.5, 0.75],
            "grid": [9, 2, 3],
            "labels": ["a", "z"],
        })
    );
}

#[test]
fn snapshot_keeps_declaration_order() {
    let keys: Vec<String> = store().snapshot().keys().cloned().collect();
    assert_eq!(keys, vec!["steps", "dt", "useGPU", "angles", "grid", "labels"]);
}

#[test]
fn wrong_setter_is_rejected() {
    let mut store = store();
    let err = store.set_float(0, 1.0).unwrap_err();
    match err {
        ParamError::SetterMismatch { ident, setter, tag, .. } => {
            assert_eq!(ident, "steps");
            assert_eq!(setter, "set_float_param");
            assert_eq!(tag, "int");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.get(0).unwrap(), &StoredValue::Int(10));
}

#[test]
fn bad_codes_and_indices_are_rejected() {
    let mut store = store();
    assert!(matches!(store.set_int(42, 1), Err(ParamError::UnknownCode(42))));
    assert!(matches!(
        store.set_vec(3, 3, 0, 1.0),
        Err(ParamError::DimensionMismatch { expected: 2, actual: 3, .. })
    ));
    assert!(matches!(
        store.set_ivec(4, 3, 3, 1),
        Err(ParamError::IndexOutOfRange { index: 3, len: 3, .. })
    ));
    assert!(matches!(
        store.set_string(5, 2, "x"),
        Err(ParamError::IndexOutOfRange { index: 2, len: 2, .. })
    ));
}

#[test]
fn int_calls_outside_32_bits_do_not_decode() {
    let decoded = serde_json::from_value::<SetCall>(json!({
        "setter": "set_int_param", "code": 0, "value": 1u64 << 40
    }));
    assert!(decoded.is_err());

    let decoded = serde_json::from_value::<SetCall>(json!({
        "setter": "set_ivec_param", "code": 4, "elem_count": 3, "index": 0, "value": 3000000000u64
    }));
    assert!(decoded.is_err());

    let mut store = store();
    store.set_int(0, i32::MAX).unwrap();
    assert_eq!(store.get(0).unwrap(), &StoredValue::Int(i32::MAX));
}

#[test]
fn calls_decode_from_panel_json() {
    let call: SetCall = serde_json::from_value(json!({
        "setter": "set_vec_param", "code": 3, "elem_count": 2, "index": 0, "value": 1
    }))
    .unwrap();
    assert_eq!(
        call,
        SetCall::Vec {
            code: 3,
            elem_count: 2,
            index: 0,
            value: 1.0
        }
    );

    let mut store = store();
    store.apply(call).unwrap();
    assert_eq!(store.get(3).unwrap(), &StoredValue::Vec(vec![1.0, 0.5]));
}
