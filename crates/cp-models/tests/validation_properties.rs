//! Property tests: validation over arbitrary JSON.

use cp_models::{get_schema, list_schemas, safe_validate, validate, ModelName};
use cp_schema::{check, FieldKind, Shape};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

/// Arbitrary JSON, biased toward mappings whose keys collide with real
/// contract field names so nested shapes actually get exercised.
fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| serde_json::json!(n)),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(|f| serde_json::json!(f)),
        "[a-zA-Z0-9:_ -]{0,24}".prop_map(Value::String),
        Just(Value::String("2024-01-01T00:00:00Z".into())),
        Just(Value::String("healthy".into())),
    ];
    let key = prop_oneof![
        Just("id".to_string()),
        Just("type".to_string()),
        Just("status".to_string()),
        Just("payload".to_string()),
        Just("metadata".to_string()),
        Just("items".to_string()),
        "[a-z]{1,8}",
    ];
    leaf.prop_recursive(4, 64, 8, move |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(key.clone(), inner, 0..8)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn model_name() -> impl Strategy<Value = ModelName> {
    prop::sample::select(ModelName::ALL)
}

/// A value that conforms to `kind`. `include` decides, one optional field at
/// a time, whether the field is written.
fn conforming(kind: &FieldKind, any: &Value, include: &mut impl FnMut() -> bool) -> Value {
    match kind {
        FieldKind::String => json!("text"),
        FieldKind::Integer => json!(7),
        FieldKind::Float => json!(1.5),
        FieldKind::Boolean => json!(true),
        FieldKind::Timestamp => json!("2024-01-01T00:00:00Z"),
        FieldKind::Enum(values) => json!(values[values.len() - 1]),
        FieldKind::Object => json!({"k": "v"}),
        FieldKind::Any => any.clone(),
        FieldKind::Record(shape) => Value::Object(conforming_record(shape, any, include)),
        FieldKind::List(inner) => json!([conforming(inner, any, include)]),
        FieldKind::MapOf(inner) => json!({"k": conforming(inner, any, include)}),
        FieldKind::OneOf(alternatives) => conforming(&alternatives[0], any, include),
    }
}

fn conforming_record(
    shape: &Shape,
    any: &Value,
    include: &mut impl FnMut() -> bool,
) -> Map<String, Value> {
    let mut record = Map::new();
    for field in shape.fields {
        if field.required || include() {
            record.insert(field.name.to_string(), conforming(&field.kind, any, include));
        }
    }
    record
}

/// Validates `data` as `model` and checks that every omitted top-level
/// field with a default received exactly that default.
fn assert_conforming_data_validates(model: ModelName, data: &Map<String, Value>) {
    let value = Value::Object(data.clone());
    let validated = validate(model.into(), &value)
        .unwrap_or_else(|err| panic!("{model} rejected conforming data: {:?}", err.issues));
    assert_eq!(validated.model_name(), model);

    let normalized = check(model.shape(), &value).unwrap();
    for field in model.shape().fields {
        if let Some(default) = field.default {
            if !data.contains_key(field.name) {
                assert_eq!(normalized[field.name], default.to_value(), "{model}.{}", field.name);
            }
        }
    }
}

#[test]
fn every_model_accepts_required_fields_only() {
    for model in ModelName::ALL {
        let data = conforming_record(model.shape(), &Value::Null, &mut || false);
        assert_conforming_data_validates(*model, &data);
    }
}

#[test]
fn every_model_accepts_all_fields() {
    let any = json!({"nested": [1, "two"]});
    for model in ModelName::ALL {
        let data = conforming_record(model.shape(), &any, &mut || true);
        assert_conforming_data_validates(*model, &data);
    }
}

proptest! {
    /// `safe_validate` never panics and fails exactly when `validate` does.
    #[test]
    fn safe_validate_agrees_with_validate(model in model_name(), data in json_value()) {
        let schema = model.into();
        let safe = safe_validate(schema, &data);
        let strict = validate(schema, &data);
        prop_assert_eq!(safe.success(), strict.is_ok());
    }

    /// Every failure carries at least one issue, each attributed to the model.
    #[test]
    fn failures_are_never_empty(model in model_name(), data in json_value()) {
        if let Err(err) = validate(model.into(), &data) {
            prop_assert!(!err.issues.is_empty());
            prop_assert_eq!(err.model.as_str(), model.as_str());
        }
    }

    /// Any mix of present and omitted optional fields validates.
    #[test]
    fn conforming_data_always_validates(
        model in model_name(),
        flags in prop::collection::vec(any::<bool>(), 1..32),
        filler in prop_oneof![
            Just(Value::Null),
            Just(json!(3)),
            Just(json!("s")),
            Just(json!({"a": []})),
        ],
    ) {
        let mut flags = flags.into_iter().cycle();
        let mut include = || flags.next().unwrap_or(false);
        let data = conforming_record(model.shape(), &filler, &mut include);
        assert_conforming_data_validates(model, &data);
    }

    /// Names outside the registry never resolve.
    #[test]
    fn unknown_names_are_rejected(name in "[A-Za-z]{0,30}") {
        let known = list_schemas().contains(&name.as_str());
        prop_assert_eq!(get_schema(&name).is_ok(), known);
    }
}
