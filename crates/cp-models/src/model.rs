//! Typed validation: shape check, then decode.
//!
//! Raw JSON is first checked against the model's [`Shape`] by
//! [`cp_schema::check`], which reports every field-level problem and fills
//! in declared defaults. The normalized mapping is then decoded into the
//! typed record with serde.

use std::marker::PhantomData;

use cp_schema::{audit_shape, check, SchemaError, Shape, ShapeFinding, ValidationError};
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::registry::{AnyModel, ModelName, Schema};

/// A typed record registered under a [`ModelName`].
pub trait Model: Serialize + DeserializeOwned {
    const NAME: ModelName;

    fn shape() -> &'static Shape {
        Self::NAME.shape()
    }
}

/// Outcome of a non-failing validation.
///
/// Serializes as `{"success": true, "data": ...}` or
/// `{"success": false, "error": ...}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Validated<T> {
    Success(T),
    Failure(ValidationError),
}

impl<T> Validated<T> {
    pub fn success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn into_result(self) -> Result<T, ValidationError> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure(error) => Err(error),
        }
    }
}

impl<T> From<Result<T, ValidationError>> for Validated<T> {
    fn from(result: Result<T, ValidationError>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(error) => Self::Failure(error),
        }
    }
}

impl<T: Serialize> Serialize for Validated<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Validated", 2)?;
        match self {
            Self::Success(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            Self::Failure(error) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

fn checked(model: ModelName, data: &Value) -> Result<Value, ValidationError> {
    check(model.shape(), data).map(Value::Object)
}

fn decode_failure(model: ModelName, err: serde_json::Error) -> ValidationError {
    tracing::debug!(model = %model, error = %err, "decode after shape check failed");
    ValidationError::decode(model.as_str(), err.to_string())
}

/// Validate `data` against a registered schema and decode it.
pub fn validate(schema: Schema, data: &Value) -> Result<AnyModel, ValidationError> {
    let model = schema.model();
    let normalized = checked(model, data)?;
    AnyModel::decode(model, normalized).map_err(|e| decode_failure(model, e))
}

/// Like [`validate`], but captures the failure instead of returning it.
pub fn safe_validate(schema: Schema, data: &Value) -> Validated<AnyModel> {
    validate(schema, data).into()
}

/// Validate `data` against the model registered under `name`.
pub fn validate_named(name: &str, data: &Value) -> Result<AnyModel, SchemaError> {
    let schema = crate::registry::get_schema(name)?;
    Ok(validate(schema, data)?)
}

/// Validate `data` as `T`.
pub fn validate_as<T: Model>(data: &Value) -> Result<T, ValidationError> {
    let normalized = checked(T::NAME, data)?;
    serde_json::from_value(normalized).map_err(|e| decode_failure(T::NAME, e))
}

pub fn safe_validate_as<T: Model>(data: &Value) -> Validated<T> {
    validate_as::<T>(data).into()
}

/// Reusable validator bound to one model type.
#[derive(Debug)]
pub struct Validator<T> {
    _model: PhantomData<fn() -> T>,
}

impl<T> Clone for Validator<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Validator<T> {}

pub fn create_validator<T: Model>() -> Validator<T> {
    Validator { _model: PhantomData }
}

impl<T: Model> Validator<T> {
    pub fn model(&self) -> ModelName {
        T::NAME
    }

    pub fn validate(&self, data: &Value) -> Result<T, ValidationError> {
        validate_as::<T>(data)
    }

    pub fn safe_validate(&self, data: &Value) -> Validated<T> {
        safe_validate_as::<T>(data)
    }

    /// Validate and return the record.
    ///
    /// # Panics
    ///
    /// Panics with the full issue list when `data` does not validate. Meant
    /// for fixtures and construction code where invalid data is a bug.
    #[track_caller]
    pub fn expect_valid(&self, data: &Value) -> T {
        match self.validate(data) {
            Ok(record) => record,
            Err(error) => {
                let issues: Vec<String> = error.issues.iter().map(ToString::to_string).collect();
                panic!("{error}: {}", issues.join("; "))
            }
        }
    }
}

/// Audit every registered shape, in registration order.
pub fn audit_registry() -> Vec<ShapeFinding> {
    ModelName::ALL
        .iter()
        .flat_map(|model| audit_shape(model.shape()))
        .collect()
}
