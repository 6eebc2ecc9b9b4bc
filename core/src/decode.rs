//! Result decoding against a caller-chosen target shape.
//!
//! # Design
//! The target is chosen statically through the `Target` trait instead of
//! inspecting types at runtime. Three shapes exist:
//!
//! | Marker     | Shape        | Output | Body handling                      |
//! |------------|--------------|--------|------------------------------------|
//! | `Ignore`   | `NoResult`   | `()`   | drained and discarded              |
//! | `Text`     | `Text`       | String | read fully as UTF-8, absent = ""   |
//! | `Json<T>`  | `Structured` | `T`    | read fully, decoded by serializer  |
//!
//! `Json<T>` covers parameterized types too (`Json<Vec<Todo>>`). An absent or
//! empty body never decodes into a structured value.

use std::io::{self, Read};
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::RestError;
use crate::http::ResponseBody;
use crate::serializer::Serializer;

/// Which kind of value a call is expected to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetShape {
    NoResult,
    Text,
    /// Structured value; carries the target type name for diagnostics.
    Structured(&'static str),
}

/// A decode target selectable per call.
pub trait Target {
    type Output;

    fn shape() -> TargetShape;

    fn decode<S: Serializer>(
        body: Option<ResponseBody>,
        serializer: &S,
    ) -> Result<Self::Output, RestError>;
}

/// No result expected.
#[derive(Debug, Clone, Copy)]
pub enum Ignore {}

/// Body as plain UTF-8 text.
#[derive(Debug, Clone, Copy)]
pub enum Text {}

/// Body decoded into `T` by the client's serializer.
#[derive(Debug, Clone, Copy)]
pub struct Json<T>(PhantomData<fn() -> T>);

impl Target for Ignore {
    type Output = ();

    fn shape() -> TargetShape {
        TargetShape::NoResult
    }

    fn decode<S: Serializer>(body: Option<ResponseBody>, _serializer: &S) -> Result<(), RestError> {
        if let Some(mut reader) = body {
            match io::copy(&mut reader, &mut io::sink()) {
                Ok(n) => debug!(bytes = n, "discarded response body"),
                Err(err) => warn!(error = %err, "failed to drain ignored response body"),
            }
        }
        Ok(())
    }
}

impl Target for Text {
    type Output = String;

    fn shape() -> TargetShape {
        TargetShape::Text
    }

    fn decode<S: Serializer>(
        body: Option<ResponseBody>,
        _serializer: &S,
    ) -> Result<String, RestError> {
        let bytes = read_all(body)?;
        String::from_utf8(bytes).map_err(|err| RestError::Decode(err.into()))
    }
}

impl<T: DeserializeOwned> Target for Json<T> {
    type Output = T;

    fn shape() -> TargetShape {
        TargetShape::Structured(std::any::type_name::<T>())
    }

    fn decode<S: Serializer>(body: Option<ResponseBody>, serializer: &S) -> Result<T, RestError> {
        let bytes = read_all(body)?;
        if bytes.is_empty() {
            return Err(RestError::Decode(
                format!("empty body for structured target {}", std::any::type_name::<T>()).into(),
            ));
        }
        serializer.decode(&bytes).map_err(RestError::Decode)
    }
}

/// Decode a successful response body into `T`'s output.
pub fn decode<T: Target, S: Serializer>(
    body: Option<ResponseBody>,
    serializer: &S,
) -> Result<T::Output, RestError> {
    T::decode(body, serializer)
}

fn read_all(body: Option<ResponseBody>) -> Result<Vec<u8>, RestError> {
    let mut bytes = Vec::new();
    if let Some(mut reader) = body {
        reader
            .read_to_end(&mut bytes)
            .map_err(|err| RestError::Decode(err.into()))?;
    }
    Ok(bytes)
}
