// Tagged result of a single resource operation.

use serde::de::DeserializeOwned;

use crate::error::Error;

/// An opaque JSON record as returned by the server.
pub type Record = serde_json::Value;

/// Result of one remote call.
///
/// Resource operations never fail with a `Result`: every remote failure is
/// folded into one of these variants. Callers that only want "data or
/// nothing" use [`Outcome::record`].
#[derive(Debug)]
#[must_use]
pub enum Outcome {
    /// The server returned a JSON document.
    Record(Record),
    /// The server returned an empty body or a JSON `null`.
    Empty,
    /// The request could not be completed, or the server answered with a
    /// non-success status.
    TransportError(Error),
    /// The body could not be parsed as JSON.
    ParseError(Error),
}

impl Outcome {
    /// Classify a successful response body.
    pub(crate) fn from_body(body: &str) -> Self {
        if body.trim().is_empty() {
            return Self::Empty;
        }
        match serde_json::from_str::<Record>(body) {
            Ok(Record::Null) => Self::Empty,
            Ok(record) => Self::Record(record),
            Err(e) => Self::ParseError(Error::deserialization(&e, body)),
        }
    }

    /// Collapse to the record, discarding the failure cause.
    pub fn record(self) -> Option<Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Borrow the record, if any.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The failure cause, if the call failed.
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::TransportError(e) | Self::ParseError(e) => Some(e),
            Self::Record(_) | Self::Empty => None,
        }
    }

    /// Convert into a `Result` so callers can use `?`.
    pub fn into_result(self) -> Result<Option<Record>, Error> {
        match self {
            Self::Record(record) => Ok(Some(record)),
            Self::Empty => Ok(None),
            Self::TransportError(e) | Self::ParseError(e) => Err(e),
        }
    }

    /// Deserialize the record into a caller-supplied type.
    ///
    /// `Empty` maps to `Ok(None)`; a record that does not match `T` is a
    /// `Deserialization` error.
    pub fn parse<T: DeserializeOwned>(self) -> Result<Option<T>, Error> {
        let Some(record) = self.into_result()? else {
            return Ok(None);
        };
        T::deserialize(&record)
            .map(Some)
            .map_err(|e| Error::deserialization(&e, &record.to_string()))
    }
}
