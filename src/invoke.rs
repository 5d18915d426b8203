//! The `Invoke` wire schema: a tagged union of call request vs. call response.
//!
//! # Design background
//! The discriminant is *structural*, not an explicit tag field: any message
//! carrying a `listener` string is a call ([`IFunction`]); anything else is a
//! reply ([`IReturn`]). `#[serde(untagged)]` gives us that for free — serde
//! tries each variant in declaration order and the first one whose required
//! fields are present wins, which is exactly the field-presence discriminant
//! the spec calls for. The serializer never emits a `listener` field on a
//! return, because `IReturn` simply doesn't have one.
use serde::{Deserialize, Serialize};

use crate::value::{Value, type_tag};

/// Correlates a call request with its eventual reply. Minted fresh per
/// outstanding call by the issuing peer; see [`crate::communicator::Communicator`].
pub type CallId = u64;

/// One positional argument of an outbound or inbound call.
///
/// `type_tag` is the callee-ignored, primitive-category string produced by
/// the sender's reflective type-of operation; it exists for debugging only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IParameter {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub value: Value,
}

impl IParameter {
    /// Wraps a value, deriving its `type` tag automatically.
    pub fn new(value: Value) -> Self {
        Self {
            type_tag: type_tag(&value).to_string(),
            value,
        }
    }
}

/// A call request: `listener` is a dot-separated path resolved against the
/// receiving peer's provider (e.g. `"math.add"`), `uid` is unique among the
/// sender's currently-outstanding calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IFunction {
    pub uid: CallId,
    pub listener: String,
    #[serde(default)]
    pub parameters: Vec<IParameter>,
}

/// A call response. `value` is the return value when `success`, otherwise a
/// serialized error record (see [`crate::error::serialize_failure`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IReturn {
    pub uid: CallId,
    pub success: bool,
    pub value: Value,
}

/// The wire message: either an inbound/outbound call, or a reply to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Invoke {
    Function(IFunction),
    Return(IReturn),
}

impl Invoke {
    pub fn uid(&self) -> CallId {
        match self {
            Invoke::Function(f) => f.uid,
            Invoke::Return(r) => r.uid,
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Invoke::Return(_))
    }
}

impl From<IFunction> for Invoke {
    fn from(f: IFunction) -> Self {
        Invoke::Function(f)
    }
}

impl From<IReturn> for Invoke {
    fn from(r: IReturn) -> Self {
        Invoke::Return(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn discriminant_is_listener_presence_not_an_explicit_tag() {
        let call = Invoke::Function(IFunction {
            uid: 1,
            listener: "echo".into(),
            parameters: vec![IParameter::new(json!(42))],
        });
        let wire = serde_json::to_value(&call).unwrap();
        assert!(wire.get("listener").is_some());
        assert!(wire.get("success").is_none());

        let ret = Invoke::Return(IReturn {
            uid: 1,
            success: true,
            value: json!(42),
        });
        let wire = serde_json::to_value(&ret).unwrap();
        assert!(wire.get("listener").is_none());
    }

    #[test]
    fn round_trips_through_json() {
        let original = Invoke::Function(IFunction {
            uid: 7,
            listener: "math.add".into(),
            parameters: vec![IParameter::new(json!(2)), IParameter::new(json!(3))],
        });
        let text = serde_json::to_string(&original).unwrap();
        let decoded: Invoke = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn deserializes_return_without_listener_field() {
        let text = r#"{"uid":7,"success":false,"value":{"name":"Error","message":"nope"}}"#;
        let decoded: Invoke = serde_json::from_str(text).unwrap();
        assert!(decoded.is_return());
        assert_eq!(decoded.uid(), 7);
    }
}
