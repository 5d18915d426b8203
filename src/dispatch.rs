//! Resolves an incoming call's dot-separated `listener` path against a
//! [`Provider`] tree, enforcing access control along the way.
use crate::error::CommunicatorError;
use crate::provider::{Provider, ProviderNode, RemoteFunction};
use std::sync::Arc;

/// Segment names that are never resolvable, regardless of what the provider
/// tree actually contains — mirrors the source runtime's refusal to expose
/// prototype/constructor machinery through the call surface.
const BLOCKED_SEGMENTS: &[&str] = &["constructor", "prototype", "__proto__", "__class__"];

fn segment_is_blocked(segment: &str) -> bool {
    BLOCKED_SEGMENTS.contains(&segment)
        || segment.starts_with('_')
        || segment.ends_with('_')
        || segment.is_empty()
}

/// Walks `listener` (e.g. `"session.user.rename"`) through `provider`,
/// applying access control at every segment, and returns the bound function
/// if resolution succeeds all the way to a callable leaf.
pub fn resolve(provider: &Provider, listener: &str) -> Result<Arc<dyn RemoteFunction>, CommunicatorError> {
    let root: &ProviderNode = match provider {
        Provider::Unset => return Err(CommunicatorError::ProviderNotSpecified),
        Provider::Empty => return Err(CommunicatorError::ProviderEmpty),
        Provider::Installed(root) => root,
    };

    let segments: Vec<&str> = listener.split('.').collect();
    if segments.is_empty() {
        return Err(CommunicatorError::NoSuchFunction {
            listener: listener.to_string(),
        });
    }

    let mut node = root;
    for (i, segment) in segments.iter().enumerate() {
        if segment_is_blocked(segment) {
            return Err(CommunicatorError::AccessDenied {
                listener: listener.to_string(),
            });
        }

        let is_last = i == segments.len() - 1;
        if is_last {
            return node.get_function(segment).ok_or_else(|| CommunicatorError::NoSuchFunction {
                listener: listener.to_string(),
            });
        }

        match node.get_namespace(segment) {
            Some(next) => node = next,
            None => {
                return Err(CommunicatorError::NoSuchFunction {
                    listener: listener.to_string(),
                });
            }
        }
    }

    unreachable!("loop always returns on the last segment")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use serde_json::json;

    fn provider() -> Provider {
        Provider::installed(
            ProviderNode::new()
                .function("echo", |args: Vec<Value>| async move {
                    Ok(args.into_iter().next().unwrap_or(Value::Null))
                })
                .namespace(
                    "session",
                    ProviderNode::new().function("rename", |_args: Vec<Value>| async move {
                        Ok(json!("renamed"))
                    }),
                ),
        )
    }

    #[test]
    fn resolves_top_level_and_nested_paths() {
        let p = provider();
        assert!(resolve(&p, "echo").is_ok());
        assert!(resolve(&p, "session.rename").is_ok());
    }

    #[test]
    fn unset_provider_yields_not_specified_diagnostic() {
        let p = Provider::Unset;
        assert!(matches!(
            resolve(&p, "echo"),
            Err(CommunicatorError::ProviderNotSpecified)
        ));
    }

    #[test]
    fn empty_provider_yields_distinct_diagnostic() {
        let p = Provider::Empty;
        assert!(matches!(resolve(&p, "echo"), Err(CommunicatorError::ProviderEmpty)));
    }

    #[test]
    fn blocks_dunder_and_underscore_segments() {
        let p = provider();
        for blocked in ["__proto__", "constructor", "_private", "trailing_"] {
            assert!(matches!(
                resolve(&p, blocked),
                Err(CommunicatorError::AccessDenied { .. })
            ));
        }
    }

    #[test]
    fn blocked_segment_inside_a_nested_path_is_also_rejected() {
        let p = provider();
        assert!(matches!(
            resolve(&p, "session.__proto__"),
            Err(CommunicatorError::AccessDenied { .. })
        ));
    }

    #[test]
    fn unknown_path_is_no_such_function_not_access_denied() {
        let p = provider();
        assert!(matches!(
            resolve(&p, "nope"),
            Err(CommunicatorError::NoSuchFunction { .. })
        ));
        assert!(matches!(
            resolve(&p, "session.nope"),
            Err(CommunicatorError::NoSuchFunction { .. })
        ));
    }
}
