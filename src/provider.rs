//! The callee-side function tree: what a [`crate::communicator::Communicator`]
//! dispatches incoming calls against.
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RpcFailure;
use crate::value::Value;

/// A single remotely callable function.
///
/// Implemented directly for any `Fn(Vec<Value>) -> BoxFuture<...>` via the
/// blanket impl below, so most callers never name this trait; it exists so
/// [`ProviderNode`] can hold a trait object.
#[async_trait]
pub trait RemoteFunction: Send + Sync {
    async fn call(&self, args: Vec<Value>) -> Result<Value, RpcFailure>;
}

#[async_trait]
impl<F, Fut> RemoteFunction for F
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<Value, RpcFailure>> + Send + 'static,
{
    async fn call(&self, args: Vec<Value>) -> Result<Value, RpcFailure> {
        (self)(args).await
    }
}

/// One entry of a [`ProviderNode`]: either a callable leaf, or a nested
/// namespace to keep walking into.
enum Entry {
    Function(Arc<dyn RemoteFunction>),
    Namespace(ProviderNode),
}

/// A tree of callable functions addressed by dot-separated path
/// (`"math.add"`, `"session.user.rename"`, ...).
///
/// Built with the `.function(name, f)` / `.namespace(name, builder)` methods
/// rather than exposed as a raw map, so access-control segment checks (see
/// [`crate::dispatch`]) have one place to hook rather than needing to trust
/// every call site to pre-filter keys.
#[derive(Default)]
pub struct ProviderNode {
    entries: HashMap<String, Entry>,
}

impl ProviderNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a callable at `name` within this node.
    pub fn function<F, Fut>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Value, RpcFailure>> + Send + 'static,
    {
        self.entries
            .insert(name.into(), Entry::Function(Arc::new(f)));
        self
    }

    /// Nests a sub-tree at `name`.
    pub fn namespace(mut self, name: impl Into<String>, child: ProviderNode) -> Self {
        self.entries.insert(name.into(), Entry::Namespace(child));
        self
    }

    pub(crate) fn get_function(&self, segment: &str) -> Option<Arc<dyn RemoteFunction>> {
        match self.entries.get(segment) {
            Some(Entry::Function(f)) => Some(f.clone()),
            _ => None,
        }
    }

    pub(crate) fn get_namespace(&self, segment: &str) -> Option<&ProviderNode> {
        match self.entries.get(segment) {
            Some(Entry::Namespace(n)) => Some(n),
            _ => None,
        }
    }

    pub(crate) fn contains(&self, segment: &str) -> bool {
        self.entries.contains_key(segment)
    }
}

/// The three states a communicator's provider slot can be in, mirroring the
/// source runtime's `undefined` (never configured) / `null` (explicitly
/// configured empty, e.g. a write-only peer) / installed-object distinction.
/// Only [`Provider::Installed`] has anything dispatchable.
#[derive(Clone, Default)]
pub enum Provider {
    #[default]
    Unset,
    Empty,
    Installed(Arc<ProviderNode>),
}

impl Provider {
    pub fn installed(root: ProviderNode) -> Self {
        Provider::Installed(Arc::new(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_provider() -> ProviderNode {
        ProviderNode::new()
            .function("echo", |args: Vec<Value>| async move {
                Ok(args.into_iter().next().unwrap_or(Value::Null))
            })
            .namespace(
                "math",
                ProviderNode::new().function("add", |args: Vec<Value>| async move {
                    let sum: f64 = args.iter().filter_map(Value::as_f64).sum();
                    Ok(json!(sum))
                }),
            )
    }

    #[tokio::test]
    async fn resolves_top_level_function() {
        let root = sample_provider();
        let f = root.get_function("echo").expect("bound");
        let result = f.call(vec![json!("hi")]).await.unwrap();
        assert_eq!(result, json!("hi"));
    }

    #[tokio::test]
    async fn resolves_nested_function_through_namespace() {
        let root = sample_provider();
        let math = root.get_namespace("math").expect("nested namespace");
        let add = math.get_function("add").expect("bound");
        let result = add.call(vec![json!(2), json!(3)]).await.unwrap();
        assert_eq!(result, json!(5.0));
    }

    #[test]
    fn unbound_segment_yields_neither_function_nor_namespace() {
        let root = sample_provider();
        assert!(root.get_function("nope").is_none());
        assert!(root.get_namespace("nope").is_none());
        assert!(!root.contains("nope"));
    }
}
