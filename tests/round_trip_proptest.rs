//! Property test for invariant 3 (round-trip identity): for any
//! JSON-serializable argument vector and a provider function that echoes its
//! first argument back, an outbound call's resolved value equals the
//! argument that was sent.
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use proptest::prelude::*;
use serde_json::Value as Json;

use spark_rfc_core::{Communicator, CommunicatorError, Invoke, ProviderNode, SendData, Transport, Value};

struct Loopback {
    peer: Mutex<Option<Arc<Communicator<Loopback>>>>,
}

#[async_trait]
impl SendData for Loopback {
    async fn send_data(&self, message: Invoke) -> Result<(), CommunicatorError> {
        let peer = self.peer.lock().unwrap().clone().expect("loopback peer not wired");
        tokio::spawn(async move {
            let _ = peer.reply_data(message).await;
        });
        Ok(())
    }
}

#[async_trait]
impl Transport for Loopback {
    fn is_ready(&self) -> bool {
        true
    }
}

fn wire_pair() -> (Arc<Communicator<Loopback>>, Arc<Communicator<Loopback>>) {
    let a = Communicator::new(Loopback { peer: Mutex::new(None) });
    let b = Communicator::new(Loopback { peer: Mutex::new(None) });
    *a.transport().peer.lock().unwrap() = Some(b.clone());
    *b.transport().peer.lock().unwrap() = Some(a.clone());
    b.set_provider(Some(ProviderNode::new().function(
        "echo",
        |args: Vec<Value>| async move { Ok(args.into_iter().next().unwrap_or(Value::Null)) },
    )));
    (a, b)
}

/// A recursion-bounded strategy for arbitrary JSON-serializable values:
/// deep enough to exercise nested objects/arrays without proptest spending
/// its whole budget shrinking a pathological tree.
fn arbitrary_json() -> impl Strategy<Value = Json> {
    let leaf = prop_oneof![
        Just(Json::Null),
        any::<bool>().prop_map(Json::Bool),
        any::<i64>().prop_map(|n| Json::Number(n.into())),
        ".*".prop_map(Json::String),
    ];
    leaf.prop_recursive(3, 32, 8, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Json::Array),
            proptest::collection::btree_map(".{0,8}", inner, 0..4)
                .prop_map(|map| Json::Object(map.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn echoed_value_equals_the_sent_value(value in arbitrary_json()) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let result = runtime.block_on(async {
            let (caller, _callee) = wire_pair();
            let driver = caller.get_driver();
            driver.path("echo").call(vec![value.clone()]).await.unwrap()
        });
        assert_eq!(result, value);
    }
}
