//! Native function integration tests

use crate::helpers::*;
use serde_json::{json, Value};
use tether::core::{Error as CoreError, COMPLETE_EVENT_ID, INVOKE_EVENT_ID};

/// A call posts one invoke envelope and resolves with the host's result.
#[tokio::test]
async fn test_native_call_round_trip() {
    let host = SimulatedHost::new();
    let say_hello = host.session.native_function("sayHello");

    let pending = say_hello.call(vec![json!("world")]);
    let others = host.answer_invocations(|name, params| {
        assert_eq!(name, "sayHello");
        json!(format!("Hello, {}", params[0].as_str().unwrap_or_default()))
    });
    assert!(others.is_empty());

    assert_eq!(pending.await.unwrap(), json!("Hello, world"));
    assert_eq!(host.session.backend().correlator().pending_count(), 0);
}

/// Completions arriving in reverse order still reach the right callers.
#[tokio::test]
async fn test_out_of_order_completion() {
    let host = SimulatedHost::new();
    let levels = host.session.native_function("getLevels");

    let first = levels.call(vec![json!(1)]);
    let second = levels.call(vec![json!(2)]);

    let mut invocations = host.outbound();
    assert_eq!(invocations.len(), 2);
    invocations.reverse();
    for envelope in invocations {
        assert_eq!(envelope.event_id, INVOKE_EVENT_ID);
        let param = envelope.payload["params"][0].clone();
        host.emit(
            COMPLETE_EVENT_ID,
            json!({"promiseId": envelope.payload["resultId"], "result": param}),
        );
    }

    assert_eq!(first.await.unwrap(), json!(1));
    assert_eq!(second.await.unwrap(), json!(2));
}

/// A completion for an unknown id leaves pending calls untouched.
#[tokio::test]
async fn test_stale_completion_ignored() {
    let host = SimulatedHost::new();
    let pending = host.session.native_function("sayHello").call(vec![]);
    let id = pending.id().0;

    host.emit(COMPLETE_EVENT_ID, json!({"promiseId": id + 100, "result": "nope"}));
    assert_eq!(host.session.backend().correlator().pending_count(), 1);

    host.emit(COMPLETE_EVENT_ID, json!({"promiseId": id}));
    assert_eq!(pending.await.unwrap(), Value::Null);
}

/// A completion after the caller gave up is dropped without disturbing later calls.
#[tokio::test(start_paused = true)]
async fn test_late_completion_after_timeout() {
    let host = SimulatedHost::new();
    let say_hello = host.session.native_function("sayHello");

    let pending = say_hello.call(vec![]);
    let id = pending.id().0;
    let waited = tokio::time::timeout(std::time::Duration::from_millis(50), pending).await;
    assert!(waited.is_err());

    host.emit(COMPLETE_EVENT_ID, json!({"promiseId": id, "result": "late"}));
    assert_eq!(host.session.backend().correlator().pending_count(), 0);

    let next = say_hello.call(vec![]);
    host.answer_invocations(|_, _| json!("on time"));
    assert_eq!(next.await.unwrap(), json!("on time"));
}

/// Calls are abandoned, not leaked, when the session goes away.
#[tokio::test]
async fn test_call_abandoned_with_session() {
    let host = SimulatedHost::new();
    let pending = host.session.native_function("sayHello").call(vec![]);
    drop(host);

    assert!(matches!(pending.await, Err(CoreError::CallAbandoned)));
}
