//! End-to-end streaming tests: the `working` -> artifact -> `completed`
//! happy path over real SSE, and subscriber isolation — every subscriber
//! attached before publication sees the identical event order, and each
//! queue detaches itself once dropped.

mod common;

use std::sync::Arc;

use a2a_rs::client::{create_text_message, A2AClient, JsonRpcTransport};
use a2a_rs::server::{SubscriberRegistry, TaskEvent};
use a2a_rs::types::{Role, StreamResponse, TaskSendParams, TaskState};
use common::{spawn_server, SlowEchoAgent};

/// A `working` status, one artifact, then a `completed` status with
/// `final=true`, in that order, then the stream closes.
#[tokio::test]
async fn streaming_happy_path_yields_events_in_order() {
    let base_url = spawn_server(Arc::new(SlowEchoAgent)).await;
    let client = A2AClient::with_transport(Box::new(JsonRpcTransport::new(format!("{base_url}/a2a"))));

    let params = TaskSendParams {
        id: "t-2".to_string(),
        session_id: "s".to_string(),
        message: create_text_message(Role::User, "hello"),
        accepted_output_modes: None,
        push_notification: None,
        history_length: None,
        metadata: None,
    };

    let mut stream = client.send_task_subscribe(params).await.unwrap();

    let first = stream.next().await.unwrap().unwrap();
    match first {
        StreamResponse::StatusUpdate(update) => {
            assert_eq!(update.status.state, TaskState::Working);
            assert!(!update.r#final);
        }
        other => panic!("expected status update, got {other:?}"),
    }

    let second = stream.next().await.unwrap().unwrap();
    match second {
        StreamResponse::ArtifactUpdate(update) => {
            assert_eq!(update.artifact.last_chunk, Some(true));
        }
        other => panic!("expected artifact update, got {other:?}"),
    }

    let third = stream.next().await.unwrap().unwrap();
    match third {
        StreamResponse::StatusUpdate(update) => {
            assert_eq!(update.status.state, TaskState::Completed);
            assert!(update.r#final);
        }
        other => panic!("expected final status update, got {other:?}"),
    }

    assert!(stream.next().await.is_none(), "stream should close after the final event");
}

/// Two subscribers attaching before any events are published both observe
/// the full event sequence in the same order, and both detach once the
/// stream reaches its final event.
#[tokio::test]
async fn two_subscribers_observe_identical_order_and_detach() {
    let registry = Arc::new(SubscriberRegistry::new());
    let task_id = "t-6";

    let mut subscriber_a = registry.subscribe(task_id);
    let mut subscriber_b = registry.subscribe(task_id);

    let publisher = registry.publisher(task_id.to_string());
    let e1 = StreamResponse::StatusUpdate(a2a_rs::types::TaskStatusUpdateEvent {
        task_id: task_id.to_string(),
        status: a2a_rs::types::TaskStatus::new(TaskState::Working),
        r#final: false,
    });
    let e2 = StreamResponse::ArtifactUpdate(a2a_rs::types::TaskArtifactUpdateEvent {
        task_id: task_id.to_string(),
        artifact: a2a_rs::types::Artifact {
            name: None,
            description: None,
            parts: vec![a2a_rs::types::Part::text("chunk")],
            index: 0,
            append: None,
            last_chunk: Some(true),
            metadata: None,
        },
    });
    let e3 = StreamResponse::StatusUpdate(a2a_rs::types::TaskStatusUpdateEvent {
        task_id: task_id.to_string(),
        status: a2a_rs::types::TaskStatus::new(TaskState::Completed),
        r#final: true,
    });

    publisher.publish(e1.clone());
    publisher.publish(e2.clone());
    publisher.publish(e3.clone());

    for subscriber in [&mut subscriber_a, &mut subscriber_b] {
        let first = subscriber.recv().await.unwrap();
        assert!(matches!(first, TaskEvent::Update(StreamResponse::StatusUpdate(_))));
        assert!(!first.is_final());

        let second = subscriber.recv().await.unwrap();
        assert!(matches!(second, TaskEvent::Update(StreamResponse::ArtifactUpdate(_))));

        let third = subscriber.recv().await.unwrap();
        assert!(third.is_final());
    }

    drop(subscriber_a);
    drop(subscriber_b);

    // Both queues detached synchronously on drop (covered directly by
    // `dropping_queue_detaches_it` in subscriber_registry.rs); publishing to
    // an already-final, now-subscriber-less task is simply a no-op.
    publisher.publish(e3);
}
