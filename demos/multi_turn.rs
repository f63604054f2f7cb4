//! Multi-Turn Conversation — demonstrates `session_id` for grouping tasks
//! into one conversation thread.
//!
//! Each call to `tasks/send` creates or continues a task; tasks sharing a
//! `session_id` are understood by convention to belong to the same
//! conversation, though the protocol itself treats each task independently.
//!
//! Run the echo agent first:
//! ```sh
//! cargo run --example echo_agent
//! ```
//!
//! Then in another terminal:
//! ```sh
//! cargo run --example multi_turn
//! ```

use a2a_rs::client::A2AClient;
use a2a_rs::types::{Part, Task};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = A2AClient::from_url("http://localhost:3000").await?;

    let card = client.get_card()?;
    println!("Multi-turn conversation with: {}", card.name);
    println!();

    let session_id = uuid::Uuid::new_v4().to_string();

    // --- Turn 1 ---
    println!("=== Turn 1 (session: {}) ===", &session_id[..8]);
    let task1_id = uuid::Uuid::new_v4().to_string();
    let task1 = client
        .send_text_in_task(&task1_id, &session_id, "What is the A2A protocol?")
        .await?;
    print_task(&task1);
    println!();

    // --- Turn 2: continue the same task, same session ---
    println!("=== Turn 2 (continuing task {}) ===", &task1.id[..8]);
    let task2 = client
        .send_text_in_task(&task1.id, &session_id, "Tell me more about streaming.")
        .await?;
    print_task(&task2);
    println!();

    // --- Turn 3: another follow-up in the same task ---
    println!("=== Turn 3 ===");
    let task3 = client
        .send_text_in_task(&task1.id, &session_id, "Thanks, that's helpful!")
        .await?;
    print_task(&task3);
    println!();

    // --- New session: independent conversation ---
    println!("=== New conversation (different session) ===");
    let task4 = client.send_text("This is a fresh conversation.").await?;
    print_task(&task4);

    assert_ne!(
        task1.session_id, task4.session_id,
        "a fresh send_text call should start a new session"
    );
    println!();
    println!("Session IDs:");
    println!("  Turns 1-3 shared session: {}", &session_id[..8]);
    println!("  Turn 4 new session:       {}", &task4.session_id[..8]);

    Ok(())
}

fn print_task(task: &Task) {
    println!("Task: {}", task.id);
    println!("Session: {}", task.session_id);
    println!("Status: {:?}", task.status.state);

    for artifact in &task.artifacts {
        for part in &artifact.parts {
            if let Part::Text { text, .. } = part {
                println!("  -> {text}");
            }
        }
    }
    if let Some(msg) = &task.status.message {
        for part in &msg.parts {
            if let Part::Text { text, .. } = part {
                println!("  Agent: {text}");
            }
        }
    }
}
