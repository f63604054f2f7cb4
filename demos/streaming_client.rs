//! Streaming Client — connects to an A2A agent and streams SSE events.
//!
//! Demonstrates `tasks/sendSubscribe`, which returns real-time status
//! updates and artifact updates via Server-Sent Events.
//!
//! Run the echo agent first:
//! ```sh
//! cargo run --example echo_agent
//! ```
//!
//! Then in another terminal:
//! ```sh
//! cargo run --example streaming_client
//! ```

use a2a_rs::client::A2AClient;
use a2a_rs::types::{FileContent, Part, StreamResponse};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = A2AClient::from_url("http://localhost:3000").await?;

    let card = client.get_card()?;
    println!("Streaming from: {} (v{})", card.name, card.version);
    println!();

    let mut stream = client
        .send_text_stream("Tell me something interesting about Rust!")
        .await?;

    println!("--- Stream started ---");

    while let Some(event) = stream.next().await {
        match event? {
            StreamResponse::StatusUpdate(update) => {
                println!(
                    "[status] {:?} (final: {})",
                    update.status.state, update.r#final
                );
                if let Some(msg) = &update.status.message {
                    for part in &msg.parts {
                        if let Part::Text { text, .. } = part {
                            println!("  message: {text}");
                        }
                    }
                }
            }
            StreamResponse::ArtifactUpdate(update) => {
                let artifact = &update.artifact;
                println!(
                    "[artifact] {} (append: {:?}, last_chunk: {:?})",
                    artifact.name.as_deref().unwrap_or("unnamed"),
                    artifact.append,
                    artifact.last_chunk,
                );
                for part in &artifact.parts {
                    match part {
                        Part::Text { text, .. } => println!("  content: {text}"),
                        Part::File { file, .. } => match file {
                            FileContent::Uri(f) => println!(
                                "  file (uri): {} ({})",
                                f.uri,
                                f.mime_type.as_deref().unwrap_or("unknown type")
                            ),
                            FileContent::Bytes(f) => println!(
                                "  file (bytes): {} bytes ({})",
                                f.bytes.len(),
                                f.mime_type.as_deref().unwrap_or("unknown type")
                            ),
                        },
                        Part::Data { data, .. } => println!("  data: {data}"),
                    }
                }
            }
        }
    }

    println!("--- Stream ended ---");

    Ok(())
}
