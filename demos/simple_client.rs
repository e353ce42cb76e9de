use std::time::Duration;

use anyhow::Context;
use futures::StreamExt;
use tower_a2a_rpc::prelude::*;
use tracing_subscriber::EnvFilter;

// Configuration - update these to match your agent
const AGENT_URL: &str = "https://your-agent-url/a2a";
const AUTH_TOKEN: &str = "your-auth-token";

fn print_parts(parts: &[Part]) {
    for part in parts {
        match part {
            Part::Text(text) => println!("  {}", text.text),
            Part::File(file) => match (&file.file.name, &file.file.uri) {
                (Some(name), _) => println!("  [File: {name}]"),
                (None, Some(uri)) => println!("  [File: {uri}]"),
                (None, None) => println!("  [Inline file]"),
            },
            Part::Data(_) => println!("  [Structured data]"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("🚀 Tower-A2A RPC Simple Client Example\n");

    let url = AGENT_URL.parse().context("invalid agent URL")?;
    let mut client = A2AClientBuilder::new_http(url)
        .with_header("Authorization", format!("Bearer {AUTH_TOKEN}"))
        .with_timeout(Duration::from_secs(30))
        .build()?;

    println!("✓ Client configured for: {AGENT_URL}\n");

    // Step 1: Send a message and wait for the task to settle
    println!("💬 Sending message to agent...");
    let params = TaskSendParams::new(
        uuid::Uuid::now_v7().to_string(),
        Message::user("What is the weather like in San Francisco?"),
    );
    let task_id = params.id.clone();

    let task = match client.send_task(params).await {
        Ok(task) => task,
        Err(e) => {
            eprintln!(
                r#"✗ Failed to send task: {e}

    Note: Make sure AGENT_URL points to a running A2A agent"#
            );
            return Ok(());
        }
    };
    println!("✓ Task {} is {}", task.id, task.status.state);

    println!("\n⏳ Polling for task completion...");
    let task = client
        .poll_until_terminal(&task_id, Duration::from_secs(1), 30)
        .await?;
    println!("✓ Task finished as {}", task.status.state);
    for artifact in &task.artifacts {
        println!("\n📝 Artifact {}:", artifact.index);
        print_parts(&artifact.parts);
    }

    // Step 2: Stream a follow-up
    println!("\n📡 Streaming a follow-up...");
    let params = TaskSendParams::new(
        uuid::Uuid::now_v7().to_string(),
        Message::user("And tomorrow?"),
    );
    let mut events = client.send_task_subscribe(params).await?;
    while let Some(event) = events.next().await {
        match event? {
            StreamEvent::Status(update) => {
                println!("  status: {}", update.status.state);
                if update.is_final {
                    break;
                }
            }
            StreamEvent::Artifact(update) => print_parts(&update.artifact.parts),
        }
    }

    // Step 3: Cancel the first task, which an agent may refuse
    match client.cancel_task(&task_id).await {
        Ok(task) => println!("\n✓ Task {} is now {}", task.id, task.status.state),
        Err(e) if e.code() == Some(-32002) => println!("\n⚠️  Task {task_id} cannot be canceled"),
        Err(e) => eprintln!("\n✗ Failed to cancel task: {e}"),
    }

    println!("\n✅ Example completed successfully!");

    Ok(())
}
