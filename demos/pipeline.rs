//! # Example: pipeline
//!
//! Builds a small dependency graph of tasks and shows how a failure travels through it.
//!
//! Shows how to:
//! - Start tasks with [`Task::spawn`] under a shared [`CancelScope`]
//! - Join them with [`fmap2`] and transform the result with [`Task::map`]
//! - Tie a task to another task's scope so it learns *why* it was cancelled
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► config  (20ms) ──┐
//!   ├─► records (50ms) ──┴─► fmap2 → summary ─► map → banner
//!   │
//!   └─► flaky (fails) ──► scope fires with cause
//!         └─► follower (derived from flaky.scope()) → Canceled { cause }
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example pipeline
//! ```

use std::time::Duration;

use taskpromise::{fmap2, CancelScope, Task, TaskError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== pipeline example ===\n");

    let root = CancelScope::new();

    // 1. Two independent producers
    let config = Task::spawn(Some(&root), |_| async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok::<_, TaskError>(String::from("batch=3"))
    });
    let records = Task::spawn(Some(&root), |_| async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok::<_, TaskError>(vec![3, 1, 4, 1, 5])
    });

    // 2. Join and transform
    let summary = fmap2(Some(&root), &config, &records, |cfg, rows| {
        Ok(format!("{cfg}, rows={}, sum={}", rows.len(), rows.iter().sum::<i32>()))
    });
    let banner = summary.map(Some(&root), |s| Ok(format!("[summary] {s}")));
    println!("{}", banner.wait().await?);

    // 3. A failing task and a task derived from its scope
    let flaky = Task::spawn(Some(&root), |_| async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Err::<u32, _>(TaskError::fail("upstream unavailable"))
    });
    let follower = Task::spawn(Some(flaky.scope()), |_| async {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok::<_, TaskError>("never observed")
    });

    match follower.wait().await {
        Ok(v) => println!("[follower] unexpected value: {v}"),
        Err(e) => println!(
            "[follower] {} (cause: {:?})",
            e.as_label(),
            e.cause().map(TaskError::as_message)
        ),
    }
    println!("[flaky] {:?}", flaky.wait().await);

    Ok(())
}
