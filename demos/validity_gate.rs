//! # Example: validity_gate
//!
//! Runs side-effecting work only after every prerequisite task succeeded.
//!
//! Shows how to:
//! - Check heterogeneous tasks with [`are_valid`]
//! - Gate a generator with [`map_on_valid`]
//! - Pick branches with [`tern`] and [`tern_fn`]
//!
//! ## Run
//! ```bash
//! cargo run --example validity_gate
//! ```

use std::time::{Duration, Instant};

use taskpromise::{are_valid, map_on_valid, tern, tern_fn, CancelScope, Task, TaskError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("=== validity_gate example ===\n");

    let scope = CancelScope::new();

    // 1. Two slow prerequisites: checked concurrently, ~1s total
    let schema = Task::spawn(Some(&scope), |_| async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        Ok::<_, TaskError>("schema v7")
    });
    let disk = Task::spawn(Some(&scope), |_| async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        Ok::<_, TaskError>(512u64)
    });

    let start = Instant::now();
    are_valid(Some(&scope), &[&schema, &disk]).await?;
    println!("[gate] prerequisites ok after {:?}", start.elapsed());

    // 2. Gated write
    let write = map_on_valid(
        Some(&scope),
        Some(|_: CancelScope| async { Ok::<_, TaskError>("rows written") }),
        &[&schema, &disk],
    )
    .await;
    println!("[write] {:?}", write.wait().await);

    // 3. A failing prerequisite blocks the generator
    let broken = Task::<()>::failed(Some(&scope), TaskError::fail("replica lagging"));
    let blocked = map_on_valid(
        Some(&scope),
        Some(|_: CancelScope| async { Ok::<_, TaskError>("should not run") }),
        &[&schema, &broken],
    )
    .await;
    println!("[blocked] {:?}", blocked.wait().await);

    // 4. Conditional branches
    let cached: Option<u32> = Some(42);
    let value = tern(
        Some(&scope),
        cached.is_none(),
        |_: CancelScope| async { Ok::<_, TaskError>(0) },
        cached.unwrap_or_default(),
    );
    println!("[tern] {:?}", value.wait().await);

    let fallback = tern_fn(
        Some(&scope),
        false,
        |_: CancelScope| async { Ok::<_, TaskError>(1) },
        || Err(TaskError::NilValue),
    );
    println!("[tern_fn] {:?}", fallback.wait().await);

    Ok(())
}
