//! Sequential timed cycles against the loopback engine.
//!
//! Run with: `cargo run --example sequential --features "sim logging"`

use std::sync::Arc;
use std::time::Duration;

use readvisor::{CycleTracker, LogWriter, Mode, MultiReader, SimEngine, Subscribe, Value};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let engine = SimEngine::new();
    let tracker = Arc::new(CycleTracker::new());

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter), tracker.clone()];
    let reader = MultiReader::builder(engine.clone())
        .with_mode(Mode::SequentialTimed(Duration::from_millis(300)))
        .with_subscribers(subs)
        .build();

    let sources = [
        "plant/pump/flow",
        "plant/pump/pressure",
        "plant/pump/temp",
    ];
    reader
        .set_sources(sources.iter().map(|s| s.to_string()).collect())
        .await?;

    // Each binding answers read commands immediately; a real engine would
    // acquire over its transport instead.
    for (i, src) in sources.iter().enumerate() {
        engine
            .binding(src)
            .unwrap()
            .set_auto_reply(Value::Double(i as f64 * 1.5));
    }

    reader.start().await?;
    tokio::time::sleep(Duration::from_secs(2)).await;

    println!("cycles completed: {}", tracker.cycles_completed());
    for (src, reading) in tracker.snapshot() {
        println!("  {src} -> {:?}", reading.value);
    }

    reader.unset_sources().await?;
    reader.close();
    Ok(())
}
