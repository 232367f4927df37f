//! Concurrent sweep: independent refresh, no cycle events.
//!
//! Run with: `cargo run --example concurrent --features sim`

use readvisor::{EventKind, Mode, MultiReader, SimEngine, Value};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let engine = SimEngine::new();
    let reader = MultiReader::builder(engine.clone())
        .with_mode(Mode::Concurrent)
        .build();
    let mut events = reader.subscribe();

    reader
        .set_sources(vec!["sensor/left".into(), "sensor/right".into()])
        .await?;

    // Concurrent readers run their own cadence; a period change is
    // broadcast to every binding instead of arming a scheduler timer.
    reader.set_period(250).await?;

    // Stand in for the engine pushing spontaneous updates.
    for i in 0..3 {
        engine.push("sensor/left", Value::Int(i));
        engine.push("sensor/right", Value::Int(10 + i));
    }

    let mut updates = 0;
    while updates < 6 {
        let ev = events.recv().await?;
        assert!(ev.kind != EventKind::CycleComplete);
        if ev.kind == EventKind::Update {
            updates += 1;
            println!(
                "update #{updates}: src={:?} value={:?}",
                ev.src,
                ev.reading.as_ref().map(|r| &r.value)
            );
        }
    }

    println!(
        "left binding received: {:?}",
        engine.binding("sensor/left").unwrap().commands()
    );
    reader.close();
    Ok(())
}
