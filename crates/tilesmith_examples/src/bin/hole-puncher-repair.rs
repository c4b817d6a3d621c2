use tilesmith::prelude::*;
use tilesmith_examples::{init_tracing, render_ascii};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut pipeline = Pipeline::new();
    pipeline.add_stage(
        "densityrandom",
        Settings::new()
            .with_choice("tile1", "wall")
            .with_choice("tile2", "empty")
            .with_number("target_density", 1.5),
    )?;
    pipeline.add_stage("holepuncher", Settings::new().with_number("punch_rate", 0.3))?;

    let mut map = TileMap::new(32, 18)?;
    let mut sink = VecSink::new();
    let report = pipeline.run_with_events(&mut map, "repair", &mut sink);

    let highlights = sink
        .as_slice()
        .iter()
        .filter(|e| e.kind() == PipelineEventKind::Computation)
        .count();
    info!(
        "{} stages run, {} region highlights while repairing connectivity",
        report.stages_run.len(),
        highlights
    );

    println!("{}", render_ascii(&map)?);
    Ok(())
}
