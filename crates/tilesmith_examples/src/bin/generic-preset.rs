use tilesmith::prelude::*;
use tilesmith_examples::{init_tracing, render_ascii};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let seed = std::env::args().nth(1).unwrap_or_else(|| "arena".to_owned());

    let mut pipeline = Pipeline::new();
    pipeline.apply_preset(&Preset::generic())?;

    let mut map = TileMap::new(40, 24)?;
    let report = pipeline.run(&mut map, &seed);

    for failure in &report.failures {
        info!(
            "Stage {} '{}' failed: {}",
            failure.index, failure.name, failure.message
        );
    }
    info!(
        "Seed '{}': {} stages run, sub-seeds {:?}",
        seed, report.stages_run.len(), report.sub_seeds
    );

    println!("{}", render_ascii(&map)?);
    Ok(())
}
