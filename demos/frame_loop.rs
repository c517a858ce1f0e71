use flat_broadphase::{EntityType, GridConfig, QueryResults, Shape, SparseGrid};
use std::time::Instant;

const ENTITIES: u64 = 1000;
const QUERIES: usize = 1000;
const FRAMES: usize = 100;

fn main() -> Result<(), flat_broadphase::GridError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Built once, reused by every frame
    let mut grid = SparseGrid::from_config(GridConfig::default())?;
    let mut results = QueryResults::with_capacity(64);

    for frame in 0..FRAMES {
        let start = Instant::now();

        grid.clear();
        for i in 0..ENTITIES {
            let center = [fastrand::f32() * 20.0, fastrand::f32() * 20.0];
            grid.add_shape(
                Shape::circle(center, fastrand::f32() * 2.0),
                EntityType::Enemy,
                i,
            );
        }

        let mut count = 0;
        for _ in 0..QUERIES {
            let center = [fastrand::f32() * 20.0, fastrand::f32() * 20.0];
            grid.query_around(center, 2.0, Some(EntityType::Enemy), &mut results);
            count += results.len();
        }

        let stats = grid.stats();
        tracing::info!(
            frame,
            count,
            cells = stats.occupied_cells,
            records = stats.records,
            elapsed_us = start.elapsed().as_micros() as u64,
            "frame done"
        );
    }

    Ok(())
}
