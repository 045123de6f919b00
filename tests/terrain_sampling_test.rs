use glade_ngin::{
    Vector2,
    data_structures::terrain::{Bump, Placement, SamplingBudget, Terrain},
    error::TerrainError,
};

mod common;
use common::test_utils::seeded;

#[test]
fn five_spaced_positions_on_a_small_terrain() {
    let mut rng = seeded(5);
    let terrain = Terrain::flat(20.0).unwrap();
    let placement = Placement::new(5, terrain.length()).spaced();
    let points = terrain
        .sample_positions(placement, SamplingBudget::default(), &mut rng)
        .unwrap();

    assert_eq!(points.len(), 5);
    let bound = terrain.length() / 2.0 - 1.0;
    for p in &points {
        assert!(p.x.abs() <= bound && p.y.abs() <= bound);
        assert_eq!(p.z, 0.0);
    }
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let d = Vector2::new(a.x - b.x, a.y - b.y);
            assert!((d.x * d.x + d.y * d.y).sqrt() >= 6.0);
            assert!(d.x.abs() >= 0.2 && d.y.abs() >= 0.2);
        }
    }
}

#[test]
fn generated_terrain_stays_bounded() {
    let mut rng = seeded(11);
    let terrain = Terrain::generate(200.0, &mut rng).unwrap();
    let limit: f32 = terrain.bumps().iter().map(|b| b.height.abs()).sum();
    for k in -20..=20 {
        let x = k as f32 * 5.0;
        let h = terrain.height(x, -x / 2.0);
        assert!(h.is_finite());
        assert!(h.abs() <= limit + 1e-3);
    }
    for bump in terrain.bumps() {
        assert!(bump.height.abs() <= 6.0);
        assert_eq!(bump.contribution(bump.center), bump.height);
    }
}

#[test]
fn flying_positions_hover_above_the_ground() {
    let mut rng = seeded(3);
    let terrain = Terrain::from_bumps(
        40.0,
        vec![Bump {
            center: Vector2::new(0.0, 0.0),
            height: 3.0,
            sigma: 5,
        }],
    )
    .unwrap();
    let placement = Placement::new(4, 30.0).flying();
    let points = terrain
        .sample_positions(placement, SamplingBudget::default(), &mut rng)
        .unwrap();
    for p in points {
        let lift = p.z - terrain.height(p.x, p.y);
        assert!((2.0 - 1e-4..=10.0 + 1e-4).contains(&lift));
    }
}

#[test]
fn crowded_placement_runs_out_of_attempts() {
    let mut rng = seeded(8);
    let terrain = Terrain::flat(20.0).unwrap();
    let placement = Placement::new(100, terrain.length()).spaced();
    let err = terrain
        .sample_positions(placement, SamplingBudget { max_attempts: 5_000 }, &mut rng)
        .unwrap_err();
    assert!(matches!(err, TerrainError::SamplingExhausted { .. }));
}
