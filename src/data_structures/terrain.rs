//! Gaussian bump terrain and the position sampling service.
//!
//! A [`Terrain`] is a sum of isotropic Gaussian bumps generated once from a
//! side length. It is immutable afterwards, so controllers share it behind an
//! `Arc` and query heights or sample spawn positions from it.

use cgmath::{InnerSpace, Vector2, Vector3};
use rand::Rng;

use crate::data_structures::mesh::{Mesh, index_count};
use crate::error::{MeshError, TerrainError};

pub const BUMP_COUNT: usize = 200;
pub const BUMP_HEIGHT_MAX: f32 = 6.0;
pub const BUMP_SIGMA_MIN: u32 = 4;
pub const BUMP_SIGMA_MAX: u32 = 10;
/// Share of the terrain side the bump centers are spread over.
pub const BUMP_EXTENT_RATIO: f32 = 0.8;

/// Minimum distance between two spaced spawn positions.
pub const MIN_DISTANCE: f32 = 6.0;
/// Minimum per axis offset between two spaced spawn positions.
pub const MIN_AXIS_OFFSET: f32 = 0.2;
/// Flying entities hover this far above the ground.
pub const FLYING_ALTITUDE: (f32, f32) = (2.0, 10.0);

const UV_TILING: f32 = 50.0;

/// Upper bound on rejection sampling candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplingBudget {
    pub max_attempts: usize,
}

impl Default for SamplingBudget {
    fn default() -> Self {
        Self {
            max_attempts: 1_000_000,
        }
    }
}

/// How spawn positions are drawn from the terrain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub quantity: usize,
    /// Side of the square window, centered on the origin, the positions are drawn from.
    pub extent: f32,
    pub flying: bool,
    pub distance_check: bool,
}

impl Placement {
    pub fn new(quantity: usize, extent: f32) -> Self {
        Self {
            quantity,
            extent,
            flying: false,
            distance_check: false,
        }
    }

    pub fn flying(mut self) -> Self {
        self.flying = true;
        self
    }

    pub fn spaced(mut self) -> Self {
        self.distance_check = true;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bump {
    pub center: Vector2<f32>,
    pub height: f32,
    pub sigma: u32,
}

impl Bump {
    pub fn contribution(&self, point: Vector2<f32>) -> f32 {
        let d = (point - self.center).magnitude() / self.sigma as f32;
        self.height * (-d * d).exp()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Terrain {
    length: f32,
    bumps: Vec<Bump>,
}

impl Terrain {
    /// Generates a fresh bump field for a terrain of side `length`.
    pub fn generate<R: Rng + ?Sized>(length: f32, rng: &mut R) -> Result<Self, TerrainError> {
        Self::generate_with_budget(length, rng, SamplingBudget::default())
    }

    pub fn generate_with_budget<R: Rng + ?Sized>(
        length: f32,
        rng: &mut R,
        budget: SamplingBudget,
    ) -> Result<Self, TerrainError> {
        let length = checked_length(length)?;
        let half = sampling_half_width(length * BUMP_EXTENT_RATIO)?;
        let centers = reject_sample(BUMP_COUNT, half, budget, rng, |accepted, candidate| {
            accepted
                .iter()
                .all(|p| (p - candidate).magnitude() >= MIN_DISTANCE)
        })?;

        let bumps = centers
            .into_iter()
            .map(|center| Bump {
                center,
                height: rng.random_range(-BUMP_HEIGHT_MAX..=BUMP_HEIGHT_MAX),
                sigma: rng.random_range(BUMP_SIGMA_MIN..=BUMP_SIGMA_MAX),
            })
            .collect();

        Ok(Self { length, bumps })
    }

    /// Terrain with explicit bumps.
    pub fn from_bumps(length: f32, bumps: Vec<Bump>) -> Result<Self, TerrainError> {
        let length = checked_length(length)?;
        Ok(Self { length, bumps })
    }

    /// Terrain without bumps, height zero everywhere.
    pub fn flat(length: f32) -> Result<Self, TerrainError> {
        Self::from_bumps(length, Vec::new())
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn bumps(&self) -> &[Bump] {
        &self.bumps
    }

    pub fn height(&self, x: f32, y: f32) -> f32 {
        let point = Vector2::new(x, y);
        self.bumps.iter().map(|b| b.contribution(point)).sum()
    }

    /// Height field over `[-L/2, L/2]²` sampled on a `samples × samples` grid.
    pub fn mesh(&self, samples: usize) -> Result<Mesh, MeshError> {
        if samples < 2 {
            return Err(MeshError::TooFewSamples { samples, min: 2 });
        }
        let n = samples;
        let step = (n - 1) as f32;
        let row = index_count(n)?;
        index_count(n.checked_mul(n).unwrap_or(usize::MAX))?;

        let mut mesh = Mesh::new();
        mesh.positions.reserve(n * n);
        mesh.uvs.reserve(n * n);
        for ku in 0..n {
            for kv in 0..n {
                let u = ku as f32 / step;
                let v = kv as f32 / step;
                let x = (u - 0.5) * self.length;
                let y = (v - 0.5) * self.length;
                mesh.positions.push(Vector3::new(x, y, self.height(x, y)));
                mesh.uvs.push(Vector2::new(UV_TILING * u, UV_TILING * v));
            }
        }

        for ku in 0..row - 1 {
            for kv in 0..row - 1 {
                let idx = kv + row * ku;
                mesh.triangles.push([idx, idx + 1 + row, idx + 1]);
                mesh.triangles.push([idx, idx + row, idx + 1 + row]);
            }
        }

        Ok(mesh)
    }

    /// Rejection samples spawn positions resting on (or flying above) the terrain.
    pub fn sample_positions<R: Rng + ?Sized>(
        &self,
        placement: Placement,
        budget: SamplingBudget,
        rng: &mut R,
    ) -> Result<Vec<Vector3<f32>>, TerrainError> {
        let half = sampling_half_width(placement.extent)?;
        let points = reject_sample(placement.quantity, half, budget, rng, |accepted, c| {
            !placement.distance_check || accepted.iter().all(|p| well_spaced(*p, c))
        })?;

        Ok(points
            .into_iter()
            .map(|p| {
                let mut z = self.height(p.x, p.y);
                if placement.flying {
                    z += rng.random_range(FLYING_ALTITUDE.0..=FLYING_ALTITUDE.1);
                }
                Vector3::new(p.x, p.y, z)
            })
            .collect())
    }
}

/// Whether `b` keeps the minimum distance and the per axis offset from `a`.
pub fn well_spaced(a: Vector2<f32>, b: Vector2<f32>) -> bool {
    (a - b).magnitude() >= MIN_DISTANCE
        && (a.x - b.x).abs() >= MIN_AXIS_OFFSET
        && (a.y - b.y).abs() >= MIN_AXIS_OFFSET
}

fn checked_length(length: f32) -> Result<f32, TerrainError> {
    if length.is_finite() && length > 0.0 {
        Ok(length)
    } else {
        Err(TerrainError::InvalidLength(length))
    }
}

/// Half width of the sampling window, one unit inside the extent border.
fn sampling_half_width(extent: f32) -> Result<f32, TerrainError> {
    let half = extent / 2.0 - 1.0;
    if half.is_finite() && half > 0.0 {
        Ok(half)
    } else {
        Err(TerrainError::InvalidExtent(extent))
    }
}

fn reject_sample<R, F>(
    quantity: usize,
    half: f32,
    budget: SamplingBudget,
    rng: &mut R,
    accept: F,
) -> Result<Vec<Vector2<f32>>, TerrainError>
where
    R: Rng + ?Sized,
    F: Fn(&[Vector2<f32>], Vector2<f32>) -> bool,
{
    let mut accepted = Vec::with_capacity(quantity);
    let mut attempts = 0;
    while accepted.len() < quantity {
        if attempts == budget.max_attempts {
            return Err(TerrainError::SamplingExhausted {
                requested: quantity,
                placed: accepted.len(),
                attempts,
            });
        }
        attempts += 1;
        let candidate = Vector2::new(rng.random_range(-half..half), rng.random_range(-half..half));
        if accept(&accepted, candidate) {
            accepted.push(candidate);
        }
    }
    log::debug!(
        "placed {} positions in {} attempts",
        accepted.len(),
        attempts
    );
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bump(x: f32, y: f32, height: f32, sigma: u32) -> Bump {
        Bump {
            center: Vector2::new(x, y),
            height,
            sigma,
        }
    }

    #[test]
    fn bump_peak_is_exact_at_its_center() {
        let terrain = Terrain::from_bumps(100.0, vec![bump(3.0, -4.0, 5.5, 7)]).unwrap();
        assert_eq!(terrain.height(3.0, -4.0), 5.5);
        let one_sigma = terrain.height(10.0, -4.0);
        assert!((one_sigma - 5.5 * (-1.0f32).exp()).abs() < 1e-5);
    }

    #[test]
    fn generated_bumps_respect_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let terrain = Terrain::generate(200.0, &mut rng).unwrap();
        assert_eq!(terrain.bumps().len(), BUMP_COUNT);
        let half = 200.0 * BUMP_EXTENT_RATIO / 2.0 - 1.0;
        for (i, b) in terrain.bumps().iter().enumerate() {
            assert!(b.height.abs() <= BUMP_HEIGHT_MAX);
            assert!((BUMP_SIGMA_MIN..=BUMP_SIGMA_MAX).contains(&b.sigma));
            assert!(b.center.x.abs() <= half && b.center.y.abs() <= half);
            for other in &terrain.bumps()[i + 1..] {
                assert!((b.center - other.center).magnitude() >= MIN_DISTANCE);
            }
        }
    }

    #[test]
    fn height_is_bounded_and_continuous() {
        let mut rng = StdRng::seed_from_u64(11);
        let terrain = Terrain::generate(200.0, &mut rng).unwrap();
        let bound = BUMP_COUNT as f32 * BUMP_HEIGHT_MAX;
        for i in -20..=20 {
            for j in -20..=20 {
                let (x, y) = (i as f32 * 5.0, j as f32 * 5.0);
                let z = terrain.height(x, y);
                assert!(z.is_finite() && z.abs() <= bound);
                assert!((terrain.height(x + 1e-3, y) - z).abs() < 0.01);
            }
        }
    }

    #[test]
    fn terrain_mesh_layout_and_winding() {
        let terrain = Terrain::flat(10.0).unwrap();
        let mesh = terrain.mesh(3).unwrap();
        assert_eq!(mesh.vertex_count(), 9);
        assert_eq!(mesh.triangle_count(), 8);
        assert_eq!(mesh.triangles[0], [0, 4, 1]);
        assert_eq!(mesh.triangles[1], [0, 3, 4]);
        // index kv + N * ku, x follows ku
        assert_eq!(mesh.positions[1], Vector3::new(-5.0, 0.0, 0.0));
        assert_eq!(mesh.positions[3], Vector3::new(0.0, -5.0, 0.0));
        assert_eq!(mesh.uvs[8], Vector2::new(50.0, 50.0));
        for n in mesh.normals() {
            assert!((n - Vector3::unit_z()).magnitude() < 1e-6);
        }
    }

    #[test]
    fn terrain_mesh_needs_two_samples() {
        let terrain = Terrain::flat(10.0).unwrap();
        assert_eq!(
            terrain.mesh(1).unwrap_err(),
            MeshError::TooFewSamples { samples: 1, min: 2 }
        );
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn terrain_mesh_refuses_grids_past_u32_indices() {
        let terrain = Terrain::flat(10.0).unwrap();
        let samples = 70_000;
        assert_eq!(
            terrain.mesh(samples).unwrap_err(),
            MeshError::TooManyVertices {
                count: samples * samples
            }
        );
    }

    #[test]
    fn spaced_sampling_on_small_terrain() {
        let mut rng = StdRng::seed_from_u64(3);
        let terrain = Terrain::flat(20.0).unwrap();
        let positions = terrain
            .sample_positions(Placement::new(5, 20.0).spaced(), SamplingBudget::default(), &mut rng)
            .unwrap();
        assert_eq!(positions.len(), 5);
        for (i, p) in positions.iter().enumerate() {
            assert!(p.x.abs() <= 9.0 && p.y.abs() <= 9.0);
            assert_eq!(p.z, 0.0);
            for q in &positions[i + 1..] {
                assert!(well_spaced(p.truncate(), q.truncate()));
            }
        }
    }

    #[test]
    fn flying_positions_hover_above_ground() {
        let mut rng = StdRng::seed_from_u64(5);
        let terrain = Terrain::from_bumps(50.0, vec![bump(0.0, 0.0, 3.0, 6)]).unwrap();
        let positions = terrain
            .sample_positions(Placement::new(40, 45.0).flying(), SamplingBudget::default(), &mut rng)
            .unwrap();
        for p in positions {
            let altitude = p.z - terrain.height(p.x, p.y);
            assert!((FLYING_ALTITUDE.0 - 1e-4..=FLYING_ALTITUDE.1 + 1e-4).contains(&altitude));
        }
    }

    #[test]
    fn infeasible_request_fails_instead_of_hanging() {
        let mut rng = StdRng::seed_from_u64(1);
        let terrain = Terrain::flat(10.0).unwrap();
        let err = terrain
            .sample_positions(
                Placement::new(50, 10.0).spaced(),
                SamplingBudget { max_attempts: 5_000 },
                &mut rng,
            )
            .unwrap_err();
        match err {
            TerrainError::SamplingExhausted {
                requested,
                placed,
                attempts,
            } => {
                assert_eq!(requested, 50);
                assert!(placed < 50);
                assert_eq!(attempts, 5_000);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        assert_eq!(Terrain::flat(0.0).unwrap_err(), TerrainError::InvalidLength(0.0));
        let terrain = Terrain::flat(10.0).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            terrain
                .sample_positions(Placement::new(1, 2.0), SamplingBudget::default(), &mut rng)
                .unwrap_err(),
            TerrainError::InvalidExtent(2.0)
        );
    }

    #[test]
    fn zero_quantity_yields_no_positions() {
        let terrain = Terrain::flat(10.0).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let positions = terrain
            .sample_positions(Placement::new(0, 10.0), SamplingBudget::default(), &mut rng)
            .unwrap();
        assert!(positions.is_empty());
    }
}
