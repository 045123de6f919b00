//! Scene orchestration.
//!
//! [`Scene`] owns the terrain and every controller. It is built once from a
//! [`SceneConfig`] and then asked to draw frame after frame. Opaque entities
//! are drawn first in a fixed order, the sky and the grass afterwards in the
//! transparent pass.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use cgmath::Vector3;
use log::info;
use rand::Rng;

use crate::{
    data_structures::{
        scene_graph::Hierarchy,
        terrain::{SamplingBudget, Terrain},
    },
    entities::{
        self, FrameContext, Population, Spawn, earth_block::EarthBlock, rgb, sky::Sky,
        snake::Snakes,
    },
    render::{Environment, Renderer},
    resources::{mesh::load_obj_mesh, texture::TextureCache},
};

pub const TERRAIN_LENGTH: f32 = 200.0;

/// Everything needed to build a [`Scene`].
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub terrain_length: f32,
    pub terrain_samples: usize,
    pub trees: usize,
    pub mushrooms: usize,
    pub mosquitoes: usize,
    pub grass: usize,
    pub skulls: usize,
    /// Snakes per travel axis.
    pub snakes: usize,
    pub budget: SamplingBudget,
    /// Directory textures are loaded from. Nothing is loaded when unset.
    pub asset_root: Option<PathBuf>,
    /// OBJ model of the skull. Skulls are left out when unset.
    pub skull_mesh: Option<PathBuf>,
    pub camera_eye: Vector3<f32>,
    pub camera_target: Vector3<f32>,
    pub background: Vector3<f32>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            terrain_length: TERRAIN_LENGTH,
            terrain_samples: entities::earth_block::TERRAIN_SAMPLES,
            trees: entities::tree::QUANTITY,
            mushrooms: entities::mushroom::QUANTITY,
            mosquitoes: entities::mosquito::QUANTITY,
            grass: entities::grass::QUANTITY,
            skulls: entities::skull::QUANTITY,
            snakes: entities::snake::QUANTITY,
            budget: SamplingBudget::default(),
            asset_root: None,
            skull_mesh: None,
            camera_eye: Vector3::new(15.0, 6.0, 6.0),
            camera_target: Vector3::new(0.0, 0.0, 0.0),
            background: rgb(175.0, 238.0, 238.0),
        }
    }
}

impl SceneConfig {
    fn spawn(&self, quantity: usize) -> Spawn {
        Spawn {
            quantity,
            budget: self.budget,
        }
    }
}

pub struct Scene {
    config: SceneConfig,
    terrain: Arc<Terrain>,
    earth_block: EarthBlock,
    sky: Sky,
    trees: Population,
    mushrooms: Population,
    mosquitoes: Population,
    snakes: Snakes,
    skulls: Option<Population>,
    grass: Population,
    textures: TextureCache,
}

impl Scene {
    pub fn new<R: Rng + ?Sized>(config: SceneConfig, rng: &mut R) -> anyhow::Result<Self> {
        let terrain = Arc::new(
            Terrain::generate(config.terrain_length, rng).context("Could not generate terrain")?,
        );
        info!(
            "Generated terrain of length {} with {} bumps",
            terrain.length(),
            terrain.bumps().len()
        );

        let earth_block = EarthBlock::new(&terrain, config.terrain_samples)?;
        let sky = Sky::new()?;
        let trees = entities::tree::population(&terrain, config.spawn(config.trees), rng)?;
        let mushrooms =
            entities::mushroom::population(&terrain, config.spawn(config.mushrooms), rng)?;
        let mosquitoes =
            entities::mosquito::population(&terrain, config.spawn(config.mosquitoes), rng)?;
        let snakes = Snakes::new(terrain.clone(), config.spawn(config.snakes), rng)?;
        let skulls = match &config.skull_mesh {
            Some(path) => {
                let mesh = load_obj_mesh(path)?;
                Some(entities::skull::population(
                    &terrain,
                    mesh,
                    config.spawn(config.skulls),
                    rng,
                )?)
            }
            None => None,
        };
        let grass = entities::grass::population(&terrain, config.spawn(config.grass), rng)?;

        let textures = TextureCache::new(config.asset_root.clone().unwrap_or_default());
        let mut scene = Self {
            config,
            terrain,
            earth_block,
            sky,
            trees,
            mushrooms,
            mosquitoes,
            snakes,
            skulls,
            grass,
            textures,
        };
        if scene.config.asset_root.is_some() {
            scene.load_textures()?;
        }
        info!(
            "Scene ready: {} trees, {} mushrooms, {} mosquitoes, {} snakes, {} skulls, {} grass",
            scene.trees.positions().len(),
            scene.mushrooms.positions().len(),
            scene.mosquitoes.positions().len(),
            scene.snakes.tracks().iter().map(|t| t.positions().len()).sum::<usize>(),
            scene.skulls.as_ref().map_or(0, |s| s.positions().len()),
            scene.grass.positions().len(),
        );
        Ok(scene)
    }

    fn hierarchies(&self) -> Vec<&Hierarchy> {
        let mut hierarchies = vec![self.earth_block.hierarchy(), self.sky.hierarchy()];
        for population in self.populations() {
            hierarchies.extend(population.variants().iter().map(|v| &v.hierarchy));
        }
        hierarchies.extend(self.snakes.tracks().iter().map(|t| t.hierarchy()));
        hierarchies
    }

    /// Texture names referenced by any material, without duplicates.
    pub fn texture_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for hierarchy in self.hierarchies() {
            for node in hierarchy.nodes() {
                if let Some(texture) = &node.drawable.material.texture {
                    if !names.contains(texture) {
                        names.push(texture.clone());
                    }
                }
            }
        }
        names
    }

    fn load_textures(&mut self) -> anyhow::Result<()> {
        for name in self.texture_names() {
            self.textures.load(&name)?;
        }
        info!("Loaded {} textures", self.textures.len());
        Ok(())
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn terrain(&self) -> &Arc<Terrain> {
        &self.terrain
    }

    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    pub fn populations(&self) -> impl Iterator<Item = &Population> {
        [&self.trees, &self.mushrooms, &self.mosquitoes]
            .into_iter()
            .chain(self.skulls.as_ref())
            .chain([&self.grass])
    }

    pub fn snakes(&self) -> &Snakes {
        &self.snakes
    }

    /// Frame seen from the configured camera at `time`.
    pub fn frame_context(&self, time: f32) -> FrameContext {
        FrameContext::looking_at(time, self.config.camera_eye, self.config.camera_target)
    }

    /// Draws one frame at `time` seconds.
    pub fn frame<R: Renderer + ?Sized>(&mut self, time: f32, renderer: &mut R) -> anyhow::Result<()> {
        let frame = self.frame_context(time);
        renderer.begin_frame(&Environment {
            light: frame.camera_position,
            background: self.config.background,
            time,
        });

        self.earth_block.display(renderer)?;
        self.trees.display(&frame, renderer)?;
        self.mushrooms.display(&frame, renderer)?;
        self.mosquitoes.display(&frame, renderer)?;
        self.snakes.display(&frame, renderer)?;
        if let Some(skulls) = &mut self.skulls {
            skulls.display(&frame, renderer)?;
        }

        self.sky.display(&frame, renderer)?;
        self.grass.display(&frame, renderer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawRecorder, RenderPass};
    use rand::{SeedableRng, rngs::StdRng};

    fn small() -> SceneConfig {
        SceneConfig {
            terrain_samples: 8,
            trees: 2,
            mushrooms: 2,
            mosquitoes: 2,
            grass: 2,
            skulls: 1,
            snakes: 1,
            ..Default::default()
        }
    }

    #[test]
    fn opaque_pass_precedes_transparent_pass() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut scene = Scene::new(small(), &mut rng).unwrap();
        let mut recorder = DrawRecorder::default();
        scene.frame(1.0, &mut recorder).unwrap();

        let calls = recorder.calls();
        assert_eq!(calls[0].label, "earth_base");
        let first_transparent = calls
            .iter()
            .position(|c| c.pass == RenderPass::Transparent)
            .unwrap();
        assert!(calls[first_transparent..]
            .iter()
            .all(|c| c.pass == RenderPass::Transparent));
        assert_eq!(calls[first_transparent].label, "sky_layer_1");
        assert_eq!(calls.last().unwrap().label, "grass");
    }

    #[test]
    fn environment_follows_the_camera() {
        let mut rng = StdRng::seed_from_u64(22);
        let mut scene = Scene::new(small(), &mut rng).unwrap();
        let mut recorder = DrawRecorder::default();
        scene.frame(2.5, &mut recorder).unwrap();

        let environment = recorder.environment().unwrap();
        assert_eq!(environment.light, Vector3::new(15.0, 6.0, 6.0));
        assert_eq!(environment.time, 2.5);
        assert_eq!(environment.background, rgb(175.0, 238.0, 238.0));
    }

    #[test]
    fn textures_are_listed_once() {
        let mut rng = StdRng::seed_from_u64(23);
        let scene = Scene::new(small(), &mut rng).unwrap();
        let names = scene.texture_names();
        assert!(names.contains(&"sky.png".to_string()));
        assert!(names.contains(&"earth.jpeg".to_string()));
        assert_eq!(names.iter().filter(|n| *n == "sky.png").count(), 1);
        assert!(scene.textures().is_empty());
    }

    #[test]
    fn missing_skull_model_fails_construction() {
        let mut rng = StdRng::seed_from_u64(24);
        let config = SceneConfig {
            skull_mesh: Some(PathBuf::from("no/such/skull.obj")),
            ..small()
        };
        assert!(Scene::new(config, &mut rng).is_err());
    }
}
