use std::collections::HashMap;
use std::f32::consts::PI;

use egui::{Pos2, Rect, Vec2};
use log::debug;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::Undirected;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::forces::{Body, CategoryAttraction, Center, Collide, Force, ManyBody};
use crate::elements::Item;
use crate::layouts::CategoryLayout;
use crate::settings::SettingsSimulation;

/// Upper bound of positional collision passes per tick.
const PROJECTION_PASSES: usize = 16;

/// A node owned by the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub item: Item,
    pub pos: Pos2,
    pub vel: Vec2,
    pub anchor: Pos2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub alpha: f32,
    pub alpha_target: f32,
    pub ticks: u64,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            alpha: 1.,
            alpha_target: 0.,
            ticks: 0,
        }
    }
}

/// Iterative layout of item nodes. The only owner of node positions and velocities.
#[derive(Debug)]
pub struct Simulation {
    settings: SettingsSimulation,
    state: SimulationState,
    center: Pos2,

    g: StableGraph<Star, (), Undirected>,
    by_id: HashMap<String, NodeIndex>,

    rng: StdRng,
    // Reusable body buffer to avoid per-frame allocations
    scratch: Vec<Body>,
}

impl Simulation {
    pub fn new(settings: SettingsSimulation, viewport: Rect) -> Self {
        Self::with_rng(settings, viewport, StdRng::from_os_rng())
    }

    /// Deterministic simulation for tests and benchmarks.
    pub fn with_seed(settings: SettingsSimulation, viewport: Rect, seed: u64) -> Self {
        Self::with_rng(settings, viewport, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: SettingsSimulation, viewport: Rect, rng: StdRng) -> Self {
        Self {
            settings,
            state: SimulationState::default(),
            center: viewport.center(),
            g: StableGraph::default(),
            by_id: HashMap::new(),
            rng,
            scratch: Vec::new(),
        }
    }

    pub fn state(&self) -> SimulationState {
        self.state.clone()
    }

    pub fn alpha(&self) -> f32 {
        self.state.alpha
    }

    pub fn is_settled(&self) -> bool {
        self.state.alpha < self.settings.alpha_min
    }

    pub fn node_count(&self) -> usize {
        self.g.node_count()
    }

    pub fn stars(&self) -> impl Iterator<Item = &Star> {
        self.g.node_weights()
    }

    pub fn star(&self, id: &str) -> Option<&Star> {
        self.by_id.get(id).and_then(|idx| self.g.node_weight(*idx))
    }

    /// Restarts ticking with the reheat energy. Never lowers the current alpha.
    pub fn reheat(&mut self) {
        debug!("simulation reheated, alpha {}", self.state.alpha);
        self.state.alpha = self.state.alpha.max(self.settings.alpha_reheat);
    }

    /// Replaces the node set with the snapshot. Surviving ids keep their position and
    /// velocity, new ids are placed around their category anchor.
    pub fn set_nodes(&mut self, items: &[Item], layout: &mut CategoryLayout) {
        let mut changed = items.len() != self.by_id.len();

        let keep: HashMap<&str, &Item> = items.iter().map(|i| (i.id.as_str(), i)).collect();
        let gone: Vec<String> = self
            .by_id
            .keys()
            .filter(|id| !keep.contains_key(id.as_str()))
            .cloned()
            .collect();
        for id in gone {
            if let Some(idx) = self.by_id.remove(&id) {
                self.g.remove_node(idx);
                changed = true;
            }
        }

        let mut per_category: HashMap<String, usize> = HashMap::new();
        for star in self.g.node_weights() {
            *per_category.entry(star.item.category.clone()).or_default() += 1;
        }

        for item in items {
            let anchor = layout.resolve(&item.category);
            if let Some(idx) = self.by_id.get(&item.id) {
                if let Some(star) = self.g.node_weight_mut(*idx) {
                    if star.item.category != item.category || star.item.assigned_to != item.assigned_to
                    {
                        changed = true;
                    }
                    star.item = item.clone();
                    star.anchor = anchor;
                }
                continue;
            }

            let n = per_category.entry(item.category.clone()).or_default();
            let pos = anchor + phyllotaxis(*n);
            *n += 1;

            let idx = self.g.add_node(Star {
                item: item.clone(),
                pos,
                vel: Vec2::ZERO,
                anchor,
            });
            self.by_id.insert(item.id.clone(), idx);
            changed = true;
        }

        if changed {
            self.reheat();
        }
    }

    /// Adopts new category anchors and a new center after the viewport changed.
    pub fn set_viewport(&mut self, layout: &mut CategoryLayout) {
        self.center = layout.viewport().center();
        for star in self.g.node_weights_mut() {
            star.anchor = layout.resolve(&star.item.category);
        }
        self.reheat();
    }

    /// Advances the simulation by one step. A settled simulation does nothing.
    pub fn tick(&mut self) {
        if self.g.node_count() == 0 || self.is_settled() {
            return;
        }

        let s = &self.settings;
        self.state.alpha += (self.state.alpha_target - self.state.alpha) * s.alpha_decay;
        let alpha = self.state.alpha;

        let indices: Vec<NodeIndex> = self.g.node_indices().collect();
        self.scratch.clear();
        for idx in &indices {
            let Some(star) = self.g.node_weight(*idx) else {
                continue;
            };
            self.scratch.push(Body {
                pos: star.pos,
                vel: star.vel,
                anchor: star.anchor,
                radius: if star.item.is_assigned() {
                    s.collision_radius_assigned
                } else {
                    s.collision_radius
                },
            });
        }

        let many_body = ManyBody {
            strength: s.charge_strength,
        };
        let center = Center {
            center: self.center,
            strength: s.center_strength,
        };
        let collide = Collide {
            iterations: s.collision_iterations,
        };
        let attraction = CategoryAttraction {
            strength: s.category_strength,
        };
        let forces: [&dyn Force; 4] = [&many_body, &center, &collide, &attraction];
        for force in forces {
            force.apply(&mut self.scratch, alpha, &mut self.rng);
        }

        let keep = 1. - s.velocity_decay;
        for b in &mut self.scratch {
            b.vel *= keep;
            b.pos += b.vel;
        }
        Collide::project(&mut self.scratch, PROJECTION_PASSES, &mut self.rng);

        for (idx, b) in indices.iter().zip(&self.scratch) {
            if !b.pos.x.is_finite() || !b.pos.y.is_finite() {
                continue;
            }
            if let Some(star) = self.g.node_weight_mut(*idx) {
                star.pos = b.pos;
                star.vel = b.vel;
            }
        }
        self.state.ticks += 1;
    }

    /// Nearest node within `radius` of `pos`, both in world units.
    pub fn node_at(&self, pos: Pos2, radius: f32) -> Option<&Star> {
        crate::interaction::nearest_within(self.g.node_weights(), pos, radius, |s| s.pos)
    }
}

/// Offset of the `n`-th new node around its anchor.
fn phyllotaxis(n: usize) -> Vec2 {
    let golden = PI * (3. - 5_f32.sqrt());
    let r = 10. * (0.5 + n as f32).sqrt();
    Vec2::angled(n as f32 * golden) * r
}
