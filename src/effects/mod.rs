mod comet;
mod supernova;

pub use comet::{ease_out_quad, Comet};
pub use supernova::{Particle, Supernova};

use std::collections::VecDeque;

use egui::{Color32, Pos2};
use log::info;
use rand::rngs::StdRng;

use crate::elements::NewItem;
use crate::settings::SettingsStyle;

/// Burst color for categories whose color is unknown.
pub const FALLBACK_BURST: Color32 = Color32::from_rgba_premultiplied(128, 128, 128, 128);

/// A comet that reached its anchor this frame. The item is ready to be committed.
#[derive(Debug, Clone, PartialEq)]
pub struct Landing {
    pub item: NewItem,
    pub pos: Pos2,
}

/// Owner of all short lived animations. Comets fly one at a time, later ones wait in
/// submission order.
#[derive(Debug)]
pub struct Effects {
    comets: VecDeque<Comet>,
    supernovas: Vec<Supernova>,

    comet_speed: f32,
    particles: usize,
    particle_life: u32,
    flash_decay: f32,

    rng: StdRng,
}

impl Effects {
    pub fn new(style: &SettingsStyle, rng: StdRng) -> Self {
        Self {
            comets: VecDeque::new(),
            supernovas: Vec::new(),
            comet_speed: style.comet_speed,
            particles: style.supernova_particles,
            particle_life: style.particle_life,
            flash_decay: style.flash_decay,
            rng,
        }
    }

    /// Queues the admission animation of `item`.
    pub fn launch_comet(&mut self, item: NewItem, start: Pos2, target: Pos2, color: Option<Color32>) {
        self.comets.push_back(Comet::new(item, start, target, color));
    }

    pub fn trigger_supernova(&mut self, pos: Pos2, color: Option<Color32>) {
        let nova = Supernova::new(
            pos,
            color.unwrap_or(FALLBACK_BURST),
            self.particles,
            self.particle_life,
            &mut self.rng,
        );
        self.supernovas.push(nova);
    }

    /// Ages every effect by one frame and returns the comets that landed.
    pub fn update(&mut self) -> Vec<Landing> {
        self.supernovas.retain(|n| !n.is_finished());
        for nova in &mut self.supernovas {
            nova.advance(self.flash_decay);
        }

        let mut landings = Vec::new();
        let landed = self
            .comets
            .front_mut()
            .is_some_and(|c| c.advance(self.comet_speed));
        if landed {
            if let Some(comet) = self.comets.pop_front() {
                info!("comet with {} landed in {}", comet.item.name, comet.item.category);
                self.trigger_supernova(comet.target, comet.color);
                landings.push(Landing {
                    item: comet.item,
                    pos: comet.target,
                });
            }
        }
        landings
    }

    /// The comet currently in flight.
    pub fn comet(&self) -> Option<&Comet> {
        self.comets.front()
    }

    /// Comets waiting for the one in flight to land.
    pub fn queued(&self) -> usize {
        self.comets.len().saturating_sub(1)
    }

    pub fn supernovas(&self) -> &[Supernova] {
        &self.supernovas
    }

    pub fn is_idle(&self) -> bool {
        self.comets.is_empty() && self.supernovas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Priority;
    use egui::Vec2;
    use rand::SeedableRng;

    fn effects() -> Effects {
        Effects::new(&SettingsStyle::default(), StdRng::seed_from_u64(11))
    }

    fn new_item(name: &str) -> NewItem {
        NewItem::new(name, Some("Bad"), Priority::Normal).unwrap()
    }

    #[test]
    fn comet_lands_once_and_bursts() {
        let mut fx = effects();
        fx.launch_comet(new_item("Seife"), Pos2::ZERO, Pos2::new(50., 50.), None);

        let mut landings = Vec::new();
        for _ in 0..200 {
            landings.extend(fx.update());
        }
        assert_eq!(landings.len(), 1);
        assert_eq!(landings[0].item.name, "Seife");
        assert_eq!(landings[0].pos, Pos2::new(50., 50.));
        assert!(fx.comet().is_none());
    }

    #[test]
    fn landing_triggers_exactly_one_supernova() {
        let mut fx = effects();
        fx.launch_comet(new_item("Seife"), Pos2::ZERO, Pos2::new(50., 50.), None);
        let mut frames = 0;
        while fx.update().is_empty() {
            frames += 1;
            assert!(fx.supernovas().is_empty());
        }
        assert!(frames >= 49);
        assert_eq!(fx.supernovas().len(), 1);
        assert_eq!(fx.supernovas()[0].pos, Pos2::new(50., 50.));
        assert_eq!(fx.supernovas()[0].color, FALLBACK_BURST);
    }

    #[test]
    fn queued_comets_land_in_submission_order() {
        let mut fx = effects();
        fx.launch_comet(new_item("Erste"), Pos2::ZERO, Pos2::new(10., 0.), None);
        fx.launch_comet(new_item("Zweite"), Pos2::ZERO, Pos2::new(20., 0.), None);
        fx.launch_comet(new_item("Dritte"), Pos2::ZERO, Pos2::new(30., 0.), None);
        assert_eq!(fx.queued(), 2);

        let mut order = Vec::new();
        for _ in 0..500 {
            order.extend(fx.update().into_iter().map(|l| l.item.name));
        }
        assert_eq!(order, vec!["Erste", "Zweite", "Dritte"]);
        assert_eq!(fx.queued(), 0);
    }

    #[test]
    fn waiting_comets_do_not_move() {
        let mut fx = effects();
        fx.launch_comet(new_item("Erste"), Pos2::ZERO, Pos2::new(10., 0.), None);
        fx.launch_comet(new_item("Zweite"), Pos2::new(5., 5.), Pos2::new(20., 0.), None);
        fx.update();
        assert_eq!(fx.comets[1].progress, 0.);
        assert_eq!(fx.comets[1].pos, Pos2::new(5., 5.));
    }

    #[test]
    fn spent_supernova_survives_exactly_one_frame() {
        let mut fx = effects();
        fx.supernovas.push(Supernova {
            pos: Pos2::ZERO,
            color: Color32::WHITE,
            flash: 0.,
            particles: vec![Particle {
                pos: Pos2::ZERO,
                vel: Vec2::X,
                life: 1,
                max_life: 1,
                size: 2.,
            }],
        });

        fx.update();
        assert_eq!(fx.supernovas().len(), 1);
        fx.update();
        assert!(fx.supernovas().is_empty());
        assert!(fx.is_idle());
    }

    #[test]
    fn supernova_lives_until_flash_and_particles_are_spent() {
        let mut fx = effects();
        fx.trigger_supernova(Pos2::ZERO, Some(Color32::RED));
        let mut frames = 0;
        while !fx.supernovas().is_empty() {
            fx.update();
            frames += 1;
            assert!(frames < 1000);
        }
        // particles outlive the flash
        assert_eq!(frames, 101);
    }
}
