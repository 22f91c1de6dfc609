use egui::Vec2;
use serde::{Deserialize, Serialize};

use crate::ColorSpec;

/// Parameters of the force simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSimulation {
    /// Many-body strength, negative values repel
    pub charge_strength: f32,

    /// Strength of the centroid recentering, 1.0 recenters fully every tick
    pub center_strength: f32,

    /// Pull towards the category anchor on both axes
    pub category_strength: f32,

    /// Collision radius for nodes without an assignee
    pub collision_radius: f32,

    /// Collision radius for assigned nodes, larger because of the ring decoration
    pub collision_radius_assigned: f32,

    /// Collision passes per tick
    pub collision_iterations: usize,

    /// Alpha the simulation restarts with after a structural change
    pub alpha_reheat: f32,

    /// Below this alpha the simulation counts as settled
    pub alpha_min: f32,

    /// Fraction of the distance to the target alpha covered per tick
    pub alpha_decay: f32,

    /// Fraction of velocity lost per tick
    pub velocity_decay: f32,
}

impl Default for SettingsSimulation {
    fn default() -> Self {
        let alpha_min: f32 = 0.001;
        Self {
            charge_strength: -150.,
            center_strength: 1.,
            category_strength: 0.05,
            collision_radius: 30.,
            collision_radius_assigned: 35.,
            collision_iterations: 1,
            alpha_reheat: 0.3,
            alpha_min,
            // settles from alpha 1 in about 300 ticks
            alpha_decay: 1. - alpha_min.powf(1. / 300.),
            velocity_decay: 0.4,
        }
    }
}

impl SettingsSimulation {
    pub fn with_charge_strength(mut self, strength: f32) -> Self {
        self.charge_strength = strength;
        self
    }

    pub fn with_category_strength(mut self, strength: f32) -> Self {
        self.category_strength = strength;
        self
    }

    pub fn with_collision_radii(mut self, unassigned: f32, assigned: f32) -> Self {
        self.collision_radius = unassigned;
        self.collision_radius_assigned = assigned;
        self
    }

    pub fn with_alpha_reheat(mut self, alpha: f32) -> Self {
        self.alpha_reheat = alpha;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsNavigation {
    /// Zoom and pan
    pub zoom_and_pan_enabled: bool,

    /// Lower zoom bound
    pub zoom_min: f32,

    /// Upper zoom bound
    pub zoom_max: f32,

    /// Zoom step applied per unit of scroll
    pub zoom_speed: f32,
}

impl Default for SettingsNavigation {
    fn default() -> Self {
        Self {
            zoom_and_pan_enabled: true,
            zoom_min: 0.2,
            zoom_max: 5.,
            zoom_speed: 0.002,
        }
    }
}

impl SettingsNavigation {
    pub fn with_zoom_and_pan_enabled(mut self, enabled: bool) -> Self {
        self.zoom_and_pan_enabled = enabled;
        self
    }

    pub fn with_zoom_bounds(mut self, min: f32, max: f32) -> Self {
        self.zoom_min = min;
        self.zoom_max = max;
        self
    }

    pub fn with_zoom_speed(mut self, speed: f32) -> Self {
        self.zoom_speed = speed;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsInteraction {
    /// Hover highlighting of stars and nebulas
    pub hover_enabled: bool,

    /// Clicking stars publishes click events
    pub click_enabled: bool,

    /// Screen-space radius in which a pointer hits a star
    pub node_hit_radius: f32,

    /// Screen-space radius in which a pointer activates a nebula
    pub nebula_activation_radius: f32,
}

impl Default for SettingsInteraction {
    fn default() -> Self {
        Self {
            hover_enabled: true,
            click_enabled: true,
            node_hit_radius: 50.,
            nebula_activation_radius: 250.,
        }
    }
}

impl SettingsInteraction {
    pub fn with_hover_enabled(mut self, enabled: bool) -> Self {
        self.hover_enabled = enabled;
        self
    }

    pub fn with_click_enabled(mut self, enabled: bool) -> Self {
        self.click_enabled = enabled;
        self
    }

    pub fn with_node_hit_radius(mut self, radius: f32) -> Self {
        self.node_hit_radius = radius;
        self
    }
}

/// Anchor of a well known category, as a fraction of the viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredefinedAnchor {
    pub name: String,
    pub fraction: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsStyle {
    /// Categories with a fixed place in the viewport
    pub predefined_anchors: Vec<PredefinedAnchor>,

    /// Radius of the circle other categories are placed on
    pub anchor_radius: f32,

    /// Angle of the first radial slot in degrees
    pub anchor_start_angle: f32,

    /// Angle between radial slots in degrees
    pub anchor_angle_step: f32,

    /// Per-frame change of the category title opacity
    pub title_fade_step: f32,

    /// Comet progress per frame
    pub comet_speed: f32,

    pub supernova_particles: usize,
    pub particle_life: u32,

    /// Per-frame decay of the supernova flash
    pub flash_decay: f32,

    /// Background stars drawn beneath the galaxy, 0 disables the backdrop
    pub starfield_stars: usize,
}

impl Default for SettingsStyle {
    fn default() -> Self {
        Self {
            predefined_anchors: vec![
                PredefinedAnchor {
                    name: "Küche".to_string(),
                    fraction: Vec2::new(0.3, 0.4),
                },
                PredefinedAnchor {
                    name: "Bad".to_string(),
                    fraction: Vec2::new(0.7, 0.4),
                },
                PredefinedAnchor {
                    name: "Allgemein".to_string(),
                    fraction: Vec2::new(0.5, 0.75),
                },
            ],
            anchor_radius: 400.,
            anchor_start_angle: -90.,
            anchor_angle_step: 60.,
            title_fade_step: 0.05,
            comet_speed: 0.02,
            supernova_particles: 50,
            particle_life: 100,
            flash_decay: 0.04,
            starfield_stars: 500,
        }
    }
}

impl SettingsStyle {
    pub fn with_predefined_anchors(mut self, anchors: Vec<PredefinedAnchor>) -> Self {
        self.predefined_anchors = anchors;
        self
    }

    pub fn with_comet_speed(mut self, speed: f32) -> Self {
        self.comet_speed = speed;
        self
    }

    pub fn with_supernova_particles(mut self, count: usize) -> Self {
        self.supernova_particles = count;
        self
    }

    pub fn with_starfield_stars(mut self, count: usize) -> Self {
        self.starfield_stars = count;
        self
    }
}

/// A member of the household items can be assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub color: ColorSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub users: Vec<User>,

    /// Whose assigned items make up "my list"
    pub me: String,
}

impl Default for Household {
    fn default() -> Self {
        let user = |name: &str, var: &str| User {
            name: name.to_string(),
            color: ColorSpec::ThemeRef(var.to_string()),
        };
        Self {
            users: vec![
                user("Du", "--user-du"),
                user("Alex", "--user-alex"),
                user("Mia", "--user-mia"),
            ],
            me: "Du".to_string(),
        }
    }
}
