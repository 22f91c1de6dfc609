mod constellation;
mod context;
mod effects;
mod gradient;
mod layers;
mod nebula;
mod star;
mod starfield;
mod title;

pub use self::constellation::draw_constellation;
pub use self::context::DrawContext;
pub use self::effects::{draw_comet, draw_supernova, tail_length};
pub use self::gradient::{fading_triangle, glow, radial_gradient};
pub use self::layers::Layers;
pub use self::nebula::draw_nebula;
pub use self::star::{base_radius, draw_star, StarLook};
pub use self::starfield::Starfield;
pub use self::title::CategoryTitle;
