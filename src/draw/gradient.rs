use std::f32::consts::TAU;

use egui::{Color32, Mesh, Pos2, Vec2};

const SEGMENTS: u32 = 48;

/// Triangle mesh approximating a canvas radial gradient.
///
/// `stops` are `(offset, color)` pairs with offsets in `[0, 1]` between `inner` and `outer`.
/// The disc inside `inner` is filled with the first stop color.
pub fn radial_gradient(center: Pos2, inner: f32, outer: f32, stops: &[(f32, Color32)]) -> Mesh {
    let mut mesh = Mesh::default();
    let Some(&(_, first)) = stops.first() else {
        return mesh;
    };
    if outer <= 0. {
        return mesh;
    }

    mesh.colored_vertex(center, first);
    let mut rings: Vec<(f32, Color32)> = Vec::with_capacity(stops.len() + 1);
    if inner > 0. {
        rings.push((inner, first));
    }
    for &(offset, color) in stops {
        let r = inner + (outer - inner) * offset.clamp(0., 1.);
        if r <= 0. {
            continue;
        }
        rings.push((r, color));
    }

    for (ring, (r, color)) in rings.iter().enumerate() {
        for s in 0..SEGMENTS {
            let angle = TAU * s as f32 / SEGMENTS as f32;
            mesh.colored_vertex(center + Vec2::angled(angle) * *r, *color);
        }

        let base = 1 + ring as u32 * SEGMENTS;
        for s in 0..SEGMENTS {
            let next = (s + 1) % SEGMENTS;
            if ring == 0 {
                mesh.add_triangle(0, base + s, base + next);
            } else {
                let prev = base - SEGMENTS;
                mesh.add_triangle(prev + s, base + s, base + next);
                mesh.add_triangle(prev + s, base + next, prev + next);
            }
        }
    }
    mesh
}

/// Soft halo fading from `color` at `radius` to transparent at `radius + blur`.
pub fn glow(center: Pos2, radius: f32, blur: f32, color: Color32) -> Mesh {
    radial_gradient(
        center,
        radius,
        radius + blur,
        &[(0., color), (1., Color32::TRANSPARENT)],
    )
}

/// Triangle whose color fades from `head` at `tip` to transparent at the base.
pub fn fading_triangle(tip: Pos2, base_a: Pos2, base_b: Pos2, head: Color32) -> Mesh {
    let mut mesh = Mesh::default();
    mesh.colored_vertex(tip, head);
    mesh.colored_vertex(base_a, Color32::TRANSPARENT);
    mesh.colored_vertex(base_b, Color32::TRANSPARENT);
    mesh.add_triangle(0, 1, 2);
    mesh
}
