use egui::Pos2;

/// Nearest element within `radius` of `pos`. Elements exactly on the radius count as hits.
pub fn nearest_within<'a, T: 'a>(
    elements: impl IntoIterator<Item = &'a T>,
    pos: Pos2,
    radius: f32,
    location: impl Fn(&T) -> Pos2,
) -> Option<&'a T> {
    let mut best: Option<(&T, f32)> = None;
    for el in elements {
        let d = location(el).distance(pos);
        if d > radius {
            continue;
        }
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((el, d));
        }
    }
    best.map(|(el, _)| el)
}

/// Radius in world units that covers `screen_radius` pixels at the given zoom.
pub fn world_radius(screen_radius: f32, zoom: f32) -> f32 {
    screen_radius / zoom
}
