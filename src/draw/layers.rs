use egui::{Painter, Shape};

/// Drawing layers of a frame. Layers are flushed in declaration order: background, bottom, top.
#[derive(Default)]
pub struct Layers {
    background: Vec<Shape>,
    bottom: Vec<Shape>,
    top: Vec<Shape>,
}

impl Layers {
    /// Screen space backdrop, drawn beneath everything.
    pub fn add_background(&mut self, shape: impl Into<Shape>) {
        self.background.push(shape.into());
    }

    /// Default drawing layer. This is the bottom layer.
    pub fn add(&mut self, shape: impl Into<Shape>) {
        self.bottom.push(shape.into());
    }

    /// Drawing layer for effects that must stay above the galaxy. This is the top layer.
    pub fn add_top(&mut self, shape: impl Into<Shape>) {
        self.top.push(shape.into());
    }

    pub fn len(&self) -> usize {
        self.background.len() + self.bottom.len() + self.top.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All shapes in draw order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.background
            .iter()
            .chain(self.bottom.iter())
            .chain(self.top.iter())
    }

    pub fn draw(self, p: &Painter) {
        for shape in self
            .background
            .into_iter()
            .chain(self.bottom)
            .chain(self.top)
        {
            p.add(shape);
        }
    }
}
