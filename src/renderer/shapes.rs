//! Draw list primitives for 2D rendering

use glam::Vec2;

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.969, 0.969, 0.969, 1.0]; // #f7f7f7
    pub const CLOUD: [f32; 4] = [0.867, 0.867, 0.867, 1.0];
    pub const GROUND: [f32; 4] = [0.2, 0.2, 0.2, 1.0];
    pub const GROUND_DASH: [f32; 4] = [0.4, 0.4, 0.4, 1.0];
    pub const CACTUS: [f32; 4] = [0.176, 0.314, 0.086, 1.0];
    pub const CACTUS_ARM: [f32; 4] = [0.102, 0.188, 0.035, 1.0];
    pub const FLYER: [f32; 4] = [0.545, 0.271, 0.075, 1.0];
    pub const BEAK: [f32; 4] = [1.0, 0.4, 0.0, 1.0];
    pub const DINO: [f32; 4] = [0.325, 0.325, 0.325, 1.0];
    pub const EYE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const PUPIL: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
}

/// A single draw call
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        pos: Vec2,
        size: Vec2,
        color: [f32; 4],
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: [f32; 4],
    },
    Triangle {
        points: [Vec2; 3],
        color: [f32; 4],
    },
    /// The character image, drawn when it loaded successfully
    Sprite { pos: Vec2, size: Vec2 },
}

/// Everything drawn in one frame, back to front
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub shapes: Vec<Shape>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        self.shapes.push(Shape::Rect {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            color,
        });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        self.shapes.push(Shape::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
        self.shapes.push(Shape::Triangle {
            points: [a, b, c],
            color,
        });
    }

    pub fn sprite(&mut self, pos: Vec2, size: Vec2) {
        self.shapes.push(Shape::Sprite { pos, size });
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// CSS color string for a linear RGBA color
pub fn css_color(color: [f32; 4]) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}
