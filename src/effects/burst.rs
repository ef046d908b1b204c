//! Particle burst payloads
//!
//! Field names serialize in camelCase so the page can hand a burst straight
//! to its particle library.

use serde::{Deserialize, Serialize};

/// One axis of a burst origin, in viewport fractions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coord {
    Fixed(f32),
    /// Sampled uniformly by the page on every burst
    Between { min: f32, max: f32 },
}

/// Where a burst is emitted from; a missing axis uses the page default
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Coord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Coord>,
}

impl Origin {
    pub fn at_y(y: f32) -> Self {
        Self { x: None, y: Some(Coord::Fixed(y)) }
    }

    pub fn at_x(x: f32) -> Self {
        Self { x: Some(Coord::Fixed(x)), y: None }
    }

    pub fn at(x: f32, y: f32) -> Self {
        Self { x: Some(Coord::Fixed(x)), y: Some(Coord::Fixed(y)) }
    }

    pub fn between(x: (f32, f32), y: (f32, f32)) -> Self {
        Self {
            x: Some(Coord::Between { min: x.0, max: x.1 }),
            y: Some(Coord::Between { min: y.0, max: y.1 }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Star,
}

/// Parameters of a single particle burst
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurstSpec {
    pub particle_count: u32,
    pub spread: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_velocity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticks: Option<u32>,
    pub origin: Origin,
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shapes: Vec<Shape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scalar: Option<f32>,
}

impl BurstSpec {
    pub fn new(particle_count: u32, spread: f32) -> Self {
        Self {
            particle_count,
            spread,
            angle: None,
            start_velocity: None,
            ticks: None,
            origin: Origin::default(),
            colors: Vec::new(),
            shapes: Vec::new(),
            scalar: None,
        }
    }

    pub fn angle(mut self, angle: f32) -> Self {
        self.angle = Some(angle);
        self
    }

    pub fn start_velocity(mut self, velocity: f32) -> Self {
        self.start_velocity = Some(velocity);
        self
    }

    pub fn ticks(mut self, ticks: u32) -> Self {
        self.ticks = Some(ticks);
        self
    }

    pub fn origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn colors(mut self, colors: &[&str]) -> Self {
        self.colors = colors.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn shapes(mut self, shapes: &[Shape]) -> Self {
        self.shapes = shapes.to_vec();
        self
    }

    pub fn scalar(mut self, scalar: f32) -> Self {
        self.scalar = Some(scalar);
        self
    }

    /// Same burst with the particle count scaled by `numerator / denominator`,
    /// rounded down
    pub fn scaled(&self, numerator: u64, denominator: u64) -> Self {
        let count = if denominator == 0 {
            self.particle_count
        } else {
            (self.particle_count as u64 * numerator / denominator) as u32
        };
        Self { particle_count: count, ..self.clone() }
    }
}
