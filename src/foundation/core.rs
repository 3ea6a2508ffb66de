/// Fixed-arity 24-bit color in R, G, B order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_array([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }

    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Half-open pixel rectangle `[start, end)` on both axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub start_x: u32,
    pub start_y: u32,
    pub end_x: u32, // exclusive
    pub end_y: u32, // exclusive
}

impl Rect {
    /// The whole `width x height` rectangle anchored at the origin.
    pub const fn full(width: u32, height: u32) -> Self {
        Self {
            start_x: 0,
            start_y: 0,
            end_x: width,
            end_y: height,
        }
    }

    pub fn width(self) -> u32 {
        self.end_x.saturating_sub(self.start_x)
    }

    pub fn height(self) -> u32 {
        self.end_y.saturating_sub(self.start_y)
    }

    pub fn is_empty(self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Coord2d {
    pub x: i32,
    pub y: i32,
}

impl Coord2d {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Straight segment between two integer pixel positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Line2d {
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
}

impl Line2d {
    pub const fn new(start: Coord2d, end: Coord2d) -> Self {
        Self {
            start_x: start.x,
            start_y: start.y,
            end_x: end.x,
            end_y: end.y,
        }
    }

    pub const fn start(self) -> Coord2d {
        Coord2d::new(self.start_x, self.start_y)
    }

    pub const fn end(self) -> Coord2d {
        Coord2d::new(self.end_x, self.end_y)
    }
}

/// Sub-pixel coordinate pair, one per destination pixel of a remap field.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coord2df {
    pub x: f32,
    pub y: f32,
}

impl Coord2df {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
