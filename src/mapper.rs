use thiserror::Error;

/// An axis-aligned rectangle, used both for the logical world and for the
/// drawing viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Rect {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn center(&self) -> (f64, f64) {
        (
            0.5 * (self.xmin + self.xmax),
            0.5 * (self.ymin + self.ymax),
        )
    }

    fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum MapperError {
    #[error("degenerate world rectangle (zero or negative area)")]
    DegenerateWorld,
    #[error("degenerate viewport rectangle (zero or negative area)")]
    DegenerateViewport,
}

/// Maps world coordinates to viewport coordinates with a single uniform
/// scale factor, so the drawing fits the viewport without distortion.
///
/// Viewport Y grows downward while world Y grows upward, so the Y axis is
/// flipped. Immutable once constructed; build a new one on every resize.
#[derive(Debug, Clone, Copy)]
pub struct Mapper {
    f: f64,
    c1: f64,
    c2: f64,
}

impl Mapper {
    pub fn new(world: Rect, viewport: Rect) -> Result<Self, MapperError> {
        if world.is_degenerate() {
            return Err(MapperError::DegenerateWorld);
        }
        if viewport.is_degenerate() {
            return Err(MapperError::DegenerateViewport);
        }

        let fx = viewport.width() / world.width();
        let fy = viewport.height() / world.height();
        let f = fx.min(fy);

        let (xc, yc) = world.center();
        let (vxc, vyc) = viewport.center();

        // Offsets put the world center on the viewport center; with the
        // flipped Y axis this means c2 = vyc + f*yc.
        Ok(Self {
            f,
            c1: vxc - f * xc,
            c2: vyc + f * yc,
        })
    }

    pub fn scale(&self) -> f64 {
        self.f
    }

    /// World point to viewport point.
    pub fn map(&self, x: f64, y: f64) -> (f64, f64) {
        (self.f * x + self.c1, -self.f * y + self.c2)
    }

    /// Viewport point back to world coordinates.
    pub fn unmap(&self, vx: f64, vy: f64) -> (f64, f64) {
        ((vx - self.c1) / self.f, (self.c2 - vy) / self.f)
    }
}
