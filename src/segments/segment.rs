use serde::{Deserialize, Serialize};

/// Straight segment between two pixel positions of the edge map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineSegment {
    pub p0: [i32; 2],
    pub p1: [i32; 2],
}

impl LineSegment {
    pub const fn new(p0: [i32; 2], p1: [i32; 2]) -> Self {
        Self { p0, p1 }
    }

    pub fn dx(&self) -> i32 {
        self.p1[0] - self.p0[0]
    }

    pub fn dy(&self) -> i32 {
        self.p1[1] - self.p0[1]
    }

    /// Both endpoints share the same column (undefined slope).
    pub fn is_vertical(&self) -> bool {
        self.p0[0] == self.p1[0]
    }

    pub fn length(&self) -> f64 {
        (self.dx() as f64).hypot(self.dy() as f64)
    }
}

impl From<[i32; 4]> for LineSegment {
    fn from([x1, y1, x2, y2]: [i32; 4]) -> Self {
        Self::new([x1, y1], [x2, y2])
    }
}
