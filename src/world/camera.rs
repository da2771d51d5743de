use glam::Vec2;

/// Default camera-plane length (≈ 66° horizontal field of view).
pub const DEFAULT_FOV: f32 = 0.66;

/// Player view-point in tile-grid space.
///
/// * `dir` is the viewing direction, `plane` the camera plane: always
///   perpendicular to `dir` and scaled by the FoV factor.
/// * The FoV scalar is stored separately so [`Camera::look_at`] can rebuild
///   `plane` without picking up drift from repeated rotations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pos: Vec2,   // x,y in tile units
    dir: Vec2,   // unit-ish forward vector
    plane: Vec2, // dir rotated 90°, length = fov
    fov: f32,
}

impl Camera {
    /// Create a camera at `pos`, facing `angle` (radians, 0 = +X), with
    /// camera-plane length `fov`.
    pub fn new(pos: Vec2, angle: f32, fov: f32) -> Self {
        let mut cam = Self {
            pos,
            dir: Vec2::X,
            plane: Vec2::Y * fov,
            fov,
        };
        cam.look_at(angle);
        cam
    }

    /// Build directly from the three vectors; `fov` is taken from `plane`.
    pub fn from_vectors(pos: Vec2, dir: Vec2, plane: Vec2) -> Self {
        Self {
            pos,
            dir,
            plane,
            fov: plane.length(),
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    #[inline]
    pub fn dir(&self) -> Vec2 {
        self.dir
    }

    #[inline]
    pub fn plane(&self) -> Vec2 {
        self.plane
    }

    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Heading in radians, `(-π, π]`.
    #[inline]
    pub fn angle(&self) -> f32 {
        self.dir.y.atan2(self.dir.x)
    }

    /// Face `angle`; the plane is rebuilt from the stored FoV.
    pub fn look_at(&mut self, angle: f32) {
        let (s, c) = angle.sin_cos();
        self.dir = Vec2::new(c, s);
        self.plane = Vec2::new(-s, c) * self.fov;
    }

    /// Rotate direction and plane together (positive = counter-clockwise).
    pub fn rotate(&mut self, amount: f32) {
        let rot = Vec2::from_angle(amount);
        self.dir = rot.rotate(self.dir);
        self.plane = rot.rotate(self.plane);
    }

    /// Ray through camera-space coordinate `camera_x ∈ [-1, 1]`.
    #[inline(always)]
    pub fn ray_dir(&self, camera_x: f32) -> Vec2 {
        self.dir + self.plane * camera_x
    }

    /// Unit vector pointing to the camera's right (same side as `plane`).
    #[inline]
    pub fn right(&self) -> Vec2 {
        self.plane.normalize_or_zero()
    }

    /// Move by `forward` units and `side` (strafe, + right).
    pub fn step(&mut self, forward: f32, side: f32) {
        self.pos += self.dir.normalize_or_zero() * forward + self.right() * side;
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
