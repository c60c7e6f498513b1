use glam::{Mat3, Quat, Vec3};

/// Rotation that looks along `forward` with +Y up (+Z is the body's nose).
///
/// `None` for a zero direction.
pub fn look_rotation(forward: Vec3) -> Option<Quat> {
    let z = forward.try_normalize()?;
    match Vec3::Y.cross(z).try_normalize() {
        Some(x) => Some(Quat::from_mat3(&Mat3::from_cols(x, z.cross(x), z))),
        // straight up or down, any roll will do
        None => Some(Quat::from_rotation_arc(Vec3::Z, z)),
    }
}

/// The controlled glider body: transform, gravity switch and propeller.
#[derive(Debug, Clone, PartialEq)]
pub struct Airframe {
    position: Vec3,
    rotation: Quat,
    vertical_velocity: f32,
    use_gravity: bool,
    propeller_angle: f32,
    alive: bool,
}

impl Default for Airframe {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            vertical_velocity: 0.0,
            use_gravity: false,
            propeller_angle: 0.0,
            alive: true,
        }
    }
}

impl Airframe {
    pub fn position(&self) -> Vec3 { self.position }
    pub fn rotation(&self) -> Quat { self.rotation }
    pub fn vertical_velocity(&self) -> f32 { self.vertical_velocity }
    pub fn uses_gravity(&self) -> bool { self.use_gravity }
    pub fn propeller_angle(&self) -> f32 { self.propeller_angle }
    pub fn is_alive(&self) -> bool { self.alive }

    /// Teleports the body. Kinematic placement cancels vertical motion.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.vertical_velocity = 0.0;
    }

    /// Moves along x/z only, height stays with the physics.
    pub fn set_planar(&mut self, x: f32, z: f32) {
        self.position.x = x;
        self.position.z = z;
    }

    pub fn set_rotation(&mut self, rotation: Quat) { self.rotation = rotation; }

    pub fn set_gravity(&mut self, enabled: bool) { self.use_gravity = enabled; }

    /// Spins the propeller by `speed` degrees per second.
    pub fn spin_propeller(&mut self, speed: f32, dt: f32) {
        self.propeller_angle = (self.propeller_angle + speed * dt).rem_euclid(360.0);
    }

    /// Semi-implicit Euler step of the free fall.
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        if !self.alive || !self.use_gravity || dt <= 0.0 {
            return;
        }
        self.vertical_velocity -= gravity * dt;
        self.position.y += self.vertical_velocity * dt;
    }

    /// Removes the body from the world, it stops moving and colliding.
    pub fn despawn(&mut self) {
        self.alive = false;
        self.use_gravity = false;
        self.vertical_velocity = 0.0;
    }
}
