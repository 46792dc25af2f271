//! Preallocated particle pool.
//!
//! Slots are allocated once and toggled alive/dead. Emission takes the first
//! dead slot; when every slot is alive the emission is dropped.

use crate::core::types::{Result, Vec2, Vec3};
use crate::core::Error;

use super::updater::ParticleUpdater;

/// One pool slot
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    pub alive: bool,
    pub position: Vec3,
    pub direction: Vec3,
    /// Meaning depends on the updater. Ambient particles store their maximum
    /// speed here until spawn picks the actual oscillation rate.
    pub speed: f32,
    pub size: Vec2,
    /// Seconds since spawn; 0 until the first update
    pub age: f32,
    /// Set once the updater has placed the particle
    pub spawned: bool,
}

pub struct ParticlePool {
    particles: Vec<Particle>,
    max_age: f32,
    active: usize,
    updater: Box<dyn ParticleUpdater>,
}

impl std::fmt::Debug for ParticlePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticlePool")
            .field("capacity", &self.particles.len())
            .field("active", &self.active)
            .field("max_age", &self.max_age)
            .finish()
    }
}

impl ParticlePool {
    /// Pool of `capacity` dead particles. Zero capacity is rejected.
    pub fn new(capacity: usize, max_age: f32, updater: Box<dyn ParticleUpdater>) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidConfig("particle pool capacity must be non-zero".into()));
        }
        if !(max_age > 0.0) {
            return Err(Error::InvalidConfig(format!("invalid particle lifetime {}", max_age)));
        }
        Ok(Self {
            particles: vec![Particle::default(); capacity],
            max_age,
            active: 0,
            updater,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    /// Live particle count as of the last update or emission
    #[inline]
    pub fn active(&self) -> usize {
        self.active
    }

    #[inline]
    pub fn max_age(&self) -> f32 {
        self.max_age
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn alive(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.alive)
    }

    /// Wake the first dead slot. Returns false when the pool is full.
    pub fn emit(&mut self, direction: Vec3, size: Vec2, speed: f32) -> bool {
        let Some(slot) = self.particles.iter_mut().find(|p| !p.alive) else {
            return false;
        };
        *slot = Particle {
            alive: true,
            position: Vec3::ZERO,
            direction,
            speed,
            size,
            age: 0.0,
            spawned: false,
        };
        self.active += 1;
        true
    }

    /// Emit `count` particles, returning how many found a slot
    pub fn emit_many(&mut self, count: usize, direction: Vec3, size: Vec2, speed: f32) -> usize {
        (0..count).take_while(|_| self.emit(direction, size, speed)).count()
    }

    /// Age and move every live particle.
    ///
    /// Particles that have not been updated since emission are placed by the
    /// updater first, using the viewer's `eye` and `look`.
    pub fn update(&mut self, dt: f32, eye: Vec3, look: Vec3) {
        let mut active = 0;
        for p in self.particles.iter_mut().filter(|p| p.alive) {
            if !p.spawned {
                self.updater.spawn(p, eye, look);
                p.spawned = true;
            }
            p.age += dt;
            self.updater.advance(p, dt);

            if p.age > self.max_age {
                p.alive = false;
            } else {
                active += 1;
            }
        }
        self.active = active;
    }

    /// Kill every particle
    pub fn reset(&mut self) {
        self.particles.fill(Particle::default());
        self.active = 0;
    }

    /// Rebuild the pool at a new capacity. Live particles are discarded.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<()> {
        if capacity == 0 {
            return Err(Error::InvalidConfig("particle pool capacity must be non-zero".into()));
        }
        self.particles = vec![Particle::default(); capacity];
        self.active = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Moves straight along the direction at `speed` units per second.
    struct Linear;

    impl ParticleUpdater for Linear {
        fn advance(&mut self, p: &mut Particle, dt: f32) {
            p.position += p.direction * p.speed * dt;
        }
    }

    fn pool(capacity: usize, max_age: f32) -> ParticlePool {
        ParticlePool::new(capacity, max_age, Box::new(Linear)).unwrap()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            ParticlePool::new(0, 1.0, Box::new(Linear)),
            Err(Error::InvalidConfig(_))
        ));
        let mut p = pool(4, 1.0);
        assert!(p.set_capacity(0).is_err());
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut p = pool(8, 10.0);
        let placed = p.emit_many(20, Vec3::NEG_Y, Vec2::ONE, 1.0);
        assert_eq!(placed, 8);
        assert!(!p.emit(Vec3::NEG_Y, Vec2::ONE, 1.0));
        p.update(0.1, Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(p.active(), 8);
        assert_eq!(p.alive().count(), 8);
    }

    #[test]
    fn test_particles_expire_and_slots_reuse() {
        let mut p = pool(2, 1.0);
        p.emit(Vec3::X, Vec2::ONE, 2.0);
        p.update(0.6, Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(p.active(), 1);
        assert!((p.particles()[0].position.x - 1.2).abs() < 1e-6);

        p.update(0.6, Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(p.active(), 0);

        assert!(p.emit(Vec3::X, Vec2::ONE, 1.0));
        assert_eq!(p.particles()[0].age, 0.0);
        assert_eq!(p.particles()[0].position, Vec3::ZERO);
    }

    /// Counts spawn calls and places particles at the eye.
    struct CountingSpawn(std::rc::Rc<std::cell::Cell<usize>>);

    impl ParticleUpdater for CountingSpawn {
        fn spawn(&mut self, p: &mut Particle, eye: Vec3, _look: Vec3) {
            self.0.set(self.0.get() + 1);
            p.position = eye;
        }

        fn advance(&mut self, _p: &mut Particle, _dt: f32) {}
    }

    #[test]
    fn test_spawn_runs_once_even_with_zero_dt() {
        let spawns = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut p = ParticlePool::new(2, 1.0, Box::new(CountingSpawn(spawns.clone()))).unwrap();
        p.emit(Vec3::X, Vec2::ONE, 1.0);

        p.update(0.0, Vec3::new(1.0, 2.0, 3.0), Vec3::NEG_Z);
        p.update(0.0, Vec3::new(9.0, 9.0, 9.0), Vec3::NEG_Z);
        p.update(0.1, Vec3::new(5.0, 5.0, 5.0), Vec3::NEG_Z);

        assert_eq!(spawns.get(), 1);
        assert!(p.particles()[0].spawned);
        assert_eq!(p.particles()[0].position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_reset_and_resize() {
        let mut p = pool(4, 1.0);
        p.emit_many(3, Vec3::X, Vec2::ONE, 1.0);
        p.reset();
        assert_eq!(p.active(), 0);
        assert_eq!(p.alive().count(), 0);

        p.emit_many(3, Vec3::X, Vec2::ONE, 1.0);
        p.set_capacity(16).unwrap();
        assert_eq!(p.capacity(), 16);
        assert_eq!(p.alive().count(), 0);
    }
}
