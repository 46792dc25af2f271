//! Distance fog that storms pull in and clear weather restores

use serde::{Deserialize, Serialize};

/// Current and declared fog distances
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FogState {
    pub start: f32,
    pub range: f32,
    pub original_start: f32,
    pub original_range: f32,
}

impl FogState {
    pub fn new(start: f32, range: f32) -> Self {
        Self {
            start,
            range,
            original_start: start,
            original_range: range,
        }
    }

    /// Pull both distances in by `amount`, stopping at the given fractions
    /// of the declared values
    pub fn thicken(&mut self, amount: f32, start_floor: f32, range_floor: f32) {
        self.start = (self.start - amount).max(self.original_start * start_floor);
        self.range = (self.range - amount).max(self.original_range * range_floor);
    }

    /// Push both distances back out by `amount`, up to the declared values
    pub fn clear(&mut self, amount: f32) {
        self.start = (self.start + amount).min(self.original_start);
        self.range = (self.range + amount).min(self.original_range);
    }

    /// Whether both distances are back at their declared values
    pub fn is_clear(&self) -> bool {
        self.start >= self.original_start && self.range >= self.original_range
    }

    pub fn reset(&mut self) {
        self.start = self.original_start;
        self.range = self.original_range;
    }

    /// Fog factor for a point `distance` from the eye: 0 before the start,
    /// 1 past start + range
    pub fn factor(&self, distance: f32) -> f32 {
        if self.range <= 0.0 {
            return if distance >= self.start { 1.0 } else { 0.0 };
        }
        ((distance - self.start) / self.range).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thicken_stops_at_floors() {
        let mut fog = FogState::new(1000.0, 2000.0);
        fog.thicken(500.0, 0.15, 0.4);
        assert_eq!(fog.start, 500.0);
        assert_eq!(fog.range, 1500.0);

        fog.thicken(10_000.0, 0.15, 0.4);
        assert_eq!(fog.start, 150.0);
        assert_eq!(fog.range, 800.0);
    }

    #[test]
    fn test_clear_stops_at_original() {
        let mut fog = FogState::new(1000.0, 2000.0);
        fog.thicken(600.0, 0.15, 0.4);
        fog.clear(400.0);
        assert_eq!(fog.start, 800.0);
        assert!(!fog.is_clear());
        fog.clear(10_000.0);
        assert!(fog.is_clear());
        assert_eq!(fog.range, 2000.0);
    }

    #[test]
    fn test_factor() {
        let fog = FogState::new(100.0, 200.0);
        assert_eq!(fog.factor(50.0), 0.0);
        assert_eq!(fog.factor(200.0), 0.5);
        assert_eq!(fog.factor(1000.0), 1.0);
    }
}
