//! Wave bookkeeping for patterns that manipulate bullets in batches
//!
//! A wave is a contiguous run of a pattern's bullet vector, created as one
//! emission batch and aged as a unit. Waves are stored as two parallel
//! sequences (sizes and ages). Start indices are always recomputed from the
//! sizes of earlier waves because those shrink independently as bullets retire.
//!
//! Bullets emitted since the last wave was closed are counted in an open
//! accumulator (`pending`) and sit after every closed wave. The tracker
//! invariant is `total() + pending == bullets.len()`.

use std::ops::RangeInclusive;

/// Sizes and ages of a pattern's waves
#[derive(Debug, Clone, Default)]
pub struct WaveTracker {
    sizes: Vec<usize>,
    ages: Vec<u32>,
    pending: usize,
}

impl WaveTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of closed waves
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn ages(&self) -> &[u32] {
        &self.ages
    }

    pub fn age(&self, wave: usize) -> Option<u32> {
        self.ages.get(wave).copied()
    }

    /// Bullets emitted since the last wave was closed
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Sum of closed wave sizes
    pub fn total(&self) -> usize {
        self.sizes.iter().sum()
    }

    /// Count one bullet toward the open wave
    pub fn note_bullet(&mut self) {
        self.pending += 1;
    }

    /// Close a wave. With `None` the open accumulator becomes the wave and is
    /// reset; with `Some(n)` a wave of exactly `n` bullets is recorded.
    /// An empty wave is never recorded, since nothing could retire it.
    pub fn start_wave(&mut self, explicit_size: Option<usize>) {
        let size = match explicit_size {
            Some(n) => n,
            None => std::mem::take(&mut self.pending),
        };
        if size == 0 {
            log::debug!("Skipped empty wave");
            return;
        }
        self.sizes.push(size);
        self.ages.push(0);
    }

    /// Record a wave of `size` bullets that were inserted at the front of the
    /// bullet vector
    pub fn prepend_wave(&mut self, size: usize) {
        if size == 0 {
            return;
        }
        self.sizes.insert(0, size);
        self.ages.insert(0, 0);
    }

    /// First bullet index of `wave`
    pub fn start_index(&self, wave: usize) -> Option<usize> {
        if wave >= self.sizes.len() {
            return None;
        }
        Some(self.sizes[..wave].iter().sum())
    }

    /// Last bullet index of `wave` (inclusive); `None` for an empty or missing wave
    pub fn end_index(&self, wave: usize) -> Option<usize> {
        let start = self.start_index(wave)?;
        let size = self.sizes[wave];
        if size == 0 { None } else { Some(start + size - 1) }
    }

    /// Index range covered by `wave`, empty when the wave does not exist
    pub fn range(&self, wave: usize) -> RangeInclusive<usize> {
        match (self.start_index(wave), self.end_index(wave)) {
            (Some(start), Some(end)) => start..=end,
            // An empty inclusive range
            _ => 1..=0,
        }
    }

    /// Age every wave by one frame
    pub fn age_all(&mut self) {
        for age in &mut self.ages {
            *age += 1;
        }
    }

    /// Update sizes after the bullet at `index` (pre-removal) was removed.
    ///
    /// The owning wave shrinks and is erased with its age once empty. An index
    /// past every closed wave belongs to the open accumulator.
    pub fn on_removed(&mut self, index: usize) {
        let mut cumulative = 0;
        for wave in 0..self.sizes.len() {
            if index < cumulative + self.sizes[wave] {
                self.sizes[wave] -= 1;
                if self.sizes[wave] == 0 {
                    self.sizes.remove(wave);
                    self.ages.remove(wave);
                }
                return;
            }
            cumulative += self.sizes[wave];
        }
        if self.pending > 0 {
            self.pending -= 1;
        } else {
            log::warn!(
                "Removed bullet {} lies outside every wave ({} tracked)",
                index,
                cumulative
            );
        }
    }

    /// Advisory consistency check against the bullet vector length.
    ///
    /// Logs a diagnostic and returns false on mismatch; never panics.
    pub fn check(&self, bullet_count: usize) -> bool {
        let tracked = self.total() + self.pending;
        if tracked != bullet_count {
            log::warn!(
                "Wave mismatch: {} bullets, {} tracked in waves, {} pending",
                bullet_count,
                self.total(),
                self.pending
            );
            return false;
        }
        true
    }

    pub fn clear(&mut self) {
        self.sizes.clear();
        self.ages.clear();
        self.pending = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_and_end_indices() {
        let mut waves = WaveTracker::new();
        waves.start_wave(Some(3));
        waves.start_wave(Some(5));
        for _ in 0..2 {
            waves.note_bullet();
        }
        waves.start_wave(None);

        assert_eq!(waves.sizes(), &[3, 5, 2]);
        assert_eq!(waves.pending(), 0);
        assert_eq!(waves.start_index(1), Some(3));
        assert_eq!(waves.end_index(1), Some(7));
        assert_eq!(waves.range(2), 8..=9);
        assert_eq!(waves.start_index(3), None);
        assert!(waves.range(7).is_empty());
    }

    #[test]
    fn test_removal_hits_owning_wave() {
        let mut waves = WaveTracker::new();
        waves.start_wave(Some(2));
        waves.start_wave(Some(3));
        waves.age_all();
        waves.start_wave(Some(1));

        // Index 3 lives in wave 1
        waves.on_removed(3);
        assert_eq!(waves.sizes(), &[2, 2, 1]);

        // Emptying wave 2 erases its age too
        waves.on_removed(4);
        assert_eq!(waves.sizes(), &[2, 2]);
        assert_eq!(waves.ages(), &[1, 1]);
        assert!(waves.check(4));
    }

    #[test]
    fn test_removal_past_waves_drains_pending() {
        let mut waves = WaveTracker::new();
        waves.start_wave(Some(2));
        waves.note_bullet();
        waves.note_bullet();
        waves.on_removed(3);
        assert_eq!(waves.pending(), 1);
        assert!(waves.check(3));
        assert!(!waves.check(5));
    }

    #[test]
    fn test_prepend_wave() {
        let mut waves = WaveTracker::new();
        waves.start_wave(Some(4));
        waves.prepend_wave(5);
        waves.prepend_wave(0);
        assert_eq!(waves.sizes(), &[5, 4]);
        assert_eq!(waves.start_index(1), Some(5));
    }

    #[test]
    fn test_empty_waves_not_recorded() {
        let mut waves = WaveTracker::new();
        for _ in 0..50 {
            waves.start_wave(Some(0));
            waves.start_wave(None);
        }
        assert!(waves.is_empty());
        assert!(waves.ages().is_empty());

        waves.note_bullet();
        waves.start_wave(None);
        waves.start_wave(None);
        assert_eq!(waves.sizes(), &[1]);
        assert!(waves.check(1));
    }
}
