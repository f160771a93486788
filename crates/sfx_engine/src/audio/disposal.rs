//! Deferred source disposal
//!
//! On-demand sources are released once their clip has finished. The queue
//! keeps its own clock, advanced by the frame update, so disposal runs on the
//! same thread as every other SFX call.
//!
//! A source whose clip length is known gets a fixed lifetime. A source whose
//! length is unknown waits until the backend reports it idle, and only then
//! starts its grace delay.

use crate::audio::SourceHandle;

/// Time window a source stays alive
#[derive(Debug, Clone, Copy)]
pub struct Lifetime {
    /// Queue time when the source started (in seconds)
    pub created_at: f32,
    /// How long the source should live (in seconds)
    pub duration: f32,
}

impl Lifetime {
    /// Create a new lifetime
    pub fn new(created_at: f32, duration: f32) -> Self {
        Self {
            created_at,
            duration,
        }
    }

    /// Check if this lifetime has expired
    pub fn is_expired(&self, current_time: f32) -> bool {
        current_time >= self.created_at + self.duration
    }

    /// Get remaining lifetime in seconds
    pub fn remaining(&self, current_time: f32) -> f32 {
        (self.created_at + self.duration - current_time).max(0.0)
    }
}

#[derive(Debug, Clone, Copy)]
enum Release {
    /// Fixed lifetime from the moment the source started
    Timed(Lifetime),
    /// Grace delay that starts once the source stops playing
    WhenIdle { delay: f32 },
}

/// Sources waiting to be released
#[derive(Debug, Default)]
pub struct DisposalQueue {
    clock: f32,
    pending: Vec<(SourceHandle, Release)>,
}

impl DisposalQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a source for release `delay` seconds from now
    pub fn schedule(&mut self, handle: SourceHandle, delay: f32) {
        self.pending.push((
            handle,
            Release::Timed(Lifetime::new(self.clock, delay.max(0.0))),
        ));
    }

    /// Schedule a source for release `delay` seconds after it goes idle
    pub fn schedule_when_idle(&mut self, handle: SourceHandle, delay: f32) {
        self.pending
            .push((handle, Release::WhenIdle { delay: delay.max(0.0) }));
    }

    /// Advance the clock and drain every source whose time is up
    ///
    /// `is_playing` is asked about sources still waiting to go idle.
    pub fn advance<F>(&mut self, delta_time: f32, is_playing: F) -> Vec<SourceHandle>
    where
        F: Fn(SourceHandle) -> bool,
    {
        self.clock += delta_time.max(0.0);
        let now = self.clock;

        let mut expired = Vec::new();
        self.pending.retain_mut(|(handle, release)| {
            if let Release::WhenIdle { delay } = *release {
                if is_playing(*handle) {
                    return true;
                }
                *release = Release::Timed(Lifetime::new(now, delay));
            }

            match release {
                Release::Timed(lifetime) if lifetime.is_expired(now) => {
                    expired.push(*handle);
                    false
                }
                _ => true,
            }
        });
        expired
    }

    /// Remove everything still pending, regardless of time
    pub fn drain_all(&mut self) -> Vec<SourceHandle> {
        self.pending.drain(..).map(|(handle, _)| handle).collect()
    }

    /// Seconds until a scheduled source is released
    ///
    /// `None` if the handle is not pending or is still waiting to go idle.
    pub fn remaining(&self, handle: SourceHandle) -> Option<f32> {
        self.pending
            .iter()
            .find(|(h, _)| *h == handle)
            .and_then(|(_, release)| match release {
                Release::Timed(lifetime) => Some(lifetime.remaining(self.clock)),
                Release::WhenIdle { .. } => None,
            })
    }

    /// Number of sources waiting for release
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn handles(count: usize) -> Vec<SourceHandle> {
        let mut map: SlotMap<SourceHandle, ()> = SlotMap::with_key();
        (0..count).map(|_| map.insert(())).collect()
    }

    fn idle(_: SourceHandle) -> bool {
        false
    }

    #[test]
    fn test_lifetime_expiry() {
        let lifetime = Lifetime::new(0.0, 5.0);
        assert!(!lifetime.is_expired(2.0));
        assert!(lifetime.is_expired(5.0));
        assert_eq!(lifetime.remaining(3.0), 2.0);
        assert_eq!(lifetime.remaining(12.0), 0.0);
    }

    #[test]
    fn test_releases_in_due_order() {
        let h = handles(2);
        let mut queue = DisposalQueue::new();
        queue.schedule(h[0], 1.25);
        queue.schedule(h[1], 0.5);

        assert!(queue.advance(0.25, idle).is_empty());
        assert_eq!(queue.advance(0.25, idle), vec![h[1]]);
        assert!(queue.advance(0.5, idle).is_empty());
        assert_eq!(queue.advance(0.25, idle), vec![h[0]]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_schedule_is_relative_to_current_clock() {
        let h = handles(1);
        let mut queue = DisposalQueue::new();
        queue.advance(10.0, idle);
        queue.schedule(h[0], 1.0);

        assert_eq!(queue.remaining(h[0]), Some(1.0));
        assert!(queue.advance(0.5, idle).is_empty());
        assert_eq!(queue.advance(0.5, idle), vec![h[0]]);
        assert_eq!(queue.remaining(h[0]), None);
    }

    #[test]
    fn test_drain_all() {
        let h = handles(3);
        let mut queue = DisposalQueue::new();
        for handle in &h {
            queue.schedule(*handle, 100.0);
        }
        assert_eq!(queue.drain_all(), h);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_unknown_length_waits_for_idle() {
        let h = handles(2);
        let mut queue = DisposalQueue::new();
        queue.schedule_when_idle(h[0], 0.25);
        queue.schedule_when_idle(h[1], 0.0);
        assert_eq!(queue.remaining(h[0]), None);

        // Still playing long after any fixed delay would have run out
        assert!(queue.advance(30.0, |_| true).is_empty());
        assert_eq!(queue.len(), 2);

        // Idle with no grace delay goes at once; the other starts its countdown
        assert_eq!(queue.advance(0.1, |handle| handle == h[0]), vec![h[1]]);
        assert!(queue.advance(0.1, |handle| handle == h[0]).is_empty());

        assert!(queue.advance(0.0, idle).is_empty());
        approx::assert_relative_eq!(queue.remaining(h[0]).unwrap(), 0.25, epsilon = 1e-4);
        assert!(queue.advance(0.2, idle).is_empty());
        assert_eq!(queue.advance(0.1, idle), vec![h[0]]);
        assert!(queue.is_empty());
    }
}
