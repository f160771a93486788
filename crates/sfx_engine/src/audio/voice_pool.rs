//! Fixed ring of reusable sources
//!
//! The pool allocates every source up front and hands them out round-robin.
//! A source that is still playing when the cursor comes back to it is simply
//! reconfigured, cutting the old sound off. Size the pool above the expected
//! number of overlapping sound effects.

use crate::audio::{AudioBackend, AudioError, SourceHandle};

/// Round-robin source pool
#[derive(Debug)]
pub struct VoicePool {
    /// Sources in allocation order
    sources: Vec<SourceHandle>,
    /// Index of the next source to hand out
    cursor: usize,
}

impl VoicePool {
    /// Allocate `size` sources from the backend
    ///
    /// # Errors
    /// - `InvalidConfig` if `size` is zero
    /// - Any backend error from source creation; sources created before the
    ///   failure are released again
    pub fn allocate<B: AudioBackend + ?Sized>(
        backend: &mut B,
        size: usize,
    ) -> Result<Self, AudioError> {
        if size == 0 {
            return Err(AudioError::InvalidConfig("pool size must be at least 1".to_string()));
        }

        let mut sources = Vec::with_capacity(size);
        for _ in 0..size {
            match backend.create_source() {
                Ok(handle) => sources.push(handle),
                Err(e) => {
                    for handle in sources {
                        let _ = backend.destroy_source(handle);
                    }
                    return Err(e);
                }
            }
        }

        log::debug!("Allocated voice pool with {size} sources");
        Ok(Self { sources, cursor: 0 })
    }

    /// Take the source under the cursor and advance the cursor
    pub fn next_source(&mut self) -> SourceHandle {
        let handle = self.sources[self.cursor];
        self.cursor = (self.cursor + 1) % self.sources.len();
        handle
    }

    /// Index of the next source to hand out
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Sources in pool order
    pub fn sources(&self) -> &[SourceHandle] {
        &self.sources
    }

    /// Return every source to the backend
    pub fn release<B: AudioBackend + ?Sized>(self, backend: &mut B) {
        for handle in self.sources {
            if let Err(e) = backend.destroy_source(handle) {
                log::debug!("Pool source already gone: {e}");
            }
        }
    }
}
