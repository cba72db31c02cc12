//! Circular dependency and depth detection for a single resolution pass.

use crate::error::{DiError, DiResult};

/// Providers currently under construction, innermost last.
///
/// One stack lives for the duration of one `invoke`/`resolve` call. Each
/// frame records the provider's registry index and the name of the type that
/// was requested from it, so a cycle reports the path as the caller sees it:
/// `["A", "B", "A"]`.
pub(crate) struct ResolutionStack {
    frames: Vec<(usize, &'static str)>,
    max_depth: usize,
    detect_cycles: bool,
}

impl ResolutionStack {
    pub(crate) fn new(max_depth: usize, detect_cycles: bool) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
            detect_cycles,
        }
    }

    /// Pushes a frame, failing if `provider` is already being built or the
    /// depth limit is reached.
    pub(crate) fn enter(&mut self, provider: usize, name: &'static str) -> DiResult<()> {
        // Circular detection BEFORE pushing the new frame
        if self.detect_cycles && self.frames.iter().any(|&(p, _)| p == provider) {
            let mut path: Vec<&'static str> = self.frames.iter().map(|&(_, n)| n).collect();
            path.push(name);
            return Err(DiError::Circular(path));
        }

        if self.frames.len() >= self.max_depth {
            return Err(DiError::DepthExceeded(self.max_depth));
        }

        self.frames.push((provider, name));
        Ok(())
    }

    /// Pops the innermost frame.
    pub(crate) fn leave(&mut self, provider: usize) {
        let popped = self.frames.pop();
        debug_assert_eq!(popped.map(|(p, _)| p), Some(provider));
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }
}
