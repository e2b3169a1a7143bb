//! Flush gating for static frames.
//!
//! While gameplay runs the renderer flushes every frame. Paused/crashed
//! frames are static, so a flush only happens when the scene fingerprint
//! changes or a keep-alive interval elapses (covers terminals that drop
//! cells on resize or reattach).

#[derive(Debug, Clone)]
pub struct RenderThrottle {
    static_interval_ms: u64,
    last: Option<(u64, u64)>,
}

impl RenderThrottle {
    pub fn new(static_interval_ms: u64) -> Self {
        Self { static_interval_ms, last: None }
    }

    /// Decide whether to flush a frame at `now_ms`.
    ///
    /// `active = true` (gameplay) always flushes. Static frames flush on a
    /// fingerprint change, otherwise at most once per interval.
    pub fn should_flush(&mut self, now_ms: u64, fingerprint: u64, active: bool) -> bool {
        let flush = match self.last {
            None => true,
            Some(_) if active => true,
            Some((_, fp)) if fp != fingerprint => true,
            Some((at, _)) => now_ms.saturating_sub(at) >= self.static_interval_ms,
        };
        if flush {
            self.last = Some((now_ms, fingerprint));
        }
        flush
    }
}
