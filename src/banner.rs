//! Transient error and success banners with cancellable timers
//!
//! Time is virtual: the owner advances the clock explicitly, which keeps
//! the expiry logic deterministic under test.

use crate::constants::BANNER_TTL_MS;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BannerKind {
    Error,
    Success,
}

/// A visible banner
#[derive(Clone, Debug, PartialEq)]
pub struct UiBanner {
    pub id: u64,
    pub kind: BannerKind,
    pub message: String,
    pub ttl_ms: u64,
}

/// Handle to an armed timer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Timer {
    handle: TimerHandle,
    deadline: u64,
    banner_id: u64,
}

/// Owns the error banner, the success banners and their timers
#[derive(Debug, Default)]
pub struct BannerPresenter {
    now_ms: u64,
    next_id: u64,
    error: Option<(UiBanner, TimerHandle)>,
    successes: Vec<(UiBanner, TimerHandle)>,
    timers: Vec<Timer>,
}

impl BannerPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current error banner and restart its timer
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.dismiss_error();
        let banner = self.make_banner(BannerKind::Error, message.into());
        let handle = self.arm(banner.id, banner.ttl_ms);
        tracing::debug!(message = %banner.message, "Error banner shown");
        self.error = Some((banner, handle));
    }

    /// Add an independent success banner
    pub fn show_success(&mut self, message: impl Into<String>) {
        let banner = self.make_banner(BannerKind::Success, message.into());
        let handle = self.arm(banner.id, banner.ttl_ms);
        self.successes.push((banner, handle));
    }

    /// Hide the error banner now, disarming its timer
    pub fn dismiss_error(&mut self) {
        if let Some((_, handle)) = self.error.take() {
            self.disarm(handle);
        }
    }

    /// Move the clock forward and drop every banner whose timer fired
    pub fn advance(&mut self, elapsed_ms: u64) {
        self.now_ms = self.now_ms.saturating_add(elapsed_ms);
        let now = self.now_ms;

        let (fired, pending): (Vec<Timer>, Vec<Timer>) =
            self.timers.drain(..).partition(|t| t.deadline <= now);
        self.timers = pending;

        for timer in fired {
            if self
                .error
                .as_ref()
                .is_some_and(|(_, handle)| *handle == timer.handle)
            {
                self.error = None;
            }
            self.successes.retain(|(banner, _)| banner.id != timer.banner_id);
        }
    }

    pub fn error(&self) -> Option<&UiBanner> {
        self.error.as_ref().map(|(banner, _)| banner)
    }

    pub fn successes(&self) -> impl Iterator<Item = &UiBanner> {
        self.successes.iter().map(|(banner, _)| banner)
    }

    /// Every visible banner, error first
    pub fn visible(&self) -> Vec<UiBanner> {
        self.error().into_iter().chain(self.successes()).cloned().collect()
    }

    /// Number of visible banners
    pub fn len(&self) -> usize {
        usize::from(self.error.is_some()) + self.successes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn armed_timers(&self) -> usize {
        self.timers.len()
    }

    fn make_banner(&mut self, kind: BannerKind, message: String) -> UiBanner {
        self.next_id += 1;
        UiBanner {
            id: self.next_id,
            kind,
            message,
            ttl_ms: BANNER_TTL_MS,
        }
    }

    fn arm(&mut self, banner_id: u64, ttl_ms: u64) -> TimerHandle {
        let handle = TimerHandle(banner_id);
        self.timers.push(Timer {
            handle,
            deadline: self.now_ms.saturating_add(ttl_ms),
            banner_id,
        });
        handle
    }

    fn disarm(&mut self, handle: TimerHandle) {
        self.timers.retain(|t| t.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_replaces_previous() {
        let mut banners = BannerPresenter::new();
        banners.show_error("first");
        banners.advance(3000);
        banners.show_error("second");

        assert_eq!(banners.error().map(|b| b.message.as_str()), Some("second"));
        assert_eq!(banners.armed_timers(), 1);

        // The first timer would have fired here; the replacement must survive
        banners.advance(2500);
        assert_eq!(banners.error().map(|b| b.message.as_str()), Some("second"));

        banners.advance(2500);
        assert!(banners.error().is_none());
    }

    #[test]
    fn test_dismiss_disarms_timer() {
        let mut banners = BannerPresenter::new();
        banners.show_error("oops");
        banners.dismiss_error();
        assert!(banners.error().is_none());
        assert_eq!(banners.armed_timers(), 0);
    }

    #[test]
    fn test_success_banners_expire_independently() {
        let mut banners = BannerPresenter::new();
        banners.show_success("one");
        banners.advance(2000);
        banners.show_success("two");
        banners.show_error("err");
        assert_eq!(banners.visible().len(), 3);

        banners.advance(3000);
        let left: Vec<String> = banners.successes().map(|b| b.message.clone()).collect();
        assert_eq!(left, vec!["two"]);

        banners.advance(1999);
        assert_eq!(banners.successes().count(), 1);
        banners.advance(1);
        assert_eq!(banners.successes().count(), 0);
        assert!(banners.error().is_none());
    }
}
