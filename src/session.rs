//! Per-visit view model for the application detail screen.
//!
//! A [`DetailSession`] owns the joined records fetched for one visit, the
//! status currently shown, and the busy flag that blocks a second status
//! update while one is outstanding. Nothing here is shared between visits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::models::{Application, ApplicationStatus};
use crate::services::detail_service::{ApplicationDetail, DetailKey, DetailService};

#[derive(Debug, Default)]
struct SessionState {
    detail: Option<ApplicationDetail>,
    current_status: ApplicationStatus,
}

#[derive(Debug)]
pub struct DetailSession {
    key: DetailKey,
    state: Mutex<SessionState>,
    busy: AtomicBool,
    last_used: Mutex<Instant>,
}

impl DetailSession {
    pub fn new(key: DetailKey) -> Self {
        Self {
            key,
            state: Mutex::new(SessionState::default()),
            busy: AtomicBool::new(false),
            last_used: Mutex::new(Instant::now()),
        }
    }

    pub fn key(&self) -> &DetailKey {
        &self.key
    }

    /// `Pendente` until the first successful load.
    pub fn current_status(&self) -> ApplicationStatus {
        self.lock_state().current_status
    }

    pub fn detail(&self) -> Option<ApplicationDetail> {
        self.lock_state().detail.clone()
    }

    pub fn application(&self) -> Option<Application> {
        self.lock_state()
            .detail
            .as_ref()
            .map(|d| d.application.clone())
    }

    pub fn is_loaded(&self) -> bool {
        self.lock_state().detail.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Runs the detail load for this session's identifiers. A failed load
    /// leaves whatever was shown before in place so the caller can retry.
    pub async fn load(&self, service: &DetailService) -> Result<ApplicationDetail> {
        self.touch();
        let detail = service.load(&self.key).await?;
        let mut state = self.lock_state();
        state.current_status = detail.status();
        state.detail = Some(detail.clone());
        Ok(detail)
    }

    /// Claims the busy flag. `None` while another update holds it.
    pub(crate) fn try_begin_update(&self) -> Option<BusyGuard<'_>> {
        self.touch();
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard { flag: &self.busy })
    }

    /// Reflects a confirmed write locally without re-reading the store.
    pub(crate) fn commit_status(&self, status: ApplicationStatus) {
        let mut state = self.lock_state();
        state.current_status = status;
        if let Some(detail) = state.detail.as_mut() {
            detail.application.status = status;
        }
    }

    pub fn touch(&self) {
        *self.last_used.lock().expect("session mutex poisoned") = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_used
            .lock()
            .expect("session mutex poisoned")
            .elapsed()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().expect("session mutex poisoned")
    }
}

/// Releases the busy flag when the update finishes, whatever its outcome.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_pending_and_unloaded() {
        let session = DetailSession::new(DetailKey::new("A1", "J1", "U1"));
        assert_eq!(session.current_status(), ApplicationStatus::Pendente);
        assert!(!session.is_loaded());
        assert!(session.application().is_none());
    }

    #[test]
    fn busy_flag_is_exclusive_and_released_on_drop() {
        let session = DetailSession::new(DetailKey::new("A1", "J1", "U1"));
        let guard = session.try_begin_update().expect("first claim");
        assert!(session.is_busy());
        assert!(session.try_begin_update().is_none());
        drop(guard);
        assert!(!session.is_busy());
        assert!(session.try_begin_update().is_some());
    }
}
