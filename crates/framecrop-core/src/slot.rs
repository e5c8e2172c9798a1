//! Ownership of the single live session across file loads.
//!
//! Loads are tagged with a generation number. Only the result of the most
//! recent load may replace the live session; anything older is dropped. A
//! failed load keeps whatever session was live before it started.

use crate::session::{LoadError, Session};

/// Handle for one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a completed load.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The session replaced the previous one.
    Applied,
    /// A newer load had started; the result was discarded.
    Stale,
    /// The newest load failed; the previous session is still live.
    Failed(LoadError),
}

/// Holder for the current [`Session`].
#[derive(Debug, Default)]
pub struct SessionSlot {
    current: Option<Session>,
    latest: u64,
    pending: bool,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest += 1;
        self.pending = true;
        LoadTicket {
            generation: self.latest,
        }
    }

    /// Hand back the result of the load identified by `ticket`.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Session, LoadError>,
    ) -> LoadOutcome {
        if ticket.generation != self.latest {
            tracing::warn!(
                generation = ticket.generation,
                latest = self.latest,
                "discarding stale load"
            );
            return LoadOutcome::Stale;
        }

        self.pending = false;
        match result {
            Ok(session) => {
                self.current = Some(session);
                LoadOutcome::Applied
            }
            Err(err) => {
                tracing::warn!("load failed, keeping previous session: {err}");
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending
    }

    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Mutable access to the live session, refused while a load is in flight.
    pub fn session_mut(&mut self) -> Option<&mut Session> {
        if self.pending {
            return None;
        }
        self.current.as_mut()
    }

    /// Drop the live session (e.g. the directory became empty).
    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CropConfig;
    use crate::decode::{DecodeError, DecodedImage, ExifOrientation, ImageInfo};

    fn session(width: u32) -> Session {
        let decoded = DecodedImage::filled(width, 96, [0, 0, 0]);
        let info = ImageInfo::new(ExifOrientation::Normal, width, 96);
        Session::from_decoded(decoded, info, &CropConfig::with_target(80, 48)).unwrap()
    }

    #[test]
    fn test_applies_latest() {
        let mut slot = SessionSlot::new();
        let ticket = slot.begin_load();
        assert!(slot.is_loading());

        assert!(matches!(
            slot.complete_load(ticket, Ok(session(256))),
            LoadOutcome::Applied
        ));
        assert!(!slot.is_loading());
        assert_eq!(slot.session().unwrap().info().width, 256);
    }

    #[test]
    fn test_stale_result_discarded() {
        let mut slot = SessionSlot::new();
        let first = slot.begin_load();
        let second = slot.begin_load();

        assert!(matches!(
            slot.complete_load(first, Ok(session(200))),
            LoadOutcome::Stale
        ));
        assert!(slot.session().is_none());
        assert!(slot.is_loading());

        slot.complete_load(second, Ok(session(300)));
        assert_eq!(slot.session().unwrap().info().width, 300);
    }

    #[test]
    fn test_stale_after_newer_applied() {
        let mut slot = SessionSlot::new();
        let first = slot.begin_load();
        let second = slot.begin_load();

        slot.complete_load(second, Ok(session(300)));
        assert!(matches!(
            slot.complete_load(first, Ok(session(200))),
            LoadOutcome::Stale
        ));
        assert_eq!(slot.session().unwrap().info().width, 300);
    }

    #[test]
    fn test_failure_keeps_previous_session() {
        let mut slot = SessionSlot::new();
        let ticket = slot.begin_load();
        slot.complete_load(ticket, Ok(session(256)));

        let ticket = slot.begin_load();
        let outcome = slot.complete_load(ticket, Err(DecodeError::InvalidFormat.into()));

        assert!(matches!(outcome, LoadOutcome::Failed(LoadError::Decode(_))));
        assert_eq!(slot.session().unwrap().info().width, 256);
        assert!(!slot.is_loading());
    }

    #[test]
    fn test_no_mutation_while_loading() {
        let mut slot = SessionSlot::new();
        let ticket = slot.begin_load();
        slot.complete_load(ticket, Ok(session(256)));
        assert!(slot.session_mut().is_some());

        let pending = slot.begin_load();
        assert!(slot.session_mut().is_none());
        assert!(slot.session().is_some());

        slot.complete_load(pending, Ok(session(320)));
        assert!(slot.session_mut().is_some());
    }

    #[test]
    fn test_tickets_increase() {
        let mut slot = SessionSlot::new();
        let a = slot.begin_load();
        let b = slot.begin_load();
        assert!(b.generation() > a.generation());
    }
}
