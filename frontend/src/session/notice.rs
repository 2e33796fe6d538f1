//! Single-slot notice surface.
//!
//! A new notice replaces the visible one. Every notice gets a ticket;
//! dismissing with an outdated ticket does nothing, so the timer of a
//! replaced notice can not hide its successor.

use crate::types::Notice;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoticeSlot {
    current: Option<(u64, Notice)>,
    issued: u64,
}

impl NoticeSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `notice`, superseding any visible one. Returns its ticket.
    pub fn show(&mut self, notice: Notice) -> u64 {
        self.issued += 1;
        self.current = Some((self.issued, notice));
        self.issued
    }

    /// Hide the notice identified by `ticket` if it is still the visible one.
    pub fn dismiss(&mut self, ticket: u64) -> bool {
        match self.current {
            Some((visible, _)) if visible == ticket => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref().map(|(_, notice)| notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notice_supersedes_previous() {
        let mut slot = NoticeSlot::new();
        slot.show(Notice::info("Selection cleared"));
        slot.show(Notice::error("Error: Processing failed"));

        assert_eq!(slot.current(), Some(&Notice::error("Error: Processing failed")));
    }

    #[test]
    fn test_stale_ticket_does_not_dismiss_newer_notice() {
        let mut slot = NoticeSlot::new();
        let first = slot.show(Notice::info("first"));
        let second = slot.show(Notice::success("second"));

        assert!(!slot.dismiss(first));
        assert_eq!(slot.current(), Some(&Notice::success("second")));

        assert!(slot.dismiss(second));
        assert!(slot.current().is_none());
        assert!(!slot.dismiss(second));
    }
}
