//! Outreach session state machine.
//!
//! A [`Session`] owns the imported contacts, the cursor and the two tracking
//! sets. Every mutator returns a fresh [`SessionView`] with everything needed
//! to redraw: current contact, composed message, counters and per-contact
//! statuses.
//!
//! Invariants:
//! - `cursor < contacts.len()` whenever the list is non-empty, `0` otherwise
//! - `copied` and `sent` only hold valid indices and only grow until the next
//!   `load` or `reset`

use std::collections::BTreeSet;

use serde::Serialize;

use crate::clipboard::{write_with_fallback, ClipboardWriter, CopyChannel};
use crate::compose::{compose_message, Variant};
use crate::contact::Contact;
use crate::error::ClipboardError;
use crate::progress::{ContactStatus, Progress};

#[derive(Debug, Clone, Default)]
pub struct Session {
    contacts: Vec<Contact>,
    cursor: usize,
    copied: BTreeSet<usize>,
    sent: BTreeSet<usize>,
    template: String,
    variant: Variant,
}

/// Snapshot of a session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    /// Zero-based cursor position.
    pub position: usize,
    pub total: usize,
    pub current: Option<Contact>,
    pub current_status: Option<ContactStatus>,
    pub message: Option<String>,
    pub variant: Variant,
    pub progress: Progress,
    pub statuses: Vec<ContactStatus>,
    pub can_go_prev: bool,
    pub can_go_next: bool,
}

impl Session {
    pub fn new(template: impl Into<String>, variant: Variant) -> Self {
        Self {
            template: template.into(),
            variant,
            ..Self::default()
        }
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    /// Replace the contact list and start over at the first contact.
    pub fn load(&mut self, contacts: Vec<Contact>) -> SessionView {
        log::debug!("session loaded with {} contacts", contacts.len());
        self.contacts = contacts;
        self.cursor = 0;
        self.copied.clear();
        self.sent.clear();
        self.view()
    }

    /// Drop contacts and tracking. Template and variant are kept.
    pub fn reset(&mut self) -> SessionView {
        self.contacts.clear();
        self.cursor = 0;
        self.copied.clear();
        self.sent.clear();
        self.view()
    }

    pub fn go_prev(&mut self) -> SessionView {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        self.view()
    }

    /// Move to the next contact, recording the current one as sent.
    ///
    /// Advancing *is* the "sent" signal; there is no separate way to mark a
    /// contact sent. No-op on the last contact and on an empty list.
    pub fn advance_and_mark_sent(&mut self) -> SessionView {
        if self.cursor + 1 < self.contacts.len() {
            self.sent.insert(self.cursor);
            self.cursor += 1;
        }
        self.view()
    }

    /// Record the current contact as copied. Idempotent.
    pub fn mark_copied(&mut self) -> SessionView {
        if !self.contacts.is_empty() {
            self.copied.insert(self.cursor);
        }
        self.view()
    }

    /// Move the cursor; out-of-range indices are ignored.
    pub fn jump_to(&mut self, index: usize) -> SessionView {
        if index < self.contacts.len() {
            self.cursor = index;
        } else {
            log::debug!("ignoring jump to {} ({} contacts)", index, self.contacts.len());
        }
        self.view()
    }

    pub fn set_template(&mut self, template: impl Into<String>) -> SessionView {
        self.template = template.into();
        self.view()
    }

    pub fn set_variant(&mut self, variant: Variant) -> SessionView {
        self.variant = variant;
        self.view()
    }

    /// Compose the current message and put it on the clipboard.
    ///
    /// The contact is marked copied only after one of the writers succeeds.
    /// Returns `Ok(None)` when there is nothing to copy.
    pub fn copy_current(
        &mut self,
        primary: &mut dyn ClipboardWriter,
        fallback: &mut dyn ClipboardWriter,
    ) -> Result<Option<CopyChannel>, ClipboardError> {
        let Some(message) = self.compose_message() else {
            return Ok(None);
        };
        let channel = write_with_fallback(&message, primary, fallback)?;
        self.mark_copied();
        Ok(Some(channel))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&Contact> {
        self.contacts.get(self.cursor)
    }

    pub fn copied(&self) -> &BTreeSet<usize> {
        &self.copied
    }

    pub fn sent(&self) -> &BTreeSet<usize> {
        &self.sent
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Message for the current contact, `None` on an empty session.
    pub fn compose_message(&self) -> Option<String> {
        self.current()
            .map(|c| compose_message(&self.template, c, self.variant))
    }

    pub fn progress(&self) -> Progress {
        Progress::compute(&self.contacts, &self.sent, &self.copied)
    }

    pub fn status(&self, index: usize) -> Option<ContactStatus> {
        self.contacts
            .get(index)
            .map(|c| ContactStatus::of(index, c, &self.sent, &self.copied))
    }

    pub fn statuses(&self) -> Vec<ContactStatus> {
        self.contacts
            .iter()
            .enumerate()
            .map(|(i, c)| ContactStatus::of(i, c, &self.sent, &self.copied))
            .collect()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            position: self.cursor,
            total: self.contacts.len(),
            current: self.current().cloned(),
            current_status: self.status(self.cursor),
            message: self.compose_message(),
            variant: self.variant,
            progress: self.progress(),
            statuses: self.statuses(),
            can_go_prev: self.cursor > 0,
            can_go_next: self.cursor + 1 < self.contacts.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::testing::MemoryClipboard;

    fn contact(name: &str, welcome: bool) -> Contact {
        Contact {
            date: "-".into(),
            first_name: name.into(),
            last_name: String::new(),
            phone: "600".into(),
            welcome_sent: welcome,
            agent: "Luis".into(),
        }
    }

    fn session(n: usize) -> Session {
        let mut s = Session::new("Hola {nombre}", Variant::Femenino);
        s.load((0..n).map(|i| contact(&format!("C{i}"), false)).collect());
        s
    }

    #[test]
    fn load_resets_cursor_and_sets() {
        let mut s = session(3);
        s.advance_and_mark_sent();
        s.mark_copied();
        let view = s.load(vec![contact("Ana", false)]);
        assert_eq!(view.position, 0);
        assert_eq!(view.total, 1);
        assert!(s.copied().is_empty());
        assert!(s.sent().is_empty());
    }

    #[test]
    fn go_prev_at_start_is_noop() {
        let mut s = session(3);
        assert_eq!(s.go_prev().position, 0);
        s.jump_to(2);
        assert_eq!(s.go_prev().position, 1);
    }

    #[test]
    fn advance_marks_previous_as_sent() {
        let mut s = session(3);
        let view = s.advance_and_mark_sent();
        assert_eq!(view.position, 1);
        assert_eq!(s.sent().iter().copied().collect::<Vec<_>>(), vec![0]);
        assert_eq!(view.statuses[0], ContactStatus::Sent);
    }

    #[test]
    fn advance_at_last_index_is_noop() {
        let mut s = session(2);
        s.jump_to(1);
        let view = s.advance_and_mark_sent();
        assert_eq!(view.position, 1);
        assert!(s.sent().is_empty());
        assert!(!view.can_go_next);
    }

    #[test]
    fn advance_on_empty_session_is_noop() {
        let mut s = Session::new("", Variant::Femenino);
        let view = s.advance_and_mark_sent();
        assert_eq!(view.position, 0);
        assert!(s.sent().is_empty());
        assert!(view.current.is_none());
    }

    #[test]
    fn mark_copied_twice_keeps_one_entry() {
        let mut s = session(2);
        s.mark_copied();
        let view = s.mark_copied();
        assert_eq!(s.copied().len(), 1);
        assert!(s.copied().contains(&0));
        assert_eq!(view.progress.copied, 1);
        assert_eq!(view.current_status, Some(ContactStatus::Copied));
    }

    #[test]
    fn mark_copied_on_empty_session_is_noop() {
        let mut s = Session::new("", Variant::Femenino);
        s.mark_copied();
        assert!(s.copied().is_empty());
    }

    #[test]
    fn jump_out_of_range_is_ignored() {
        let mut s = session(3);
        s.jump_to(1);
        assert_eq!(s.jump_to(3).position, 1);
        assert_eq!(s.jump_to(usize::MAX).position, 1);
        assert_eq!(s.jump_to(2).position, 2);
    }

    #[test]
    fn reset_keeps_template_and_variant() {
        let mut s = session(3);
        s.set_variant(Variant::Masculino);
        s.advance_and_mark_sent();
        s.mark_copied();
        let view = s.reset();
        assert!(s.is_empty());
        assert_eq!(s.cursor(), 0);
        assert!(s.copied().is_empty());
        assert!(s.sent().is_empty());
        assert_eq!(s.template(), "Hola {nombre}");
        assert_eq!(s.variant(), Variant::Masculino);
        assert!(!view.progress.all_done);
    }

    #[test]
    fn all_done_follows_welcome_and_sent() {
        let mut s = Session::new("", Variant::Femenino);
        s.load(vec![contact("A", true), contact("B", false), contact("C", true)]);
        assert!(!s.progress().all_done);
        s.jump_to(1);
        let view = s.advance_and_mark_sent();
        assert_eq!(view.position, 2);
        assert!(view.progress.all_done);
        assert_eq!(view.progress.sent, 3);
    }

    #[test]
    fn copying_the_last_contact_completes_the_session() {
        let mut s = session(2);
        s.advance_and_mark_sent();
        assert!(!s.progress().all_done);
        let view = s.mark_copied();
        assert_eq!(view.progress.pending, 0);
        assert!(view.progress.all_done);
    }

    #[test]
    fn message_tracks_template_variant_and_cursor() {
        let mut s = session(2);
        assert_eq!(s.view().message.as_deref(), Some("Hola C0"));
        s.advance_and_mark_sent();
        assert_eq!(s.view().message.as_deref(), Some("Hola C1"));
        let view = s.set_template("{bienvenida} {nombre}");
        assert_eq!(view.message.as_deref(), Some("Bienvenida C1"));
        let view = s.set_variant(Variant::Masculino);
        assert_eq!(view.message.as_deref(), Some("Bienvenido C1"));
    }

    #[test]
    fn copy_marks_contact_after_successful_write() {
        let mut s = session(2);
        let mut primary = MemoryClipboard::working();
        let mut fallback = MemoryClipboard::working();
        let channel = s.copy_current(&mut primary, &mut fallback).unwrap();
        assert_eq!(channel, Some(CopyChannel::Primary));
        assert_eq!(primary.writes, vec!["Hola C0"]);
        assert!(s.copied().contains(&0));
    }

    #[test]
    fn copy_uses_fallback_and_still_marks() {
        let mut s = session(2);
        let mut primary = MemoryClipboard::broken();
        let mut fallback = MemoryClipboard::working();
        let channel = s.copy_current(&mut primary, &mut fallback).unwrap();
        assert_eq!(channel, Some(CopyChannel::Fallback));
        assert!(s.copied().contains(&0));
    }

    #[test]
    fn failed_copy_leaves_copied_untouched() {
        let mut s = session(2);
        let mut primary = MemoryClipboard::broken();
        let mut fallback = MemoryClipboard::broken();
        let err = s.copy_current(&mut primary, &mut fallback).unwrap_err();
        assert!(err.is_unavailable());
        assert!(s.copied().is_empty());
    }

    #[test]
    fn copy_on_empty_session_writes_nothing() {
        let mut s = Session::new("Hola", Variant::Femenino);
        let mut primary = MemoryClipboard::working();
        let mut fallback = MemoryClipboard::working();
        assert_eq!(s.copy_current(&mut primary, &mut fallback), Ok(None));
        assert!(primary.writes.is_empty());
    }
}
