use std::collections::BTreeSet;

use serde::Serialize;

use crate::contact::Contact;

/// Per-contact status, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    /// Source data says a welcome was already sent.
    WelcomeSent,
    /// Advanced past during this session.
    Sent,
    /// Message copied during this session.
    Copied,
    None,
}

impl ContactStatus {
    pub fn of(index: usize, contact: &Contact, sent: &BTreeSet<usize>, copied: &BTreeSet<usize>) -> Self {
        if contact.welcome_sent {
            Self::WelcomeSent
        } else if sent.contains(&index) {
            Self::Sent
        } else if copied.contains(&index) {
            Self::Copied
        } else {
            Self::None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::WelcomeSent => "Bienvenida enviada",
            Self::Sent => "Enviado",
            Self::Copied => "Copiado",
            Self::None => "Pendiente",
        }
    }
}

/// Counters derived from a session; recomputed on every change, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Progress {
    pub total: usize,
    pub sent: usize,
    pub copied: usize,
    pub pending: usize,
    pub all_done: bool,
}

impl Progress {
    pub fn compute(contacts: &[Contact], sent: &BTreeSet<usize>, copied: &BTreeSet<usize>) -> Self {
        let total_sent = contacts
            .iter()
            .enumerate()
            .filter(|(i, c)| c.welcome_sent || sent.contains(i))
            .count();
        let pending = contacts
            .iter()
            .enumerate()
            .filter(|(i, c)| !c.welcome_sent && !sent.contains(i) && !copied.contains(i))
            .count();
        Self {
            total: contacts.len(),
            sent: total_sent,
            copied: copied.len(),
            pending,
            all_done: pending == 0 && !contacts.is_empty(),
        }
    }

    /// One-line summary in the style of the session header.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.sent > 0 {
            parts.push(format!("{} ya enviados", self.sent));
        }
        if self.copied > 0 {
            parts.push(format!("{} copiados en esta sesion", self.copied));
        }
        parts.push(format!("{} pendientes", self.pending));
        parts.join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contacts(welcome: &[bool]) -> Vec<Contact> {
        welcome
            .iter()
            .enumerate()
            .map(|(i, w)| Contact {
                date: "-".into(),
                first_name: format!("C{i}"),
                last_name: String::new(),
                phone: "-".into(),
                welcome_sent: *w,
                agent: "-".into(),
            })
            .collect()
    }

    fn set(items: &[usize]) -> BTreeSet<usize> {
        items.iter().copied().collect()
    }

    #[test]
    fn status_priority() {
        let cs = contacts(&[true, false, false, false]);
        let sent = set(&[0, 1]);
        let copied = set(&[0, 1, 2]);
        let statuses: Vec<_> = cs
            .iter()
            .enumerate()
            .map(|(i, c)| ContactStatus::of(i, c, &sent, &copied))
            .collect();
        assert_eq!(
            statuses,
            vec![
                ContactStatus::WelcomeSent,
                ContactStatus::Sent,
                ContactStatus::Copied,
                ContactStatus::None
            ]
        );
    }

    #[test]
    fn counters() {
        let cs = contacts(&[true, false, false, false]);
        let p = Progress::compute(&cs, &set(&[1]), &set(&[1, 2]));
        assert_eq!(p.total, 4);
        assert_eq!(p.sent, 2);
        assert_eq!(p.copied, 2);
        assert_eq!(p.pending, 1);
        assert!(!p.all_done);
    }

    #[test]
    fn welcome_and_sent_overlap_counts_once() {
        let cs = contacts(&[true, false]);
        let p = Progress::compute(&cs, &set(&[0, 1]), &set(&[]));
        assert_eq!(p.sent, 2);
        assert!(p.all_done);
    }

    #[test]
    fn empty_list_is_never_done() {
        let p = Progress::compute(&[], &set(&[]), &set(&[]));
        assert_eq!(p, Progress::default());
        assert!(!p.all_done);
    }

    #[test]
    fn summary_text() {
        let cs = contacts(&[true, false, false]);
        let p = Progress::compute(&cs, &set(&[]), &set(&[1]));
        assert_eq!(p.summary(), "1 ya enviados | 1 copiados en esta sesion | 1 pendientes");
    }
}
