//! Paste completion for hosts without a paste-content event.
//!
//! The host snapshots the raw field content when the paste starts, then polls
//! every [`PASTE_POLL_INTERVAL`] until the content differs. Every event the
//! field handles after [`MaskedField::begin_paste`] makes the ticket stale, so
//! a slow poll can never overwrite a newer edit.

use log::{debug, warn};
use std::time::Duration;

use crate::editing::{MaskedField, Patch};

pub const PASTE_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Polls allowed before a ticket expires (one second at the default interval).
pub const MAX_PASTE_POLLS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteTicket {
    generation: u64,
    prior: String,
    polls: u32,
}

impl PasteTicket {
    /// Raw field content captured when the paste started.
    pub fn prior(&self) -> &str {
        &self.prior
    }

    pub fn polls(&self) -> u32 {
        self.polls
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteStatus {
    /// Content has not changed yet; poll again after [`PASTE_POLL_INTERVAL`].
    Pending,
    /// The field handled another event since the ticket was issued, or the
    /// ticket ran out of polls. Stop polling.
    Stale,
    /// The pasted content was cleaned into the buffer.
    Applied(Patch),
}

impl MaskedField {
    /// Start waiting for pasted content. `prior` is the raw field content at
    /// the moment of the paste. Inert fields return `None`.
    pub fn begin_paste(&mut self, prior: &str) -> Option<PasteTicket> {
        if self.is_inert() {
            return None;
        }
        self.generation += 1;
        debug!("Paste started at generation {}", self.generation);
        Some(PasteTicket {
            generation: self.generation,
            prior: prior.to_string(),
            polls: 0,
        })
    }

    /// Check whether the raw field content has changed since `ticket` was
    /// issued and, if so, apply it as the paste.
    pub fn complete_paste(&mut self, ticket: &mut PasteTicket, current: &str) -> PasteStatus {
        if ticket.generation != self.generation {
            warn!(
                "Dropping stale paste from generation {} (field at {})",
                ticket.generation, self.generation
            );
            return PasteStatus::Stale;
        }
        if current == ticket.prior {
            ticket.polls += 1;
            if ticket.polls > MAX_PASTE_POLLS {
                warn!("Paste content never arrived after {MAX_PASTE_POLLS} polls");
                return PasteStatus::Stale;
            }
            return PasteStatus::Pending;
        }

        // The paste itself counts as an event: the same ticket cannot apply twice.
        self.generation += 1;
        match self.apply_paste(current) {
            Some(patch) => PasteStatus::Applied(patch),
            None => PasteStatus::Stale,
        }
    }
}
