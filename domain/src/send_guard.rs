//! Tracks summary emails that are currently being handed to the mail provider.
//!
//! A double-clicked "send" button produces two identical requests a few
//! milliseconds apart. Each send holds a [`SendPermit`] for its
//! `(recipient, body)` fingerprint until the provider call returns, and a second
//! identical request arriving meanwhile is refused.

use dashmap::DashSet;
use sha2::{Digest, Sha256};

#[derive(Debug, Default)]
pub struct InFlightSends {
    pending: DashSet<String>,
}

/// Held for the duration of one send; releases its fingerprint on drop.
#[derive(Debug)]
pub struct SendPermit<'a> {
    key: String,
    pending: &'a DashSet<String>,
}

impl InFlightSends {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the fingerprint of `(recipient, body)`, or returns `None` when an
    /// identical send already holds it.
    pub fn try_acquire(&self, recipient: &str, body: &str) -> Option<SendPermit<'_>> {
        let key = fingerprint(recipient, body);
        if self.pending.insert(key.clone()) {
            Some(SendPermit {
                key,
                pending: &self.pending,
            })
        } else {
            None
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Drop for SendPermit<'_> {
    fn drop(&mut self) {
        self.pending.remove(&self.key);
    }
}

// Addresses compare case-insensitively; bodies are compared exactly.
fn fingerprint(recipient: &str, body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(recipient.trim().to_lowercase().as_bytes());
    hasher.update([0u8]);
    hasher.update(body.as_bytes());
    hex::encode(hasher.finalize())
}
