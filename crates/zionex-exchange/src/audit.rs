//! Append-only audit log.
//!
//! Every committed state change appends one [`AuditRecord`]. Records are
//! numbered from 1 and hash-chained: each hash covers the previous hash,
//! the sequence number and the event fields, so a monitor can detect a
//! gap or an edited record by recomputing the chain.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zionex_types::{LedgerEvent, Result, constants};

/// One entry of the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Position in the log, starting at 1.
    pub seq: u64,
    pub event: LedgerEvent,
    /// Hex SHA-256 chain hash of this record.
    pub hash: String,
}

/// The exchange's audit trail.
#[derive(Debug, Default)]
pub struct AuditLog {
    records: Vec<AuditRecord>,
    head: [u8; 32],
}

impl AuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `event` and return the stored record.
    pub fn append(&mut self, event: LedgerEvent) -> &AuditRecord {
        let seq = self.records.len() as u64 + 1;
        self.head = chain_hash(&self.head, seq, &event);
        tracing::trace!(seq, event = event.name(), "audit record appended");
        self.records.push(AuditRecord {
            seq,
            event,
            hash: hex::encode(self.head),
        });
        &self.records[self.records.len() - 1]
    }

    #[must_use]
    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    /// Records with a sequence number greater than `seq`.
    #[must_use]
    pub fn since(&self, seq: u64) -> &[AuditRecord] {
        let start = usize::try_from(seq).unwrap_or(usize::MAX).min(self.records.len());
        &self.records[start..]
    }

    /// Hash of the latest record (all zeros when empty).
    #[must_use]
    pub fn head(&self) -> [u8; 32] {
        self.head
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recompute the chain over `records` and check every stored hash.
    #[must_use]
    pub fn verify_chain(records: &[AuditRecord]) -> bool {
        let mut head = [0u8; 32];
        for (i, record) in records.iter().enumerate() {
            if record.seq != i as u64 + 1 {
                return false;
            }
            head = chain_hash(&head, record.seq, &record.event);
            if record.hash != hex::encode(head) {
                return false;
            }
        }
        true
    }

    /// One JSON object per line, for shipping to external monitors.
    pub fn to_json_lines(&self) -> Result<String> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }
}

/// `sha256(domain ‖ prev ‖ seq ‖ event fields)`.
fn chain_hash(prev: &[u8; 32], seq: u64, event: &LedgerEvent) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(constants::AUDIT_CHAIN_DOMAIN);
    hasher.update(prev);
    hasher.update(seq.to_le_bytes());
    hasher.update(event.name().as_bytes());
    match event {
        LedgerEvent::Deposit {
            asset,
            account,
            amount,
            new_balance,
        }
        | LedgerEvent::Withdraw {
            asset,
            account,
            amount,
            new_balance,
        } => {
            hasher.update(asset.address().as_bytes());
            hasher.update(account.as_bytes());
            hasher.update(amount.to_le_bytes());
            hasher.update(new_balance.to_le_bytes());
        }
        LedgerEvent::Order {
            id,
            owner,
            want_asset,
            want_amount,
            give_asset,
            give_amount,
            created_at,
        }
        | LedgerEvent::Cancel {
            id,
            owner,
            want_asset,
            want_amount,
            give_asset,
            give_amount,
            created_at,
        } => {
            hasher.update(id.0.to_le_bytes());
            hasher.update(owner.as_bytes());
            hasher.update(want_asset.address().as_bytes());
            hasher.update(want_amount.to_le_bytes());
            hasher.update(give_asset.address().as_bytes());
            hasher.update(give_amount.to_le_bytes());
            hasher.update(created_at.to_rfc3339_opts(SecondsFormat::Nanos, true).as_bytes());
        }
        LedgerEvent::Trade {
            id,
            owner,
            want_asset,
            want_amount,
            give_asset,
            give_amount,
            filler,
            created_at,
        } => {
            hasher.update(id.0.to_le_bytes());
            hasher.update(owner.as_bytes());
            hasher.update(want_asset.address().as_bytes());
            hasher.update(want_amount.to_le_bytes());
            hasher.update(give_asset.address().as_bytes());
            hasher.update(give_amount.to_le_bytes());
            hasher.update(filler.as_bytes());
            hasher.update(created_at.to_rfc3339_opts(SecondsFormat::Nanos, true).as_bytes());
        }
    }
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}
