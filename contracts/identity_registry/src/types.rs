//! Shared data structures for the identity registry.

use soroban_sdk::{contracttype, Address, Bytes};

/// A compliance claim: a trusted issuer's assertion that `identity` satisfies
/// the predicate identified by `topic_id`.
///
/// Re-issuing a claim for the same `(identity, topic_id)` pair overwrites the
/// previous record. Revocation sets the `revoked` flag and keeps the record;
/// claims are never deleted, so the audit trail survives.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Claim {
    pub identity: Address,
    pub topic_id: u32,
    pub issuer: Address,
    /// Opaque issuer payload (e.g. a document-hash or reference id).
    pub data: Bytes,
    pub issued_at: u64,
    /// Ledger timestamp after which the claim is stale; `0` means no expiry.
    pub expires_at: u64,
    pub revoked: bool,
    pub active: bool,
}
