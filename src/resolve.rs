//! Resolver: compares the fetched listing against the watermark to compute
//! the ordered set of entries to process.
//!
//! The listing arrives newest-first (the source's natural publication order);
//! the resolver returns oldest-first so the watermark advances monotonically
//! through genuinely new entries in issuance order. It never emits an entry at
//! or before the watermark.

use tracing::{info, warn};

use crate::contract::ListingEntry;

/// Compute the entries to process, oldest-first.
///
/// With no watermark the bootstrap policy applies: only the single newest
/// entry is returned, so a first run never mass-backfills history. When the
/// watermark id no longer appears anywhere in the listing (the source purged
/// or reordered history), the resolver falls back to the bootstrap policy
/// rather than guessing a range.
pub fn resolve_new_entries(
    listing: &[ListingEntry],
    watermark: Option<&str>,
) -> Vec<ListingEntry> {
    let Some(newest) = listing.first() else {
        return Vec::new();
    };

    let Some(mark) = watermark else {
        info!(id = %newest.id, "No watermark; bootstrapping from the newest entry");
        return vec![newest.clone()];
    };

    let mut fresh: Vec<ListingEntry> = Vec::new();
    let mut mark_seen = false;
    for entry in listing {
        if entry.id == mark {
            mark_seen = true;
            break;
        }
        fresh.push(entry.clone());
    }

    if !mark_seen {
        warn!(
            watermark = %mark,
            "Watermark id not present in the current listing; falling back to bootstrap"
        );
        return vec![newest.clone()];
    }

    fresh.reverse();
    info!(count = fresh.len(), watermark = %mark, "Resolved new entries");
    fresh
}
