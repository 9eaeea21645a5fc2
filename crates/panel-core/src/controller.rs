// ── Shared controller plumbing ──
//
// Options and settlement bookkeeping common to fetch and mutation
// controllers. Each controller instance owns its own guard; nothing here
// is shared across instances.

use std::sync::atomic::{AtomicU64, Ordering};

use panel_api::HeaderMap;

use crate::config::SettlementOrder;

/// Static options for a controller instance.
#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    /// Extra headers merged into every call (override same-named defaults).
    pub headers: HeaderMap,
    /// Which result wins when calls overlap.
    pub settlement: SettlementOrder,
}

impl ControllerOptions {
    pub fn with_settlement(settlement: SettlementOrder) -> Self {
        Self {
            headers: HeaderMap::new(),
            settlement,
        }
    }
}

/// Ticketing for overlapping calls on one controller.
#[derive(Debug)]
pub(crate) struct SettlementGuard {
    order: SettlementOrder,
    issued: AtomicU64,
    applied: AtomicU64,
}

/// Verdict for a settled call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    /// Apply the result. `still_loading` is set when a newer call is outstanding.
    Apply { still_loading: bool },
    /// A newer result has already been applied; drop this one.
    Discard,
}

impl SettlementGuard {
    pub(crate) fn new(order: SettlementOrder) -> Self {
        Self {
            order,
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    /// Take a ticket for a call about to start.
    pub(crate) fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Decide what to do with the result of `ticket`.
    pub(crate) fn admit(&self, ticket: u64) -> Admission {
        match self.order {
            SettlementOrder::LastSettled => Admission::Apply {
                still_loading: false,
            },
            SettlementOrder::LatestIssued => {
                let previous = self.applied.fetch_max(ticket, Ordering::SeqCst);
                if ticket < previous {
                    Admission::Discard
                } else {
                    Admission::Apply {
                        still_loading: ticket < self.issued.load(Ordering::SeqCst),
                    }
                }
            }
        }
    }
}
