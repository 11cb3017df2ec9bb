//! Server-wins reconciliation.
//!
//! Every fetch is authoritative for the remote-owned subset: previously
//! remote-owned records are dropped wholesale and the incoming page is
//! re-inserted. An incoming record that matches a surviving record (text
//! case-insensitive, category exact) replaces it in place; otherwise it is
//! appended. Records outside the fetched page are lost until they show up in
//! a later page.

use crate::models::QuoteRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Incoming records that overwrote an existing one
    pub replaced: usize,
    /// Incoming records appended at the end
    pub appended: usize,
    /// Remote-owned records from before the call that were dropped
    pub discarded_remote: usize,
}

impl ReconcileReport {
    pub fn conflicts(&self) -> usize {
        self.replaced
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub quotes: Vec<QuoteRecord>,
    pub report: ReconcileReport,
}

pub fn reconcile(current: &[QuoteRecord], incoming: Vec<QuoteRecord>) -> Reconciled {
    let (remote_owned, local_only): (Vec<&QuoteRecord>, Vec<&QuoteRecord>) =
        current.iter().partition(|q| q.is_remote_owned());

    let mut report = ReconcileReport {
        discarded_remote: remote_owned.len(),
        ..ReconcileReport::default()
    };

    let mut quotes: Vec<QuoteRecord> = local_only.into_iter().cloned().collect();
    for remote in incoming {
        match quotes.iter().position(|existing| existing.same_quote_as(&remote)) {
            Some(index) => {
                tracing::debug!(
                    remote_id = ?remote.remote_id,
                    "server wins: replacing '{}' ({})",
                    quotes[index].text,
                    quotes[index].category
                );
                quotes[index] = remote;
                report.replaced += 1;
            }
            None => {
                quotes.push(remote);
                report.appended += 1;
            }
        }
    }

    Reconciled { quotes, report }
}
