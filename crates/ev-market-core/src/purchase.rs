use ev_chain_client::TransferReceipt;

/// Where a single buy attempt stands.
///
/// `Idle → RequireConnect` when no wallet is connected (the attempt ends
/// there), otherwise `Idle → Authorizing → Confirming → Fulfilled`. `Failed`
/// is reachable from every non-terminal phase except `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchasePhase {
    Idle,
    RequireConnect,
    Authorizing,
    Confirming,
    Fulfilled,
    Failed,
}

impl PurchasePhase {
    pub fn can_advance_to(self, next: PurchasePhase) -> bool {
        use PurchasePhase::*;
        matches!(
            (self, next),
            (Idle, RequireConnect)
                | (Idle, Authorizing)
                | (Authorizing, Confirming)
                | (Confirming, Fulfilled)
                | (RequireConnect, Failed)
                | (Authorizing, Failed)
                | (Confirming, Failed)
        )
    }

    /// Label shown on the buy button while an attempt is in flight.
    pub fn label(self) -> &'static str {
        match self {
            PurchasePhase::Idle => "Buy Asset",
            PurchasePhase::RequireConnect => "Connecting...",
            PurchasePhase::Authorizing => "Authorizing...",
            PurchasePhase::Confirming => "Confirming...",
            PurchasePhase::Fulfilled => "Acquired",
            PurchasePhase::Failed => "Buy Asset",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// Transfer confirmed and the listing left the catalog.
    Fulfilled(TransferReceipt),
    /// No wallet was connected; a connect was started and the buy stopped.
    RequireConnect,
    /// A buy for the same listing is already in flight.
    AlreadyPending,
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::PurchasePhase::*;

    #[test]
    fn happy_path_transitions_are_allowed() {
        assert!(Idle.can_advance_to(Authorizing));
        assert!(Authorizing.can_advance_to(Confirming));
        assert!(Confirming.can_advance_to(Fulfilled));
    }

    #[test]
    fn failure_is_reachable_from_active_phases_only() {
        assert!(RequireConnect.can_advance_to(Failed));
        assert!(Authorizing.can_advance_to(Failed));
        assert!(Confirming.can_advance_to(Failed));
        assert!(!Idle.can_advance_to(Failed));
        assert!(!Fulfilled.can_advance_to(Failed));
    }

    #[test]
    fn phases_cannot_be_skipped() {
        assert!(!Idle.can_advance_to(Fulfilled));
        assert!(!Authorizing.can_advance_to(Fulfilled));
        assert!(!RequireConnect.can_advance_to(Authorizing));
    }
}
