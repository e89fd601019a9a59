use crate::error::AppResult;

/// Seam for settling a booking. The ledger records whatever `charge`
/// reports; swapping in a real gateway is a state-construction change only.
pub trait PaymentGateway: Send + Sync {
    /// Attempt to settle the given amount. Returns whether the ticket
    /// should be recorded as paid.
    fn charge(&self, payment_method: &str, amount_cents: i64) -> AppResult<bool>;
}

/// Stand-in gateway: "card" settles immediately, anything else books unpaid.
/// No external call is made.
pub struct CardStubGateway;

impl PaymentGateway for CardStubGateway {
    fn charge(&self, payment_method: &str, _amount_cents: i64) -> AppResult<bool> {
        Ok(payment_method.eq_ignore_ascii_case("card"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_settles_immediately() {
        let gateway = CardStubGateway;
        assert!(gateway.charge("card", 12_000).unwrap());
        assert!(gateway.charge("CARD", 12_000).unwrap());
    }

    #[test]
    fn other_methods_book_unpaid() {
        let gateway = CardStubGateway;
        assert!(!gateway.charge("cash", 12_000).unwrap());
        assert!(!gateway.charge("", 0).unwrap());
    }
}
