use serde::Serialize;

/// Local mirror of the balances the transfer loop expects to move.
///
/// Updated optimistically after each accepted transfer and never checked
/// against the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bookkeeping {
    /// Expected balance of the sending account.
    pub t_amount: i128,
    /// Expected balance of the receiving account.
    pub s_amount: i128,
}

impl Bookkeeping {
    /// Start the transfer phase with the deposited amount on the sender.
    pub fn new(deposited: u64) -> Self {
        Self {
            t_amount: i128::from(deposited),
            s_amount: 0,
        }
    }

    pub fn record_transfer(&mut self, amount: u64) {
        let amount = i128::from(amount);
        self.t_amount -= amount;
        self.s_amount += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfers_move_amount_between_sides() {
        let mut books = Bookkeeping::new(10_000);
        books.record_transfer(9);
        books.record_transfer(9);
        assert_eq!(
            books,
            Bookkeeping {
                t_amount: 9_982,
                s_amount: 18,
            }
        );
    }

    #[test]
    fn test_sender_side_may_go_negative() {
        let mut books = Bookkeeping::new(5);
        books.record_transfer(9);
        assert_eq!(books.t_amount, -4);
        assert_eq!(books.s_amount, 9);
    }
}
