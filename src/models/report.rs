//! Pizza analysis models

use chrono::NaiveDate;
use crate::api::blockchair::Transaction;

/// Result of analyzing one day of transactions
#[derive(Debug, Clone)]
pub struct PizzaReport {
    pub date: NaiveDate,
    pub total_transactions: usize,
    pub pizza_transactions: Vec<Transaction>,
}

impl PizzaReport {
    pub fn pizza_count(&self) -> usize {
        self.pizza_transactions.len()
    }

    /// Share of pizza-like transactions in percent, `None` for an empty day
    pub fn pizza_ratio(&self) -> Option<f64> {
        if self.total_transactions == 0 {
            return None;
        }
        Some(self.pizza_count() as f64 / self.total_transactions as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(total: usize, pizzas: usize) -> PizzaReport {
        PizzaReport {
            date: NaiveDate::from_ymd_opt(2010, 5, 22).unwrap(),
            total_transactions: total,
            pizza_transactions: vec![Transaction::default(); pizzas],
        }
    }

    #[test]
    fn test_ratio_empty_day() {
        assert_eq!(report(0, 0).pizza_ratio(), None);
    }

    #[test]
    fn test_ratio() {
        let r = report(8, 2);
        assert_eq!(r.pizza_count(), 2);
        assert_eq!(r.pizza_ratio(), Some(25.0));
        assert_eq!(report(3, 0).pizza_ratio(), Some(0.0));
    }
}
