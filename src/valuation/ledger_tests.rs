#[cfg(test)]
mod tests {
    use crate::transactions::{Transaction, TransactionSide};
    use crate::valuation::ledger::adjusted_quantities;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn transaction(
        id: &str,
        asset_id: &str,
        side: TransactionSide,
        quantity: Decimal,
        date_str: &str,
    ) -> Transaction {
        Transaction {
            id: id.to_string(),
            portfolio_id: "pf_1".to_string(),
            asset_id: asset_id.to_string(),
            date: date(date_str),
            side: side.as_str().to_string(),
            quantity,
            price: dec!(100),
            value: quantity * dec!(100),
            created_at: Utc::now().naive_utc(),
        }
    }

    fn baseline(entries: &[(&str, Decimal)]) -> HashMap<String, Decimal> {
        entries
            .iter()
            .map(|(asset, quantity)| (asset.to_string(), *quantity))
            .collect()
    }

    #[test]
    fn test_no_transactions_preserves_baseline() {
        let base = baseline(&[("A", dec!(6000)), ("B", dec!(2000))]);

        for day in ["2022-02-15", "2022-02-16", "2022-03-01"] {
            let result = adjusted_quantities(&base, &[], date(day));
            assert_eq!(result, base);
        }
    }

    #[test]
    fn test_buy_adds_and_sell_subtracts() {
        let base = baseline(&[("A", dec!(6000)), ("B", dec!(2000))]);
        let transactions = vec![
            transaction("t1", "A", TransactionSide::Sell, dec!(1000), "2022-02-16"),
            transaction("t2", "C", TransactionSide::Buy, dec!(5), "2022-02-16"),
        ];

        let result = adjusted_quantities(&base, &transactions, date("2022-02-16"));

        assert_eq!(result["A"], dec!(5000));
        assert_eq!(result["B"], dec!(2000));
        assert_eq!(result["C"], dec!(5));
    }

    #[test]
    fn test_transactions_after_as_of_are_ignored() {
        let base = baseline(&[("A", dec!(6000))]);
        let transactions = vec![transaction(
            "t1",
            "A",
            TransactionSide::Sell,
            dec!(1000),
            "2022-02-20",
        )];

        let result = adjusted_quantities(&base, &transactions, date("2022-02-16"));

        assert_eq!(result["A"], dec!(6000));
    }

    #[test]
    fn test_transaction_on_as_of_date_is_applied() {
        let base = baseline(&[("A", dec!(6000))]);
        let transactions = vec![transaction(
            "t1",
            "A",
            TransactionSide::Sell,
            dec!(1000),
            "2022-02-16",
        )];

        let result = adjusted_quantities(&base, &transactions, date("2022-02-16"));

        assert_eq!(result["A"], dec!(5000));
    }

    #[test]
    fn test_buy_then_sell_returns_to_original_quantity() {
        let base = baseline(&[("A", dec!(6000))]);
        let transactions = vec![
            transaction("t1", "A", TransactionSide::Buy, dec!(250), "2022-02-16"),
            transaction("t2", "A", TransactionSide::Sell, dec!(250), "2022-02-18"),
        ];

        let result = adjusted_quantities(&base, &transactions, date("2022-02-20"));

        assert_eq!(result["A"], dec!(6000));
    }

    #[test]
    fn test_untracked_asset_enters_at_signed_quantity() {
        let base = baseline(&[]);
        let transactions = vec![
            transaction("t1", "C", TransactionSide::Buy, dec!(5), "2022-02-16"),
            transaction("t2", "D", TransactionSide::Sell, dec!(3), "2022-02-16"),
        ];

        let result = adjusted_quantities(&base, &transactions, date("2022-02-16"));

        assert_eq!(result["C"], dec!(5));
        // The ledger never clamps; oversold balances are the caller's policy.
        assert_eq!(result["D"], dec!(-3));
    }

    #[test]
    fn test_same_date_transactions_apply_in_insertion_order() {
        let base = baseline(&[("A", dec!(100))]);
        let transactions = vec![
            transaction("t1", "A", TransactionSide::Sell, dec!(100), "2022-02-16"),
            transaction("t2", "A", TransactionSide::Buy, dec!(40), "2022-02-16"),
        ];

        let result = adjusted_quantities(&base, &transactions, date("2022-02-16"));

        assert_eq!(result["A"], dec!(40));
    }

    #[test]
    fn test_unknown_side_is_skipped() {
        let base = baseline(&[("A", dec!(100))]);
        let mut bogus = transaction("t1", "A", TransactionSide::Buy, dec!(50), "2022-02-16");
        bogus.side = "SHORT".to_string();

        let result = adjusted_quantities(&base, &[bogus], date("2022-02-16"));

        assert_eq!(result["A"], dec!(100));
    }
}
