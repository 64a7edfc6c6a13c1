#[cfg(test)]
mod tests {
    use crate::assets::{AssetRepository, AssetRepositoryTrait};
    use crate::db::DbPool;
    use crate::holdings::{HoldingRepository, HoldingRepositoryTrait};
    use crate::ingestion::{
        initial_holdings, reshape_prices, reshape_weights, ImportSheet, ImportWorkbook,
        IngestOptions, IngestionError, IngestionService,
    };
    use crate::portfolios::{Portfolio, PortfolioRepository, PortfolioRepositoryTrait};
    use crate::prices::PriceRepository;
    use crate::transactions::{
        NewTrade, TransactionRepository, TransactionService, TransactionServiceTrait,
    };
    use crate::valuation::{ValuationService, ValuationServiceTrait};
    use chrono::{NaiveDate, Utc};
    use diesel::r2d2::{ConnectionManager, Pool};
    use diesel::sqlite::SqliteConnection;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sheet(name: &str, headers: &[&str], rows: &[&[&str]]) -> ImportSheet {
        ImportSheet::new(
            name,
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn weights_sheet() -> ImportSheet {
        sheet(
            "weights",
            &["date", "asset", "portfolio 1", "portfolio 2"],
            &[
                &["2022-02-15", "A", "0.6", "1.0"],
                &["2022-02-15", "B", "0.4", "0"],
                &["2022-02-16", "A", "0.5", "1.0"],
                &["2022-02-16", "B", "0.5", "0"],
            ],
        )
    }

    fn prices_sheet() -> ImportSheet {
        sheet(
            "prices",
            &["date", "A", "B", "C"],
            &[
                &["2022-02-15", "100", "200", "20000"],
                &["2022-02-16", "100", "250", "20000"],
            ],
        )
    }

    #[test]
    fn test_reshape_weights_melts_portfolio_columns() {
        let records = reshape_weights(&weights_sheet(), ("date", "asset"), "portfolio").unwrap();

        // 4 rows x 2 portfolio columns.
        assert_eq!(records.len(), 8);

        let first = &records[0];
        assert_eq!(first.date, date("2022-02-15"));
        assert_eq!(first.asset, "A");
        assert_eq!(first.portfolio, "1");
        assert_eq!(first.weight, dec!(0.6));

        assert!(records
            .iter()
            .all(|r| r.portfolio == "1" || r.portfolio == "2"));
    }

    #[test]
    fn test_reshape_weights_missing_id_column_is_format_error() {
        let bad = sheet("weights", &["asset", "portfolio 1"], &[&["A", "0.6"]]);

        let result = reshape_weights(&bad, ("date", "asset"), "portfolio");

        match result {
            Err(IngestionError::Format(message)) => assert!(message.contains("date")),
            other => panic!("expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn test_reshape_weights_requires_portfolio_columns() {
        let bad = sheet("weights", &["date", "asset"], &[&["2022-02-15", "A"]]);

        let result = reshape_weights(&bad, ("date", "asset"), "portfolio");

        assert!(matches!(result, Err(IngestionError::Format(_))));
    }

    #[test]
    fn test_reshape_weights_empty_cell_becomes_zero() {
        let sparse = sheet(
            "weights",
            &["date", "asset", "portfolio 1"],
            &[&["2022-02-15", "A", ""]],
        );

        let records = reshape_weights(&sparse, ("date", "asset"), "portfolio").unwrap();

        assert_eq!(records[0].weight, Decimal::ZERO);
    }

    #[test]
    fn test_reshape_weights_rejects_negative_weight() {
        let bad = sheet(
            "weights",
            &["date", "asset", "portfolio 1"],
            &[&["2022-02-15", "A", "-0.1"]],
        );

        let result = reshape_weights(&bad, ("date", "asset"), "portfolio");

        assert!(matches!(result, Err(IngestionError::InvalidData(_))));
    }

    #[test]
    fn test_reshape_weights_does_not_normalize_partial_allocations() {
        // Weights for the date sum to 0.7; they are kept as-is.
        let partial = sheet(
            "weights",
            &["date", "asset", "portfolio 1"],
            &[
                &["2022-02-15", "A", "0.3"],
                &["2022-02-15", "B", "0.4"],
            ],
        );

        let records = reshape_weights(&partial, ("date", "asset"), "portfolio").unwrap();
        let total: Decimal = records.iter().map(|r| r.weight).sum();

        assert_eq!(total, dec!(0.7));
    }

    #[test]
    fn test_reshape_prices_assigns_row_ordinals() {
        let records = reshape_prices(&prices_sheet(), "date").unwrap();

        assert_eq!(records.len(), 6);
        assert!(records
            .iter()
            .filter(|r| r.date == date("2022-02-15"))
            .all(|r| r.date_id == 0));
        assert!(records
            .iter()
            .filter(|r| r.date == date("2022-02-16"))
            .all(|r| r.date_id == 1));
    }

    #[test]
    fn test_reshape_prices_skips_empty_cells() {
        let sparse = sheet(
            "prices",
            &["date", "A", "B"],
            &[&["2022-02-15", "100", ""]],
        );

        let records = reshape_prices(&sparse, "date").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].asset, "A");
    }

    #[test]
    fn test_reshape_prices_rejects_negative_price() {
        let bad = sheet("prices", &["date", "A"], &[&["2022-02-15", "-5"]]);

        let result = reshape_prices(&bad, "date");

        assert!(matches!(result, Err(IngestionError::InvalidData(_))));
    }

    fn portfolio(value: Decimal) -> Portfolio {
        Portfolio {
            id: "pf_1".to_string(),
            name: "Portfolio 1".to_string(),
            value,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_initial_holdings_derives_quantities_from_weights() {
        let weights = reshape_weights(&weights_sheet(), ("date", "asset"), "portfolio")
            .unwrap()
            .into_iter()
            .filter(|r| r.date == date("2022-02-15") && r.portfolio == "1")
            .collect::<Vec<_>>();
        let prices: HashMap<String, Decimal> = [
            ("A".to_string(), dec!(100)),
            ("B".to_string(), dec!(200)),
        ]
        .into_iter()
        .collect();

        let quantities = initial_holdings(&weights, &prices, &portfolio(dec!(1000000))).unwrap();

        assert_eq!(quantities["A"], dec!(6000));
        assert_eq!(quantities["B"], dec!(2000));
    }

    #[test]
    fn test_initial_holdings_zero_weight_needs_no_price() {
        let weights = reshape_weights(&weights_sheet(), ("date", "asset"), "portfolio")
            .unwrap()
            .into_iter()
            .filter(|r| r.date == date("2022-02-15") && r.portfolio == "2")
            .collect::<Vec<_>>();
        // Only A is priced; B carries weight zero in portfolio 2.
        let prices: HashMap<String, Decimal> =
            [("A".to_string(), dec!(100))].into_iter().collect();

        let quantities = initial_holdings(&weights, &prices, &portfolio(dec!(1000000))).unwrap();

        assert_eq!(quantities["A"], dec!(10000));
        assert_eq!(quantities["B"], Decimal::ZERO);
    }

    #[test]
    fn test_initial_holdings_missing_price_names_asset_and_date() {
        let weights = reshape_weights(&weights_sheet(), ("date", "asset"), "portfolio")
            .unwrap()
            .into_iter()
            .filter(|r| r.date == date("2022-02-15") && r.portfolio == "1")
            .collect::<Vec<_>>();
        let prices: HashMap<String, Decimal> =
            [("A".to_string(), dec!(100))].into_iter().collect();

        let result = initial_holdings(&weights, &prices, &portfolio(dec!(1000000)));

        match result {
            Err(IngestionError::MissingPrice { asset, date: d }) => {
                assert_eq!(asset, "B");
                assert_eq!(d, date("2022-02-15"));
            }
            other => panic!("expected MissingPrice, got {:?}", other),
        }
    }

    #[test]
    fn test_initial_holdings_rejects_zero_price_for_weighted_asset() {
        let weights = reshape_weights(&weights_sheet(), ("date", "asset"), "portfolio")
            .unwrap()
            .into_iter()
            .filter(|r| r.date == date("2022-02-15") && r.portfolio == "1")
            .collect::<Vec<_>>();
        let prices: HashMap<String, Decimal> = [
            ("A".to_string(), dec!(100)),
            ("B".to_string(), dec!(0)),
        ]
        .into_iter()
        .collect();

        let result = initial_holdings(&weights, &prices, &portfolio(dec!(1000000)));

        assert!(matches!(result, Err(IngestionError::InvalidData(_))));
    }

    #[test]
    fn test_import_sheet_from_csv_trims_cells() {
        let csv = b"date, asset , portfolio 1\n2022-02-15, A ,0.6\n";

        let parsed = ImportSheet::from_csv("weights", csv).unwrap();

        assert_eq!(parsed.headers, vec!["date", "asset", "portfolio 1"]);
        assert_eq!(parsed.rows, vec![vec!["2022-02-15", "A", "0.6"]]);
    }

    #[test]
    fn test_workbook_missing_sheet_is_format_error() {
        let workbook = ImportWorkbook::new(vec![weights_sheet()]);

        let result = workbook.sheet("prices");

        match result {
            Err(IngestionError::Format(message)) => assert!(message.contains("prices")),
            other => panic!("expected Format error, got {:?}", other),
        }
    }

    // An in-memory database; max_size 1 so every checkout sees the same
    // migrated connection.
    fn test_pool() -> Arc<DbPool> {
        let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
        let pool = Pool::builder().max_size(1).build(manager).unwrap();
        crate::db::run_migrations(&pool).unwrap();
        Arc::new(pool)
    }

    fn workbook() -> ImportWorkbook {
        ImportWorkbook::new(vec![weights_sheet(), prices_sheet()])
    }

    #[test]
    fn test_ingest_reports_committed_row_counts() {
        let pool = test_pool();
        let service = IngestionService::new(pool.clone());

        let summary = service.ingest(&workbook(), &IngestOptions::default()).unwrap();

        assert_eq!(summary.assets, 3);
        assert_eq!(summary.portfolios, 2);
        assert_eq!(summary.prices, 6);
        // Initial holdings only, one row per weighted asset and portfolio.
        assert_eq!(summary.holdings, 4);
    }

    #[test]
    fn test_ingest_is_idempotent() {
        let pool = test_pool();
        let service = IngestionService::new(pool.clone());

        service.ingest(&workbook(), &IngestOptions::default()).unwrap();
        let second = service.ingest(&workbook(), &IngestOptions::default()).unwrap();

        assert_eq!(second.assets, 3);
        assert_eq!(second.portfolios, 2);

        let assets = AssetRepository::new(pool.clone()).list().unwrap();
        assert_eq!(assets.len(), 3);
        let portfolios = PortfolioRepository::new(pool).list().unwrap();
        assert_eq!(portfolios.len(), 2);
    }

    #[test]
    fn test_ingest_seeds_portfolio_with_default_value() {
        let pool = test_pool();
        let service = IngestionService::new(pool.clone());

        service.ingest(&workbook(), &IngestOptions::default()).unwrap();

        let stored = PortfolioRepository::new(pool)
            .get_by_name("Portfolio 1")
            .unwrap();
        assert_eq!(stored.value, dec!(1000000000));
    }

    #[test]
    fn test_ingest_missing_sheet_leaves_store_unchanged() {
        let pool = test_pool();
        let service = IngestionService::new(pool.clone());

        let incomplete = ImportWorkbook::new(vec![weights_sheet()]);

        let result = service.ingest(&incomplete, &IngestOptions::default());

        assert!(matches!(result, Err(IngestionError::Format(_))));
        let assets = AssetRepository::new(pool.clone()).list().unwrap();
        assert!(assets.is_empty());
        let portfolios = PortfolioRepository::new(pool).list().unwrap();
        assert!(portfolios.is_empty());
    }

    #[test]
    fn test_ingest_missing_price_rolls_back_whole_batch() {
        let pool = test_pool();
        let service = IngestionService::new(pool.clone());

        // Asset D carries a nonzero weight on the initial date but never
        // appears in the prices sheet.
        let weights = sheet(
            "weights",
            &["date", "asset", "portfolio 1"],
            &[
                &["2022-02-15", "A", "0.6"],
                &["2022-02-15", "D", "0.4"],
            ],
        );
        let bad = ImportWorkbook::new(vec![weights, prices_sheet()]);

        let result = service.ingest(&bad, &IngestOptions::default());

        assert!(matches!(result, Err(IngestionError::MissingPrice { .. })));
        // Nothing committed, not even the assets written before the failure.
        let assets = AssetRepository::new(pool).list().unwrap();
        assert!(assets.is_empty());
    }

    #[test]
    fn test_ingest_honors_explicit_initial_date() {
        let pool = test_pool();
        let service = IngestionService::new(pool.clone());

        let options = IngestOptions {
            initial_date: Some(date("2022-02-16")),
        };
        service.ingest(&workbook(), &options).unwrap();

        let portfolio = PortfolioRepository::new(pool.clone())
            .get_by_name("Portfolio 1")
            .unwrap();
        let baseline = HoldingRepository::new(pool)
            .get_baseline(&portfolio.id)
            .unwrap();

        assert!(baseline.iter().all(|h| h.date == date("2022-02-16")));
        // 0.5 x 1e9 / 100 on the later date.
        let a = baseline.iter().find(|h| h.weight == dec!(0.5)).unwrap();
        assert!(a.quantity == dec!(5000000) || a.quantity == dec!(2000000));
    }

    #[test]
    fn test_ingest_then_trade_then_value_series() {
        let pool = test_pool();
        IngestionService::new(pool.clone())
            .ingest(&workbook(), &IngestOptions::default())
            .unwrap();

        let asset_repository = Arc::new(AssetRepository::new(pool.clone()));
        let portfolio_repository = Arc::new(PortfolioRepository::new(pool.clone()));
        let price_repository = Arc::new(PriceRepository::new(pool.clone()));
        let holding_repository = Arc::new(HoldingRepository::new(pool.clone()));
        let transaction_repository = Arc::new(TransactionRepository::new(pool.clone()));

        let portfolio = portfolio_repository.get_by_name("Portfolio 1").unwrap();

        let valuation = ValuationService::new(
            portfolio_repository.clone(),
            holding_repository.clone(),
            transaction_repository.clone(),
            price_repository.clone(),
            asset_repository.clone(),
        );

        // Day 0: 0.6 x 1e9 in A at 100, 0.4 x 1e9 in B at 200.
        let series = valuation
            .value_series(&portfolio.id, date("2022-02-15"), date("2022-02-16"))
            .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].value, dec!(1000000000.00));
        assert_eq!(series[0].weights["A"], dec!(0.6));
        assert_eq!(series[0].weights["B"], dec!(0.4));

        // Rotate 1e8 out of A into C on day 1.
        let transactions = TransactionService::new(
            transaction_repository.clone(),
            asset_repository.clone(),
            price_repository.clone(),
            holding_repository.clone(),
        );
        let trade = NewTrade {
            portfolio_id: portfolio.id.clone(),
            date: date("2022-02-16"),
            asset_to_sell: asset_repository.get_by_name("A").unwrap().id,
            asset_to_buy: asset_repository.get_by_name("C").unwrap().id,
            value: dec!(100000000),
        };
        let (sell, buy) = transactions.create_trade(trade).unwrap();
        assert_eq!(sell.quantity, dec!(1000000));
        assert_eq!(buy.quantity, dec!(5000));

        // Positions on day 1 reflect the trade.
        let positions = valuation
            .positions_at(&portfolio.id, date("2022-02-16"))
            .unwrap();
        let by_asset: HashMap<String, Decimal> = positions
            .into_iter()
            .map(|p| (p.asset_id, p.quantity))
            .collect();
        assert_eq!(by_asset[&sell.asset_id], dec!(5000000));
        assert_eq!(by_asset[&buy.asset_id], dec!(5000));

        // Day 1 value: 5e6 x 100 + 2e6 x 250 + 5000 x 20000.
        let series = valuation
            .value_series(&portfolio.id, date("2022-02-16"), date("2022-02-16"))
            .unwrap();
        assert_eq!(series[0].value, dec!(1100000000.00));
        assert_eq!(series[0].weights["C"], dec!(0.090909));
    }
}
