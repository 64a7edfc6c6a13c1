/// Decimal places kept on portfolio values
pub const VALUE_DECIMAL_PRECISION: u32 = 2;

/// Decimal places kept on asset weights
pub const WEIGHT_DECIMAL_PRECISION: u32 = 6;

/// Decimal places kept on stored quantities
pub const QUANTITY_DECIMAL_PRECISION: u32 = 4;

/// Required sheet name for the wide weight matrix
pub const WEIGHTS_SHEET: &str = "weights";

/// Required sheet name for the wide price matrix
pub const PRICES_SHEET: &str = "prices";

/// Prefix identifying portfolio columns in the weights sheet
pub const PORTFOLIO_COLUMN_PREFIX: &str = "portfolio";

/// Identifier columns of the wide weights sheet
pub const WEIGHT_DATE_COLUMN: &str = "date";
pub const WEIGHT_ASSET_COLUMN: &str = "asset";

/// Date column of the wide prices sheet
pub const PRICE_DATE_COLUMN: &str = "date";
