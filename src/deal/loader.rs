//! Load saved quotes from JSON and secondary listings from CSV
//!
//! Quote files store the raw deal inputs verbatim. Loading tolerates
//! unknown fields and fills defaulted ones so records written by older
//! or newer versions keep parsing.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::Reader;
use thiserror::Error;

use super::{Financing, Mortgage, Quote, SecondaryDeal};

/// Why a quote or listings file failed to load
#[derive(Debug, Error)]
pub enum QuoteLoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid quote JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid listings CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Load a single quote from a JSON file
pub fn load_quote<P: AsRef<Path>>(path: P) -> Result<Quote, QuoteLoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| QuoteLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_quote_from_reader(file).map_err(|source| QuoteLoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a JSON array of quotes
pub fn load_quotes<P: AsRef<Path>>(path: P) -> Result<Vec<Quote>, QuoteLoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| QuoteLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let quotes = load_quotes_from_reader(file).map_err(|source| QuoteLoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("loaded {} quotes from {}", quotes.len(), path.display());
    Ok(quotes)
}

/// Load a single quote from any reader (e.g., string buffer)
pub fn load_quote_from_reader<R: Read>(reader: R) -> Result<Quote, serde_json::Error> {
    serde_json::from_reader(reader)
}

/// Load a quote array from any reader
pub fn load_quotes_from_reader<R: Read>(reader: R) -> Result<Vec<Quote>, serde_json::Error> {
    serde_json::from_reader(reader)
}

/// Raw CSV row matching the listings export columns
#[derive(Debug, serde::Deserialize)]
struct ListingRow {
    #[serde(rename = "Price")]
    price: f64,
    #[serde(rename = "AreaSqft")]
    area_sqft: f64,
    #[serde(rename = "ClosingCostsPct")]
    closing_costs_pct: f64,
    #[serde(rename = "RentalYieldPct")]
    rental_yield_pct: f64,
    #[serde(rename = "RentGrowthPct")]
    rent_growth_pct: f64,
    #[serde(rename = "NightlyRate", default)]
    nightly_rate: f64,
    #[serde(rename = "OccupancyPct", default)]
    occupancy_pct: f64,
    #[serde(rename = "OperatingExpensePct", default)]
    operating_expense_pct: f64,
    #[serde(rename = "ManagementFeePct", default)]
    management_fee_pct: f64,
    #[serde(rename = "NightlyRateGrowthPct", default)]
    nightly_rate_growth_pct: f64,
    #[serde(rename = "AppreciationRatePct")]
    appreciation_rate_pct: f64,
    #[serde(rename = "ServiceChargePerSqft")]
    service_charge_per_sqft: f64,
    #[serde(rename = "FinancingPct", default)]
    financing_pct: Option<f64>,
    #[serde(rename = "MortgageRatePct", default)]
    mortgage_rate_pct: Option<f64>,
    #[serde(rename = "MortgageTermYears", default)]
    mortgage_term_years: Option<u32>,
}

impl ListingRow {
    fn to_deal(self) -> SecondaryDeal {
        let mortgage = match (
            self.financing_pct,
            self.mortgage_rate_pct,
            self.mortgage_term_years,
        ) {
            (Some(pct), Some(rate), Some(term)) => Some(Mortgage {
                financing: Financing::Percent(pct),
                annual_rate_pct: rate,
                term_years: term,
            }),
            (None, None, None) => None,
            _ => {
                log::warn!(
                    "listing priced at {} has a partial mortgage spec; treating as cash",
                    self.price
                );
                None
            }
        };

        SecondaryDeal {
            price: self.price,
            area_sqft: self.area_sqft,
            closing_costs_pct: self.closing_costs_pct,
            rental_yield_pct: self.rental_yield_pct,
            rent_growth_pct: self.rent_growth_pct,
            nightly_rate: self.nightly_rate,
            occupancy_pct: self.occupancy_pct,
            operating_expense_pct: self.operating_expense_pct,
            management_fee_pct: self.management_fee_pct,
            nightly_rate_growth_pct: self.nightly_rate_growth_pct,
            appreciation_rate_pct: self.appreciation_rate_pct,
            service_charge_per_sqft: self.service_charge_per_sqft,
            mortgage,
        }
    }
}

/// Load secondary listings from a CSV file
pub fn load_listings<P: AsRef<Path>>(path: P) -> Result<Vec<SecondaryDeal>, QuoteLoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| QuoteLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let listings = load_listings_from_reader(file).map_err(|source| QuoteLoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "loaded {} listings from {}",
        listings.len(),
        path.display()
    );
    Ok(listings)
}

/// Load listings from any reader
pub fn load_listings_from_reader<R: Read>(reader: R) -> Result<Vec<SecondaryDeal>, csv::Error> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut listings = Vec::new();

    for result in csv_reader.deserialize() {
        let row: ListingRow = result?;
        listings.push(row.to_deal());
    }

    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUOTE_JSON: &str = r#"{
        "id": "marina-001",
        "label": "Marina tower vs ready apartment",
        "off_plan": {
            "base_price": 2000000.0,
            "down_payment_pct": 20.0,
            "pre_handover_pct": 60.0,
            "booking_fee": 50000.0,
            "admin_fee": 3000.0,
            "booking": {"month": 1, "year": 2024},
            "handover": {"kind": "quarter", "quarter": 1, "year": 2026},
            "milestones": [
                {"id": 1, "type": "time", "trigger_value": 12, "payment_pct": 10.0},
                {"id": 2, "type": "construction", "trigger_value": 60.0, "payment_pct": 30.0}
            ],
            "appreciation": {
                "construction_rate_pct": 12.0,
                "growth_rate_pct": 8.0,
                "mature_rate_pct": 4.0,
                "growth_years": 3
            },
            "rental_yield_pct": 7.0,
            "future_field": "ignored"
        },
        "secondary": {
            "price": 1200000.0,
            "area_sqft": 650.0,
            "closing_costs_pct": 6.0,
            "rental_yield_pct": 7.0,
            "appreciation_rate_pct": 5.0,
            "service_charge_per_sqft": 22.0
        },
        "exit_months": [36, 60]
    }"#;

    #[test]
    fn test_load_quote_tolerates_absent_and_unknown_fields() {
        let quote = load_quote_from_reader(QUOTE_JSON.as_bytes()).unwrap();
        assert_eq!(quote.id, "marina-001");
        assert_eq!(quote.exit_months, vec![36, 60]);

        // Defaults fill what the record omits
        assert_eq!(quote.off_plan.registration_fee_pct, 4.0);
        assert!(quote.off_plan.post_handover.is_none());
        assert_eq!(quote.secondary.mortgage, None);
        assert_eq!(quote.secondary.nightly_rate, 0.0);

        // Quarter handovers resolve to the quarter's closing month
        assert_eq!(quote.off_plan.handover_month_year().month, 3);
        assert_eq!(quote.off_plan.construction_months(), 26);
    }

    #[test]
    fn test_load_quotes_array() {
        let json = format!("[{},{}]", QUOTE_JSON, QUOTE_JSON);
        let quotes = load_quotes_from_reader(json.as_bytes()).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[1].id, "marina-001");
    }

    #[test]
    fn test_load_listings_with_and_without_mortgage() {
        let csv = "\
Price,AreaSqft,ClosingCostsPct,RentalYieldPct,RentGrowthPct,NightlyRate,OccupancyPct,OperatingExpensePct,ManagementFeePct,NightlyRateGrowthPct,AppreciationRatePct,ServiceChargePerSqft,FinancingPct,MortgageRatePct,MortgageTermYears
1200000,650,6.0,7.0,2.0,850,80,25,15,4.0,5.0,22,60,4.5,25
950000,520,5.0,6.5,2.0,0,0,0,0,0,4.0,18,,,
";
        let listings = load_listings_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(listings.len(), 2);

        let financed = &listings[0];
        assert_eq!(financed.price, 1_200_000.0);
        assert!(financed.mortgage.is_some());
        assert_eq!(financed.loan_amount(), 720_000.0);

        let cash = &listings[1];
        assert_eq!(cash.mortgage, None);
        assert_eq!(cash.loan_amount(), 0.0);
    }

    #[test]
    fn test_partial_mortgage_columns_treated_as_cash() {
        let csv = "\
Price,AreaSqft,ClosingCostsPct,RentalYieldPct,RentGrowthPct,AppreciationRatePct,ServiceChargePerSqft,FinancingPct,MortgageRatePct,MortgageTermYears
800000,480,5.0,6.0,2.0,4.0,20,70,,
";
        let listings = load_listings_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].mortgage, None);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_quote("no_such_quote.json").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("no_such_quote.json"), "got: {}", message);
    }
}
