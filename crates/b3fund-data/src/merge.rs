//! Outer join of the listing and metrics tables.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};

use crate::model::{CompanyRecord, MergedRecord, MetricsRecord};

/// Full outer join on ticker.
///
/// Every ticker of either input appears exactly once, ordered by ticker.
/// When a ticker repeats within one input the first occurrence wins.
/// Tickers without metrics get zeros; tickers without a listing row get
/// empty company fields.
pub fn merge_records(companies: &[CompanyRecord], metrics: &[MetricsRecord]) -> Vec<MergedRecord> {
    let mut rows: BTreeMap<&str, MergedRecord> = BTreeMap::new();

    for company in companies {
        rows.entry(company.ticker.as_str())
            .or_insert_with(|| MergedRecord {
                company_name: Some(company.company_name.clone()),
                traded_name: Some(company.traded_name.clone()),
                ticker: company.ticker.clone(),
                sector: Some(company.sector.clone()),
                subsector: company.subsector.clone(),
                segment: company.segment.clone(),
                market_cap: 0,
                shares_outstanding: 0,
                avg_volume_2m: 0,
            });
    }

    let mut with_metrics: HashSet<&str> = HashSet::with_capacity(metrics.len());

    for m in metrics {
        if !with_metrics.insert(m.ticker.as_str()) {
            continue;
        }

        match rows.entry(m.ticker.as_str()) {
            Entry::Occupied(mut entry) => {
                let row = entry.get_mut();
                row.market_cap = m.market_cap;
                row.shares_outstanding = m.shares_outstanding;
                row.avg_volume_2m = m.avg_volume_2m;
            }
            Entry::Vacant(entry) => {
                entry.insert(MergedRecord {
                    company_name: None,
                    traded_name: None,
                    ticker: m.ticker.clone(),
                    sector: None,
                    subsector: None,
                    segment: None,
                    market_cap: m.market_cap,
                    shares_outstanding: m.shares_outstanding,
                    avg_volume_2m: m.avg_volume_2m,
                });
            }
        }
    }

    rows.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SectorPath;

    fn company(ticker: &str) -> CompanyRecord {
        CompanyRecord::new(
            "ACME S.A.",
            "ACME",
            ticker,
            &SectorPath::parse("Bens Industriais / Máquinas / Motores"),
        )
    }

    fn metrics(ticker: &str, cap: i64, shares: i64, volume: i64) -> MetricsRecord {
        MetricsRecord {
            ticker: ticker.to_string(),
            market_cap: cap,
            shares_outstanding: shares,
            avg_volume_2m: volume,
        }
    }

    #[test]
    fn test_disjoint_tickers_outer_join() {
        let merged = merge_records(&[company("AAA3")], &[metrics("BBB3", 100, 10, 5)]);

        assert_eq!(merged.len(), 2);

        let aaa = &merged[0];
        assert_eq!(aaa.ticker, "AAA3");
        assert_eq!(aaa.company_name.as_deref(), Some("ACME S.A."));
        assert_eq!(aaa.segment.as_deref(), Some("Motores"));
        assert_eq!((aaa.market_cap, aaa.shares_outstanding, aaa.avg_volume_2m), (0, 0, 0));

        let bbb = &merged[1];
        assert_eq!(bbb.ticker, "BBB3");
        assert_eq!(bbb.company_name, None);
        assert_eq!(bbb.sector, None);
        assert_eq!((bbb.market_cap, bbb.shares_outstanding, bbb.avg_volume_2m), (100, 10, 5));
    }

    #[test]
    fn test_matching_tickers_combine() {
        let merged = merge_records(
            &[company("PETR3"), company("PETR4")],
            &[metrics("PETR4", 487, 13, 9)],
        );

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].market_cap, 0);
        assert_eq!(merged[1].ticker, "PETR4");
        assert_eq!(merged[1].traded_name.as_deref(), Some("ACME"));
        assert_eq!(merged[1].market_cap, 487);
    }

    #[test]
    fn test_each_ticker_once() {
        let merged = merge_records(
            &[company("VALE3"), company("VALE3")],
            &[metrics("VALE3", 1, 1, 1), metrics("VALE3", 2, 2, 2), metrics("ITUB4", 3, 3, 3)],
        );

        let tickers: Vec<&str> = merged.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["ITUB4", "VALE3"]);
        assert_eq!(merged[1].market_cap, 1);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(merge_records(&[], &[]).is_empty());
    }
}
