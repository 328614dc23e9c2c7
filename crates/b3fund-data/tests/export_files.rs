//! Exported CSV files on disk.

use b3fund_data::export::decode_latin1;
use b3fund_data::{
    export_records, merge_records, read_records, CompanyRecord, Dataset, MergedRecord,
    MetricsRecord, SectorPath,
};
use chrono::NaiveDate;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn companies() -> Vec<CompanyRecord> {
    vec![
        CompanyRecord::new(
            "ITAÚ UNIBANCO HOLDING S.A.",
            "ITAUUNIBANCO",
            "ITUB4",
            &SectorPath::parse("Financeiro / Intermediários Financeiros / Bancos"),
        ),
        CompanyRecord::new(
            "AAA INDÚSTRIA, COMÉRCIO S.A.",
            "AAA",
            "AAA3",
            &SectorPath::parse("Materiais Básicos / Químicos"),
        ),
    ]
}

#[test]
fn test_companies_written_and_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let records = companies();

    let path = export_records(Dataset::Companies, &records, dir.path(), date()).unwrap();
    assert_eq!(path, dir.path().join("B3Empresas_2026-10-19.csv"));

    let bytes = std::fs::read(&path).unwrap();
    // 'Ú' is a single Latin-1 byte, not a UTF-8 pair.
    assert!(bytes.contains(&0xDA));
    assert!(std::str::from_utf8(&bytes).is_err());
    // The comma in the company name forces quoting.
    assert!(decode_latin1(&bytes).contains("\"AAA INDÚSTRIA, COMÉRCIO S.A.\""));

    let back: Vec<CompanyRecord> = read_records(&path).unwrap();
    assert_eq!(back, records);
}

#[test]
fn test_merged_file_from_disk_inputs() {
    let dir = tempfile::tempdir().unwrap();

    let metrics = vec![MetricsRecord {
        ticker: "BBB3".to_string(),
        market_cap: 100,
        shares_outstanding: 10,
        avg_volume_2m: 5,
    }];
    let companies_path = export_records(Dataset::Companies, &companies(), dir.path(), date()).unwrap();
    let metrics_path = export_records(Dataset::Metrics, &metrics, dir.path(), date()).unwrap();

    let companies: Vec<CompanyRecord> = read_records(&companies_path).unwrap();
    let metrics: Vec<MetricsRecord> = read_records(&metrics_path).unwrap();
    let merged = merge_records(&companies, &metrics);

    let path = export_records(Dataset::Merged, &merged, dir.path(), date()).unwrap();
    let text = decode_latin1(&std::fs::read(&path).unwrap());
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Empresa,Pregao,Ticker,Setor,Subsetor,Segmento,Cap,Acoes,VolMed2m");
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[2], ",,BBB3,,,,100,10,5");

    let back: Vec<MergedRecord> = read_records(&path).unwrap();
    assert_eq!(back, merged);
    assert_eq!(back[0].ticker, "AAA3");
    assert_eq!(back[0].segment, None);
    assert_eq!(back[0].market_cap, 0);
}
