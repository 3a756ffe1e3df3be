use std::io::Read;
use std::path::Path;

use super::model::{
    DataError, TradeRecord, TradeTable, CITY, NET_WEIGHT, SH2_DESCRIPTION, SH4_DESCRIPTION,
    US_FOB,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the trade table from a comma-separated file with a header row.
///
/// A missing `City` column is tolerated here: the table is returned
/// without it and the city catalog reports the problem. Every other
/// required column must be present.
pub fn load_file(path: &Path) -> Result<TradeTable, DataError> {
    let file = std::fs::File::open(path).map_err(|source| DataError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let table = load_reader(file)?;
    log::debug!("parsed {} rows from {}", table.len(), path.display());
    Ok(table)
}

/// Parse CSV content from any reader.
pub fn load_reader<R: Read>(rdr: R) -> Result<TradeTable, DataError> {
    let mut reader = csv::Reader::from_reader(rdr);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let position = |name: &str| headers.iter().position(|h| h == name);
    let required = |name: &str| position(name).ok_or_else(|| DataError::MissingColumn(name.into()));

    let city_idx = position(CITY);
    let sh2_idx = required(SH2_DESCRIPTION)?;
    let sh4_idx = required(SH4_DESCRIPTION)?;
    let fob_idx = required(US_FOB)?;
    let weight_idx = required(NET_WEIGHT)?;

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let text = |idx: usize| record.get(idx).unwrap_or("").to_string();

        records.push(TradeRecord {
            city: city_idx.map(text).unwrap_or_default(),
            sh2: text(sh2_idx),
            sh4: text(sh4_idx),
            fob: parse_measure(record.get(fob_idx).unwrap_or(""), row_no + 1, US_FOB)?,
            net_weight: parse_measure(
                record.get(weight_idx).unwrap_or(""),
                row_no + 1,
                NET_WEIGHT,
            )?,
        });
    }

    Ok(TradeTable::new(records, headers))
}

/// Cell contents read as "no value", matched case-insensitively.
const MISSING_MARKERS: &[&str] = &[
    "", "nan", "-nan", "na", "n/a", "#n/a", "#n/a n/a", "#na", "<na>", "null", "none",
    "1.#ind", "-1.#ind", "1.#qnan", "-1.#qnan",
];

/// Missing cells count as zero so they do not contribute to sums.
/// Infinite values are rejected.
fn parse_measure(s: &str, row: usize, column: &str) -> Result<f64, DataError> {
    let tok = s.trim();
    if MISSING_MARKERS.iter().any(|m| tok.eq_ignore_ascii_case(m)) {
        return Ok(0.0);
    }
    let invalid = || DataError::InvalidNumber {
        row,
        column: column.to_string(),
        value: s.to_string(),
    };
    match tok.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str = "City,SH2 Description,SH4 Description,US$ FOB,Net Weight\n";

    #[test]
    fn loads_rows_in_file_order() {
        let csv = format!("{HEADER}A,Food,Wheat,100,10\nB,Machinery,Engine,850.5,200\n");
        let table = load_reader(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.has_column(CITY));
        assert_eq!(table.records[0].city, "A");
        assert_eq!(table.records[0].sh4, "Wheat");
        assert_eq!(table.records[1].fob, 850.5);
        assert_eq!(table.records[1].net_weight, 200.0);
    }

    #[test]
    fn extra_columns_and_quoted_fields_are_handled() {
        let csv = "Year,City,SH2 Description,SH4 Description,US$ FOB,Net Weight\n\
                   2023,\"Sao Paulo, SP\",Food,\"Coffee, roasted\",12, 3\n";
        let table = load_reader(csv.as_bytes()).unwrap();

        assert_eq!(table.records[0].city, "Sao Paulo, SP");
        assert_eq!(table.records[0].sh4, "Coffee, roasted");
        assert_eq!(table.records[0].net_weight, 3.0);
    }

    #[test]
    fn empty_measure_counts_as_zero() {
        let csv = format!("{HEADER}A,Food,Wheat,,10\n");
        let table = load_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.records[0].fob, 0.0);
    }

    #[test]
    fn missing_markers_count_as_zero() {
        let csv = format!(
            "{HEADER}A,Food,Wheat,100,1\nA,Food,Corn,NaN,NA\nB,Mach,Engine,900,n/a\nB,Mach,Pump,null,#N/A\nB,Mach,Gear,None, <NA> \n"
        );
        let table = load_reader(csv.as_bytes()).unwrap();

        let fobs: Vec<f64> = table.records.iter().map(|r| r.fob).collect();
        let weights: Vec<f64> = table.records.iter().map(|r| r.net_weight).collect();
        assert_eq!(fobs, vec![100.0, 0.0, 900.0, 0.0, 0.0]);
        assert_eq!(weights, vec![1.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(table.records.iter().all(|r| r.fob.is_finite()));
    }

    #[test]
    fn infinite_measure_is_rejected() {
        for cell in ["inf", "-Infinity"] {
            let csv = format!("{HEADER}A,Food,Wheat,{cell},1\n");
            let err = load_reader(csv.as_bytes()).unwrap_err();
            assert!(matches!(err, DataError::InvalidNumber { row: 1, .. }), "{cell}");
        }
    }

    #[test]
    fn non_numeric_measure_is_rejected() {
        let csv = format!("{HEADER}A,Food,Wheat,abc,10\n");
        let err = load_reader(csv.as_bytes()).unwrap_err();
        match err {
            DataError::InvalidNumber { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, US_FOB);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_city_column_is_tolerated() {
        let csv = "SH2 Description,SH4 Description,US$ FOB,Net Weight\nFood,Wheat,1,2\n";
        let table = load_reader(csv.as_bytes()).unwrap();

        assert!(!table.has_column(CITY));
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].city, "");
    }

    #[test]
    fn missing_measure_column_is_an_error() {
        let csv = "City,SH2 Description,SH4 Description,Net Weight\nA,Food,Wheat,2\n";
        let err = load_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(ref c) if c == US_FOB));
    }

    #[test]
    fn missing_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("exportacoes_franca.csv")).unwrap_err();
        assert!(matches!(err, DataError::SourceUnavailable { .. }));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{HEADER}A,Food,Corn,50,5\n").unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.records[0].sh4, "Corn");
        assert_eq!(table.records[0].fob, 50.0);
    }
}
