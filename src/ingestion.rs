//! Turns the raw CSV asset into [`IpRecord`]s.
//!
//! The first row is always a header. When it names the columns we use those
//! names, otherwise columns are taken by position:
//! `ip, countryCode, country[, city]`. Rows missing a required field are
//! dropped without being reported.

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::ip_record::IpRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnLayout {
    ip: usize,
    country_code: usize,
    country: usize,
    city: Option<usize>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            ip: 0,
            country_code: 1,
            country: 2,
            city: Some(3),
        }
    }
}

impl ColumnLayout {
    fn from_header(header: &StringRecord) -> Self {
        let normalised: Vec<String> = header.iter().map(normalise_header).collect();
        let find = |names: &[&str]| normalised.iter().position(|h| names.contains(&h.as_str()));

        match (
            find(&["ip", "ipaddress", "address"]),
            find(&["countrycode", "code", "iso", "isoa2"]),
            find(&["country", "countryname"]),
        ) {
            (Some(ip), Some(country_code), Some(country)) => Self {
                ip,
                country_code,
                country,
                city: find(&["city"]),
            },
            _ => Self::default(),
        }
    }

    fn extract(&self, row: &StringRecord) -> Option<IpRecord> {
        let field = |index: usize| row.get(index).map(str::trim).filter(|f| !f.is_empty());

        let ip = field(self.ip)?;
        let country_code = field(self.country_code)?;
        let country = field(self.country)?;
        let city = self.city.and_then(field).unwrap_or_default();

        Some(IpRecord {
            ip: ip.to_string(),
            country_code: country_code.to_uppercase(),
            country: country.to_string(),
            city: city.to_string(),
        })
    }
}

fn normalise_header(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !matches!(c, '_' | ' ' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Rows kept and rows dropped by one parse.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedCsv {
    pub records: Vec<IpRecord>,
    pub dropped: usize,
}

/// Parses CSV text, counting the rows that had to be dropped. Quotes carry no
/// meaning: a `"` is kept as part of the field.
pub fn parse_csv(text: &str) -> ParsedCsv {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let layout = match reader.headers() {
        Ok(header) => ColumnLayout::from_header(header),
        Err(error) => {
            tracing::warn!("Could not read CSV header: {error}");
            return ParsedCsv::default();
        }
    };

    let mut parsed = ParsedCsv::default();
    for row in reader.records() {
        match row.ok().and_then(|row| layout.extract(&row)) {
            Some(record) => parsed.records.push(record),
            None => parsed.dropped += 1,
        }
    }

    tracing::info!(
        "Parsed {} records, dropped {} rows",
        parsed.records.len(),
        parsed.dropped
    );
    parsed
}

/// Parses CSV text into records, keeping input order.
pub fn parse_records(text: &str) -> Vec<IpRecord> {
    parse_csv(text).records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_header_and_keeps_row_order() {
        let csv = "ip,countryCode,country\n\
                   1.2.3.4,US,United States\n\
                   9.9.9.9,FR,France\n\
                   5.6.7.8,US,United States\n";
        let records = parse_records(csv);
        let ips: Vec<_> = records.iter().map(|r| r.ip.as_str()).collect();
        assert_eq!(ips, vec!["1.2.3.4", "9.9.9.9", "5.6.7.8"]);
        assert_eq!(records[1].country, "France");
        assert!(records[1].city.is_empty());
    }

    #[test]
    fn drops_rows_missing_required_fields() {
        let csv = "ip,countryCode,country\n\
                   ,,\n\
                   1.1.1.1,,Nowhere\n\
                   2.2.2.2,DE\n\
                   \n\
                   3.3.3.3 , de , Germany \n";
        let records = parse_records(csv);
        assert_eq!(records, vec![IpRecord::new("3.3.3.3", "DE", "Germany")]);
    }

    #[test]
    fn header_only_input_yields_nothing() {
        assert!(parse_records("ip,countryCode,country\n").is_empty());
        assert!(parse_records("").is_empty());
    }

    #[test]
    fn resolves_columns_by_header_name() {
        let csv = "Country,IP Address,City,Country_Code\n\
                   Japan,10.0.0.1,Tokyo,JP\n";
        let records = parse_records(csv);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ip, "10.0.0.1");
        assert_eq!(records[0].country_code, "JP");
        assert_eq!(records[0].country, "Japan");
        assert_eq!(records[0].city, "Tokyo");
    }

    #[test]
    fn unknown_header_falls_back_to_positions() {
        let csv = "a,b,c,d\n8.8.8.8,US,United States,Mountain View\n";
        let records = parse_records(csv);
        assert_eq!(records[0].city, "Mountain View");
        assert_eq!(records[0].country_code, "US");
    }

    #[test]
    fn does_not_deduplicate() {
        let csv = "ip,countryCode,country\n1.1.1.1,AU,Australia\n1.1.1.1,AU,Australia\n";
        assert_eq!(parse_records(csv).len(), 2);
    }

    #[test]
    fn stray_quote_does_not_swallow_later_rows() {
        let csv = "ip,countryCode,country\n\
                   \"1.1.1.1,US,United States\n\
                   2.2.2.2,FR,France\n\
                   3.3.3.3,DE,Germany\n";
        let records = parse_records(csv);
        let ips: Vec<_> = records.iter().map(|r| r.ip.as_str()).collect();
        assert_eq!(ips, vec!["\"1.1.1.1", "2.2.2.2", "3.3.3.3"]);
        assert_eq!(records[2].country, "Germany");
    }

    #[test]
    fn counts_dropped_rows() {
        let csv = "ip,countryCode,country\n,,\n1.1.1.1,US\n2.2.2.2,FR,France\n";
        let parsed = parse_csv(csv);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.dropped, 2);
    }
}
