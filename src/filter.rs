use crate::ip_record::IpRecord;

/// Case-insensitive substring search over ip, country and country code.
#[derive(Clone, Debug, Default)]
pub struct SearchFilter {
    needle: String,
}

impl SearchFilter {
    pub fn new(search: &str) -> Self {
        Self {
            needle: search.to_lowercase(),
        }
    }

    pub fn matches(&self, record: &IpRecord) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        [&record.ip, &record.country, &record.country_code]
            .iter()
            .any(|field| field.to_lowercase().contains(&self.needle))
    }

    pub fn apply<'a, I>(&self, records: I) -> Vec<&'a IpRecord>
    where
        I: IntoIterator<Item = &'a IpRecord>,
    {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect()
    }
}

pub fn filter_records<'a>(records: &'a [IpRecord], search: &str) -> Vec<&'a IpRecord> {
    SearchFilter::new(search).apply(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<IpRecord> {
        vec![
            IpRecord::new("1.2.3.4", "US", "United States"),
            IpRecord::new("5.6.7.8", "US", "United States"),
            IpRecord::new("9.9.9.9", "FR", "France"),
            IpRecord::new("45.9.1.2", "IR", "Iran"),
        ]
    }

    #[test]
    fn empty_search_returns_everything_in_order() {
        let records = sample();
        let all: Vec<_> = filter_records(&records, "");
        assert_eq!(all, records.iter().collect::<Vec<_>>());
    }

    #[test]
    fn matches_any_field_ignoring_case() {
        let records = sample();
        let fr = filter_records(&records, "fr");
        assert_eq!(fr, vec![&records[2]]);

        let by_ip = filter_records(&records, "9.");
        assert_eq!(by_ip, vec![&records[2], &records[3]]);

        let by_name = filter_records(&records, "UNITED");
        assert_eq!(by_name.len(), 2);
    }

    #[test]
    fn filtering_twice_changes_nothing() {
        let records = sample();
        let filter = SearchFilter::new("Ir");
        let once = filter.apply(&records);
        let twice = filter.apply(once.iter().copied());
        assert_eq!(once, twice);
    }

    #[test]
    fn no_tokenisation() {
        let records = sample();
        assert!(filter_records(&records, "united france").is_empty());
    }
}
