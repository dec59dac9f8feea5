use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ip_record::IpRecord;

/// Which record field the aggregation groups on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupingKey {
    #[default]
    CountryCode,
    CountryName,
}

impl GroupingKey {
    pub fn key_of<'a>(&self, record: &'a IpRecord) -> &'a str {
        match self {
            GroupingKey::CountryCode => &record.country_code,
            GroupingKey::CountryName => &record.country,
        }
    }
}

/// All records sharing one grouping key value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountryAggregate {
    pub key: String,
    pub records: Vec<IpRecord>,
}

impl CountryAggregate {
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Code of the first record. Every record shares it when grouping by code.
    pub fn country_code(&self) -> &str {
        self.records
            .first()
            .map_or("", |record| record.country_code.as_str())
    }

    pub fn country_name(&self) -> &str {
        self.records.first().map_or("", |record| record.country.as_str())
    }

    pub fn ips(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.ip.as_str())
    }
}

/// Aggregates in first-occurrence order of their key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Aggregation {
    grouping: GroupingKey,
    aggregates: Vec<CountryAggregate>,
    index: HashMap<String, usize>,
}

impl Aggregation {
    pub fn grouping(&self) -> GroupingKey {
        self.grouping
    }

    pub fn get(&self, key: &str) -> Option<&CountryAggregate> {
        self.index.get(key).map(|&i| &self.aggregates[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CountryAggregate> {
        self.aggregates.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.aggregates.iter().map(|aggregate| aggregate.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }

    pub fn total(&self) -> usize {
        self.aggregates.iter().map(CountryAggregate::count).sum()
    }
}

impl<'a> IntoIterator for &'a Aggregation {
    type Item = &'a CountryAggregate;
    type IntoIter = std::slice::Iter<'a, CountryAggregate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Groups records by `grouping`. Records with an empty key are left out.
pub fn aggregate(records: &[IpRecord], grouping: GroupingKey) -> Aggregation {
    let mut aggregation = Aggregation {
        grouping,
        ..Aggregation::default()
    };

    for record in records {
        let key = grouping.key_of(record);
        if key.is_empty() {
            continue;
        }
        let position = match aggregation.index.get(key) {
            Some(&position) => position,
            None => {
                aggregation.aggregates.push(CountryAggregate {
                    key: key.to_string(),
                    records: Vec::new(),
                });
                let position = aggregation.aggregates.len() - 1;
                aggregation.index.insert(key.to_string(), position);
                position
            }
        };
        aggregation.aggregates[position].records.push(record.clone());
    }

    aggregation
}
