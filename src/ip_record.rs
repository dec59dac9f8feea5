use serde::{Deserialize, Serialize};

/// One banned address and the country it was geolocated to.
#[derive(Eq, PartialEq, Clone, Serialize, Deserialize, Debug, Hash)]
pub struct IpRecord {
    pub ip: String,
    pub country_code: String,
    pub country: String,
    pub city: String,
}

impl IpRecord {
    pub fn new(ip: &str, country_code: &str, country: &str) -> Self {
        Self {
            ip: ip.to_string(),
            country_code: country_code.to_string(),
            country: country.to_string(),
            city: String::new(),
        }
    }
}
