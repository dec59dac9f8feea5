use banned_ip_map::{
    aggregate,
    coordinates,
    filter::{filter_records, SearchFilter},
    geojson::FeatureCollection,
    ingestion::parse_records,
    presentation::{build_markers, style_regions, RegionCounts},
    GroupingKey,
};

const BANNED_IPS: &str = "ip,countryCode,country
1.2.3.4,US,United States
5.6.7.8,US,United States
9.9.9.9,FR,France
";

#[test]
fn csv_to_markers_and_search() {
    let records = parse_records(BANNED_IPS);
    assert_eq!(records.len(), 3);

    let aggregation = aggregate(&records, GroupingKey::CountryCode);
    assert_eq!(aggregation.keys().collect::<Vec<_>>(), vec!["US", "FR"]);
    let us = aggregation.get("US").unwrap();
    assert_eq!(us.count(), 2);
    assert_eq!(us.ips().collect::<Vec<_>>(), vec!["1.2.3.4", "5.6.7.8"]);
    let fr = aggregation.get("FR").unwrap();
    assert_eq!(fr.count(), 1);
    assert_eq!(fr.ips().collect::<Vec<_>>(), vec!["9.9.9.9"]);

    let found = filter_records(&records, "fr");
    assert_eq!(found, vec![&records[2]]);

    let markers = build_markers(&aggregation);
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].code, "US");
    assert_eq!(markers[0].coordinate, coordinates::resolve("US").unwrap());
    assert_eq!(markers[1].code, "FR");
    assert_eq!(markers[1].coordinate, coordinates::resolve("FR").unwrap());
}

#[test]
fn empty_row_appears_nowhere() {
    let csv = format!("{BANNED_IPS},,\n");
    let records = parse_records(&csv);
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| !r.ip.is_empty()));

    let aggregation = aggregate(&records, GroupingKey::CountryCode);
    assert!(aggregation.get("").is_none());
    assert_eq!(aggregation.total(), 3);
    assert_eq!(filter_records(&records, "").len(), 3);
}

#[test]
fn filter_is_stable() {
    let records = parse_records(BANNED_IPS);
    for search in ["", "us", "9", "UNITED", "nothing"] {
        let filter = SearchFilter::new(search);
        let once = filter.apply(&records);
        assert_eq!(filter.apply(once.iter().copied()), once);
        assert_eq!(filter.apply(&records), once);
    }
}

#[test]
fn choropleth_joins_admin_names_through_codes() {
    let boundaries = FeatureCollection::from_json(
        r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"ADMIN":"United States of America"},"geometry":null},
            {"type":"Feature","properties":{"ADMIN":"France","ISO_A2":"FR"},"geometry":null},
            {"type":"Feature","properties":{"ADMIN":"Germany","ISO_A2":"DE"},"geometry":null}
        ]}"#,
    )
    .unwrap();
    let records = parse_records(BANNED_IPS);
    let counts = RegionCounts::from_aggregation(&aggregate(&records, GroupingKey::CountryCode));
    let regions = style_regions(&boundaries, &counts);

    let summary: Vec<_> = regions
        .iter()
        .map(|r| (r.name.as_str(), r.count, r.style.fill_color))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("United States of America", 2, "#FD8D3C"),
            ("France", 1, "#FEB24C"),
            ("Germany", 0, "#FFEDA0"),
        ]
    );
    assert_eq!(regions[0].code.as_deref(), Some("US"));
    assert_eq!(regions[1].popup, "France: 1 IP(s)");
}
