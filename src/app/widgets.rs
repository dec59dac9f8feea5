use banned_ip_map::{
    app_state::{MapMode, ViewState},
    ip_record::IpRecord,
    presentation::{ChoroplethBucket, MapMarker, StyledRegion},
};
use ratatui::{
    layout::Constraint,
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine, Map, MapResolution, Points},
        Block, BorderType, Borders, Cell, Paragraph, Row, Table, Wrap,
    },
};

const TABLE_WIDTHS: [Constraint; 3] = [
    Constraint::Percentage(40),
    Constraint::Percentage(20),
    Constraint::Percentage(40),
];

fn create_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::White))
        .title(title)
        .border_type(BorderType::Plain)
}

fn create_highlight_style() -> Style {
    Style::default()
        .bg(Color::Yellow)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

fn bucket_color(bucket: ChoroplethBucket) -> Color {
    let (r, g, b) = bucket.rgb();
    Color::Rgb(r, g, b)
}

fn map_title(state: &ViewState) -> String {
    match state.map_mode {
        MapMode::Markers => format!(
            "Banned IP Locations ({} countries, {} on map)",
            state.aggregation().len(),
            state.markers().len()
        ),
        MapMode::Choropleth if state.regions().is_none() => {
            "Banned IPs by Country (waiting for boundaries)".to_string()
        }
        MapMode::Choropleth => "Banned IPs by Country".to_string(),
    }
}

pub fn create_map_canvas<'a>(state: &'a ViewState) -> Canvas<'a, impl Fn(&mut Context) + 'a> {
    Canvas::default()
        .block(create_block(map_title(state)))
        .marker(symbols::Marker::Braille)
        .x_bounds([-180.0, 180.0])
        .y_bounds([-90.0, 90.0])
        .paint(move |ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            ctx.layer();
            match state.map_mode {
                MapMode::Markers => paint_markers(ctx, state.markers(), state.selected_marker()),
                MapMode::Choropleth => {
                    if let Some(regions) = state.regions() {
                        paint_regions(ctx, regions, state.selected_region());
                    }
                }
            }
        })
}

fn paint_markers(ctx: &mut Context, markers: &[MapMarker], selected: Option<&MapMarker>) {
    for marker in markers {
        let color = if selected.map_or(false, |s| std::ptr::eq(s, marker)) {
            Color::Yellow
        } else {
            Color::Red
        };
        let (x, y) = (marker.coordinate.longitude, marker.coordinate.latitude);
        ctx.draw(&Points {
            coords: &[(x, y)],
            color,
        });
        ctx.print(x, y, Span::styled(marker.label(), Style::default().fg(color)));
    }
}

fn paint_regions(ctx: &mut Context, regions: &[StyledRegion], selected: Option<&StyledRegion>) {
    for region in regions {
        let color = if selected.map_or(false, |s| std::ptr::eq(s, region)) {
            Color::White
        } else {
            bucket_color(region.style.bucket)
        };
        for ring in &region.rings {
            for pair in ring.windows(2) {
                ctx.draw(&CanvasLine {
                    x1: pair[0].0,
                    y1: pair[0].1,
                    x2: pair[1].0,
                    y2: pair[1].1,
                    color,
                });
            }
        }
    }
}

pub fn create_ip_table_widget<'a>(records: &[&IpRecord], total: usize) -> Table<'a> {
    let rows: Vec<Row> = records
        .iter()
        .map(|record| {
            Row::new(vec![
                Cell::from(record.ip.clone()),
                Cell::from(record.country_code.clone()),
                Cell::from(record.country.clone()),
            ])
        })
        .collect();
    let header_style = Style::default().add_modifier(Modifier::BOLD);
    Table::new(rows)
        .header(Row::new(vec![
            Cell::from(Span::styled("IP Address", header_style)),
            Cell::from(Span::styled("Country Code", header_style)),
            Cell::from(Span::styled("Country", header_style)),
        ]))
        .block(create_block(format!(
            "Banned IPs List ({}/{total})",
            records.len()
        )))
        .highlight_style(create_highlight_style())
        .widths(&TABLE_WIDTHS)
}

pub fn create_search_widget(search: &str) -> Paragraph<'static> {
    Paragraph::new(search.to_string())
        .style(Style::default().fg(Color::Yellow))
        .block(create_block(
            "Search by IP, country, or country code".to_string(),
        ))
}

pub fn create_details_widget(state: &ViewState) -> Paragraph<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines: Vec<Line> = match state.map_mode {
        MapMode::Markers => match state.selected_marker() {
            Some(marker) => {
                let mut lines = vec![
                    Line::from(Span::styled(marker.title.clone(), bold)),
                    Line::from(format!("Banned IPs: {}", marker.count)),
                ];
                lines.extend(marker.body.iter().map(|ip| Line::from(ip.clone())));
                lines
            }
            None => vec![Line::from("No countries on the map")],
        },
        MapMode::Choropleth => {
            let mut lines = match state.selected_region() {
                Some(region) => vec![Line::from(Span::styled(region.popup.clone(), bold))],
                None => vec![Line::from("No shaded countries")],
            };
            lines.push(Line::from(""));
            lines.extend(ChoroplethBucket::ALL.iter().rev().map(|bucket| {
                Line::from(vec![
                    Span::styled("■ ", Style::default().fg(bucket_color(*bucket))),
                    Span::raw(bucket.legend()),
                ])
            }));
            lines
        }
    };
    Paragraph::new(lines)
        .block(create_block("Details".to_string()))
        .wrap(Wrap { trim: true })
}

pub fn create_status_widget(state: &ViewState) -> Paragraph<'static> {
    Paragraph::new(vec![Line::from(vec![
        Span::raw(state.status_line()),
        Span::styled(
            "  [Tab] view  [←/→] country  [↑/↓] row  [F5] reload  [Esc] quit",
            Style::default().fg(Color::DarkGray),
        ),
    ])])
}
