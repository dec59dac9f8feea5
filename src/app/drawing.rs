use super::widgets::{
    create_details_widget, create_ip_table_widget, create_map_canvas, create_search_widget,
    create_status_widget,
};
use banned_ip_map::app_state::{get_map_mode_strings, ViewState};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
};

pub fn draw(
    total_drawing_rect: &mut ratatui::Frame<CrosstermBackend<std::io::Stdout>>,
    state: &mut ViewState,
) {
    let app_rects = create_app_rects(total_drawing_rect.size());
    let tabs = create_map_mode_tabs(create_menu()).select(state.map_mode.into());
    total_drawing_rect.render_widget(tabs, app_rects.selection_hints);

    total_drawing_rect.render_widget(create_map_canvas(state), app_rects.map);
    draw_list(total_drawing_rect, &app_rects.list_display, state);
    total_drawing_rect.render_widget(create_status_widget(state), app_rects.status);
}

fn create_menu<'a>() -> Vec<Line<'a>> {
    let menu_items = get_map_mode_strings();
    menu_items
        .iter()
        .map(|t| Line::from(vec![Span::styled(*t, Style::default())]))
        .collect()
}

fn draw_list(
    rect: &mut ratatui::Frame<CrosstermBackend<std::io::Stdout>>,
    parent_rect: &Rect,
    state: &mut ViewState,
) {
    let list_rects = create_list_rects(parent_rect);
    let filtered = state.filtered_records();
    let table = create_ip_table_widget(&filtered, state.records().len());

    rect.render_widget(create_search_widget(state.search()), list_rects.search);
    rect.render_stateful_widget(table, list_rects.table, &mut state.table_state);
    rect.render_widget(create_details_widget(state), list_rects.details);
}

struct ListRects {
    search: Rect,
    table: Rect,
    details: Rect,
}

fn create_list_rects(parent_rect: &Rect) -> ListRects {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
        .split(*parent_rect);
    let table_column = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)].as_ref())
        .split(columns[0]);
    ListRects {
        search: table_column[0],
        table: table_column[1],
        details: columns[1],
    }
}

fn create_map_mode_tabs(menu: Vec<Line<'_>>) -> Tabs<'_> {
    Tabs::new(menu)
        .block(Block::default().title("Map View").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider(Span::raw("|"))
}

struct AppRects {
    selection_hints: Rect,
    map: Rect,
    list_display: Rect,
    status: Rect,
}

fn create_app_rects(total_drawing_rect: Rect) -> AppRects {
    let areas = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Percentage(55),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(total_drawing_rect);
    AppRects {
        selection_hints: areas[0],
        map: areas[1],
        list_display: areas[2],
        status: areas[3],
    }
}
