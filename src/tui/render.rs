use std::f64::consts::FRAC_PI_4;

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Widget, Wrap};

use crate::board::edit::byte_index_for_cursor;
use crate::board::model::{CardId, LinkSegment, Position, Size};

/// Terminal cells are roughly twice as tall as they are wide.
const ROW_ASPECT: f64 = 0.45;
/// Smallest on-screen card: border, one content row, border.
const MIN_CARD_CELLS: i64 = 3;
pub const MORE_LABEL: &str = "more";
const RESIZE_HANDLE: &str = "◢";
const LINK_COLOR: Color = Color::Gray;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f32,
}

impl Viewport {
    /// Terminal columns per canvas unit.
    pub fn col_scale(&self) -> f64 {
        self.zoom as f64
    }

    pub fn row_scale(&self) -> f64 {
        self.zoom as f64 * ROW_ASPECT
    }

    /// Unclipped cell box of a card, relative to the terminal.
    pub fn project(&self, area: Rect, position: Position, size: Size) -> CellBox {
        let left = ((position.x - self.x) * self.col_scale()).round() as i64 + area.x as i64;
        let top = ((position.y - self.y) * self.row_scale()).round() as i64 + area.y as i64;
        let width = ((size.width * self.col_scale()).round() as i64).max(MIN_CARD_CELLS);
        let height = ((size.height * self.row_scale()).round() as i64).max(MIN_CARD_CELLS);
        CellBox {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    /// Canvas point at the middle of terminal cell (`col`, `row`).
    pub fn to_canvas(&self, area: Rect, col: u16, row: u16) -> Option<Position> {
        if col < area.x || col >= area.right() || row < area.y || row >= area.bottom() {
            return None;
        }
        Some(Position::new(
            self.x + ((col - area.x) as f64 + 0.5) / self.col_scale(),
            self.y + ((row - area.y) as f64 + 0.5) / self.row_scale(),
        ))
    }

    fn to_cell(&self, area: Rect, point: Position) -> (i64, i64) {
        (
            ((point.x - self.x) * self.col_scale()).floor() as i64 + area.x as i64,
            ((point.y - self.y) * self.row_scale()).floor() as i64 + area.y as i64,
        )
    }
}

/// Cell coordinates of a projected card. `right` and `bottom` are exclusive
/// and may lie outside the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellBox {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl CellBox {
    pub fn clip(&self, area: Rect) -> Option<Rect> {
        let x0 = self.left.max(area.x as i64);
        let y0 = self.top.max(area.y as i64);
        let x1 = self.right.min(area.right() as i64);
        let y1 = self.bottom.min(area.bottom() as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Rect::new(
            x0 as u16,
            y0 as u16,
            (x1 - x0) as u16,
            (y1 - y0) as u16,
        ))
    }

    fn contains(&self, col: u16, row: u16) -> bool {
        let (c, r) = (col as i64, row as i64);
        c >= self.left && c < self.right && r >= self.top && r < self.bottom
    }

    fn resize_handle(&self) -> (i64, i64) {
        (self.right - 1, self.bottom - 1)
    }

    /// First cell of the "more" marker on the bottom border.
    fn more_marker(&self) -> (i64, i64) {
        (
            self.right - 2 - MORE_LABEL.chars().count() as i64,
            self.bottom - 1,
        )
    }
}

/// Which part of a card a terminal cell falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardZone {
    Body,
    ResizeHandle,
    MoreMarker,
}

pub fn zone_at(cell_box: &CellBox, col: u16, row: u16) -> Option<CardZone> {
    if !cell_box.contains(col, row) {
        return None;
    }
    let (c, r) = (col as i64, row as i64);
    if (c, r) == cell_box.resize_handle() {
        return Some(CardZone::ResizeHandle);
    }
    let (more_col, more_row) = cell_box.more_marker();
    if r == more_row && c >= more_col && c < more_col + MORE_LABEL.chars().count() as i64 {
        return Some(CardZone::MoreMarker);
    }
    Some(CardZone::Body)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    Idle,
    Editing { cursor: usize },
    Dragging,
    Resizing,
}

#[derive(Debug, Clone)]
pub struct RenderCard {
    pub id: CardId,
    pub position: Position,
    pub size: Size,
    /// Preview for idle cards, the draft for the edited one.
    pub text: String,
    pub focused: bool,
    pub state: CardState,
}

#[derive(Debug)]
pub struct CanvasRenderData<'a> {
    pub cards: &'a [RenderCard],
    pub links: &'a [LinkSegment],
    pub viewport: Viewport,
    pub focused_id: Option<CardId>,
    pub mode_label: &'a str,
    pub hints: &'a str,
    pub message: Option<&'a str>,
    pub show_help: bool,
    pub show_links: bool,
    pub detail: Option<&'a str>,
}

/// Outer frame minus the status bar: the area cards are projected into.
pub fn canvas_area(frame_area: Rect) -> Rect {
    let inner = outer_block(Line::default()).inner(frame_area);
    let [canvas, _status] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(4)]).areas(inner);
    canvas
}

fn outer_block(title: Line<'_>) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title)
}

pub fn draw(frame: &mut Frame, data: &CanvasRenderData<'_>) {
    let area = frame.area();
    let title = Line::from(vec![
        Span::styled("cardboard", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled("[?] help", Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled("[q] quit", Style::default().fg(Color::DarkGray)),
    ]);
    let block = outer_block(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let [canvas_area, status_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(4)]).areas(inner);

    let routes = if data.show_links {
        route_links(data.links, data.cards, data.viewport, canvas_area)
    } else {
        Vec::new()
    };
    if !routes.is_empty() {
        draw_link_lines(frame, &routes, data.viewport, canvas_area);
    }

    for card in data.cards {
        draw_card(frame.buffer_mut(), card, data.viewport, canvas_area);
    }

    // Heads go last so a card border never hides them.
    let buf = frame.buffer_mut();
    for route in &routes {
        let (col, row) = route.head_cell;
        if cell_in(canvas_area, col, row) {
            buf.set_string(
                col as u16,
                row as u16,
                route.glyph.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            );
        }
    }

    draw_status(frame, data, status_area);

    if let Some(text) = data.detail {
        draw_detail_overlay(frame, text);
    }
    if data.show_help {
        render_help_overlay(frame);
    }
}

/// A link as drawn: a line from the source center to just outside the
/// target card, with a head glyph pointing along the line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkRoute {
    pub start: Position,
    pub tip: Position,
    pub head_cell: (i64, i64),
    pub glyph: char,
}

pub fn route_links(
    links: &[LinkSegment],
    cards: &[RenderCard],
    viewport: Viewport,
    area: Rect,
) -> Vec<LinkRoute> {
    links
        .iter()
        .filter_map(|segment| {
            let target = cards.get(segment.link.to)?;
            // One cell of clearance around the target so the head sits
            // beside its border.
            let margin = Size::new(
                target.size.width + 2.0 / viewport.col_scale(),
                target.size.height + 2.0 / viewport.row_scale(),
            );
            let tip = border_point(segment.end, segment.start, margin);
            let dx = (tip.x - segment.start.x) * viewport.col_scale();
            let dy = (tip.y - segment.start.y) * viewport.row_scale();
            Some(LinkRoute {
                start: segment.start,
                tip,
                head_cell: viewport.to_cell(area, tip),
                glyph: arrow_glyph(dx, dy),
            })
        })
        .collect()
}

/// Where the segment from `center` toward `toward` leaves a box of `size`
/// centered on `center`. Returns `toward` if it lies inside the box.
pub fn border_point(center: Position, toward: Position, size: Size) -> Position {
    let dx = toward.x - center.x;
    let dy = toward.y - center.y;
    let half_w = size.width / 2.0;
    let half_h = size.height / 2.0;
    let tx = if dx == 0.0 { f64::INFINITY } else { half_w / dx.abs() };
    let ty = if dy == 0.0 { f64::INFINITY } else { half_h / dy.abs() };
    let t = tx.min(ty).min(1.0);
    Position::new(center.x + dx * t, center.y + dy * t)
}

/// Eight-way arrow for a direction in screen space (y grows downward).
pub fn arrow_glyph(dx: f64, dy: f64) -> char {
    if dx == 0.0 && dy == 0.0 {
        return '•';
    }
    let octant = (dy.atan2(dx) / FRAC_PI_4).round() as i64;
    match octant.rem_euclid(8) {
        0 => '→',
        1 => '↘',
        2 => '↓',
        3 => '↙',
        4 => '←',
        5 => '↖',
        6 => '↑',
        _ => '↗',
    }
}

fn draw_link_lines(frame: &mut Frame, routes: &[LinkRoute], viewport: Viewport, area: Rect) {
    let width = area.width as f64 / viewport.col_scale();
    let height = area.height as f64 / viewport.row_scale();
    // Canvas y grows upward; card coordinates grow downward.
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([viewport.x, viewport.x + width])
        .y_bounds([-(viewport.y + height), -viewport.y])
        .paint(|ctx| {
            for route in routes {
                ctx.draw(&CanvasLine::new(
                    route.start.x,
                    -route.start.y,
                    route.tip.x,
                    -route.tip.y,
                    LINK_COLOR,
                ));
            }
        });
    frame.render_widget(canvas, area);
}

fn draw_card(buf: &mut Buffer, card: &RenderCard, viewport: Viewport, area: Rect) {
    let cell_box = viewport.project(area, card.position, card.size);
    let Some(rect) = cell_box.clip(area) else {
        return;
    };

    let border_color = match card.state {
        CardState::Editing { .. } => Color::Green,
        CardState::Dragging | CardState::Resizing => Color::Cyan,
        CardState::Idle if card.focused => Color::Yellow,
        CardState::Idle => Color::Gray,
    };
    let mut border_style = Style::default().fg(border_color);
    if card.focused {
        border_style = border_style.add_modifier(Modifier::BOLD);
    }
    let title = match card.state {
        CardState::Dragging => format!(" #{} {:.0},{:.0} ", card.id, card.position.x, card.position.y),
        CardState::Resizing => format!(" #{} {:.0}x{:.0} ", card.id, card.size.width, card.size.height),
        _ => format!(" #{} ", card.id),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(Span::styled(title, border_style));

    let body = match card.state {
        CardState::Editing { cursor } => {
            let mut lines = lines_with_cursor(
                &card.text,
                cursor,
                Style::default().fg(Color::White),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
            );
            lines.push(Line::from(Span::styled(
                "[Enter] save  [Esc] cancel",
                Style::default().fg(Color::Green),
            )));
            Paragraph::new(lines)
        }
        _ => Paragraph::new(Line::from(card.text.replace('\n', " "))),
    };

    Clear.render(rect, buf);
    body.block(block).wrap(Wrap { trim: false }).render(rect, buf);

    if !matches!(card.state, CardState::Editing { .. }) {
        let (col, row) = cell_box.more_marker();
        if col > cell_box.left && cell_in(rect, col, row) {
            let visible = (rect.right() as i64 - col).max(0) as usize;
            let label = MORE_LABEL.chars().take(visible).collect::<String>();
            buf.set_string(
                col as u16,
                row as u16,
                label,
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            );
        }
    }
    let (col, row) = cell_box.resize_handle();
    if cell_in(rect, col, row) {
        buf.set_string(col as u16, row as u16, RESIZE_HANDLE, border_style);
    }
}

fn cell_in(rect: Rect, col: i64, row: i64) -> bool {
    col >= rect.x as i64
        && col < rect.right() as i64
        && row >= rect.y as i64
        && row < rect.bottom() as i64
}

fn draw_status(frame: &mut Frame, data: &CanvasRenderData<'_>, area: Rect) {
    let focused = data
        .focused_id
        .map(|id| format!("#{id}"))
        .unwrap_or_else(|| "-".to_string());
    let top_status = format!(
        "CARDS: {}   FOCUSED: {}   MODE: {}   zoom {:.2}",
        data.cards.len(),
        focused,
        data.mode_label,
        data.viewport.zoom
    );
    let mut hint_line = data.hints.to_string();
    if let Some(msg) = data.message {
        hint_line.push_str("   ");
        hint_line.push_str(msg);
    }
    let status = Paragraph::new(vec![
        Line::from(Span::styled(
            top_status,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(hint_line, Style::default().fg(Color::DarkGray))),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .padding(Padding::new(1, 1, 0, 0)),
    );
    frame.render_widget(status, area);
}

fn draw_detail_overlay(frame: &mut Frame, text: &str) {
    let area = centered_rect(frame.area(), 60, 50);
    frame.render_widget(Clear, area);
    let mut lines = text
        .lines()
        .map(|l| Line::from(l.to_string()))
        .collect::<Vec<_>>();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[Esc/Enter] close",
        Style::default().fg(Color::DarkGray),
    )));
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(
                    " Card Details ",
                    Style::default().add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Blue))
                .padding(Padding::new(2, 2, 1, 1)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(frame.area(), 70, 70);
    frame.render_widget(Clear, area);
    let help = Paragraph::new(vec![
        Line::from("CARDS"),
        Line::from("  Tab/j/↓ next card   Shift-Tab/k/↑ previous card"),
        Line::from("  a add card   e/Enter edit   o/Space show details"),
        Line::from(""),
        Line::from("GESTURES"),
        Line::from("  m move focused card, r resize it"),
        Line::from("  arrows/hjkl adjust, Enter drops, Esc cancels"),
        Line::from("  mouse: drag a card to move it, drag ◢ to resize"),
        Line::from("  click a card without moving it to edit"),
        Line::from(""),
        Line::from("EDITING"),
        Line::from("  type to edit, Alt+Enter newline, Ctrl+U clears"),
        Line::from("  Enter saves, Esc cancels"),
        Line::from(""),
        Line::from("VIEW"),
        Line::from("  p pan mode (arrows scroll), +/- zoom"),
        Line::from(""),
        Line::from("Esc/Backspace backs out one step."),
    ])
    .block(Block::default().title("Help").borders(Borders::ALL));
    frame.render_widget(help, area);
}

/// Draft text split into lines, with a caret at `cursor` (in chars).
pub fn lines_with_cursor(
    text: &str,
    cursor: usize,
    text_style: Style,
    caret_style: Style,
) -> Vec<Line<'static>> {
    let split = byte_index_for_cursor(text, cursor);
    let (before, after) = text.split_at(split);

    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    push_segment(before, text_style, &mut current, &mut lines);
    current.push(Span::styled("▌", caret_style));
    push_segment(after, text_style, &mut current, &mut lines);
    lines.push(Line::from(current));
    lines
}

fn push_segment(
    segment: &str,
    style: Style,
    current: &mut Vec<Span<'static>>,
    lines: &mut Vec<Line<'static>>,
) {
    let mut parts = segment.split('\n');
    if let Some(first) = parts.next()
        && !first.is_empty()
    {
        current.push(Span::styled(first.to_string(), style));
    }
    for part in parts {
        lines.push(Line::from(std::mem::take(current)));
        if !part.is_empty() {
            current.push(Span::styled(part.to_string(), style));
        }
    }
}

pub(crate) fn centered_rect(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(area);
    Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::model::{CardBoard, preview};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    const VIEW: Viewport = Viewport {
        x: 0.0,
        y: 0.0,
        zoom: 0.15,
    };

    fn render_cards(board: &CardBoard) -> Vec<RenderCard> {
        board
            .cards()
            .iter()
            .map(|c| RenderCard {
                id: c.id,
                position: c.position,
                size: c.size,
                text: preview(&c.text),
                focused: false,
                state: CardState::Idle,
            })
            .collect()
    }

    fn screen(data: &CanvasRenderData<'_>) -> String {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, data)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn data<'a>(cards: &'a [RenderCard], links: &'a [LinkSegment]) -> CanvasRenderData<'a> {
        CanvasRenderData {
            cards,
            links,
            viewport: VIEW,
            focused_id: cards.first().map(|c| c.id),
            mode_label: "Normal",
            hints: "",
            message: None,
            show_help: false,
            show_links: true,
            detail: None,
        }
    }

    #[test]
    fn projection_scales_and_offsets() {
        let area = Rect::new(1, 1, 100, 30);
        let cell_box = VIEW.project(area, Position::new(100.0, 100.0), Size::new(200.0, 100.0));
        assert_eq!(cell_box.left, 16);
        assert_eq!(cell_box.right, 46);
        assert_eq!(cell_box.top, 8);
        assert_eq!(cell_box.bottom, 15);
    }

    #[test]
    fn projection_keeps_minimum_box() {
        let tiny = Viewport { zoom: 0.05, ..VIEW };
        let cell_box = tiny.project(Rect::new(0, 0, 80, 20), Position::default(), Size::new(100.0, 50.0));
        assert_eq!(cell_box.bottom - cell_box.top, MIN_CARD_CELLS);
    }

    #[test]
    fn clip_drops_offscreen_boxes() {
        let area = Rect::new(0, 0, 10, 10);
        let off = CellBox { left: 20, top: 0, right: 30, bottom: 5 };
        assert_eq!(off.clip(area), None);
        let partial = CellBox { left: -5, top: 2, right: 4, bottom: 20 };
        assert_eq!(partial.clip(area), Some(Rect::new(0, 2, 4, 8)));
    }

    #[test]
    fn to_canvas_inverts_projection() {
        let area = Rect::new(1, 1, 100, 30);
        let cell_box = VIEW.project(area, Position::new(100.0, 100.0), Size::new(200.0, 100.0));
        let p = VIEW
            .to_canvas(area, cell_box.left as u16, cell_box.top as u16)
            .unwrap();
        assert!((p.x - 100.0).abs() < 1.0 / 0.15);
        assert!((p.y - 100.0).abs() < 1.0 / (0.15 * ROW_ASPECT));
        assert_eq!(VIEW.to_canvas(area, 0, 0), None);
    }

    #[test]
    fn zones_find_handle_and_more_marker() {
        let cell_box = CellBox { left: 10, top: 5, right: 30, bottom: 12 };
        assert_eq!(zone_at(&cell_box, 29, 11), Some(CardZone::ResizeHandle));
        assert_eq!(zone_at(&cell_box, 24, 11), Some(CardZone::MoreMarker));
        assert_eq!(zone_at(&cell_box, 27, 11), Some(CardZone::MoreMarker));
        assert_eq!(zone_at(&cell_box, 28, 11), Some(CardZone::Body));
        assert_eq!(zone_at(&cell_box, 12, 6), Some(CardZone::Body));
        assert_eq!(zone_at(&cell_box, 30, 6), None);
    }

    #[test]
    fn border_point_stops_at_box_edge() {
        let p = border_point(Position::new(0.0, 0.0), Position::new(100.0, 0.0), Size::new(20.0, 10.0));
        assert_eq!(p, Position::new(10.0, 0.0));
        let inside = border_point(Position::new(0.0, 0.0), Position::new(2.0, 1.0), Size::new(20.0, 10.0));
        assert_eq!(inside, Position::new(2.0, 1.0));
    }

    #[test]
    fn arrow_glyph_covers_eight_directions() {
        assert_eq!(arrow_glyph(1.0, 0.0), '→');
        assert_eq!(arrow_glyph(1.0, 1.0), '↘');
        assert_eq!(arrow_glyph(0.0, 1.0), '↓');
        assert_eq!(arrow_glyph(-1.0, 1.0), '↙');
        assert_eq!(arrow_glyph(-1.0, 0.0), '←');
        assert_eq!(arrow_glyph(-1.0, -1.0), '↖');
        assert_eq!(arrow_glyph(0.0, -1.0), '↑');
        assert_eq!(arrow_glyph(1.0, -1.0), '↗');
    }

    #[test]
    fn routes_follow_chain_order() {
        let mut board = CardBoard::seeded(3);
        board.add_card();
        let cards = render_cards(&board);
        let routes = route_links(&board.link_segments(), &cards, VIEW, Rect::new(0, 0, 120, 40));
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].start, board.cards()[0].center());
        assert_eq!(routes[1].start, board.cards()[1].center());
    }

    #[test]
    fn cursor_lines_split_on_newlines() {
        let plain = Style::default();
        let lines = lines_with_cursor("ab\ncd", 4, plain, plain);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].to_string(), "ab");
        assert_eq!(lines[1].to_string(), "c▌d");

        let empty = lines_with_cursor("", 0, plain, plain);
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].to_string(), "▌");
    }

    #[test]
    fn draws_previews_and_link_head() {
        let board = CardBoard::seeded(1);
        let cards = render_cards(&board);
        let links = board.link_segments();
        let out = screen(&data(&cards, &links));

        assert!(out.contains("This is a card with"), "{out}");
        assert!(out.contains("Another card with mo"), "{out}");
        assert!(out.contains("#1"));
        assert!(out.contains(MORE_LABEL));
        assert!(out.contains('→'), "{out}");
    }

    #[test]
    fn hidden_links_draw_no_head() {
        let board = CardBoard::seeded(1);
        let cards = render_cards(&board);
        let links = board.link_segments();
        let mut d = data(&cards, &links);
        d.show_links = false;
        assert!(!screen(&d).contains('→'));
    }

    #[test]
    fn editing_card_shows_draft_instead_of_preview() {
        let board = CardBoard::seeded(1);
        let mut cards = render_cards(&board);
        cards[0].text = "draft text".to_string();
        cards[0].state = CardState::Editing { cursor: 5 };
        let out = screen(&data(&cards, &[]));
        assert!(out.contains("draft▌"), "{out}");
        assert!(out.contains("[Enter] save"), "{out}");
        assert!(!out.contains("This is a card with"));
    }

    #[test]
    fn detail_overlay_shows_full_text() {
        let board = CardBoard::seeded(1);
        let cards = render_cards(&board);
        let mut d = data(&cards, &[]);
        d.detail = Some("the whole story");
        let out = screen(&d);
        assert!(out.contains("Card Details"));
        assert!(out.contains("the whole story"));
    }
}
