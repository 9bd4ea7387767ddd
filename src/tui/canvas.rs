use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{info, warn};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal};

use crate::board::model::{BoardError, CARD_SIZE_LIMITS, CardBoard, Position, preview};
use crate::config::{Config, MAX_ZOOM, MIN_ZOOM};
use crate::tui::gesture::{DragSurface, ResizeSurface};
use crate::tui::input::{self, Action, Direction};
use crate::tui::render::{self, CanvasRenderData, CardState, CardZone, RenderCard, Viewport};

const ZOOM_STEP: f32 = 0.01;
/// Terminal cells scrolled per key press in pan mode.
const PAN_STEP_CELLS: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Drag(DragSurface),
    Resize(ResizeSurface),
}

impl Gesture {
    fn index(&self) -> usize {
        match self {
            Self::Drag(drag) => drag.index(),
            Self::Resize(resize) => resize.index(),
        }
    }
}

/// Pointer ownership of the active gesture. Keyboard gestures have none, so
/// mouse drags and releases leave them alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PointerGrab {
    column: u16,
    row: u16,
    moved: bool,
}

#[derive(Debug)]
struct AppState {
    board: CardBoard,
    config: Config,
    focused: usize,
    gesture: Option<Gesture>,
    pointer: Option<PointerGrab>,
    viewport_x: f64,
    viewport_y: f64,
    zoom: f32,
    pan_mode: bool,
    show_help: bool,
    status_message: Option<String>,
    canvas_area: Rect,
}

impl AppState {
    fn new(board: CardBoard, config: Config) -> Self {
        let zoom = config.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        Self {
            board,
            config,
            focused: 0,
            gesture: None,
            pointer: None,
            viewport_x: 0.0,
            viewport_y: 0.0,
            zoom,
            pan_mode: false,
            show_help: false,
            status_message: None,
            canvas_area: Rect::default(),
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            x: self.viewport_x,
            y: self.viewport_y,
            zoom: self.zoom,
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        self.canvas_area = render::canvas_area(frame.area());

        let editing = self.board.editing();
        let cards = self
            .board
            .cards()
            .iter()
            .enumerate()
            .map(|(idx, card)| {
                let mut render_card = RenderCard {
                    id: card.id,
                    position: card.position,
                    size: card.size,
                    text: preview(&card.text),
                    focused: idx == self.focused,
                    state: CardState::Idle,
                };
                if let Some(session) = editing.filter(|s| s.index == idx) {
                    render_card.text = session.buffer().to_string();
                    render_card.state = CardState::Editing {
                        cursor: session.cursor(),
                    };
                }
                match &self.gesture {
                    Some(Gesture::Drag(drag)) if drag.index() == idx => {
                        render_card.position = drag.position();
                        render_card.state = CardState::Dragging;
                    }
                    Some(Gesture::Resize(resize)) if resize.index() == idx => {
                        render_card.size = resize.size();
                        render_card.state = CardState::Resizing;
                    }
                    _ => {}
                }
                render_card
            })
            .collect::<Vec<_>>();
        let links = self.board.link_segments();
        let hints = self.hints();

        let data = CanvasRenderData {
            cards: &cards,
            links: &links,
            viewport: self.viewport(),
            focused_id: self.board.card(self.focused).map(|c| c.id),
            mode_label: self.mode_label(),
            hints: &hints,
            message: self.status_message.as_deref(),
            show_help: self.show_help,
            show_links: self.config.show_links,
            detail: self.board.detail(),
        };
        render::draw(frame, &data);
    }

    fn mode_label(&self) -> &'static str {
        if self.board.detail().is_some() {
            return "Detail";
        }
        if self.board.editing().is_some() {
            return "Editing";
        }
        match self.gesture {
            Some(Gesture::Drag(_)) => "Moving",
            Some(Gesture::Resize(_)) => "Resizing",
            None if self.pan_mode => "Normal+Pan",
            None => "Normal",
        }
    }

    fn hints(&self) -> String {
        if self.board.detail().is_some() {
            return "[Esc/Enter] close details".to_string();
        }
        if self.board.editing().is_some() {
            return "type text, [Alt+Enter] newline, [Ctrl+U] clear, [Enter] save, [Esc] cancel".to_string();
        }
        match self.gesture {
            Some(Gesture::Drag(_)) => {
                format!(
                    "MOVE: [arrows/hjkl] {} units  [Enter] drop  [Esc] cancel",
                    self.config.move_step
                )
            }
            Some(Gesture::Resize(_)) => {
                format!(
                    "RESIZE: [arrows/hjkl] {} units  [Enter] apply  [Esc] cancel",
                    self.config.resize_step
                )
            }
            None if self.pan_mode => "[arrows/hjkl] scroll  [p] exit pan  [q] quit".to_string(),
            None => {
                "[Tab/j/k] card  [a] add  [e] edit  [o] details  [m] move  [r] resize  [p] pan  [q] quit"
                    .to_string()
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        self.status_message = None;

        if self.board.detail().is_some() {
            if matches!(
                key.code,
                KeyCode::Esc
                    | KeyCode::Enter
                    | KeyCode::Backspace
                    | KeyCode::Char('q')
                    | KeyCode::Char('o')
                    | KeyCode::Char(' ')
            ) {
                self.board.close_detail();
            }
            return Ok(false);
        }

        let in_text_mode = self.board.editing().is_some();
        let action = input::action_for_key(key, in_text_mode);

        if in_text_mode {
            return self.handle_text_action(action);
        }

        if self.show_help {
            if matches!(action, Action::ToggleHelp | Action::Cancel | Action::Quit) {
                self.show_help = false;
            }
            return Ok(false);
        }

        if self.gesture.is_some() {
            self.handle_gesture_action(action);
            return Ok(false);
        }

        match action {
            Action::Quit => return Ok(true),
            Action::ToggleHelp => self.show_help = true,
            Action::ZoomIn => self.zoom = (self.zoom + ZOOM_STEP).min(MAX_ZOOM),
            Action::ZoomOut => self.zoom = (self.zoom - ZOOM_STEP).max(MIN_ZOOM),
            Action::NextCard => self.move_focus(1),
            Action::PrevCard => self.move_focus(-1),
            Action::Move(direction) => self.move_or_pan(direction),
            Action::TogglePan => self.pan_mode = !self.pan_mode,
            Action::AddCard => {
                let idx = self.board.add_card();
                self.focused = idx;
                if let Some(card) = self.board.card(idx) {
                    self.status_message = Some(format!("added card #{}", card.id));
                }
            }
            Action::EditCard | Action::Activate => {
                let result = self.board.begin_edit(self.focused);
                self.report(result);
            }
            Action::ShowDetail => self.show_focused_detail(),
            Action::StartDrag => self.start_drag(),
            Action::StartResize => self.start_resize(),
            Action::Cancel => self.pan_mode = false,
            Action::Noop
            | Action::SubmitText
            | Action::Backspace
            | Action::Delete
            | Action::Home
            | Action::End
            | Action::Newline
            | Action::ClearText
            | Action::InputChar(_) => {}
        }
        Ok(false)
    }

    fn handle_text_action(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::SubmitText => {
                if let Some(id) = self.board.save_edit() {
                    self.status_message = Some(format!("saved card #{id}"));
                }
            }
            Action::Cancel => {
                self.board.cancel_edit();
            }
            Action::Backspace => {
                self.board.update_edit(|s| s.backspace());
            }
            Action::Delete => {
                self.board.update_edit(|s| s.delete());
            }
            Action::Newline => {
                self.board.update_edit(|s| s.insert_newline());
            }
            Action::ClearText => {
                self.board.update_edit(|s| s.set_text(""));
            }
            Action::InputChar(c) => {
                self.board.update_edit(|s| s.insert_char(c));
            }
            Action::Move(Direction::Left) => {
                self.board.update_edit(|s| s.move_left());
            }
            Action::Move(Direction::Right) => {
                self.board.update_edit(|s| s.move_right());
            }
            Action::Home => {
                self.board.update_edit(|s| s.move_home());
            }
            Action::End => {
                self.board.update_edit(|s| s.move_end());
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_gesture_action(&mut self, action: Action) {
        match action {
            Action::Move(direction) => {
                let (dx, dy) = match direction {
                    Direction::Up => (0.0, -1.0),
                    Direction::Down => (0.0, 1.0),
                    Direction::Left => (-1.0, 0.0),
                    Direction::Right => (1.0, 0.0),
                };
                match &mut self.gesture {
                    Some(Gesture::Drag(drag)) => {
                        drag.nudge(dx * self.config.move_step, dy * self.config.move_step)
                    }
                    Some(Gesture::Resize(resize)) => {
                        resize.nudge(dx * self.config.resize_step, dy * self.config.resize_step)
                    }
                    None => {}
                }
            }
            Action::Activate | Action::StartDrag | Action::StartResize => self.finish_gesture(),
            Action::Cancel => {
                self.gesture = None;
                self.pointer = None;
                self.status_message = Some("gesture cancelled".to_string());
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.board.detail().is_some() || self.board.editing().is_some() || self.show_help {
            return;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.gesture.is_some() {
                    return;
                }
                self.status_message = None;
                self.press_at(mouse.column, mouse.row);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(grab) = self.pointer.as_mut() else {
                    return;
                };
                grab.moved |= (mouse.column, mouse.row) != (grab.column, grab.row);
                let Some(point) = self.pointer_to_canvas(mouse.column, mouse.row) else {
                    return;
                };
                match &mut self.gesture {
                    Some(Gesture::Drag(drag)) => drag.track(point),
                    Some(Gesture::Resize(resize)) => resize.track(point),
                    None => {}
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.release_pointer(),
            MouseEventKind::ScrollUp => self.scroll(0.0, -1.0),
            MouseEventKind::ScrollDown => self.scroll(0.0, 1.0),
            _ => {}
        }
    }

    fn press_at(&mut self, column: u16, row: u16) {
        let viewport = self.viewport();
        let area = self.canvas_area;
        let hit = self.board.cards().iter().enumerate().rev().find_map(|(idx, card)| {
            let cell_box = viewport.project(area, card.position, card.size);
            cell_box.clip(area)?;
            render::zone_at(&cell_box, column, row).map(|zone| (idx, zone))
        });
        let Some((idx, zone)) = hit else {
            return;
        };
        self.focused = idx;
        let Some(card) = self.board.card(idx) else {
            return;
        };
        let grab = PointerGrab {
            column,
            row,
            moved: false,
        };
        match zone {
            CardZone::MoreMarker => {
                let text = card.text.clone();
                self.board.show_detail(text);
            }
            CardZone::ResizeHandle => {
                self.pointer = Some(grab);
                self.gesture = Some(Gesture::Resize(ResizeSurface::start(
                    idx,
                    card.position,
                    card.size,
                    CARD_SIZE_LIMITS,
                )));
            }
            CardZone::Body => {
                self.pointer = Some(grab);
                let pointer = viewport
                    .to_canvas(area, column, row)
                    .unwrap_or(card.position);
                self.gesture = Some(Gesture::Drag(DragSurface::grab(
                    idx,
                    card.position,
                    pointer,
                )));
            }
        }
    }

    /// Canvas point under the pointer, pinned to the canvas edges.
    fn pointer_to_canvas(&self, column: u16, row: u16) -> Option<Position> {
        let area = self.canvas_area;
        if area.is_empty() {
            return None;
        }
        let column = column.clamp(area.x, area.right() - 1);
        let row = row.clamp(area.y, area.bottom() - 1);
        self.viewport().to_canvas(area, column, row)
    }

    fn start_drag(&mut self) {
        if let Some(card) = self.board.card(self.focused) {
            self.gesture = Some(Gesture::Drag(DragSurface::start(self.focused, card.position)));
        }
    }

    fn start_resize(&mut self) {
        if let Some(card) = self.board.card(self.focused) {
            self.gesture = Some(Gesture::Resize(ResizeSurface::start(
                self.focused,
                card.position,
                card.size,
                CARD_SIZE_LIMITS,
            )));
        }
    }

    /// A press and release on a card body without movement edits the card;
    /// any other pointer gesture commits like the keyboard does.
    fn release_pointer(&mut self) {
        let Some(grab) = self.pointer.take() else {
            return;
        };
        if !grab.moved
            && let Some(Gesture::Drag(drag)) = &self.gesture
        {
            let index = drag.index();
            self.gesture = None;
            let result = self.board.begin_edit(index);
            self.report(result);
            return;
        }
        self.finish_gesture();
    }

    /// End the active gesture and commit its geometry to the board.
    fn finish_gesture(&mut self) {
        self.pointer = None;
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        let index = gesture.index();
        let mut result = Ok(());
        match gesture {
            Gesture::Drag(drag) => drag.finish(|index, position| {
                result = self.board.move_card(index, position.x, position.y);
            }),
            Gesture::Resize(resize) => resize.finish(|index, size| {
                result = self.board.resize_card(index, size.width, size.height);
            }),
        }
        self.focused = index;
        self.report(result);
    }

    fn show_focused_detail(&mut self) {
        if let Some(card) = self.board.card(self.focused) {
            let text = card.text.clone();
            self.board.show_detail(text);
        }
    }

    fn report(&mut self, result: Result<(), BoardError>) {
        if let Err(err) = result {
            warn!("board rejected update: {err}");
            self.status_message = Some(err.to_string());
        }
    }

    fn move_or_pan(&mut self, direction: Direction) {
        if self.pan_mode {
            match direction {
                Direction::Up => self.scroll(0.0, -1.0),
                Direction::Down => self.scroll(0.0, 1.0),
                Direction::Left => self.scroll(-1.0, 0.0),
                Direction::Right => self.scroll(1.0, 0.0),
            }
            return;
        }
        let delta = match direction {
            Direction::Up | Direction::Left => -1,
            Direction::Down | Direction::Right => 1,
        };
        self.move_focus(delta);
    }

    fn move_focus(&mut self, delta: isize) {
        if self.board.is_empty() {
            return;
        }
        let len = self.board.len();
        self.focused = (self.focused as isize + delta).rem_euclid(len as isize) as usize;
    }

    fn scroll(&mut self, dx_cells: f64, dy_cells: f64) {
        let viewport = self.viewport();
        let dx = dx_cells * PAN_STEP_CELLS / viewport.col_scale();
        let dy = dy_cells * PAN_STEP_CELLS / viewport.row_scale();
        self.viewport_x = (self.viewport_x + dx).max(0.0);
        self.viewport_y = (self.viewport_y + dy).max(0.0);
    }
}

pub fn run(board: CardBoard, config: Config) -> Result<()> {
    let mut app = AppState::new(board, config);
    info!("opening board with {} cards", app.board.len());

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|f| app.draw(f))?;
        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if matches!(key.kind, KeyEventKind::Release | KeyEventKind::Repeat) {
                    continue;
                }
                if app.handle_key(key)? {
                    break;
                }
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {}
        }
    }

    info!(
        "closing board with {} cards at revision {}",
        app.board.len(),
        app.board.revision()
    );
    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
    }
}
