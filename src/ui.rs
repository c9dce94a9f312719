use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect as TermRect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::{
    clock::{ClockState, HandMode, HOUR_HAND_LEN, MINUTE_HAND_LEN},
    mapper::{Mapper, Rect},
    quiz::QuestionDialog,
    App, AppState, Mode,
};

/// Terminal cells are roughly twice as tall as wide; the mapper works in
/// square units and X is expanded back to columns when painting.
const CELL_ASPECT: f64 = 2.0;

/// The fixed logical drawing space of the clock face.
const WORLD: Rect = Rect {
    xmin: -1.0,
    ymin: -1.0,
    xmax: 1.0,
    ymax: 1.0,
};

const TICK_SYMBOL: &str = "●";
const HOUR_HAND_SYMBOL: &str = "█";
const MINUTE_HAND_SYMBOL: &str = "▓";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Theme {
    Plain,
    Backdrop,
}

/// Fixed color palette for one theme; toggling the backdrop swaps the whole
/// palette and forces a full redraw.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub hand: Color,
    pub tick: Color,
}

impl Palette {
    pub fn plain() -> Self {
        Self {
            background: Color::Black,
            hand: Color::White,
            tick: Color::Gray,
        }
    }

    pub fn backdrop() -> Self {
        Self {
            // antique white / dark orange / dark green
            background: Color::Rgb(250, 235, 215),
            hand: Color::Rgb(255, 140, 0),
            tick: Color::Rgb(0, 100, 0),
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Plain => Self::plain(),
            Theme::Backdrop => Self::backdrop(),
        }
    }
}

impl Widget for &App {
    fn render(self, area: TermRect, buf: &mut Buffer) {
        let palette = Palette::for_theme(self.theme);

        fill_background(area, buf, palette.background);

        if let Some(mapper) = face_mapper(area) {
            paint_ticks(&mapper, area, buf, &palette);
            paint_hands(&self.clock, self.hand_mode(), &mapper, area, buf, &palette);
            if self.theme == Theme::Plain {
                paint_dot(&mapper, 0.0, 0.0, area, buf, palette.tick);
            }
        }

        match self.state {
            AppState::Showing => render_legend(self, area, buf),
            AppState::Asking => {
                if let Some(dialog) = &self.dialog {
                    render_dialog(dialog, area, buf);
                }
            }
            AppState::Feedback => render_feedback(self, area, buf),
            AppState::Score => render_score(self, area, buf),
        }
    }
}

/// Builds the mapper for the padded drawing area, or None when the terminal
/// is too small to hold a non-degenerate viewport.
fn face_mapper(area: TermRect) -> Option<Mapper> {
    let vw = f64::from(area.width) / CELL_ASPECT;
    let vh = f64::from(area.height);
    let pad = vw.min(vh) / 16.0;
    let viewport = Rect::new(pad, pad, vw - pad, vh - pad);
    Mapper::new(WORLD, viewport).ok()
}

fn fill_background(area: TermRect, buf: &mut Buffer, color: Color) {
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol(" ");
                cell.set_bg(color);
            }
        }
    }
}

/// Writes one symbol at the cell a square-unit viewport point lands on.
fn paint_cell(
    point: (f64, f64),
    symbol: &str,
    color: Color,
    area: TermRect,
    buf: &mut Buffer,
) {
    let col = (point.0 * CELL_ASPECT).round();
    let row = point.1.round();
    if col < 0.0 || row < 0.0 {
        return;
    }
    let (col, row) = (col as u16, row as u16);
    if col >= area.width || row >= area.height {
        return;
    }
    if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
        cell.set_symbol(symbol);
        cell.set_fg(color);
    }
}

fn paint_dot(mapper: &Mapper, x: f64, y: f64, area: TermRect, buf: &mut Buffer, color: Color) {
    paint_cell(mapper.map(x, y), TICK_SYMBOL, color, area, buf);
}

/// Twelve tick marks every 30 degrees, starting at 12 o'clock.
fn paint_ticks(mapper: &Mapper, area: TermRect, buf: &mut Buffer, palette: &Palette) {
    let start = std::f64::consts::FRAC_PI_2;
    let step = std::f64::consts::PI / 6.0;
    for i in 0..12 {
        let angle = start - i as f64 * step;
        paint_dot(mapper, angle.cos(), angle.sin(), area, buf, palette.tick);
    }
}

/// The hands are their own pass over the ticks, matching the separately
/// erasable handle group of a retained canvas.
fn paint_hands(
    clock: &ClockState,
    mode: HandMode,
    mapper: &Mapper,
    area: TermRect,
    buf: &mut Buffer,
    palette: &Palette,
) {
    paint_hand(
        clock.hour_hand_angle(mode),
        HOUR_HAND_LEN,
        HOUR_HAND_SYMBOL,
        mapper,
        area,
        buf,
        palette.hand,
    );
    paint_hand(
        clock.minute_hand_angle(mode),
        MINUTE_HAND_LEN,
        MINUTE_HAND_SYMBOL,
        mapper,
        area,
        buf,
        palette.hand,
    );
}

/// Rasterizes a hand by sampling the world segment from the center out.
fn paint_hand(
    angle: f64,
    length: f64,
    symbol: &str,
    mapper: &Mapper,
    area: TermRect,
    buf: &mut Buffer,
    color: Color,
) {
    let (tip_x, tip_y) = (angle.cos() * length, angle.sin() * length);
    // Dense enough that adjacent samples land on touching cells.
    let steps = (mapper.scale() * length * CELL_ASPECT).ceil().max(1.0) as usize * 2;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        paint_cell(mapper.map(tip_x * t, tip_y * t), symbol, color, area, buf);
    }
}

/// A centered sub-rectangle, clamped to the available area.
fn centered_rect(width: u16, height: u16, area: TermRect) -> TermRect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    TermRect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_legend(app: &App, area: TermRect, buf: &mut Buffer) {
    if area.height < 2 {
        return;
    }
    let mut keys = String::from("(esc) quit");
    if app.image.present {
        keys.push_str("  (i) backdrop");
    }
    keys.push_str(&format!("  (e) hands: {}", app.hand_mode()));
    if let Mode::Animate { .. } = app.mode {
        keys.push_str(&format!("  [{}]", app.clock.time()));
    }
    let legend = Paragraph::new(Span::styled(
        keys,
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    let line = TermRect {
        x: area.x,
        y: area.bottom() - 1,
        width: area.width,
        height: 1,
    };
    legend.render(line, buf);
}

fn render_dialog(dialog: &QuestionDialog, area: TermRect, buf: &mut Buffer) {
    let height = if dialog.warning.is_some() { 8 } else { 6 };
    let popup = centered_rect(34, height, area);
    Clear.render(popup, buf);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(dialog.title())
        .style(Style::default().bg(Color::Black).fg(Color::White));
    let inner = block.inner(popup);
    block.render(popup, buf);

    let input_style = if dialog.is_selected() {
        // Rejected input stays selected until the next keystroke.
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::UNDERLINED)
    };

    let mut lines = vec![
        Line::from(vec![
            Span::raw("What time is it?  "),
            Span::styled(format!("{}_", dialog.input), input_style),
        ]),
        Line::default(),
    ];
    if let Some(warning) = &dialog.warning {
        for l in warning.to_string().lines() {
            lines.push(Line::from(Span::styled(
                l.to_string(),
                Style::default().fg(Color::Red),
            )));
        }
    }
    lines.push(Line::from(Span::styled(
        "(enter) answer  (esc) stop",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )));

    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .render(inner, buf);
}

fn render_feedback(app: &App, area: TermRect, buf: &mut Buffer) {
    let Some(round) = &app.last_round else {
        return;
    };
    let popup = centered_rect(38, 5, area);
    Clear.render(popup, buf);

    let (title, body, color) = if round.correct {
        ("Correct", "Correct!".to_string(), Color::Green)
    } else {
        (
            "Sorry",
            format!("Sorry, the correct answer was {}", round.expected),
            Color::Red,
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().bg(Color::Black).fg(color));
    let inner = block.inner(popup);
    block.render(popup, buf);

    let lines = vec![
        Line::from(Span::styled(body, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(
            "(any key) next question",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];
    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .render(inner, buf);
}

fn render_score(app: &App, area: TermRect, buf: &mut Buffer) {
    let popup = centered_rect(34, 5, area);
    Clear.render(popup, buf);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Score")
        .style(Style::default().bg(Color::Black).fg(Color::White));
    let inner = block.inner(popup);
    block.render(popup, buf);

    let lines = vec![
        Line::from(Span::styled(
            app.tally.summary(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "(any key) exit",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(inner, buf);
}
