use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Points},
        Block, Paragraph,
    },
    Frame,
};

use crate::timer::{Phase, TimerSnapshot};

pub const BACKGROUND: Color = Color::Rgb(0x11, 0x11, 0x11);
pub const RING: Color = Color::Rgb(0x33, 0x33, 0x33);
pub const ARC: Color = Color::Rgb(0xFD, 0xB2, 0x07);
pub const TEXT: Color = Color::White;
pub const SHADOW: Color = Color::Rgb(0x33, 0x33, 0x33);
const BUTTON: Color = Color::Rgb(0x22, 0x22, 0x22);
const DISABLED: Color = Color::Rgb(0x55, 0x55, 0x55);

/// Cells kept free between the ring and the edge of the canvas.
const RING_MARGIN: f64 = 2.0;
/// Concentric passes that give the ring and arc some thickness.
const STROKE_PASSES: usize = 3;
const STROKE_STEP: f64 = 0.5;

/// Elapsed fraction of the current phase, in `[0, 1]`.
pub fn progress(remaining_secs: u64, total_secs: u64) -> f64 {
    if total_secs == 0 {
        return 0.0;
    }
    let elapsed = total_secs.saturating_sub(remaining_secs);
    (elapsed as f64 / total_secs as f64).clamp(0.0, 1.0)
}

pub fn sweep_degrees(progress: f64) -> f64 {
    progress * 360.0
}

/// `MM:SS`, minutes keep growing past 59.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Points along an arc starting at the top (90°) and running clockwise for
/// `sweep` degrees.
pub fn arc_points(radius: f64, sweep: f64) -> Vec<(f64, f64)> {
    if sweep <= 0.0 || radius <= 0.0 {
        return Vec::new();
    }

    let steps = (radius * sweep.to_radians() * 4.0).ceil().max(1.0) as usize;
    (0..=steps)
        .map(|i| {
            let theta = (90.0 - sweep * i as f64 / steps as f64).to_radians();
            (radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}

/// Canvas bounds for `area`. One x unit per column and two y units per row
/// so that a circle comes out round on typical terminal cells.
pub fn canvas_bounds(area: Rect) -> ([f64; 2], [f64; 2]) {
    let half_width = area.width as f64 / 2.0;
    let half_height = area.height as f64;
    ([-half_width, half_width], [-half_height, half_height])
}

pub fn ring_radius(area: Rect) -> f64 {
    let (x, y) = canvas_bounds(area);
    (x[1].min(y[1]) - RING_MARGIN).max(0.0)
}

/// Everything one frame needs, derived from a snapshot plus the entry values.
#[derive(Debug, Clone, PartialEq)]
pub struct DialView {
    pub phase: Phase,
    pub sweep: f64,
    pub clock: String,
    pub start_enabled: bool,
    pub pause_enabled: bool,
    pub reset_enabled: bool,
    pub pause_label: &'static str,
    pub focus_minutes: i64,
    pub break_minutes: i64,
}

impl DialView {
    pub fn new(snapshot: &TimerSnapshot, focus_minutes: i64, break_minutes: i64) -> Self {
        Self {
            phase: snapshot.phase,
            sweep: sweep_degrees(progress(snapshot.remaining_secs, snapshot.total_secs)),
            clock: format_clock(snapshot.remaining_secs),
            start_enabled: !snapshot.running,
            pause_enabled: snapshot.running,
            reset_enabled: snapshot.running,
            pause_label: if snapshot.paused { "Resume" } else { "Pause" },
            focus_minutes,
            break_minutes,
        }
    }
}

pub fn draw(frame: &mut Frame, view: &DialView) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(BACKGROUND)), area);

    let [dial_area, buttons_area, config_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    draw_dial(frame, dial_area, view);
    draw_buttons(frame, buttons_area, view);
    draw_config(frame, config_area, view);
}

fn draw_dial(frame: &mut Frame, area: Rect, view: &DialView) {
    let block = Block::bordered()
        .title(format!(" {} ", view.phase.label()))
        .title_alignment(Alignment::Center)
        .border_style(Style::default().fg(RING));
    let inner = block.inner(area);
    let (x_bounds, y_bounds) = canvas_bounds(inner);
    let radius = ring_radius(inner);

    let arcs: Vec<Vec<(f64, f64)>> = (0..STROKE_PASSES)
        .map(|pass| arc_points(radius - pass as f64 * STROKE_STEP, view.sweep))
        .collect();
    let clock = view.clock.clone();
    let clock_x = -(clock.chars().count() as f64) / 2.0;

    let canvas = Canvas::default()
        .block(block)
        .background_color(BACKGROUND)
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            if radius > 0.0 {
                for pass in 0..STROKE_PASSES {
                    ctx.draw(&Circle {
                        x: 0.0,
                        y: 0.0,
                        radius: radius - pass as f64 * STROKE_STEP,
                        color: RING,
                    });
                }
                ctx.layer();
                for coords in &arcs {
                    ctx.draw(&Points {
                        coords: coords.as_slice(),
                        color: ARC,
                    });
                }
            }

            // Shadow one cell right and one row down, then the readout on top.
            ctx.print(
                clock_x + 1.0,
                -2.0,
                Line::styled(clock.clone(), Style::default().fg(SHADOW)),
            );
            ctx.print(
                clock_x,
                0.0,
                Line::styled(clock.clone(), Style::default().fg(TEXT)),
            );
        });

    frame.render_widget(canvas, area);
}

fn button(label: &str, enabled: bool) -> Span<'static> {
    let style = if enabled {
        Style::default().fg(TEXT).bg(BUTTON)
    } else {
        Style::default().fg(DISABLED).bg(BACKGROUND)
    };
    Span::styled(format!(" {label} "), style)
}

fn draw_buttons(frame: &mut Frame, area: Rect, view: &DialView) {
    let line = Line::from(vec![
        button("[s] Start", view.start_enabled),
        Span::raw("  "),
        button(&format!("[p] {}", view.pause_label), view.pause_enabled),
        Span::raw("  "),
        button("[r] Reset", view.reset_enabled),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_config(frame: &mut Frame, area: Rect, view: &DialView) {
    let line = Line::from(vec![
        Span::styled("Focus: ", Style::default().fg(TEXT)),
        Span::styled(format!("{} [f/F]", view.focus_minutes), Style::default().fg(ARC)),
        Span::raw("   "),
        Span::styled("Break: ", Style::default().fg(TEXT)),
        Span::styled(format!("{} [b/B]", view.break_minutes), Style::default().fg(ARC)),
        Span::raw("   "),
        Span::styled("[q] Quit", Style::default().fg(DISABLED)),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
