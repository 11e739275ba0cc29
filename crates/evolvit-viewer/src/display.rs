//! Frame outputs: a braille canvas in the terminal, or log lines.

use crate::animator::FrameSink;
use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use evolvit_core::{Color, Point};
use evolvit_render::{DisplayList, FrameStats, Shape};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{self, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line, Points};
use ratatui::widgets::Block;
use ratatui::{Frame, Terminal};
use std::io::{self, Stdout};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Logs a one-line summary per frame
#[derive(Default)]
pub struct HeadlessSink {
    frames: u64,
}

impl FrameSink for HeadlessSink {
    fn present(&mut self, frame: &DisplayList, stats: &FrameStats, status: &str) -> Result<()> {
        self.frames += 1;
        info!(
            frame = self.frames,
            drawn = stats.creatures_drawn,
            skipped = stats.creatures_skipped,
            organs = stats.organs_drawn,
            shapes = frame.shapes().len(),
            status = status,
            "{}",
            frame.summary()
        );
        Ok(())
    }
}

/// Paints frames onto the terminal's alternate screen.
///
/// Raw mode and the alternate screen are released on drop.
pub struct TerminalDisplay {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalDisplay {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

impl FrameSink for TerminalDisplay {
    fn present(&mut self, frame: &DisplayList, _stats: &FrameStats, status: &str) -> Result<()> {
        self.terminal.draw(|f| draw_frame(f, frame, status))?;
        Ok(())
    }
}

/// Render one frame as a bordered braille canvas filling the whole area
fn draw_frame(f: &mut Frame<'_>, frame: &DisplayList, status: &str) {
    let (width, height) = frame.size();
    let area = f.area();
    // Braille cells are 2 dots wide
    let dot = width / (area.width.max(1) as f64 * 2.0);

    let canvas = Canvas::default()
        .block(
            Block::bordered()
                .title(format!(" {} ", frame.summary()))
                .title_bottom(format!(" {} | q to quit ", status))
                .border_style(Style::default().fg(style::Color::DarkGray)),
        )
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for shape in frame.shapes() {
                paint_shape(ctx, shape, (width, height), dot);
            }
        });

    f.render_widget(canvas, area);
}

/// Upper bound on rings drawn for one filled circle
const MAX_FILL_RINGS: usize = 512;

/// Canvas y grows upwards, world y grows downwards
fn flip(point: Point, height: f64) -> (f64, f64) {
    (point.x, height - point.y)
}

fn to_terminal_color(color: Color) -> style::Color {
    style::Color::Rgb(color.r, color.g, color.b)
}

fn paint_shape(ctx: &mut Context<'_>, shape: &Shape, (width, height): (f64, f64), dot: f64) {
    match shape {
        Shape::Circle {
            center,
            radius,
            color,
        } => {
            if radius.is_nan() || *radius <= 0.0 {
                return;
            }
            let (x, y) = flip(*center, height);
            let color = to_terminal_color(*color);

            // Rings past the farthest world corner are never visible
            let reach = x.abs().max((x - width).abs()).hypot(y.abs().max((y - height).abs()));
            let radius = radius.min(reach);

            // Filled by concentric rings about one dot apart
            let step = dot.max(0.25).max(radius / MAX_FILL_RINGS as f64);
            let rings = ((radius / step).ceil() as usize).min(MAX_FILL_RINGS);
            for ring in 0..rings {
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: radius - ring as f64 * step,
                    color,
                });
            }
            ctx.draw(&Points {
                coords: &[(x, y)],
                color,
            });
        }
        Shape::Line {
            from, to, color, ..
        } => {
            let (x1, y1) = flip(*from, height);
            let (x2, y2) = flip(*to, height);
            ctx.draw(&Line {
                x1,
                y1,
                x2,
                y2,
                color: to_terminal_color(*color),
            });
        }
    }
}

/// Cancel `cancel` when the user presses `q`, `Esc` or Ctrl-C
pub fn spawn_key_listener(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut events = EventStream::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = events.next() => match event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        let quit = matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                            || (key.code == KeyCode::Char('c')
                                && key.modifiers.contains(KeyModifiers::CONTROL));
                        if quit {
                            info!("Quit requested from keyboard");
                            cancel.cancel();
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Terminal event stream failed: {}", e);
                        break;
                    }
                    None => break,
                },
            }
        }
    })
}
