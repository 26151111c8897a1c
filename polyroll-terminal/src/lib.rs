/// Terminal dice roller: presents the rolled face of a 3D die in ASCII
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use nalgebra::Matrix4;
use polyroll_core::{
    Camera, Catalog, ColorScale, DieType, MeshData, Orbit, RenderStyle, Rgb, RollOutcome,
    RollRequest,
};
use rand::Rng;
use std::io::{self, stdout, Write};
use std::time::Duration;

pub mod config;
pub mod history;
pub mod renderer;

pub use history::{HistoryEntry, RollHistory};
pub use renderer::{AsciiRenderer, Palette, Scene};

/// Width of the history panel when the terminal is wide enough for one.
const HISTORY_WIDTH: u16 = 40;
const ORBIT_STEP: f64 = 0.15;

/// What a key press asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    Roll,
    SelectDie(DieType),
    Count(i32),
    Modifier(i32),
    Orbit { yaw: f64, pitch: f64 },
    ResetOrbit,
    ClearHistory,
}

impl Action {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        let action = match code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char(' ') | KeyCode::Enter => Action::Roll,
            KeyCode::Char(c @ '1'..='6') => {
                Action::SelectDie(DieType::ALL[c as usize - '1' as usize])
            }
            KeyCode::Char(']') => Action::Count(1),
            KeyCode::Char('[') => Action::Count(-1),
            KeyCode::Char('+') | KeyCode::Char('=') => Action::Modifier(1),
            KeyCode::Char('-') | KeyCode::Char('_') => Action::Modifier(-1),
            KeyCode::Char('w') | KeyCode::Up => Action::Orbit { yaw: 0.0, pitch: -ORBIT_STEP },
            KeyCode::Char('s') | KeyCode::Down => Action::Orbit { yaw: 0.0, pitch: ORBIT_STEP },
            KeyCode::Char('a') | KeyCode::Left => Action::Orbit { yaw: -ORBIT_STEP, pitch: 0.0 },
            KeyCode::Char('d') | KeyCode::Right => Action::Orbit { yaw: ORBIT_STEP, pitch: 0.0 },
            KeyCode::Char('0') => Action::ResetOrbit,
            KeyCode::Char('c') => Action::ClearHistory,
            _ => return None,
        };
        Some(action)
    }
}

/// Viewer state independent of the terminal: request, shown face, history.
pub struct DiceViewer<R> {
    catalog: &'static Catalog,
    style: RenderStyle,
    palette: Palette,
    mesh: MeshData,
    request: RollRequest,
    shown_face: usize,
    last: Option<RollOutcome>,
    history: RollHistory,
    orbit: Orbit,
    rng: R,
}

impl<R: Rng> DiceViewer<R> {
    pub fn new(style: RenderStyle, request: RollRequest, rng: R) -> Self {
        let palette = palette_for(&style);
        let mesh = MeshData::build(request.die, &style);
        Self {
            catalog: Catalog::global(),
            style,
            palette,
            mesh,
            request,
            // Before any roll the die previews face 1.
            shown_face: 1,
            last: None,
            history: RollHistory::new(),
            orbit: Orbit::default(),
            rng,
        }
    }

    /// Apply `action`; returns `false` once the viewer should close.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return false,
            Action::Roll => {
                self.roll();
            }
            Action::SelectDie(die) => {
                if die != self.request.die {
                    self.request = self.request.with_die(die);
                    self.mesh = MeshData::build(die, &self.style);
                    self.shown_face = 1;
                    self.last = None;
                    self.orbit.reset();
                }
            }
            Action::Count(delta) => self.request = self.request.with_count_delta(delta),
            Action::Modifier(delta) => self.request = self.request.with_modifier_delta(delta),
            Action::Orbit { yaw, pitch } => self.orbit.rotate(yaw, pitch),
            Action::ResetOrbit => self.orbit.reset(),
            Action::ClearHistory => self.history.clear(),
        }
        true
    }

    pub fn roll(&mut self) -> &RollOutcome {
        let outcome = polyroll_core::roll(&self.request, &mut self.rng);
        self.history.record(&outcome);
        self.set_shown_face(outcome.shown_face());
        self.orbit.reset();
        self.last.insert(outcome)
    }

    /// Present `face`, keeping the current one if `face` does not exist on this die.
    pub fn set_shown_face(&mut self, face: usize) {
        match self.catalog.get(self.request.die).check_outcome(face) {
            Ok(()) => self.shown_face = face,
            Err(err) => log::warn!("keeping face {}: {}", self.shown_face, err),
        }
    }

    pub fn request(&self) -> &RollRequest {
        &self.request
    }

    pub fn shown_face(&self) -> usize {
        self.shown_face
    }

    pub fn last(&self) -> Option<&RollOutcome> {
        self.last.as_ref()
    }

    pub fn history(&self) -> &RollHistory {
        &self.history
    }

    pub fn orbit(&self) -> &Orbit {
        &self.orbit
    }

    /// Draw the die into `renderer`, framed for its current size.
    pub fn render_into(&self, renderer: &mut AsciiRenderer) -> polyroll_core::Result<()> {
        let shape = self.catalog.get(self.request.die);
        let camera = Camera::facing(shape, self.shown_face, renderer.camera_aspect())?;
        let right = camera.forward().cross(&camera.up).normalize();
        let model = if self.orbit.is_identity() {
            Matrix4::identity()
        } else {
            self.orbit.model_matrix(&shape.centroid(), &camera.up, &right)
        };

        renderer.clear();
        renderer.render(&Scene {
            mesh: &self.mesh,
            camera: &camera,
            model,
            palette: &self.palette,
            highlight: Some(self.shown_face),
        });
        Ok(())
    }

    pub fn status_line(&self) -> String {
        let request = format!(
            "{}  [count {} | mod {:+}]",
            self.request, self.request.count, self.request.modifier
        );
        match &self.last {
            Some(outcome) => format!(
                "{}  ->  {:?} = {}  (showing {})",
                request, outcome.results, outcome.total, self.shown_face
            ),
            None => format!("{}  ->  preview, press space to roll", request),
        }
    }
}

/// Resolve style colours, falling back to the defaults for any that do not parse.
pub fn palette_for(style: &RenderStyle) -> Palette {
    let defaults = RenderStyle::default();
    let color = |value: &str, fallback: &str| {
        Rgb::parse(value).unwrap_or_else(|err| {
            log::warn!("{err}, using {fallback}");
            Rgb::parse(fallback).unwrap_or(Rgb::new(255, 255, 255))
        })
    };

    Palette {
        scale: ColorScale::from_style_lossy(style),
        opacity: style.opacity,
        edge: color(&style.edge_color, &defaults.edge_color),
        font: color(&style.font_color, &defaults.font_color),
        draw_edges: style.edge_width > 0,
    }
}

const CONTROLS: &str =
    "Polyroll | 1-6=Die Space=Roll [/]=Count -/+=Mod WASD=Turn 0=Reset C=Clear Q=Quit";

/// Main application struct for terminal dice rolling
pub struct TerminalApp<R> {
    viewer: DiceViewer<R>,
    renderer: AsciiRenderer,
    running: bool,
}

impl<R: Rng> TerminalApp<R> {
    pub fn new(viewer: DiceViewer<R>) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let (view_width, view_height) = viewport(width, height);
        Ok(Self {
            viewer,
            renderer: AsciiRenderer::new(view_width as usize, view_height as usize),
            running: true,
        })
    }

    pub fn viewer(&self) -> &DiceViewer<R> {
        &self.viewer
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        self.render()?;
        while self.running {
            if !event::poll(Duration::from_millis(250))? {
                continue;
            }
            match event::read()? {
                Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press,
                    ..
                }) => {
                    if let Some(action) = Action::from_key(code) {
                        self.running = self.viewer.apply(action);
                    }
                }
                Event::Resize(width, height) => {
                    let (view_width, view_height) = viewport(width, height);
                    self.renderer.resize(view_width as usize, view_height as usize);
                }
                _ => continue,
            }
            if self.running {
                self.render()?;
            }
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        let mut stdout = stdout();
        queue!(stdout, terminal::Clear(ClearType::All))?;

        if let Err(err) = self.viewer.render_into(&mut self.renderer) {
            log::warn!("could not place camera: {err}");
        }
        self.renderer.draw(&mut stdout, 0, 1)?;

        if width > HISTORY_WIDTH * 2 {
            let left = width - HISTORY_WIDTH;
            let rows = height.saturating_sub(2) as usize;
            queue!(stdout, SetForegroundColor(Color::Grey))?;
            for (row, line) in self
                .viewer
                .history()
                .table(rows, HISTORY_WIDTH as usize - 1)
                .iter()
                .enumerate()
            {
                queue!(stdout, cursor::MoveTo(left + 1, row as u16 + 1), Print(line))?;
            }
        }

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(CONTROLS),
            cursor::MoveTo(0, height.saturating_sub(1)),
            SetForegroundColor(Color::White),
            Print(self.viewer.status_line()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Die viewport size for a terminal of `width` x `height` cells.
pub fn viewport(width: u16, height: u16) -> (u16, u16) {
    let view_width = if width > HISTORY_WIDTH * 2 {
        width - HISTORY_WIDTH
    } else {
        width
    };
    (view_width, height.saturating_sub(2))
}
