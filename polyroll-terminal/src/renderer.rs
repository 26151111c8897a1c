/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use polyroll_core::{Camera, ColorScale, MeshData, Rgb};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide.
pub const CELL_ASPECT: f64 = 2.0;

/// Edges win depth ties against the faces they bound.
const EDGE_DEPTH_BIAS: f64 = 1e-3;

/// Colours resolved from a render style for one frame.
#[derive(Debug, Clone)]
pub struct Palette {
    pub scale: ColorScale,
    pub opacity: f64,
    pub edge: Rgb,
    pub font: Rgb,
    pub draw_edges: bool,
}

/// Everything needed to place the die on screen.
pub struct Scene<'a> {
    pub mesh: &'a MeshData,
    pub camera: &'a Camera,
    pub model: Matrix4<f64>,
    pub palette: &'a Palette,
    /// 1-based outcome whose label is highlighted.
    pub highlight: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: Color,
}

const BLANK: Cell = Cell {
    character: ' ',
    color: Color::Reset,
};

/// ASCII renderer that converts die meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f64>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f64::INFINITY; size],
            cells: vec![BLANK; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Aspect ratio to hand the camera so shapes keep their proportions.
    pub fn camera_aspect(&self) -> f64 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f64 / (self.height as f64 * CELL_ASPECT)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f64::INFINITY);
        self.cells.fill(BLANK);
    }

    pub fn render(&mut self, scene: &Scene<'_>) {
        let positions: Vec<Point3<f64>> = scene
            .mesh
            .surface
            .positions
            .iter()
            .map(|p| scene.model.transform_point(p))
            .collect();
        let centre = mean(&positions);
        let front = self.render_faces(scene, &positions, &centre);

        if scene.palette.draw_edges {
            self.render_edges(scene, &positions);
        }
        self.render_labels(scene, &front);
    }

    /// Rasterize the front-facing triangles; returns which faces were drawn.
    fn render_faces(
        &mut self,
        scene: &Scene<'_>,
        positions: &[Point3<f64>],
        centre: &Point3<f64>,
    ) -> Vec<bool> {
        let eye = scene.camera.position;
        let identity = Matrix4::identity();

        scene
            .mesh
            .surface
            .triangles
            .iter()
            .enumerate()
            .map(|(index, &[a, b, c])| {
                let corners = [positions[a], positions[b], positions[c]];
                let face_centre = mean(&corners);
                let normal = outward_normal(&corners, &face_centre, centre);
                let to_eye = (eye - face_centre).normalize();
                let facing = normal.dot(&to_eye);
                if facing <= 0.0 {
                    return false;
                }

                let mut screen = [(0.0, 0.0, 0.0); 3];
                for (slot, corner) in screen.iter_mut().zip(&corners) {
                    match scene.camera.project_to_screen(
                        corner,
                        &identity,
                        self.width as u32,
                        self.height as u32,
                    ) {
                        Some(projected) => *slot = projected,
                        None => return false, // Triangle is clipped
                    }
                }

                let brightness = facing.clamp(0.0, 1.0);
                let last = LUMINOSITY_RAMP.len() - 1;
                let ramp_index = ((brightness * last as f64).round() as usize).min(last);
                let tint = scene.palette.scale.sample(scene.mesh.face_intensity(index));
                let opacity = scene.palette.opacity.clamp(0.0, 1.0);
                let shaded = tint.scaled((0.35 + 0.65 * brightness) * opacity);

                self.rasterize_triangle(
                    &screen,
                    Cell {
                        character: LUMINOSITY_RAMP[ramp_index],
                        color: to_color(shaded),
                    },
                );
                true
            })
            .collect()
    }

    fn render_edges(&mut self, scene: &Scene<'_>, positions: &[Point3<f64>]) {
        let identity = Matrix4::identity();
        let color = to_color(scene.palette.edge);

        for edge in &scene.mesh.edges.edges {
            let ends = [positions[edge.0], positions[edge.1]];
            let projected: Option<Vec<(f64, f64, f64)>> = ends
                .iter()
                .map(|p| {
                    scene.camera.project_to_screen(
                        p,
                        &identity,
                        self.width as u32,
                        self.height as u32,
                    )
                })
                .collect();
            if let Some(projected) = projected {
                self.draw_line(projected[0], projected[1], color);
            }
        }
    }

    fn render_labels(&mut self, scene: &Scene<'_>, front: &[bool]) {
        let color = to_color(scene.palette.font);
        for label in &scene.mesh.labels.labels {
            if !front.get(label.outcome - 1).copied().unwrap_or(false) {
                continue;
            }
            let position = scene.model.transform_point(&label.position);
            let Some((x, y, _)) = scene.camera.project_to_screen(
                &position,
                &Matrix4::identity(),
                self.width as u32,
                self.height as u32,
            ) else {
                continue;
            };

            let text = if scene.highlight == Some(label.outcome) {
                format!("[{}]", label.text)
            } else {
                label.text.clone()
            };
            let start = (x - text.chars().count() as f64 / 2.0).round() as i64;
            self.write_text(start, y.floor() as i64, &text, color);
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f64, f64, f64); 3], cell: Cell) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i64;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i64;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i64;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i64;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i64 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 + 0.5;
                let py = y as f64 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.plot(x, y, depth, cell);
                    }
                }
            }
        }
    }

    fn draw_line(&mut self, from: (f64, f64, f64), to: (f64, f64, f64), color: Color) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let character = line_char(dx, dy);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;

        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            let x = (from.0 + dx * t).floor() as i64;
            let y = (from.1 + dy * t).floor() as i64;
            let depth = from.2 + (to.2 - from.2) * t - EDGE_DEPTH_BIAS;
            self.plot(x, y, depth, Cell { character, color });
        }
    }

    fn write_text(&mut self, x: i64, y: i64, text: &str, color: Color) {
        if y < 0 || y >= self.height as i64 {
            return;
        }
        for (offset, character) in text.chars().enumerate() {
            let cx = x + offset as i64;
            if cx >= 0 && cx < self.width as i64 {
                let idx = y as usize * self.width + cx as usize;
                self.cells[idx] = Cell { character, color };
            }
        }
    }

    fn plot(&mut self, x: i64, y: i64, depth: f64, cell: Cell) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.cells[idx] = cell;
        }
    }

    /// Plain characters of row `y`, for snapshots and tests.
    pub fn row_text(&self, y: usize) -> String {
        self.cells[y * self.width..(y + 1) * self.width]
            .iter()
            .map(|cell| cell.character)
            .collect()
    }

    /// Queue the buffer with its top-left corner at terminal cell (`left`, `top`).
    pub fn draw<W: Write>(&self, writer: &mut W, left: u16, top: u16) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(left, top + y as u16))?;
            for cell in &self.cells[y * self.width..(y + 1) * self.width] {
                writer.queue(SetForegroundColor(cell.color))?;
                writer.queue(Print(cell.character))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn mean(points: &[Point3<f64>]) -> Point3<f64> {
    let sum = points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / points.len().max(1) as f64)
}

fn outward_normal(
    corners: &[Point3<f64>; 3],
    face_centre: &Point3<f64>,
    body_centre: &Point3<f64>,
) -> Vector3<f64> {
    let normal = (corners[1] - corners[0]).cross(&(corners[2] - corners[0])).normalize();
    if normal.dot(&(face_centre - body_centre)) < 0.0 {
        -normal
    } else {
        normal
    }
}

/// Pick a line character from the on-screen slope (y grows downwards).
fn line_char(dx: f64, dy: f64) -> char {
    let (ax, ay) = (dx.abs(), dy.abs() * CELL_ASPECT);
    if ay < ax * 0.4 {
        '-'
    } else if ax < ay * 0.4 {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyroll_core::{Catalog, DieType, RenderStyle};

    fn palette() -> Palette {
        let style = RenderStyle::default();
        Palette {
            scale: ColorScale::from_style(&style).unwrap(),
            opacity: style.opacity,
            edge: Rgb::parse(&style.edge_color).unwrap(),
            font: Rgb::parse(&style.font_color).unwrap(),
            draw_edges: true,
        }
    }

    fn render(die: DieType, face: usize, width: usize, height: usize) -> AsciiRenderer {
        let shape = Catalog::global().get(die);
        let mesh = MeshData::build(die, &RenderStyle::default());
        let mut renderer = AsciiRenderer::new(width, height);
        let camera = Camera::facing(shape, face, renderer.camera_aspect()).unwrap();
        let palette = palette();
        renderer.render(&Scene {
            mesh: &mesh,
            camera: &camera,
            model: Matrix4::identity(),
            palette: &palette,
            highlight: Some(face),
        });
        renderer
    }

    #[test]
    fn test_barycentric_inside_and_outside() {
        let (a, b, c) = ((0.0, 0.0), (4.0, 0.0), (0.0, 4.0));
        let (w0, w1, w2) = barycentric(a, b, c, (1.0, 1.0)).unwrap();
        assert!(w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0);
        let (w0, w1, w2) = barycentric(a, b, c, (5.0, 5.0)).unwrap();
        assert!(w0 < 0.0 || w1 < 0.0 || w2 < 0.0);
        assert!(barycentric(a, a, a, (0.0, 0.0)).is_none());
    }

    #[test]
    fn test_line_char() {
        assert_eq!(line_char(10.0, 0.0), '-');
        assert_eq!(line_char(0.0, 5.0), '|');
        assert_eq!(line_char(4.0, 2.0), '\\');
        assert_eq!(line_char(4.0, -2.0), '/');
    }

    #[test]
    fn test_rolled_label_is_centred() {
        let renderer = render(DieType::D20, 7, 61, 31);
        let centre_row = renderer.row_text(15);
        assert!(centre_row.contains("[7]"), "row was {centre_row:?}");
    }

    #[test]
    fn test_every_die_draws_something() {
        for die in DieType::ALL {
            let renderer = render(die, die.face_count(), 40, 20);
            let filled: usize = (0..renderer.height())
                .map(|y| renderer.row_text(y).chars().filter(|&c| c != ' ').count())
                .sum();
            assert!(filled > 40, "{die} drew only {filled} cells");
        }
    }

    #[test]
    fn test_clear_blanks_buffer() {
        let mut renderer = render(DieType::D6, 1, 30, 15);
        renderer.clear();
        for y in 0..renderer.height() {
            assert!(renderer.row_text(y).chars().all(|c| c == ' '));
        }
    }

    #[test]
    fn test_draw_emits_every_row() {
        let renderer = render(DieType::D4, 2, 12, 6);
        let mut out = Vec::new();
        renderer.draw(&mut out, 0, 0).unwrap();
        assert!(!out.is_empty());
    }
}
