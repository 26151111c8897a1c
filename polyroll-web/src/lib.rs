/// Polyroll Web - WASM bindings and a Canvas 2D dice view
///
/// Exposes the die catalog, mesh data, camera eye and rolls to JavaScript,
/// and draws a die on a `<canvas>` with its rolled face towards the viewer.

use nalgebra::Matrix4;
use polyroll_core::{
    compute_camera_eye, parse_notation, roll, Camera, Catalog, ColorScale, DieType, MeshData, Orbit,
    RenderStyle, Rgb,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub mod scene;

use scene::{build_frame, Frame, FrameInput};

fn to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_die(die: &str) -> Result<DieType, JsValue> {
    die.parse::<DieType>().map_err(to_js)
}

/// Number of faces of `die` (`"d4"` .. `"d20"`).
#[wasm_bindgen]
pub fn face_count(die: &str) -> Result<usize, JsValue> {
    Ok(parse_die(die)?.face_count())
}

/// Mesh, labels and edges for `die` as JSON. `style_json` may be empty.
#[wasm_bindgen]
pub fn build_mesh_json(die: &str, style_json: &str) -> Result<String, JsValue> {
    let style = parse_style(style_json)?;
    MeshData::build(parse_die(die)?, &style).to_json().map_err(to_js)
}

/// Camera eye `[x, y, z]` that presents `face` of `die`.
#[wasm_bindgen]
pub fn camera_eye(die: &str, face: usize) -> Result<Vec<f64>, JsValue> {
    let eye = compute_camera_eye(parse_die(die)?, face).map_err(to_js)?;
    Ok(vec![eye.x, eye.y, eye.z])
}

/// Roll `notation` (e.g. `"3d6+2"`) with a generator seeded by the caller.
#[wasm_bindgen]
pub fn roll_json(notation: &str, seed: u32) -> Result<String, JsValue> {
    let request = parse_notation(notation).map_err(to_js)?;
    let outcome = roll(&request, &mut StdRng::seed_from_u64(seed as u64));
    serde_json::to_string(&outcome).map_err(to_js)
}

fn parse_style(style_json: &str) -> Result<RenderStyle, JsValue> {
    if style_json.trim().is_empty() {
        Ok(RenderStyle::default())
    } else {
        RenderStyle::from_json_str(style_json).map_err(to_js)
    }
}

#[wasm_bindgen]
pub struct WebRenderer {
    context: Option<CanvasRenderingContext2d>,
    width: u32,
    height: u32,
    style: RenderStyle,
    scale: ColorScale,
    mesh: MeshData,
    face: usize,
    orbit: Orbit,
}

#[wasm_bindgen]
impl WebRenderer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebRenderer, JsValue> {
        let style = RenderStyle::default();
        Ok(WebRenderer {
            context: None,
            width: 0,
            height: 0,
            scale: ColorScale::from_style_lossy(&style),
            mesh: MeshData::build(DieType::D4, &style),
            style,
            face: 1,
            orbit: Orbit::default(),
        })
    }

    /// Initialize the renderer with a canvas element
    pub fn init(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id `{canvas_id}`")))?
            .dyn_into()
            .map_err(|_| JsValue::from_str(&format!("`{canvas_id}` is not a canvas")))?;
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("unexpected 2d context type"))?;

        self.width = canvas.width();
        self.height = canvas.height();
        self.context = Some(context);
        self.render()
    }

    /// Replace the style with a JSON document using the template field names.
    /// Gradient colours the core does not know fall back to the default stop.
    pub fn set_style_json(&mut self, style_json: &str) -> Result<(), JsValue> {
        let style = parse_style(style_json)?;
        self.scale = ColorScale::from_style_lossy(&style);
        self.mesh = MeshData::build(self.mesh.die, &style);
        self.style = style;
        self.render()
    }

    /// Show `face` of `die`. An out-of-range face is rejected and the view is left as it was.
    pub fn show(&mut self, die: &str, face: usize) -> Result<(), JsValue> {
        let die = parse_die(die)?;
        Catalog::global().get(die).check_outcome(face).map_err(to_js)?;
        if die != self.mesh.die {
            self.mesh = MeshData::build(die, &self.style);
        }
        self.face = face;
        self.orbit.reset();
        self.render()
    }

    /// Turn the die about its centre (radians).
    pub fn orbit(&mut self, d_yaw: f64, d_pitch: f64) -> Result<(), JsValue> {
        self.orbit.rotate(d_yaw, d_pitch);
        self.render()
    }

    /// Render a frame
    pub fn render(&mut self) -> Result<(), JsValue> {
        let Some(context) = &self.context else {
            return Ok(());
        };
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }

        let shape = Catalog::global().get(self.mesh.die);
        let aspect = self.width as f64 / self.height as f64;
        let camera = Camera::facing(shape, self.face, aspect).map_err(to_js)?;
        let right = camera.forward().cross(&camera.up).normalize();
        let model = if self.orbit.is_identity() {
            Matrix4::identity()
        } else {
            self.orbit.model_matrix(&shape.centroid(), &camera.up, &right)
        };

        let frame = build_frame(&FrameInput {
            mesh: &self.mesh,
            camera: &camera,
            model,
            scale: &self.scale,
            width: self.width,
            height: self.height,
            highlight: self.face,
        });
        paint(context, &frame, &self.style, self.width, self.height)
    }
}

fn paint(
    context: &CanvasRenderingContext2d,
    frame: &Frame,
    style: &RenderStyle,
    width: u32,
    height: u32,
) -> Result<(), JsValue> {
    context.clear_rect(0.0, 0.0, width as f64, height as f64);

    context.set_global_alpha(style.opacity.clamp(0.0, 1.0));
    for polygon in &frame.polygons {
        let [a, b, c] = polygon.points;
        context.begin_path();
        context.move_to(a.0, a.1);
        context.line_to(b.0, b.1);
        context.line_to(c.0, c.1);
        context.close_path();
        context.set_fill_style(&JsValue::from_str(&polygon.fill.to_hex()));
        context.fill();
    }
    context.set_global_alpha(1.0);

    if style.edge_width > 0 {
        context.set_stroke_style(&JsValue::from_str(&css_color(&style.edge_color)));
        context.set_line_width(style.edge_width as f64);
        context.begin_path();
        for [from, to] in &frame.segments {
            context.move_to(from.0, from.1);
            context.line_to(to.0, to.1);
        }
        context.stroke();
    }

    context.set_text_align("center");
    context.set_text_baseline("middle");
    context.set_fill_style(&JsValue::from_str(&css_color(&style.font_color)));
    for label in &frame.labels {
        let weight = if label.highlight { "bold " } else { "" };
        context.set_font(&format!("{weight}{}px sans-serif", style.font_size));
        context.fill_text(&label.text, label.x, label.y)?;
    }
    Ok(())
}

/// Normalise a style colour for the canvas, keeping names the canvas knows.
fn css_color(value: &str) -> String {
    Rgb::parse(value)
        .map(Rgb::to_hex)
        .unwrap_or_else(|_| value.to_string())
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    web_sys::console::log_1(&JsValue::from_str(&format!(
        "polyroll ready: {} dice",
        Catalog::global().iter().count()
    )));
    Ok(())
}
