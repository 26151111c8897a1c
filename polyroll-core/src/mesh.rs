/// Renderer-agnostic die geometry: surface, face labels and outline edges
use nalgebra::Point3;
use serde::Serialize;

use crate::catalog::{Catalog, Edge, Polyhedron};
use crate::color::{ColorScale, Rgb};
use crate::dice::DieType;
use crate::error::Result;
use crate::style::RenderStyle;

/// Triangle surface with a per-vertex intensity driving the colour gradient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceMesh {
    pub positions: Vec<Point3<f64>>,
    pub triangles: Vec<[usize; 3]>,
    /// Linear ramp from 0 to 1 over vertices in storage order.
    pub intensity: Vec<f64>,
    /// `(position, colour)` stops, unparsed.
    pub color_stops: Vec<(f64, String)>,
    pub opacity: f64,
}

/// Number printed on a face.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceLabel {
    /// The rolled value this face stands for.
    pub outcome: usize,
    pub position: Point3<f64>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelSet {
    pub labels: Vec<FaceLabel>,
    pub font_size: u32,
    pub font_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeSet {
    /// Unique canonical vertex pairs, ascending.
    pub edges: Vec<Edge>,
    /// One segment per entry of `edges`.
    pub segments: Vec<[Point3<f64>; 2]>,
    pub color: String,
    pub width: u32,
}

/// Everything a renderer needs to draw one die.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshData {
    pub die: DieType,
    pub surface: SurfaceMesh,
    pub labels: LabelSet,
    pub edges: EdgeSet,
}

impl MeshData {
    /// Build against the global catalog.
    pub fn build(die: DieType, style: &RenderStyle) -> Self {
        build_mesh(Catalog::global(), die, style)
    }

    /// Parse the colour stops into a sampler.
    pub fn color_scale(&self) -> Result<ColorScale> {
        let stops = self
            .surface
            .color_stops
            .iter()
            .map(|(position, color)| Ok((*position, Rgb::parse(color)?)))
            .collect::<Result<Vec<_>>>()?;
        ColorScale::new(stops)
    }

    /// Mean vertex intensity of triangle `index`, used to tint a whole face.
    pub fn face_intensity(&self, index: usize) -> f64 {
        let [a, b, c] = self.surface.triangles[index];
        let intensity = &self.surface.intensity;
        (intensity[a] + intensity[b] + intensity[c]) / 3.0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Build the surface, labels and edges for `die` from `catalog`.
pub fn build_mesh(catalog: &Catalog, die: DieType, style: &RenderStyle) -> MeshData {
    let shape = catalog.get(die);
    MeshData {
        die,
        surface: surface(shape, style),
        labels: labels(shape, style),
        edges: edges(shape, style),
    }
}

fn surface(shape: &Polyhedron, style: &RenderStyle) -> SurfaceMesh {
    SurfaceMesh {
        positions: shape.vertices().to_vec(),
        triangles: shape.faces().to_vec(),
        intensity: linspace(shape.vertices().len()),
        color_stops: vec![
            (0.0, style.start_color.clone()),
            (0.5, style.middle_color.clone()),
            (1.0, style.end_color.clone()),
        ],
        opacity: style.opacity,
    }
}

fn labels(shape: &Polyhedron, style: &RenderStyle) -> LabelSet {
    let labels = shape
        .face_centroids()
        .iter()
        .enumerate()
        .map(|(index, &position)| FaceLabel {
            outcome: index + 1,
            position,
            text: (index + 1).to_string(),
        })
        .collect();

    LabelSet {
        labels,
        font_size: style.font_size,
        font_color: style.font_color.clone(),
    }
}

fn edges(shape: &Polyhedron, style: &RenderStyle) -> EdgeSet {
    let edges = shape.edges();
    let vertices = shape.vertices();
    let segments = edges
        .iter()
        .map(|&Edge(a, b)| [vertices[a], vertices[b]])
        .collect();

    EdgeSet {
        edges,
        segments,
        color: style.edge_color.clone(),
        width: style.edge_width,
    }
}

/// `n` evenly spaced values from 0 to 1 inclusive.
fn linspace(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..n).map(|i| i as f64 / (n - 1) as f64).collect(),
    }
}
