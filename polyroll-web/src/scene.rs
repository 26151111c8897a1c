/// Screen-space frame of a die, independent of the drawing surface
use nalgebra::{Matrix4, Point3, Vector3};
use polyroll_core::{Camera, ColorScale, MeshData, Rgb};

/// A projected face, ready to fill.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub outcome: usize,
    pub points: [(f64, f64); 3],
    /// Mean NDC depth, larger is farther.
    pub depth: f64,
    pub fill: Rgb,
    pub front: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub highlight: bool,
}

/// Everything to paint, in paint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Back to front.
    pub polygons: Vec<Polygon>,
    pub segments: Vec<[(f64, f64); 2]>,
    /// Labels of front-facing faces only.
    pub labels: Vec<Label>,
}

pub struct FrameInput<'a> {
    pub mesh: &'a MeshData,
    pub camera: &'a Camera,
    pub model: Matrix4<f64>,
    pub scale: &'a ColorScale,
    pub width: u32,
    pub height: u32,
    pub highlight: usize,
}

pub fn build_frame(input: &FrameInput<'_>) -> Frame {
    let identity = Matrix4::identity();
    let project = |p: &Point3<f64>| {
        input
            .camera
            .project_to_screen(p, &identity, input.width, input.height)
    };

    let positions: Vec<Point3<f64>> = input
        .mesh
        .surface
        .positions
        .iter()
        .map(|p| input.model.transform_point(p))
        .collect();
    let body_centre = centre(&positions);

    let mut polygons: Vec<Polygon> = input
        .mesh
        .surface
        .triangles
        .iter()
        .enumerate()
        .filter_map(|(index, &[a, b, c])| {
            let corners = [positions[a], positions[b], positions[c]];
            let face_centre = centre(&corners);
            let mut normal = (corners[1] - corners[0])
                .cross(&(corners[2] - corners[0]))
                .normalize();
            if normal.dot(&(face_centre - body_centre)) < 0.0 {
                normal = -normal;
            }
            let facing = normal.dot(&(input.camera.position - face_centre).normalize());

            let projected = [project(&corners[0])?, project(&corners[1])?, project(&corners[2])?];
            let tint = input.scale.sample(input.mesh.face_intensity(index));
            Some(Polygon {
                outcome: index + 1,
                points: projected.map(|(x, y, _)| (x, y)),
                depth: projected.iter().map(|p| p.2).sum::<f64>() / 3.0,
                fill: tint.scaled(0.35 + 0.65 * facing.max(0.0)),
                front: facing > 0.0,
            })
        })
        .collect();
    polygons.sort_by(|a, b| b.depth.total_cmp(&a.depth));

    let segments = input
        .mesh
        .edges
        .edges
        .iter()
        .filter_map(|edge| {
            let from = project(&positions[edge.0])?;
            let to = project(&positions[edge.1])?;
            Some([(from.0, from.1), (to.0, to.1)])
        })
        .collect();

    let front: Vec<usize> = polygons.iter().filter(|p| p.front).map(|p| p.outcome).collect();
    let labels = input
        .mesh
        .labels
        .labels
        .iter()
        .filter(|label| front.contains(&label.outcome))
        .filter_map(|label| {
            let (x, y, _) = project(&input.model.transform_point(&label.position))?;
            Some(Label {
                x,
                y,
                text: label.text.clone(),
                highlight: label.outcome == input.highlight,
            })
        })
        .collect();

    Frame {
        polygons,
        segments,
        labels,
    }
}

fn centre(points: &[Point3<f64>]) -> Point3<f64> {
    let sum = points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / points.len().max(1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyroll_core::{Catalog, DieType, RenderStyle};

    fn frame(die: DieType, face: usize) -> Frame {
        let shape = Catalog::global().get(die);
        let style = RenderStyle::default();
        let mesh = MeshData::build(die, &style);
        let camera = Camera::facing(shape, face, 1.5).unwrap();
        let scale = ColorScale::from_style(&style).unwrap();
        build_frame(&FrameInput {
            mesh: &mesh,
            camera: &camera,
            model: Matrix4::identity(),
            scale: &scale,
            width: 300,
            height: 200,
            highlight: face,
        })
    }

    #[test]
    fn test_all_faces_and_edges_projected() {
        for die in DieType::ALL {
            let frame = frame(die, 1);
            assert_eq!(frame.polygons.len(), die.face_count());
            let mesh = MeshData::build(die, &RenderStyle::default());
            assert_eq!(frame.segments.len(), mesh.edges.edges.len());
        }
    }

    #[test]
    fn test_polygons_back_to_front() {
        let frame = frame(DieType::D20, 4);
        assert!(frame.polygons.windows(2).all(|w| w[0].depth >= w[1].depth));
        // The presented face is nearest, so it is painted last.
        assert_eq!(frame.polygons.last().unwrap().outcome, 4);
    }

    #[test]
    fn test_highlighted_label_at_centre() {
        let frame = frame(DieType::D12, 9);
        let label = frame.labels.iter().find(|l| l.highlight).unwrap();
        assert_eq!(label.text, "9");
        assert!((label.x - 150.0).abs() < 1e-6);
        assert!((label.y - 100.0).abs() < 1e-6);
        assert!(frame.labels.iter().filter(|l| l.highlight).count() == 1);
    }

    #[test]
    fn test_only_front_labels() {
        let frame = frame(DieType::D8, 1);
        let front = frame.polygons.iter().filter(|p| p.front).count();
        assert_eq!(frame.labels.len(), front);
        assert!(front < 8);
    }
}
