/// The fixed catalog of polyhedral dice
use std::collections::BTreeSet;
use std::f64::consts::PI;

use lazy_static::lazy_static;
use nalgebra::{Point3, Vector3};
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::dice::DieType;
use crate::error::{DiceError, Result};

/// Golden ratio
pub const PHI: f64 = 1.618_033_988_749_895;

/// An undirected edge stored as its canonical `(min, max)` vertex pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Edge(pub usize, pub usize);

impl Edge {
    pub fn new(a: usize, b: usize) -> Self {
        Edge(a.min(b), a.max(b))
    }

    pub fn contains_vertex(&self, vertex: usize) -> bool {
        self.0 == vertex || self.1 == vertex
    }
}

/// A die shape. Face `n - 1` is the visual face for rolled outcome `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyhedron {
    die: DieType,
    vertices: Vec<Point3<f64>>,
    faces: Vec<[usize; 3]>,
    centroid: Point3<f64>,
    face_centroids: Vec<Point3<f64>>,
}

impl Polyhedron {
    fn new(die: DieType, vertices: Vec<Point3<f64>>, faces: Vec<[usize; 3]>) -> Self {
        debug_assert_eq!(faces.len(), die.face_count());

        let centroid = mean(vertices.iter());
        let face_centroids = faces
            .iter()
            .map(|face| mean(face.iter().map(|&i| &vertices[i])))
            .collect();

        Self {
            die,
            vertices,
            faces,
            centroid,
            face_centroids,
        }
    }

    pub fn die(&self) -> DieType {
        self.die
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Mean of all vertices.
    pub fn centroid(&self) -> Point3<f64> {
        self.centroid
    }

    /// Mean of each face's three vertices, in face order.
    pub fn face_centroids(&self) -> &[Point3<f64>] {
        &self.face_centroids
    }

    /// Vertex indices of the face showing `outcome` (1-based).
    pub fn face(&self, outcome: usize) -> Result<[usize; 3]> {
        self.check_outcome(outcome)?;
        Ok(self.faces[outcome - 1])
    }

    /// Fails with [`DiceError::InvalidFaceIndex`] unless `outcome` is in `[1, face_count]`.
    pub fn check_outcome(&self, outcome: usize) -> Result<()> {
        if (1..=self.face_count()).contains(&outcome) {
            Ok(())
        } else {
            Err(DiceError::InvalidFaceIndex {
                die: self.die,
                face: outcome,
                face_count: self.face_count(),
            })
        }
    }

    /// The three corner positions of face `index` (0-based).
    pub fn face_positions(&self, index: usize) -> [Point3<f64>; 3] {
        let [a, b, c] = self.faces[index];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    /// Unit normal of face `index` (0-based), pointing away from the body centroid.
    ///
    /// Face winding is not consistent across the catalog, so the sign comes
    /// from the centroid rather than from the vertex order.
    pub fn face_normal(&self, index: usize) -> Vector3<f64> {
        let [v0, v1, v2] = self.face_positions(index);
        let normal = (v1 - v0).cross(&(v2 - v0)).normalize();
        if normal.dot(&(self.face_centroids[index] - self.centroid)) < 0.0 {
            -normal
        } else {
            normal
        }
    }

    /// Every edge of every face, deduplicated and sorted.
    pub fn edges(&self) -> Vec<Edge> {
        let edges: BTreeSet<Edge> = self
            .faces
            .iter()
            .flat_map(|&[a, b, c]| [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)])
            .collect();
        edges.into_iter().collect()
    }

    /// Largest distance from the body centroid to a vertex.
    pub fn radius(&self) -> f64 {
        self.vertices
            .iter()
            .map(|v| (v - self.centroid).norm())
            .fold(0.0, f64::max)
    }
}

fn mean<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Point3<f64> {
    let (sum, count) = points.fold((Vector3::zeros(), 0usize), |(sum, count), p| {
        (sum + p.coords, count + 1)
    });
    Point3::from(sum / count as f64)
}

/// Immutable registry holding one [`Polyhedron`] per [`DieType`].
#[derive(Debug, Clone)]
pub struct Catalog {
    shapes: Vec<Polyhedron>,
}

lazy_static! {
    static ref GLOBAL_CATALOG: Catalog = Catalog::new();
}

impl Catalog {
    /// Build a fresh catalog. Most callers want [`Catalog::global`].
    pub fn new() -> Self {
        let shapes: Vec<Polyhedron> = DieType::iter().map(build_shape).collect();
        log::debug!("built dice catalog with {} shapes", shapes.len());
        Self { shapes }
    }

    /// The process-wide catalog, built on first use.
    pub fn global() -> &'static Catalog {
        &GLOBAL_CATALOG
    }

    pub fn get(&self, die: DieType) -> &Polyhedron {
        &self.shapes[die.index()]
    }

    /// Resolve a die-type identifier such as `"d20"`.
    pub fn lookup(&self, id: &str) -> Result<&Polyhedron> {
        let die: DieType = id.parse()?;
        Ok(self.get(die))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Polyhedron> {
        self.shapes.iter()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

fn build_shape(die: DieType) -> Polyhedron {
    let (vertices, faces) = match die {
        DieType::D4 => tetrahedron(),
        DieType::D6 => bipyramid(3, false),
        DieType::D8 => octahedron(),
        DieType::D10 => bipyramid(5, true),
        DieType::D12 => bipyramid(6, false),
        DieType::D20 => icosahedron(),
    };
    Polyhedron::new(die, vertices, faces)
}

fn tetrahedron() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices = [
        [1.0, 1.0, 1.0],
        [1.0, -1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, 1.0],
    ]
    .iter()
    .map(|&[x, y, z]| Point3::new(x, y, z) * 1.5)
    .collect();
    let faces = vec![[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]];
    (vertices, faces)
}

fn octahedron() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices = vec![
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(-1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, -1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(0.0, 0.0, -1.0),
    ];
    let faces = vec![
        [0, 2, 4],
        [0, 4, 3],
        [0, 3, 5],
        [0, 5, 2],
        [1, 4, 2],
        [1, 3, 4],
        [1, 5, 3],
        [1, 2, 5],
    ];
    (vertices, faces)
}

/// Double pyramid over a ring of `ring` unit-circle points in the z = 0 plane.
///
/// Outcomes `1..=ring` are the upper faces, the rest the lower ones. Vertex
/// storage order drives the intensity gradient, so `apexes_first` selects
/// whether the two apexes precede or follow the ring.
fn bipyramid(ring: usize, apexes_first: bool) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let apexes = [Point3::new(0.0, 0.0, 1.0), Point3::new(0.0, 0.0, -1.0)];
    let circle = (0..ring).map(|i| {
        let angle = 2.0 * PI * i as f64 / ring as f64;
        Point3::new(angle.cos(), angle.sin(), 0.0)
    });

    let (vertices, top, first_ring): (Vec<Point3<f64>>, usize, usize) = if apexes_first {
        (apexes.into_iter().chain(circle).collect(), 0, 2)
    } else {
        (circle.chain(apexes).collect(), ring, 0)
    };
    let bottom = top + 1;
    let at = |i: usize| first_ring + i % ring;

    let upper = (0..ring).map(|i| [top, at(i), at(i + 1)]);
    let lower = (0..ring).map(|i| [bottom, at(i + 1), at(i)]);
    (vertices, upper.chain(lower).collect())
}

fn icosahedron() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let scale = (1.0 + PHI * PHI).sqrt();
    let vertices = [
        [-1.0, PHI, 0.0],
        [1.0, PHI, 0.0],
        [-1.0, -PHI, 0.0],
        [1.0, -PHI, 0.0],
        [0.0, -1.0, PHI],
        [0.0, 1.0, PHI],
        [0.0, -1.0, -PHI],
        [0.0, 1.0, -PHI],
        [PHI, 0.0, -1.0],
        [PHI, 0.0, 1.0],
        [-PHI, 0.0, -1.0],
        [-PHI, 0.0, 1.0],
    ]
    .iter()
    .map(|&[x, y, z]| Point3::new(x, y, z) / scale)
    .collect();
    let faces = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn test_face_count_matches_die() {
        let catalog = Catalog::new();
        for die in DieType::ALL {
            let shape = catalog.get(die);
            assert_eq!(shape.die(), die);
            assert_eq!(shape.faces().len(), die.face_count());
        }
    }

    #[test]
    fn test_faces_are_distinct_triangles() {
        for shape in Catalog::global().iter() {
            let mut seen = HashSet::new();
            for &[a, b, c] in shape.faces() {
                assert!(a != b && b != c && a != c, "{} has a repeated vertex", shape.die());
                let mut key = [a, b, c];
                key.sort_unstable();
                assert!(seen.insert(key), "{} repeats face {:?}", shape.die(), key);
            }
        }
    }

    #[test]
    fn test_faces_are_non_degenerate() {
        for shape in Catalog::global().iter() {
            for index in 0..shape.face_count() {
                let [v0, v1, v2] = shape.face_positions(index);
                let area = (v1 - v0).cross(&(v2 - v0)).norm() / 2.0;
                assert!(area > 0.1, "{} face {} is degenerate", shape.die(), index + 1);
            }
        }
    }

    #[test]
    fn test_surface_is_closed() {
        // Each edge of a closed triangulated surface borders exactly two faces.
        for shape in Catalog::global().iter() {
            let mut uses: HashMap<Edge, usize> = HashMap::new();
            for &[a, b, c] in shape.faces() {
                for edge in [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)] {
                    *uses.entry(edge).or_default() += 1;
                }
            }
            for (edge, count) in uses {
                assert_eq!(count, 2, "{} edge {:?}", shape.die(), edge);
            }
        }
    }

    #[test]
    fn test_euler_characteristic() {
        for shape in Catalog::global().iter() {
            let v = shape.vertices().len() as i64;
            let e = shape.edges().len() as i64;
            let f = shape.face_count() as i64;
            assert_eq!(v - e + f, 2, "{}", shape.die());
        }
    }

    #[test]
    fn test_centroids_are_means() {
        for shape in Catalog::global().iter() {
            let n = shape.vertices().len() as f64;
            let sum = shape
                .vertices()
                .iter()
                .fold(Vector3::zeros(), |acc, v| acc + v.coords);
            assert_relative_eq!(shape.centroid().coords, sum / n, epsilon = 1e-9);

            for (index, &[a, b, c]) in shape.faces().iter().enumerate() {
                let v = shape.vertices();
                let expected = (v[a].coords + v[b].coords + v[c].coords) / 3.0;
                assert_relative_eq!(shape.face_centroids()[index].coords, expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_face_centroids_are_distinct() {
        for shape in Catalog::global().iter() {
            let centroids = shape.face_centroids();
            for i in 0..centroids.len() {
                for j in i + 1..centroids.len() {
                    assert!(
                        (centroids[i] - centroids[j]).norm() > 1e-6,
                        "{} faces {} and {} share a centroid",
                        shape.die(),
                        i + 1,
                        j + 1
                    );
                }
            }
        }
    }

    #[test]
    fn test_bipyramid_faces_use_adjacent_ring_vertices() {
        for (die, ring) in [(DieType::D6, 3), (DieType::D10, 5), (DieType::D12, 6)] {
            let shape = Catalog::global().get(die);
            let v = shape.vertices();
            assert_eq!(v.len(), ring + 2);

            for (index, &[apex, a, b]) in shape.faces().iter().enumerate() {
                let expected_z = if index < ring { 1.0 } else { -1.0 };
                assert_relative_eq!(v[apex].z, expected_z);
                assert_relative_eq!(v[a].z, 0.0);
                assert_relative_eq!(v[b].z, 0.0);

                // Adjacent ring points are one ring step apart.
                let step = 2.0 * (PI / ring as f64).sin();
                assert_relative_eq!((v[a] - v[b]).norm(), step, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_d10_lists_apexes_first() {
        let shape = Catalog::global().get(DieType::D10);
        assert_eq!(shape.vertices()[0], Point3::new(0.0, 0.0, 1.0));
        assert_eq!(shape.vertices()[1], Point3::new(0.0, 0.0, -1.0));
        assert_eq!(shape.faces()[0], [0, 2, 3]);
        assert_eq!(shape.faces()[4], [0, 6, 2]);
        assert_eq!(shape.faces()[5], [1, 3, 2]);
    }

    #[test]
    fn test_d12_upper_and_lower_rings() {
        let shape = Catalog::global().get(DieType::D12);
        assert_eq!(shape.faces()[0], [6, 0, 1]);
        assert_eq!(shape.faces()[5], [6, 5, 0]);
        assert_eq!(shape.faces()[6], [7, 1, 0]);
        assert_eq!(shape.faces()[11], [7, 0, 5]);
    }

    #[test]
    fn test_icosahedron_vertices_on_unit_sphere() {
        let shape = Catalog::global().get(DieType::D20);
        for v in shape.vertices() {
            assert_relative_eq!(v.coords.norm(), 1.0, epsilon = 1e-12);
        }
        assert_relative_eq!(shape.radius(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_face_normals_point_outward() {
        for shape in Catalog::global().iter() {
            for index in 0..shape.face_count() {
                let outward = shape.face_centroids()[index] - shape.centroid();
                let normal = shape.face_normal(index);
                assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-12);
                assert!(normal.dot(&outward) > 0.0);
            }
        }
    }

    #[test]
    fn test_face_by_outcome() {
        let shape = Catalog::global().get(DieType::D8);
        assert_eq!(shape.face(1).unwrap(), [0, 2, 4]);
        assert_eq!(shape.face(8).unwrap(), [1, 2, 5]);
        assert!(matches!(
            shape.face(0),
            Err(DiceError::InvalidFaceIndex { face: 0, face_count: 8, .. })
        ));
        assert!(matches!(shape.face(9), Err(DiceError::InvalidFaceIndex { face: 9, .. })));
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::global();
        assert_eq!(catalog.lookup("d20").unwrap().die(), DieType::D20);
        assert!(matches!(catalog.lookup("d7"), Err(DiceError::UnknownDieType(id)) if id == "d7"));
    }

    #[test]
    fn test_edge_is_canonical() {
        assert_eq!(Edge::new(5, 2), Edge(2, 5));
        assert_eq!(Edge::new(2, 5), Edge::new(5, 2));
        assert!(Edge::new(3, 1).contains_vertex(3));
        assert!(!Edge::new(3, 1).contains_vertex(2));
    }
}
