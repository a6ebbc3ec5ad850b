//! Scene geometry and its mapping into device coordinates.
//!
//! Input coordinates can be anything (projected meters, degrees, pixels). [`Normalizer`] fits the
//! whole point set into a square centered on the origin, scaling both axes by the same factor so
//! the aspect ratio survives.

use log::debug;

use crate::error::{Error, Result};

/// Number of floats emitted per vertex: `x, y, z`.
pub const COMPONENTS: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Point2 { x, y }
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Point2 { x, y }
    }
}

/// An ordered run of points drawn as one primitive (a ring, a fan, a line strip).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Shape {
    pub points: Vec<Point2>,
}

impl Shape {
    pub fn new(points: Vec<Point2>) -> Self {
        Shape { points }
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }
}

impl<P: Into<Point2>> std::iter::FromIterator<P> for Shape {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Shape {
            points: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Axis-aligned bounding box. `max >= min` on both axes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// `None` if there are no points.
    pub fn of<'a, I: IntoIterator<Item = &'a Point2>>(points: I) -> Option<Bounds> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let init = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(points.fold(init, |b, p| Bounds {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    pub fn range_x(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn range_y(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn max_range(&self) -> f64 {
        self.range_x().max(self.range_y())
    }

    /// True when either axis has no usable extent.
    pub fn is_degenerate(&self) -> bool {
        let usable = |r: f64| r.is_finite() && r > 0.0;
        !(usable(self.range_x()) && usable(self.range_y()))
    }
}

/// The first vertex and vertex count of one shape inside the flat buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DrawRange {
    pub first: usize,
    pub count: usize,
}

/// Normalized, interleaved `(x, y, 0.0)` vertices plus the per-shape vertex counts needed to
/// slice them back apart.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Geometry {
    pub vertices: Vec<f32>,
    pub counts: Vec<usize>,
}

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / COMPONENTS
    }

    pub fn draw_ranges(&self) -> Vec<DrawRange> {
        let mut first = 0;
        self.counts
            .iter()
            .map(|&count| {
                let range = DrawRange { first, count };
                first += count;
                range
            })
            .collect()
    }

    /// The `(x, y, z)` triple of vertex `i`.
    pub fn vertex(&self, i: usize) -> [f32; 3] {
        let v = &self.vertices[i * COMPONENTS..(i + 1) * COMPONENTS];
        [v[0], v[1], v[2]]
    }
}

/// Fits point sets into a centered square of side `size`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Normalizer {
    size: f64,
}

impl Default for Normalizer {
    /// Device coordinates: the longer axis spans `[-1, 1]`.
    fn default() -> Self {
        Normalizer { size: 2.0 }
    }
}

impl Normalizer {
    pub fn new(size: f64) -> Self {
        Normalizer { size }
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    /// Maps every point of every shape into the target square.
    ///
    /// The longer axis of the combined bounding box ends up spanning exactly
    /// `[-size / 2, size / 2]`; the shorter one spans a proportionally smaller range around 0.
    /// Points keep their order; shape boundaries are only recorded in [`Geometry::counts`].
    pub fn normalize(&self, shapes: &[Shape]) -> Result<Geometry> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(Error::InvalidTargetSize(self.size));
        }
        // f64::min/max skip NaN, so bad points must be caught before the bounds hide them
        if let Some(p) = shapes
            .iter()
            .flat_map(|s| s.points.iter())
            .find(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(Error::NonFiniteCoordinate { x: p.x, y: p.y });
        }

        let bounds = Bounds::of(shapes.iter().flat_map(|s| s.points.iter()))
            .ok_or(Error::EmptyGeometry)?;
        if bounds.is_degenerate() {
            return Err(Error::DegenerateGeometry {
                range_x: bounds.range_x(),
                range_y: bounds.range_y(),
            });
        }

        let scale = self.size / bounds.max_range();
        let half_x = bounds.range_x() * scale / 2.0;
        let half_y = bounds.range_y() * scale / 2.0;
        debug!(
            "normalizing {} shapes within {:?} (scale {})",
            shapes.len(),
            bounds,
            scale
        );

        let total: usize = shapes.iter().map(Shape::vertex_count).sum();
        let mut vertices = Vec::with_capacity(total * COMPONENTS);
        for point in shapes.iter().flat_map(|s| s.points.iter()) {
            let x = (point.x - bounds.min_x) * scale - half_x;
            let y = (point.y - bounds.min_y) * scale - half_y;
            vertices.extend_from_slice(&[x as f32, y as f32, 0.0]);
        }

        Ok(Geometry {
            vertices,
            counts: shapes.iter().map(Shape::vertex_count).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    const EPSILON: f32 = 1e-5;

    fn shape(points: &[(f64, f64)]) -> Shape {
        points.iter().copied().collect()
    }

    fn assert_close(actual: [f32; 3], expected: [f32; 3]) {
        for (a, e) in actual.iter().zip(&expected) {
            assert!((a - e).abs() < EPSILON, "{:?} != {:?}", actual, expected);
        }
    }

    fn extent(geometry: &Geometry, axis: usize) -> (f32, f32) {
        (0..geometry.vertex_count())
            .map(|i| geometry.vertex(i)[axis])
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }

    #[test]
    fn right_triangle_maps_to_corners() {
        let geometry = Normalizer::default()
            .normalize(&[shape(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)])])
            .unwrap();
        assert_eq!(geometry.vertex_count(), 3);
        assert_close(geometry.vertex(0), [-1.0, -1.0, 0.0]);
        assert_close(geometry.vertex(1), [1.0, -1.0, 0.0]);
        assert_close(geometry.vertex(2), [-1.0, 1.0, 0.0]);
    }

    #[test]
    fn square_fills_device_square() {
        let geometry = Normalizer::default()
            .normalize(&[shape(&[(3.0, 7.0), (53.0, 7.0), (53.0, 57.0), (3.0, 57.0)])])
            .unwrap();
        let (lo, hi) = extent(&geometry, 0);
        assert!((lo + 1.0).abs() < EPSILON && (hi - 1.0).abs() < EPSILON);
        let (lo, hi) = extent(&geometry, 1);
        assert!((lo + 1.0).abs() < EPSILON && (hi - 1.0).abs() < EPSILON);
    }

    #[test]
    fn wide_box_keeps_aspect_ratio() {
        // 40 wide, 10 tall
        let geometry = Normalizer::default()
            .normalize(&[shape(&[(-20.0, 100.0), (20.0, 100.0), (20.0, 110.0)])])
            .unwrap();
        let (lo, hi) = extent(&geometry, 0);
        assert!((lo + 1.0).abs() < EPSILON && (hi - 1.0).abs() < EPSILON);
        let (lo, hi) = extent(&geometry, 1);
        assert!((lo + 0.25).abs() < EPSILON && (hi - 0.25).abs() < EPSILON);
    }

    #[test]
    fn custom_size() {
        let geometry = Normalizer::new(1.0)
            .normalize(&[shape(&[(0.0, 0.0), (4.0, 4.0)])])
            .unwrap();
        assert_close(geometry.vertex(0), [-0.5, -0.5, 0.0]);
        assert_close(geometry.vertex(1), [0.5, 0.5, 0.0]);
    }

    #[test]
    fn renormalizing_device_square_is_a_no_op() {
        let square = shape(&[(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0), (0.25, -0.5)]);
        let once = Normalizer::default().normalize(&[square.clone()]).unwrap();
        for (i, p) in square.points.iter().enumerate() {
            assert_close(once.vertex(i), [p.x as f32, p.y as f32, 0.0]);
        }

        let again: Shape = (0..once.vertex_count())
            .map(|i| {
                let [x, y, _] = once.vertex(i);
                (x as f64, y as f64)
            })
            .collect();
        let twice = Normalizer::default().normalize(&[again]).unwrap();
        for i in 0..once.vertex_count() {
            assert_close(twice.vertex(i), once.vertex(i));
        }
    }

    #[test]
    fn shapes_are_concatenated_in_order() {
        let shapes = vec![
            shape(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]),
            shape(&[(2.0, 2.0)]),
            shape(&[]),
            shape(&[(0.0, 2.0), (2.0, 0.0)]),
        ];
        let geometry = Normalizer::default().normalize(&shapes).unwrap();
        assert_eq!(geometry.counts, vec![3, 1, 0, 2]);
        assert_eq!(
            geometry.draw_ranges(),
            vec![
                DrawRange { first: 0, count: 3 },
                DrawRange { first: 3, count: 1 },
                DrawRange { first: 4, count: 0 },
                DrawRange { first: 4, count: 2 },
            ]
        );
        assert_close(geometry.vertex(3), [1.0, 1.0, 0.0]);
        assert_close(geometry.vertex(5), [1.0, -1.0, 0.0]);
    }

    #[test]
    fn degenerate_input_is_rejected() {
        let cases = vec![
            vec![shape(&[(5.0, 5.0)])],
            vec![shape(&[(5.0, 5.0), (5.0, 5.0), (5.0, 5.0)])],
            vec![shape(&[(0.0, 3.0), (10.0, 3.0)])],
            vec![shape(&[(1.0, 0.0)]), shape(&[(1.0, 9.0)])],
        ];
        for shapes in cases {
            match Normalizer::default().normalize(&shapes) {
                Err(Error::DegenerateGeometry { .. }) => {}
                other => panic!("expected degenerate geometry for {:?}, got {:?}", shapes, other),
            }
        }
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let cases = vec![
            vec![shape(&[(0.0, 0.0), (f64::INFINITY, 1.0)])],
            vec![shape(&[(0.0, 0.0), (10.0, 10.0), (f64::NAN, 5.0)])],
            vec![shape(&[(f64::NAN, 0.0), (0.0, 0.0), (10.0, 10.0)])],
            vec![shape(&[(0.0, 0.0), (10.0, 10.0)]), shape(&[(3.0, f64::NAN)])],
            vec![shape(&[(0.0, f64::NEG_INFINITY), (10.0, 10.0)])],
        ];
        for shapes in cases {
            match Normalizer::default().normalize(&shapes) {
                Err(Error::NonFiniteCoordinate { .. }) => {}
                other => panic!("expected non-finite error for {:?}, got {:?}", shapes, other),
            }
        }
    }

    #[test]
    fn invalid_target_size_is_rejected() {
        let triangle = [shape(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)])];
        for &size in &[f64::NAN, 0.0, -2.0, f64::INFINITY] {
            match Normalizer::new(size).normalize(&triangle) {
                Err(Error::InvalidTargetSize(_)) => {}
                other => panic!("expected invalid size for {}, got {:?}", size, other),
            }
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            Normalizer::default().normalize(&[]),
            Err(Error::EmptyGeometry)
        ));
        assert!(matches!(
            Normalizer::default().normalize(&[Shape::default()]),
            Err(Error::EmptyGeometry)
        ));
    }

    fn arb_shapes() -> impl Strategy<Value = Vec<Shape>> {
        let point = (-1.0e4..1.0e4f64, -1.0e4..1.0e4f64);
        prop::collection::vec(prop::collection::vec(point, 0..12), 1..8)
            .prop_map(|shapes| {
                shapes
                    .into_iter()
                    .map(|s| s.into_iter().collect::<Shape>())
                    .collect::<Vec<_>>()
            })
    }

    proptest! {
        /// Every accepted input lands inside the target square, touches it on the longer axis,
        /// and decomposes back into its shapes.
        #[test]
        fn output_fits_target_square(shapes in arb_shapes()) {
            let bounds = Bounds::of(shapes.iter().flat_map(|s| s.points.iter()));
            prop_assume!(bounds.map_or(false, |b| b.range_x() > 1e-3 && b.range_y() > 1e-3));
            let bounds = bounds.unwrap();

            let geometry = Normalizer::default().normalize(&shapes).unwrap();
            prop_assert_eq!(geometry.counts.iter().sum::<usize>(), geometry.vertex_count());
            let total: usize = shapes.iter().map(Shape::vertex_count).sum();
            prop_assert_eq!(geometry.vertex_count(), total);
            for range in geometry.draw_ranges() {
                prop_assert!(range.first + range.count <= geometry.vertex_count());
            }

            let (x_lo, x_hi) = extent(&geometry, 0);
            let (y_lo, y_hi) = extent(&geometry, 1);
            for v in [x_lo, x_hi, y_lo, y_hi].iter() {
                prop_assert!(v.is_finite() && v.abs() <= 1.0 + 1e-4);
            }
            // centered
            prop_assert!((x_lo + x_hi).abs() < 1e-4);
            prop_assert!((y_lo + y_hi).abs() < 1e-4);
            let longer = if bounds.range_x() >= bounds.range_y() { x_hi } else { y_hi };
            prop_assert!((longer - 1.0).abs() < 1e-4);
        }
    }
}
