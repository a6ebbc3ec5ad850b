//! Turning ESRI shapefile records into [`Shape`]s.
//!
//! Parsing is left to the `shapefile` crate. Each polygon ring, polyline part and multipoint
//! record becomes its own shape; measures and Z values are dropped.

use std::path::Path;

use log::{debug, info, warn};
use shapefile::Shape as Record;

use crate::error::Result;
use crate::geometry::{Point2, Shape};

/// Reads every record of the `.shp` file at `path`.
pub fn load_shapefile<P: AsRef<Path>>(path: P) -> Result<Vec<Shape>> {
    let path = path.as_ref();
    let records = shapefile::read_shapes(path)?;
    let shapes = shapes_from_records(&records);
    info!(
        "loaded {} shapes from {} records in {}",
        shapes.len(),
        records.len(),
        path.display()
    );
    Ok(shapes)
}

pub fn shapes_from_records(records: &[Record]) -> Vec<Shape> {
    let mut shapes = Vec::new();
    for (i, record) in records.iter().enumerate() {
        let before = shapes.len();
        match record {
            Record::NullShape => {}
            Record::Point(p) => shapes.push(Shape::new(vec![Point2::new(p.x, p.y)])),
            Record::PointM(p) => shapes.push(Shape::new(vec![Point2::new(p.x, p.y)])),
            Record::PointZ(p) => shapes.push(Shape::new(vec![Point2::new(p.x, p.y)])),
            Record::Multipoint(m) => push_part(&mut shapes, m.points().iter().map(|p| (p.x, p.y))),
            Record::MultipointM(m) => push_part(&mut shapes, m.points().iter().map(|p| (p.x, p.y))),
            Record::MultipointZ(m) => push_part(&mut shapes, m.points().iter().map(|p| (p.x, p.y))),
            Record::Polyline(l) => {
                for part in l.parts() {
                    push_part(&mut shapes, part.iter().map(|p| (p.x, p.y)));
                }
            }
            Record::PolylineM(l) => {
                for part in l.parts() {
                    push_part(&mut shapes, part.iter().map(|p| (p.x, p.y)));
                }
            }
            Record::PolylineZ(l) => {
                for part in l.parts() {
                    push_part(&mut shapes, part.iter().map(|p| (p.x, p.y)));
                }
            }
            Record::Polygon(poly) => {
                for ring in poly.rings() {
                    push_part(&mut shapes, ring.points().iter().map(|p| (p.x, p.y)));
                }
            }
            Record::PolygonM(poly) => {
                for ring in poly.rings() {
                    push_part(&mut shapes, ring.points().iter().map(|p| (p.x, p.y)));
                }
            }
            Record::PolygonZ(poly) => {
                for ring in poly.rings() {
                    push_part(&mut shapes, ring.points().iter().map(|p| (p.x, p.y)));
                }
            }
            _ => warn!("skipping unsupported record {}", i),
        }
        debug!("record {} -> {} shapes", i, shapes.len() - before);
    }
    shapes
}

fn push_part<I: Iterator<Item = (f64, f64)>>(shapes: &mut Vec<Shape>, points: I) {
    let shape: Shape = points.collect();
    if shape.vertex_count() > 0 {
        shapes.push(shape);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use shapefile::{
        MultipointZ, Point, PointM, PointZ, Polygon, PolygonM, PolygonRing, Polyline,
    };

    #[test]
    fn polyline_parts_become_shapes() {
        let line = Polyline::with_parts(vec![
            vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
            vec![Point::new(2.0, 2.0), Point::new(3.0, 2.0), Point::new(4.0, 0.0)],
        ]);
        let shapes = shapes_from_records(&[Record::Polyline(line), Record::NullShape]);
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].points, vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]);
        assert_eq!(shapes[1].vertex_count(), 3);
    }

    #[test]
    fn polygon_rings_become_shapes() {
        let ring = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        let polygon = Polygon::new(PolygonRing::Outer(ring));
        let shapes = shapes_from_records(&[
            Record::Polygon(polygon),
            Record::Point(Point::new(5.0, 5.0)),
        ]);
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].vertex_count(), 5);
        assert_eq!(shapes[1].points, vec![Point2::new(5.0, 5.0)]);
    }

    #[test]
    fn empty_parts_are_skipped() {
        let mut shapes = vec![Shape::new(vec![Point2::new(1.0, 2.0)])];
        push_part(&mut shapes, std::iter::empty());
        assert_eq!(shapes.len(), 1);
        push_part(&mut shapes, vec![(3.0, 4.0), (5.0, 6.0)].into_iter());
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[1].points, vec![Point2::new(3.0, 4.0), Point2::new(5.0, 6.0)]);
    }

    #[test]
    fn multipoint_z_drops_z_and_measure() {
        let multipoint = MultipointZ::new(vec![
            PointZ::new(1.0, 2.0, 30.0, 0.5),
            PointZ::new(-4.0, 8.0, 31.0, 0.5),
        ]);
        let shapes = shapes_from_records(&[Record::MultipointZ(multipoint)]);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].points, vec![Point2::new(1.0, 2.0), Point2::new(-4.0, 8.0)]);
    }

    #[test]
    fn polygon_m_rings_become_shapes() {
        let ring = vec![
            PointM::new(0.0, 0.0, 1.0),
            PointM::new(0.0, 2.0, 1.0),
            PointM::new(2.0, 2.0, 1.0),
            PointM::new(2.0, 0.0, 1.0),
            PointM::new(0.0, 0.0, 1.0),
        ];
        let polygon = PolygonM::new(PolygonRing::Outer(ring));
        let shapes = shapes_from_records(&[Record::PolygonM(polygon), Record::NullShape]);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].vertex_count(), 5);
        assert!(shapes[0].points.contains(&Point2::new(2.0, 2.0)));
    }

    #[test]
    fn missing_file_is_an_error() {
        let missing = std::env::temp_dir().join("mini_gl_shapes_missing.shp");
        assert!(matches!(
            load_shapefile(&missing),
            Err(crate::Error::Shapefile(_))
        ));
    }
}
