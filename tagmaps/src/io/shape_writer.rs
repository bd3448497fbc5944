use std::io::Write;
use std::path::{Path, PathBuf};

use geo::Polygon;
use serde::{Deserialize, Serialize};
use tagmaps_core::compiler::{OutputShape, TagMapsOutput};
use tagmaps_core::util::UtmProjection;
use wkt::ToWkt;

use super::OutputFormat;
use crate::model::TagMapsCliError;

const SHAPES_FILENAME: &str = "tagmaps_shapes";
const SUMMARY_FILENAME: &str = "tagmaps_summary.json";

/// attributes of a written shape. the geometry column is only filled for CSV output,
/// GeoJSON carries the geometry on the feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,
    pub join_count: usize,
    pub views: u64,
    pub user_count: usize,
    pub item_name: String,
    pub item_type: String,
    pub item_global_count: usize,
    pub is_most_important: u8,
    pub weight_v1: f64,
    pub weight_v2: f64,
    pub weight_v3: f64,
    pub is_emoji: u8,
    pub shape_type: String,
}

impl ShapeRow {
    fn new(shape: &OutputShape, geometry: Option<String>) -> ShapeRow {
        ShapeRow {
            geometry,
            join_count: shape.join_count,
            views: shape.views,
            user_count: shape.user_count,
            item_name: shape.item_name.clone(),
            item_type: shape.item_type.to_string(),
            item_global_count: shape.item_global_count,
            is_most_important: shape.is_most_important as u8,
            weight_v1: shape.weight_v1,
            weight_v2: shape.weight_v2,
            weight_v3: shape.weight_v3,
            is_emoji: shape.is_emoji as u8,
            shape_type: shape.strategy.to_string(),
        }
    }
}

fn output_polygon(shape: &OutputShape, projection: Option<&UtmProjection>) -> Polygon<f64> {
    match projection {
        Some(p) => p.unproject_polygon(&shape.polygon),
        None => shape.polygon.clone(),
    }
}

/// writes one CSV row per shape with the polygon as WKT. with a projection the polygons
/// are converted back to WGS84 longitude/latitude.
pub fn write_shapes_csv<W: Write>(
    shapes: &[OutputShape],
    projection: Option<&UtmProjection>,
    writer: W,
) -> Result<(), TagMapsCliError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for shape in shapes.iter() {
        let wkt = output_polygon(shape, projection).to_wkt().to_string();
        csv_writer.serialize(ShapeRow::new(shape, Some(wkt)))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// a GeoJSON feature collection with one polygon feature per shape
pub fn shape_feature_collection(
    shapes: &[OutputShape],
    projection: Option<&UtmProjection>,
) -> Result<geojson::FeatureCollection, TagMapsCliError> {
    let features = shapes
        .iter()
        .map(|shape| {
            let polygon = output_polygon(shape, projection);
            let geometry = geojson::Geometry::from(&geo::Geometry::Polygon(polygon));
            let properties = match serde_json::to_value(ShapeRow::new(shape, None))? {
                serde_json::Value::Object(map) => Some(map),
                _ => None,
            };
            Ok(geojson::Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties,
                foreign_members: None,
            })
        })
        .collect::<Result<Vec<_>, TagMapsCliError>>()?;
    Ok(geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// writes the shapes and the run summary into the output directory and returns the path
/// of the shape file
pub fn write_output(
    output: &TagMapsOutput,
    directory: &Path,
    format: OutputFormat,
    wgs84: bool,
) -> Result<PathBuf, TagMapsCliError> {
    std::fs::create_dir_all(directory)?;
    let projection = wgs84.then_some(&output.projection);
    let shapes_path = directory.join(format!("{SHAPES_FILENAME}.{}", format.extension()));
    let file = std::fs::File::create(&shapes_path)?;
    match format {
        OutputFormat::Csv => write_shapes_csv(&output.shapes, projection, file)?,
        OutputFormat::GeoJson => {
            let collection = shape_feature_collection(&output.shapes, projection)?;
            serde_json::to_writer(file, &collection)?;
        }
    }
    let summary_file = std::fs::File::create(directory.join(SUMMARY_FILENAME))?;
    serde_json::to_writer_pretty(summary_file, &output.summary)?;
    log::info!(
        "wrote {} shapes to {}",
        output.shapes.len(),
        shapes_path.display()
    );
    Ok(shapes_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use tagmaps_core::model::{ItemType, LatLng, RunSummary, ShapeStrategy};

    fn projection() -> UtmProjection {
        UtmProjection::from_epsg(32633).unwrap()
    }

    fn shape() -> OutputShape {
        let p = projection();
        let corners = [
            LatLng::new(52.50, 13.40),
            LatLng::new(52.50, 13.41),
            LatLng::new(52.51, 13.41),
            LatLng::new(52.50, 13.40),
        ];
        let coords = corners.iter().map(|c| p.project(c)).collect::<Vec<Coord<f64>>>();
        OutputShape {
            polygon: Polygon::new(coords.into(), vec![]),
            join_count: 7,
            views: 70,
            user_count: 5,
            item_name: String::from("spree"),
            item_type: ItemType::Tags,
            item_global_count: 11,
            is_most_important: true,
            weight_v1: 1000.0,
            weight_v2: 1000.0,
            weight_v3: 1.0,
            is_emoji: false,
            strategy: ShapeStrategy::BufferedHull,
        }
    }

    #[test]
    fn test_csv_rows() {
        let mut buffer = vec![];
        write_shapes_csv(&[shape()], Some(&projection()), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("geometry,join_count,views"));
        let row = lines.next().unwrap();
        assert!(row.contains("POLYGON((13."));
        assert!(row.contains("spree"));
        assert!(row.contains("between 2 and 5 points"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_projected_output_keeps_meters() {
        let mut buffer = vec![];
        write_shapes_csv(&[shape()], None, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("POLYGON((3"));
    }

    #[test]
    fn test_feature_collection() {
        let collection = shape_feature_collection(&[shape()], Some(&projection())).unwrap();
        assert_eq!(collection.features.len(), 1);
        let feature = &collection.features[0];
        let properties = feature.properties.as_ref().unwrap();
        assert_eq!(properties.get("item_name"), Some(&serde_json::json!("spree")));
        assert_eq!(properties.get("is_most_important"), Some(&serde_json::json!(1)));
        assert!(properties.get("geometry").is_none());
        match &feature.geometry.as_ref().unwrap().value {
            geojson::Value::Polygon(rings) => {
                let first = &rings[0][0];
                assert!((first[0] - 13.40).abs() < 1e-6);
                assert!((first[1] - 52.50).abs() < 1e-6);
            }
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_write_output_files() {
        let directory = std::env::temp_dir().join(format!("tagmaps-writer-{}", std::process::id()));
        let output = TagMapsOutput {
            shapes: vec![shape()],
            summary: RunSummary {
                total_posts: 7,
                total_shapes: 1,
                ..Default::default()
            },
            projection: projection(),
            cut_distance: 50.0,
            aborted: false,
        };
        let path = write_output(&output, &directory, OutputFormat::GeoJson, true).unwrap();
        assert!(path.ends_with("tagmaps_shapes.geojson"));
        let summary: RunSummary = serde_json::from_reader(
            std::fs::File::open(directory.join(SUMMARY_FILENAME)).unwrap(),
        )
        .unwrap();
        assert_eq!(summary.total_posts, 7);
        std::fs::remove_dir_all(&directory).unwrap();
    }
}
