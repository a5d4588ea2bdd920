//! VTK XML PolyData output of traced streamlines

use ctor::ctor;
use streamline_core::{
    trace_streamline, write_vtp_file, IntegrationConfig, PolylineSink, Streamline,
    SyntheticField, Vec3, VtpWriter,
};

#[ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn render(streamline: &Streamline) -> String {
    let mut writer = VtpWriter::new(Vec::new());
    writer.write_streamline(streamline).unwrap();
    String::from_utf8(writer.into_inner()).unwrap()
}

/// Whitespace-separated values of the `DataArray` whose opening tag contains `marker`
fn data_array<'a>(document: &'a str, marker: &str) -> Vec<&'a str> {
    let start = document.find(marker).unwrap();
    let body_start = start + document[start..].find('>').unwrap() + 1;
    let body_end = body_start + document[body_start..].find("</DataArray>").unwrap();
    document[body_start..body_end].split_whitespace().collect()
}

fn short_line() -> Streamline {
    let grid = SyntheticField::Uniform {
        velocity: Vec3::new(1.0, 0.0, 0.0),
    }
    .build_unit_cube(11)
    .unwrap();
    trace_streamline(
        &grid,
        &Vec3::new(0.5, 0.25, 0.75),
        IntegrationConfig::new(0.1, 3, 1e-9),
    )
    .unwrap()
}

#[test]
fn writes_one_polyline_through_every_point() {
    let line = short_line();
    assert_eq!(line.len(), 7);
    let document = render(&line);

    assert!(document.starts_with(r#"<?xml version="1.0"?>"#));
    assert!(document.contains(r#"type="PolyData""#));
    assert!(document.contains(r#"NumberOfPoints="7""#));
    assert!(document.contains(r#"NumberOfLines="1""#));

    let coords = data_array(&document, r#"NumberOfComponents="3""#);
    assert_eq!(coords.len(), 3 * 7);
    let xs: Vec<f64> = coords
        .chunks(3)
        .map(|xyz| xyz[0].parse().unwrap())
        .collect();
    for (x, p) in xs.iter().zip(line.points()) {
        assert_eq!(*x, p.x);
    }

    let connectivity = data_array(&document, r#"Name="connectivity""#);
    assert_eq!(connectivity, vec!["0", "1", "2", "3", "4", "5", "6"]);

    let offsets = data_array(&document, r#"Name="offsets""#);
    assert_eq!(offsets, vec!["7"]);
}

#[test]
fn step_scalars_are_zero_at_seed() {
    let line = short_line();
    let document = render(&line);

    let steps = data_array(&document, r#"Name="step""#);
    assert_eq!(steps, vec!["-3", "-2", "-1", "0", "1", "2", "3"]);
    assert_eq!(steps[line.seed_index()], "0");
}

#[test]
fn degenerate_streamline_writes_lone_point() {
    // Zero field stalls immediately in both directions
    let grid = SyntheticField::Uniform {
        velocity: Vec3::zeros(),
    }
    .build_unit_cube(5)
    .unwrap();
    let line = trace_streamline(
        &grid,
        &Vec3::new(0.5, 0.5, 0.5),
        IntegrationConfig::default(),
    )
    .unwrap();
    assert!(line.is_degenerate());

    let document = render(&line);
    assert!(document.contains(r#"NumberOfPoints="1""#));
    assert!(document.contains(r#"NumberOfLines="0""#));
    assert_eq!(data_array(&document, r#"NumberOfComponents="3""#).len(), 3);
    assert!(data_array(&document, r#"Name="connectivity""#).is_empty());
    assert!(data_array(&document, r#"Name="offsets""#).is_empty());
}

#[test]
fn file_output_matches_in_memory_document() {
    let line = short_line();
    let path = std::env::temp_dir().join(format!("streamline-{}.vtp", std::process::id()));

    write_vtp_file(&path, &line).unwrap();
    let on_disk = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(on_disk, render(&line));
}

#[test]
fn unwritable_path_is_an_error() {
    let line = short_line();
    let path = std::env::temp_dir()
        .join("streamline-missing-dir")
        .join("nested")
        .join("out.vtp");

    assert!(write_vtp_file(&path, &line).is_err());
}
