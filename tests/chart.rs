use std::fs;

use growth_standards::chart::{ChartRenderer, ChartSpec, PlottersRenderer};
use growth_standards::reference::{Indicator, ReferenceTable};
use growth_standards::Sex;

#[test]
fn height_chart_as_png() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let output = tmp.path().join("plot.png");
    let table = ReferenceTable::builtin(Indicator::HeightForAge, Sex::Male);

    PlottersRenderer::default()
        .render(&ChartSpec::new(&table, 12, 150.0), &output)
        .expect("render png");

    let bytes = fs::read(&output).expect("read png");
    assert!(!bytes.is_empty());
    assert!(bytes.starts_with(b"\x89PNG"));
}

#[test]
fn bmi_chart_as_svg() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let output = tmp.path().join("plot.svg");
    let table = ReferenceTable::builtin(Indicator::BmiForAge, Sex::Female);

    PlottersRenderer { width: 800, height: 480 }
        .render(&ChartSpec::new(&table, 15, 21.48), &output)
        .expect("render svg");

    let svg = fs::read_to_string(&output).expect("read svg");
    assert!(!svg.is_empty());
    assert!(svg.trim_start().starts_with("<svg"));
}

#[test]
fn missing_directory_is_an_error() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let output = tmp.path().join("no-such-dir").join("plot.svg");
    let table = ReferenceTable::builtin(Indicator::HeightForAge, Sex::Female);

    let err = PlottersRenderer::default()
        .render(&ChartSpec::new(&table, 8, 128.0), &output)
        .unwrap_err();
    assert!(err.to_string().starts_with("Failed to render"));
}
