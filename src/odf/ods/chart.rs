//! `chart:chart` elements reduced to [`ChartInfo`].

use crate::common::xml::{Element, normalize_whitespace};
use crate::odf::namespaces::{CHART, DR3D, OFFICE, STYLE, TEXT};
use crate::odf::text::visible_text;
use crate::sheet::ChartInfo;
use std::collections::HashMap;

/// Read one chart. `root` is the document the chart lives in; its
/// automatic styles carry the plot and series properties.
pub fn parse_chart(chart: &Element, root: &Element) -> ChartInfo {
    let styles = chart_styles(root);
    let properties = |el: &Element| {
        el.attr(CHART, "style-name")
            .and_then(|name| styles.get(name))
            .and_then(|style| style.child(STYLE, "chart-properties"))
    };

    let plot_area = chart.child(CHART, "plot-area");
    let axis_title = |dimension: &str| {
        plot_area
            .into_iter()
            .flat_map(|area| area.children_named(CHART, "axis"))
            .filter(|axis| axis.attr(CHART, "dimension") == Some(dimension))
            .find_map(|axis| axis.child(CHART, "title"))
            .and_then(title_text)
    };

    let three_d = chart.attr(CHART, "three-dimensional") == Some("true")
        || chart.descendants().any(|e| {
            e.namespace() == DR3D || e.attr(CHART, "three-dimensional") == Some("true")
        })
        || plot_area
            .and_then(properties)
            .is_some_and(|p| p.attr(CHART, "three-dimensional") == Some("true"));

    let data_labels = chart.descendants_named(CHART, "series").any(|series| {
        series.contains(CHART, "data-label")
            || properties(series).is_some_and(shows_labels)
            || series
                .children_named(CHART, "data-point")
                .filter_map(properties)
                .any(shows_labels)
    });

    ChartInfo {
        chart_type: chart.attr(CHART, "class").map(chart_class),
        three_d,
        title: chart.child(CHART, "title").and_then(title_text),
        x_label: axis_title("x"),
        y_label: axis_title("y"),
        data_labels,
    }
}

/// `chart:bar` gives "bar"; Calc's circle and ring become pie and doughnut.
fn chart_class(class: &str) -> String {
    let class = class.rsplit(':').next().unwrap_or(class);
    match class {
        "circle" => "pie".to_string(),
        "ring" => "doughnut".to_string(),
        other => other.to_lowercase(),
    }
}

fn shows_labels(properties: &Element) -> bool {
    properties
        .attr(CHART, "data-label-number")
        .is_some_and(|n| n != "none")
        || properties.attr(CHART, "display-label") == Some("true")
        || properties.attr(CHART, "data-label-text") == Some("true")
}

fn title_text(title: &Element) -> Option<String> {
    let text = title
        .descendants_named(TEXT, "p")
        .map(visible_text)
        .collect::<Vec<_>>()
        .join(" ");
    let text = normalize_whitespace(&text);
    (!text.is_empty()).then_some(text)
}

fn chart_styles(root: &Element) -> HashMap<&str, &Element> {
    root.child(OFFICE, "automatic-styles")
        .into_iter()
        .flat_map(|s| s.children_named(STYLE, "style"))
        .filter_map(|s| s.attr(STYLE, "name").map(|name| (name, s)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART_DOC: &str = r#"<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" xmlns:chart="urn:oasis:names:tc:opendocument:xmlns:chart:1.0">
  <office:automatic-styles>
    <style:style style:name="ch3" style:family="chart"><style:chart-properties chart:three-dimensional="false"/></style:style>
    <style:style style:name="ch5" style:family="chart"><style:chart-properties chart:data-label-number="value"/></style:style>
  </office:automatic-styles>
  <office:body><office:chart>
    <chart:chart chart:class="chart:circle">
      <chart:title><text:p>Výška  studentů</text:p></chart:title>
      <chart:plot-area chart:style-name="ch3">
        <chart:axis chart:dimension="x"><chart:title><text:p>Jméno</text:p></chart:title></chart:axis>
        <chart:axis chart:dimension="y"><chart:title><text:p>cm</text:p></chart:title></chart:axis>
        <chart:series chart:style-name="ch5"/>
      </chart:plot-area>
    </chart:chart>
  </office:chart></office:body>
</office:document-content>"#;

    #[test]
    fn test_chart_properties() {
        let root = Element::parse(CHART_DOC.as_bytes()).unwrap();
        let chart = root.find(CHART, "chart").unwrap();
        let info = parse_chart(chart, &root);
        assert_eq!(info.chart_type.as_deref(), Some("pie"));
        assert!(!info.three_d);
        assert_eq!(info.title.as_deref(), Some("Výška studentů"));
        assert_eq!(info.x_label.as_deref(), Some("Jméno"));
        assert_eq!(info.y_label.as_deref(), Some("cm"));
        assert!(info.data_labels);
    }

    #[test]
    fn test_chart_class_names() {
        assert_eq!(chart_class("chart:bar"), "bar");
        assert_eq!(chart_class("chart:ring"), "doughnut");
        assert_eq!(chart_class("line"), "line");
    }
}
