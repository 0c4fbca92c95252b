//! DrawingML chart parts (`xl/charts/chartN.xml`) reduced to [`ChartInfo`].

use crate::common::xml::{Element, normalize_whitespace};
use crate::ooxml::namespaces::{A, C};
use crate::sheet::ChartInfo;

/// Read the first plot of a `<c:chartSpace>`.
pub fn parse_chart(root: &Element) -> ChartInfo {
    let Some(chart) = root.child(C, "chart") else {
        return ChartInfo::default();
    };
    let plot_area = chart.child(C, "plotArea");
    let plot = plot_area.and_then(|area| {
        area.elements()
            .find(|e| e.namespace() == C && e.local_name().ends_with("Chart"))
    });

    let tag = plot.map(|p| p.local_name().to_lowercase());
    let axes: Vec<&Element> = plot_area
        .into_iter()
        .flat_map(|area| area.elements())
        .filter(|e| {
            e.namespace() == C && matches!(e.local_name(), "catAx" | "dateAx" | "valAx" | "serAx")
        })
        .collect();
    let position = |axis: &Element| {
        axis.child(C, "axPos")
            .and_then(|p| p.attr("", "val"))
            .unwrap_or_default()
            .to_string()
    };
    let x_axis = axes
        .iter()
        .find(|a| a.is(C, "catAx") || a.is(C, "dateAx"))
        .or_else(|| axes.iter().find(|a| matches!(position(**a).as_str(), "b" | "t")))
        .copied();
    let y_axis = axes
        .iter()
        .find(|a| a.is(C, "valAx") && !x_axis.is_some_and(|x| std::ptr::eq(x, **a)))
        .copied();

    ChartInfo {
        three_d: tag.as_deref().is_some_and(|t| t.contains("3d")),
        chart_type: tag.as_deref().map(plot_type),
        title: chart.child(C, "title").and_then(title_text),
        x_label: x_axis.and_then(|a| a.child(C, "title")).and_then(title_text),
        y_label: y_axis.and_then(|a| a.child(C, "title")).and_then(title_text),
        data_labels: plot.is_some_and(|p| {
            p.descendants_named(C, "dLbls").any(|labels| {
                labels
                    .child(C, "showVal")
                    .is_some_and(|v| v.attr("", "val").is_none_or(|val| val == "1" || val == "true"))
            })
        }),
    }
}

/// "bar3dchart" gives "bar", "doughnutchart" gives "doughnut".
fn plot_type(tag: &str) -> String {
    let base = tag.trim_end_matches("chart").replace("3d", "");
    match base.as_str() {
        b if b.contains("bar") => "bar".to_string(),
        b if b.contains("line") => "line".to_string(),
        b if b.contains("pie") => "pie".to_string(),
        _ => base,
    }
}

/// Rich text of a title; `None` for auto-generated titles.
fn title_text(title: &Element) -> Option<String> {
    let runs: Vec<String> = title
        .path(&[(C, "tx"), (C, "rich")])?
        .descendants_named(A, "p")
        .map(|p| {
            p.descendants_named(A, "t")
                .map(|t| t.text())
                .collect::<String>()
        })
        .collect();
    let text = normalize_whitespace(&runs.join(" "));
    (!text.is_empty()).then_some(text)
}
