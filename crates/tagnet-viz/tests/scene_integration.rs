//! Scene integration tests: graph plus layout into drawable geometry.

use tagnet_core::prelude::*;
use tagnet_runtime::aggregate::weight_sum_by_tag;
use tagnet_runtime::analysis::Analyzer;
use tagnet_runtime::corpus::{Corpus, RawRecord};
use tagnet_runtime::graph_builder::build_graph;
use tagnet_runtime::layout::layout;
use tagnet_viz::scene::{EDGE_WIDTH_MIN, EDGE_WIDTH_RANGE, NODE_SIZE_MIN, NODE_SIZE_RANGE};
use tagnet_viz::{swatch_bars, Scene};

fn dictionary() -> TagDictionary {
    TagDictionary::builder("scene")
        .category("color", |c| c.color("#B85C5C").tag("brown", ["brown"]).tag("red", ["red"]))
        .category("tech", |c| c.color("#E08A6F").tag("foam", ["foam"]))
        .build()
        .unwrap()
}

#[test]
fn sizes_and_widths_are_relative_to_the_maximum() {
    let dict = dictionary();
    let raw = vec![
        RawRecord::new("brown foam"),
        RawRecord::new("brown foam"),
        RawRecord::new("brown foam red"),
        RawRecord::new("brown red"),
    ];
    let corpus = Corpus::from_raw("scene", &raw, &dict);
    let graph = build_graph(corpus.records(), &RecordFilter::All, &dict, 5);
    let positions = layout(&graph, 42);
    let scene = Scene::build("all", &graph, &positions);

    assert!(!scene.insufficient_data);
    let brown = scene.nodes.iter().find(|n| n.id == "brown").unwrap();
    assert_eq!(brown.size, NODE_SIZE_MIN + NODE_SIZE_RANGE);
    assert_eq!(brown.color, "#B85C5C");
    assert_eq!(brown.label, "brown (4)");
    assert_eq!((brown.x, brown.y), {
        let p = positions.get("brown").unwrap();
        (p.x, p.y)
    });

    let red = scene.nodes.iter().find(|n| n.id == "red").unwrap();
    assert_eq!(red.size, 2.0 / 4.0 * NODE_SIZE_RANGE + NODE_SIZE_MIN);

    // brown–foam 3, brown–red 2; foam–red appears once and is dropped
    assert_eq!(scene.edges.len(), 2);
    let heaviest = scene.edges.iter().find(|e| e.weight == 3).unwrap();
    assert_eq!(heaviest.width, EDGE_WIDTH_MIN + EDGE_WIDTH_RANGE);
    let lighter = scene.edges.iter().find(|e| e.weight == 2).unwrap();
    assert_eq!(lighter.width, 2.0 / 3.0 * EDGE_WIDTH_RANGE + EDGE_WIDTH_MIN);
}

#[test]
fn analysis_scene_serializes_for_a_renderer() {
    let dict = TagDictionary::builtin();
    let corpus = Corpus::from_embedded(&dict);
    let analysis = Analyzer::new(&dict)
        .analyze(corpus.records(), &RecordFilter::marker("whitening"), "whitening")
        .unwrap();
    let scene = Scene::from_analysis(&analysis);

    assert_eq!(scene.title, "whitening");
    assert_eq!(scene.nodes.len(), analysis.graph.node_count());
    let json: serde_json::Value = serde_json::from_str(&scene.to_json().unwrap()).unwrap();
    assert!(json["nodes"].as_array().unwrap().iter().all(|n| n["x"].is_number()));
    assert!(json["edges"][0]["from"]["x"].is_number());
}

#[test]
fn swatch_ranking_of_the_sample_corpus() {
    let dict = TagDictionary::builtin();
    let corpus = Corpus::from_embedded(&dict);
    let ranking = weight_sum_by_tag(corpus.records(), &RecordFilter::All, "color");
    let bars = swatch_bars(&ranking, &dict, "color");

    assert_eq!(bars.len(), ranking.len());
    assert!(bars.windows(2).all(|w| w[0].total_weight >= w[1].total_weight));
    assert!(bars.iter().all(|b| b.color.starts_with('#')));
}
