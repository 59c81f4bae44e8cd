use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{BeatpathError, Result};
use crate::graph::VictoryGraph;

/// Load a victory graph from a GEXF file.
///
/// Only the parts of GEXF this service needs are read: `<node>` elements with
/// an `id` and optional `label` attribute, and `<edge>` elements with
/// `source`, `target`, optional numeric `weight` (default 1) and optional
/// `label`. Everything else (viz data, attribute declarations) is skipped.
pub fn load_gexf(path: &Path) -> Result<VictoryGraph> {
    let content = std::fs::read_to_string(path)?;
    parse_gexf(&content, &path.display().to_string())
}

fn parse_gexf(content: &str, source: &str) -> Result<VictoryGraph> {
    let mut reader = Reader::from_str(content);

    let mut graph = VictoryGraph::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                match e.name().as_ref() {
                    b"node" => read_node(&e, &mut graph, source)?,
                    b"edge" => read_edge(&e, &mut graph, source)?,
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(BeatpathError::Parse(format!(
                    "GEXF parse error in {}: {}",
                    source, e
                )));
            }
        }
        buf.clear();
    }

    log::debug!(
        "Loaded {} teams and {} games from {}",
        graph.team_count(),
        graph.game_count(),
        source
    );

    Ok(graph)
}

fn read_node(element: &BytesStart, graph: &mut VictoryGraph, source: &str) -> Result<()> {
    let mut id = None;
    let mut label = None;

    for attr in element.attributes() {
        let attr = attr
            .map_err(|e| BeatpathError::Parse(format!("Bad node attribute in {}: {}", source, e)))?;
        let value = attr
            .unescape_value()
            .map_err(|e| BeatpathError::Parse(format!("Bad node attribute in {}: {}", source, e)))?;
        match attr.key.as_ref() {
            b"id" => id = Some(value.into_owned()),
            b"label" => label = Some(value.into_owned()),
            _ => {}
        }
    }

    let id = id.ok_or_else(|| {
        BeatpathError::Parse(format!("GEXF node without id attribute in {}", source))
    })?;
    graph.add_team(&id, label.as_deref());
    Ok(())
}

fn read_edge(element: &BytesStart, graph: &mut VictoryGraph, source: &str) -> Result<()> {
    let mut from = None;
    let mut to = None;
    let mut weight = 1.0;
    let mut label = None;

    for attr in element.attributes() {
        let attr = attr
            .map_err(|e| BeatpathError::Parse(format!("Bad edge attribute in {}: {}", source, e)))?;
        let value = attr
            .unescape_value()
            .map_err(|e| BeatpathError::Parse(format!("Bad edge attribute in {}: {}", source, e)))?;
        match attr.key.as_ref() {
            b"source" => from = Some(value.into_owned()),
            b"target" => to = Some(value.into_owned()),
            b"weight" => {
                weight = value.parse::<f64>().map_err(|_| {
                    BeatpathError::Parse(format!(
                        "GEXF edge with non-numeric weight {:?} in {}",
                        value, source
                    ))
                })?;
            }
            b"label" => label = Some(value.into_owned()),
            _ => {}
        }
    }

    let (from, to) = match (from, to) {
        (Some(from), Some(to)) => (from, to),
        _ => {
            return Err(BeatpathError::Parse(format!(
                "GEXF edge without source/target in {}",
                source
            )));
        }
    };

    graph.add_game(&from, &to, weight, label.as_deref());
    Ok(())
}
