/*
    Reads a hierarchy from tab separated text, one sense per line:

        id <TAB> pos <TAB> lemma,lemma <TAB> hypernym,hypernym <TAB> related,related

    `-` marks an empty list and trailing empty columns may be left out.
    Edges may point at senses declared further down the file.
*/

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use super::{HierarchyBuilder, HierarchyErrorType, HierarchyGraph, PartOfSpeech};
use crate::error_handling::*;

pub type HierarchyError = Error<HierarchyErrorType>;
pub type HierarchyErrors = Errors<HierarchyErrorType>;
pub type FileResult<T> = std::result::Result<T, HierarchyErrors>;

#[derive(Debug, PartialEq)]
struct SenseLine<'a> {
    id: &'a str,
    pos: PartOfSpeech,
    lemmas: Vec<&'a str>,
    hypernyms: Vec<&'a str>,
    related: Vec<&'a str>,
}

fn split_list(field: Option<&str>) -> Vec<&str> {
    match field.map(str::trim) {
        None | Some("") | Some("-") => Vec::new(),
        Some(list) => list.split(',').map(str::trim).filter(|s| !s.is_empty()).collect(),
    }
}

fn parse_line(line: &str) -> super::Result<SenseLine<'_>> {
    let mut fields = line.split('\t');

    let id = fields
        .next()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(HierarchyErrorType::MissingField("id"))?;

    let tag = fields.next().map(str::trim).ok_or(HierarchyErrorType::MissingField("pos"))?;
    let pos = PartOfSpeech::from_tag(tag).ok_or_else(|| HierarchyErrorType::UnknownPartOfSpeech(tag.to_string()))?;

    Ok(SenseLine {
        id,
        pos,
        lemmas: split_list(fields.next()),
        hypernyms: split_list(fields.next()),
        related: split_list(fields.next()),
    })
}

fn is_sense_line(line: &str) -> bool {
    !line.trim().is_empty() && !line.starts_with('#')
}

pub fn load_str(text: &str, path: &Path) -> FileResult<HierarchyGraph> {
    let lines = collect_lines(text
        .lines()
        .enumerate()
        .filter(|(_, line)| is_sense_line(line))
        .map(|(num, line)| {
            let location = Location::line(path, num + 1);
            parse_line(line)
                .map(|sense| (sense, location.clone()))
                .map_err(|error| HierarchyError::new(location, error))
        }))?;

    let mut builder = HierarchyBuilder::new();
    let mut errors = Vec::new();
    let mut declared_at = HashMap::new();

    for (sense, location) in &lines {
        match builder.add_sense(sense.id, sense.pos, &sense.lemmas) {
            Ok(_) => {
                declared_at.insert(sense.id, location.clone());
            }
            Err(error) => errors.push(HierarchyError::new(location.clone(), error)),
        }
    }

    for (sense, location) in &lines {
        let mut edges = Vec::new();
        for parent in &sense.hypernyms {
            edges.push(builder.add_hypernym(sense.id, parent));
        }
        for other in &sense.related {
            edges.push(builder.add_pointer(sense.id, other));
        }

        errors.extend(edges
            .into_iter()
            .filter_map(std::result::Result::err)
            .map(|error| HierarchyError::new(location.clone(), error)));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let graph = builder.build().map_err(|error| {
        let location = match &error {
            HierarchyErrorType::HypernymCycle(id) => declared_at.get(id.as_str()).cloned(),
            _ => None,
        };
        vec![HierarchyError::new(location.unwrap_or_else(|| Location::file(path)), error)]
    })?;

    info!(file = %path.display(), senses = graph.len(), "hierarchy loaded");
    Ok(graph)
}

pub fn load_file(path: &Path) -> FileResult<HierarchyGraph> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| vec![HierarchyError::new(Location::file(path), HierarchyErrorType::FileError(e))])?;

    load_str(&text, path)
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    #[test]
    fn parse_normal_line() {
        let lines = vec![
            "dog.n.01\tn\tdog,domestic_dog\tcanine.n.02,domestic_animal.n.01\t-",
            "entity.n.01\tn\tentity",
            "good.s.01\ts\t-\t-\tbad.a.01",
        ];
        let answers = vec![
            SenseLine {
                id: "dog.n.01",
                pos: PartOfSpeech::Noun,
                lemmas: vec!["dog", "domestic_dog"],
                hypernyms: vec!["canine.n.02", "domestic_animal.n.01"],
                related: vec![],
            },
            SenseLine {
                id: "entity.n.01",
                pos: PartOfSpeech::Noun,
                lemmas: vec!["entity"],
                hypernyms: vec![],
                related: vec![],
            },
            SenseLine {
                id: "good.s.01",
                pos: PartOfSpeech::Adjective,
                lemmas: vec![],
                hypernyms: vec![],
                related: vec!["bad.a.01"],
            },
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(parse_line(line), Ok(answer));
        }
    }

    #[test]
    fn parse_malformed_line() {
        assert_eq!(parse_line("dog.n.01"), Err(HierarchyErrorType::MissingField("pos")));
        assert_eq!(parse_line("\tn\tdog"), Err(HierarchyErrorType::MissingField("id")));
        assert_eq!(parse_line("dog.x.01\tx\tdog"), Err(HierarchyErrorType::UnknownPartOfSpeech("x".to_string())));
    }

    #[test]
    fn every_bad_edge_is_reported() {
        let path = Path::new("inline.tsv");
        let text = "a\tn\ta\tb\n# comment\nb\tn\tb\t-\tnowhere\nc\tn\tc\tmissing,a\n";

        let errors = load_str(text, path).unwrap_err();
        assert_eq!(errors, vec![
            HierarchyError::new(Location::line(path, 3), HierarchyErrorType::UnknownSense("nowhere".to_string())),
            HierarchyError::new(Location::line(path, 4), HierarchyErrorType::UnknownSense("missing".to_string())),
        ]);
    }

    #[test]
    fn cycles_point_at_a_line() {
        let path = Path::new("inline.tsv");
        let errors = load_str("a\tn\ta\tb\nb\tn\tb\ta\n", path).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0].error, HierarchyErrorType::HypernymCycle(_)));
        assert_ne!(errors[0].location.line, 0);
    }

    #[test]
    fn forward_references_resolve() {
        let graph = load_str("wheel\tn\twheel\t-\tcar\ncar\tn\tcar\n", Path::new("inline.tsv")).unwrap();
        let wheel = graph.find("wheel").unwrap();
        let car = graph.find("car").unwrap();
        assert_eq!(graph.shortest_path_distance(wheel, car), Some(1));
        assert_eq!(graph.shortest_path_distance(car, wheel), Some(1));
    }

    #[test]
    fn load_example_file() {
        let graph = load_file(Path::new("example_data/hierarchy.tsv")).unwrap();
        assert_eq!(graph.len(), 17);
        assert!(graph.node(graph.find("entity.n.01").unwrap()).is_root());
    }
}
