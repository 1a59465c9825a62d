use std::{fs, io::Read};

use crate::{
    City, CityGraph, CityId, Error, Result, SolverOptions, algo::exact::CostMatrix,
    io::generate::random_instance,
};

/// A problem to solve: either a city graph or a bare cost matrix.
#[derive(Clone, Debug)]
pub enum Instance {
    Graph(CityGraph),
    Matrix(CostMatrix),
}

impl Instance {
    /// Generates a random graph when `--random-cities` is set, otherwise
    /// reads the instance file (or stdin).
    pub fn load(options: &SolverOptions) -> Result<Self> {
        if options.random_cities > 0 {
            log::info!(
                "input: generating cities={} seed={}",
                options.random_cities,
                options.seed
            );
            return random_instance(options.random_cities, options.seed).map(Self::Graph);
        }

        let text = match options.input_path() {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::invalid_input(format!("failed to read input {}: {e}", path.display()))
            })?,
            None => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                text
            }
        };
        let instance = parse_instance(&text)?;
        log::info!("input: loaded {} size={}", instance.kind(), instance.len());
        Ok(instance)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Graph(_) => "graph",
            Self::Matrix(_) => "matrix",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Graph(graph) => graph.len(),
            Self::Matrix(matrix) => matrix.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct Road {
    line: usize,
    from: CityId,
    to: CityId,
    distance: f64,
}

/// Parses the line-oriented instance format.
///
/// `city <id> <x> <y> <name...>` and `road <from> <to> <distance>` build a
/// graph; `cost <c0> <c1> ...` rows build a matrix. Roads may appear before
/// the cities they join. Blank lines and `#` comments are skipped.
pub fn parse_instance(input: &str) -> Result<Instance> {
    let mut graph = CityGraph::new();
    let mut roads = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut first_graph_line = None;

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let directive = fields.next().unwrap_or_default();
        match directive {
            "city" => {
                first_graph_line.get_or_insert(line_no);
                let id: CityId = parse_field(line_no, "city id", fields.next())?;
                let x: f64 = parse_field(line_no, "x", fields.next())?;
                let y: f64 = parse_field(line_no, "y", fields.next())?;
                let name = fields.collect::<Vec<_>>().join(" ");
                if name.is_empty() {
                    return Err(Error::invalid_input(format!(
                        "Line {line_no}: city {id} has no name"
                    )));
                }
                graph
                    .insert_city(City::new(id, name, x, y))
                    .map_err(|e| at_line(line_no, e))?;
            }
            "road" => {
                first_graph_line.get_or_insert(line_no);
                let from = parse_field(line_no, "from city", fields.next())?;
                let to = parse_field(line_no, "to city", fields.next())?;
                let distance = parse_field(line_no, "distance", fields.next())?;
                ensure_consumed(line_no, fields.next())?;
                roads.push(Road {
                    line: line_no,
                    from,
                    to,
                    distance,
                });
            }
            "cost" => {
                let row = fields
                    .map(|tok| parse_field(line_no, "cost", Some(tok)))
                    .collect::<Result<Vec<f64>>>()?;
                if row.is_empty() {
                    return Err(Error::invalid_input(format!(
                        "Line {line_no}: cost row is empty"
                    )));
                }
                rows.push(row);
            }
            other => {
                return Err(Error::invalid_input(format!(
                    "Line {line_no}: unknown directive '{other}' (expected city, road or cost)"
                )));
            }
        }
    }

    match (first_graph_line, rows.is_empty()) {
        (Some(line_no), false) => Err(Error::invalid_input(format!(
            "Line {line_no}: cannot mix city/road directives with cost rows"
        ))),
        (None, false) => CostMatrix::new(&rows).map(Instance::Matrix),
        (Some(_), true) => {
            for road in roads {
                graph
                    .connect(road.from, road.to, road.distance)
                    .map_err(|e| at_line(road.line, e))?;
            }
            Ok(Instance::Graph(graph))
        }
        (None, true) => Err(Error::invalid_input("input contains no cities or cost rows")),
    }
}

fn parse_field<T: std::str::FromStr>(line_no: usize, what: &str, tok: Option<&str>) -> Result<T> {
    let tok =
        tok.ok_or_else(|| Error::invalid_input(format!("Line {line_no}: missing {what}")))?;
    tok.parse()
        .map_err(|_| Error::invalid_input(format!("Line {line_no}: invalid {what}: {tok}")))
}

fn ensure_consumed(line_no: usize, extra: Option<&str>) -> Result<()> {
    match extra {
        Some(tok) => Err(Error::invalid_input(format!(
            "Line {line_no}: unexpected trailing field: {tok}"
        ))),
        None => Ok(()),
    }
}

fn at_line(line_no: usize, err: Error) -> Error {
    Error::invalid_input(format!("Line {line_no}: {err}"))
}
