use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

use crate::{CityGraph, Error, ExactSolution, Result, SolverOptions, Tour, runner::Solved};

/// Writes `solved` to `--output`, or stdout when unset.
pub fn write_solved(solved: &Solved<'_>, options: &SolverOptions) -> Result<()> {
    match options.output_path() {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                Error::other(format!("failed to create output {}: {e}", path.display()))
            })?;
            let mut out = BufWriter::new(file);
            write_to(&mut out, solved)?;
            out.flush()?;
            log::info!("output: wrote {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            write_to(&mut out, solved)?;
            out.flush()?;
        }
    }
    Ok(())
}

pub fn write_to<W: Write>(out: &mut W, solved: &Solved<'_>) -> Result<()> {
    match solved {
        Solved::GraphTour { graph, tour } => write_tour(out, graph, tour),
        Solved::MatrixOrder(solution) => write_order(out, solution),
    }
}

/// One `id,name` line per stop including the return to the start, then
/// `total,<distance>`.
pub fn write_tour<W: Write>(out: &mut W, graph: &CityGraph, tour: &Tour) -> Result<()> {
    for &id in &tour.path {
        let city = graph.city(id).ok_or(Error::UnknownCity(id))?;
        writeln!(out, "{},{}", city.id, city.name)?;
    }
    write_total(out, tour.total_distance)
}

/// One matrix index per line, then `total,<cost>`.
pub fn write_order<W: Write>(out: &mut W, solution: &ExactSolution) -> Result<()> {
    for idx in &solution.order {
        writeln!(out, "{idx}")?;
    }
    write_total(out, solution.cost)
}

fn write_total<W: Write>(out: &mut W, total: f64) -> Result<()> {
    let mut buf = ryu::Buffer::new();
    writeln!(out, "total,{}", buf.format(total))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{write_order, write_to, write_tour};
    use crate::{City, CityGraph, Connection, ExactSolution, Tour, runner::Solved};

    fn graph() -> CityGraph {
        let cities = vec![
            City::new(1, "Old Town", 0.0, 0.0),
            City::new(2, "Harbor", 3.0, 4.0),
            City::new(3, "Hill", 0.0, 4.0),
        ];
        let roads = vec![
            Connection::new(1, 2, 5.0),
            Connection::new(2, 3, 3.0),
            Connection::new(3, 1, 4.25),
        ];
        CityGraph::from_parts(&cities, &roads).expect("graph")
    }

    #[test]
    fn tour_lines_name_each_stop_and_end_with_total() {
        let graph = graph();
        let tour = Tour::new(vec![1, 2, 3, 1], 12.25);
        let mut out = Vec::new();
        write_tour(&mut out, &graph, &tour).expect("write");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "1,Old Town\n2,Harbor\n3,Hill\n1,Old Town\ntotal,12.25\n"
        );
    }

    #[test]
    fn whole_totals_keep_a_decimal_point() {
        let solution = ExactSolution {
            cost: 80.0,
            order: vec![0, 1, 3, 2, 0],
        };
        let mut out = Vec::new();
        write_order(&mut out, &solution).expect("write");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "0\n1\n3\n2\n0\ntotal,80.0\n"
        );
    }

    #[test]
    fn unknown_city_in_tour_is_an_error() {
        let graph = graph();
        let tour = Tour::new(vec![1, 9, 1], 1.0);
        let mut out = Vec::new();
        assert!(write_tour(&mut out, &graph, &tour).is_err());
    }

    #[test]
    fn write_to_dispatches_on_result_kind() {
        let graph = graph();
        let solved = Solved::GraphTour {
            graph: &graph,
            tour: Tour::new(vec![2, 3, 2], 6.0),
        };
        let mut out = Vec::new();
        write_to(&mut out, &solved).expect("write");
        assert!(String::from_utf8(out).expect("utf8").ends_with("total,6.0\n"));
    }
}
