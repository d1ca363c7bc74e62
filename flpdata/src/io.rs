//! Reading problem files.
//!
//! A problem file is made of lines of values separated by a delimiter (blank by default):
//! - line 1 : facility identifiers
//! - line 2 : opening cost of each facility, in the order of line 1
//! - line 3 : client identifiers
//! - then one line per client (in the order of line 3) giving its connection cost to each facility (order of line 1).
//!
//! Repeated delimiters are tolerated, empty lines and lines beginning with '#' are skipped.

use anyhow::{Context, anyhow};
use ndarray::Array2;

use std::fs::OpenOptions;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use starfl::prelude::*;

/// The content of a problem file
pub struct ProblemData {
    facilities: Vec<u32>,
    opening: Vec<f64>,
    clients: Vec<u32>,
    // connection[[i,j]] : cost of client i to facility j
    connection: Array2<f64>,
} // end of struct ProblemData

impl ProblemData {
    pub fn get_facilities(&self) -> &[u32] {
        &self.facilities
    }

    pub fn get_clients(&self) -> &[u32] {
        &self.clients
    }

    pub fn get_opening(&self) -> &[f64] {
        &self.opening
    }

    pub fn get_connection(&self) -> &Array2<f64> {
        &self.connection
    }

    /// converts to a cost provider, checks identifiers are distinct
    pub fn into_costs(self) -> anyhow::Result<CostMatrix<u32, u32, f64>> {
        let costs = CostMatrix::new(self.facilities, self.opening, self.clients, self.connection)?;
        Ok(costs)
    }
} // end of impl ProblemData

//==================================================================================

// parse non empty fields of a line
fn parse_line<T: FromStr>(record: &csv::StringRecord, what: &str) -> anyhow::Result<Vec<T>> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    let mut values = Vec::<T>::with_capacity(record.len());
    for field in record.iter().filter(|f| !f.is_empty()) {
        let v = field
            .parse::<T>()
            .map_err(|_| anyhow!("line {} ({}) : cannot parse {:?}", line, what, field))?;
        values.push(v);
    }
    Ok(values)
}

/// reads a problem from any reader
pub fn read_problem<R: Read>(reader: R, delimiter: u8) -> anyhow::Result<ProblemData> {
    //
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);
    let mut lines = Vec::<csv::StringRecord>::new();
    for record in csv_reader.records() {
        let record = record?;
        // a line of delimiters only carries nothing
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        lines.push(record);
    }
    if lines.len() < 3 {
        return Err(anyhow!(
            "expecting at least facilities, opening costs and clients lines, got {} lines",
            lines.len()
        ));
    }
    // 1) facilities
    let facilities = parse_line::<u32>(&lines[0], "facilities")?;
    if facilities.is_empty() {
        return Err(anyhow!("no facility in first line"));
    }
    // 2) opening costs
    let opening = parse_line::<f64>(&lines[1], "opening costs")?;
    if opening.len() != facilities.len() {
        return Err(anyhow!(
            "got {} opening costs for {} facilities",
            opening.len(),
            facilities.len()
        ));
    }
    // 3) clients
    let clients = parse_line::<u32>(&lines[2], "clients")?;
    // 4) cost rows
    let rows = &lines[3..];
    if rows.len() != clients.len() {
        return Err(anyhow!(
            "got {} cost rows for {} clients",
            rows.len(),
            clients.len()
        ));
    }
    let mut connection = Array2::<f64>::zeros((clients.len(), facilities.len()));
    for (i, record) in rows.iter().enumerate() {
        let row = parse_line::<f64>(record, "connection costs")?;
        if row.len() != facilities.len() {
            return Err(anyhow!(
                "cost row of client {} has {} values, expecting {}",
                clients[i],
                row.len(),
                facilities.len()
            ));
        }
        for (j, d) in row.into_iter().enumerate() {
            connection[[i, j]] = d;
        }
    }
    log::debug!(
        "read problem with {} facilities and {} clients",
        facilities.len(),
        clients.len()
    );
    //
    Ok(ProblemData {
        facilities,
        opening,
        clients,
        connection,
    })
} // end of read_problem

/// reads a problem file
pub fn read_problem_file(path: &Path, delimiter: u8) -> anyhow::Result<ProblemData> {
    let file = OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("could not open problem file {:?}", path))?;
    read_problem(BufReader::new(file), delimiter)
}

//==================================================================================

#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    const EXAMPLE: &str = "1 2 3 4 5
6 10 12 5 8
1 2 3 4 5 6 7
4 2 5 8 6
3 2 6 7 9
6 8 1 4 7
5 7 2 3 4
7 4 10 9 3
1 9 8 3 6
12 5 8 3 7
";

    #[test]
    fn read_and_solve_example() {
        log_init_test();
        //
        let data = read_problem(EXAMPLE.as_bytes(), b' ').unwrap();
        assert_eq!(data.get_facilities(), &[1, 2, 3, 4, 5]);
        assert_eq!(data.get_opening(), &[6., 10., 12., 5., 8.]);
        assert_eq!(data.get_clients().len(), 7);
        assert_eq!(data.get_connection()[[6, 0]], 12.);
        //
        let costs = data.into_costs().unwrap();
        let facilities: Vec<u32> = costs.get_facilities().iter().copied().collect();
        let clients: Vec<u32> = costs.get_clients().iter().copied().collect();
        let solution = solve(&facilities, &clients, &costs).unwrap();
        assert_eq!(solution.get_total_cost(), 38.);
        assert_eq!(solution.get_assignment().get_facility(&6), Some(4));
    }

    #[test]
    fn tolerant_format() {
        log_init_test();
        //
        let text = "# two facilities\n10  20\n\n1.5 2\n7,8\n";
        assert!(read_problem(text.as_bytes(), b' ').is_err());
        let text = "# two facilities\n10  20\n\n1.5 2\n7 8\n0.5  1\n 2 3\n";
        let data = read_problem(text.as_bytes(), b' ').unwrap();
        assert_eq!(data.get_facilities(), &[10, 20]);
        assert_eq!(data.get_opening(), &[1.5, 2.]);
        assert_eq!(data.get_connection()[[1, 1]], 3.);
        //
        let text = "10,20\n1.5,2\n7\n0.5,1\n";
        let data = read_problem(text.as_bytes(), b',').unwrap();
        assert_eq!(data.get_clients(), &[7]);
    }

    #[test]
    fn malformed_files() {
        log_init_test();
        //
        // missing row
        let text = "1 2\n1 1\n1 2\n3 4\n";
        assert!(read_problem(text.as_bytes(), b' ').is_err());
        // short row
        let text = "1 2\n1 1\n1\n3\n";
        assert!(read_problem(text.as_bytes(), b' ').is_err());
        // opening count
        let text = "1 2\n1\n1\n3 4\n";
        assert!(read_problem(text.as_bytes(), b' ').is_err());
        // bad value
        let text = "1 2\n1 x\n1\n3 4\n";
        assert!(read_problem(text.as_bytes(), b' ').is_err());
        // duplicated facility detected at conversion
        let text = "1 1\n1 1\n1\n3 4\n";
        let data = read_problem(text.as_bytes(), b' ').unwrap();
        assert!(data.into_costs().is_err());
        //
        assert!(read_problem_file(Path::new("/nonexistent/problem.txt"), b' ').is_err());
    }
} // end of mod tests
