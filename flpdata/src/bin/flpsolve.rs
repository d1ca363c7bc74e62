//! Runs the greedy facility location on a problem file or on a random problem.
//!
//! usage:
//!  - flpsolve --file data/example.txt [--delimiter ',']
//!  - flpsolve --random 50 500 [--seed 117]
//!
//! Prints the sorted cost options of each client, the rounds of the greedy, the final assignment and total cost.
//! Set RUST_LOG=debug to get the details of each round in the log.

use cpu_time::ProcessTime;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use clap::{Arg, ArgAction, ArgMatches, Command};

use flpdata::io::*;
use starfl::prelude::*;

/// where the problem comes from
enum ProblemSource {
    File { path: PathBuf, delimiter: u8 },
    Random { nb_facility: usize, nb_client: usize, seed: u64 },
}

// random instances are not printed in full above this number of clients
const MAX_PRINTED_CLIENTS: usize = 50;

//============================================================================================

fn parse_cmd(matches: &ArgMatches) -> anyhow::Result<ProblemSource> {
    log::debug!("in parse_cmd");
    if let Some(path) = matches.get_one::<String>("file") {
        let delimiter = match matches.get_one::<String>("delimiter") {
            Some(d) => {
                let bytes = d.as_bytes();
                if bytes.len() != 1 {
                    return Err(anyhow::anyhow!("delimiter must be a single byte, got {:?}", d));
                }
                bytes[0]
            }
            None => b' ',
        };
        return Ok(ProblemSource::File {
            path: PathBuf::from(path),
            delimiter,
        });
    }
    if let Some(mut sizes) = matches.get_many::<usize>("random") {
        let nb_facility = sizes.next().copied().unwrap_or(0);
        let nb_client = sizes.next().copied().unwrap_or(0);
        let seed = matches.get_one::<u64>("seed").copied().unwrap_or(117);
        return Ok(ProblemSource::Random {
            nb_facility,
            nb_client,
            seed,
        });
    }
    Err(anyhow::anyhow!("expecting --file or --random option"))
} // end of parse_cmd

// print options of each client by increasing cost
fn print_view<Costs>(greedy: &StarGreedy<'_, u32, u32, Costs>)
where
    Costs: FacilityCosts<u32, u32, Cost = f64>,
{
    println!("\n sorted connection costs");
    for (c, options) in greedy.get_view().iter().take(MAX_PRINTED_CLIENTS) {
        let row: Vec<String> = options
            .iter()
            .map(|o| format!("c{},{} = {}", c, o.facility, o.cost))
            .collect();
        println!("{}", row.join(" | "));
    }
}

fn print_solution(solution: &Solution<u32, u32, f64>) {
    println!("\n rounds");
    for report in solution.get_rounds() {
        for eval in &report.candidates {
            println!(
                "  round {} rank {} facility {} : ratio {:.3} on {} clients{}",
                report.round,
                report.rank,
                eval.facility,
                eval.ratio,
                eval.nb_clients,
                if eval.stored { " (stored)" } else { "" }
            );
        }
        println!(
            " round {} selects facility {}{} ratio {:.3} (found at round {}) serving {:?}",
            report.round,
            report.selected,
            if report.opened { " (opened)" } else { "" },
            report.ratio,
            report.found_at,
            report.committed
        );
    }
    println!("\n total cost : {}", solution.get_total_cost());
    for (f, clients) in solution.get_assignment().iter() {
        let clients: Vec<u32> = clients.iter().copied().collect();
        println!("facility {} : {:?}", f, clients);
    }
} // end of print_solution

fn run(source: ProblemSource) -> anyhow::Result<()> {
    //
    let costs = match source {
        ProblemSource::File { path, delimiter } => {
            log::info!("reading problem file {:?}", path);
            read_problem_file(&path, delimiter)?.into_costs()?
        }
        ProblemSource::Random {
            nb_facility,
            nb_client,
            seed,
        } => {
            log::info!(
                "random problem nb_facility : {}, nb_client : {}, seed : {}",
                nb_facility,
                nb_client,
                seed
            );
            let random = random_instance(nb_facility, nb_client, (0., 100.), seed)?;
            // ids fit in u32 for any problem that fits in memory
            let facilities: Vec<u32> = (0..nb_facility as u32).collect();
            let clients: Vec<u32> = (0..nb_client as u32).collect();
            CostMatrix::new(
                facilities,
                random.get_opening_costs().to_vec(),
                clients,
                random.get_connection_table().clone(),
            )?
        }
    };
    let _ = log_connection_quantiles(&costs);
    //
    let cpu_start = ProcessTime::now();
    let sys_now = SystemTime::now();
    //
    let facilities: Vec<u32> = costs.get_facilities().iter().copied().collect();
    let clients: Vec<u32> = costs.get_clients().iter().copied().collect();
    let greedy = StarGreedy::new(&facilities, &clients, &costs)?;
    print_view(&greedy);
    let solution = greedy.run()?;
    //
    let cpu_time: Duration = cpu_start.elapsed();
    print_solution(&solution);
    solution.get_assignment().log();
    println!(
        "\n  sys time(ms) {:?} cpu time(ms) {:?}",
        sys_now.elapsed()?.as_millis(),
        cpu_time.as_millis()
    );
    Ok(())
} // end of run

pub fn main() {
    //
    let _ = env_logger::builder().is_test(true).try_init();
    //
    log::info!("\n\n running flpsolve");
    //
    let matches = Command::new("flpsolve")
        .arg_required_else_help(true)
        .arg(
            Arg::new("file")
                .long("file")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(String))
                .conflicts_with("random")
                .help("problem file: facilities, opening costs, clients, then one cost row per client"),
        )
        .arg(
            Arg::new("delimiter")
                .long("delimiter")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(String))
                .help("field delimiter of problem file, blank by default"),
        )
        .arg(
            Arg::new("random")
                .long("random")
                .num_args(2)
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(usize))
                .value_names(["NB_FACILITY", "NB_CLIENT"])
                .help("generate a random problem"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(u64))
                .help("seed of random problem"),
        )
        .get_matches();
    //
    let source = match parse_cmd(&matches) {
        Ok(source) => source,
        Err(e) => {
            log::error!("bad command : {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = run(source) {
        log::error!("flpsolve failed : {:#}", e);
        eprintln!("flpsolve failed : {:#}", e);
        std::process::exit(1);
    }
} // end of main
