//! Greedy (star) approximation of the uncapacitated facility location problem.
//!
//! Each client is served by exactly one opened facility. We minimize the sum of opening costs of
//! opened facilities and of connection costs of each client to its facility.
//!
//! The algorithm proceeds by rounds. At round t each unserved client proposes its t-th cheapest facility,
//! proposals are grouped by facility and each group is evaluated by its cost effectiveness (average cost per client).
//! The best group seen so far is committed: its facility is opened (if not yet) and its clients are served.
//!
//! It is related to the primal-dual and greedy star algorithms for facility location
//! [jsoftware](https://www.jsoftware.us/index.php?m=content&c=index&a=show&catid=88&id=1445).

use indexmap::{IndexMap, IndexSet};
use num_traits::{NumCast, Zero};

use std::collections::BTreeMap;

use crate::assignment::Assignment;
use crate::costs::*;
use crate::effectiveness::*;
use crate::error::FlpError;
use crate::ranked::RankedView;

/// effectiveness of a group evaluated during a round
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CandidateEval<F, T> {
    pub facility: F,
    pub nb_clients: usize,
    pub ratio: T,
    /// true if the group replaced the record of the facility
    pub stored: bool,
}

/// What happened during one round of the greedy
#[derive(Clone, Debug)]
pub struct RoundReport<F, C, T> {
    pub round: usize,
    /// rank in clients options looked at
    pub rank: usize,
    /// groups evaluated at this round, in facility order
    pub candidates: Vec<CandidateEval<F, T>>,
    /// records dropped because all their clients were already served
    pub nb_dropped: usize,
    /// facility committed
    pub selected: F,
    pub ratio: T,
    /// round at which the committed group was gathered
    pub found_at: usize,
    /// true if the facility was opened at this round
    pub opened: bool,
    /// clients served at this round
    pub committed: Vec<C>,
} // end of struct RoundReport

//=====================================================================================

/// Result of a run: the assignment, its total cost and the history of rounds.
#[derive(Clone, Debug)]
pub struct Solution<F: Ident, C: Ident, T> {
    assignment: Assignment<F, C>,
    total_cost: T,
    rounds: Vec<RoundReport<F, C, T>>,
} // end of struct Solution

impl<F: Ident, C: Ident, T: CostValue> Solution<F, C, T> {
    pub fn get_assignment(&self) -> &Assignment<F, C> {
        &self.assignment
    }

    /// opening costs of opened facilities + connection costs of served clients
    pub fn get_total_cost(&self) -> T {
        self.total_cost
    }

    pub fn get_rounds(&self) -> &[RoundReport<F, C, T>] {
        &self.rounds
    }

    pub fn get_nb_rounds(&self) -> usize {
        self.rounds.len()
    }

    pub fn into_assignment(self) -> Assignment<F, C> {
        self.assignment
    }
} // end of impl Solution

//=====================================================================================

#[cfg_attr(doc, katexit::katexit)]
/// The greedy selector.
///
/// At round t, for a facility f receiving the group G of unserved clients whose t-th cheapest option is f,
/// with M the set of already opened facilities, the cost effectiveness is:
///
/// $$ r(f,G) = \frac{ \mathbb{1}_{f \notin M} \, o(f) + \sum_{c \in G} d(c,f)}{|G|} $$
///
/// The record of a facility is replaced only by a strictly lower ratio, or an equal ratio on a strictly larger group.
/// The facility with lowest record (larger group on ties, then smallest identifier) is committed.
/// Clients of the record already served elsewhere since it was stored are skipped.
///
/// When the rounds have gone through all ranks with clients left, they restart from rank 0 (rank is t mod nb facilities).
/// Each round serves at least one client so there are at most nb clients rounds.
pub struct StarGreedy<'a, F, C, Costs>
where
    F: Ident,
    C: Ident,
    Costs: FacilityCosts<F, C> + ?Sized,
{
    // distinct facilities in input order
    facilities: Vec<F>,
    // distinct clients in input order
    clients: Vec<C>,
    costs: &'a Costs,
    // checked opening costs
    opening: IndexMap<F, Costs::Cost>,
    view: RankedView<F, C, Costs::Cost>,
} // end of struct StarGreedy

impl<'a, F, C, Costs> StarGreedy<'a, F, C, Costs>
where
    F: Ident,
    C: Ident,
    Costs: FacilityCosts<F, C> + ?Sized,
{
    /// Checks all costs and builds the ranked view of clients.
    /// Duplicated identifiers are collapsed.
    pub fn new(facilities: &[F], clients: &[C], costs: &'a Costs) -> Result<Self, FlpError> {
        let facilities: Vec<F> = facilities.iter().copied().collect::<IndexSet<F>>().into_iter().collect();
        let clients: Vec<C> = clients.iter().copied().collect::<IndexSet<C>>().into_iter().collect();
        if facilities.is_empty() {
            return Err(FlpError::NoFacility);
        }
        if clients.is_empty() {
            return Err(FlpError::NoClient);
        }
        let mut opening = IndexMap::<F, Costs::Cost>::with_capacity(facilities.len());
        for f in &facilities {
            opening.insert(*f, get_opening_cost::<F, C, _>(costs, *f)?);
        }
        let view = RankedView::new(&facilities, &clients, costs)?;
        //
        Ok(StarGreedy {
            facilities,
            clients,
            costs,
            opening,
            view,
        })
    } // end of new

    pub fn get_facilities(&self) -> &[F] {
        &self.facilities
    }

    pub fn get_clients(&self) -> &[C] {
        &self.clients
    }

    /// the sorted options of each client
    pub fn get_view(&self) -> &RankedView<F, C, Costs::Cost> {
        &self.view
    }

    fn get_opening(&self, facility: F) -> Result<Costs::Cost, FlpError> {
        self.opening
            .get(&facility)
            .copied()
            .ok_or_else(|| FlpError::missing_opening(facility))
    }

    /// runs the greedy until all clients are served.
    /// Each call works on its own state, the structure can be run many times.
    pub fn run(&self) -> Result<Solution<F, C, Costs::Cost>, FlpError> {
        //
        log::info!(
            "StarGreedy::run nb facilities : {}, nb clients : {}",
            self.facilities.len(),
            self.clients.len()
        );
        let nb_facility = self.view.get_nb_facility();
        let round_bound = self.clients.len();
        //
        let mut unserved: IndexSet<C> = self.clients.iter().copied().collect();
        let mut assignment = Assignment::<F, C>::new();
        let mut records = EffectivenessTable::<F, C, Costs::Cost>::new();
        let mut rounds = Vec::<RoundReport<F, C, Costs::Cost>>::new();
        let mut round = 0usize;
        //
        while !unserved.is_empty() {
            if round >= round_bound {
                log::error!("StarGreedy::run round bound {} reached", round_bound);
                return Err(FlpError::RoundBound {
                    round,
                    bound: round_bound,
                    nb_unserved: unserved.len(),
                });
            }
            let nb_dropped = records.retain_live(|c| unserved.contains(c));
            let rank = round % nb_facility;
            if rank == 0 && round > 0 {
                log::debug!(
                    "round {} : all ranks scanned, {} clients left, restarting at cheapest options",
                    round,
                    unserved.len()
                );
            }
            // group unserved clients by their option of rank
            let mut groups = BTreeMap::<F, (Costs::Cost, Vec<C>)>::new();
            for c in &unserved {
                let option = self.view.get_option(c, rank).ok_or(FlpError::NoCandidate {
                    round,
                    nb_unserved: unserved.len(),
                })?;
                let group = groups
                    .entry(option.facility)
                    .or_insert_with(|| (<Costs::Cost as Zero>::zero(), Vec::new()));
                group.0 = group.0 + option.cost;
                group.1.push(*c);
            }
            // evaluate groups
            let mut candidates = Vec::<CandidateEval<F, Costs::Cost>>::with_capacity(groups.len());
            for (f, (connection, group)) in groups {
                let mut sum_cost = connection;
                if !assignment.is_open(&f) {
                    sum_cost = sum_cost + self.get_opening(f)?;
                }
                let nb_clients = group.len();
                let size = <Costs::Cost as NumCast>::from(nb_clients).ok_or_else(|| FlpError::InvalidCost {
                    what: format!("group size of facility {:?}", f),
                    value: nb_clients.to_string(),
                })?;
                let ratio = sum_cost / size;
                log::trace!("round {} facility {:?} group {:?} ratio {:.3e}", round, f, group, ratio);
                let stored = records.update(f, Effectiveness::new(round, ratio, group));
                candidates.push(CandidateEval {
                    facility: f,
                    nb_clients,
                    ratio,
                    stored,
                });
            }
            // commit best record
            let (selected, ratio, found_at) = match records.best() {
                Some((f, r)) => (f, r.get_ratio(), r.get_round()),
                None => {
                    return Err(FlpError::NoCandidate {
                        round,
                        nb_unserved: unserved.len(),
                    });
                }
            };
            let committed: Vec<C> = records
                .remove(&selected)
                .map(|r| r.into_clients())
                .unwrap_or_default()
                .into_iter()
                .filter(|c| unserved.shift_remove(c))
                .collect();
            if committed.is_empty() {
                return Err(FlpError::NoCandidate {
                    round,
                    nb_unserved: unserved.len(),
                });
            }
            let opened = assignment.commit(selected, &committed);
            log::debug!(
                "round {} rank {} : facility {:?} (opened : {}) ratio {:.3e} found at round {}, serves {:?}, {} left",
                round,
                rank,
                selected,
                opened,
                ratio,
                found_at,
                committed,
                unserved.len()
            );
            rounds.push(RoundReport {
                round,
                rank,
                candidates,
                nb_dropped,
                selected,
                ratio,
                found_at,
                opened,
                committed,
            });
            round += 1;
        } // end while
        //
        let total_cost = assignment.total_cost(self.costs)?;
        log::info!(
            "StarGreedy::run done in {} rounds, nb opened : {}, total cost : {:.3e}",
            rounds.len(),
            assignment.get_nb_open(),
            total_cost
        );
        //
        Ok(Solution {
            assignment,
            total_cost,
            rounds,
        })
    } // end of run
} // end of impl StarGreedy

/// builds a [StarGreedy] and runs it
pub fn solve<F, C, Costs>(facilities: &[F], clients: &[C], costs: &Costs) -> Result<Solution<F, C, Costs::Cost>, FlpError>
where
    F: Ident,
    C: Ident,
    Costs: FacilityCosts<F, C> + ?Sized,
{
    StarGreedy::new(facilities, clients, costs)?.run()
}

//=====================================================================================

// end of mod tests
