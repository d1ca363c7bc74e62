//! implement assignment of clients to opened facilities

use indexmap::{IndexMap, IndexSet};
use num_traits::Zero;

use crate::costs::*;
use crate::error::FlpError;

/// The mapping from opened facilities to the clients they serve.
/// Facilities are kept in opening order, clients in commit order.
/// A facility is never closed and a client never reassigned.
#[derive(Clone, Debug)]
pub struct Assignment<F: Ident, C: Ident> {
    served: IndexMap<F, IndexSet<C>>,
    // client -> facility serving it
    server: IndexMap<C, F>,
} // end of struct Assignment

impl<F: Ident, C: Ident> Assignment<F, C> {
    pub fn new() -> Self {
        Assignment {
            served: IndexMap::new(),
            server: IndexMap::new(),
        }
    }

    /// true if facility has been opened
    pub fn is_open(&self, facility: &F) -> bool {
        self.served.contains_key(facility)
    }

    /// number of opened facilities
    pub fn get_nb_open(&self) -> usize {
        self.served.len()
    }

    /// number of clients served
    pub fn get_nb_served(&self) -> usize {
        self.server.len()
    }

    /// clients served by facility, None if the facility was not opened
    pub fn get_clients(&self, facility: &F) -> Option<&IndexSet<C>> {
        self.served.get(facility)
    }

    /// facility serving a client
    pub fn get_facility(&self, client: &C) -> Option<F> {
        self.server.get(client).copied()
    }

    /// opened facilities in opening order
    pub fn get_open_facilities(&self) -> impl Iterator<Item = &F> {
        self.served.keys()
    }

    /// iterates over (facility, served clients)
    pub fn iter(&self) -> impl Iterator<Item = (&F, &IndexSet<C>)> {
        self.served.iter()
    }

    /// iterates over couples (client, facility)
    pub fn iter_clients(&self) -> impl Iterator<Item = (C, F)> + '_ {
        self.server.iter().map(|(c, f)| (*c, *f))
    }

    /// opens facility if needed and adds clients to it.
    /// returns true if the facility has been opened by this call.
    /// Clients already served are an error of the caller.
    pub(crate) fn commit(&mut self, facility: F, clients: &[C]) -> bool {
        let opened = !self.served.contains_key(&facility);
        let entry = self.served.entry(facility).or_default();
        for c in clients {
            let previous = self.server.insert(*c, facility);
            assert!(previous.is_none(), "client {:?} assigned twice", c);
            entry.insert(*c);
        }
        opened
    } // end of commit

    /// sum of opening costs of opened facilities and of connection costs of all (client, facility) couples
    pub fn total_cost<Costs>(&self, costs: &Costs) -> Result<Costs::Cost, FlpError>
    where
        Costs: FacilityCosts<F, C> + ?Sized,
    {
        let mut total = Costs::Cost::zero();
        for (f, clients) in &self.served {
            total = total + get_opening_cost::<F, C, _>(costs, *f)?;
            for c in clients {
                total = total + get_connection_cost(costs, *c, *f)?;
            }
        }
        Ok(total)
    } // end of total_cost

    /// opening cost and connection cost of each opened facility
    pub fn facility_costs<Costs>(&self, costs: &Costs) -> Result<Vec<(F, Costs::Cost, Costs::Cost)>, FlpError>
    where
        Costs: FacilityCosts<F, C> + ?Sized,
    {
        let mut res = Vec::with_capacity(self.served.len());
        for (f, clients) in &self.served {
            let opening = get_opening_cost::<F, C, _>(costs, *f)?;
            let mut connection = Costs::Cost::zero();
            for c in clients {
                connection = connection + get_connection_cost(costs, *c, *f)?;
            }
            res.push((*f, opening, connection));
        }
        Ok(res)
    }

    /// checks every client is served exactly once and by nothing else
    pub fn covers(&self, clients: &[C]) -> bool {
        let expected: IndexSet<C> = clients.iter().copied().collect();
        if expected.len() != self.server.len() {
            return false;
        }
        let nb_in_sets: usize = self.served.values().map(|s| s.len()).sum();
        nb_in_sets == self.server.len() && expected.iter().all(|c| self.server.contains_key(c))
    }

    /// dumps facilities and their clients at info level
    pub fn log(&self) {
        for (f, clients) in &self.served {
            log::info!("facility {:?} serves {} clients : {:?}", f, clients.len(), clients);
        }
    }
} // end of impl Assignment

impl<F: Ident, C: Ident> Default for Assignment<F, C> {
    fn default() -> Self {
        Self::new()
    }
}

//==========================================================================================

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn commit_and_costs() {
        let costs = FnCosts::new(|f: u32| Some(f as f64 * 10.), |c: u32, f: u32| Some((c * f) as f64));
        let mut assignment = Assignment::<u32, u32>::new();
        assert!(assignment.commit(2, &[1, 3]));
        assert!(!assignment.commit(2, &[5]));
        assert!(assignment.commit(1, &[2]));
        //
        assert!(assignment.is_open(&2));
        assert!(!assignment.is_open(&3));
        assert_eq!(assignment.get_nb_open(), 2);
        assert_eq!(assignment.get_facility(&5), Some(2));
        let expected: IndexSet<u32> = [5, 3, 1].into_iter().collect();
        assert_eq!(assignment.get_clients(&2).unwrap(), &expected);
        // opening 20 + 10, connections 2+6+10 + 2
        assert_eq!(assignment.total_cost(&costs).unwrap(), 50.);
        let per_facility = assignment.facility_costs(&costs).unwrap();
        assert_eq!(per_facility, vec![(2, 20., 18.), (1, 10., 2.)]);
        //
        assert!(assignment.covers(&[1, 2, 3, 5]));
        assert!(!assignment.covers(&[1, 2, 3]));
        assert!(!assignment.covers(&[1, 2, 3, 4]));
    }

    #[test]
    #[should_panic]
    fn double_assignment_panics() {
        let mut assignment = Assignment::<u32, u32>::new();
        assignment.commit(2, &[1]);
        assignment.commit(3, &[1]);
    }
} // end of mod tests
