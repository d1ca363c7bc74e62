//! Cost effectiveness of a facility : average cost per client of serving a group of clients
//! (plus opening cost amortized on the group if the facility is not yet open).
//!
//! Each candidate facility keeps the best record found since it was last committed:
//! lowest ratio first, larger group on equal ratio.

use std::collections::BTreeMap;

use crate::costs::*;

/// A candidate selection of a facility : the group of clients found at a round, with its ratio
#[derive(Clone, Debug, PartialEq)]
pub struct Effectiveness<C, T> {
    // round at which the group was gathered
    round: usize,
    // average cost per client
    ratio: T,
    // clients of the group
    clients: Vec<C>,
} // end of struct Effectiveness

impl<C: Ident, T: CostValue> Effectiveness<C, T> {
    /// clients must not be empty
    pub fn new(round: usize, ratio: T, clients: Vec<C>) -> Self {
        assert!(!clients.is_empty());
        Effectiveness {
            round,
            ratio,
            clients,
        }
    }

    pub fn get_round(&self) -> usize {
        self.round
    }

    pub fn get_ratio(&self) -> T {
        self.ratio
    }

    pub fn get_clients(&self) -> &[C] {
        &self.clients
    }

    pub fn get_nb_clients(&self) -> usize {
        self.clients.len()
    }

    pub(crate) fn into_clients(self) -> Vec<C> {
        self.clients
    }

    /// true if self is strictly better than other : lower ratio, or same ratio and strictly more clients
    pub fn improves_on(&self, other: &Self) -> bool {
        self.ratio < other.ratio || (self.ratio == other.ratio && self.clients.len() > other.clients.len())
    }
} // end of impl Effectiveness

//======================================================================

/// The live records of candidate facilities.
/// Records are kept in facility order so that complete ties are resolved toward the smallest identifier.
pub struct EffectivenessTable<F, C, T> {
    records: BTreeMap<F, Effectiveness<C, T>>,
} // end of struct EffectivenessTable

impl<F: Ident, C: Ident, T: CostValue> EffectivenessTable<F, C, T> {
    pub fn new() -> Self {
        EffectivenessTable {
            records: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, facility: &F) -> Option<&Effectiveness<C, T>> {
        self.records.get(facility)
    }

    /// stores candidate if facility has no record or if candidate improves on it.
    /// returns true if candidate was stored
    pub fn update(&mut self, facility: F, candidate: Effectiveness<C, T>) -> bool {
        match self.records.get_mut(&facility) {
            Some(stored) => {
                if candidate.improves_on(stored) {
                    *stored = candidate;
                    true
                } else {
                    false
                }
            }
            None => {
                self.records.insert(facility, candidate);
                true
            }
        }
    } // end of update

    /// drops records for which no client satisfies the predicate (i.e no client left to serve)
    pub fn retain_live<P>(&mut self, is_live: P) -> usize
    where
        P: Fn(&C) -> bool,
    {
        let before = self.records.len();
        self.records.retain(|_, r| r.clients.iter().any(&is_live));
        before - self.records.len()
    }

    /// facility with minimal ratio, ties broken toward larger group then smaller facility
    pub fn best(&self) -> Option<(F, &Effectiveness<C, T>)> {
        let mut best: Option<(F, &Effectiveness<C, T>)> = None;
        for (f, r) in &self.records {
            match best {
                Some((_, b)) if !r.improves_on(b) => {}
                _ => best = Some((*f, r)),
            }
        }
        best
    } // end of best

    /// removes and returns the record of facility
    pub fn remove(&mut self, facility: &F) -> Option<Effectiveness<C, T>> {
        self.records.remove(facility)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&F, &Effectiveness<C, T>)> {
        self.records.iter()
    }
} // end of impl EffectivenessTable

impl<F: Ident, C: Ident, T: CostValue> Default for EffectivenessTable<F, C, T> {
    fn default() -> Self {
        Self::new()
    }
}

//======================================================================

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn improvement_rule() {
        let old = Effectiveness::new(0, 5., vec![1u32, 2]);
        // lower ratio wins whatever the size
        assert!(Effectiveness::new(1, 4., vec![3u32]).improves_on(&old));
        // same ratio needs a strictly larger group
        assert!(Effectiveness::new(1, 5., vec![1u32, 2, 3]).improves_on(&old));
        assert!(!Effectiveness::new(1, 5., vec![3u32, 4]).improves_on(&old));
        assert!(!Effectiveness::new(1, 5., vec![3u32]).improves_on(&old));
        assert!(!Effectiveness::new(1, 6., vec![3u32, 4, 5]).improves_on(&old));
    }

    #[test]
    fn table_keeps_best_record() {
        let mut table = EffectivenessTable::<u32, u32, f64>::new();
        assert!(table.update(1, Effectiveness::new(0, 7., vec![6])));
        assert!(!table.update(1, Effectiveness::new(2, 12., vec![3])));
        assert_eq!(table.get(&1).unwrap().get_round(), 0);
        assert!(table.update(1, Effectiveness::new(3, 7., vec![3, 4])));
        assert_eq!(table.get(&1).unwrap().get_round(), 3);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn best_tie_breaks() {
        let mut table = EffectivenessTable::<u32, u32, f64>::new();
        table.update(5, Effectiveness::new(0, 7., vec![6]));
        table.update(2, Effectiveness::new(0, 7., vec![1, 2]));
        table.update(3, Effectiveness::new(0, 7.5, vec![3, 4]));
        let (f, r) = table.best().unwrap();
        assert_eq!(f, 2);
        assert_eq!(r.get_nb_clients(), 2);
        // complete tie : smallest facility
        table.update(1, Effectiveness::new(0, 7., vec![8, 9]));
        assert_eq!(table.best().unwrap().0, 1);
        //
        assert!(table.remove(&1).is_some());
        assert_eq!(table.best().unwrap().0, 2);
    }

    #[test]
    fn stale_records_dropped() {
        let mut table = EffectivenessTable::<u32, u32, f64>::new();
        table.update(1, Effectiveness::new(0, 1., vec![1, 2]));
        table.update(2, Effectiveness::new(0, 1., vec![3]));
        let served = [1u32, 2];
        let nb_dropped = table.retain_live(|c| !served.contains(c));
        assert_eq!(nb_dropped, 1);
        assert!(table.get(&1).is_none());
        assert!(table.get(&2).is_some());
        assert!(EffectivenessTable::<u32, u32, f64>::default().best().is_none());
    }
} // end of mod tests
