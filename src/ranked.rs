//! For each client, the list of all facilities sorted by increasing connection cost.
//!
//! Round t of the greedy looks at the t-th entry of each unserved client list.
//! Equal costs are ordered by increasing facility identifier so that runs are reproducible.

use indexmap::IndexMap;
use std::cmp::Ordering;

use crate::costs::*;
use crate::error::FlpError;

/// A facility option of a client
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RankedOption<F, T> {
    pub facility: F,
    pub cost: T,
}

/// The immutable ranked view of all clients.
pub struct RankedView<F: Ident, C: Ident, T: CostValue> {
    // client -> options sorted by cost
    options: IndexMap<C, Vec<RankedOption<F, T>>>,
    nb_facility: usize,
} // end of struct RankedView

impl<F: Ident, C: Ident, T: CostValue> RankedView<F, C, T> {
    /// builds the view. facilities and clients are expected distinct.
    /// Fails at the first missing or invalid connection cost.
    pub fn new<Costs>(facilities: &[F], clients: &[C], costs: &Costs) -> Result<Self, FlpError>
    where
        Costs: FacilityCosts<F, C, Cost = T> + ?Sized,
    {
        if facilities.is_empty() {
            return Err(FlpError::NoFacility);
        }
        let mut options = IndexMap::<C, Vec<RankedOption<F, T>>>::with_capacity(clients.len());
        for c in clients {
            let mut row = Vec::<RankedOption<F, T>>::with_capacity(facilities.len());
            for f in facilities {
                let cost = get_connection_cost(costs, *c, *f)?;
                row.push(RankedOption { facility: *f, cost });
            }
            // costs are checked finite so partial_cmp cannot fail
            row.sort_unstable_by(|a, b| {
                a.cost
                    .partial_cmp(&b.cost)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.facility.cmp(&b.facility))
            });
            options.insert(*c, row);
        }
        log::debug!(
            "ranked view built for {} clients, {} facilities",
            options.len(),
            facilities.len()
        );
        Ok(RankedView {
            options,
            nb_facility: facilities.len(),
        })
    } // end of new

    /// number of options of each client
    pub fn get_nb_facility(&self) -> usize {
        self.nb_facility
    }

    pub fn get_nb_client(&self) -> usize {
        self.options.len()
    }

    /// sorted options of a client
    pub fn get_options(&self, client: &C) -> Option<&[RankedOption<F, T>]> {
        self.options.get(client).map(|v| v.as_slice())
    }

    /// t-th cheapest option of a client, None if client unknown or rank out of range
    pub fn get_option(&self, client: &C, rank: usize) -> Option<&RankedOption<F, T>> {
        self.options.get(client).and_then(|v| v.get(rank))
    }

    /// iterates over clients and their sorted options
    pub fn iter(&self) -> impl Iterator<Item = (&C, &[RankedOption<F, T>])> {
        self.options.iter().map(|(c, v)| (c, v.as_slice()))
    }
} // end of impl RankedView

//===================================================================

// end of mod tests
