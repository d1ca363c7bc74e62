//! Random problems and cost statistics.
//!
//! Random instances are reproducible (seeded Xoshiro) and are used to exercise the greedy on
//! problems larger than hand written ones.

use ndarray::Array2;
use quantiles::ckms::CKMS; // we could use also greenwald_khanna

use rand::distr::{Distribution, Uniform};
use rand_xoshiro::Xoshiro256PlusPlus;
use rand_xoshiro::rand_core::SeedableRng;

use crate::costs::*;
use crate::error::FlpError;

/// Generates a problem with facilities 0..nb_facility and clients 0..nb_client.
/// Opening and connection costs are sampled uniformly in [cost_range.0, cost_range.1).
pub fn random_instance(
    nb_facility: usize,
    nb_client: usize,
    cost_range: (f64, f64),
    seed: u64,
) -> Result<CostMatrix<usize, usize, f64>, FlpError> {
    //
    let (low, high) = cost_range;
    if !(low >= 0. && low.is_finite() && high.is_finite()) {
        return Err(FlpError::InvalidCost {
            what: String::from("random cost range"),
            value: format!("{:?}", cost_range),
        });
    }
    let unif = Uniform::<f64>::new(low, high).map_err(|_| FlpError::InvalidCost {
        what: String::from("random cost range"),
        value: format!("{:?}", cost_range),
    })?;
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    //
    let opening: Vec<f64> = (0..nb_facility).map(|_| unif.sample(&mut rng)).collect();
    let connection = Array2::<f64>::from_shape_simple_fn((nb_client, nb_facility), || unif.sample(&mut rng));
    log::debug!(
        "random_instance nb_facility : {}, nb_client : {}, seed : {}",
        nb_facility,
        nb_client,
        seed
    );
    //
    CostMatrix::new(
        (0..nb_facility).collect(),
        opening,
        (0..nb_client).collect(),
        connection,
    )
} // end of random_instance

/// sketch of connection costs distribution, with relative error on rank given by error (0.01 is fine)
pub fn connection_quantiles<F: Ident, C: Ident>(costs: &CostMatrix<F, C, f64>, error: f64) -> CKMS<f64> {
    let mut q_cost = CKMS::<f64>::new(error);
    for d in costs.get_connection_table().iter() {
        q_cost.insert(*d);
    }
    q_cost
}

/// logs connection costs quantiles at 0.05, 0.5, 0.95 and returns them
pub fn log_connection_quantiles<F: Ident, C: Ident>(costs: &CostMatrix<F, C, f64>) -> Option<(f64, f64, f64)> {
    let q_cost = connection_quantiles(costs, 0.01);
    let q05 = q_cost.query(0.05)?.1;
    let q50 = q_cost.query(0.5)?.1;
    let q95 = q_cost.query(0.95)?.1;
    log::info!(
        "connection cost quantiles at 0.05 : {:.2e}, 0.5 : {:.2e}, 0.95 : {:.2e}",
        q05,
        q50,
        q95
    );
    Some((q05, q50, q95))
}

//==============================================================================

// end of mod tests
