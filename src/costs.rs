//! Cost data feeding the greedy.
//!
//! The algorithm only needs to query an opening cost per facility and a connection cost per
//! (client, facility) couple. This is abstracted by the trait [FacilityCosts].
//! Two providers are given here:
//! - [CostMatrix] : dense tables, facilities and clients stored in [IndexSet] to map identifiers to rows and columns,
//! - [FnCosts] : wraps two closures, useful when costs are computed on the fly (distances for example).

use indexmap::IndexSet;
use ndarray::{Array1, Array2};
use num_traits::Float;

use std::fmt::{Debug, Display, LowerExp};
use std::hash::Hash;

use crate::error::FlpError;

/// Identifiers of facilities and clients. They must be totally ordered, ties between equal
/// connection costs are broken by ascending facility identifier.
pub trait Ident: Copy + Eq + Hash + Ord + Debug {}

impl<I> Ident for I where I: Copy + Eq + Hash + Ord + Debug {}

/// numeric type of costs
pub trait CostValue: Float + Debug + Display + LowerExp {}

impl<T> CostValue for T where T: Float + Debug + Display + LowerExp {}

/// The cost interface the greedy relies on.
/// A `None` answer for a facility or couple in the problem is a configuration error.
pub trait FacilityCosts<F, C> {
    /// cost type
    type Cost: CostValue;
    /// cost of opening facility (charged once)
    fn opening_cost(&self, facility: F) -> Option<Self::Cost>;
    /// cost of serving client from facility
    fn connection_cost(&self, client: C, facility: F) -> Option<Self::Cost>;
}

// costs must be finite and non negative
pub(crate) fn check_cost<T: CostValue>(value: T, what: impl FnOnce() -> String) -> Result<T, FlpError> {
    if value.is_finite() && value >= T::zero() {
        Ok(value)
    } else {
        Err(FlpError::InvalidCost {
            what: what(),
            value: format!("{:?}", value),
        })
    }
}

/// fetch and check opening cost
pub fn get_opening_cost<F, C, Costs>(costs: &Costs, facility: F) -> Result<Costs::Cost, FlpError>
where
    F: Ident,
    Costs: FacilityCosts<F, C> + ?Sized,
{
    let value = costs
        .opening_cost(facility)
        .ok_or_else(|| FlpError::missing_opening(facility))?;
    check_cost(value, || format!("opening of facility {:?}", facility))
}

/// fetch and check connection cost
pub fn get_connection_cost<F, C, Costs>(
    costs: &Costs,
    client: C,
    facility: F,
) -> Result<Costs::Cost, FlpError>
where
    F: Ident,
    C: Ident,
    Costs: FacilityCosts<F, C> + ?Sized,
{
    let value = costs
        .connection_cost(client, facility)
        .ok_or_else(|| FlpError::missing_connection(client, facility))?;
    check_cost(value, || {
        format!("connection of client {:?} to facility {:?}", client, facility)
    })
}

//=====================================================================================

/// Dense storage of a problem.
/// Row i of the connection table is the client of rank i in clients, column j the facility of rank j.
#[derive(Clone, Debug)]
pub struct CostMatrix<F: Ident, C: Ident, T: CostValue> {
    facilities: IndexSet<F>,
    clients: IndexSet<C>,
    // opening[j] is opening cost of facility of rank j
    opening: Array1<T>,
    // connection[[i,j]] cost of client rank i to facility rank j
    connection: Array2<T>,
} // end of struct CostMatrix

impl<F: Ident, C: Ident, T: CostValue> CostMatrix<F, C, T> {
    /// - facilities : facility identifiers, must be distinct
    /// - opening : opening costs in the order of facilities
    /// - clients : client identifiers, must be distinct
    /// - connection : array of dims (nb clients, nb facilities)
    pub fn new(
        facilities: Vec<F>,
        opening: Vec<T>,
        clients: Vec<C>,
        connection: Array2<T>,
    ) -> Result<Self, FlpError> {
        let nb_facility = facilities.len();
        let nb_client = clients.len();
        let facilities: IndexSet<F> = facilities.into_iter().collect();
        let clients: IndexSet<C> = clients.into_iter().collect();
        if facilities.len() != nb_facility {
            return Err(FlpError::ShapeMismatch {
                what: String::from("distinct facility identifiers"),
                expected: nb_facility,
                got: facilities.len(),
            });
        }
        if clients.len() != nb_client {
            return Err(FlpError::ShapeMismatch {
                what: String::from("distinct client identifiers"),
                expected: nb_client,
                got: clients.len(),
            });
        }
        if opening.len() != nb_facility {
            return Err(FlpError::ShapeMismatch {
                what: String::from("opening costs"),
                expected: nb_facility,
                got: opening.len(),
            });
        }
        if connection.dim() != (nb_client, nb_facility) {
            return Err(FlpError::ShapeMismatch {
                what: String::from("connection costs"),
                expected: nb_client * nb_facility,
                got: connection.len(),
            });
        }
        Ok(CostMatrix {
            facilities,
            clients,
            opening: Array1::from_vec(opening),
            connection,
        })
    } // end of new

    /// fills the tables from two functions
    pub fn from_fn<O, D>(facilities: Vec<F>, clients: Vec<C>, opening: O, connection: D) -> Result<Self, FlpError>
    where
        O: Fn(F) -> T,
        D: Fn(C, F) -> T,
    {
        let opening_v: Vec<T> = facilities.iter().map(|f| opening(*f)).collect();
        let mut connection_v = Vec::<T>::with_capacity(facilities.len() * clients.len());
        for c in &clients {
            for f in &facilities {
                connection_v.push(connection(*c, *f));
            }
        }
        let dim = (clients.len(), facilities.len());
        let connection_a = Array2::from_shape_vec(dim, connection_v).map_err(|_| FlpError::ShapeMismatch {
            what: String::from("connection costs"),
            expected: dim.0 * dim.1,
            got: dim.0 * dim.1,
        })?;
        CostMatrix::new(facilities, opening_v, clients, connection_a)
    } // end of from_fn

    pub fn get_facilities(&self) -> &IndexSet<F> {
        &self.facilities
    }

    pub fn get_clients(&self) -> &IndexSet<C> {
        &self.clients
    }

    pub fn get_nb_facility(&self) -> usize {
        self.facilities.len()
    }

    pub fn get_nb_client(&self) -> usize {
        self.clients.len()
    }

    /// the (nb client, nb facility) connection table
    pub fn get_connection_table(&self) -> &Array2<T> {
        &self.connection
    }

    pub fn get_opening_costs(&self) -> &Array1<T> {
        &self.opening
    }
} // end of impl CostMatrix

impl<F: Ident, C: Ident, T: CostValue> FacilityCosts<F, C> for CostMatrix<F, C, T> {
    type Cost = T;

    fn opening_cost(&self, facility: F) -> Option<T> {
        self.facilities.get_index_of(&facility).map(|j| self.opening[j])
    }

    fn connection_cost(&self, client: C, facility: F) -> Option<T> {
        let i = self.clients.get_index_of(&client)?;
        let j = self.facilities.get_index_of(&facility)?;
        Some(self.connection[[i, j]])
    }
} // end of impl FacilityCosts for CostMatrix

//=====================================================================================

/// Costs given by two closures, one for opening, one for connection.
pub struct FnCosts<O, D> {
    opening: O,
    connection: D,
}

impl<O, D> FnCosts<O, D> {
    pub fn new(opening: O, connection: D) -> Self {
        FnCosts { opening, connection }
    }
}

impl<F, C, T, O, D> FacilityCosts<F, C> for FnCosts<O, D>
where
    T: CostValue,
    O: Fn(F) -> Option<T>,
    D: Fn(C, F) -> Option<T>,
{
    type Cost = T;

    fn opening_cost(&self, facility: F) -> Option<T> {
        (self.opening)(facility)
    }

    fn connection_cost(&self, client: C, facility: F) -> Option<T> {
        (self.connection)(client, facility)
    }
} // end of impl FacilityCosts for FnCosts

//=====================================================================================

#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn matrix_lookup() {
        log_init_test();
        //
        let connection = ndarray::arr2(&[[1., 2., 3.], [4., 5., 6.]]);
        let costs = CostMatrix::new(vec![10u32, 20, 30], vec![7., 8., 9.], vec![1u32, 2], connection).unwrap();
        assert_eq!(costs.opening_cost(20), Some(8.));
        assert_eq!(costs.opening_cost(40), None);
        assert_eq!(costs.connection_cost(2, 30), Some(6.));
        assert_eq!(costs.connection_cost(1, 10), Some(1.));
        assert_eq!(costs.connection_cost(3, 10), None);
        assert_eq!(costs.get_nb_client(), 2);
        assert_eq!(costs.get_nb_facility(), 3);
    }

    #[test]
    fn matrix_shape_errors() {
        log_init_test();
        //
        let connection = ndarray::arr2(&[[1., 2.], [4., 5.]]);
        let res = CostMatrix::new(vec![1u32, 2, 3], vec![7., 8., 9.], vec![1u32, 2], connection.clone());
        assert!(matches!(res, Err(FlpError::ShapeMismatch { .. })));
        let res = CostMatrix::new(vec![1u32, 1], vec![7., 8.], vec![1u32, 2], connection.clone());
        assert!(matches!(res, Err(FlpError::ShapeMismatch { .. })));
        let res = CostMatrix::new(vec![1u32, 2], vec![7.], vec![1u32, 2], connection);
        assert!(res.unwrap_err().is_configuration());
    }

    #[test]
    fn checked_lookups() {
        log_init_test();
        //
        let costs = FnCosts::new(
            |f: u32| if f < 3 { Some(f as f64) } else { None },
            |c: u32, f: u32| if c == 0 { Some(-1.) } else { Some((c + f) as f64) },
        );
        assert_eq!(get_opening_cost::<u32, u32, _>(&costs, 2).unwrap(), 2.);
        assert!(matches!(
            get_opening_cost::<u32, u32, _>(&costs, 5),
            Err(FlpError::MissingOpeningCost { .. })
        ));
        assert_eq!(get_connection_cost(&costs, 1u32, 2u32).unwrap(), 3.);
        assert!(matches!(
            get_connection_cost(&costs, 0u32, 2u32),
            Err(FlpError::InvalidCost { .. })
        ));
        let nan_costs = FnCosts::new(|_f: u32| Some(f64::NAN), |_c: u32, _f: u32| Some(0.));
        assert!(get_opening_cost::<u32, u32, _>(&nan_costs, 1).is_err());
    }

    #[test]
    fn from_fn_layout() {
        let costs = CostMatrix::from_fn(vec![1u32, 2], vec![5u32, 6, 7], |f| f as f32, |c, f| (10 * c + f) as f32).unwrap();
        assert_eq!(costs.get_connection_table().dim(), (3, 2));
        assert_eq!(costs.connection_cost(6, 2), Some(62.));
        assert_eq!(costs.opening_cost(1), Some(1.));
    }
} // end of mod tests
