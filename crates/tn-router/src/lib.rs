//! `tn-router` — fastest multi-modal routes under a money budget.
//!
//! The search state is `(vertex, mode, money spent, time elapsed)`.  Mode
//! matters because fares depend on it: boarding a metro or bus charges a
//! flat fare, staying aboard does not, and a taxi's minimum fare applies
//! only on the edge where it is hailed.  See [`router`] for the rules.
//!
//! Running out of budget is an ordinary outcome: [`Router::route`] returns
//! `Ok(None)`.  Errors are reserved for bad queries (unknown nodes, negative
//! or non-finite budgets).

pub mod error;
pub mod route;
pub mod router;


pub use error::{RouterError, RouterResult};
pub use route::{Leg, ModalRoute, ModalStep};
pub use router::{BudgetRouter, Router};
