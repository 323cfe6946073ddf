//! Page Controllers
//!
//! A page controller is mounted once per page view. It owns the state of
//! each section, issues the queries the page needs, and exposes snapshots
//! for the view layer. No state is shared between page instances.

mod detail;
mod list;
mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use detail::{parse_proposal_id, DetailPage, DetailSnapshot};
pub use list::{ListPage, ListSnapshot};
pub use state::{deliver, LoadState, PageCell, Ticket};
