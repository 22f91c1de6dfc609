pub mod force_directed;

mod category;
pub use category::CategoryLayout;
