//! Database models.

pub mod genre;
pub mod movie;
pub mod star;

pub use genre::Genre;
pub use movie::CatalogRecord;
pub use star::StarRecord;
