pub mod choices;
pub mod listing;

pub use choices::*;
pub use listing::Surface;

pub use listing::Entity as Listing;
