pub mod categories;
pub mod jobs;
pub mod offers;
pub mod payment_items;
pub mod payments;
pub mod points;
pub mod tokens;
pub mod users;
