pub mod account;
pub mod admin;
pub mod bookings;
pub mod owner;
pub mod properties;
pub mod test_helpers;
