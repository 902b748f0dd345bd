pub mod reference;
pub mod restaurant;
pub mod trace;
