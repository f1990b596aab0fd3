pub mod event;
pub mod participant;
pub mod team;
pub mod vote;
