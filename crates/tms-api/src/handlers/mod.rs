pub mod auth;
pub mod calendar;
pub mod costing;
pub mod couriers;
pub mod dashboards;
pub mod follow_ups;
pub mod health;
pub mod imprest;
pub mod instruments;
pub mod timers;
pub mod workflows;
