//! Records exchanged with the employee backend.

pub mod city_statistic;
pub mod duplicate_group;
pub mod employee;

pub use city_statistic::CityStatistic;
pub use duplicate_group::DuplicateGroup;
pub use employee::{Address, AddressValue, Employee, EmployeeDraft};
