// Sistema Subsidios - OTP verification core
//
// This crate provides email one-time-password issuance and verification used
// to activate accounts, plus the HTTP surface that exposes it.
// Architecture follows the domain layout: domains/ hold business logic,
// kernel/ holds infrastructure traits and dependency wiring.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
