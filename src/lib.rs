pub mod assets;
pub mod balance;
pub mod cli;
pub mod commands;
pub mod config;
pub mod contract_param;
pub mod crypto;
pub mod invoke;
pub mod neoscan;
pub mod primitives;
pub mod rpc;
pub mod script;
pub mod tx_builder;
pub mod wallet;
