pub mod config;
pub mod data_handling;
pub mod department;
pub mod menu;
pub mod textinterface;
