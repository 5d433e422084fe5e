//! config/mod.rs
//! Argumentos de línea de comandos + archivo JSON opcional + variables de entorno.

pub mod app_config;
pub mod cli;
