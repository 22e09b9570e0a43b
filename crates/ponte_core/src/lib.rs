//! # Ponte Core
//!
//! Crate compartilhada que define as estruturas de dados, o protocolo de
//! frames do dispositivo serial, a configuração TOML e a política de
//! controle por histerese do sistema Ponte.
//!
//! ## Módulos
//! - [`types`] – Structs de telemetria e de comando
//! - [`frame`] – Decodificação de linhas JSON com pré-filtro estrutural
//! - [`config`] – Configuração unificada via TOML
//! - [`controller`] – Máquina de estados de histerese (Normal/Warning)

pub mod config;
pub mod controller;
pub mod frame;
pub mod types;

// Re-exports convenientes
pub use config::AppConfig;
pub use controller::{ControllerState, HysteresisController, Transition};
pub use frame::{FrameError, decode_line};
pub use types::{CommandRequest, Reading};
