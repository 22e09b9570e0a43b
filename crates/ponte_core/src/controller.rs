//! Controlador de histerese – política de comandos dirigida por temperatura.
//!
//! Máquina de dois estados com dois thresholds fixos (`upper > lower`).
//! A banda morta entre eles evita que ruído do sensor perto de um único
//! threshold dispare uma enxurrada de comandos: no máximo um comando por
//! transição de estado.
//!
//! A política é pura (sem I/O): [`HysteresisController::decide`] retorna a
//! transição pendente e o chamador confirma com
//! [`HysteresisController::commit`] **só depois** do envio do comando ter
//! sucesso. Uma falha de envio deixa o estado como estava, então a próxima
//! leitura qualificada re-oferece a mesma transição.

use crate::config::ControllerConfig;

/// Estado do controlador.
///
/// Memória independente de "já avisei" – não é derivado do armazém de
/// leituras.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ControllerState {
    #[default]
    Normal,
    Warning,
}

/// Transição pendente: o próximo estado e o comando a enviar antes de
/// confirmá-la.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: ControllerState,
    pub command: String,
}

/// Máquina de estados de histerese sobre as leituras de temperatura.
#[derive(Debug)]
pub struct HysteresisController {
    config: ControllerConfig,
    state: ControllerState,
}

impl HysteresisController {
    /// Cria um controlador no estado [`ControllerState::Normal`].
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            state: ControllerState::Normal,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Avalia uma temperatura e retorna a transição pendente, se houver.
    ///
    /// - Normal → Warning sse `t > upper`
    /// - Warning → Normal sse `t < lower`
    /// - Banda morta (`lower <= t <= upper`) ou lado já coerente: `None`
    pub fn decide(&self, temperature: f32) -> Option<Transition> {
        match self.state {
            ControllerState::Normal if temperature > self.config.upper => Some(Transition {
                next: ControllerState::Warning,
                command: self.config.warning_on.clone(),
            }),
            ControllerState::Warning if temperature < self.config.lower => Some(Transition {
                next: ControllerState::Normal,
                command: self.config.warning_off.clone(),
            }),
            _ => None,
        }
    }

    /// Confirma uma transição retornada por [`decide`](Self::decide).
    ///
    /// Chamar apenas após o envio do comando ter sucesso.
    pub fn commit(&mut self, transition: Transition) {
        self.state = transition.next;
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
