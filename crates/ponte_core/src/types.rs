//! Definição de tipos/structs da Ponte.
//!
//! Porta direta do payload JSON emitido pelo firmware do Arduino.
//! Uma leitura é imutável depois de construída; o armazém compartilhado
//! substitui a leitura inteira a cada frame decodificado.

use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────
// Leitura do sensor
// ──────────────────────────────────────────────

/// Uma amostra decodificada do sensor de temperatura/umidade.
///
/// Campos ausentes no JSON ficam zerados e campos desconhecidos são
/// ignorados – firmwares antigos e novos convivem no mesmo formato.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Reading {
    /// Temperatura (°C)
    pub temperature: f32,
    /// Umidade relativa (0–100%)
    pub humidity: f32,
}

// ──────────────────────────────────────────────
// Comando manual
// ──────────────────────────────────────────────

/// Corpo do `POST /api/command`.
///
/// O token é opaco para a Ponte: vai verbatim para o dispositivo, sem
/// validação além de não estar vazio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandRequest {
    pub command: String,
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_reading_is_zeroed() {
        let r = Reading::default();
        assert_eq!(r.temperature, 0.0);
        assert_eq!(r.humidity, 0.0);
    }

    #[test]
    fn reading_roundtrip_json() {
        let reading = Reading {
            temperature: 26.4,
            humidity: 61.2,
        };
        let json = serde_json::to_string(&reading).unwrap();
        let decoded: Reading = serde_json::from_str(&json).unwrap();
        assert_eq!(reading, decoded);
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let decoded: Reading = serde_json::from_str(r#"{"temperature": 29.5}"#).unwrap();
        assert_eq!(decoded.temperature, 29.5);
        assert_eq!(decoded.humidity, 0.0);
    }

    #[test]
    fn command_request_from_json() {
        let cmd: CommandRequest = serde_json::from_str(r#"{"command": "X1"}"#).unwrap();
        assert_eq!(cmd.command, "X1");
    }
}
