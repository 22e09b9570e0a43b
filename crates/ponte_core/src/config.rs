//! Configuração unificada via TOML.
//!
//! Um único `config.toml` ao lado do executável cobre porta serial,
//! thresholds do controlador e endereço da API HTTP.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuração do link serial.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Caminho/nome da porta (ex: "/dev/ttyACM0", "COM3")
    pub port: String,
    /// Baud rate – deve coincidir com o Serial.begin() do firmware
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyACM0".into(),
            baud_rate: 9600,
        }
    }
}

/// Thresholds e tokens do controlador de histerese.
///
/// `upper > lower` cria a banda morta que evita oscilação de comandos
/// com ruído do sensor perto de um threshold único.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Acima disso (°C), liga o aviso
    pub upper: f32,
    /// Abaixo disso (°C), desliga o aviso
    pub lower: f32,
    /// Token enviado ao dispositivo na transição Normal → Warning
    pub warning_on: String,
    /// Token enviado ao dispositivo na transição Warning → Normal
    pub warning_off: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            upper: 28.0,
            lower: 27.0,
            warning_on: "W1".into(),
            warning_off: "W0".into(),
        }
    }
}

/// Configuração da API HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Endereço de bind
    pub bind: String,
    /// Porta TCP
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

/// Configuração raiz do aplicativo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub serial: SerialConfig,
    pub controller: ControllerConfig,
    pub http: HttpConfig,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(path, content).map_err(|e| e.to_string())?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.serial.port.is_empty() {
            errors.push("Porta serial não pode ser vazia".into());
        }
        if self.serial.baud_rate == 0 {
            errors.push("Baud rate não pode ser 0".into());
        }
        if self.controller.upper <= self.controller.lower {
            errors.push(format!(
                "Thresholds inválidos: upper ({}) deve ser maior que lower ({})",
                self.controller.upper, self.controller.lower
            ));
        }
        if self.controller.warning_on.is_empty() || self.controller.warning_off.is_empty() {
            errors.push("Tokens de comando do controlador não podem ser vazios".into());
        }
        if self.http.port == 0 {
            errors.push("Porta HTTP não pode ser 0".into());
        }

        errors
    }
}
