//! # Ponte Server
//!
//! Ponte entre um dispositivo serial (microcontrolador emitindo telemetria
//! JSON linha a linha) e uma API HTTP pequena.
//!
//! Três atividades concorrentes:
//! - thread de ingestão: lê frames do link serial e publica no armazém
//! - worker do controlador: histerese de temperatura → comandos de aviso
//! - superfície HTTP: leitura atual + submissão manual de comandos
//!
//! ## Uso
//! ```bash
//! ponte_server    # lê/escreve config.toml ao lado do executável
//! ```

mod control;
mod http;
mod ingest;
mod link;
mod store;

use crossbeam_channel::bounded;
use http::HttpServer;
use link::{CommandPort, DeviceLink};
use ponte_core::{AppConfig, HysteresisController};
use std::sync::Arc;
use store::ReadingStore;
use tracing::{error, warn};

fn main() {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Carregar config ──
    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path);

    // Salva config padrão se não existir
    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível salvar config padrão: {e}");
        }
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("Config inválida: {e}");
        }
        std::process::exit(1);
    }

    // ── Link serial ──
    // Sem dispositivo não há serviço: falha de abertura aborta o startup
    let (link, lines) = DeviceLink::open(&config.serial).expect("Falha ao abrir a porta serial");
    let link: Arc<dyn CommandPort> = Arc::new(link);

    // ── Estado compartilhado, controlador e threads de fundo ──
    let store = ReadingStore::new();
    let controller = HysteresisController::new(config.controller.clone());
    let (trigger_tx, trigger_rx) = bounded::<f32>(control::TRIGGER_QUEUE);

    let _ingest = ingest::spawn_ingest_thread(lines, store.clone(), trigger_tx);
    let _control = control::spawn_control_thread(trigger_rx, controller, Arc::clone(&link));

    // ── Banner ──
    println!();
    println!("══════════════════════════════════════════════");
    println!("   ⚡ PONTE SERIAL–HTTP – ATIVA (Rust)");
    println!("══════════════════════════════════════════════");
    println!(
        "  Serial:    {} @ {} baud",
        config.serial.port, config.serial.baud_rate
    );
    println!(
        "  Histerese: > {:.1}°C liga / < {:.1}°C desliga",
        config.controller.upper, config.controller.lower
    );
    println!(
        "  API:       http://{}:{}",
        config.http.bind, config.http.port
    );
    println!("══════════════════════════════════════════════");
    println!();

    // ── Servidor HTTP (bloqueia pela vida do processo) ──
    let server = HttpServer::new(store, link);
    if let Err(e) = server.run(&config.http) {
        error!("Servidor HTTP encerrou: {e}");
        std::process::exit(1);
    }
}
