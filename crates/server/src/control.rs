//! Worker do controlador – consome gatilhos e envia comandos ao dispositivo.
//!
//! Um único worker é o dono exclusivo da [`HysteresisController`], então
//! as decisões ficam serializadas por construção: dois gatilhos nunca
//! observam o mesmo estado e enviam o mesmo comando duas vezes. A fila
//! limitada entre ingestão e worker substitui o disparo de uma task solta
//! por leitura, mantendo a propriedade "ingestão nunca espera decisão".

use crate::link::CommandPort;
use crossbeam_channel::Receiver;
use ponte_core::HysteresisController;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{info, warn};

/// Capacidade do canal de gatilhos ingestão → controlador.
pub const TRIGGER_QUEUE: usize = 64;

/// Inicia o worker do controlador.
pub fn spawn_control_thread(
    rx: Receiver<f32>,
    controller: HysteresisController,
    port: Arc<dyn CommandPort>,
) -> JoinHandle<()> {
    std::thread::Builder::new()
        .name("controller".into())
        .spawn(move || {
            let mut controller = controller;
            control_loop(&rx, &mut controller, port.as_ref());
            info!("Worker do controlador encerrado (canal de gatilhos fechado)");
        })
        .expect("Falha ao criar thread do controlador")
}

/// Drena gatilhos até o canal desconectar (fim da ingestão).
///
/// O estado só avança depois do envio ter sucesso; numa falha de envio a
/// transição fica pendente e a próxima leitura qualificada tenta de novo.
fn control_loop(rx: &Receiver<f32>, controller: &mut HysteresisController, port: &dyn CommandPort) {
    for temperature in rx.iter() {
        let Some(transition) = controller.decide(temperature) else {
            continue;
        };
        match port.send_command(&transition.command) {
            Ok(()) => {
                info!(
                    "{temperature:.1}°C → comando {:?} enviado, estado {:?}",
                    transition.command, transition.next
                );
                controller.commit(transition);
            }
            Err(e) => warn!(
                "Falha ao enviar comando {:?}: {e} (estado mantido)",
                transition.command
            ),
        }
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
