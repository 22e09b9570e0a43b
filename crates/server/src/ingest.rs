//! Loop de ingestão de linhas – a atividade de fundo principal do processo.
//!
//! Consome o [`LineReader`] do link serial, publica cada leitura válida no
//! [`ReadingStore`] e dispara o controlador via channel não bloqueante, de
//! modo que a taxa de leitura nunca é limitada pela latência de decisão ou
//! por uma escrita de comando lenta.

use crate::link::LineReader;
use crate::store::ReadingStore;
use crossbeam_channel::Sender;
use ponte_core::frame;
use std::io::Read;
use std::thread::JoinHandle;
use tracing::{debug, error, warn};

/// Inicia a thread de ingestão. Roda até o link serial morrer.
pub fn spawn_ingest_thread(
    reader: LineReader,
    store: ReadingStore,
    controller_tx: Sender<f32>,
) -> JoinHandle<()> {
    std::thread::Builder::new()
        .name("serial-ingest".into())
        .spawn(move || {
            ingest_loop(reader, &store, &controller_tx);
            // Sem reconexão: a API segue servindo a última leitura, obsoleta
            error!("Link serial encerrado; ingestão parada definitivamente");
        })
        .expect("Falha ao criar thread de ingestão")
}

/// Processa linhas até o stream terminar (erro fatal de conexão ou EOF).
///
/// Linha malformada ou que não decodifica é descartada com log – condição
/// esperada e recuperável, não um estado de erro. Nesses casos o armazém
/// não é tocado e o controlador não é disparado.
fn ingest_loop<R: Read>(
    mut reader: LineReader<R>,
    store: &ReadingStore,
    controller_tx: &Sender<f32>,
) {
    while let Some(line) = reader.next_line() {
        match frame::decode_line(&line) {
            Ok(reading) => {
                store.set(reading);
                debug!(
                    "Leitura: {:.1}°C {:.1}%",
                    reading.temperature, reading.humidity
                );
                // Hand-off não bloqueante: canal cheio descarta o gatilho
                // (a próxima leitura re-dispara a avaliação)
                if controller_tx.try_send(reading.temperature).is_err() {
                    debug!("Canal do controlador indisponível, gatilho descartado");
                }
            }
            Err(e) => warn!("Frame descartado ({e}): {line:?}"),
        }
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
