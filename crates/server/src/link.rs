//! Link serial com o dispositivo.
//!
//! Uma única conexão aberta no startup e mantida pela vida do processo:
//! a metade de leitura vai para o [`LineReader`] consumido pela thread de
//! ingestão, a metade de escrita fica atrás de um mutex para os dois
//! produtores de comando (worker do controlador e API HTTP). Não há
//! garantia de ordem entre um comando manual e um autônomo – propriedade
//! aceita do sistema.

use ponte_core::config::SerialConfig;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Timeout de leitura da porta. Um timeout não é erro: só "sem dados ainda".
const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Porta de envio de comandos ao dispositivo.
///
/// Costura entre os produtores de comandos e o transporte físico;
/// substituível por um mock nos testes.
pub trait CommandPort: Send + Sync {
    /// Envia um token de comando, verbatim, sem framing.
    ///
    /// Entrega at-most-once: sem retry, sem leitura de confirmação.
    fn send_command(&self, token: &str) -> io::Result<()>;
}

/// Conexão serial aberta com o dispositivo.
pub struct DeviceLink {
    writer: Arc<Mutex<Box<dyn serialport::SerialPort>>>,
}

impl DeviceLink {
    /// Abre a porta e separa as metades de leitura e escrita.
    ///
    /// Falha aqui é fatal para o processo inteiro: sem dispositivo não há
    /// serviço, então o chamador aborta o startup em vez de degradar.
    pub fn open(config: &SerialConfig) -> Result<(Self, LineReader), serialport::Error> {
        let port = serialport::new(config.port.as_str(), config.baud_rate)
            .timeout(READ_TIMEOUT)
            .open()?;
        info!(
            "Porta serial {} aberta a {} baud",
            config.port, config.baud_rate
        );

        let reader = port.try_clone()?;
        Ok((
            Self {
                writer: Arc::new(Mutex::new(port)),
            },
            LineReader::new(reader),
        ))
    }
}

impl CommandPort for DeviceLink {
    fn send_command(&self, token: &str) -> io::Result<()> {
        let mut port = self.writer.lock().unwrap();
        port.write_all(token.as_bytes())?;
        port.flush()?;
        debug!("Comando {token:?} escrito na porta serial");
        Ok(())
    }
}

// ──────────────────────────────────────────────
// Remontagem de linhas
// ──────────────────────────────────────────────

/// Remonta frames terminados em newline a partir do stream serial.
///
/// Lê em blocos e acumula num buffer até aparecer `\n`, tolerando
/// timeouts de leitura no meio de um frame. A sequência só termina com
/// erro real de I/O ou EOF – e aí termina de vez (sem reconexão).
pub struct LineReader<R: Read = Box<dyn serialport::SerialPort>> {
    source: R,
    buf: Vec<u8>,
}

impl<R: Read> LineReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            buf: Vec::with_capacity(256),
        }
    }

    /// Bloqueia até o próximo frame completo; `None` encerra o stream.
    ///
    /// Bytes inválidos de UTF-8 (ruído serial) viram U+FFFD e caem no
    /// pré-filtro estrutural da decodificação.
    pub fn next_line(&mut self) -> Option<String> {
        let mut chunk = [0u8; 256];
        loop {
            if let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = self.buf.drain(..=pos).collect();
                return Some(String::from_utf8_lossy(&line[..pos]).into_owned());
            }

            match self.source.read(&mut chunk) {
                Ok(0) => {
                    debug!("EOF no stream serial");
                    return None;
                }
                Ok(n) => self.buf.extend_from_slice(&chunk[..n]),
                Err(ref e)
                    if e.kind() == io::ErrorKind::TimedOut
                        || e.kind() == io::ErrorKind::WouldBlock =>
                {
                    // Timeout normal entre frames, continua
                }
                Err(e) => {
                    warn!("Erro de leitura serial: {e}");
                    return None;
                }
            }
        }
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn splits_lines_from_single_chunk() {
        let data = b"{\"temperature\": 1.0}\n{\"temperature\": 2.0}\n";
        let mut reader = LineReader::new(Cursor::new(&data[..]));
        assert_eq!(reader.next_line().unwrap(), "{\"temperature\": 1.0}");
        assert_eq!(reader.next_line().unwrap(), "{\"temperature\": 2.0}");
        assert_eq!(reader.next_line(), None);
    }

    #[test]
    fn incomplete_tail_is_dropped_at_eof() {
        let data = b"linha completa\n{\"trunca";
        let mut reader = LineReader::new(Cursor::new(&data[..]));
        assert_eq!(reader.next_line().unwrap(), "linha completa");
        assert_eq!(reader.next_line(), None);
    }

    /// Fonte que intercala timeouts e pedaços de dados, como uma porta
    /// serial de verdade entre frames.
    struct ChoppySource {
        steps: Vec<Option<Vec<u8>>>,
    }

    impl Read for ChoppySource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.steps.pop() {
                Some(Some(bytes)) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
                Some(None) => Err(io::Error::new(io::ErrorKind::TimedOut, "timeout")),
                None => Ok(0),
            }
        }
    }

    #[test]
    fn survives_timeouts_mid_frame() {
        let mut steps: Vec<Option<Vec<u8>>> = vec![
            Some(b"{\"temperature\"".to_vec()),
            None,
            Some(b": 29.0}".to_vec()),
            None,
            Some(b"\n".to_vec()),
        ];
        steps.reverse();
        let mut reader = LineReader::new(ChoppySource { steps });
        assert_eq!(reader.next_line().unwrap(), "{\"temperature\": 29.0}");
        assert_eq!(reader.next_line(), None);
    }

    #[test]
    fn real_error_ends_stream() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "porta removida"))
            }
        }
        let mut reader = LineReader::new(Broken);
        assert_eq!(reader.next_line(), None);
    }

    #[test]
    fn garbage_bytes_become_replacement_chars() {
        let data = b"\xFF\xFEruido\n";
        let mut reader = LineReader::new(Cursor::new(&data[..]));
        let line = reader.next_line().unwrap();
        // A linha sobrevive como texto e é rejeitada no pré-filtro
        assert!(ponte_core::decode_line(&line).is_err());
    }
}
