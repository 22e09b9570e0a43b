//! Superfície HTTP – expõe a última leitura e aceita comandos manuais.
//!
//! Servidor HTTP/1.1 mínimo sobre `TcpListener`: uma thread por conexão,
//! uma resposta por conexão, CORS liberado para o frontend. Endpoints:
//!
//! - `GET  /api/sensor-data` – última leitura em JSON (pode estar zerada
//!   ou obsoleta se nenhum frame decodificou ou o link morreu)
//! - `POST /api/command`     – `{"command": "..."}` repassado direto ao
//!   dispositivo
//!
//! O envio manual NÃO passa pela máquina de estados do controlador, então
//! um comando manual pode dessincronizar o estado interno da realidade
//! (ex: desligar o aviso na mão não volta o controlador para Normal).
//! Limitação conhecida e aceita.

use crate::link::CommandPort;
use crate::store::ReadingStore;
use ponte_core::CommandRequest;
use ponte_core::config::HttpConfig;
use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Timeout de leitura/escrita por conexão – um cliente travado não pode
/// prender uma thread para sempre.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Corpo máximo aceito num POST (comandos são tokens curtos).
const MAX_BODY: usize = 4096;

/// Servidor da API.
pub struct HttpServer {
    store: ReadingStore,
    port: Arc<dyn CommandPort>,
}

impl HttpServer {
    pub fn new(store: ReadingStore, port: Arc<dyn CommandPort>) -> Self {
        Self { store, port }
    }

    /// Loop de accept – bloqueia pela vida do processo.
    pub fn run(&self, config: &HttpConfig) -> io::Result<()> {
        let listener = TcpListener::bind(format!("{}:{}", config.bind, config.port))?;
        info!("API HTTP escutando em http://{}:{}", config.bind, config.port);

        loop {
            match listener.accept() {
                Ok((stream, peer)) => {
                    debug!("Conexão de {peer}");
                    let store = self.store.clone();
                    let port = Arc::clone(&self.port);
                    std::thread::Builder::new()
                        .name("http-client".into())
                        .spawn(move || {
                            if let Err(e) = handle_client(&stream, &store, port.as_ref()) {
                                debug!("Conexão de {peer} terminou com erro: {e}");
                            }
                        })
                        .expect("Falha ao criar thread de conexão HTTP");
                }
                Err(e) => warn!("Erro ao aceitar conexão: {e}"),
            }
        }
    }
}

fn handle_client(stream: &TcpStream, store: &ReadingStore, port: &dyn CommandPort) -> io::Result<()> {
    stream.set_read_timeout(Some(CLIENT_TIMEOUT))?;
    stream.set_write_timeout(Some(CLIENT_TIMEOUT))?;

    let mut reader = BufReader::new(stream);
    let Some(request) = read_request(&mut reader)? else {
        return Ok(()); // conexão fechada sem request completo
    };

    let response = route(&request, store, port);
    let mut writer = stream;
    write_response(&mut writer, &response)
}

// ──────────────────────────────────────────────
// Parsing do request
// ──────────────────────────────────────────────

#[derive(Debug, PartialEq)]
struct Request {
    method: String,
    path: String,
    body: Vec<u8>,
}

/// Lê request line, headers e corpo limitado por `Content-Length`.
///
/// Retorna `None` para conexões fechadas ou request lines ilegíveis –
/// nada para responder nesses casos.
fn read_request<R: BufRead>(reader: &mut R) -> io::Result<Option<Request>> {
    let mut request_line = String::new();
    if reader.read_line(&mut request_line)? == 0 {
        return Ok(None);
    }

    let mut parts = request_line.split_whitespace();
    let (Some(method), Some(path)) = (parts.next(), parts.next()) else {
        return Ok(None);
    };
    let method = method.to_string();
    let path = path.to_string();

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 {
            break;
        }
        let header = header.trim();
        if header.is_empty() {
            break;
        }
        if let Some(value) = header.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }

    // Corpo maior que o teto é truncado; o parse JSON rejeita o resto
    let mut body = vec![0u8; content_length.min(MAX_BODY)];
    if !body.is_empty() {
        reader.read_exact(&mut body)?;
    }

    Ok(Some(Request { method, path, body }))
}

// ──────────────────────────────────────────────
// Roteamento
// ──────────────────────────────────────────────

struct Response {
    status: u16,
    reason: &'static str,
    content_type: &'static str,
    body: String,
}

impl Response {
    fn ok_json(body: String) -> Self {
        Self {
            status: 200,
            reason: "OK",
            content_type: "application/json",
            body,
        }
    }

    fn ok_text(body: &str) -> Self {
        Self {
            status: 200,
            reason: "OK",
            content_type: "text/plain; charset=utf-8",
            body: body.into(),
        }
    }

    fn error(status: u16, reason: &'static str, body: &str) -> Self {
        Self {
            status,
            reason,
            content_type: "text/plain; charset=utf-8",
            body: body.into(),
        }
    }
}

fn route(request: &Request, store: &ReadingStore, port: &dyn CommandPort) -> Response {
    // Preflight CORS do navegador antes do POST
    if request.method == "OPTIONS" {
        return Response::ok_text("");
    }

    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/api/sensor-data") => sensor_data(store),
        ("POST", "/api/command") => submit_command(request, port),
        (_, "/api/sensor-data") | (_, "/api/command") => {
            Response::error(405, "Method Not Allowed", "método não permitido")
        }
        _ => Response::error(404, "Not Found", "não encontrado"),
    }
}

/// `GET /api/sensor-data` – sempre responde, mesmo que a leitura seja a
/// zerada inicial ou esteja obsoleta.
fn sensor_data(store: &ReadingStore) -> Response {
    match serde_json::to_string(&store.get()) {
        Ok(json) => Response::ok_json(json),
        Err(e) => {
            warn!("Falha ao serializar leitura: {e}");
            Response::error(500, "Internal Server Error", "erro interno")
        }
    }
}

/// `POST /api/command` – repassa o token direto ao link, sem passar pelo
/// controlador. Falha de envio vira 500 para o chamador decidir; não há
/// retry automático.
fn submit_command(request: &Request, port: &dyn CommandPort) -> Response {
    let command = match serde_json::from_slice::<CommandRequest>(&request.body) {
        Ok(req) if !req.command.is_empty() => req.command,
        Ok(_) => return Response::error(400, "Bad Request", "comando vazio"),
        Err(e) => {
            debug!("Corpo de comando inválido: {e}");
            return Response::error(400, "Bad Request", "corpo inválido");
        }
    };

    match port.send_command(&command) {
        Ok(()) => {
            info!("Comando manual {command:?} repassado ao dispositivo");
            Response::ok_text("comando enviado")
        }
        Err(e) => {
            warn!("Falha ao enviar comando manual {command:?}: {e}");
            Response::error(500, "Internal Server Error", "falha ao enviar comando")
        }
    }
}

fn write_response<W: Write>(writer: &mut W, response: &Response) -> io::Result<()> {
    write!(
        writer,
        "HTTP/1.1 {} {}\r\n\
         Content-Type: {}\r\n\
         Content-Length: {}\r\n\
         Access-Control-Allow-Origin: *\r\n\
         Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n\
         Access-Control-Allow-Headers: Content-Type\r\n\
         Connection: close\r\n\
         \r\n\
         {}",
        response.status,
        response.reason,
        response.content_type,
        response.body.len(),
        response.body
    )?;
    writer.flush()
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
