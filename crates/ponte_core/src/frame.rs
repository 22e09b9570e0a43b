//! Protocolo de frames do dispositivo.
//!
//! Cada frame é uma linha UTF-8 terminada em newline contendo um objeto
//! JSON autocontido:
//!
//! ```text
//! {"temperature": 26.4, "humidity": 61.2}\n
//! ```
//!
//! Ruído serial e ressincronização de buffer produzem linhas parciais ou
//! truncadas; o pré-filtro estrutural (`{` no início, `}` no fim)
//! descarta essas antes de pagar o parse completo.

use crate::types::Reading;

/// Erros de decodificação de frame.
///
/// Ambos os casos são recuperáveis: o loop de ingestão loga e segue para
/// a próxima linha.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("linha fora do envelope {{...}}")]
    NotAnObject,

    #[error("erro de deserialização: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Decodifica uma linha vinda do link serial em [`Reading`].
///
/// Valida o envelope `{...}` antes de deserializar.
pub fn decode_line(line: &str) -> Result<Reading, FrameError> {
    let trimmed = line.trim();
    if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
        return Err(FrameError::NotAnObject);
    }
    Ok(serde_json::from_str(trimmed)?)
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_valid_line() {
        let reading = decode_line(r#"{"temperature": 29.0, "humidity": 50.0}"#).unwrap();
        assert_eq!(reading.temperature, 29.0);
        assert_eq!(reading.humidity, 50.0);
    }

    #[test]
    fn tolerates_trailing_crlf() {
        let reading = decode_line("{\"temperature\": 26.5, \"humidity\": 48.0}\r").unwrap();
        assert_eq!(reading.temperature, 26.5);
    }

    #[test]
    fn rejects_plain_text() {
        assert!(matches!(
            decode_line("not json"),
            Err(FrameError::NotAnObject)
        ));
    }

    #[test]
    fn rejects_partial_frame() {
        // Linha truncada por ressincronização do buffer serial
        assert!(matches!(
            decode_line(r#"{"temperature": 26."#),
            Err(FrameError::NotAnObject)
        ));
        assert!(matches!(
            decode_line(r#"ure": 26.4, "humidity": 61.2}"#),
            Err(FrameError::NotAnObject)
        ));
    }

    #[test]
    fn rejects_wrong_field_type() {
        assert!(matches!(
            decode_line(r#"{"temperature": "quente"}"#),
            Err(FrameError::Decode(_))
        ));
    }

    #[test]
    fn empty_object_is_zero_reading() {
        // json.Unmarshal zera campos ausentes; mantemos a semântica
        let reading = decode_line("{}").unwrap();
        assert_eq!(reading, Reading::default());
    }

    #[test]
    fn ignores_unknown_fields() {
        let reading =
            decode_line(r#"{"temperature": 22.0, "humidity": 55.0, "pressure": 1013.0}"#).unwrap();
        assert_eq!(reading.temperature, 22.0);
        assert_eq!(reading.humidity, 55.0);
    }

    #[test]
    fn rejects_empty_line() {
        assert!(matches!(decode_line(""), Err(FrameError::NotAnObject)));
    }
}
