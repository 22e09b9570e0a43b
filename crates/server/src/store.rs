//! Armazém compartilhado da leitura mais recente.

use ponte_core::Reading;
use std::sync::{Arc, Mutex};

/// Guarda exatamente uma [`Reading`] – a última decodificada.
///
/// Compartilhado entre a thread de ingestão (única escritora) e os
/// handlers HTTP (leitores). Cada operação é uma seção crítica própria,
/// curta: o lock nunca atravessa I/O nem decodificação, então um leitor
/// jamais observa uma leitura com campos de duas atualizações diferentes.
///
/// Inicializa zerado e vive pela duração do processo; se o link serial
/// morrer, a API continua servindo o último valor (sem flag de frescor –
/// limitação documentada).
#[derive(Debug, Clone, Default)]
pub struct ReadingStore {
    inner: Arc<Mutex<Reading>>,
}

impl ReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retorna uma cópia da leitura mais recente. Nunca falha.
    pub fn get(&self) -> Reading {
        *self.inner.lock().unwrap()
    }

    /// Substitui a leitura armazenada atomicamente.
    pub fn set(&self, reading: Reading) {
        *self.inner.lock().unwrap() = reading;
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed() {
        let store = ReadingStore::new();
        assert_eq!(store.get(), Reading::default());
    }

    #[test]
    fn set_replaces_wholesale() {
        let store = ReadingStore::new();
        store.set(Reading {
            temperature: 29.0,
            humidity: 50.0,
        });
        let r = store.get();
        assert_eq!(r.temperature, 29.0);
        assert_eq!(r.humidity, 50.0);
    }

    #[test]
    fn get_returns_copy() {
        let store = ReadingStore::new();
        let before = store.get();
        store.set(Reading {
            temperature: 1.0,
            humidity: 2.0,
        });
        // A cópia anterior não muda junto com o armazém
        assert_eq!(before, Reading::default());
    }

    #[test]
    fn concurrent_readers_never_see_torn_reading() {
        // Escritores gravam sempre pares (t, t); um leitor que visse
        // campos de atualizações diferentes quebraria a igualdade.
        let store = ReadingStore::new();

        let writers: Vec<_> = (0..4)
            .map(|w| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..500 {
                        let v = (w * 1000 + i) as f32;
                        store.set(Reading {
                            temperature: v,
                            humidity: v,
                        });
                    }
                })
            })
            .collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        let r = store.get();
                        assert_eq!(r.temperature, r.humidity);
                    }
                })
            })
            .collect();

        for handle in writers.into_iter().chain(readers) {
            handle.join().unwrap();
        }
    }
}
