//! Mock system implementation for testing

use super::{HttpResponse, System};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, RwLock};

/// Outcome of a canned fetch: a response, or a transport failure message
type CannedFetch = Result<HttpResponse, String>;

/// In-memory implementation of System trait for testing
///
/// `MockSystem` provides an in-memory filesystem and a table of
/// canned HTTP responses. Every call to [`System::fetch`] is counted so tests
/// can assert how many network round-trips a flow performed.
///
/// # Example
/// ```
/// use portalcfg::system::{mock::MockSystem, HttpResponse, System};
/// use std::path::Path;
///
/// let system = MockSystem::new()
///     .with_file("/srv/config.json", b"{}").unwrap()
///     .with_response("https://portal.test/config.json", HttpResponse::ok("{}")).unwrap();
///
/// assert!(system.exists(Path::new("/srv/config.json")));
/// assert_eq!(system.fetch("https://portal.test/config.json").unwrap().status, 200);
/// assert_eq!(system.fetch_count(), 1);
/// ```
#[derive(Clone)]
pub struct MockSystem {
    state: Arc<RwLock<MockSystemState>>,
    fetches: Arc<AtomicUsize>,
    gate: Option<Arc<FetchGate>>,
}

struct MockSystemState {
    files: HashMap<PathBuf, Vec<u8>>,
    responses: HashMap<String, CannedFetch>,
}

impl MockSystem {
    /// Create a new `MockSystem` with default state
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSystemState {
                files: HashMap::new(),
                responses: HashMap::new(),
            })),
            fetches: Arc::new(AtomicUsize::new(0)),
            gate: None,
        }
    }

    /// Add a file with contents (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    pub fn with_file<P: AsRef<Path>>(self, path: P, contents: &[u8]) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state
            .files
            .insert(path.as_ref().to_path_buf(), contents.to_vec());
        drop(state);
        Ok(self)
    }

    /// Answer GETs of `url` with `response` (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    pub fn with_response(self, url: &str, response: HttpResponse) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.responses.insert(url.to_owned(), Ok(response));
        drop(state);
        Ok(self)
    }

    /// Fail GETs of `url` with a transport error (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned
    pub fn with_network_error(self, url: &str, message: &str) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state
            .responses
            .insert(url.to_owned(), Err(message.to_owned()));
        drop(state);
        Ok(self)
    }

    /// Hold every fetch until `gate` is released (builder pattern)
    #[must_use]
    pub fn with_fetch_gate(mut self, gate: Arc<FetchGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Number of fetches issued so far
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Default for MockSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MockSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        let bytes = state.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
        })?;
        drop(state);
        String::from_utf8(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {e}")))
    }

    fn exists(&self, path: &Path) -> bool {
        self.state
            .read()
            .map(|state| state.files.contains_key(path))
            .unwrap_or(false)
    }

    fn fetch(&self, url: &str) -> io::Result<HttpResponse> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = self.gate.as_ref() {
            gate.wait();
        }

        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        match state.responses.get(url) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                message.clone(),
            )),
            None => Ok(HttpResponse::status(404, "Not Found")),
        }
    }
}

/// A latch that parks fetches until the test releases it
///
/// Lets a test observe the loader while a fetch is still in flight.
#[derive(Debug, Default)]
pub struct FetchGate {
    entered: AtomicBool,
    open: Mutex<bool>,
    released: Condvar,
}

impl FetchGate {
    /// Create a closed gate
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Whether a fetch is currently parked (or has passed) the gate
    #[must_use]
    pub fn entered(&self) -> bool {
        self.entered.load(Ordering::SeqCst)
    }

    /// Let every parked and future fetch through
    pub fn release(&self) {
        if let Ok(mut open) = self.open.lock() {
            *open = true;
            self.released.notify_all();
        }
    }

    fn wait(&self) {
        self.entered.store(true, Ordering::SeqCst);
        let Ok(mut open) = self.open.lock() else {
            return;
        };
        while !*open {
            open = match self.released.wait(open) {
                Ok(guard) => guard,
                Err(_) => return,
            };
        }
    }
}
