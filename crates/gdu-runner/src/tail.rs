use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const READ_CHUNK: usize = 4096;

pub(crate) struct Tailer {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

impl Tailer {
    pub(crate) fn spawn(path: PathBuf, sink: Box<dyn Write + Send>) -> Option<Self> {
        let (stop, stop_rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("gdu-tail".to_string())
            .spawn(move || follow(path, sink, stop_rx));

        match spawned {
            Ok(handle) => Some(Self { stop, handle }),
            Err(error) => {
                warn!(%error, "failed to start live output thread");
                None
            }
        }
    }

    /// Signals the thread and waits until it has copied everything left in the file.
    pub(crate) fn finish(self) {
        let _ = self.stop.send(());
        if self.handle.join().is_err() {
            warn!("live output thread panicked");
        }
    }
}

fn follow(path: PathBuf, mut sink: Box<dyn Write + Send>, stop: Receiver<()>) {
    let mut file = match File::open(&path) {
        Ok(file) => file,
        Err(error) => {
            debug!(%error, path = %path.display(), "cannot open capture file for tailing");
            return;
        }
    };

    let mut buf = [0u8; READ_CHUNK];
    loop {
        match file.read(&mut buf) {
            Ok(0) => {}
            Ok(n) => {
                if sink.write_all(&buf[..n]).and_then(|_| sink.flush()).is_err() {
                    return;
                }
                continue;
            }
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => {
                debug!(%error, "capture file read failed");
                return;
            }
        }

        match stop.recv_timeout(POLL_INTERVAL) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                let _ = io::copy(&mut file, &mut sink);
                let _ = sink.flush();
                return;
            }
        }
    }
}
